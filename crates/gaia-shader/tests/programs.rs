use gaia_geom::Vec3;
use gaia_mask::{MaskParams, RegionWeights, SliderVector};
use gaia_shader::glsl::{self, names};
use gaia_shader::{MapSamples, SurfacePalette, shade_surface};
use proptest::prelude::*;

#[test]
fn programs_embed_the_mask_constants() {
    let params = MaskParams {
        noise_frequency: 4.25,
        threshold_base: 1.02,
        threshold_slope: 1.05,
        edge: 0.02,
        ..MaskParams::default()
    };
    let pal = SurfacePalette::default();
    for src in [glsl::vertex_source(&params), glsl::fragment_source(&params, &pal)] {
        assert!(src.starts_with("#version 330"));
        assert!(src.contains("const float NOISE_FREQUENCY = 4.25;"));
        assert!(src.contains("const float THRESHOLD_BASE = 1.02;"));
        assert!(src.contains("const float THRESHOLD_SLOPE = 1.05;"));
        assert!(src.contains("const float EDGE = 0.02;"));
        assert!(src.contains("const vec3 SEED_SIDE = vec3(0.8, -0.5, 0.3);"));
        assert!(src.contains("float snoise(vec3 v)"));
        assert!(src.contains("uniform float uSliders[5];"));
    }
}

#[test]
fn vertex_program_drives_morphs_from_texture() {
    let src = glsl::vertex_source(&MaskParams::default());
    for name in [
        names::INDICES,
        names::MORPH_TEX,
        names::MORPH_COUNT,
        names::MORPH_VERTEX_COUNT,
        names::MORPH_TEX_WIDTH,
    ] {
        assert!(src.contains(name), "missing {name}");
    }
    assert!(src.contains("const float MORPH_BOOST = 1.8;"));
    assert!(src.contains("gl_VertexID"));
}

#[test]
fn fragment_program_uses_palette_targets() {
    let pal = SurfacePalette {
        ocean_roughness: 0.125,
        ..SurfacePalette::default()
    };
    let src = glsl::fragment_source(&MaskParams::default(), &pal);
    assert!(src.contains("const float OCEAN_ROUGHNESS = 0.125;"));
    assert!(src.contains("uniform vec3 uLightDir[4];"));
    assert!(src.contains("cross(dFdx(vWorldPos), dFdy(vWorldPos))"));
    assert!(src.contains("out vec4 finalColor;"));
}

#[test]
fn every_declared_function_is_defined_once() {
    let src = glsl::fragment_source(&MaskParams::default(), &SurfacePalette::default());
    for sig in ["float growthAlpha(", "vec4 regionWeights(", "void shadeSurface(", "vec3 volcanoColor("] {
        assert_eq!(src.matches(sig).count(), 1, "{sig}");
    }
}

fn arb_weights() -> impl Strategy<Value = RegionWeights> {
    (0.0f32..=1.0, 0.0f32..=1.0, 0.0f32..=1.0, 0.0f32..=1.0).prop_map(|(d, o, v, f)| {
        RegionWeights::compose(&gaia_mask::RegionAlphas {
            desert: d,
            ocean: o,
            volcano: v,
            forest: f,
        })
    })
}

proptest! {
    #[test]
    fn material_stays_in_range(
        w in arb_weights(),
        x in -1.0f32..1.0, y in -1.0f32..1.0, z in -1.0f32..1.0,
        t in 0.0f32..100.0,
    ) {
        let s = shade_surface(Vec3::new(x, y, z), &w, t, &SurfacePalette::default(), &MapSamples::default());
        prop_assert!(s.color.is_finite());
        prop_assert!((0.0..=1.0).contains(&s.roughness));
        prop_assert!((0.0..=1.0).contains(&s.metalness));
    }

    #[test]
    fn neutral_sliders_never_change_the_material(x in -1.0f32..1.0, y in -1.0f32..1.0, z in -1.0f32..1.0) {
        let field = gaia_mask::TerrainField::new(&SliderVector::neutral(), MaskParams::default());
        let pal = SurfacePalette::default();
        let s = shade_surface(Vec3::new(x, y, z), &field.weights_at(Vec3::new(x, y, z)), 0.0, &pal, &MapSamples::default());
        prop_assert_eq!(s.color, Vec3::from_array(pal.base_color));
        prop_assert_eq!(s.roughness, pal.base_roughness);
    }
}
