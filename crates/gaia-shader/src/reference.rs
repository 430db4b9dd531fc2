//! Host evaluation of `shadeSurface` from the fragment program.
//!
//! Used for previews without a GPU and to pin the material rules in tests.

use gaia_geom::Vec3;
use gaia_mask::{RegionWeights, mix, smoothstep};
use gaia_noise::snoise3;

use crate::palette::{
    COLOR_GATE, MAGMA_BRIGHT, MAGMA_RED, PBR_GATE, ROCK_BROWN, ROCK_DARK, SurfacePalette,
    VOLCANO_GATE,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceSample {
    pub color: Vec3,
    pub roughness: f32,
    pub metalness: f32,
}

/// Texels fetched from the optional desert/ocean maps at the fragment's UV.
/// `None` means the map is not loaded and the flat tint is used.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MapSamples {
    pub desert: Option<Vec3>,
    pub ocean: Option<Vec3>,
}

fn mix3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    Vec3::new(mix(a.x, b.x, t), mix(a.y, b.y, t), mix(a.z, b.z, t))
}

/// Rock with animated magma rivers. `p` is the undisplaced object position.
pub fn volcano_color(p: Vec3, time: f32) -> Vec3 {
    let rock_noise = snoise3(p * 10.0 + Vec3::splat(10.0));
    let rock = mix3(
        Vec3::from_array(ROCK_DARK),
        Vec3::from_array(ROCK_BROWN),
        rock_noise * 0.5 + 0.5,
    );

    let flow = snoise3(p * 0.3 + Vec3::new(0.0, time * 0.1, 0.0));
    let ridges = 1.0 - flow.abs();
    let river = smoothstep(0.85, 0.98, ridges);

    let pulse = snoise3(p * 3.0 + Vec3::splat(time * 2.0)) * 0.5 + 0.5;
    let magma = mix3(Vec3::from_array(MAGMA_RED), Vec3::from_array(MAGMA_BRIGHT), pulse);
    mix3(rock, magma, river)
}

pub fn shade_surface(
    p: Vec3,
    w: &RegionWeights,
    time: f32,
    palette: &SurfacePalette,
    maps: &MapSamples,
) -> SurfaceSample {
    let mut color = Vec3::from_array(palette.base_color);
    let mut roughness = palette.base_roughness;
    let mut metalness = palette.base_metalness;

    if w.desert > COLOR_GATE {
        let mut d = Vec3::from_array(palette.desert_color);
        if let Some(texel) = maps.desert {
            d = d.mul_elem(texel);
        }
        let grains = snoise3(p * 250.0) * 0.04;
        let ripples = snoise3(p * 15.0) * 0.03;
        d = d + Vec3::splat(grains + ripples);
        color = mix3(color, d, w.desert);
    }
    if w.ocean > COLOR_GATE {
        let mut o = Vec3::from_array(palette.ocean_color);
        if let Some(texel) = maps.ocean {
            o = o.mul_elem(texel);
        }
        color = mix3(color, o, w.ocean);
    }
    if w.volcano > VOLCANO_GATE {
        color = mix3(color, volcano_color(p, time), w.volcano);
    }
    if w.forest > COLOR_GATE {
        let canopy = Vec3::from_array(palette.forest_color) + Vec3::splat(snoise3(p * 40.0) * 0.05);
        color = mix3(color, canopy, w.forest);
    }

    if w.desert > PBR_GATE {
        roughness = mix(roughness, palette.desert_roughness, w.desert);
    }
    if w.ocean > PBR_GATE {
        roughness = mix(roughness, palette.ocean_roughness, w.ocean);
        metalness = mix(metalness, palette.ocean_metalness, w.ocean);
    }
    if w.volcano > PBR_GATE {
        roughness = mix(roughness, palette.volcano_roughness, w.volcano);
        metalness = mix(metalness, palette.volcano_metalness, w.volcano);
    }
    if w.forest > PBR_GATE {
        roughness = mix(roughness, palette.forest_roughness, w.forest);
    }

    SurfaceSample {
        color,
        roughness,
        metalness,
    }
}
