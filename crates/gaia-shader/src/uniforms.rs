use gaia_mask::{MAX_MORPH_SLOTS, MorphTargetIndexMap, RegionIntensities, SLIDER_COUNT, SliderVector};

use crate::lighting::LightRig;
use crate::palette::SurfacePalette;

/// Everything about one planet material that only changes on load or reload.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MaterialState {
    pub palette: SurfacePalette,
    pub morph: MorphTargetIndexMap,
    pub has_desert_map: bool,
    pub has_ocean_map: bool,
}

/// Values pushed to the planet programs for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct UniformState {
    /// Sliders in `[0, 1]`.
    pub sliders: [f32; SLIDER_COUNT],
    pub time: f32,
    pub indices: [i32; MAX_MORPH_SLOTS],
    pub morph_count: i32,
    /// 1 for morph slots whose region is currently growing.
    pub active: [f32; MAX_MORPH_SLOTS],
    pub has_desert_map: bool,
    pub has_ocean_map: bool,
    pub base_color: [f32; 3],
    pub desert_color: [f32; 3],
    pub ocean_color: [f32; 3],
    pub forest_color: [f32; 3],
    pub lights: LightRig,
}

/// Pure mapping from `(material, sliders, time)` to uniform values.
pub fn frame_uniforms(material: &MaterialState, sliders: &SliderVector, time: f32) -> UniformState {
    let intensities = RegionIntensities::from_sliders(sliders);
    let mut active = [0.0; MAX_MORPH_SLOTS];
    for (slot, flag) in active.iter_mut().zip(material.morph.active_flags(&intensities)) {
        *slot = flag;
    }
    let pal = &material.palette;
    UniformState {
        sliders: sliders.normalized(),
        time,
        indices: material.morph.slot_codes(),
        morph_count: material.morph.len().min(MAX_MORPH_SLOTS) as i32,
        active,
        has_desert_map: material.has_desert_map,
        has_ocean_map: material.has_ocean_map,
        base_color: pal.base_color,
        desert_color: pal.desert_color,
        ocean_color: pal.ocean_color,
        forest_color: pal.forest_color,
        lights: LightRig::from_sliders(sliders),
    }
}

/// Owns the uniform state of one planet material.
///
/// Uniforms are stale after construction or a material change until
/// `update_frame` runs.
#[derive(Clone, Debug)]
pub struct SurfaceRenderer {
    material: MaterialState,
    uniforms: UniformState,
    stale: bool,
}

impl SurfaceRenderer {
    pub fn new(material: MaterialState) -> Self {
        let uniforms = frame_uniforms(&material, &SliderVector::neutral(), 0.0);
        Self {
            material,
            uniforms,
            stale: true,
        }
    }

    pub fn set_material(&mut self, material: MaterialState) {
        log::debug!(
            "planet material replaced ({} morph targets)",
            material.morph.len()
        );
        self.material = material;
        self.stale = true;
    }

    #[inline]
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    #[inline]
    pub fn uniforms(&self) -> &UniformState {
        &self.uniforms
    }

    /// Per-frame entry point: recomputes time, sliders and the values derived
    /// from them. Nothing else is touched.
    pub fn update_frame(&mut self, sliders: &SliderVector, time: f32) -> &UniformState {
        self.uniforms = frame_uniforms(&self.material, sliders, time);
        self.stale = false;
        log::trace!("uniforms updated t={:.3}", time);
        &self.uniforms
    }
}
