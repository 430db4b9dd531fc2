//! Planet surface programs: generated GLSL, per-frame uniform state, and a
//! host reference of the fragment material mix.
#![forbid(unsafe_code)]

pub mod glsl;
pub mod lighting;
pub mod palette;
pub mod reference;
pub mod uniforms;

pub use lighting::{DirectionalLight, LIGHT_COUNT, LightRig};
pub use palette::SurfacePalette;
pub use reference::{MapSamples, SurfaceSample, shade_surface};
pub use uniforms::{MaterialState, SurfaceRenderer, UniformState, frame_uniforms};
