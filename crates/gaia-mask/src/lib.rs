//! Terrain region masks: sliders to intensities, growth alphas, and the
//! mutually exclusive composition consumed by both the live shader and the
//! mesh baker.
#![forbid(unsafe_code)]

pub mod compose;
pub mod growth;
pub mod morph;
pub mod region;
pub mod slider;

pub use compose::{RegionAlphas, RegionWeights, TerrainField};
pub use growth::{MaskParams, growth_alpha, mix, smoothstep};
pub use morph::{MAX_MORPH_SLOTS, MorphMapError, MorphTargetIndexMap, NO_REGION};
pub use region::{Region, RegionSeed};
pub use slider::{
    Axis, PairIntensity, RegionIntensities, SLIDER_COUNT, SLIDER_NEUTRAL, SliderHalf, SliderVector,
    split_slider,
};
