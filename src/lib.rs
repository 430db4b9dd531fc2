//! Slider-driven planet surface: config, procedural demo assets, and the
//! scene glue between the quiz input, the live renderer and the STL export.

pub mod config;
pub mod demo;
pub mod rebake;
pub mod scene;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use config::{DemoConfig, PlanetConfig, load_config_from_path};
pub use scene::{FOLIAGE_SECTION, PlanetInput, PlanetScene};
