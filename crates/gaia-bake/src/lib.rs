//! CPU bake of the planet: morphs, transforms, island masking and normals
//! folded into one flat triangle soup ready for export.
#![forbid(unsafe_code)]

pub mod baked;
pub mod baker;
pub mod error;
pub mod islands;
pub mod normals;
pub mod shapes;
pub mod source;

pub use baked::BakedMesh;
pub use baker::{BakeOptions, MeshBaker};
pub use error::BakeError;
pub use islands::{Island, POSITION_KEY_DECIMALS, find_islands};
pub use normals::NormalMode;
pub use source::{MeshRole, MorphTarget, SourceMesh};
