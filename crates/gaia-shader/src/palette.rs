use serde::{Deserialize, Serialize};

// Volcano rock and magma are fixed; only the flat region tints are configurable.
pub const ROCK_DARK: [f32; 3] = [0.03, 0.03, 0.03];
pub const ROCK_BROWN: [f32; 3] = [0.08, 0.06, 0.04];
pub const MAGMA_RED: [f32; 3] = [0.8, 0.0, 0.0];
pub const MAGMA_BRIGHT: [f32; 3] = [1.5, 0.1, 0.0];

/// Colour gate for desert, ocean and forest.
pub const COLOR_GATE: f32 = 0.001;
/// Volcano colour needs a clearer majority before rock shows through.
pub const VOLCANO_GATE: f32 = 0.05;
/// Gate for roughness/metalness blending.
pub const PBR_GATE: f32 = 0.01;

/// Material targets each region pulls the base surface towards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfacePalette {
    pub base_color: [f32; 3],
    pub base_roughness: f32,
    pub base_metalness: f32,
    pub desert_color: [f32; 3],
    pub desert_roughness: f32,
    pub ocean_color: [f32; 3],
    pub ocean_roughness: f32,
    pub ocean_metalness: f32,
    pub volcano_roughness: f32,
    pub volcano_metalness: f32,
    pub forest_color: [f32; 3],
    pub forest_roughness: f32,
}

impl Default for SurfacePalette {
    fn default() -> Self {
        Self {
            base_color: [0.12, 0.12, 0.15],
            base_roughness: 0.95,
            base_metalness: 0.0,
            desert_color: [0.4, 0.25, 0.15],
            desert_roughness: 1.0,
            ocean_color: [0.0, 0.9, 1.0],
            ocean_roughness: 0.02,
            ocean_metalness: 0.3,
            volcano_roughness: 1.0,
            volcano_metalness: 0.0,
            forest_color: [0.1, 0.28, 0.07],
            forest_roughness: 0.85,
        }
    }
}
