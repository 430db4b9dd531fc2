use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BakeError {
    #[error("scene is not ready: no meshes to bake")]
    SceneNotReady,
    #[error("mesh `{mesh}`: morph target `{target}` has {actual} floats, expected {expected}")]
    MorphTargetLength {
        mesh: String,
        target: String,
        expected: usize,
        actual: usize,
    },
    #[error("mesh `{mesh}`: index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        mesh: String,
        index: u32,
        vertex_count: usize,
    },
    #[error("mesh `{mesh}`: {actual} morph influences for {expected} morph targets")]
    InfluenceCount {
        mesh: String,
        expected: usize,
        actual: usize,
    },
    #[error("mesh `{mesh}`: {len} position floats do not form whole triangles")]
    NotTriangles { mesh: String, len: usize },
    #[error("stl encode failed: {0}")]
    Encode(String),
}
