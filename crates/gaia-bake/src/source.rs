use gaia_geom::{Transform, Vec3};
use gaia_mask::{MorphTargetIndexMap, Region};

use crate::error::BakeError;

/// Per-vertex offsets (`xyz` triples) added to the base positions.
#[derive(Clone, Debug, PartialEq)]
pub struct MorphTarget {
    pub name: String,
    pub offsets: Vec<f32>,
}

/// How the baker decides what a mesh looks like for the current sliders.
#[derive(Clone, Debug, PartialEq)]
pub enum MeshRole {
    /// Planet surface: morph influences follow the region weights per vertex.
    Terrain { map: MorphTargetIndexMap },
    /// Many small disjoint pieces that are kept or dropped whole,
    /// depending on the region's growth alpha at each piece's centroid.
    Overlay { region: Region },
    /// Decorations whose morph influences are already resolved.
    Static { influences: Vec<f32> },
}

/// A copy of one live mesh, detached from the renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceMesh {
    pub name: String,
    /// `xyz` per vertex, object space.
    pub pos: Vec<f32>,
    /// Triangle list; `None` means `pos` is already a triangle soup.
    pub indices: Option<Vec<u32>>,
    pub morph_targets: Vec<MorphTarget>,
    pub transform: Transform,
    pub visible: bool,
    pub role: MeshRole,
}

impl SourceMesh {
    pub fn new(name: impl Into<String>, pos: Vec<f32>, indices: Option<Vec<u32>>, role: MeshRole) -> Self {
        Self {
            name: name.into(),
            pos,
            indices,
            morph_targets: Vec::new(),
            transform: Transform::IDENTITY,
            visible: true,
            role,
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.pos.len() / 3
    }

    #[inline]
    pub fn vertex(&self, i: usize) -> Vec3 {
        Vec3::new(self.pos[i * 3], self.pos[i * 3 + 1], self.pos[i * 3 + 2])
    }

    pub fn morph_target_names(&self) -> Vec<&str> {
        self.morph_targets.iter().map(|t| t.name.as_str()).collect()
    }

    /// Corner count after expanding to a triangle soup.
    pub fn corner_count(&self) -> usize {
        match &self.indices {
            Some(idx) => idx.len(),
            None => self.vertex_count(),
        }
    }

    /// Checks buffer shapes once so the bake itself can index freely.
    pub fn validate(&self) -> Result<(), BakeError> {
        let corners = match &self.indices {
            Some(idx) => idx.len(),
            None => self.pos.len() / 3,
        };
        if self.pos.len() % 3 != 0 || corners % 3 != 0 {
            return Err(BakeError::NotTriangles {
                mesh: self.name.clone(),
                len: self.pos.len(),
            });
        }
        let vertex_count = self.vertex_count();
        if let Some(idx) = &self.indices {
            if let Some(&bad) = idx.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(BakeError::IndexOutOfRange {
                    mesh: self.name.clone(),
                    index: bad,
                    vertex_count,
                });
            }
        }
        for t in &self.morph_targets {
            if t.offsets.len() != self.pos.len() {
                return Err(BakeError::MorphTargetLength {
                    mesh: self.name.clone(),
                    target: t.name.clone(),
                    expected: self.pos.len(),
                    actual: t.offsets.len(),
                });
            }
        }
        if let MeshRole::Static { influences } = &self.role {
            if influences.len() != self.morph_targets.len() {
                return Err(BakeError::InfluenceCount {
                    mesh: self.name.clone(),
                    expected: self.morph_targets.len(),
                    actual: influences.len(),
                });
            }
        }
        Ok(())
    }
}
