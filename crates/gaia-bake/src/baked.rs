use gaia_geom::{Aabb, Vec3};
use gaia_io::Facet;

/// Flat, non-indexed triangle soup with one normal per corner.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BakedMesh {
    pub pos: Vec<f32>,
    pub norm: Vec<f32>,
}

impl BakedMesh {
    pub fn from_corners(corners: &[Vec3], normals: &[Vec3]) -> Self {
        debug_assert_eq!(corners.len(), normals.len());
        Self {
            pos: corners.iter().flat_map(|p| p.to_array()).collect(),
            norm: normals.iter().flat_map(|n| n.to_array()).collect(),
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.pos.len() / 3
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.vertex_count() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.pos.is_empty()
    }

    pub fn append(&mut self, other: BakedMesh) {
        self.pos.extend(other.pos);
        self.norm.extend(other.norm);
    }

    #[inline]
    pub fn position(&self, i: usize) -> Vec3 {
        Vec3::new(self.pos[i * 3], self.pos[i * 3 + 1], self.pos[i * 3 + 2])
    }

    #[inline]
    pub fn normal(&self, i: usize) -> Vec3 {
        Vec3::new(self.norm[i * 3], self.norm[i * 3 + 1], self.norm[i * 3 + 2])
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_points((0..self.vertex_count()).map(|i| self.position(i)))
    }

    /// One facet per triangle; the facet normal is the mean of its corner normals.
    pub fn facets(&self) -> Vec<Facet> {
        (0..self.triangle_count())
            .map(|t| {
                let c = [3 * t, 3 * t + 1, 3 * t + 2];
                let n = (self.normal(c[0]) + self.normal(c[1]) + self.normal(c[2])).normalized();
                Facet {
                    normal: n.to_array(),
                    vertices: c.map(|i| self.position(i).to_array()),
                }
            })
            .collect()
    }
}
