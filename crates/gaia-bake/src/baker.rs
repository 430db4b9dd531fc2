use gaia_geom::Vec3;
use gaia_mask::TerrainField;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::baked::BakedMesh;
use crate::error::BakeError;
use crate::islands::find_islands;
use crate::normals::{NormalMode, compute_normals, is_degenerate};
use crate::source::{MeshRole, SourceMesh};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BakeOptions {
    pub normals: NormalMode,
    /// Remove zero-area triangles instead of exporting them collapsed.
    pub drop_degenerate: bool,
    /// Overlay pieces stay when their region alpha at the centroid reaches this.
    pub island_keep_threshold: f32,
    /// Bake meshes on the rayon pool.
    pub parallel: bool,
}

impl Default for BakeOptions {
    fn default() -> Self {
        Self {
            normals: NormalMode::Flat,
            drop_degenerate: false,
            island_keep_threshold: 0.5,
            parallel: true,
        }
    }
}

impl BakeOptions {
    /// Clamps the island threshold into `[0, 1]`; NaN falls back to the default.
    pub fn sanitized(mut self) -> Self {
        let t = self.island_keep_threshold;
        if t.is_nan() {
            let fallback = BakeOptions::default().island_keep_threshold;
            log::warn!("island_keep_threshold {} rejected, using {}", t, fallback);
            self.island_keep_threshold = fallback;
        } else if !(0.0..=1.0).contains(&t) {
            log::warn!("island_keep_threshold {} clamped into [0, 1]", t);
            self.island_keep_threshold = t.clamp(0.0, 1.0);
        }
        self
    }
}

/// Freezes the current slider state into one static triangle soup.
///
/// Works on copies of the scene's buffers; nothing live is mutated.
#[derive(Clone, Debug, Default)]
pub struct MeshBaker {
    pub options: BakeOptions,
}

impl MeshBaker {
    pub fn new(options: BakeOptions) -> Self {
        Self {
            options: options.sanitized(),
        }
    }

    pub fn bake(&self, meshes: &[SourceMesh], field: &TerrainField) -> Result<BakedMesh, BakeError> {
        if meshes.is_empty() {
            return Err(BakeError::SceneNotReady);
        }
        for m in meshes {
            m.validate()?;
        }

        let start = std::time::Instant::now();
        let parts: Vec<BakedMesh> = if self.options.parallel {
            meshes.par_iter().map(|m| self.bake_mesh(m, field)).collect()
        } else {
            meshes.iter().map(|m| self.bake_mesh(m, field)).collect()
        };

        let mut out = BakedMesh::default();
        for part in parts {
            out.append(part);
        }
        log::info!(
            target: "bake",
            "baked {} meshes into {} triangles in {:?}",
            meshes.len(),
            out.triangle_count(),
            start.elapsed()
        );
        Ok(out)
    }

    /// Bakes one mesh that has already passed `SourceMesh::validate`.
    pub fn bake_mesh(&self, mesh: &SourceMesh, field: &TerrainField) -> BakedMesh {
        let corners = mesh.corner_count();
        if !mesh.visible {
            log::debug!(target: "bake", "{}: hidden, collapsed", mesh.name);
            return self.finish(vec![Vec3::ZERO; corners]);
        }

        let local = morphed_corners(mesh, field);
        let m = mesh.transform.to_mat4();
        let mut world: Vec<Vec3> = local.iter().map(|&p| m.transform_point(p)).collect();

        if let MeshRole::Overlay { region } = &mesh.role {
            let islands = find_islands(&world);
            let mut dropped = 0usize;
            for island in &islands {
                let centroid = |pts: &[Vec3]| {
                    let sum = island
                        .triangles
                        .iter()
                        .flat_map(|&t| [3 * t, 3 * t + 1, 3 * t + 2])
                        .fold(Vec3::ZERO, |acc, c| acc + pts[c]);
                    sum / (island.triangles.len() * 3) as f32
                };
                let alpha = field.alphas_at(centroid(&local)).get(*region);
                if alpha >= self.options.island_keep_threshold {
                    continue;
                }
                let point = centroid(&world);
                for &t in &island.triangles {
                    world[3 * t..3 * t + 3].fill(point);
                }
                dropped += 1;
            }
            log::debug!(
                target: "bake",
                "{}: {} of {} {} islands collapsed",
                mesh.name,
                dropped,
                islands.len(),
                region
            );
        }

        self.finish(world)
    }

    fn finish(&self, mut corners: Vec<Vec3>) -> BakedMesh {
        if self.options.drop_degenerate {
            corners = corners
                .chunks_exact(3)
                .filter(|t| !is_degenerate(t[0], t[1], t[2]))
                .flatten()
                .copied()
                .collect();
        }
        let normals = compute_normals(&corners, self.options.normals);
        BakedMesh::from_corners(&corners, &normals)
    }
}

/// Expands the mesh to a soup and applies its morph targets.
fn morphed_corners(mesh: &SourceMesh, field: &TerrainField) -> Vec<Vec3> {
    let order: Box<dyn Iterator<Item = usize> + '_> = match &mesh.indices {
        Some(idx) => Box::new(idx.iter().map(|&i| i as usize)),
        None => Box::new(0..mesh.vertex_count()),
    };
    let boost = field.params().morph_boost;

    order
        .map(|v| {
            let base = mesh.vertex(v);
            match &mesh.role {
                _ if mesh.morph_targets.is_empty() => base,
                MeshRole::Static { influences } => apply_morphs(mesh, v, base, influences),
                MeshRole::Terrain { map } => {
                    let influences = map.influences(&field.weights_at(base), boost);
                    apply_morphs(mesh, v, base, &influences)
                }
                MeshRole::Overlay { .. } => base,
            }
        })
        .collect()
}

fn apply_morphs(mesh: &SourceMesh, v: usize, base: Vec3, influences: &[f32]) -> Vec3 {
    let mut p = base;
    for (target, &w) in mesh.morph_targets.iter().zip(influences) {
        if w == 0.0 {
            continue;
        }
        let o = &target.offsets[v * 3..v * 3 + 3];
        p += Vec3::new(o[0], o[1], o[2]) * w;
    }
    p
}

#[cfg(test)]
mod tests {
    use super::*;
    use gaia_mask::{MaskParams, MorphTargetIndexMap, Region, SliderVector};

    use crate::source::MorphTarget;

    fn quad_mesh(role: MeshRole) -> SourceMesh {
        let pos = vec![0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0];
        SourceMesh::new("quad", pos, Some(vec![0, 1, 2, 1, 3, 2]), role)
    }

    #[test]
    fn empty_scene_is_an_error() {
        let b = MeshBaker::default();
        assert_eq!(b.bake(&[], &TerrainField::neutral()), Err(BakeError::SceneNotReady));
    }

    #[test]
    fn hidden_mesh_is_collapsed() {
        let mut m = quad_mesh(MeshRole::Static { influences: vec![] });
        m.visible = false;
        let out = MeshBaker::default().bake(&[m], &TerrainField::neutral()).unwrap();
        assert_eq!(out.triangle_count(), 2);
        assert!(out.pos.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn hidden_mesh_can_be_dropped() {
        let mut m = quad_mesh(MeshRole::Static { influences: vec![] });
        m.visible = false;
        let b = MeshBaker::new(BakeOptions {
            drop_degenerate: true,
            ..BakeOptions::default()
        });
        assert!(b.bake(&[m], &TerrainField::neutral()).unwrap().is_empty());
    }

    #[test]
    fn static_influences_are_applied() {
        let mut m = quad_mesh(MeshRole::Static { influences: vec![0.5] });
        m.morph_targets.push(MorphTarget {
            name: "lift".into(),
            offsets: [0.0, 2.0, 0.0].repeat(4),
        });
        let out = MeshBaker::default().bake(&[m], &TerrainField::neutral()).unwrap();
        assert_eq!(out.position(0).y, 2.0);
    }

    #[test]
    fn terrain_follows_region_weight() {
        let mut m = quad_mesh(MeshRole::Terrain {
            map: MorphTargetIndexMap::discover(&["Forest_Hills"]),
        });
        m.morph_targets.push(MorphTarget {
            name: "Forest_Hills".into(),
            offsets: [0.0, 1.0, 0.0].repeat(4),
        });
        let field = TerrainField::new(
            &SliderVector::new([50.0, 100.0, 50.0, 50.0, 50.0]),
            MaskParams::default(),
        );
        let out = MeshBaker::default().bake(&[m], &field).unwrap();
        // Full forest: weight 1, boosted 1.8.
        assert!((out.position(0).y - 2.8).abs() < 1e-5);
    }

    #[test]
    fn influence_count_is_checked() {
        let m = quad_mesh(MeshRole::Static { influences: vec![1.0] });
        assert!(matches!(
            MeshBaker::default().bake(&[m], &TerrainField::neutral()),
            Err(BakeError::InfluenceCount { expected: 0, actual: 1, .. })
        ));
    }

    #[test]
    fn overlay_islands_are_kept_or_collapsed_whole() {
        let mut pos = Vec::new();
        for p in crate::shapes::cone(Vec3::UP, Vec3::UP, 0.05, 0.1, 5) {
            pos.extend(p.to_array());
        }
        for p in crate::shapes::cone(-Vec3::UP, -Vec3::UP, 0.05, 0.1, 5) {
            pos.extend(p.to_array());
        }
        let m = SourceMesh::new("trees", pos, None, MeshRole::Overlay { region: Region::Ocean });
        // Ocean at 0.8 covers the top seed and leaves the antipode bare.
        let field = TerrainField::new(
            &SliderVector::new([90.0, 50.0, 50.0, 50.0, 50.0]),
            MaskParams::default(),
        );
        let out = MeshBaker::default().bake(&[m], &field).unwrap();
        let half = out.vertex_count() / 2;
        assert!((0..half).any(|i| out.position(i) != out.position(0)));
        assert!((half..out.vertex_count()).all(|i| out.position(i) == out.position(half)));
    }

    #[test]
    fn island_threshold_is_sanitized() {
        let nan = BakeOptions { island_keep_threshold: f32::NAN, ..BakeOptions::default() };
        assert_eq!(MeshBaker::new(nan).options.island_keep_threshold, 0.5);
        let high = BakeOptions { island_keep_threshold: 4.0, ..BakeOptions::default() };
        assert_eq!(high.sanitized().island_keep_threshold, 1.0);
        let low = BakeOptions { island_keep_threshold: -1.0, ..BakeOptions::default() };
        assert_eq!(low.sanitized().island_keep_threshold, 0.0);
    }

    #[test]
    fn nan_threshold_still_keeps_grown_islands() {
        let mut pos = Vec::new();
        for p in crate::shapes::cone(Vec3::UP, Vec3::UP, 0.05, 0.1, 5) {
            pos.extend(p.to_array());
        }
        let m = SourceMesh::new("trees", pos, None, MeshRole::Overlay { region: Region::Ocean });
        let field = TerrainField::new(
            &SliderVector::new([100.0, 50.0, 50.0, 50.0, 50.0]),
            MaskParams::default(),
        );
        let baker = MeshBaker::new(BakeOptions {
            island_keep_threshold: f32::NAN,
            drop_degenerate: true,
            ..BakeOptions::default()
        });
        assert_eq!(baker.bake(&[m], &field).unwrap().triangle_count(), 10);
    }
}
