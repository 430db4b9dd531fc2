//! Procedural planet assets: an icosphere with one morph target per region
//! and a foliage overlay of small disjoint cones.

use fastnoise_lite::{FastNoiseLite, NoiseType};
use gaia_bake::shapes::{cone, icosphere};
use gaia_bake::{MeshRole, MorphTarget, SourceMesh};
use gaia_geom::Vec3;
use gaia_mask::{MorphTargetIndexMap, Region};

use crate::config::DemoConfig;

pub const PLANET_MESH: &str = "planet";
pub const FOLIAGE_MESH: &str = "foliage";

const FOLIAGE_SEGMENTS: u32 = 6;

#[derive(Clone, Copy)]
enum Relief {
    Flatten,
    Dunes,
    Peaks,
    Hills,
}

impl Relief {
    const ALL: [(Relief, &'static str, i32); 4] = [
        (Relief::Flatten, "Ocean_Flatten", 11),
        (Relief::Dunes, "Desert_Dunes", 23),
        (Relief::Peaks, "Volcano_Peaks", 37),
        (Relief::Hills, "Forest_Hills", 41),
    ];

    fn frequency(self) -> f32 {
        match self {
            Relief::Flatten => 1.0,
            Relief::Dunes => 9.0,
            Relief::Peaks => 3.0,
            Relief::Hills => 4.5,
        }
    }

    /// Displacement along the normal, in units of `relief * radius`.
    fn height(self, n: f32) -> f32 {
        match self {
            Relief::Flatten => -0.5 - 0.1 * n,
            Relief::Dunes => 0.3 * (1.0 - n.abs()),
            Relief::Peaks => 2.0 * n.max(0.0).powi(2) + 0.2,
            Relief::Hills => 0.5 * (n * 0.5 + 0.5),
        }
    }
}

fn noise_for(seed: i32, frequency: f32) -> FastNoiseLite {
    let mut noise = FastNoiseLite::with_seed(seed);
    noise.set_noise_type(Some(NoiseType::OpenSimplex2));
    noise.set_frequency(Some(frequency));
    noise
}

fn fbm3(noise: &FastNoiseLite, p: Vec3, octaves: u32) -> f32 {
    let mut amp = 1.0_f32;
    let mut freq = 1.0_f32;
    let mut sum = 0.0_f32;
    let mut max_amp = 0.0_f32;
    for _ in 0..octaves.max(1) {
        sum += noise.get_noise_3d(p.x * freq, p.y * freq, p.z * freq) * amp;
        max_amp += amp;
        amp *= 0.5;
        freq *= 2.0;
    }
    sum / max_amp
}

/// Terrain mesh. The morph map is left for the caller to attach.
pub fn planet_mesh(cfg: &DemoConfig, map: MorphTargetIndexMap) -> SourceMesh {
    let radius = cfg.radius.max(f32::EPSILON);
    let (pos, indices) = icosphere(cfg.subdivisions, radius);
    let mut mesh = SourceMesh::new(PLANET_MESH, pos, Some(indices), MeshRole::Terrain { map });
    let amplitude = cfg.relief * radius;

    for (relief, name, salt) in Relief::ALL {
        let noise = noise_for(cfg.seed.wrapping_add(salt), relief.frequency());
        let offsets = (0..mesh.vertex_count())
            .flat_map(|i| {
                let n = mesh.vertex(i).normalized();
                let h = relief.height(fbm3(&noise, n, 3));
                (n * (h * amplitude)).to_array()
            })
            .collect();
        mesh.morph_targets.push(MorphTarget {
            name: name.to_string(),
            offsets,
        });
    }
    mesh
}

pub fn morph_target_names() -> Vec<&'static str> {
    Relief::ALL.iter().map(|(_, name, _)| *name).collect()
}

/// Points spread evenly over the unit sphere (golden-angle spiral).
pub fn fibonacci_sphere(count: u32) -> Vec<Vec3> {
    let golden = std::f32::consts::PI * (3.0 - 5f32.sqrt());
    (0..count)
        .map(|i| {
            let y = 1.0 - 2.0 * (i as f32 + 0.5) / count as f32;
            let r = (1.0 - y * y).max(0.0).sqrt();
            let theta = golden * i as f32;
            Vec3::new(theta.cos() * r, y, theta.sin() * r)
        })
        .collect()
}

/// One cone per foliage point, standing on the undisplaced sphere.
pub fn foliage_mesh(cfg: &DemoConfig) -> SourceMesh {
    let radius = cfg.radius.max(f32::EPSILON);
    let mut pos = Vec::new();
    for n in fibonacci_sphere(cfg.foliage_count) {
        for p in cone(n * radius, n, 0.015 * radius, 0.05 * radius, FOLIAGE_SEGMENTS) {
            pos.extend(p.to_array());
        }
    }
    SourceMesh::new(FOLIAGE_MESH, pos, None, MeshRole::Overlay { region: Region::Forest })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> DemoConfig {
        DemoConfig {
            subdivisions: 2,
            foliage_count: 10,
            ..DemoConfig::default()
        }
    }

    #[test]
    fn planet_has_one_target_per_region() {
        let names = morph_target_names();
        let mesh = planet_mesh(&small(), MorphTargetIndexMap::discover(&names));
        assert_eq!(mesh.morph_target_names(), names);
        assert!(mesh.validate().is_ok());
        let MeshRole::Terrain { map } = &mesh.role else {
            panic!("planet must be terrain");
        };
        for r in Region::ALL {
            assert!(map.has_region(r), "{r} target missing");
        }
    }

    #[test]
    fn ocean_target_sinks_the_surface() {
        let mesh = planet_mesh(&small(), MorphTargetIndexMap::default());
        let ocean = &mesh.morph_targets[0];
        for (i, o) in ocean.offsets.chunks_exact(3).enumerate() {
            let d = Vec3::new(o[0], o[1], o[2]).dot(mesh.vertex(i).normalized());
            assert!(d < 0.0);
        }
    }

    #[test]
    fn foliage_cones_are_disjoint() {
        let mesh = foliage_mesh(&small());
        let corners: Vec<Vec3> = (0..mesh.vertex_count()).map(|i| mesh.vertex(i)).collect();
        assert_eq!(gaia_bake::find_islands(&corners).len(), 10);
    }

    #[test]
    fn fibonacci_points_are_unit() {
        for p in fibonacci_sphere(50) {
            assert!((p.length() - 1.0).abs() < 1e-5);
        }
    }
}
