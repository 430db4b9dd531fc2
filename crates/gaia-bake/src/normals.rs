use gaia_geom::Vec3;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::islands::{PosKey, pos_key};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalMode {
    /// Every corner gets its triangle's face normal.
    #[default]
    Flat,
    /// Area-weighted average of the face normals around each position.
    Smooth,
}

/// Unnormalized face normal; its length is twice the triangle area.
#[inline]
pub fn face_cross(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (b - a).cross(c - a)
}

/// Unit face normal, or zero for a degenerate triangle.
#[inline]
pub fn face_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    face_cross(a, b, c).normalized()
}

pub fn is_degenerate(a: Vec3, b: Vec3, c: Vec3) -> bool {
    face_cross(a, b, c).length_squared() <= f32::EPSILON * f32::EPSILON
}

/// One normal per corner of a triangle soup.
pub fn compute_normals(corners: &[Vec3], mode: NormalMode) -> Vec<Vec3> {
    match mode {
        NormalMode::Flat => corners
            .chunks_exact(3)
            .flat_map(|t| {
                let n = face_normal(t[0], t[1], t[2]);
                [n, n, n]
            })
            .collect(),
        NormalMode::Smooth => smooth_normals(corners),
    }
}

fn smooth_normals(corners: &[Vec3]) -> Vec<Vec3> {
    let mut acc: HashMap<PosKey, Vec3> = HashMap::with_capacity(corners.len());
    for t in corners.chunks_exact(3) {
        let n = face_cross(t[0], t[1], t[2]);
        for &p in t {
            *acc.entry(pos_key(p)).or_default() += n;
        }
    }
    corners
        .chunks_exact(3)
        .flat_map(|t| {
            let flat = face_normal(t[0], t[1], t[2]);
            t.iter()
                .map(|&p| {
                    let n = acc.get(&pos_key(p)).copied().unwrap_or(Vec3::ZERO).normalized();
                    if n == Vec3::ZERO { flat } else { n }
                })
                .collect::<Vec<_>>()
        })
        .collect()
}
