//! Connected triangle groups in a triangle soup.

use gaia_geom::Vec3;
use hashbrown::HashMap;

/// Positions closer than this many decimals are treated as one vertex.
///
/// Too coarse merges neighbouring pieces, too fine splits pieces that went
/// through a transform.
pub const POSITION_KEY_DECIMALS: i32 = 4;

pub(crate) type PosKey = (i64, i64, i64);

/// Rounded position used to weld coincident corners.
pub(crate) fn pos_key(p: Vec3) -> PosKey {
    let scale = 10f32.powi(POSITION_KEY_DECIMALS);
    (
        (p.x * scale).round() as i64,
        (p.y * scale).round() as i64,
        (p.z * scale).round() as i64,
    )
}

/// Triangles (indices into the soup, `corner / 3`) that share vertices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Island {
    pub triangles: Vec<usize>,
}

struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        while self.parent[x] != root {
            let next = self.parent[x];
            self.parent[x] = root;
            x = next;
        }
        root
    }

    fn union(&mut self, x: usize, y: usize) {
        let rx = self.find(x);
        let ry = self.find(y);
        if rx == ry {
            return;
        }
        match self.rank[rx].cmp(&self.rank[ry]) {
            std::cmp::Ordering::Less => self.parent[rx] = ry,
            std::cmp::Ordering::Greater => self.parent[ry] = rx,
            std::cmp::Ordering::Equal => {
                self.parent[ry] = rx;
                self.rank[rx] += 1;
            }
        }
    }
}

/// Groups the triangles of a soup (three corners per triangle) into islands.
///
/// Islands come out ordered by their first triangle.
pub fn find_islands(corners: &[Vec3]) -> Vec<Island> {
    let tri_count = corners.len() / 3;
    if tri_count == 0 {
        return Vec::new();
    }

    let mut ids: HashMap<PosKey, usize> = HashMap::with_capacity(corners.len());
    let corner_ids: Vec<usize> = corners[..tri_count * 3]
        .iter()
        .map(|&p| {
            let next = ids.len();
            *ids.entry(pos_key(p)).or_insert(next)
        })
        .collect();

    let mut uf = UnionFind::new(ids.len());
    for tri in corner_ids.chunks_exact(3) {
        uf.union(tri[0], tri[1]);
        uf.union(tri[0], tri[2]);
    }

    let mut by_root: HashMap<usize, usize> = HashMap::new();
    let mut islands: Vec<Island> = Vec::new();
    for (t, tri) in corner_ids.chunks_exact(3).enumerate() {
        let root = uf.find(tri[0]);
        let slot = *by_root.entry(root).or_insert_with(|| {
            islands.push(Island {
                triangles: Vec::new(),
            });
            islands.len() - 1
        });
        islands[slot].triangles.push(t);
    }
    islands
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri(o: Vec3) -> [Vec3; 3] {
        [o, o + Vec3::new(1.0, 0.0, 0.0), o + Vec3::new(0.0, 1.0, 0.0)]
    }

    #[test]
    fn separate_triangles_are_separate_islands() {
        let mut soup = Vec::new();
        soup.extend(tri(Vec3::ZERO));
        soup.extend(tri(Vec3::new(5.0, 0.0, 0.0)));
        let islands = find_islands(&soup);
        assert_eq!(islands.len(), 2);
        assert_eq!(islands[0].triangles, vec![0]);
        assert_eq!(islands[1].triangles, vec![1]);
    }

    #[test]
    fn shared_edge_joins_islands() {
        let a = Vec3::ZERO;
        let b = Vec3::new(1.0, 0.0, 0.0);
        let c = Vec3::new(0.0, 1.0, 0.0);
        let d = Vec3::new(1.0, 1.0, 0.0);
        let islands = find_islands(&[a, b, c, b, d, c]);
        assert_eq!(islands.len(), 1);
        assert_eq!(islands[0].triangles, vec![0, 1]);
    }

    #[test]
    fn rounding_tolerates_transform_noise() {
        let a = Vec3::new(0.3, 0.1, 0.0);
        let jitter = Vec3::new(0.3 + 1e-6, 0.1 - 1e-6, 0.0);
        let mut soup = vec![a, Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)];
        soup.extend([jitter, Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 2.0, 0.0)]);
        assert_eq!(find_islands(&soup).len(), 1);
    }

    #[test]
    fn empty_soup_has_no_islands() {
        assert!(find_islands(&[]).is_empty());
    }
}
