//! Procedural primitives used by the demo planet, tests and benches.

use gaia_geom::Vec3;
use hashbrown::HashMap;

/// Indexed icosphere. Returns flat `xyz` positions and a triangle list.
pub fn icosphere(subdivisions: u32, radius: f32) -> (Vec<f32>, Vec<u32>) {
    let t = (1.0 + 5f32.sqrt()) / 2.0;
    let mut verts: Vec<Vec3> = [
        (-1.0, t, 0.0),
        (1.0, t, 0.0),
        (-1.0, -t, 0.0),
        (1.0, -t, 0.0),
        (0.0, -1.0, t),
        (0.0, 1.0, t),
        (0.0, -1.0, -t),
        (0.0, 1.0, -t),
        (t, 0.0, -1.0),
        (t, 0.0, 1.0),
        (-t, 0.0, -1.0),
        (-t, 0.0, 1.0),
    ]
    .iter()
    .map(|&(x, y, z)| Vec3::new(x, y, z).normalized())
    .collect();

    let mut faces: Vec<[u32; 3]> = vec![
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];

    for _ in 0..subdivisions {
        let mut mid: HashMap<(u32, u32), u32> = HashMap::new();
        let mut midpoint = |a: u32, b: u32, verts: &mut Vec<Vec3>| -> u32 {
            let key = if a < b { (a, b) } else { (b, a) };
            *mid.entry(key).or_insert_with(|| {
                let p = ((verts[a as usize] + verts[b as usize]) * 0.5).normalized();
                verts.push(p);
                (verts.len() - 1) as u32
            })
        };
        let mut next = Vec::with_capacity(faces.len() * 4);
        for [a, b, c] in faces {
            let ab = midpoint(a, b, &mut verts);
            let bc = midpoint(b, c, &mut verts);
            let ca = midpoint(c, a, &mut verts);
            next.extend([[a, ab, ca], [b, bc, ab], [c, ca, bc], [ab, bc, ca]]);
        }
        faces = next;
    }

    let pos = verts
        .iter()
        .flat_map(|v| (*v * radius).to_array())
        .collect();
    let indices = faces.into_iter().flatten().collect();
    (pos, indices)
}

/// Closed cone as a triangle soup: `segments` side triangles plus a base fan.
pub fn cone(base: Vec3, axis: Vec3, radius: f32, height: f32, segments: u32) -> Vec<Vec3> {
    let up = axis.normalized();
    let helper = if up.y.abs() < 0.9 { Vec3::UP } else { Vec3::new(1.0, 0.0, 0.0) };
    let u = up.cross(helper).normalized();
    let v = up.cross(u);
    let tip = base + up * height;
    let segments = segments.max(3);
    let ring: Vec<Vec3> = (0..segments)
        .map(|i| {
            let a = i as f32 / segments as f32 * std::f32::consts::TAU;
            base + u * (a.cos() * radius) + v * (a.sin() * radius)
        })
        .collect();

    let mut out = Vec::with_capacity(segments as usize * 6);
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[(i + 1) % ring.len()];
        out.extend([a, b, tip]);
        out.extend([b, a, base]);
    }
    out
}
