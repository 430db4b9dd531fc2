//! 3D simplex noise shared by the GPU programs and the CPU baker.
//!
//! `snoise3` is a line-for-line host port of [`SNOISE_GLSL`] (the Ashima
//! Arts / Stefan Gustavson lattice and permutation scheme). Both sides run in
//! single precision with the same operation order so a baked mesh lands on the
//! same terrain boundaries as the live preview. Change one, change both.
#![forbid(unsafe_code)]

use gaia_geom::Vec3;

/// GLSL source of `snoise(vec3)`, injected verbatim into every planet program.
pub const SNOISE_GLSL: &str = r#"
vec3 mod289(vec3 x) { return x - floor(x * (1.0 / 289.0)) * 289.0; }
vec4 mod289(vec4 x) { return x - floor(x * (1.0 / 289.0)) * 289.0; }
vec4 permute(vec4 x) { return mod289(((x * 34.0) + 1.0) * x); }
vec4 taylorInvSqrt(vec4 r) { return 1.79284291400159 - 0.85373472095314 * r; }
float snoise(vec3 v) {
    const vec2 C = vec2(1.0 / 6.0, 1.0 / 3.0);
    const vec4 D = vec4(0.0, 0.5, 1.0, 2.0);
    vec3 i = floor(v + dot(v, C.yyy));
    vec3 x0 = v - i + dot(i, C.xxx);
    vec3 g = step(x0.yzx, x0.xyz);
    vec3 l = 1.0 - g;
    vec3 i1 = min(g.xyz, l.zxy);
    vec3 i2 = max(g.xyz, l.zxy);
    vec3 x1 = x0 - i1 + C.xxx;
    vec3 x2 = x0 - i2 + C.yyy;
    vec3 x3 = x0 - D.yyy;
    i = mod289(i);
    vec4 p = permute(permute(permute(
        i.z + vec4(0.0, i1.z, i2.z, 1.0))
        + i.y + vec4(0.0, i1.y, i2.y, 1.0))
        + i.x + vec4(0.0, i1.x, i2.x, 1.0));
    float n_ = 0.142857142857;
    vec3 ns = n_ * D.wyz - D.xzx;
    vec4 j = p - 49.0 * floor(p * ns.z * ns.z);
    vec4 x_ = floor(j * ns.z);
    vec4 y_ = floor(j - 7.0 * x_);
    vec4 x = x_ * ns.x + ns.yyyy;
    vec4 y = y_ * ns.x + ns.yyyy;
    vec4 h = 1.0 - abs(x) - abs(y);
    vec4 b0 = vec4(x.xy, y.xy);
    vec4 b1 = vec4(x.zw, y.zw);
    vec4 s0 = floor(b0) * 2.0 + 1.0;
    vec4 s1 = floor(b1) * 2.0 + 1.0;
    vec4 sh = -step(h, vec4(0.0));
    vec4 a0 = b0.xzyw + s0.xzyw * sh.xxyy;
    vec4 a1 = b1.xzyw + s1.xzyw * sh.zzww;
    vec3 p0 = vec3(a0.xy, h.x);
    vec3 p1 = vec3(a0.zw, h.y);
    vec3 p2 = vec3(a1.xy, h.z);
    vec3 p3 = vec3(a1.zw, h.w);
    vec4 norm = taylorInvSqrt(vec4(dot(p0, p0), dot(p1, p1), dot(p2, p2), dot(p3, p3)));
    p0 *= norm.x;
    p1 *= norm.y;
    p2 *= norm.z;
    p3 *= norm.w;
    vec4 m = max(0.6 - vec4(dot(x0, x0), dot(x1, x1), dot(x2, x2), dot(x3, x3)), 0.0);
    m = m * m;
    return 42.0 * dot(m * m, vec4(dot(p0, x0), dot(p1, x1), dot(p2, x2), dot(p3, x3)));
}
"#;

type V4 = [f32; 4];

#[inline]
fn mod289(x: f32) -> f32 {
    x - (x * (1.0 / 289.0)).floor() * 289.0
}

#[inline]
fn permute(x: V4) -> V4 {
    x.map(|v| mod289((v * 34.0 + 1.0) * v))
}

#[inline]
fn taylor_inv_sqrt(r: f32) -> f32 {
    1.792_842_914_001_59 - 0.853_734_720_953_14 * r
}

/// GLSL `step(edge, x)`.
#[inline]
fn step(edge: f32, x: f32) -> f32 {
    if x < edge { 0.0 } else { 1.0 }
}

#[inline]
fn add4(a: V4, s: f32) -> V4 {
    a.map(|v| v + s)
}

#[inline]
fn dot4(a: V4, b: V4) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2] + a[3] * b[3]
}

/// Simplex noise in roughly `[-1, 1]`. Pure function of `v`.
pub fn snoise3(v: Vec3) -> f32 {
    const CX: f32 = 1.0 / 6.0;
    const CY: f32 = 1.0 / 3.0;

    // Skew into the simplex grid and find the containing cell.
    let i = (v + Vec3::splat(v.dot(Vec3::splat(CY)))).floor();
    let x0 = v - i + Vec3::splat(i.dot(Vec3::splat(CX)));

    // Rank the corner offsets.
    let g = Vec3::new(step(x0.y, x0.x), step(x0.z, x0.y), step(x0.x, x0.z));
    let l = Vec3::ONE - g;
    let i1 = Vec3::new(g.x.min(l.z), g.y.min(l.x), g.z.min(l.y));
    let i2 = Vec3::new(g.x.max(l.z), g.y.max(l.x), g.z.max(l.y));

    let x1 = x0 - i1 + Vec3::splat(CX);
    let x2 = x0 - i2 + Vec3::splat(CY);
    let x3 = x0 - Vec3::splat(0.5);

    let i = Vec3::new(mod289(i.x), mod289(i.y), mod289(i.z));
    let pz = permute(add4([0.0, i1.z, i2.z, 1.0], i.z));
    // GLSL associates as (p + i.y) + offsets.
    let py = permute([
        pz[0] + i.y + 0.0,
        pz[1] + i.y + i1.y,
        pz[2] + i.y + i2.y,
        pz[3] + i.y + 1.0,
    ]);
    let p = permute([
        py[0] + i.x + 0.0,
        py[1] + i.x + i1.x,
        py[2] + i.x + i2.x,
        py[3] + i.x + 1.0,
    ]);

    // Gradients: 7x7 points over a square, mapped onto an octahedron.
    let n_: f32 = 0.142_857_142_857;
    let ns = Vec3::new(n_ * 2.0 - 0.0, n_ * 0.5 - 1.0, n_ * 1.0 - 0.0);

    let j = p.map(|v| v - 49.0 * (v * ns.z * ns.z).floor());
    let x_ = j.map(|v| (v * ns.z).floor());
    let y_ = [
        (j[0] - 7.0 * x_[0]).floor(),
        (j[1] - 7.0 * x_[1]).floor(),
        (j[2] - 7.0 * x_[2]).floor(),
        (j[3] - 7.0 * x_[3]).floor(),
    ];
    let x = x_.map(|v| v * ns.x + ns.y);
    let y = y_.map(|v| v * ns.x + ns.y);
    let h = [
        1.0 - x[0].abs() - y[0].abs(),
        1.0 - x[1].abs() - y[1].abs(),
        1.0 - x[2].abs() - y[2].abs(),
        1.0 - x[3].abs() - y[3].abs(),
    ];

    let b0 = [x[0], x[1], y[0], y[1]];
    let b1 = [x[2], x[3], y[2], y[3]];
    let s0 = b0.map(|v| v.floor() * 2.0 + 1.0);
    let s1 = b1.map(|v| v.floor() * 2.0 + 1.0);
    let sh = h.map(|v| -step(v, 0.0));

    // a0 = b0.xzyw + s0.xzyw * sh.xxyy
    let a0 = [
        b0[0] + s0[0] * sh[0],
        b0[2] + s0[2] * sh[0],
        b0[1] + s0[1] * sh[1],
        b0[3] + s0[3] * sh[1],
    ];
    // a1 = b1.xzyw + s1.xzyw * sh.zzww
    let a1 = [
        b1[0] + s1[0] * sh[2],
        b1[2] + s1[2] * sh[2],
        b1[1] + s1[1] * sh[3],
        b1[3] + s1[3] * sh[3],
    ];

    let p0 = Vec3::new(a0[0], a0[1], h[0]);
    let p1 = Vec3::new(a0[2], a0[3], h[1]);
    let p2 = Vec3::new(a1[0], a1[1], h[2]);
    let p3 = Vec3::new(a1[2], a1[3], h[3]);

    let p0 = p0 * taylor_inv_sqrt(p0.dot(p0));
    let p1 = p1 * taylor_inv_sqrt(p1.dot(p1));
    let p2 = p2 * taylor_inv_sqrt(p2.dot(p2));
    let p3 = p3 * taylor_inv_sqrt(p3.dot(p3));

    let m = [
        (0.6 - x0.dot(x0)).max(0.0),
        (0.6 - x1.dot(x1)).max(0.0),
        (0.6 - x2.dot(x2)).max(0.0),
        (0.6 - x3.dot(x3)).max(0.0),
    ];
    let m = m.map(|v| v * v);
    let m4 = m.map(|v| v * v);
    42.0 * dot4(m4, [p0.dot(x0), p1.dot(x1), p2.dot(x2), p3.dot(x3)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn varies_across_space() {
        let samples: Vec<f32> = (0..16)
            .map(|k| snoise3(Vec3::new(k as f32 * 0.37, 1.3, -0.2 * k as f32)))
            .collect();
        let lo = samples.iter().cloned().fold(f32::INFINITY, f32::min);
        let hi = samples.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        assert!(hi - lo > 0.1);
    }

    #[test]
    fn glsl_chunk_defines_snoise() {
        assert!(SNOISE_GLSL.contains("float snoise(vec3 v)"));
        assert!(SNOISE_GLSL.contains("0.142857142857"));
    }

    proptest! {
        #[test]
        fn deterministic(x in -500.0f32..500.0, y in -500.0f32..500.0, z in -500.0f32..500.0) {
            let p = Vec3::new(x, y, z);
            prop_assert_eq!(snoise3(p).to_bits(), snoise3(p).to_bits());
        }

        #[test]
        fn bounded(x in -500.0f32..500.0, y in -500.0f32..500.0, z in -500.0f32..500.0) {
            let n = snoise3(Vec3::new(x, y, z));
            prop_assert!(n.is_finite());
            prop_assert!(n.abs() <= 1.1, "noise {} out of range", n);
        }

        // Small steps produce small changes
        #[test]
        fn continuous(x in -50.0f32..50.0, y in -50.0f32..50.0, z in -50.0f32..50.0) {
            let p = Vec3::new(x, y, z);
            let d = (snoise3(p) - snoise3(p + Vec3::splat(1e-3))).abs();
            prop_assert!(d < 0.05, "jump {} at {:?}", d, p);
        }
    }
}
