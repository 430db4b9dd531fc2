use gaia_geom::Vec3;
use gaia_noise::snoise3;
use serde::{Deserialize, Serialize};

/// Constants of the growth threshold, shared by the GPU programs and the baker.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskParams {
    /// Frequency of the noise sampled on the unit sphere.
    pub noise_frequency: f32,
    /// How much noise is mixed into the seed gradient.
    pub noise_weight: f32,
    /// Threshold at zero intensity.
    pub threshold_base: f32,
    /// How far the threshold slides down as intensity goes to one.
    pub threshold_slope: f32,
    /// Width of the smoothstep band at the region boundary.
    pub edge: f32,
    /// Gain applied to composed weights before they drive morph targets.
    pub morph_boost: f32,
}

impl Default for MaskParams {
    fn default() -> Self {
        Self {
            noise_frequency: 3.5,
            noise_weight: 0.15,
            threshold_base: 1.05,
            threshold_slope: 1.10,
            edge: 0.05,
            morph_boost: 1.8,
        }
    }
}

impl MaskParams {
    /// Replaces non-finite values, and a non-positive slope or edge, with the defaults.
    pub fn sanitized(self) -> Self {
        let d = MaskParams::default();
        let pick = |v: f32, fallback: f32, positive: bool| {
            if !v.is_finite() || (positive && v <= 0.0) {
                log::warn!("mask parameter {} rejected, using {}", v, fallback);
                fallback
            } else {
                v
            }
        };
        Self {
            noise_frequency: pick(self.noise_frequency, d.noise_frequency, false),
            noise_weight: pick(self.noise_weight, d.noise_weight, false).clamp(0.0, 1.0),
            threshold_base: pick(self.threshold_base, d.threshold_base, false),
            threshold_slope: pick(self.threshold_slope, d.threshold_slope, true),
            edge: pick(self.edge, d.edge, true),
            morph_boost: pick(self.morph_boost, d.morph_boost, false),
        }
    }
}

/// GLSL `mix`.
#[inline]
pub fn mix(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

/// GLSL `smoothstep`.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// How strongly `pos` belongs to the region growing out of `seed`.
///
/// The seed gradient is linear in the cosine between `pos` and `seed`, so a
/// region closes at the antipode as sharply as it opens at the seed. Noise is
/// sampled on the unit sphere and remapped to `[0, 1]` before mixing.
/// Intensity at or below zero (or NaN) yields exactly 0; at or above one, exactly 1.
pub fn growth_alpha(pos: Vec3, seed: Vec3, intensity: f32, params: &MaskParams) -> f32 {
    if !(intensity > 0.0) {
        return 0.0;
    }
    if intensity >= 1.0 {
        return 1.0;
    }

    let p = pos.normalized();
    let align = p.dot(seed.normalized());
    let grad = align * 0.5 + 0.5;
    let noise = snoise3(p * params.noise_frequency) * 0.5 + 0.5;
    let growth = mix(grad, noise, params.noise_weight);

    let threshold = params.threshold_base - intensity * params.threshold_slope;
    smoothstep(threshold, threshold + params.edge, growth)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_circuits_at_the_domain_boundary() {
        let p = MaskParams::default();
        let pos = Vec3::new(0.3, -0.2, 0.9);
        assert_eq!(growth_alpha(pos, Vec3::UP, 0.0, &p), 0.0);
        assert_eq!(growth_alpha(pos, Vec3::UP, -3.0, &p), 0.0);
        assert_eq!(growth_alpha(pos, Vec3::UP, f32::NAN, &p), 0.0);
        assert_eq!(growth_alpha(pos, Vec3::UP, 1.0, &p), 1.0);
        assert_eq!(growth_alpha(pos, Vec3::UP, 7.0, &p), 1.0);
    }

    #[test]
    fn position_scale_is_irrelevant() {
        let p = MaskParams::default();
        let pos = Vec3::new(0.4, 0.7, -0.1);
        let a = growth_alpha(pos, Vec3::UP, 0.6, &p);
        let b = growth_alpha(pos * 25.0, Vec3::UP, 0.6, &p);
        assert!((a - b).abs() < 1e-5);
    }

    #[test]
    fn smoothstep_matches_glsl() {
        assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
        assert_eq!(smoothstep(0.0, 1.0, 0.5), 0.5);
        assert_eq!(mix(2.0, 4.0, 0.25), 2.5);
    }

    #[test]
    fn sanitized_rejects_zero_edge() {
        let p = MaskParams { edge: 0.0, noise_weight: 3.0, ..MaskParams::default() }.sanitized();
        assert_eq!(p.edge, MaskParams::default().edge);
        assert_eq!(p.noise_weight, 1.0);
    }

    #[test]
    fn sanitized_rejects_non_positive_slope() {
        for slope in [0.0, -0.3] {
            let p = MaskParams { threshold_base: 0.5, threshold_slope: slope, ..MaskParams::default() }.sanitized();
            assert_eq!(p.threshold_slope, MaskParams::default().threshold_slope);
            let pos = Vec3::new(0.7, 0.3, 0.6);
            let mut last = 0.0;
            for i in 0..=10 {
                let a = growth_alpha(pos, Vec3::UP, i as f32 / 10.0, &p);
                assert!(a >= last, "alpha fell from {last} to {a}");
                last = a;
            }
        }
    }
}
