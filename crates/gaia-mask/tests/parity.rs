//! Host noise and growth alpha against the shared parity vectors.

use gaia_geom::Vec3;
use gaia_mask::{MaskParams, RegionSeed, growth_alpha};
use gaia_noise::snoise3;
use serde::Deserialize;

const VECTORS: &str = include_str!("data/parity_vectors.toml");

#[derive(Deserialize)]
struct Vectors {
    noise: Vec<NoiseCase>,
    growth: Vec<GrowthCase>,
}

#[derive(Deserialize)]
struct NoiseCase {
    pos: [f32; 3],
    value: f32,
}

#[derive(Deserialize)]
struct GrowthCase {
    pos: [f32; 3],
    seed: String,
    intensity: f32,
    alpha: f32,
}

fn load() -> Vectors {
    toml::from_str(VECTORS).expect("parity vectors parse")
}

fn seed(name: &str) -> RegionSeed {
    match name {
        "top" => RegionSeed::Top,
        "side" => RegionSeed::Side,
        "reserved" => RegionSeed::Reserved,
        other => panic!("unknown seed {other}"),
    }
}

#[test]
fn noise_matches_vectors() {
    let v = load();
    assert!(!v.noise.is_empty());
    for case in &v.noise {
        let got = snoise3(Vec3::from_array(case.pos));
        assert!(
            (got - case.value).abs() <= 1e-4,
            "snoise3({:?}) = {}, expected {}",
            case.pos,
            got,
            case.value
        );
    }
}

#[test]
fn growth_matches_vectors() {
    let v = load();
    let params = MaskParams::default();
    let mut transitions = 0;
    for case in &v.growth {
        let got = growth_alpha(
            Vec3::from_array(case.pos),
            seed(&case.seed).direction(),
            case.intensity,
            &params,
        );
        assert!(
            (got - case.alpha).abs() <= 1e-3,
            "growth_alpha({:?}, {}, {}) = {}, expected {}",
            case.pos,
            case.seed,
            case.intensity,
            got,
            case.alpha
        );
        if case.alpha > 0.02 && case.alpha < 0.98 {
            transitions += 1;
        }
    }
    // The suite must exercise the smoothstep band, not only the flat ends.
    assert!(transitions >= 10);
}
