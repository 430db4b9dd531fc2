use gaia_geom::Vec3;
use serde::{Deserialize, Serialize};

use crate::slider::{Axis, SliderHalf};

/// Terrain regions that can claim part of the planet surface.
///
/// The discriminant is the region code shared with the GPU (`uIndices`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Desert = 0,
    Ocean = 1,
    Volcano = 2,
    Forest = 3,
}

impl Region {
    pub const ALL: [Region; 4] = [Region::Desert, Region::Ocean, Region::Volcano, Region::Forest];

    #[inline]
    pub const fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Region> {
        match code {
            0 => Some(Region::Desert),
            1 => Some(Region::Ocean),
            2 => Some(Region::Volcano),
            3 => Some(Region::Forest),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Region::Desert => "desert",
            Region::Ocean => "ocean",
            Region::Volcano => "volcano",
            Region::Forest => "forest",
        }
    }

    /// Substring looked for (case-insensitively) in morph target names.
    pub const fn name_key(self) -> &'static str {
        match self {
            Region::Desert => "desert",
            Region::Ocean => "ocean",
            Region::Volcano => "volcan",
            Region::Forest => "forest",
        }
    }

    /// Parses a region name as written in config files (`"volcan"` is accepted too).
    pub fn from_name(name: &str) -> Option<Region> {
        let lower = name.trim().to_ascii_lowercase();
        Region::ALL
            .into_iter()
            .find(|r| lower == r.name() || lower == r.name_key())
    }

    /// Slider that drives this region.
    pub const fn axis(self) -> Axis {
        match self {
            Region::Volcano | Region::Ocean => Axis::Agreeableness,
            Region::Desert | Region::Forest => Axis::Sociability,
        }
    }

    /// Which half of the slider domain grows this region.
    pub const fn half(self) -> SliderHalf {
        match self {
            Region::Volcano | Region::Desert => SliderHalf::Low,
            Region::Ocean | Region::Forest => SliderHalf::High,
        }
    }

    pub const fn seed(self) -> RegionSeed {
        match self {
            Region::Ocean | Region::Desert => RegionSeed::Top,
            Region::Volcano | Region::Forest => RegionSeed::Side,
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.name())
    }
}

/// Fixed anchor directions that regions grow out of.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RegionSeed {
    Top,
    Side,
    /// Not referenced by any region yet.
    Reserved,
}

impl RegionSeed {
    pub const ALL: [RegionSeed; 3] = [RegionSeed::Top, RegionSeed::Side, RegionSeed::Reserved];

    pub const fn direction(self) -> Vec3 {
        match self {
            RegionSeed::Top => Vec3::new(0.0, 1.0, 0.0),
            RegionSeed::Side => Vec3::new(0.8, -0.5, 0.3),
            RegionSeed::Reserved => Vec3::new(-0.8, -0.5, 0.3),
        }
    }

    /// Constant name used in generated GLSL.
    pub const fn glsl_name(self) -> &'static str {
        match self {
            RegionSeed::Top => "SEED_TOP",
            RegionSeed::Side => "SEED_SIDE",
            RegionSeed::Reserved => "SEED_RESERVED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for r in Region::ALL {
            assert_eq!(Region::from_code(r.code()), Some(r));
        }
        assert_eq!(Region::from_code(-1), None);
        assert_eq!(Region::from_code(4), None);
    }

    #[test]
    fn names_parse() {
        assert_eq!(Region::from_name("Volcan"), Some(Region::Volcano));
        assert_eq!(Region::from_name(" ocean "), Some(Region::Ocean));
        assert_eq!(Region::from_name("tundra"), None);
    }

    #[test]
    fn each_slider_pair_splits_low_and_high() {
        for axis in [Axis::Agreeableness, Axis::Sociability] {
            let halves: Vec<SliderHalf> = Region::ALL
                .into_iter()
                .filter(|r| r.axis() == axis)
                .map(|r| r.half())
                .collect();
            assert_eq!(halves.len(), 2);
            assert_ne!(halves[0], halves[1]);
        }
    }

    #[test]
    fn reserved_seed_is_unused() {
        assert!(Region::ALL.iter().all(|r| r.seed() != RegionSeed::Reserved));
    }
}
