use serde::{Deserialize, Serialize};

use crate::region::Region;

pub const SLIDER_COUNT: usize = 5;
pub const SLIDER_MIN: f32 = 0.0;
pub const SLIDER_MAX: f32 = 100.0;
pub const SLIDER_NEUTRAL: f32 = 50.0;

/// Personality axis behind each slider slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    Agreeableness = 0,
    Sociability = 1,
    Persistence = 2,
    Curiosity = 3,
    Relaxation = 4,
}

impl Axis {
    pub const ALL: [Axis; SLIDER_COUNT] = [
        Axis::Agreeableness,
        Axis::Sociability,
        Axis::Persistence,
        Axis::Curiosity,
        Axis::Relaxation,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// The five quiz sliders, each in `[0, 100]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; SLIDER_COUNT]", into = "[f32; SLIDER_COUNT]")]
pub struct SliderVector([f32; SLIDER_COUNT]);

impl SliderVector {
    /// Clamps every value into range; non-finite values fall back to neutral.
    pub fn new(values: [f32; SLIDER_COUNT]) -> Self {
        Self(values.map(clamp_slider))
    }

    pub const fn neutral() -> Self {
        Self([SLIDER_NEUTRAL; SLIDER_COUNT])
    }

    #[inline]
    pub fn get(&self, axis: Axis) -> f32 {
        self.0[axis.index()]
    }

    pub fn set(&mut self, axis: Axis, value: f32) {
        self.0[axis.index()] = clamp_slider(value);
    }

    #[inline]
    pub fn values(&self) -> [f32; SLIDER_COUNT] {
        self.0
    }

    /// Sliders scaled to `[0, 1]`, the form the GPU receives.
    pub fn normalized(&self) -> [f32; SLIDER_COUNT] {
        self.0.map(|v| v / SLIDER_MAX)
    }

    pub fn is_neutral(&self) -> bool {
        self.0.iter().all(|&v| v == SLIDER_NEUTRAL)
    }
}

impl Default for SliderVector {
    fn default() -> Self {
        Self::neutral()
    }
}

impl From<[f32; SLIDER_COUNT]> for SliderVector {
    fn from(values: [f32; SLIDER_COUNT]) -> Self {
        SliderVector::new(values)
    }
}

impl From<SliderVector> for [f32; SLIDER_COUNT] {
    fn from(s: SliderVector) -> Self {
        s.0
    }
}

fn clamp_slider(v: f32) -> f32 {
    if v.is_finite() {
        v.clamp(SLIDER_MIN, SLIDER_MAX)
    } else {
        SLIDER_NEUTRAL
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SliderHalf {
    Low,
    High,
}

/// Intensities of the two regions sharing one slider.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PairIntensity {
    pub low: f32,
    pub high: f32,
}

impl PairIntensity {
    #[inline]
    pub fn get(&self, half: SliderHalf) -> f32 {
        match half {
            SliderHalf::Low => self.low,
            SliderHalf::High => self.high,
        }
    }
}

/// Splits one slider value at the midpoint into complementary intensities.
///
/// Evaluated on the normalized value so the result matches the GPU bit for bit.
pub fn split_slider(s: f32) -> PairIntensity {
    split_normalized(clamp_slider(s) / SLIDER_MAX)
}

#[inline]
pub(crate) fn split_normalized(s: f32) -> PairIntensity {
    PairIntensity {
        low: if s < 0.5 { (0.5 - s) * 2.0 } else { 0.0 },
        high: if s > 0.5 { (s - 0.5) * 2.0 } else { 0.0 },
    }
}

/// Per-region intensity derived from the sliders.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RegionIntensities {
    pub desert: f32,
    pub ocean: f32,
    pub volcano: f32,
    pub forest: f32,
}

impl RegionIntensities {
    pub fn from_sliders(sliders: &SliderVector) -> Self {
        let normalized = sliders.normalized();
        let of = |r: Region| split_normalized(normalized[r.axis().index()]).get(r.half());
        Self {
            desert: of(Region::Desert),
            ocean: of(Region::Ocean),
            volcano: of(Region::Volcano),
            forest: of(Region::Forest),
        }
    }

    #[inline]
    pub fn get(&self, region: Region) -> f32 {
        match region {
            Region::Desert => self.desert,
            Region::Ocean => self.ocean,
            Region::Volcano => self.volcano,
            Region::Forest => self.forest,
        }
    }

    pub fn is_zero(&self) -> bool {
        Region::ALL.iter().all(|&r| self.get(r) == 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn midpoint_is_neutral() {
        assert_eq!(split_slider(50.0), PairIntensity { low: 0.0, high: 0.0 });
        assert!(RegionIntensities::from_sliders(&SliderVector::neutral()).is_zero());
    }

    #[test]
    fn extremes_are_full() {
        assert_eq!(split_slider(0.0), PairIntensity { low: 1.0, high: 0.0 });
        assert_eq!(split_slider(100.0), PairIntensity { low: 0.0, high: 1.0 });
    }

    #[test]
    fn full_ocean_and_full_forest() {
        let s = SliderVector::new([100.0, 100.0, 50.0, 50.0, 50.0]);
        let i = RegionIntensities::from_sliders(&s);
        assert_eq!(i.ocean, 1.0);
        assert_eq!(i.volcano, 0.0);
        assert_eq!(i.forest, 1.0);
        assert_eq!(i.desert, 0.0);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let s = SliderVector::new([-20.0, 140.0, f32::NAN, f32::INFINITY, 33.0]);
        assert_eq!(s.values(), [0.0, 100.0, 50.0, 50.0, 33.0]);
    }

    proptest! {
        #[test]
        fn at_most_one_half_active(s in -10.0f32..110.0) {
            let p = split_slider(s);
            prop_assert!(p.low == 0.0 || p.high == 0.0);
            prop_assert!((0.0..=1.0).contains(&p.low));
            prop_assert!((0.0..=1.0).contains(&p.high));
        }

        #[test]
        fn complementary_regions_never_coexist(a in 0.0f32..=100.0, b in 0.0f32..=100.0) {
            let i = RegionIntensities::from_sliders(&SliderVector::new([a, b, 50.0, 50.0, 50.0]));
            prop_assert!(i.volcano == 0.0 || i.ocean == 0.0);
            prop_assert!(i.desert == 0.0 || i.forest == 0.0);
        }
    }
}
