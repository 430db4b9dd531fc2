use gaia_geom::Vec3;

use crate::growth::{MaskParams, growth_alpha};
use crate::region::Region;
use crate::slider::{RegionIntensities, SliderVector};

/// Raw growth alpha of every region at one point.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RegionAlphas {
    pub desert: f32,
    pub ocean: f32,
    pub volcano: f32,
    pub forest: f32,
}

impl RegionAlphas {
    pub fn sample(pos: Vec3, intensities: &RegionIntensities, params: &MaskParams) -> Self {
        let alpha = |r: Region| growth_alpha(pos, r.seed().direction(), intensities.get(r), params);
        Self {
            desert: alpha(Region::Desert),
            ocean: alpha(Region::Ocean),
            volcano: alpha(Region::Volcano),
            forest: alpha(Region::Forest),
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
}

/// Mutually exclusive region weights at one point.
///
/// Forest beats desert, and both beat the ocean/volcano pair. Reordering the
/// suppression terms changes which terrain wins where regions overlap.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RegionWeights {
    pub desert: f32,
    pub ocean: f32,
    pub volcano: f32,
    pub forest: f32,
}

impl RegionWeights {
    pub const ZERO: RegionWeights = RegionWeights {
        desert: 0.0,
        ocean: 0.0,
        volcano: 0.0,
        forest: 0.0,
    };

    pub fn compose(a: &RegionAlphas) -> Self {
        let not_forest = 1.0 - a.forest;
        let not_desert = 1.0 - a.desert;
        Self {
            forest: a.forest,
            desert: a.desert * not_forest,
            ocean: a.ocean * (1.0 - a.volcano) * not_desert * not_forest,
            volcano: a.volcano * (1.0 - a.ocean) * not_desert * not_forest,
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

    /// Weights indexed by region code.
    pub fn to_array(&self) -> [f32; 4] {
        [self.desert, self.ocean, self.volcano, self.forest]
    }

    pub fn is_zero(&self) -> bool {
        self.to_array().iter().all(|&w| w == 0.0)
    }
}

/// Frozen slider state ready to be sampled anywhere on the planet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainField {
    intensities: RegionIntensities,
    params: MaskParams,
}

impl TerrainField {
    pub fn new(sliders: &SliderVector, params: MaskParams) -> Self {
        Self {
            intensities: RegionIntensities::from_sliders(sliders),
            params,
        }
    }

    pub fn neutral() -> Self {
        Self::new(&SliderVector::neutral(), MaskParams::default())
    }

    #[inline]
    pub fn intensities(&self) -> &RegionIntensities {
        &self.intensities
    }

    #[inline]
    pub fn params(&self) -> &MaskParams {
        &self.params
    }

    /// No region can grow anywhere.
    pub fn is_neutral(&self) -> bool {
        self.intensities.is_zero()
    }

    pub fn alphas_at(&self, pos: Vec3) -> RegionAlphas {
        RegionAlphas::sample(pos, &self.intensities, &self.params)
    }

    pub fn weights_at(&self, pos: Vec3) -> RegionWeights {
        if self.is_neutral() {
            return RegionWeights::ZERO;
        }
        RegionWeights::compose(&self.alphas_at(pos))
    }
}
