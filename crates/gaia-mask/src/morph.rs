use std::collections::BTreeMap;

use thiserror::Error;

use crate::compose::RegionWeights;
use crate::region::Region;
use crate::slider::RegionIntensities;

/// Morph slots the GPU program can drive.
pub const MAX_MORPH_SLOTS: usize = 8;

/// Slot code meaning "this morph target belongs to no region".
pub const NO_REGION: i32 = -1;

// Checked in this order; the first key found in a target name wins.
const DISCOVERY_ORDER: [Region; 4] = [Region::Ocean, Region::Desert, Region::Volcano, Region::Forest];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MorphMapError {
    #[error("declared morph target `{0}` does not exist on the mesh")]
    UnknownTarget(String),
    #[error("morph target `{name}` sits in slot {slot}, beyond the {max} drivable slots")]
    SlotOutOfRange { name: String, slot: usize, max: usize },
    #[error("morph target `{name}` is mapped to unknown region `{region}`")]
    UnknownRegion { name: String, region: String },
}

/// Which region (if any) drives each morph target of one mesh.
///
/// Built once when a mesh is loaded and read-only afterwards.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MorphTargetIndexMap {
    regions: Vec<Option<Region>>,
}

impl MorphTargetIndexMap {
    /// Matches region keys (`ocean`, `desert`, `volcan`, `forest`) as
    /// case-insensitive substrings of the target names. Targets that match
    /// nothing stay undriven.
    pub fn discover<S: AsRef<str>>(names: &[S]) -> Self {
        let mut map = Self::default();
        for (slot, name) in names.iter().enumerate() {
            let name = name.as_ref();
            let lower = name.to_ascii_lowercase();
            let region = DISCOVERY_ORDER
                .into_iter()
                .find(|r| lower.contains(r.name_key()));
            match region {
                Some(r) if slot >= MAX_MORPH_SLOTS => {
                    log::warn!(target: "morph", "target `{}` ({}) in slot {} cannot be driven", name, r, slot);
                }
                Some(r) => log::debug!(target: "morph", "target `{}` -> {} (slot {})", name, r, slot),
                None => log::debug!(target: "morph", "target `{}` has no region", name),
            }
            map.regions.push(region);
        }
        map
    }

    /// Uses an explicit `target name -> region name` table instead of
    /// substring matching. Every entry is validated here, once.
    pub fn declared<S: AsRef<str>>(
        names: &[S],
        mapping: &BTreeMap<String, String>,
    ) -> Result<Self, MorphMapError> {
        let names: Vec<String> = names.iter().map(|n| n.as_ref().to_string()).collect();
        let mut regions = vec![None; names.len()];
        for (target, region_name) in mapping {
            let slot = names
                .iter()
                .position(|n| n == target)
                .ok_or_else(|| MorphMapError::UnknownTarget(target.clone()))?;
            if slot >= MAX_MORPH_SLOTS {
                return Err(MorphMapError::SlotOutOfRange {
                    name: target.clone(),
                    slot,
                    max: MAX_MORPH_SLOTS,
                });
            }
            let region = Region::from_name(region_name).ok_or_else(|| MorphMapError::UnknownRegion {
                name: target.clone(),
                region: region_name.clone(),
            })?;
            regions[slot] = Some(region);
        }
        Ok(Self { regions })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Region of slot `j`; `None` for undriven or non-drivable slots.
    pub fn region(&self, j: usize) -> Option<Region> {
        if j >= MAX_MORPH_SLOTS {
            return None;
        }
        self.regions.get(j).copied().flatten()
    }

    pub fn has_region(&self, region: Region) -> bool {
        (0..self.len()).any(|j| self.region(j) == Some(region))
    }

    /// Region codes per slot as uploaded to `uIndices`; unused slots are -1.
    pub fn slot_codes(&self) -> [i32; MAX_MORPH_SLOTS] {
        let mut codes = [NO_REGION; MAX_MORPH_SLOTS];
        for (j, code) in codes.iter_mut().enumerate() {
            if let Some(r) = self.region(j) {
                *code = r.code();
            }
        }
        codes
    }

    /// Masked influence of every morph target at one point.
    pub fn influences(&self, weights: &RegionWeights, boost: f32) -> Vec<f32> {
        (0..self.len())
            .map(|j| self.region(j).map_or(0.0, |r| weights.get(r) * boost))
            .collect()
    }

    /// 1 for every slot whose region currently has non-zero intensity.
    pub fn active_flags(&self, intensities: &RegionIntensities) -> Vec<f32> {
        (0..self.len())
            .map(|j| match self.region(j) {
                Some(r) if intensities.get(r) > 0.0 => 1.0,
                _ => 0.0,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovers_by_substring() {
        let m = MorphTargetIndexMap::discover(&["Ocean_Flatten", "bulge", "VOLCANIC", "desert.001"]);
        assert_eq!(m.slot_codes(), [1, -1, 2, 0, -1, -1, -1, -1]);
        assert!(!m.has_region(Region::Forest));
    }

    #[test]
    fn slots_past_eight_are_not_driven() {
        let names: Vec<String> = (0..10).map(|i| format!("forest_{i}")).collect();
        let m = MorphTargetIndexMap::discover(&names);
        let w = RegionWeights {
            forest: 0.5,
            ..RegionWeights::ZERO
        };
        let inf = m.influences(&w, 2.0);
        assert_eq!(inf.len(), 10);
        assert_eq!(inf[7], 1.0);
        assert_eq!(inf[8], 0.0);
        assert_eq!(inf[9], 0.0);
    }

    #[test]
    fn declared_mapping_is_validated() {
        let names = ["a", "b"];
        let mut mapping = BTreeMap::new();
        mapping.insert("b".to_string(), "volcan".to_string());
        let m = MorphTargetIndexMap::declared(&names, &mapping).unwrap();
        assert_eq!(m.region(1), Some(Region::Volcano));
        assert_eq!(m.region(0), None);

        mapping.insert("c".to_string(), "ocean".to_string());
        assert_eq!(
            MorphTargetIndexMap::declared(&names, &mapping),
            Err(MorphMapError::UnknownTarget("c".into()))
        );

        let mut bad = BTreeMap::new();
        bad.insert("a".to_string(), "tundra".to_string());
        assert!(matches!(
            MorphTargetIndexMap::declared(&names, &bad),
            Err(MorphMapError::UnknownRegion { .. })
        ));
    }

    #[test]
    fn active_flags_follow_intensity() {
        let m = MorphTargetIndexMap::discover(&["ocean", "volcano", "misc"]);
        let i = RegionIntensities {
            ocean: 0.4,
            ..RegionIntensities::default()
        };
        assert_eq!(m.active_flags(&i), vec![1.0, 0.0, 0.0]);
    }
}
