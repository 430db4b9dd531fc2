use gaia_bake::{BakeError, BakedMesh, MeshBaker, MeshRole, SourceMesh};
use gaia_mask::{MorphMapError, MorphTargetIndexMap, SliderVector, TerrainField};
use gaia_shader::MaterialState;

use crate::config::PlanetConfig;
use crate::demo;

/// First quiz section at which the foliage overlay is shown.
pub const FOLIAGE_SECTION: u32 = 2;

/// What the quiz hands the core each frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlanetInput {
    pub sliders: SliderVector,
    pub section: u32,
}

impl PlanetInput {
    pub fn new(sliders: SliderVector, section: u32) -> Self {
        Self { sliders, section }
    }
}

/// The meshes making up one planet, as loaded.
#[derive(Clone, Debug, Default)]
pub struct PlanetScene {
    pub meshes: Vec<SourceMesh>,
}

/// Slot map for `names`: declared when the config has a `[morph]` table,
/// discovered by name otherwise.
pub fn morph_map_for<S: AsRef<str>>(
    names: &[S],
    cfg: &PlanetConfig,
) -> Result<MorphTargetIndexMap, MorphMapError> {
    if cfg.morph.is_empty() {
        Ok(MorphTargetIndexMap::discover(names))
    } else {
        MorphTargetIndexMap::declared(names, &cfg.morph)
    }
}

impl PlanetScene {
    pub fn new(meshes: Vec<SourceMesh>) -> Self {
        Self { meshes }
    }

    /// Procedural planet and foliage built from `cfg.demo`.
    pub fn demo(cfg: &PlanetConfig) -> Result<Self, MorphMapError> {
        let map = morph_map_for(&demo::morph_target_names(), cfg)?;
        Ok(Self::new(vec![
            demo::planet_mesh(&cfg.demo, map),
            demo::foliage_mesh(&cfg.demo),
        ]))
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    pub fn mesh(&self, name: &str) -> Option<&SourceMesh> {
        self.meshes.iter().find(|m| m.name == name)
    }

    /// Slot map of the first terrain mesh.
    pub fn morph_map(&self) -> Option<&MorphTargetIndexMap> {
        self.meshes.iter().find_map(|m| match &m.role {
            MeshRole::Terrain { map } => Some(map),
            _ => None,
        })
    }

    pub fn material(&self, cfg: &PlanetConfig) -> MaterialState {
        MaterialState {
            palette: cfg.palette.clone(),
            morph: self.morph_map().cloned().unwrap_or_default(),
            has_desert_map: false,
            has_ocean_map: false,
        }
    }

    /// Copies of the meshes with visibility set for `section`. Terrain is
    /// always shown; overlays wait for the foliage section.
    pub fn meshes_for_section(&self, section: u32) -> Vec<SourceMesh> {
        self.meshes
            .iter()
            .cloned()
            .map(|mut m| {
                if matches!(m.role, MeshRole::Overlay { .. }) {
                    m.visible = section >= FOLIAGE_SECTION;
                }
                m
            })
            .collect()
    }

    pub fn bake(&self, input: &PlanetInput, cfg: &PlanetConfig) -> Result<BakedMesh, BakeError> {
        let field = TerrainField::new(&input.sliders, cfg.mask);
        let meshes = self.meshes_for_section(input.section);
        MeshBaker::new(cfg.bake.clone()).bake(&meshes, &field)
    }

    /// Binary STL of the current slider state.
    pub fn export_stl(&self, input: &PlanetInput, cfg: &PlanetConfig) -> Result<Vec<u8>, BakeError> {
        let baked = self.bake(input, cfg)?;
        let bytes = gaia_io::binary_stl_bytes("gaia planet", &baked.facets())
            .map_err(|e| BakeError::Encode(e.to_string()))?;
        log::info!(
            "exported {} triangles ({} bytes)",
            baked.triangle_count(),
            bytes.len()
        );
        Ok(bytes)
    }
}
