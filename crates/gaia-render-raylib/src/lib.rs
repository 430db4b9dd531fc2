//! Raylib GPU side of the planet surface: program upload, uniform push,
//! morph-offset texture, and non-indexed mesh upload.
// Unsafe is required for Raylib mesh/model/texture upload in this crate.

use gaia_mask::{MAX_MORPH_SLOTS, MaskParams};
use gaia_shader::glsl::{self, names};
use gaia_shader::{SurfacePalette, UniformState};
use raylib::prelude::*;

/// Texture unit reserved for morph offsets, clear of the material maps.
pub const MORPH_TEX_SLOT: i32 = 7;
/// Widest morph texture row; rows wrap past this.
pub const MAX_MORPH_TEX_WIDTH: usize = 4096;

/// RGB32F texel layout of all morph slots: texel `slot * vertex_count + vertex`.
#[derive(Clone, Debug, PartialEq)]
pub struct MorphTexels {
    pub data: Vec<f32>,
    pub width: usize,
    pub height: usize,
    pub vertex_count: usize,
    pub slots: usize,
}

impl MorphTexels {
    /// Packs per-vertex `xyz` offsets. Targets past the slot limit are skipped.
    pub fn pack(targets: &[&[f32]], vertex_count: usize) -> Self {
        let slots = targets.len().min(MAX_MORPH_SLOTS);
        let total = (slots * vertex_count).max(1);
        let width = total.min(MAX_MORPH_TEX_WIDTH);
        let height = total.div_ceil(width);
        let mut data = vec![0.0f32; width * height * 3];
        for (j, offsets) in targets.iter().take(slots).enumerate() {
            let n = offsets.len().min(vertex_count * 3);
            let start = j * vertex_count * 3;
            data[start..start + n].copy_from_slice(&offsets[..n]);
        }
        Self {
            data,
            width,
            height,
            vertex_count,
            slots,
        }
    }
}

/// GPU copy of `MorphTexels`; released on drop.
pub struct MorphTexture {
    pub id: u32,
    pub width: i32,
    pub vertex_count: i32,
}

impl MorphTexture {
    pub fn upload(texels: &MorphTexels) -> Option<Self> {
        let format = raylib::consts::PixelFormat::PIXELFORMAT_UNCOMPRESSED_R32G32B32 as i32;
        let id = unsafe {
            raylib::ffi::rlLoadTexture(
                texels.data.as_ptr() as *const _,
                texels.width as i32,
                texels.height as i32,
                format,
                1,
            )
        };
        if id == 0 {
            log::warn!("morph texture upload failed ({}x{})", texels.width, texels.height);
            return None;
        }
        log::debug!(
            "morph texture {}x{} for {} slots x {} vertices",
            texels.width,
            texels.height,
            texels.slots,
            texels.vertex_count
        );
        Some(Self {
            id,
            width: texels.width as i32,
            vertex_count: texels.vertex_count as i32,
        })
    }
}

impl Drop for MorphTexture {
    fn drop(&mut self) {
        unsafe { raylib::ffi::rlUnloadTexture(self.id) };
    }
}

/// Uploads a non-indexed triangle soup; `gl_VertexID` then equals the corner index.
pub fn upload_soup(
    rl: &mut RaylibHandle,
    thread: &RaylibThread,
    pos: &[f32],
    norm: &[f32],
    uv: &[f32],
) -> Option<Model> {
    let v_count = pos.len() / 3;
    if v_count == 0 || norm.len() != pos.len() || uv.len() != v_count * 2 {
        log::warn!("soup upload skipped: {} corners, mismatched attributes", v_count);
        return None;
    }
    let mut raw: raylib::ffi::Mesh = unsafe { std::mem::zeroed() };
    raw.vertexCount = v_count as i32;
    raw.triangleCount = (v_count / 3) as i32;
    unsafe {
        let vbytes = (v_count * 3 * std::mem::size_of::<f32>()) as u32;
        let tbytes = (v_count * 2 * std::mem::size_of::<f32>()) as u32;
        raw.vertices = raylib::ffi::MemAlloc(vbytes) as *mut f32;
        raw.normals = raylib::ffi::MemAlloc(vbytes) as *mut f32;
        raw.texcoords = raylib::ffi::MemAlloc(tbytes) as *mut f32;
        std::ptr::copy_nonoverlapping(pos.as_ptr(), raw.vertices, v_count * 3);
        std::ptr::copy_nonoverlapping(norm.as_ptr(), raw.normals, v_count * 3);
        std::ptr::copy_nonoverlapping(uv.as_ptr(), raw.texcoords, v_count * 2);
    }
    let mut mesh = unsafe { raylib::core::models::Mesh::from_raw(raw) };
    unsafe {
        mesh.upload(false);
    }
    rl.load_model_from_mesh(thread, unsafe { mesh.make_weak() }).ok()
}

pub struct PlanetShader {
    pub shader: raylib::shaders::WeakShader,
    pub loc_sliders: i32,
    pub loc_time: i32,
    pub loc_indices: i32,
    pub loc_morph_tex: i32,
    pub loc_morph_count: i32,
    pub loc_morph_vertex_count: i32,
    pub loc_morph_tex_width: i32,
    pub loc_has_desert_map: i32,
    pub loc_has_ocean_map: i32,
    pub loc_base_color: i32,
    pub loc_desert_color: i32,
    pub loc_ocean_color: i32,
    pub loc_forest_color: i32,
    pub loc_view_pos: i32,
    pub loc_light_dir: i32,
    pub loc_light_color: i32,
    pub loc_ambient: i32,
}

impl PlanetShader {
    /// Compiles the planet programs generated from `params` and `palette`.
    pub fn load(
        rl: &mut RaylibHandle,
        thread: &RaylibThread,
        params: &MaskParams,
        palette: &SurfacePalette,
    ) -> Option<Self> {
        let vs = glsl::vertex_source(params);
        let fs = glsl::fragment_source(params, palette);
        let shader_strong = rl.load_shader_from_memory(thread, Some(&vs), Some(&fs));
        let shader = unsafe { shader_strong.make_weak() };
        if shader.as_ref().id == unsafe { raylib::ffi::rlGetShaderIdDefault() } {
            log::error!("planet shader failed to compile; see raylib log");
            return None;
        }
        let loc = |name: &str| shader.get_shader_location(name);
        Some(Self {
            loc_sliders: loc(names::SLIDERS),
            loc_time: loc(names::TIME),
            loc_indices: loc(names::INDICES),
            loc_morph_tex: loc(names::MORPH_TEX),
            loc_morph_count: loc(names::MORPH_COUNT),
            loc_morph_vertex_count: loc(names::MORPH_VERTEX_COUNT),
            loc_morph_tex_width: loc(names::MORPH_TEX_WIDTH),
            loc_has_desert_map: loc(names::HAS_DESERT_MAP),
            loc_has_ocean_map: loc(names::HAS_OCEAN_MAP),
            loc_base_color: loc(names::BASE_COLOR),
            loc_desert_color: loc(names::DESERT_COLOR),
            loc_ocean_color: loc(names::OCEAN_COLOR),
            loc_forest_color: loc(names::FOREST_COLOR),
            loc_view_pos: loc(names::VIEW_POS),
            loc_light_dir: loc(names::LIGHT_DIR),
            loc_light_color: loc(names::LIGHT_COLOR),
            loc_ambient: loc(names::AMBIENT),
            shader,
        })
    }

    /// Pushes one frame of uniforms.
    pub fn apply(&mut self, u: &UniformState, view_pos: Vector3) {
        if self.loc_sliders >= 0 {
            self.shader.set_shader_value_v(self.loc_sliders, &u.sliders[..]);
        }
        if self.loc_time >= 0 {
            self.shader.set_shader_value(self.loc_time, u.time);
        }
        if self.loc_indices >= 0 {
            self.shader.set_shader_value_v(self.loc_indices, &u.indices[..]);
        }
        if self.loc_morph_count >= 0 {
            self.shader.set_shader_value(self.loc_morph_count, u.morph_count);
        }
        if self.loc_has_desert_map >= 0 {
            self.shader
                .set_shader_value(self.loc_has_desert_map, u.has_desert_map as i32);
        }
        if self.loc_has_ocean_map >= 0 {
            self.shader
                .set_shader_value(self.loc_has_ocean_map, u.has_ocean_map as i32);
        }
        for (loc, color) in [
            (self.loc_base_color, u.base_color),
            (self.loc_desert_color, u.desert_color),
            (self.loc_ocean_color, u.ocean_color),
            (self.loc_forest_color, u.forest_color),
            (self.loc_ambient, u.lights.ambient),
        ] {
            if loc >= 0 {
                self.shader.set_shader_value(loc, color);
            }
        }
        if self.loc_light_dir >= 0 {
            let dirs = u.lights.directions();
            self.shader.set_shader_value_v(self.loc_light_dir, &dirs[..]);
        }
        if self.loc_light_color >= 0 {
            let colors = u.lights.radiances();
            self.shader.set_shader_value_v(self.loc_light_color, &colors[..]);
        }
        if self.loc_view_pos >= 0 {
            self.shader.set_shader_value(self.loc_view_pos, view_pos);
        }
    }

    /// Binds the morph offsets; without this `uMorphCount` slots read zeros.
    pub fn bind_morph(&mut self, tex: &MorphTexture) {
        unsafe {
            raylib::ffi::rlActiveTextureSlot(MORPH_TEX_SLOT);
            raylib::ffi::rlEnableTexture(tex.id);
            if self.loc_morph_tex >= 0 {
                self.shader.set_shader_value(self.loc_morph_tex, MORPH_TEX_SLOT);
            }
            raylib::ffi::rlActiveTextureSlot(0);
        }
        if self.loc_morph_vertex_count >= 0 {
            self.shader
                .set_shader_value(self.loc_morph_vertex_count, tex.vertex_count);
        }
        if self.loc_morph_tex_width >= 0 {
            self.shader.set_shader_value(self.loc_morph_tex_width, tex.width);
        }
    }

    /// Points material 0 of `model` at this program.
    pub fn attach(&self, model: &mut Model) {
        if let Some(mat) = model.materials_mut().get_mut(0) {
            let dest = mat.shader_mut();
            let dest_ptr: *mut raylib::ffi::Shader = dest.as_mut();
            let src_ptr: *const raylib::ffi::Shader = self.shader.as_ref();
            unsafe { std::ptr::copy_nonoverlapping(src_ptr, dest_ptr, 1) };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texels_follow_slot_major_layout() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let b = [7.0, 8.0, 9.0, 10.0, 11.0, 12.0];
        let t = MorphTexels::pack(&[&a, &b], 2);
        assert_eq!((t.width, t.height, t.slots), (4, 1, 2));
        // Texel 1 * 2 + 1 holds vertex 1 of slot 1.
        assert_eq!(&t.data[9..12], &[10.0, 11.0, 12.0]);
    }

    #[test]
    fn wide_layouts_wrap_rows() {
        let offsets = vec![0.5f32; 3000 * 3];
        let t = MorphTexels::pack(&[&offsets, &offsets], 3000);
        assert_eq!(t.width, MAX_MORPH_TEX_WIDTH);
        assert_eq!(t.height, 2);
        assert_eq!(t.data.len(), MAX_MORPH_TEX_WIDTH * 2 * 3);
    }

    #[test]
    fn extra_targets_are_dropped() {
        let o = [1.0f32; 3];
        let many: Vec<&[f32]> = (0..10).map(|_| &o[..]).collect();
        assert_eq!(MorphTexels::pack(&many, 1).slots, MAX_MORPH_SLOTS);
    }
}
