//! Interactive preview: the planet drawn with the generated programs, foliage
//! re-baked on the CPU when the sliders move, and config hot-reload.

use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;

use gaia_bake::normals::{NormalMode, compute_normals};
use gaia_bake::{MeshRole, SourceMesh};
use gaia_geom::Vec3;
use gaia_mask::{Axis, SLIDER_COUNT, SliderVector, TerrainField};
use gaia_render_raylib::{MorphTexels, MorphTexture, PlanetShader, upload_soup};
use gaia_shader::SurfaceRenderer;
use raylib::prelude::*;

use crate::config::{PlanetConfig, load_config_from_path};
use crate::rebake::RebakeWorker;
use crate::scene::{PlanetInput, PlanetScene};

const SLIDER_SPEED: f32 = 30.0;
const LAST_SECTION: u32 = 5;

/// Non-indexed copy of a terrain mesh with its morph offsets expanded per corner.
struct GpuSoup {
    pos: Vec<f32>,
    norm: Vec<f32>,
    uv: Vec<f32>,
    morphs: Vec<Vec<f32>>,
}

fn sphere_uv(p: Vec3) -> [f32; 2] {
    let n = p.normalized();
    [
        0.5 + n.z.atan2(n.x) / std::f32::consts::TAU,
        0.5 - n.y.clamp(-1.0, 1.0).asin() / std::f32::consts::PI,
    ]
}

fn expand_soup(mesh: &SourceMesh) -> GpuSoup {
    let order: Vec<usize> = match &mesh.indices {
        Some(idx) => idx.iter().map(|&i| i as usize).collect(),
        None => (0..mesh.vertex_count()).collect(),
    };
    let corners: Vec<Vec3> = order.iter().map(|&v| mesh.vertex(v)).collect();
    let normals = compute_normals(&corners, NormalMode::Smooth);
    GpuSoup {
        pos: corners.iter().flat_map(|p| p.to_array()).collect(),
        norm: normals.iter().flat_map(|n| n.to_array()).collect(),
        uv: corners.iter().flat_map(|&p| sphere_uv(p)).collect(),
        morphs: mesh
            .morph_targets
            .iter()
            .map(|t| order.iter().flat_map(|&v| [t.offsets[v * 3], t.offsets[v * 3 + 1], t.offsets[v * 3 + 2]]).collect())
            .collect(),
    }
}

/// Everything on the GPU for one planet terrain.
struct PlanetGpu {
    shader: PlanetShader,
    morph: MorphTexture,
    model: Model,
}

impl PlanetGpu {
    fn build(rl: &mut RaylibHandle, thread: &RaylibThread, terrain: &SourceMesh, cfg: &PlanetConfig) -> Option<Self> {
        let soup = expand_soup(terrain);
        let shader = PlanetShader::load(rl, thread, &cfg.mask, &cfg.palette)?;
        let targets: Vec<&[f32]> = soup.morphs.iter().map(Vec::as_slice).collect();
        let morph = MorphTexture::upload(&MorphTexels::pack(&targets, soup.pos.len() / 3))?;
        let mut model = upload_soup(rl, thread, &soup.pos, &soup.norm, &soup.uv)?;
        shader.attach(&mut model);
        Some(Self { shader, morph, model })
    }
}

fn watch_config(path: &Path) -> Receiver<()> {
    let (tx, rx) = std::sync::mpsc::channel::<()>();
    let path = path.to_path_buf();
    std::thread::spawn(move || {
        use notify::{EventKind, RecursiveMode, Watcher};
        if let Ok(mut watcher) = notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
            if let Ok(event) = res {
                match event.kind {
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_) | EventKind::Any => {
                        let _ = tx.send(());
                    }
                    _ => {}
                }
            }
        }) {
            if let Err(e) = watcher.watch(&path, RecursiveMode::NonRecursive) {
                log::warn!("not watching {}: {}", path.display(), e);
                return;
            }
            loop {
                std::thread::sleep(std::time::Duration::from_secs(3600));
            }
        }
    });
    rx
}

struct Viewer {
    config_path: PathBuf,
    cfg: PlanetConfig,
    scene: PlanetScene,
    renderer: SurfaceRenderer,
    gpu: Option<PlanetGpu>,
    foliage: Option<Model>,
    input: PlanetInput,
    selected: Axis,
    foliage_dirty: bool,
    rebake: RebakeWorker,
}

impl Viewer {
    fn new(
        rl: &mut RaylibHandle,
        thread: &RaylibThread,
        config_path: &Path,
        cfg: PlanetConfig,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let scene = PlanetScene::demo(&cfg)?;
        let mut v = Self {
            config_path: config_path.to_path_buf(),
            renderer: SurfaceRenderer::new(scene.material(&cfg)),
            cfg,
            scene,
            gpu: None,
            foliage: None,
            input: PlanetInput::new(SliderVector::neutral(), LAST_SECTION),
            selected: Axis::Agreeableness,
            foliage_dirty: true,
            rebake: RebakeWorker::new(),
        };
        v.rebuild_gpu(rl, thread);
        Ok(v)
    }

    fn rebuild_gpu(&mut self, rl: &mut RaylibHandle, thread: &RaylibThread) {
        let terrain = self
            .scene
            .meshes
            .iter()
            .find(|m| matches!(m.role, MeshRole::Terrain { .. }));
        match terrain.and_then(|t| PlanetGpu::build(rl, thread, t, &self.cfg)) {
            Some(gpu) => self.gpu = Some(gpu),
            None => log::warn!("planet upload failed; keeping previous GPU state"),
        }
    }

    fn reload(&mut self, rl: &mut RaylibHandle, thread: &RaylibThread) {
        match load_config_from_path(&self.config_path) {
            Ok(cfg) => match PlanetScene::demo(&cfg) {
                Ok(scene) => {
                    self.renderer.set_material(scene.material(&cfg));
                    self.scene = scene;
                    self.cfg = cfg;
                    self.rebuild_gpu(rl, thread);
                    self.foliage_dirty = true;
                    log::info!("planet config reloaded from {}", self.config_path.display());
                }
                Err(e) => log::warn!("planet config rejected: {}", e),
            },
            Err(e) => log::warn!("planet config reload failed: {}", e),
        }
    }

    fn handle_keys(&mut self, rl: &RaylibHandle, dt: f32) {
        const KEYS: [KeyboardKey; SLIDER_COUNT] = [
            KeyboardKey::KEY_ONE,
            KeyboardKey::KEY_TWO,
            KeyboardKey::KEY_THREE,
            KeyboardKey::KEY_FOUR,
            KeyboardKey::KEY_FIVE,
        ];
        for (key, axis) in KEYS.into_iter().zip(Axis::ALL) {
            if rl.is_key_pressed(key) {
                self.selected = axis;
            }
        }
        let mut delta = 0.0;
        if rl.is_key_down(KeyboardKey::KEY_UP) {
            delta += SLIDER_SPEED * dt;
        }
        if rl.is_key_down(KeyboardKey::KEY_DOWN) {
            delta -= SLIDER_SPEED * dt;
        }
        if delta != 0.0 {
            let v = self.input.sliders.get(self.selected) + delta;
            self.input.sliders.set(self.selected, v);
            self.foliage_dirty = true;
        }
        if rl.is_key_pressed(KeyboardKey::KEY_SPACE) {
            self.input.sliders = SliderVector::neutral();
            self.foliage_dirty = true;
        }
        if rl.is_key_pressed(KeyboardKey::KEY_RIGHT) && self.input.section < LAST_SECTION {
            self.input.section += 1;
            self.foliage_dirty = true;
        }
        if rl.is_key_pressed(KeyboardKey::KEY_LEFT) && self.input.section > 0 {
            self.input.section -= 1;
            self.foliage_dirty = true;
        }
        if rl.is_key_pressed(KeyboardKey::KEY_E) {
            self.export();
        }
    }

    fn export(&self) {
        let out = Path::new("planet.stl");
        match self.scene.export_stl(&self.input, &self.cfg) {
            Ok(bytes) => match std::fs::write(out, bytes) {
                Ok(()) => log::info!("exported {}", out.display()),
                Err(e) => log::error!("writing {} failed: {}", out.display(), e),
            },
            Err(e) => log::error!("export failed: {}", e),
        }
    }

    /// Overlays are masked per piece on the CPU, the same way the export does.
    /// The bake runs on the worker; this only submits and uploads.
    fn refresh_foliage(&mut self, rl: &mut RaylibHandle, thread: &RaylibThread) {
        if self.foliage_dirty {
            self.foliage_dirty = false;
            let overlays: Vec<SourceMesh> = self
                .scene
                .meshes_for_section(self.input.section)
                .into_iter()
                .filter(|m| matches!(m.role, MeshRole::Overlay { .. }))
                .collect();
            if overlays.is_empty() {
                self.rebake.invalidate();
                self.foliage = None;
            } else {
                let field = TerrainField::new(&self.input.sliders, self.cfg.mask);
                let mut options = self.cfg.bake.clone();
                options.drop_degenerate = true;
                self.rebake.submit(overlays, field, options);
            }
        }

        let Some(out) = self.rebake.drain_latest() else {
            return;
        };
        self.foliage = match out.baked {
            Ok(baked) if !baked.is_empty() => {
                let uv = vec![0.0; baked.vertex_count() * 2];
                upload_soup(rl, thread, &baked.pos, &baked.norm, &uv)
            }
            Ok(_) => None,
            Err(e) => {
                log::warn!("foliage bake failed: {}", e);
                None
            }
        };
    }
}

pub fn run(config_path: &Path, cfg: PlanetConfig) -> Result<(), Box<dyn std::error::Error>> {
    let (mut rl, thread) = raylib::init()
        .size(1280, 800)
        .title("gaia planet preview")
        .msaa_4x()
        .build();
    rl.set_target_fps(60);

    let mut camera = Camera3D::perspective(
        Vector3::new(0.0, 1.2, 3.2),
        Vector3::zero(),
        Vector3::new(0.0, 1.0, 0.0),
        45.0,
    );
    let reload_rx = watch_config(config_path);
    let mut viewer = Viewer::new(&mut rl, &thread, config_path, cfg)?;

    while !rl.window_should_close() {
        let dt = rl.get_frame_time();
        if reload_rx.try_iter().count() > 0 {
            viewer.reload(&mut rl, &thread);
        }
        viewer.handle_keys(&rl, dt);
        viewer.refresh_foliage(&mut rl, &thread);
        rl.update_camera(&mut camera, CameraMode::CAMERA_ORBITAL);

        let time = rl.get_time() as f32;
        let uniforms = viewer.renderer.update_frame(&viewer.input.sliders, time).clone();
        if let Some(gpu) = viewer.gpu.as_mut() {
            gpu.shader.apply(&uniforms, camera.position);
            gpu.shader.bind_morph(&gpu.morph);
        }

        let mut d = rl.begin_drawing(&thread);
        d.clear_background(Color::new(8, 10, 18, 255));
        {
            let mut d3 = d.begin_mode3D(camera);
            if let Some(gpu) = viewer.gpu.as_ref() {
                d3.draw_model(&gpu.model, Vector3::zero(), 1.0, Color::WHITE);
            }
            if let Some(foliage) = viewer.foliage.as_ref() {
                d3.draw_model(foliage, Vector3::zero(), 1.0, Color::new(38, 92, 30, 255));
            }
        }
        for (i, axis) in Axis::ALL.into_iter().enumerate() {
            let marker = if axis == viewer.selected { ">" } else { " " };
            let text = format!("{} {} {:>5.1}", marker, i + 1, viewer.input.sliders.get(axis));
            d.draw_text(&text, 12, 12 + 22 * i as i32, 20, Color::RAYWHITE);
        }
        let footer = format!(
            "section {}  [1-5] pick  [up/down] move  [left/right] section  [space] reset  [E] export",
            viewer.input.section
        );
        d.draw_text(&footer, 12, 12 + 22 * SLIDER_COUNT as i32, 18, Color::GRAY);
        d.draw_fps(12, 780);
    }
    Ok(())
}
