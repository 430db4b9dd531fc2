use gaia_geom::Vec3;
use gaia_mask::{Axis, SliderVector, split_slider};

pub const LIGHT_COUNT: usize = 4;

const KEY_INTENSITY: f32 = 1.5;
const RIM_INTENSITY: f32 = 0.5;
const AMBIENT_INTENSITY: f32 = 0.15;
const OCEAN_FILL_GAIN: f32 = 0.8;
const WARM_BASE: f32 = 0.5;
const WARM_GAIN: f32 = 0.5;

/// `0xRRGGBB` to linear-ish `[r, g, b]` in `[0, 1]`.
pub fn hex_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// Directional light shining from `position` towards the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    pub position: Vec3,
    pub color: [f32; 3],
    pub intensity: f32,
}

impl DirectionalLight {
    /// Unit vector from the surface towards the light.
    pub fn direction(&self) -> Vec3 {
        self.position.normalized()
    }

    pub fn radiance(&self) -> [f32; 3] {
        self.color.map(|c| c * self.intensity)
    }
}

/// Key, ocean fill, warm volcano light, and rim, plus flat ambient.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightRig {
    pub lights: [DirectionalLight; LIGHT_COUNT],
    pub ambient: [f32; 3],
}

impl LightRig {
    pub fn from_sliders(sliders: &SliderVector) -> Self {
        let pair = split_slider(sliders.get(Axis::Agreeableness));
        // Blue light from below rises with the ocean half.
        let fill = OCEAN_FILL_GAIN * pair.high;
        // Warm light never drops below its base; turns orange on the volcano half.
        let warm = WARM_BASE + WARM_GAIN * pair.low;
        let warm_color = if pair.low > 0.0 { hex_rgb(0xffaa00) } else { hex_rgb(0xffffff) };

        Self {
            lights: [
                DirectionalLight {
                    position: Vec3::new(10.0, 10.0, 10.0),
                    color: hex_rgb(0xffffff),
                    intensity: KEY_INTENSITY,
                },
                DirectionalLight {
                    position: Vec3::new(0.0, -10.0, 0.0),
                    color: hex_rgb(0x0088ff),
                    intensity: fill,
                },
                DirectionalLight {
                    position: Vec3::new(-10.0, 5.0, 10.0),
                    color: warm_color,
                    intensity: warm,
                },
                DirectionalLight {
                    position: Vec3::new(-10.0, -5.0, -10.0),
                    color: hex_rgb(0xffd4a3),
                    intensity: RIM_INTENSITY,
                },
            ],
            ambient: [AMBIENT_INTENSITY; 3],
        }
    }

    pub fn directions(&self) -> [[f32; 3]; LIGHT_COUNT] {
        self.lights.map(|l| l.direction().to_array())
    }

    pub fn radiances(&self) -> [[f32; 3]; LIGHT_COUNT] {
        self.lights.map(|l| l.radiance())
    }
}

impl Default for LightRig {
    fn default() -> Self {
        LightRig::from_sliders(&SliderVector::neutral())
    }
}
