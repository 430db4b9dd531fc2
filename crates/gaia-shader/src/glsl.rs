//! GLSL 330 programs for the planet surface.
//!
//! Every constant the host mask uses (`MaskParams`, seed directions, region
//! codes, slider axes) is written into the source from the Rust tables, so
//! the live preview and the baker cannot drift apart by editing one side.

use gaia_geom::Vec3;
use gaia_mask::{MAX_MORPH_SLOTS, MaskParams, Region, RegionSeed, SLIDER_COUNT, SliderHalf};
use gaia_noise::SNOISE_GLSL;

use crate::lighting::LIGHT_COUNT;
use crate::palette::{
    COLOR_GATE, MAGMA_BRIGHT, MAGMA_RED, PBR_GATE, ROCK_BROWN, ROCK_DARK, SurfacePalette,
    VOLCANO_GATE,
};

/// Uniform names shared with the GPU uploader.
pub mod names {
    pub const SLIDERS: &str = "uSliders";
    pub const TIME: &str = "uTime";
    pub const INDICES: &str = "uIndices";
    pub const MORPH_TEX: &str = "uMorphTex";
    pub const MORPH_COUNT: &str = "uMorphCount";
    pub const MORPH_VERTEX_COUNT: &str = "uMorphVertexCount";
    pub const MORPH_TEX_WIDTH: &str = "uMorphTexWidth";
    pub const DESERT_MAP: &str = "uDesertMap";
    pub const OCEAN_MAP: &str = "uOceanMap";
    pub const HAS_DESERT_MAP: &str = "uHasDesertMap";
    pub const HAS_OCEAN_MAP: &str = "uHasOceanMap";
    pub const BASE_COLOR: &str = "uBaseColor";
    pub const DESERT_COLOR: &str = "uDesertColor";
    pub const OCEAN_COLOR: &str = "uOceanColor";
    pub const FOREST_COLOR: &str = "uForestColor";
    pub const VIEW_POS: &str = "uViewPos";
    pub const LIGHT_DIR: &str = "uLightDir";
    pub const LIGHT_COLOR: &str = "uLightColor";
    pub const AMBIENT: &str = "uAmbient";
}

const GLSL_VERSION: &str = "#version 330\n";

const GROWTH_GLSL: &str = r#"
float growthAlpha(vec3 pos, vec3 seed, float intensity) {
    if (!(intensity > 0.0)) return 0.0;
    if (intensity >= 1.0) return 1.0;
    vec3 p = normalize(pos);
    float align = dot(p, normalize(seed));
    float grad = align * 0.5 + 0.5;
    float n = snoise(p * NOISE_FREQUENCY) * 0.5 + 0.5;
    float growth = mix(grad, n, NOISE_WEIGHT);
    float threshold = THRESHOLD_BASE - intensity * THRESHOLD_SLOPE;
    return smoothstep(threshold, threshold + EDGE, growth);
}

float lowHalf(float s) { return (s < 0.5) ? (0.5 - s) * 2.0 : 0.0; }
float highHalf(float s) { return (s > 0.5) ? (s - 0.5) * 2.0 : 0.0; }
"#;

const COMPOSE_GLSL: &str = r#"    float w_forest = a_forest;
    float w_desert = a_desert * (1.0 - a_forest);
    float w_ocean = a_ocean * (1.0 - a_volcano) * (1.0 - a_desert) * (1.0 - a_forest);
    float w_volcano = a_volcano * (1.0 - a_ocean) * (1.0 - a_desert) * (1.0 - a_forest);
"#;

const VERTEX_MAIN: &str = r#"
void main() {
    vec4 w = regionWeights(vertexPosition);
    vec3 pos = vertexPosition;
    for (int j = 0; j < MAX_MORPH_SLOTS; j++) {
        if (j >= uMorphCount) break;
        int code = uIndices[j];
        if (code < 0) continue;
        float influence = w[code] * MORPH_BOOST;
        if (influence == 0.0) continue;
        int texel = j * uMorphVertexCount + gl_VertexID;
        ivec2 uv = ivec2(texel % uMorphTexWidth, texel / uMorphTexWidth);
        pos += texelFetch(uMorphTex, uv, 0).xyz * influence;
    }
    vOriginalPos = vertexPosition;
    vWorldPos = (matModel * vec4(pos, 1.0)).xyz;
    vCustomUv = vertexTexCoord;
    gl_Position = mvp * vec4(pos, 1.0);
}
"#;

const SHADE_SURFACE_GLSL: &str = r#"
vec3 volcanoColor(vec3 p) {
    float rockNoise = snoise(p * 10.0 + vec3(10.0));
    vec3 rock = mix(ROCK_DARK, ROCK_BROWN, rockNoise * 0.5 + 0.5);
    float flow = snoise(p * 0.3 + vec3(0.0, uTime * 0.1, 0.0));
    float ridges = 1.0 - abs(flow);
    float river = smoothstep(0.85, 0.98, ridges);
    float pulse = snoise(p * 3.0 + vec3(uTime * 2.0)) * 0.5 + 0.5;
    vec3 magma = mix(MAGMA_RED, MAGMA_BRIGHT, pulse);
    return mix(rock, magma, river);
}

void shadeSurface(vec3 p, vec4 w, out vec3 color, out float roughness, out float metalness) {
    color = uBaseColor;
    roughness = BASE_ROUGHNESS;
    metalness = BASE_METALNESS;
    if (w.x > COLOR_GATE) {
        vec3 d = uDesertColor;
        if (uHasDesertMap != 0) d *= texture(uDesertMap, vCustomUv).rgb;
        float grains = snoise(p * 250.0) * 0.04;
        float ripples = snoise(p * 15.0) * 0.03;
        d += grains + ripples;
        color = mix(color, d, w.x);
    }
    if (w.y > COLOR_GATE) {
        vec3 o = uOceanColor;
        if (uHasOceanMap != 0) o *= texture(uOceanMap, vCustomUv).rgb;
        color = mix(color, o, w.y);
    }
    if (w.z > VOLCANO_GATE) {
        color = mix(color, volcanoColor(p), w.z);
    }
    if (w.w > COLOR_GATE) {
        vec3 canopy = uForestColor + snoise(p * 40.0) * 0.05;
        color = mix(color, canopy, w.w);
    }
    if (w.x > PBR_GATE) roughness = mix(roughness, DESERT_ROUGHNESS, w.x);
    if (w.y > PBR_GATE) {
        roughness = mix(roughness, OCEAN_ROUGHNESS, w.y);
        metalness = mix(metalness, OCEAN_METALNESS, w.y);
    }
    if (w.z > PBR_GATE) {
        roughness = mix(roughness, VOLCANO_ROUGHNESS, w.z);
        metalness = mix(metalness, VOLCANO_METALNESS, w.z);
    }
    if (w.w > PBR_GATE) roughness = mix(roughness, FOREST_ROUGHNESS, w.w);
}
"#;

const FRAGMENT_MAIN: &str = r#"
void main() {
    vec3 n = normalize(cross(dFdx(vWorldPos), dFdy(vWorldPos)));
    vec3 v = normalize(uViewPos - vWorldPos);
    n = faceforward(n, -v, n);

    vec3 color;
    float roughness;
    float metalness;
    shadeSurface(vOriginalPos, regionWeights(vOriginalPos), color, roughness, metalness);

    vec3 diffuse = color * (1.0 - metalness);
    vec3 f0 = mix(vec3(0.04), color, metalness);
    float shininess = mix(256.0, 4.0, roughness);
    vec3 lit = uAmbient * color;
    for (int i = 0; i < LIGHT_COUNT; i++) {
        vec3 l = normalize(uLightDir[i]);
        float ndl = max(dot(n, l), 0.0);
        vec3 h = normalize(l + v);
        float spec = pow(max(dot(n, h), 0.0), shininess) * (1.0 - roughness);
        lit += uLightColor[i] * (diffuse + f0 * spec) * ndl;
    }
    finalColor = vec4(lit, 1.0);
}
"#;

/// GLSL float literal; always carries a decimal point or exponent.
fn lit(v: f32) -> String {
    format!("{v:?}")
}

fn vec3_lit(v: Vec3) -> String {
    format!("vec3({}, {}, {})", lit(v.x), lit(v.y), lit(v.z))
}

fn const_float(name: &str, v: f32) -> String {
    format!("const float {name} = {};\n", lit(v))
}

fn const_vec3(name: &str, v: Vec3) -> String {
    format!("const vec3 {name} = {};\n", vec3_lit(v))
}

fn half_fn(half: SliderHalf) -> &'static str {
    match half {
        SliderHalf::Low => "lowHalf",
        SliderHalf::High => "highHalf",
    }
}

/// Mask constants, `growthAlpha` and `regionWeights(pos)`.
///
/// `regionWeights` returns the composed weights indexed by region code, so
/// `w[uIndices[j]]` picks the weight of morph slot `j`.
pub fn mask_chunk(params: &MaskParams) -> String {
    let mut s = String::new();
    s += &format!("const int MAX_MORPH_SLOTS = {MAX_MORPH_SLOTS};\n");
    s += &const_float("NOISE_FREQUENCY", params.noise_frequency);
    s += &const_float("NOISE_WEIGHT", params.noise_weight);
    s += &const_float("THRESHOLD_BASE", params.threshold_base);
    s += &const_float("THRESHOLD_SLOPE", params.threshold_slope);
    s += &const_float("EDGE", params.edge);
    s += &const_float("MORPH_BOOST", params.morph_boost);
    for seed in RegionSeed::ALL {
        s += &const_vec3(seed.glsl_name(), seed.direction());
    }
    s += SNOISE_GLSL;
    s += GROWTH_GLSL;

    s += "\nvec4 regionWeights(vec3 pos) {\n";
    for r in Region::ALL {
        s += &format!(
            "    float a_{} = growthAlpha(pos, {}, {}(uSliders[{}]));\n",
            r.name(),
            r.seed().glsl_name(),
            half_fn(r.half()),
            r.axis().index(),
        );
    }
    s += COMPOSE_GLSL;
    let mut by_code = Region::ALL;
    by_code.sort_by_key(|r| r.code());
    let parts: Vec<String> = by_code.iter().map(|r| format!("w_{}", r.name())).collect();
    s += &format!("    return vec4({});\n}}\n", parts.join(", "));
    s
}

fn slider_uniform() -> String {
    format!("uniform float {}[{SLIDER_COUNT}];\n", names::SLIDERS)
}

pub fn vertex_source(params: &MaskParams) -> String {
    let mut s = String::from(GLSL_VERSION);
    s += "in vec3 vertexPosition;\nin vec2 vertexTexCoord;\nin vec3 vertexNormal;\n";
    s += "uniform mat4 mvp;\nuniform mat4 matModel;\n";
    s += &slider_uniform();
    s += &format!("uniform float {};\n", names::TIME);
    s += &format!("uniform int {}[{MAX_MORPH_SLOTS}];\n", names::INDICES);
    s += &format!("uniform sampler2D {};\n", names::MORPH_TEX);
    s += &format!("uniform int {};\n", names::MORPH_COUNT);
    s += &format!("uniform int {};\n", names::MORPH_VERTEX_COUNT);
    s += &format!("uniform int {};\n", names::MORPH_TEX_WIDTH);
    s += "out vec3 vWorldPos;\nout vec3 vOriginalPos;\nout vec2 vCustomUv;\n";
    s += &mask_chunk(params);
    s += VERTEX_MAIN;
    s
}

pub fn fragment_source(params: &MaskParams, palette: &SurfacePalette) -> String {
    let mut s = String::from(GLSL_VERSION);
    s += "in vec3 vWorldPos;\nin vec3 vOriginalPos;\nin vec2 vCustomUv;\n";
    s += &slider_uniform();
    s += &format!("uniform float {};\n", names::TIME);
    s += &format!("uniform sampler2D {};\n", names::DESERT_MAP);
    s += &format!("uniform sampler2D {};\n", names::OCEAN_MAP);
    s += &format!("uniform int {};\n", names::HAS_DESERT_MAP);
    s += &format!("uniform int {};\n", names::HAS_OCEAN_MAP);
    for name in [
        names::BASE_COLOR,
        names::DESERT_COLOR,
        names::OCEAN_COLOR,
        names::FOREST_COLOR,
        names::VIEW_POS,
        names::AMBIENT,
    ] {
        s += &format!("uniform vec3 {name};\n");
    }
    s += &format!("uniform vec3 {}[{LIGHT_COUNT}];\n", names::LIGHT_DIR);
    s += &format!("uniform vec3 {}[{LIGHT_COUNT}];\n", names::LIGHT_COLOR);
    s += "out vec4 finalColor;\n";

    s += &format!("const int LIGHT_COUNT = {LIGHT_COUNT};\n");
    s += &const_float("COLOR_GATE", COLOR_GATE);
    s += &const_float("VOLCANO_GATE", VOLCANO_GATE);
    s += &const_float("PBR_GATE", PBR_GATE);
    s += &const_float("BASE_ROUGHNESS", palette.base_roughness);
    s += &const_float("BASE_METALNESS", palette.base_metalness);
    s += &const_float("DESERT_ROUGHNESS", palette.desert_roughness);
    s += &const_float("OCEAN_ROUGHNESS", palette.ocean_roughness);
    s += &const_float("OCEAN_METALNESS", palette.ocean_metalness);
    s += &const_float("VOLCANO_ROUGHNESS", palette.volcano_roughness);
    s += &const_float("VOLCANO_METALNESS", palette.volcano_metalness);
    s += &const_float("FOREST_ROUGHNESS", palette.forest_roughness);
    s += &const_vec3("ROCK_DARK", Vec3::from_array(ROCK_DARK));
    s += &const_vec3("ROCK_BROWN", Vec3::from_array(ROCK_BROWN));
    s += &const_vec3("MAGMA_RED", Vec3::from_array(MAGMA_RED));
    s += &const_vec3("MAGMA_BRIGHT", Vec3::from_array(MAGMA_BRIGHT));

    s += &mask_chunk(params);
    s += SHADE_SURFACE_GLSL;
    s += FRAGMENT_MAIN;
    s
}
