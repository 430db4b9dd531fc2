use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use gaia::config::{DEFAULT_CONFIG_PATH, load_or_default};
use gaia::{PlanetInput, PlanetScene};
use gaia_bake::NormalMode;
use gaia_bake::normals::is_degenerate;
use gaia_geom::{Aabb, Vec3};
use gaia_mask::{Region, SLIDER_COUNT, SliderVector, TerrainField};
use gaia_shader::{MapSamples, glsl, shade_surface};

#[derive(Parser)]
#[command(name = "gaia")]
#[command(about = "Slider-driven planet surface: preview shaders and STL export")]
#[command(version)]
struct Cli {
    /// Planet config (TOML); defaults are used when the file is missing
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Debug logging (RUST_LOG still wins)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bake the planet for a slider state and write an STL
    Bake {
        /// Five comma-separated slider values in [0, 100]
        #[arg(short, long, value_delimiter = ',', default_value = "50,50,50,50,50")]
        sliders: Vec<f32>,

        /// Quiz section; decorations appear as sections are reached
        #[arg(long, default_value_t = 4)]
        section: u32,

        /// Output file
        #[arg(short, long, default_value = "planet.stl")]
        output: PathBuf,

        /// Write ASCII STL instead of binary
        #[arg(long)]
        ascii: bool,

        /// Override the configured normal mode
        #[arg(long, value_enum)]
        normals: Option<NormalArg>,
    },

    /// Print the generated GLSL programs
    Shader {
        #[arg(long, value_enum, default_value_t = Stage::Both)]
        stage: Stage,
    },

    /// Print intensities, alphas, weights and the surface mix at one direction
    Probe {
        #[arg(short, long, value_delimiter = ',', default_value = "50,50,50,50,50")]
        sliders: Vec<f32>,

        /// Direction as x,y,z
        #[arg(short, long, value_delimiter = ',', allow_hyphen_values = true, default_value = "0,1,0")]
        dir: Vec<f32>,
    },

    /// Check a binary STL and print its summary
    Inspect { input: PathBuf },

    /// Interactive preview window
    #[cfg(feature = "viewer")]
    View,
}

#[derive(Clone, Copy, ValueEnum)]
enum Stage {
    Vertex,
    Fragment,
    Both,
}

#[derive(Clone, Copy, ValueEnum)]
enum NormalArg {
    Flat,
    Smooth,
}

impl From<NormalArg> for NormalMode {
    fn from(n: NormalArg) -> Self {
        match n {
            NormalArg::Flat => NormalMode::Flat,
            NormalArg::Smooth => NormalMode::Smooth,
        }
    }
}

fn parse_sliders(values: &[f32]) -> Result<SliderVector, String> {
    let arr: [f32; SLIDER_COUNT] = values
        .try_into()
        .map_err(|_| format!("expected {} slider values, got {}", SLIDER_COUNT, values.len()))?;
    Ok(SliderVector::new(arr))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let mut cfg = load_or_default(&cli.config)?;

    match cli.command {
        Commands::Bake {
            sliders,
            section,
            output,
            ascii,
            normals,
        } => {
            if let Some(n) = normals {
                cfg.bake.normals = n.into();
            }
            let input = PlanetInput::new(parse_sliders(&sliders)?, section);
            let scene = PlanetScene::demo(&cfg)?;
            if ascii {
                let baked = scene.bake(&input, &cfg)?;
                let mut w = std::io::BufWriter::new(std::fs::File::create(&output)?);
                gaia_io::write_ascii_stl(&mut w, "planet", &baked.facets())?;
                w.flush()?;
            } else {
                std::fs::write(&output, scene.export_stl(&input, &cfg)?)?;
            }
            log::info!("wrote {}", output.display());
        }

        Commands::Shader { stage } => {
            if matches!(stage, Stage::Vertex | Stage::Both) {
                println!("{}", glsl::vertex_source(&cfg.mask));
            }
            if matches!(stage, Stage::Fragment | Stage::Both) {
                println!("{}", glsl::fragment_source(&cfg.mask, &cfg.palette));
            }
        }

        Commands::Probe { sliders, dir } => {
            let sliders = parse_sliders(&sliders)?;
            let [x, y, z]: [f32; 3] = dir
                .as_slice()
                .try_into()
                .map_err(|_| format!("expected x,y,z, got {} values", dir.len()))?;
            let p = Vec3::new(x, y, z).normalized();
            let field = TerrainField::new(&sliders, cfg.mask);
            let alphas = field.alphas_at(p);
            let weights = field.weights_at(p);
            println!("direction  ({:.4}, {:.4}, {:.4})", p.x, p.y, p.z);
            println!("{:<8} {:>9} {:>9} {:>9}", "region", "intensity", "alpha", "weight");
            for r in Region::ALL {
                println!(
                    "{:<8} {:>9.4} {:>9.4} {:>9.4}",
                    r,
                    field.intensities().get(r),
                    alphas.get(r),
                    weights.get(r)
                );
            }
            let s = shade_surface(p, &weights, 0.0, &cfg.palette, &MapSamples::default());
            println!(
                "surface  color ({:.3}, {:.3}, {:.3}) roughness {:.3} metalness {:.3}",
                s.color.x, s.color.y, s.color.z, s.roughness, s.metalness
            );
        }

        Commands::Inspect { input } => {
            let bytes = std::fs::read(&input)?;
            let facets = gaia_io::read_binary_stl(&bytes)?;
            let bounds = Aabb::from_points(facets.iter().flat_map(|f| f.vertices.map(Vec3::from_array)));
            let degenerate = facets
                .iter()
                .filter(|f| {
                    let [a, b, c] = f.vertices.map(Vec3::from_array);
                    is_degenerate(a, b, c)
                })
                .count();
            println!("{}: {} triangles, {} degenerate", input.display(), facets.len(), degenerate);
            if !facets.is_empty() {
                println!(
                    "bounds  ({:.4}, {:.4}, {:.4}) .. ({:.4}, {:.4}, {:.4})",
                    bounds.min.x, bounds.min.y, bounds.min.z, bounds.max.x, bounds.max.y, bounds.max.z
                );
            }
        }

        #[cfg(feature = "viewer")]
        Commands::View => gaia::viewer::run(&cli.config, cfg)?,
    }
    Ok(())
}
