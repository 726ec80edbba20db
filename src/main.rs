//! Main entry point for the emberglow viewer

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use emberglow::{ConfigOverrides, Hero, Preset};

#[derive(Parser)]
#[command(name = "emberglow")]
#[command(about = "Depth-of-field particle field with reveal, glow and ripples", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON file with config overrides
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Particles per grid edge (the grid holds size² particles)
    #[arg(long)]
    size: Option<u32>,

    /// Half extent of the particle plane in world units
    #[arg(long)]
    plane_scale: Option<f32>,

    /// Base preset; replaces any preset named in the config file
    #[arg(long, value_enum)]
    preset: Option<PresetArg>,

    /// Window title
    #[arg(long)]
    title: Option<String>,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum PresetArg {
    Default,
    Hero,
}

impl From<PresetArg> for Preset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Default => Preset::Default,
            PresetArg::Hero => Preset::Hero,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG still takes precedence when set.
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let mut overrides = match &cli.config {
        Some(path) => ConfigOverrides::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ConfigOverrides::default(),
    };
    // Command line wins over the file.
    if let Some(preset) = cli.preset {
        overrides.preset = Some(preset.into());
    }
    if let Some(size) = cli.size {
        overrides.size = Some(size);
    }
    if let Some(plane_scale) = cli.plane_scale {
        overrides.plane_scale = Some(plane_scale);
    }

    let mut hero = Hero::new().with_overrides(&overrides)?;
    if let Some(title) = cli.title {
        hero = hero.with_title(title);
    }
    log::info!(
        "grid {}×{} over ±{}",
        hero.grid().size,
        hero.grid().size,
        hero.grid().plane_scale
    );

    hero.run()?;
    Ok(())
}
