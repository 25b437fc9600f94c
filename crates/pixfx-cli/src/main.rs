//! pixfx - apply effect stacks to images from the command line

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

mod commands;

#[derive(Parser)]
#[command(name = "pixfx")]
#[command(author, version, about = "Raster image effect stacks")]
#[command(long_about = "
Applies ordered stacks of image effects (halftone, dither, glitch, pixelate,
slice shift, gradient map, ...) to PNG images.

Examples:
  pixfx effects                                  # List effect kinds
  pixfx init look.json pixelate gradient-map     # New project with two effects
  pixfx render photo.png -p look.json -o out.png # Render a project
  pixfx apply halftone photo.png -o dots.png --set cellSize=12 --set shape=diamond
  pixfx apply slice-shift photo.png -o cut.png --seed 42
  pixfx info photo.png
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Render an image through a project's effect stack
    #[command(visible_alias = "r")]
    Render(RenderArgs),

    /// Apply a single effect
    #[command(visible_alias = "a")]
    Apply(ApplyArgs),

    /// Write a new project file
    Init(InitArgs),

    /// List available effects
    #[command(visible_alias = "ls")]
    Effects(EffectsArgs),

    /// Show image information
    #[command(visible_alias = "i")]
    Info(InfoArgs),
}

/// Arguments for the `render` command.
#[derive(Args)]
struct RenderArgs {
    /// Input PNG
    input: PathBuf,

    /// Project file
    #[arg(short, long)]
    project: PathBuf,

    /// Output PNG
    #[arg(short, long)]
    output: PathBuf,

    /// Print per-step timings
    #[arg(long)]
    report: bool,
}

/// Arguments for the `apply` command.
#[derive(Args)]
struct ApplyArgs {
    /// Effect kind, e.g. `pixelate` or `slice-shift`
    kind: String,

    /// Input PNG
    input: PathBuf,

    /// Output PNG
    #[arg(short, long)]
    output: PathBuf,

    /// Setting override as key=value (repeatable); values are JSON or plain strings
    #[arg(short, long = "set", value_name = "KEY=VALUE")]
    set: Vec<String>,

    /// Seed for random effects (time-based if omitted)
    #[arg(long)]
    seed: Option<u32>,

    /// Also save the one-effect stack as a project file
    #[arg(long, value_name = "PATH")]
    save_project: Option<PathBuf>,
}

/// Arguments for the `init` command.
#[derive(Args)]
struct InitArgs {
    /// Project file to create
    output: PathBuf,

    /// Effect kinds to add, in order
    kinds: Vec<String>,

    /// Overwrite an existing file
    #[arg(short, long)]
    force: bool,
}

/// Arguments for the `effects` command.
#[derive(Args)]
struct EffectsArgs {
    /// Print kinds and default settings as JSON
    #[arg(long)]
    json: bool,
}

/// Arguments for the `info` command.
#[derive(Args)]
struct InfoArgs {
    /// Input PNG(s)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Print as JSON
    #[arg(long)]
    json: bool,
}

/// Installs the stderr subscriber. `RUST_LOG` overrides the `-v` level.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Render(args) => commands::render::run(args, cli.verbose),
        Commands::Apply(args) => commands::apply::run(args, cli.verbose),
        Commands::Init(args) => commands::init::run(args, cli.verbose),
        Commands::Effects(args) => commands::effects::run(args),
        Commands::Info(args) => commands::info::run(args, cli.verbose),
    }
}
