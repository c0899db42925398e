//! Emulauncher - launch a game through an emulator adapter
//!
//! # Commands
//!
//! - `emulauncher launch` - Configure the emulator and run a game
//! - `emulauncher list` - List supported emulators
//! - `emulauncher init` - Write a default settings file
//!
//! # Usage
//!
//! ```bash
//! # Launch a PS3 game folder, forwarding frontend options
//! emulauncher launch --emulator rpcs3 --system ps3 --rom "roms/ps3/Game.ps3" \
//!     --option ps3_language=french --option discord=1
//!
//! # Configure, then print the command line instead of running it
//! emulauncher launch --emulator redream --system dreamcast --rom game.zip --dry-run
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use emulauncher_core::adapter::{LaunchContext, LaunchRequest, Services, prepare_launch, run_prepared};
use emulauncher_core::config::{self, Resolution, Settings};
use emulauncher_core::options::parse_assignment;
use emulauncher_core::{FeatureSet, Options};
use emulauncher_library::registry::create_adapter_registry;

/// Emulauncher - configure and launch emulators
#[derive(Parser)]
#[command(name = "emulauncher")]
#[command(about = "Configure and launch emulators for a game")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configure the emulator and run a game
    Launch(LaunchArgs),

    /// List supported emulators
    List,

    /// Write a default settings file
    Init(InitArgs),
}

#[derive(Args)]
struct LaunchArgs {
    /// Emulator name (e.g. rpcs3, redream)
    #[arg(long)]
    emulator: String,

    /// System identifier (e.g. ps3, dreamcast)
    #[arg(long)]
    system: String,

    /// Game path: file, folder, archive or playlist (relative paths fall back to the roms directory)
    #[arg(long)]
    rom: PathBuf,

    /// Frontend option as name=value (repeatable)
    #[arg(long = "option", value_name = "NAME=VALUE", value_parser = parse_assignment)]
    options: Vec<(String, String)>,

    /// Run the emulator windowed
    #[arg(long)]
    windowed: bool,

    /// Render resolution as WIDTHxHEIGHT
    #[arg(long)]
    resolution: Option<Resolution>,

    /// Print the command line instead of running the emulator
    #[arg(long)]
    dry_run: bool,

    /// Settings file (defaults to the platform config directory)
    #[arg(long)]
    settings: Option<PathBuf>,
}

#[derive(Args)]
struct InitArgs {
    /// Where to write the settings (defaults to the platform config directory)
    #[arg(long)]
    path: Option<PathBuf>,

    /// Overwrite an existing file
    #[arg(long)]
    force: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Launch(args) => {
            let code = execute_launch(args)?;
            std::process::exit(code);
        }
        Commands::List => {
            for id in create_adapter_registry().ids() {
                println!("{}", id);
            }
            Ok(())
        }
        Commands::Init(args) => execute_init(args),
    }
}

fn load_settings(path: Option<&PathBuf>) -> Result<Settings> {
    match path {
        Some(path) => config::load_from(path),
        None => Ok(config::load()),
    }
}

fn execute_launch(args: LaunchArgs) -> Result<i32> {
    let settings = load_settings(args.settings.as_ref())?;
    let registry = create_adapter_registry();
    let adapter = registry.find(&args.emulator)?;

    let options = Options::layered(&settings.options, args.options);
    let features: FeatureSet = settings.features_for(&args.emulator);
    let request = LaunchRequest {
        emulator: args.emulator,
        system: args.system,
        rom: settings.paths.resolve_rom(&args.rom),
        resolution: args.resolution,
        windowed: args.windowed || settings.display.windowed,
    };
    let ctx = LaunchContext {
        request: &request,
        options: &options,
        features: &features,
        settings: &settings,
    };
    let services = Services::system(&settings);

    let prepared = prepare_launch(adapter, &ctx, &services)?;
    if args.dry_run {
        println!("{}", prepared.spec.command_line());
        return Ok(0);
    }

    tracing::info!("Running {}", prepared.spec.command_line());
    run_prepared(adapter, &prepared, &services)
}

fn execute_init(args: InitArgs) -> Result<()> {
    let path = match args.path {
        Some(path) => path,
        None => config::settings_path().context("No config directory on this platform")?,
    };
    if path.exists() && !args.force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    config::save_to(&Settings::default(), &path)?;
    println!("Wrote {}", path.display());
    Ok(())
}
