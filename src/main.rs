//! Auris CLI - adaptive hearing-aid audio pipeline
//!
//! Command-line interface for processing WAV files through the pipeline,
//! inspecting extracted features and listing strategy presets.

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::info;

use auris::cli::{commands, Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    info!("Auris v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(cmd) => handle_command(cmd),
        None => {
            println!("Auris v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

fn handle_command(cmd: Commands) -> anyhow::Result<()> {
    match cmd {
        Commands::Process {
            input,
            output,
            preset,
            frame_ms,
        } => commands::process(&input, &output, preset.as_deref(), frame_ms)
            .with_context(|| format!("processing {}", input.display())),
        Commands::Features { input } => commands::features(&input)
            .with_context(|| format!("extracting features from {}", input.display())),
        Commands::Presets => commands::presets().context("listing presets"),
    }
}
