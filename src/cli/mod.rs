//! Command-line interface definitions

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Auris - adaptive hearing-aid audio pipeline
#[derive(Parser, Debug)]
#[command(name = "auris-cli", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Process a WAV file through the adaptive pipeline
    Process {
        /// Input WAV file
        #[arg(long)]
        input: PathBuf,

        /// Output WAV file
        #[arg(long)]
        output: PathBuf,

        /// Apply a fixed preset instead of running the decision loop
        #[arg(long)]
        preset: Option<String>,

        /// Frame length in milliseconds
        #[arg(long, default_value_t = 250)]
        frame_ms: u32,
    },

    /// Extract and print audio features as JSON
    Features {
        /// Input WAV file
        #[arg(long)]
        input: PathBuf,
    },

    /// List available strategy presets
    Presets,
}
