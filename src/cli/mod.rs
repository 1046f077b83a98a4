//! CLI Module
//!
//! Command-line interface for the Vibemix mixer.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::catalog::Category;

/// Vibemix - layered mixer for generated music tracks
#[derive(Parser, Debug)]
#[command(name = "vibemix")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Mixer configuration file (JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scale a 16-bit WAV file by a volume factor
    #[command(name = "gain")]
    Gain {
        /// Input WAV file
        input: PathBuf,

        /// Output WAV file
        output: PathBuf,

        /// Volume between 0.0 and 1.0
        #[arg(long)]
        volume: f32,
    },

    /// Play WAV files on mixer layers and render each layer's output
    #[command(name = "mix")]
    Mix {
        /// Input WAV files
        #[arg(short, long = "input")]
        inputs: Vec<PathBuf>,

        /// Directory scanned for additional WAV files
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Per-layer volumes, in input order (missing ones stay at 1.0)
        #[arg(long = "volume")]
        volumes: Vec<f32>,

        /// Directory for rendered layers
        #[arg(short, long)]
        output_dir: PathBuf,
    },

    /// Generate tracks with the offline model and render them
    #[command(name = "generate")]
    Generate {
        /// Vibe for every track
        #[arg(long)]
        vibe: String,

        /// Category of the items
        #[arg(long, default_value = "genres")]
        category: Category,

        /// Genres or instruments, one track each
        items: Vec<String>,

        /// Length of each generated track in seconds
        #[arg(long, default_value_t = 2.0)]
        duration: f32,

        /// Make generation fail for prompts containing this text
        #[arg(long)]
        fail_on: Option<String>,

        /// Directory for generated tracks
        #[arg(short, long)]
        output_dir: PathBuf,
    },

    /// List catalog entries
    #[command(name = "catalog")]
    Catalog {
        /// Only list this category
        category: Option<Category>,
    },

    /// Print the per-layer track colors
    #[command(name = "palette")]
    Palette,
}
