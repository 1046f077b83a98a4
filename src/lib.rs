//! Vibemix - Layered Audio Mixer
//!
//! Plays several independently generated music tracks at once, each on its
//! own output channel with its own volume.
//!
//! # Architecture
//!
//! - `layers`: fixed pool of 10 output layers with debounced volume
//! - `dsp`: volume scaling of raw 16-bit PCM
//! - `engine`: output channel trait, players and WAV I/O
//! - `tracks`: generated tracks, track colors and the mix visualization
//! - `catalog`: vibes, genres, instruments and prompt construction
//! - `generate`: music model interface and the session that drives it

pub mod catalog;
pub mod cli;
pub mod config;
pub mod dsp;
pub mod engine;
pub mod error;
pub mod generate;
pub mod layers;
pub mod tracks;

pub use config::MixerConfig;
pub use error::{MixerError, Result};
