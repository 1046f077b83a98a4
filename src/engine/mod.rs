//! Audio Engine Module
//!
//! Everything that touches an output channel directly:
//! - The host output channel abstraction
//! - Standalone (non-mixed) players
//! - WAV file I/O in layer format

pub mod io;
pub mod output;
pub mod player;

pub use io::{generate_tone_pcm, read_pcm16, write_pcm16, PcmClip};
pub use output::{AudioOutput, CaptureOutput, OutputEvent};
pub use player::{MultiTrackPlayer, MusicPlayer, PlaybackState};
