//! Mixer configuration
//!
//! Persisted as JSON. Missing fields fall back to their defaults so that a
//! partial file (e.g. only `debounce_secs`) is still valid. The audio format
//! is fixed (stereo, 48 kHz) and cannot be configured.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MixerError, Result};

/// Sample rate every layer is initialised with
pub const DEFAULT_SAMPLE_RATE: u32 = 48000;

/// Layers always receive interleaved stereo
pub const DEFAULT_CHANNEL_COUNT: u16 = 2;

/// Delay after the last volume change before it is baked into the audio
pub const DEFAULT_DEBOUNCE_SECS: f32 = 0.15;

/// Pause between two consecutive generation requests
pub const DEFAULT_GENERATION_DELAY_SECS: f32 = 2.0;

/// Tempo used when a vibe has no entry in the tempo table
pub const DEFAULT_BPM: u32 = 90;

/// Settings for sequential track generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Seconds to wait after each request before issuing the next one
    pub delay_secs: f32,
    /// Newly spawned tracks start with their volume at zero
    pub start_muted: bool,
    /// Tempo for vibes missing from the tempo table
    pub default_bpm: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            delay_secs: DEFAULT_GENERATION_DELAY_SECS,
            start_muted: true,
            default_bpm: DEFAULT_BPM,
        }
    }
}

/// Top-level mixer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MixerConfig {
    /// Debounce window for volume changes, in seconds
    pub debounce_secs: f32,
    /// Generation queue settings
    pub generation: GenerationConfig,
}

impl Default for MixerConfig {
    fn default() -> Self {
        Self {
            debounce_secs: DEFAULT_DEBOUNCE_SECS,
            generation: GenerationConfig::default(),
        }
    }
}

impl MixerConfig {
    /// Load a configuration from a JSON file and validate it
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| MixerError::FileNotFound {
            path: path.display().to_string(),
            source: Some(e),
        })?;
        let config: MixerConfig = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when given, otherwise use the defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Write the configuration as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Reject values the mixer cannot work with
    pub fn validate(&self) -> Result<()> {
        if !self.debounce_secs.is_finite() || self.debounce_secs < 0.0 {
            return Err(MixerError::InvalidConfig {
                reason: format!(
                    "debounce_secs must be a non-negative number, got {}",
                    self.debounce_secs
                ),
            });
        }
        if !self.generation.delay_secs.is_finite() || self.generation.delay_secs < 0.0 {
            return Err(MixerError::InvalidConfig {
                reason: format!(
                    "generation.delay_secs must be a non-negative number, got {}",
                    self.generation.delay_secs
                ),
            });
        }
        if self.generation.default_bpm == 0 {
            return Err(MixerError::InvalidConfig {
                reason: "generation.default_bpm must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
