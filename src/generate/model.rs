//! Music model interface
//!
//! The real model is a remote service; the mixer only needs "prompt in,
//! base64 PCM out".

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use log::debug;

use crate::config::DEFAULT_SAMPLE_RATE;
use crate::engine::generate_tone_pcm;
use crate::error::{MixerError, Result};

/// A service that turns a text prompt into audio
pub trait MusicModel {
    /// Model identifier for logging
    fn name(&self) -> &str;

    /// Generate audio for `prompt`
    ///
    /// Returns base64-encoded interleaved stereo 16-bit PCM at 48 kHz.
    fn generate(&mut self, prompt: &str) -> Result<String>;
}

/// Offline model that answers every prompt with a sine tone
///
/// The tone frequency is derived from the prompt so different tracks are
/// distinguishable. Prompts containing a configured keyword fail.
#[derive(Debug, Clone)]
pub struct MockMusicModel {
    duration_secs: f32,
    fail_keywords: Vec<String>,
    requests: Vec<String>,
}

impl Default for MockMusicModel {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl MockMusicModel {
    pub fn new(duration_secs: f32) -> Self {
        Self {
            duration_secs,
            fail_keywords: Vec::new(),
            requests: Vec::new(),
        }
    }

    /// Fail any prompt containing `keyword`
    pub fn failing_on(mut self, keyword: impl Into<String>) -> Self {
        self.fail_keywords.push(keyword.into());
        self
    }

    /// Prompts received so far, in order
    pub fn requests(&self) -> &[String] {
        &self.requests
    }

    /// Tone frequency used for `prompt`, between 220 and 880 Hz
    pub fn frequency_for(prompt: &str) -> f32 {
        let hash = prompt
            .bytes()
            .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(u32::from(b)));
        220.0 + (hash % 661) as f32
    }
}

impl MusicModel for MockMusicModel {
    fn name(&self) -> &str {
        "mock-tone"
    }

    fn generate(&mut self, prompt: &str) -> Result<String> {
        self.requests.push(prompt.to_string());

        if let Some(keyword) = self.fail_keywords.iter().find(|k| prompt.contains(k.as_str())) {
            return Err(MixerError::Generation {
                item: prompt.to_string(),
                reason: format!("mock failure on '{}'", keyword),
            });
        }

        let frequency = Self::frequency_for(prompt);
        debug!("[MockMusicModel] {:.0} Hz tone for '{}'", frequency, prompt);

        let pcm = generate_tone_pcm(frequency, self.duration_secs, DEFAULT_SAMPLE_RATE, 0.5);
        Ok(STANDARD.encode(pcm))
    }
}
