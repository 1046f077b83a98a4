//! Standalone Players
//!
//! Players that own a single output channel outright instead of borrowing a
//! layer from the mixer. `MusicPlayer` is the fallback used when the layer
//! pool is exhausted; `MultiTrackPlayer` keeps per-track transport state.

use std::fmt;
use std::sync::Arc;

use log::{debug, info, warn};

use super::output::AudioOutput;
use crate::config::DEFAULT_CHANNEL_COUNT;

// ============================================================================
// MusicPlayer
// ============================================================================

/// Non-mixed fallback player
///
/// Every `play_audio` call replaces what was playing before. Volume is not
/// supported; audio plays at the level it was generated at.
#[derive(Debug)]
pub struct MusicPlayer<O> {
    output: O,
    channels: u16,
}

impl<O: AudioOutput> MusicPlayer<O> {
    pub fn new(output: O) -> Self {
        Self {
            output,
            channels: DEFAULT_CHANNEL_COUNT,
        }
    }

    /// Initialise the underlying channel
    pub fn initialize(&mut self, sample_rate: u32) {
        self.output.initialize(sample_rate);
        info!("[MusicPlayer] Initialized at {} Hz", sample_rate);
    }

    /// Interrupt the current audio and play `pcm` instead
    pub fn play_audio(&mut self, pcm: &[u8]) {
        debug!("[MusicPlayer] Playing {} bytes", pcm.len());
        self.output.interrupt_audio_output();
        self.output.add_audio_frame(pcm, self.channels);
    }

    pub fn stop_audio(&mut self) {
        debug!("[MusicPlayer] Stopping audio");
        self.output.interrupt_audio_output();
    }

    pub fn output(&self) -> &O {
        &self.output
    }
}

// ============================================================================
// MultiTrackPlayer
// ============================================================================

/// Transport state of a [`MultiTrackPlayer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackState::Stopped => write!(f, "Stopped"),
            PlaybackState::Playing => write!(f, "Playing"),
            PlaybackState::Paused => write!(f, "Paused"),
        }
    }
}

/// A player bound to one track with play/pause/stop transport
///
/// The output has no gain control, so `set_volume` only records the value.
/// Use a mixer layer when the volume has to be audible.
#[derive(Debug)]
pub struct MultiTrackPlayer<O> {
    output: O,
    track_id: String,
    audio: Option<Arc<[u8]>>,
    state: PlaybackState,
    volume: f32,
}

impl<O: AudioOutput> MultiTrackPlayer<O> {
    pub fn new(output: O, track_id: impl Into<String>) -> Self {
        Self {
            output,
            track_id: track_id.into(),
            audio: None,
            state: PlaybackState::Stopped,
            volume: 1.0,
        }
    }

    pub fn initialize(&mut self, sample_rate: u32) {
        self.output.initialize(sample_rate);
        info!("[MultiTrackPlayer:{}] Initialized", self.track_id);
    }

    pub fn track_id(&self) -> &str {
        &self.track_id
    }

    pub fn set_track_id(&mut self, id: impl Into<String>) {
        self.track_id = id.into();
    }

    pub fn set_audio(&mut self, audio: Arc<[u8]>) {
        self.audio = Some(audio);
        debug!("[MultiTrackPlayer:{}] Audio data set", self.track_id);
    }

    /// Start playback; does nothing when no audio has been set
    pub fn play(&mut self) {
        let Some(audio) = &self.audio else {
            warn!("[MultiTrackPlayer:{}] Cannot play - no audio", self.track_id);
            return;
        };

        self.output.add_audio_frame(audio, DEFAULT_CHANNEL_COUNT);
        self.state = PlaybackState::Playing;
        debug!("[MultiTrackPlayer:{}] Playing", self.track_id);
    }

    pub fn pause(&mut self) {
        self.output.interrupt_audio_output();
        self.state = PlaybackState::Paused;
        debug!("[MultiTrackPlayer:{}] Paused", self.track_id);
    }

    pub fn stop(&mut self) {
        self.output.interrupt_audio_output();
        self.state = PlaybackState::Stopped;
        debug!("[MultiTrackPlayer:{}] Stopped", self.track_id);
    }

    /// Pause when playing, play otherwise. Returns true if now playing.
    pub fn toggle_play_pause(&mut self) -> bool {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
        self.is_playing()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn is_paused(&self) -> bool {
        self.state == PlaybackState::Paused
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        debug!("[MultiTrackPlayer:{}] Volume: {}", self.track_id, self.volume);
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn output(&self) -> &O {
        &self.output
    }
}
