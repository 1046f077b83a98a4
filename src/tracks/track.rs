//! Music Track
//!
//! A generated track as seen by the mixer: it borrows one layer for its
//! lifetime and falls back to a standalone player if the pool was full.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use log::{debug, info, warn};
use uuid::Uuid;

use crate::engine::{AudioOutput, MusicPlayer};
use crate::error::Result;
use crate::layers::AudioLayerManager;

/// One generated track and its playback state
#[derive(Debug, Clone)]
pub struct MusicTrack {
    id: Uuid,
    name: String,
    title: String,
    layer: Option<usize>,
    audio: Option<Arc<[u8]>>,
    playing: bool,
    volume: f32,
}

impl MusicTrack {
    /// Create a track named after the catalog item it was generated from
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: Uuid::new_v4(),
            title: name.clone(),
            name,
            layer: None,
            audio: None,
            playing: false,
            volume: 1.0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Mixer layer owned by this track, if any
    pub fn layer(&self) -> Option<usize> {
        self.layer
    }

    pub fn has_audio(&self) -> bool {
        self.audio.is_some()
    }

    pub fn audio(&self) -> Option<&Arc<[u8]>> {
        self.audio.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Volume as last set through [`set_volume`](Self::set_volume)
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Claim a mixer layer if the mixer is ready and has one free
    ///
    /// Returns the layer. A track that already holds a layer keeps it.
    pub fn attach<O: AudioOutput>(&mut self, mixer: &mut AudioLayerManager<O>) -> Option<usize> {
        if self.layer.is_none() && mixer.is_ready() {
            self.layer = mixer.acquire();
            match self.layer {
                Some(layer) => debug!("[MusicTrack:{}] Attached to layer {}", self.name, layer),
                None => warn!("[MusicTrack:{}] No layer free, will use fallback player", self.name),
            }
        }
        self.layer
    }

    /// Decode a base64 PCM payload and make it playable
    pub fn set_b64_audio(&mut self, b64: &str) -> Result<()> {
        let decoded = STANDARD.decode(b64.trim())?;
        self.set_audio(Arc::from(decoded));
        Ok(())
    }

    pub fn set_audio(&mut self, pcm: Arc<[u8]>) {
        info!("[MusicTrack:{}] Audio ready ({} bytes)", self.name, pcm.len());
        self.audio = Some(pcm);
    }

    /// Start playback on the track's layer, or on `fallback` without one
    ///
    /// Returns true if playback started. Nothing happens before audio is set.
    pub fn play<O: AudioOutput, P: AudioOutput>(
        &mut self,
        mixer: &mut AudioLayerManager<O>,
        fallback: Option<&mut MusicPlayer<P>>,
    ) -> bool {
        let Some(audio) = self.audio.clone() else {
            return false;
        };

        match (self.layer, fallback) {
            (Some(layer), _) => mixer.play_on_layer(layer, audio),
            (None, Some(player)) => player.play_audio(&audio),
            (None, None) => return false,
        }
        self.playing = true;
        true
    }

    /// Forward a slider value to the track's layer
    ///
    /// Returns the percentage label shown next to the slider.
    pub fn set_volume<O: AudioOutput>(&mut self, mixer: &mut AudioLayerManager<O>, value: f32) -> String {
        self.volume = if value.is_nan() {
            0.0
        } else {
            value.clamp(0.0, 1.0)
        };
        if let Some(layer) = self.layer {
            mixer.set_layer_volume(layer, value);
        }
        volume_label(self.volume)
    }

    /// Release the layer and stop playback
    pub fn close<O: AudioOutput>(&mut self, mixer: &mut AudioLayerManager<O>) {
        if let Some(layer) = self.layer.take() {
            mixer.release(layer);
            debug!("[MusicTrack:{}] Released layer {}", self.name, layer);
        }
        self.playing = false;
    }
}

/// Percentage label for a volume, e.g. `"50%"`
pub fn volume_label(volume: f32) -> String {
    format!("{}%", (volume * 100.0).round() as i32)
}
