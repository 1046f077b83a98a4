//! Mix Session
//!
//! The application-level owner of the mixer. A session is created once,
//! lives for the whole run and is ticked once per frame. It turns a
//! [`GenerationRequest`] into tracks by asking the model for one track at a
//! time, with a pause between requests.

use std::collections::VecDeque;

use log::{info, warn};

use super::model::MusicModel;
use crate::catalog::{build_prompt, GenerationRequest};
use crate::config::{MixerConfig, DEFAULT_SAMPLE_RATE};
use crate::engine::{AudioOutput, MusicPlayer};
use crate::layers::AudioLayerManager;
use crate::tracks::{MixVisualization, MusicTrack, TrackColors};

#[derive(Debug, Clone)]
struct GenerationJob {
    item: String,
    prompt: String,
}

/// Result of one generation job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOutcome {
    /// Index of the spawned track in [`MixSession::tracks`]
    pub track_index: usize,
    pub item: String,
    pub success: bool,
}

/// What happened during one [`MixSession::tick`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Layers whose audio was resubmitted with a new volume
    pub resubmitted: usize,
    /// Generation job finished during this tick, if any
    pub generated: Option<GenerationOutcome>,
}

/// Owns the mixer, the fallback player and the generated tracks
#[derive(Debug)]
pub struct MixSession<O: AudioOutput> {
    config: MixerConfig,
    mixer: AudioLayerManager<O>,
    fallback: Option<MusicPlayer<O>>,
    colors: TrackColors,
    tracks: Vec<MusicTrack>,
    queue: VecDeque<GenerationJob>,
    cooldown: f32,
}

impl<O: AudioOutput> MixSession<O> {
    /// Take ownership of the mixer and initialise it at 48 kHz
    pub fn new(
        config: MixerConfig,
        mixer: AudioLayerManager<O>,
        fallback: Option<MusicPlayer<O>>,
    ) -> Self {
        let mut mixer = mixer.with_config(&config);
        if !mixer.is_ready() {
            mixer.initialize(DEFAULT_SAMPLE_RATE);
        }

        let mut fallback = fallback;
        if let Some(player) = fallback.as_mut() {
            player.initialize(DEFAULT_SAMPLE_RATE);
        }

        Self {
            config,
            mixer,
            fallback,
            colors: TrackColors::new(),
            tracks: Vec::new(),
            queue: VecDeque::new(),
            cooldown: 0.0,
        }
    }

    pub fn config(&self) -> &MixerConfig {
        &self.config
    }

    pub fn mixer(&self) -> &AudioLayerManager<O> {
        &self.mixer
    }

    pub fn mixer_mut(&mut self) -> &mut AudioLayerManager<O> {
        &mut self.mixer
    }

    pub fn fallback(&self) -> Option<&MusicPlayer<O>> {
        self.fallback.as_ref()
    }

    pub fn colors(&self) -> &TrackColors {
        &self.colors
    }

    pub fn tracks(&self) -> &[MusicTrack] {
        &self.tracks
    }

    /// Jobs still waiting to be sent to the model
    pub fn pending_jobs(&self) -> usize {
        self.queue.len()
    }

    pub fn is_generating(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Replace all tracks with one queued job per requested item
    pub fn create_tracks(&mut self, request: &GenerationRequest) {
        self.close_all();

        self.queue = request
            .items
            .iter()
            .map(|item| GenerationJob {
                item: item.clone(),
                prompt: build_prompt(&request.vibe, item, request.category, request.bpm),
            })
            .collect();
        self.cooldown = 0.0;

        info!(
            "[MixSession] Queued {} {} tracks for vibe '{}' at {} BPM",
            self.queue.len(),
            request.category,
            request.vibe,
            request.bpm
        );
    }

    /// Advance one frame: debounced volumes first, then the generation queue
    pub fn tick<M: MusicModel + ?Sized>(&mut self, dt_secs: f32, model: &mut M) -> TickReport {
        let dt_secs = if dt_secs.is_finite() { dt_secs.max(0.0) } else { 0.0 };
        TickReport {
            resubmitted: self.mixer.tick(dt_secs),
            generated: self.advance_generation(dt_secs, model),
        }
    }

    fn advance_generation<M: MusicModel + ?Sized>(
        &mut self,
        dt_secs: f32,
        model: &mut M,
    ) -> Option<GenerationOutcome> {
        if self.queue.is_empty() {
            return None;
        }
        if self.cooldown > 0.0 {
            self.cooldown -= dt_secs;
            if self.cooldown > 0.0 {
                return None;
            }
        }

        let job = self.queue.pop_front()?;
        let mut track = MusicTrack::new(job.item.clone());
        track.attach(&mut self.mixer);
        if self.config.generation.start_muted {
            track.set_volume(&mut self.mixer, 0.0);
        }

        let result = model
            .generate(&job.prompt)
            .and_then(|b64| track.set_b64_audio(&b64));

        let success = match result {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    "[MixSession] {} failed for '{}': {}",
                    model.name(),
                    job.item,
                    e
                );
                track.set_title(format!("Error: {}", job.item));
                false
            }
        };

        self.tracks.push(track);
        // Wait before the next request whether or not this one succeeded
        self.cooldown = self.config.generation.delay_secs;

        Some(GenerationOutcome {
            track_index: self.tracks.len() - 1,
            item: job.item,
            success,
        })
    }

    /// Play a track on its layer (or the fallback player)
    pub fn play_track(&mut self, index: usize) -> bool {
        match self.tracks.get_mut(index) {
            Some(track) => track.play(&mut self.mixer, self.fallback.as_mut()),
            None => false,
        }
    }

    /// Play every track that has audio. Returns how many started.
    pub fn play_all(&mut self) -> usize {
        (0..self.tracks.len())
            .filter(|&i| self.play_track(i))
            .count()
    }

    /// Set a track's volume; returns the percentage label
    pub fn set_track_volume(&mut self, index: usize, volume: f32) -> Option<String> {
        self.tracks
            .get_mut(index)
            .map(|track| track.set_volume(&mut self.mixer, volume))
    }

    /// Close every track, stop the fallback player and drop queued jobs
    pub fn close_all(&mut self) {
        for track in &mut self.tracks {
            track.close(&mut self.mixer);
        }
        self.tracks.clear();
        self.queue.clear();
        if let Some(player) = self.fallback.as_mut() {
            player.stop_audio();
        }
    }

    pub fn visualization(&self) -> MixVisualization {
        MixVisualization::compute(&self.mixer, &self.colors)
    }
}
