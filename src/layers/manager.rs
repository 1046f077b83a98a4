//! Audio Layer Manager
//!
//! A fixed pool of output channels ("layers"). Consumers acquire a layer,
//! play raw PCM on it, drag its volume around and release it when done.
//!
//! Output channels cannot change gain at runtime, so volume is baked into
//! the PCM and the buffer is resubmitted. Volume changes arrive once per
//! frame while a slider is dragged; they are debounced so that only the
//! final value of a burst is re-applied.
//!
//! All operations are synchronous and meant to be driven from a single
//! frame loop. Invalid indices are ignored rather than reported.

use std::sync::Arc;

use log::{debug, info, warn};

use super::slot::LayerSlot;
use crate::config::{MixerConfig, DEFAULT_CHANNEL_COUNT, DEFAULT_DEBOUNCE_SECS};
use crate::dsp::apply_volume;
use crate::engine::AudioOutput;

/// Number of layers in the pool
pub const LAYER_COUNT: usize = 10;

#[derive(Debug)]
struct Layer<O> {
    output: Option<O>,
    slot: LayerSlot,
}

/// Fixed-size pool of independently controllable output layers
///
/// Construct it once, call [`initialize`](Self::initialize), then pass it by
/// `&mut` to every consumer and call [`tick`](Self::tick) once per frame.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use vibemix::engine::CaptureOutput;
/// use vibemix::layers::AudioLayerManager;
///
/// let mut mixer = AudioLayerManager::from_fn(|_| Some(CaptureOutput::new()));
/// mixer.initialize(48000);
///
/// let layer = mixer.acquire().expect("pool has free layers");
/// mixer.play_on_layer(layer, Arc::from(vec![0u8; 4]));
/// mixer.set_layer_volume(layer, 0.5);
/// assert_eq!(mixer.layer_volume(layer), 0.5);
///
/// // Nothing is resubmitted until the debounce window has passed
/// assert_eq!(mixer.tick(0.1), 0);
/// assert_eq!(mixer.tick(0.1), 1);
/// ```
#[derive(Debug)]
pub struct AudioLayerManager<O> {
    layers: Vec<Layer<O>>,
    debounce_secs: f32,
    sample_rate: Option<u32>,
}

impl<O: AudioOutput> AudioLayerManager<O> {
    /// Create a pool from exactly [`LAYER_COUNT`] channels
    ///
    /// A `None` entry is a layer without a backing channel; it can be
    /// acquired but playback on it does nothing.
    pub fn new(outputs: [Option<O>; LAYER_COUNT]) -> Self {
        Self {
            layers: outputs
                .into_iter()
                .map(|output| Layer {
                    output,
                    slot: LayerSlot::default(),
                })
                .collect(),
            debounce_secs: DEFAULT_DEBOUNCE_SECS,
            sample_rate: None,
        }
    }

    /// Create a pool by building the channel for each layer index
    pub fn from_fn(mut make_output: impl FnMut(usize) -> Option<O>) -> Self {
        Self::new(std::array::from_fn(|i| make_output(i)))
    }

    /// Apply the debounce window from a configuration
    pub fn with_config(mut self, config: &MixerConfig) -> Self {
        self.debounce_secs = config.debounce_secs;
        self
    }

    /// Initialise every backing channel at `sample_rate`
    ///
    /// Must be called once before any other operation; until then the pool
    /// hands out no layers. Later calls are ignored.
    pub fn initialize(&mut self, sample_rate: u32) {
        if let Some(current) = self.sample_rate {
            warn!(
                "[AudioLayerManager] Already initialized at {} Hz, ignoring {} Hz",
                current, sample_rate
            );
            return;
        }

        for layer in &mut self.layers {
            if let Some(output) = layer.output.as_mut() {
                output.initialize(sample_rate);
            }
        }
        self.sample_rate = Some(sample_rate);

        info!(
            "[AudioLayerManager] Initialized {} layers at {} Hz",
            self.layers.len(),
            sample_rate
        );
    }

    pub fn is_ready(&self) -> bool {
        self.sample_rate.is_some()
    }

    pub fn sample_rate(&self) -> Option<u32> {
        self.sample_rate
    }

    pub fn debounce_secs(&self) -> f32 {
        self.debounce_secs
    }

    /// Total number of layers (always [`LAYER_COUNT`])
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    fn layer(&self, index: usize) -> Option<&Layer<O>> {
        if !self.is_ready() {
            return None;
        }
        self.layers.get(index)
    }

    fn layer_mut(&mut self, index: usize) -> Option<&mut Layer<O>> {
        if !self.is_ready() {
            return None;
        }
        self.layers.get_mut(index)
    }

    // ========================================================================
    // Ownership
    // ========================================================================

    /// Claim the lowest free layer
    ///
    /// The layer starts at full volume with no audio. Returns `None` when all
    /// layers are taken; callers should fall back to a non-mixed player.
    pub fn acquire(&mut self) -> Option<usize> {
        if !self.is_ready() {
            return None;
        }

        let index = self.layers.iter().position(|l| !l.slot.in_use);
        match index {
            Some(i) => {
                self.layers[i].slot.claim();
                debug!("[AudioLayerManager] Acquired layer {}", i);
            }
            None => warn!("[AudioLayerManager] No free layer available"),
        }
        index
    }

    /// Free a layer, drop its audio and pending volume, and stop its output
    pub fn release(&mut self, index: usize) {
        let Some(layer) = self.layer_mut(index) else {
            return;
        };
        layer.slot.free();
        self.stop_layer(index);
        debug!("[AudioLayerManager] Released layer {}", index);
    }

    pub fn is_in_use(&self, index: usize) -> bool {
        self.layer(index).map_or(false, |l| l.slot.in_use)
    }

    /// Number of layers currently owned by a consumer
    pub fn active_layer_count(&self) -> usize {
        if !self.is_ready() {
            return 0;
        }
        self.layers.iter().filter(|l| l.slot.in_use).count()
    }

    /// `(index, volume)` of every owned layer, in index order
    pub fn active_layers(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.layers
            .iter()
            .enumerate()
            .filter(|(_, l)| l.slot.in_use)
            .map(|(i, l)| (i, l.slot.volume))
    }

    // ========================================================================
    // Playback
    // ========================================================================

    /// Replace whatever the layer is playing with `pcm` at the layer volume
    ///
    /// The raw audio is kept so later volume changes can be re-applied.
    /// A volume change still waiting on the debounce window is cancelled.
    pub fn play_on_layer(&mut self, index: usize, pcm: Arc<[u8]>) {
        let Some(layer) = self.layer_mut(index) else {
            return;
        };
        let Some(output) = layer.output.as_mut() else {
            return;
        };

        {
            let adjusted = apply_volume(&pcm, layer.slot.volume);
            output.interrupt_audio_output();
            output.add_audio_frame(&adjusted, DEFAULT_CHANNEL_COUNT);
        }

        // The buffer just submitted already carries the current volume
        layer.slot.pending_volume.cancel();
        layer.slot.raw_audio = Some(pcm);

        debug!(
            "[AudioLayerManager] Playing {} bytes on layer {} at volume {:.2}",
            layer.slot.raw_audio.as_ref().map_or(0, |a| a.len()),
            index,
            layer.slot.volume
        );
    }

    /// Interrupt a layer's output without giving up ownership
    pub fn stop_layer(&mut self, index: usize) {
        if let Some(output) = self.layer_mut(index).and_then(|l| l.output.as_mut()) {
            output.interrupt_audio_output();
        }
    }

    /// Interrupt every layer's output
    pub fn stop_all(&mut self) {
        if !self.is_ready() {
            return;
        }
        for output in self.layers.iter_mut().filter_map(|l| l.output.as_mut()) {
            output.interrupt_audio_output();
        }
    }

    pub fn has_audio(&self, index: usize) -> bool {
        self.layer(index).map_or(false, |l| l.slot.has_audio())
    }

    // ========================================================================
    // Volume
    // ========================================================================

    /// Set a layer's volume, clamped to [0, 1]
    ///
    /// The new value is visible through [`layer_volume`](Self::layer_volume)
    /// immediately. If the layer holds audio, re-applying it is deferred until
    /// no further change has arrived for the debounce window. NaN is treated
    /// as silence.
    pub fn set_layer_volume(&mut self, index: usize, volume: f32) {
        let debounce_secs = self.debounce_secs;
        let Some(layer) = self.layer_mut(index) else {
            return;
        };

        let clamped = if volume.is_nan() {
            0.0
        } else {
            volume.clamp(0.0, 1.0)
        };
        layer.slot.volume = clamped;

        if layer.slot.has_audio() {
            layer.slot.pending_volume.schedule(clamped, debounce_secs);
        }
    }

    /// Last requested volume, or 0.0 for an invalid index
    pub fn layer_volume(&self, index: usize) -> f32 {
        self.layer(index).map_or(0.0, |l| l.slot.volume)
    }

    pub fn has_pending_volume(&self, index: usize) -> bool {
        self.layer(index)
            .map_or(false, |l| l.slot.pending_volume.is_pending())
    }

    /// Advance debounce timers by `dt_secs`
    ///
    /// Layers whose timer expires get their audio re-scaled and resubmitted.
    /// Returns how many layers were resubmitted. A negative or non-finite
    /// `dt_secs` advances nothing.
    pub fn tick(&mut self, dt_secs: f32) -> usize {
        if !self.is_ready() {
            return 0;
        }
        if !dt_secs.is_finite() || dt_secs < 0.0 {
            warn!("[AudioLayerManager] Ignoring tick of {} s", dt_secs);
            return 0;
        }

        let mut applied = 0;

        for (index, layer) in self.layers.iter_mut().enumerate() {
            let Some(volume) = layer.slot.pending_volume.advance(dt_secs) else {
                continue;
            };
            let (Some(audio), Some(output)) = (layer.slot.raw_audio.as_ref(), layer.output.as_mut())
            else {
                continue;
            };

            let adjusted = apply_volume(audio, volume);
            output.interrupt_audio_output();
            output.add_audio_frame(&adjusted, DEFAULT_CHANNEL_COUNT);
            applied += 1;

            debug!(
                "[AudioLayerManager] Applied volume {:.2} to layer {}",
                volume, index
            );
        }

        applied
    }

    // ========================================================================
    // Channel access
    // ========================================================================

    /// The backing channel of a layer, if it has one
    pub fn output(&self, index: usize) -> Option<&O> {
        self.layers.get(index).and_then(|l| l.output.as_ref())
    }

    pub fn output_mut(&mut self, index: usize) -> Option<&mut O> {
        self.layers.get_mut(index).and_then(|l| l.output.as_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::{pcm_to_samples, samples_to_pcm};
    use crate::engine::{CaptureOutput, OutputEvent};
    use approx::assert_relative_eq;

    fn ready_mixer() -> AudioLayerManager<CaptureOutput> {
        let mut mixer = AudioLayerManager::from_fn(|_| Some(CaptureOutput::new()));
        mixer.initialize(48000);
        mixer
    }

    fn audio(samples: &[i16]) -> Arc<[u8]> {
        Arc::from(samples_to_pcm(samples))
    }

    #[test]
    fn test_initialize_all_channels() {
        let mixer = ready_mixer();
        assert!(mixer.is_ready());
        assert_eq!(mixer.layer_count(), LAYER_COUNT);
        for i in 0..LAYER_COUNT {
            assert_eq!(mixer.output(i).unwrap().sample_rate(), Some(48000));
        }
    }

    #[test]
    fn test_second_initialize_ignored() {
        let mut mixer = ready_mixer();
        mixer.initialize(44100);
        assert_eq!(mixer.sample_rate(), Some(48000));
        assert_eq!(mixer.output(0).unwrap().events().len(), 1);
    }

    #[test]
    fn test_not_ready_is_inert() {
        let mut mixer = AudioLayerManager::from_fn(|_| Some(CaptureOutput::new()));
        assert!(!mixer.is_ready());
        assert_eq!(mixer.acquire(), None);
        mixer.set_layer_volume(0, 0.5);
        assert_eq!(mixer.layer_volume(0), 0.0);
        mixer.play_on_layer(0, audio(&[1, 2]));
        assert_eq!(mixer.output(0).unwrap().frame_count(), 0);
        assert_eq!(mixer.active_layer_count(), 0);
        assert_eq!(mixer.tick(1.0), 0);
    }

    #[test]
    fn test_acquire_exhausts_pool() {
        let mut mixer = ready_mixer();
        let acquired: Vec<usize> = (0..LAYER_COUNT).map(|_| mixer.acquire().unwrap()).collect();

        assert_eq!(acquired, (0..LAYER_COUNT).collect::<Vec<_>>());
        assert_eq!(mixer.acquire(), None);
        assert_eq!(mixer.active_layer_count(), LAYER_COUNT);
    }

    #[test]
    fn test_release_makes_slot_reusable() {
        let mut mixer = ready_mixer();
        for _ in 0..3 {
            mixer.acquire();
        }
        mixer.release(1);

        assert_eq!(mixer.active_layer_count(), 2);
        assert!(!mixer.is_in_use(1));
        assert_eq!(mixer.acquire(), Some(1));
    }

    #[test]
    fn test_acquire_resets_volume_release_keeps_it() {
        let mut mixer = ready_mixer();
        let layer = mixer.acquire().unwrap();
        mixer.set_layer_volume(layer, 0.3);

        mixer.release(layer);
        assert_relative_eq!(mixer.layer_volume(layer), 0.3);

        assert_eq!(mixer.acquire(), Some(layer));
        assert_relative_eq!(mixer.layer_volume(layer), 1.0);
        assert!(!mixer.has_audio(layer));
    }

    #[test]
    fn test_release_clears_audio_and_pending() {
        let mut mixer = ready_mixer();
        let layer = mixer.acquire().unwrap();
        mixer.play_on_layer(layer, audio(&[1000; 4]));
        mixer.set_layer_volume(layer, 0.5);
        assert!(mixer.has_pending_volume(layer));

        mixer.release(layer);
        assert!(!mixer.has_audio(layer));
        assert!(!mixer.has_pending_volume(layer));
        assert!(!mixer.output(layer).unwrap().is_playing());
        assert_eq!(mixer.tick(1.0), 0);
    }

    #[test]
    fn test_invalid_indices_ignored() {
        let mut mixer = ready_mixer();
        mixer.release(LAYER_COUNT);
        mixer.stop_layer(99);
        mixer.play_on_layer(LAYER_COUNT, audio(&[1]));
        mixer.set_layer_volume(usize::MAX, 0.5);

        assert_eq!(mixer.layer_volume(LAYER_COUNT), 0.0);
        assert!(!mixer.is_in_use(LAYER_COUNT));
        assert_eq!(mixer.active_layer_count(), 0);
    }

    #[test]
    fn test_play_applies_current_volume() {
        let mut mixer = ready_mixer();
        let layer = mixer.acquire().unwrap();
        mixer.set_layer_volume(layer, 0.5);
        assert!(!mixer.has_pending_volume(layer));

        mixer.play_on_layer(layer, audio(&[1000, -1000]));

        let out = mixer.output(layer).unwrap();
        assert_eq!(pcm_to_samples(out.last_frame().unwrap()), vec![500, -500]);
        let tail = &out.events()[out.events().len() - 2..];
        assert_eq!(tail[0], OutputEvent::Interrupted);
        assert!(matches!(tail[1], OutputEvent::Frame { channels: 2, .. }));
    }

    #[test]
    fn test_play_replaces_previous_audio() {
        let mut mixer = ready_mixer();
        let layer = mixer.acquire().unwrap();
        mixer.play_on_layer(layer, audio(&[1, 1]));
        mixer.play_on_layer(layer, audio(&[2, 2]));

        let out = mixer.output(layer).unwrap();
        assert_eq!(out.frame_count(), 2);
        assert_eq!(out.interrupt_count(), 2);
        assert_eq!(pcm_to_samples(out.last_frame().unwrap()), vec![2, 2]);
    }

    #[test]
    fn test_volume_clamped() {
        let mut mixer = ready_mixer();
        let layer = mixer.acquire().unwrap();

        mixer.set_layer_volume(layer, 1.7);
        assert_eq!(mixer.layer_volume(layer), 1.0);
        mixer.set_layer_volume(layer, -3.0);
        assert_eq!(mixer.layer_volume(layer), 0.0);
        mixer.set_layer_volume(layer, f32::NAN);
        assert_eq!(mixer.layer_volume(layer), 0.0);
    }

    #[test]
    fn test_volume_burst_coalesces_to_last_value() {
        let mut mixer = ready_mixer();
        let layer = mixer.acquire().unwrap();
        mixer.play_on_layer(layer, audio(&[1000, -1000]));

        mixer.set_layer_volume(layer, 0.8);
        assert_eq!(mixer.tick(0.1), 0);
        mixer.set_layer_volume(layer, 0.25);
        assert_relative_eq!(mixer.layer_volume(layer), 0.25);

        // Window restarted by the second call
        assert_eq!(mixer.tick(0.1), 0);
        assert_eq!(mixer.tick(0.1), 1);
        assert_eq!(mixer.tick(1.0), 0);

        let out = mixer.output(layer).unwrap();
        assert_eq!(out.frame_count(), 2);
        assert_eq!(pcm_to_samples(out.last_frame().unwrap()), vec![250, -250]);
    }

    #[test]
    fn test_volume_without_audio_is_not_scheduled() {
        let mut mixer = ready_mixer();
        let layer = mixer.acquire().unwrap();
        mixer.set_layer_volume(layer, 0.4);

        assert!(!mixer.has_pending_volume(layer));
        assert_eq!(mixer.tick(1.0), 0);
        assert_eq!(mixer.output(layer).unwrap().frame_count(), 0);
    }

    #[test]
    fn test_stop_keeps_ownership_and_audio() {
        let mut mixer = ready_mixer();
        let a = mixer.acquire().unwrap();
        let b = mixer.acquire().unwrap();
        mixer.play_on_layer(a, audio(&[5, 5]));
        mixer.play_on_layer(b, audio(&[6, 6]));

        mixer.stop_layer(a);
        assert!(!mixer.output(a).unwrap().is_playing());
        assert!(mixer.output(b).unwrap().is_playing());

        mixer.stop_all();
        assert!(!mixer.output(b).unwrap().is_playing());
        assert!(mixer.is_in_use(a) && mixer.is_in_use(b));
        assert!(mixer.has_audio(a));
        assert_eq!(mixer.active_layer_count(), 2);
    }

    #[test]
    fn test_layer_without_channel() {
        let mut mixer: AudioLayerManager<CaptureOutput> =
            AudioLayerManager::from_fn(|i| if i == 0 { None } else { Some(CaptureOutput::new()) });
        mixer.initialize(48000);

        assert_eq!(mixer.acquire(), Some(0));
        mixer.play_on_layer(0, audio(&[1, 2]));
        assert!(!mixer.has_audio(0));
        assert!(mixer.output(0).is_none());

        mixer.set_layer_volume(0, 0.5);
        assert_relative_eq!(mixer.layer_volume(0), 0.5);
        assert_eq!(mixer.tick(1.0), 0);
    }

    #[test]
    fn test_with_config_debounce() {
        let mut config = MixerConfig::default();
        config.debounce_secs = 0.5;
        let mut mixer = AudioLayerManager::from_fn(|_| Some(CaptureOutput::new())).with_config(&config);
        mixer.initialize(48000);

        let layer = mixer.acquire().unwrap();
        mixer.play_on_layer(layer, audio(&[100]));
        mixer.set_layer_volume(layer, 0.5);

        assert_eq!(mixer.tick(0.3), 0);
        assert_eq!(mixer.tick(0.3), 1);
    }

    #[test]
    fn test_active_layers_reports_volumes() {
        let mut mixer = ready_mixer();
        let a = mixer.acquire().unwrap();
        let b = mixer.acquire().unwrap();
        mixer.set_layer_volume(b, 0.5);
        mixer.release(a);

        let active: Vec<(usize, f32)> = mixer.active_layers().collect();
        assert_eq!(active, vec![(b, 0.5)]);
    }

    #[test]
    fn test_play_cancels_pending_volume() {
        let mut mixer = ready_mixer();
        let layer = mixer.acquire().unwrap();
        mixer.play_on_layer(layer, audio(&[1000]));
        mixer.set_layer_volume(layer, 0.5);
        assert!(mixer.has_pending_volume(layer));

        mixer.play_on_layer(layer, audio(&[2000]));
        assert!(!mixer.has_pending_volume(layer));
        assert_eq!(mixer.tick(1.0), 0);
        let out = mixer.output(layer).unwrap();
        assert_eq!(pcm_to_samples(out.last_frame().unwrap()), vec![1000]);
    }

    #[test]
    fn test_configured_mixer_submits_stereo() {
        let mut config = MixerConfig::default();
        config.debounce_secs = 0.05;
        config.validate().unwrap();
        let mut mixer = AudioLayerManager::from_fn(|_| Some(CaptureOutput::new())).with_config(&config);
        mixer.initialize(48000);

        let layer = mixer.acquire().unwrap();
        mixer.play_on_layer(layer, audio(&[100, -100]));
        mixer.set_layer_volume(layer, 0.5);
        assert_eq!(mixer.tick(0.1), 1);

        let frames: Vec<u16> = mixer
            .output(layer)
            .unwrap()
            .events()
            .iter()
            .filter_map(|e| match e {
                OutputEvent::Frame { channels, .. } => Some(*channels),
                _ => None,
            })
            .collect();
        assert_eq!(frames, vec![2, 2]);
    }

    #[test]
    fn test_non_finite_tick_ignored() {
        let mut mixer = ready_mixer();
        let layer = mixer.acquire().unwrap();
        mixer.play_on_layer(layer, audio(&[1000]));
        mixer.set_layer_volume(layer, 0.5);

        assert_eq!(mixer.tick(f32::NAN), 0);
        assert_eq!(mixer.tick(f32::INFINITY), 0);
        assert_eq!(mixer.tick(-1.0), 0);
        assert!(mixer.has_pending_volume(layer));

        assert_eq!(mixer.tick(0.2), 1);
        let out = mixer.output(layer).unwrap();
        assert_eq!(pcm_to_samples(out.last_frame().unwrap()), vec![500]);
    }
}
