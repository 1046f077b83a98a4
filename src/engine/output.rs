//! Audio Output Channels
//!
//! The host runtime owns the actual audio device. Each mixer layer talks to
//! one host-provided channel through the [`AudioOutput`] trait.

/// A host-provided streaming output channel
///
/// Channels only understand whole-buffer submission and interruption; there
/// is no runtime volume control, which is why gain is baked into the PCM.
pub trait AudioOutput {
    /// Prepare the channel for the given sample rate
    fn initialize(&mut self, sample_rate: u32);

    /// Queue interleaved signed 16-bit little-endian PCM for playback
    fn add_audio_frame(&mut self, pcm: &[u8], channels: u16);

    /// Stop whatever is currently playing and drop queued audio
    fn interrupt_audio_output(&mut self);
}

impl<T: AudioOutput + ?Sized> AudioOutput for Box<T> {
    fn initialize(&mut self, sample_rate: u32) {
        (**self).initialize(sample_rate);
    }

    fn add_audio_frame(&mut self, pcm: &[u8], channels: u16) {
        (**self).add_audio_frame(pcm, channels);
    }

    fn interrupt_audio_output(&mut self) {
        (**self).interrupt_audio_output();
    }
}

/// One call received by a [`CaptureOutput`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputEvent {
    /// `initialize` was called with this sample rate
    Initialized(u32),
    /// A buffer was submitted
    Frame { pcm: Vec<u8>, channels: u16 },
    /// Output was interrupted
    Interrupted,
}

/// In-memory output that records every call
///
/// Used for offline rendering in the CLI and for asserting exactly what a
/// layer submitted.
#[derive(Debug, Clone, Default)]
pub struct CaptureOutput {
    events: Vec<OutputEvent>,
    sample_rate: Option<u32>,
}

impl CaptureOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample rate from the last `initialize` call
    pub fn sample_rate(&self) -> Option<u32> {
        self.sample_rate
    }

    /// Every recorded call in order
    pub fn events(&self) -> &[OutputEvent] {
        &self.events
    }

    /// All submitted buffers in order
    pub fn frames(&self) -> Vec<&[u8]> {
        self.events
            .iter()
            .filter_map(|e| match e {
                OutputEvent::Frame { pcm, .. } => Some(pcm.as_slice()),
                _ => None,
            })
            .collect()
    }

    /// The most recently submitted buffer
    pub fn last_frame(&self) -> Option<&[u8]> {
        self.events.iter().rev().find_map(|e| match e {
            OutputEvent::Frame { pcm, .. } => Some(pcm.as_slice()),
            _ => None,
        })
    }

    /// Number of submitted buffers
    pub fn frame_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, OutputEvent::Frame { .. }))
            .count()
    }

    /// Number of interruptions
    pub fn interrupt_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, OutputEvent::Interrupted))
            .count()
    }

    /// True when the last call was a submission, i.e. audio is still queued
    pub fn is_playing(&self) -> bool {
        matches!(self.events.last(), Some(OutputEvent::Frame { .. }))
    }

    /// Forget recorded calls (the sample rate is kept)
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl AudioOutput for CaptureOutput {
    fn initialize(&mut self, sample_rate: u32) {
        self.sample_rate = Some(sample_rate);
        self.events.push(OutputEvent::Initialized(sample_rate));
    }

    fn add_audio_frame(&mut self, pcm: &[u8], channels: u16) {
        self.events.push(OutputEvent::Frame {
            pcm: pcm.to_vec(),
            channels,
        });
    }

    fn interrupt_audio_output(&mut self) {
        self.events.push(OutputEvent::Interrupted);
    }
}
