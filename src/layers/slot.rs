//! Layer Slot State
//!
//! One record per mixer layer: ownership flag, requested volume, the raw
//! audio last submitted, and the debounced volume application.

use std::sync::Arc;

/// A value waiting for a countdown to expire
///
/// Scheduling again while pending replaces the value and restarts the
/// countdown, so only the last value of a burst is ever delivered.
#[derive(Debug, Clone, PartialEq)]
pub struct Debounced<T> {
    pending: Option<T>,
    remaining: f32,
}

impl<T> Default for Debounced<T> {
    fn default() -> Self {
        Self {
            pending: None,
            remaining: 0.0,
        }
    }
}

impl<T> Debounced<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `value` for delivery after `delay_secs`
    pub fn schedule(&mut self, value: T, delay_secs: f32) {
        self.pending = Some(value);
        self.remaining = delay_secs;
    }

    /// Drop any pending value
    pub fn cancel(&mut self) {
        self.pending = None;
        self.remaining = 0.0;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Seconds left before the pending value fires (0 when idle)
    pub fn remaining(&self) -> f32 {
        if self.is_pending() {
            self.remaining
        } else {
            0.0
        }
    }

    /// Advance the countdown; returns the value once it reaches zero
    pub fn advance(&mut self, dt_secs: f32) -> Option<T> {
        self.pending.as_ref()?;

        self.remaining -= dt_secs;
        if self.remaining <= 0.0 {
            self.remaining = 0.0;
            self.pending.take()
        } else {
            None
        }
    }
}

/// Mixer bookkeeping for one output channel
#[derive(Debug, Clone)]
pub struct LayerSlot {
    /// A consumer currently owns this slot
    pub in_use: bool,
    /// Last requested gain, always within [0, 1]
    pub volume: f32,
    /// Raw PCM last submitted, kept so gain can be re-applied
    pub raw_audio: Option<Arc<[u8]>>,
    /// Volume waiting to be baked into `raw_audio`
    pub pending_volume: Debounced<f32>,
}

impl Default for LayerSlot {
    fn default() -> Self {
        Self {
            in_use: false,
            volume: 1.0,
            raw_audio: None,
            pending_volume: Debounced::new(),
        }
    }
}

impl LayerSlot {
    /// Take ownership: full volume, no audio
    pub fn claim(&mut self) {
        self.in_use = true;
        self.volume = 1.0;
        self.raw_audio = None;
    }

    /// Give up ownership. The volume is left as it was.
    pub fn free(&mut self) {
        self.in_use = false;
        self.raw_audio = None;
        self.pending_volume.cancel();
    }

    pub fn has_audio(&self) -> bool {
        self.raw_audio.is_some()
    }
}
