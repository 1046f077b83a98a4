//! Layer Pool Module
//!
//! Fixed pool of mixer layers:
//! - `LayerSlot`: per-layer ownership, volume and stored audio
//! - `Debounced`: countdown that delivers only the last scheduled value
//! - `AudioLayerManager`: acquisition, playback and debounced volume

mod manager;
mod slot;

pub use manager::{AudioLayerManager, LAYER_COUNT};
pub use slot::{Debounced, LayerSlot};
