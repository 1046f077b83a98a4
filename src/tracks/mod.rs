//! Tracks Module
//!
//! Consumers of the layer pool and the visual state derived from it.

mod colors;
mod track;
mod visualizer;

pub use colors::{Rgba, SliderPalette, TrackColors};
pub use track::{volume_label, MusicTrack};
pub use visualizer::MixVisualization;
