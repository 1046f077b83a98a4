//! Mix Visualization
//!
//! Summarises the current mix as one color and size: each active layer
//! contributes its track color weighted by its volume.

use super::colors::{Rgba, TrackColors};
use crate::engine::AudioOutput;
use crate::layers::AudioLayerManager;

/// Layers at or below this volume do not contribute
const AUDIBLE_THRESHOLD: f32 = 0.01;

/// Saturation boost applied to the blended color
const COLOR_BOOST: f32 = 1.5;

/// Appearance of the mix indicator for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixVisualization {
    /// Hidden when nothing is audible
    pub visible: bool,
    pub color: Rgba,
    /// Multiplier on the indicator's base scale
    pub scale: f32,
    /// Number of contributing layers
    pub contributors: usize,
}

impl MixVisualization {
    pub fn hidden() -> Self {
        Self {
            visible: false,
            color: Rgba::BLACK,
            scale: 0.0,
            contributors: 0,
        }
    }

    /// Compute from the volumes of all in-use layers
    pub fn compute<O: AudioOutput>(mixer: &AudioLayerManager<O>, colors: &TrackColors) -> Self {
        let (indices, weights): (Vec<usize>, Vec<f32>) = mixer
            .active_layers()
            .filter(|(_, volume)| *volume > AUDIBLE_THRESHOLD)
            .unzip();

        let total: f32 = weights.iter().sum();
        if total < AUDIBLE_THRESHOLD {
            return Self::hidden();
        }

        let average = total / indices.len().max(1) as f32;
        Self {
            visible: true,
            color: colors.mix(&indices, &weights).boosted(COLOR_BOOST),
            scale: 0.5 + average * 2.0,
            contributors: indices.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::CaptureOutput;
    use approx::assert_relative_eq;

    fn mixer() -> AudioLayerManager<CaptureOutput> {
        let mut mixer = AudioLayerManager::from_fn(|_| Some(CaptureOutput::new()));
        mixer.initialize(48000);
        mixer
    }

    #[test]
    fn test_hidden_without_active_layers() {
        let viz = MixVisualization::compute(&mixer(), &TrackColors::new());
        assert!(!viz.visible);
        assert_eq!(viz, MixVisualization::hidden());
    }

    #[test]
    fn test_hidden_when_all_muted() {
        let mut mixer = mixer();
        let a = mixer.acquire().unwrap();
        mixer.set_layer_volume(a, 0.0);

        let viz = MixVisualization::compute(&mixer, &TrackColors::new());
        assert!(!viz.visible);
    }

    #[test]
    fn test_single_layer_color_and_scale() {
        let mut mixer = mixer();
        let a = mixer.acquire().unwrap();
        mixer.set_layer_volume(a, 0.5);

        let viz = MixVisualization::compute(&mixer, &TrackColors::new());
        assert!(viz.visible);
        assert_eq!(viz.contributors, 1);
        // hot pink boosted by 1.5: (1.0, 0.3, 0.6)
        assert_relative_eq!(viz.color.r, 1.0);
        assert_relative_eq!(viz.color.g, 0.3);
        assert_relative_eq!(viz.color.b, 0.6);
        assert_relative_eq!(viz.scale, 1.5);
    }

    #[test]
    fn test_released_layers_do_not_contribute() {
        let mut mixer = mixer();
        let a = mixer.acquire().unwrap();
        let b = mixer.acquire().unwrap();
        mixer.release(a);
        mixer.set_layer_volume(b, 1.0);

        let viz = MixVisualization::compute(&mixer, &TrackColors::new());
        assert_eq!(viz.contributors, 1);
        assert_relative_eq!(viz.scale, 2.5);
    }
}
