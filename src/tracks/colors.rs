//! Track Colors
//!
//! Every layer index has a fixed color used for its slider, its indicator
//! and the blended mix color.

use serde::{Deserialize, Serialize};

/// Linear RGBA color with components in 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// `#rrggbb` with each component rounded to 0..=255
    pub fn to_hex(&self) -> String {
        let to_byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            to_byte(self.r),
            to_byte(self.g),
            to_byte(self.b)
        )
    }

    /// Multiply RGB by `factor`, capping at 1.0; alpha becomes opaque
    pub fn boosted(&self, factor: f32) -> Self {
        Self::new(
            (self.r * factor).min(1.0),
            (self.g * factor).min(1.0),
            (self.b * factor).min(1.0),
            1.0,
        )
    }

    /// Add `amount` to RGB, capping at 1.0; alpha becomes opaque
    pub fn lightened(&self, amount: f32) -> Self {
        Self::new(
            (self.r + amount).min(1.0),
            (self.g + amount).min(1.0),
            (self.b + amount).min(1.0),
            1.0,
        )
    }
}

/// Colors for the gradient of a track's volume slider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderPalette {
    pub light: Rgba,
    pub base: Rgba,
    pub dark: Rgba,
}

const TRACK_COLORS: [Rgba; 10] = [
    Rgba::new(1.0, 0.2, 0.4, 1.0), // hot pink
    Rgba::new(0.2, 0.6, 1.0, 1.0), // electric blue
    Rgba::new(0.4, 1.0, 0.4, 1.0), // lime green
    Rgba::new(1.0, 0.8, 0.2, 1.0), // golden yellow
    Rgba::new(0.8, 0.4, 1.0, 1.0), // purple
    Rgba::new(1.0, 0.5, 0.2, 1.0), // orange
    Rgba::new(0.2, 1.0, 0.8, 1.0), // cyan
    Rgba::new(1.0, 0.4, 0.6, 1.0), // coral
    Rgba::new(0.6, 0.8, 1.0, 1.0), // sky blue
    Rgba::new(0.8, 1.0, 0.4, 1.0), // lime yellow
];

/// Fixed per-track palette
#[derive(Debug, Clone, Copy, Default)]
pub struct TrackColors;

impl TrackColors {
    pub fn new() -> Self {
        Self
    }

    pub fn len(&self) -> usize {
        TRACK_COLORS.len()
    }

    pub fn is_empty(&self) -> bool {
        TRACK_COLORS.is_empty()
    }

    /// Color of a track, white for an unknown index
    pub fn color_for(&self, track_index: usize) -> Rgba {
        TRACK_COLORS
            .get(track_index)
            .copied()
            .unwrap_or(Rgba::WHITE)
    }

    pub fn hex_for(&self, track_index: usize) -> String {
        self.color_for(track_index).to_hex()
    }

    /// Weighted average of track colors
    ///
    /// Non-positive weights are skipped; missing weights count as zero.
    /// Opaque black when nothing contributes.
    pub fn mix(&self, track_indices: &[usize], weights: &[f32]) -> Rgba {
        let mut total = 0.0;
        let (mut r, mut g, mut b) = (0.0, 0.0, 0.0);

        for (i, &track) in track_indices.iter().enumerate() {
            let weight = weights.get(i).copied().unwrap_or(0.0);
            if weight <= 0.0 {
                continue;
            }
            let color = self.color_for(track);
            r += color.r * weight;
            g += color.g * weight;
            b += color.b * weight;
            total += weight;
        }

        if total <= 0.0 {
            return Rgba::BLACK;
        }
        Rgba::new(r / total, g / total, b / total, 1.0)
    }

    pub fn slider_palette(&self, track_index: usize) -> SliderPalette {
        let base = self.color_for(track_index);
        SliderPalette {
            light: base.lightened(0.3),
            base,
            dark: Rgba::new(base.r * 0.5, base.g * 0.5, base.b * 0.5, 1.0),
        }
    }

    /// Scale of the little sphere next to a slider at `volume`
    pub fn indicator_scale(&self, volume: f32) -> f32 {
        0.5 + volume * 2.5
    }
}
