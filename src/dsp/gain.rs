//! PCM Gain Scaling
//!
//! Volume is baked directly into signed 16-bit little-endian PCM. Output
//! channels have no runtime volume control, so a layer's audio is re-scaled
//! and resubmitted whenever its volume settles.

use std::borrow::Cow;

// ============================================================================
// Constants
// ============================================================================

/// Volumes at or above this are treated as unity gain (input returned as-is)
pub const UNITY_THRESHOLD: f32 = 0.99;

/// Volumes at or below this are treated as silence
pub const MUTE_THRESHOLD: f32 = 0.01;

/// Bytes per 16-bit sample
pub const BYTES_PER_SAMPLE: usize = 2;

// ============================================================================
// Helper Functions
// ============================================================================

/// Decode one sample from a chunk of at most two little-endian bytes.
///
/// A lone trailing byte (odd-length buffer) is read as the low byte of a
/// sample whose high byte is zero.
#[inline]
fn decode_sample(bytes: &[u8]) -> i32 {
    match bytes {
        [lo, hi] => i32::from(i16::from_le_bytes([*lo, *hi])),
        [lo] => i32::from(*lo),
        _ => 0,
    }
}

/// Scale a sample, rounding half toward positive infinity, and saturate to i16
#[inline]
fn scale_sample(sample: i32, gain: f64) -> i16 {
    let scaled = (f64::from(sample) * gain + 0.5).floor();
    scaled.clamp(f64::from(i16::MIN), f64::from(i16::MAX)) as i16
}

// ============================================================================
// Public API
// ============================================================================

/// Apply a linear volume to a buffer of signed 16-bit little-endian PCM.
///
/// - `volume >= 0.99` returns the input unchanged without copying.
/// - `volume <= 0.01` returns a zeroed buffer of the same length.
/// - Otherwise every sample becomes `clamp(round(s * volume), -32768, 32767)`.
///
/// # Example
/// ```
/// use vibemix::dsp::apply_volume;
///
/// let pcm = 1000i16.to_le_bytes();
/// let half = apply_volume(&pcm, 0.5);
/// assert_eq!(i16::from_le_bytes([half[0], half[1]]), 500);
/// ```
pub fn apply_volume(pcm: &[u8], volume: f32) -> Cow<'_, [u8]> {
    if volume >= UNITY_THRESHOLD {
        return Cow::Borrowed(pcm);
    }
    if volume <= MUTE_THRESHOLD {
        return Cow::Owned(vec![0; pcm.len()]);
    }

    let gain = f64::from(volume);
    let mut adjusted = vec![0u8; pcm.len()];

    for (src, dst) in pcm
        .chunks(BYTES_PER_SAMPLE)
        .zip(adjusted.chunks_mut(BYTES_PER_SAMPLE))
    {
        let bytes = scale_sample(decode_sample(src), gain).to_le_bytes();
        let len = dst.len();
        dst.copy_from_slice(&bytes[..len]);
    }

    Cow::Owned(adjusted)
}

/// Decode little-endian PCM bytes into samples (a trailing odd byte is dropped)
pub fn pcm_to_samples(pcm: &[u8]) -> Vec<i16> {
    pcm.chunks_exact(BYTES_PER_SAMPLE)
        .map(|b| i16::from_le_bytes([b[0], b[1]]))
        .collect()
}

/// Encode samples as little-endian PCM bytes
pub fn samples_to_pcm(samples: &[i16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

// ============================================================================
// Tests
// ============================================================================
