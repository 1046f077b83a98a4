//! DSP Module
//!
//! Sample-level processing on raw 16-bit PCM submitted to mixer layers.

mod gain;

pub use gain::{
    apply_volume, pcm_to_samples, samples_to_pcm, BYTES_PER_SAMPLE, MUTE_THRESHOLD,
    UNITY_THRESHOLD,
};
