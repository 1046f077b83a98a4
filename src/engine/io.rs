//! WAV I/O for layer audio
//!
//! Layers consume interleaved stereo 16-bit little-endian PCM at 48 kHz.
//! These helpers move that format in and out of WAV files and synthesise
//! test tones in the same layout.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::config::{DEFAULT_CHANNEL_COUNT, DEFAULT_SAMPLE_RATE};
use crate::dsp::{pcm_to_samples, samples_to_pcm};
use crate::error::{MixerError, Result};

/// Raw PCM plus the format it is encoded in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcmClip {
    /// Interleaved signed 16-bit little-endian samples
    pub bytes: Vec<u8>,
    pub channels: u16,
    pub sample_rate: u32,
}

impl PcmClip {
    pub fn new(bytes: Vec<u8>, channels: u16, sample_rate: u32) -> Self {
        Self {
            bytes,
            channels,
            sample_rate,
        }
    }

    /// Number of frames (samples per channel)
    pub fn num_frames(&self) -> usize {
        if self.channels == 0 {
            return 0;
        }
        self.bytes.len() / 2 / self.channels as usize
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.num_frames() as f64 / self.sample_rate as f64
    }
}

fn wav_error(e: hound::Error) -> MixerError {
    match e {
        hound::Error::IoError(io) => MixerError::Io(io),
        other => MixerError::InvalidAudio {
            reason: other.to_string(),
            source: Some(Box::new(other)),
        },
    }
}

/// Read a 16-bit integer WAV file as interleaved stereo PCM
///
/// Mono files are duplicated onto both channels.
///
/// # Errors
/// * `FileNotFound` - If the file does not exist
/// * `InvalidAudio` - If the file is not a readable WAV file
/// * `UnsupportedFormat` - If the file is not 16-bit integer PCM at 48 kHz
///   or has more than two channels
pub fn read_pcm16(path: &Path) -> Result<PcmClip> {
    if !path.exists() {
        return Err(MixerError::FileNotFound {
            path: path.display().to_string(),
            source: None,
        });
    }

    let mut reader = WavReader::open(path).map_err(|e| MixerError::InvalidAudio {
        reason: format!("Failed to open WAV file: {}", e),
        source: Some(Box::new(e)),
    })?;

    let spec = reader.spec();
    if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
        return Err(MixerError::UnsupportedFormat {
            format: format!(
                "{}-bit {:?} audio (only 16-bit integer PCM supported)",
                spec.bits_per_sample, spec.sample_format
            ),
        });
    }
    if spec.channels == 0 || spec.channels > 2 {
        return Err(MixerError::UnsupportedFormat {
            format: format!("{}-channel audio (only mono/stereo supported)", spec.channels),
        });
    }
    if spec.sample_rate != DEFAULT_SAMPLE_RATE {
        return Err(MixerError::UnsupportedFormat {
            format: format!(
                "{} Hz audio (layers run at {} Hz)",
                spec.sample_rate, DEFAULT_SAMPLE_RATE
            ),
        });
    }

    let samples = reader
        .samples::<i16>()
        .collect::<std::result::Result<Vec<i16>, _>>()
        .map_err(wav_error)?;

    let interleaved = if spec.channels == 1 {
        samples.iter().flat_map(|&s| [s, s]).collect()
    } else {
        samples
    };

    Ok(PcmClip::new(
        samples_to_pcm(&interleaved),
        DEFAULT_CHANNEL_COUNT,
        spec.sample_rate,
    ))
}

/// Write a clip as a 16-bit integer WAV file
pub fn write_pcm16(path: &Path, clip: &PcmClip) -> Result<()> {
    let spec = WavSpec {
        channels: clip.channels,
        sample_rate: clip.sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec).map_err(wav_error)?;
    for sample in pcm_to_samples(&clip.bytes) {
        writer.write_sample(sample).map_err(wav_error)?;
    }
    writer.finalize().map_err(wav_error)?;

    Ok(())
}

/// Generate an interleaved stereo sine tone as 16-bit PCM
///
/// # Arguments
/// * `frequency` - Tone frequency in Hz
/// * `duration_secs` - Length of the tone
/// * `sample_rate` - Sample rate in Hz
/// * `amplitude` - Peak level in 0.0..=1.0
pub fn generate_tone_pcm(
    frequency: f32,
    duration_secs: f32,
    sample_rate: u32,
    amplitude: f32,
) -> Vec<u8> {
    let num_frames = (duration_secs * sample_rate as f32) as usize;
    let angular_freq = 2.0 * std::f32::consts::PI * frequency / sample_rate as f32;
    let peak = amplitude.clamp(0.0, 1.0) * i16::MAX as f32;

    let samples: Vec<i16> = (0..num_frames)
        .flat_map(|i| {
            let s = ((angular_freq * i as f32).sin() * peak).round() as i16;
            [s, s]
        })
        .collect();

    samples_to_pcm(&samples)
}
