//! CLI Tests
//!
//! Runs the command implementations against real WAV files.

use std::path::Path;

use pretty_assertions::assert_eq;
use tempfile::tempdir;

use vibemix::catalog::Category;
use vibemix::cli::commands;
use vibemix::dsp::{pcm_to_samples, samples_to_pcm};
use vibemix::engine::{generate_tone_pcm, read_pcm16, write_pcm16, PcmClip};
use vibemix::MixerConfig;

fn write_samples(path: &Path, samples: &[i16]) {
    write_pcm16(path, &PcmClip::new(samples_to_pcm(samples), 2, 48000)).unwrap();
}

#[test]
fn test_gain_command_scales_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.wav");
    let output = dir.path().join("out.wav");
    write_samples(&input, &[1000, -1000, 32767, -32768]);

    commands::gain(&input, &output, 0.5).unwrap();

    let clip = read_pcm16(&output).unwrap();
    assert_eq!(pcm_to_samples(&clip.bytes), vec![500, -500, 16384, -16384]);
}

#[test]
fn test_gain_command_missing_input() {
    let dir = tempdir().unwrap();
    let err = commands::gain(
        &dir.path().join("missing.wav"),
        &dir.path().join("out.wav"),
        0.5,
    )
    .unwrap_err();
    assert_eq!(err.error_code(), "FILE_NOT_FOUND");
}

#[test]
fn test_mix_renders_each_layer_at_its_volume() {
    let dir = tempdir().unwrap();
    let inputs_dir = dir.path().join("inputs");
    let out_dir = dir.path().join("out");
    std::fs::create_dir(&inputs_dir).unwrap();

    let first = dir.path().join("first.wav");
    write_samples(&first, &[2000, -2000]);
    write_samples(&inputs_dir.join("second.wav"), &[400, -400]);

    commands::mix(
        &MixerConfig::default(),
        &[first],
        Some(&inputs_dir),
        &[0.25],
        &out_dir,
    )
    .unwrap();

    let layer0 = read_pcm16(&out_dir.join("layer_00.wav")).unwrap();
    assert_eq!(pcm_to_samples(&layer0.bytes), vec![500, -500]);

    // No volume given for the second input, so it plays untouched
    let layer1 = read_pcm16(&out_dir.join("layer_01.wav")).unwrap();
    assert_eq!(pcm_to_samples(&layer1.bytes), vec![400, -400]);
}

#[test]
fn test_mix_output_keeps_stereo_format() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("tone.wav");
    let out_dir = dir.path().join("out");
    let pcm = generate_tone_pcm(440.0, 1.0, 48000, 0.5);
    write_pcm16(&input, &PcmClip::new(pcm, 2, 48000)).unwrap();

    let mut config = MixerConfig::default();
    config.debounce_secs = 0.05;
    commands::mix(&config, &[input], None, &[0.5], &out_dir).unwrap();

    let layer0 = read_pcm16(&out_dir.join("layer_00.wav")).unwrap();
    assert_eq!(layer0.channels, 2);
    assert_eq!(layer0.sample_rate, 48000);
    assert_eq!(layer0.num_frames(), 48000);
}

#[test]
fn test_mix_without_inputs_fails() {
    let dir = tempdir().unwrap();
    let err = commands::mix(&MixerConfig::default(), &[], None, &[], dir.path()).unwrap_err();
    assert_eq!(err.error_code(), "INVALID_CONFIG");
}

#[test]
fn test_generate_writes_successful_tracks() {
    let dir = tempdir().unwrap();
    let items = vec!["jazz".to_string(), "Metal".to_string(), "Folk".to_string()];

    commands::generate(
        &MixerConfig::default(),
        "chill",
        Category::Genres,
        &items,
        0.1,
        Some("Metal"),
        dir.path(),
    )
    .unwrap();

    let jazz = read_pcm16(&dir.path().join("00_jazz.wav")).unwrap();
    assert_eq!(jazz.num_frames(), 4800);
    assert!(!dir.path().join("01_metal.wav").exists());
    assert!(dir.path().join("02_folk.wav").exists());

    let expected = generate_tone_pcm(
        vibemix::generate::MockMusicModel::frequency_for(
            "30 second seamless loop, 80 BPM, Chill Folk instrumental track, high quality production",
        ),
        0.1,
        48000,
        0.5,
    );
    let folk = read_pcm16(&dir.path().join("02_folk.wav")).unwrap();
    assert_eq!(folk.bytes, expected);
}

#[test]
fn test_catalog_and_palette_commands() {
    commands::catalog(None).unwrap();
    commands::catalog(Some(Category::Instruments)).unwrap();
    commands::palette().unwrap();
}
