//! Integration Tests
//!
//! End-to-end tests for the layer pool and the generation session.

use std::sync::Arc;

use approx::assert_relative_eq;
use pretty_assertions::assert_eq;
use test_case::test_case;

use vibemix::catalog::{Category, Selection};
use vibemix::dsp::{apply_volume, pcm_to_samples, samples_to_pcm};
use vibemix::engine::{CaptureOutput, MusicPlayer, OutputEvent};
use vibemix::generate::{MixSession, MockMusicModel};
use vibemix::layers::{AudioLayerManager, LAYER_COUNT};
use vibemix::MixerConfig;

/// Helper to create an initialized pool backed by capture channels
fn ready_mixer() -> AudioLayerManager<CaptureOutput> {
    let mut mixer = AudioLayerManager::from_fn(|_| Some(CaptureOutput::new()));
    mixer.initialize(48000);
    mixer
}

/// Round half toward positive infinity and saturate to i16
fn round_half_up(x: f64) -> i16 {
    (x + 0.5).floor().clamp(-32768.0, 32767.0) as i16
}

fn known_samples() -> Vec<i16> {
    vec![0, 1, -1, 3, -3, 1000, -1000, 32767, -32768, 12345]
}

// === Pool Ownership ===

#[test]
fn test_eleven_acquires_exhaust_pool() {
    let mut mixer = ready_mixer();

    let mut indices: Vec<usize> = (0..LAYER_COUNT)
        .map(|_| mixer.acquire().expect("free layer"))
        .collect();
    assert_eq!(mixer.acquire(), None);

    indices.sort_unstable();
    indices.dedup();
    assert_eq!(indices, (0..LAYER_COUNT).collect::<Vec<_>>());
}

#[test]
fn test_active_count_after_release() {
    let mut mixer = ready_mixer();
    let a = mixer.acquire().unwrap();
    mixer.acquire().unwrap();
    mixer.acquire().unwrap();
    mixer.release(a);

    assert_eq!(mixer.active_layer_count(), 2);
    // The released index is handed out again first
    assert_eq!(mixer.acquire(), Some(a));
}

#[test]
fn test_volume_survives_release_until_next_acquire() {
    let mut mixer = ready_mixer();
    let layer = mixer.acquire().unwrap();
    mixer.set_layer_volume(layer, 0.3);
    mixer.release(layer);

    assert_relative_eq!(mixer.layer_volume(layer), 0.3);
    assert_eq!(mixer.acquire(), Some(layer));
    assert_relative_eq!(mixer.layer_volume(layer), 1.0);
}

// === Gain Scaling ===

#[test_case(0.99 ; "unity threshold")]
#[test_case(1.0 ; "full volume")]
fn test_high_volume_is_identity(volume: f32) {
    let pcm = samples_to_pcm(&known_samples());
    assert_eq!(apply_volume(&pcm, volume).as_ref(), pcm.as_slice());
}

#[test_case(0.01 ; "mute threshold")]
#[test_case(0.0 ; "silent")]
fn test_low_volume_is_silence(volume: f32) {
    let pcm = samples_to_pcm(&known_samples());
    let out = apply_volume(&pcm, volume);
    assert_eq!(out.len(), pcm.len());
    assert!(out.iter().all(|&b| b == 0));
}

#[test]
fn test_mid_volume_matches_rounded_product() {
    for volume in [0.02_f32, 0.25, 0.5, 0.7, 0.98] {
        let samples = known_samples();
        let out = pcm_to_samples(&apply_volume(&samples_to_pcm(&samples), volume));
        let expected: Vec<i16> = samples
            .iter()
            .map(|&s| round_half_up(f64::from(s) * f64::from(volume)))
            .collect();
        assert_eq!(out, expected, "volume {}", volume);
    }
}

// === Debounced Volume ===

#[test]
fn test_volume_burst_resubmits_once_with_last_value() {
    let mut mixer = ready_mixer();
    let layer = mixer.acquire().unwrap();
    let pcm = samples_to_pcm(&[1000, -1000]);
    mixer.play_on_layer(layer, Arc::from(pcm));

    mixer.set_layer_volume(layer, 0.2);
    mixer.tick(0.05);
    mixer.set_layer_volume(layer, 0.5);
    mixer.tick(0.05);

    let mut resubmitted = 0;
    for _ in 0..30 {
        resubmitted += mixer.tick(1.0 / 60.0);
    }
    assert_eq!(resubmitted, 1);

    let out = mixer.output(layer).unwrap();
    assert_eq!(out.frame_count(), 2);
    assert_eq!(pcm_to_samples(out.last_frame().unwrap()), vec![500, -500]);
}

#[test]
fn test_play_set_volume_advance_scenario() {
    let mut mixer = ready_mixer();
    let layer = mixer.acquire().unwrap();
    assert_eq!(layer, 0);

    let samples = known_samples();
    mixer.play_on_layer(layer, Arc::from(samples_to_pcm(&samples)));
    mixer.set_layer_volume(layer, 0.5);
    assert_eq!(mixer.tick(0.2), 1);

    let out = mixer.output(layer).unwrap();
    assert_eq!(
        out.events().last(),
        Some(&OutputEvent::Frame {
            pcm: samples_to_pcm(&[0, 1, 0, 2, -1, 500, -500, 16384, -16384, 6173]),
            channels: 2,
        })
    );
    assert_eq!(out.sample_rate(), Some(48000));
}

#[test]
fn test_uninitialized_pool_is_inert() {
    let mut mixer: AudioLayerManager<CaptureOutput> =
        AudioLayerManager::from_fn(|_| Some(CaptureOutput::new()));

    assert_eq!(mixer.acquire(), None);
    mixer.play_on_layer(0, Arc::from(vec![1u8, 2]));
    mixer.set_layer_volume(0, 0.5);
    assert_eq!(mixer.layer_volume(0), 0.0);
    assert_eq!(mixer.tick(1.0), 0);
    assert!(mixer.output(0).unwrap().events().is_empty());
}

// === Generation Session ===

#[test]
fn test_selection_to_session_flow() {
    let mut selection = Selection::new();
    selection.add(Category::Vibes, "Energetic");
    selection.add(Category::Instruments, "Piano");
    selection.add(Category::Instruments, "Drums");
    selection.add(Category::Instruments, "Bass");
    let request = selection.take_request(90).expect("selection is ready");
    assert_eq!(request.category, Category::Instruments);

    let mut model = MockMusicModel::new(0.05).failing_on("Drums");
    let mut session = MixSession::new(
        MixerConfig::default(),
        AudioLayerManager::from_fn(|_| Some(CaptureOutput::new())),
        Some(MusicPlayer::new(CaptureOutput::new())),
    );
    session.create_tracks(&request);

    let mut outcomes = Vec::new();
    for _ in 0..1000 {
        if let Some(outcome) = session.tick(1.0 / 60.0, &mut model).generated {
            outcomes.push(outcome);
        }
        if !session.is_generating() {
            break;
        }
    }

    let successes: Vec<bool> = outcomes.iter().map(|o| o.success).collect();
    assert_eq!(successes, vec![true, false, true]);
    assert_eq!(session.tracks()[1].title(), "Error: Drums");
    assert_eq!(session.mixer().active_layer_count(), 3);
    assert!(model.requests()[0].contains("featuring Piano"));

    // Only tracks with audio start playing
    assert_eq!(session.play_all(), 2);

    session.close_all();
    assert_eq!(session.mixer().active_layer_count(), 0);
    assert!(session.tracks().is_empty());
}
