//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info, warn};
use walkdir::WalkDir;

use crate::catalog::{bpm_for_vibe, Category, Selection};
use crate::config::{MixerConfig, DEFAULT_CHANNEL_COUNT, DEFAULT_SAMPLE_RATE};
use crate::dsp::apply_volume;
use crate::engine::{read_pcm16, write_pcm16, CaptureOutput, MusicPlayer, PcmClip};
use crate::error::{MixerError, Result};
use crate::generate::{MixSession, MockMusicModel};
use crate::layers::AudioLayerManager;
use crate::tracks::TrackColors;

/// Frame length used when the CLI drives the mixer
const FRAME_SECS: f32 = 1.0 / 60.0;

/// Scale a WAV file by `volume` and write the result.
pub fn gain(input: &Path, output: &Path, volume: f32) -> Result<()> {
    info!("Applying volume {:.2} to {}", volume, input.display());

    let clip = read_pcm16(input)?;
    let scaled = apply_volume(&clip.bytes, volume.clamp(0.0, 1.0)).into_owned();
    write_pcm16(output, &PcmClip::new(scaled, clip.channels, clip.sample_rate))?;

    println!("Wrote {} ({:.2}s)", output.display(), clip.duration_secs());
    Ok(())
}

/// Explicit inputs followed by every `.wav` under `dir`, sorted by path.
pub fn collect_wav_inputs(inputs: &[PathBuf], dir: Option<&Path>) -> Result<Vec<PathBuf>> {
    let mut paths = inputs.to_vec();

    if let Some(dir) = dir {
        if !dir.is_dir() {
            return Err(MixerError::FileNotFound {
                path: dir.display().to_string(),
                source: None,
            });
        }

        let mut found: Vec<PathBuf> = WalkDir::new(dir)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| {
                path.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case("wav"))
            })
            .collect();
        found.sort();
        debug!("Found {} WAV files in {}", found.len(), dir.display());
        paths.extend(found);
    }

    Ok(paths)
}

/// Play each input on its own layer, apply volumes and render every layer.
pub fn mix(
    config: &MixerConfig,
    inputs: &[PathBuf],
    dir: Option<&Path>,
    volumes: &[f32],
    output_dir: &Path,
) -> Result<()> {
    let paths = collect_wav_inputs(inputs, dir)?;
    if paths.is_empty() {
        return Err(MixerError::InvalidConfig {
            reason: "No input files given".to_string(),
        });
    }

    let mut mixer =
        AudioLayerManager::from_fn(|_| Some(CaptureOutput::new())).with_config(config);
    mixer.initialize(DEFAULT_SAMPLE_RATE);

    let mut layers = Vec::new();
    for (i, path) in paths.iter().enumerate() {
        let Some(layer) = mixer.acquire() else {
            warn!("All layers in use, skipping {}", path.display());
            continue;
        };

        let clip = read_pcm16(path)?;
        mixer.play_on_layer(layer, Arc::from(clip.bytes));
        if let Some(&volume) = volumes.get(i) {
            mixer.set_layer_volume(layer, volume);
        }
        layers.push((layer, path));
    }

    // Let every debounced volume land
    let applied = mixer.tick(config.debounce_secs + FRAME_SECS);
    debug!("Applied {} volume changes", applied);

    fs::create_dir_all(output_dir)?;
    let colors = TrackColors::new();
    for (layer, path) in &layers {
        let Some(frame) = mixer.output(*layer).and_then(|o| o.last_frame()) else {
            continue;
        };
        let out_path = output_dir.join(format!("layer_{:02}.wav", layer));
        write_pcm16(
            &out_path,
            &PcmClip::new(frame.to_vec(), DEFAULT_CHANNEL_COUNT, DEFAULT_SAMPLE_RATE),
        )?;

        println!(
            "Layer {} {} {} @ {:.0}% -> {}",
            layer,
            colors.hex_for(*layer),
            path.display(),
            mixer.layer_volume(*layer) * 100.0,
            out_path.display()
        );
    }

    println!(
        "Active layers: {}/{}",
        mixer.active_layer_count(),
        mixer.layer_count()
    );
    Ok(())
}

/// File name for a generated track, e.g. `03_hip_hop.wav`
pub fn track_file_name(index: usize, name: &str) -> String {
    let slug: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{:02}_{}.wav", index, slug)
}

/// Generate one track per item with the offline model and write them out.
#[allow(clippy::too_many_arguments)]
pub fn generate(
    config: &MixerConfig,
    vibe: &str,
    category: Category,
    items: &[String],
    duration_secs: f32,
    fail_on: Option<&str>,
    output_dir: &Path,
) -> Result<()> {
    if category == Category::Vibes {
        return Err(MixerError::InvalidConfig {
            reason: "Items must be genres or instruments".to_string(),
        });
    }

    let mut selection = Selection::new();
    let vibe_name = Category::Vibes.find(vibe).map_or(vibe, |e| e.name);
    selection.add(Category::Vibes, vibe_name);
    for item in items {
        let name = category.find(item).map_or(item.as_str(), |e| e.name);
        let outcome = selection.add(category, name);
        if !outcome.is_added() {
            warn!("Skipping '{}': {:?}", item, outcome);
        }
    }
    println!("{}", selection.status_line(config.generation.default_bpm));

    let Some(request) = selection.take_request(config.generation.default_bpm) else {
        return Err(MixerError::InvalidConfig {
            reason: "Need a vibe and at least 2 items".to_string(),
        });
    };
    debug!(
        "Vibe '{}' maps to {} BPM",
        request.vibe,
        bpm_for_vibe(&request.vibe)
    );

    let mut model = MockMusicModel::new(duration_secs);
    if let Some(keyword) = fail_on {
        model = model.failing_on(keyword);
    }

    let mut session = MixSession::new(
        config.clone(),
        AudioLayerManager::from_fn(|_| Some(CaptureOutput::new())),
        Some(MusicPlayer::new(CaptureOutput::new())),
    );
    session.create_tracks(&request);

    while session.is_generating() {
        if let Some(outcome) = session.tick(FRAME_SECS, &mut model).generated {
            let status = if outcome.success { "ok" } else { "failed" };
            println!("[{}] {} ({})", outcome.track_index, outcome.item, status);
        }
    }

    fs::create_dir_all(output_dir)?;
    for (i, track) in session.tracks().iter().enumerate() {
        let Some(audio) = track.audio() else {
            println!("{}: no audio", track.title());
            continue;
        };
        let path = output_dir.join(track_file_name(i, track.name()));
        write_pcm16(
            &path,
            &PcmClip::new(audio.to_vec(), DEFAULT_CHANNEL_COUNT, DEFAULT_SAMPLE_RATE),
        )?;
        println!("{} -> {}", track.title(), path.display());
    }

    let started = session.play_all();
    for i in 0..session.tracks().len() {
        session.set_track_volume(i, 1.0);
    }
    session.tick(config.debounce_secs + FRAME_SECS, &mut model);

    let viz = session.visualization();
    if viz.visible {
        println!(
            "Playing {} tracks, mix color {} scale {:.2}",
            started,
            viz.color.to_hex(),
            viz.scale
        );
    }

    session.close_all();
    Ok(())
}

/// List catalog entries, with the tempo of each vibe.
pub fn catalog(category: Option<Category>) -> Result<()> {
    let categories = match category {
        Some(c) => vec![c],
        None => Category::ALL.to_vec(),
    };

    for category in categories {
        println!("{}:", category);
        for entry in category.entries() {
            match category {
                Category::Vibes => println!(
                    "  {} {} ({} BPM)",
                    entry.emoji,
                    entry.name,
                    bpm_for_vibe(entry.name)
                ),
                _ => println!("  {} {}", entry.emoji, entry.name),
            }
        }
    }

    Ok(())
}

/// Print the color of every layer.
pub fn palette() -> Result<()> {
    let colors = TrackColors::new();
    for i in 0..colors.len() {
        let slider = colors.slider_palette(i);
        println!(
            "Layer {}: {} (slider {} .. {})",
            i,
            colors.hex_for(i),
            slider.light.to_hex(),
            slider.dark.to_hex()
        );
    }
    Ok(())
}
