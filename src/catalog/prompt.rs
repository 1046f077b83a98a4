//! Prompt construction for the music model

use super::data::Category;

/// Build the generation prompt for one track
///
/// Instruments are featured on top of the vibe; genres describe the whole
/// track.
pub fn build_prompt(vibe: &str, item: &str, category: Category, bpm: u32) -> String {
    match category {
        Category::Instruments => format!(
            "30 second seamless loop, {} BPM, {} instrumental music featuring {}, high quality production",
            bpm, vibe, item
        ),
        _ => format!(
            "30 second seamless loop, {} BPM, {} {} instrumental track, high quality production",
            bpm, vibe, item
        ),
    }
}

/// Combine several genres into one prompt and a short display title
///
/// Offline stand-in for the model-written prompt: the genres joined by
/// commas, and a title from at most the first four genres.
pub fn combine_genres(genres: &[&str]) -> (String, String) {
    let prompt = format!("{} instrumental track", genres.join(", "));
    let title = genres
        .iter()
        .take(4)
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    (prompt, title)
}
