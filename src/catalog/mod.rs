//! Catalog Module
//!
//! What the user can pick and how picks become model prompts:
//! - Built-in vibes, genres and instruments with the vibe tempo table
//! - Selection rules (one vibe, one locked category, 2..=10 items)
//! - Prompt text for the music model

mod data;
mod prompt;
mod selection;

pub use data::{
    bpm_for_vibe, lookup_bpm, CatalogEntry, Category, GENRES, INSTRUMENTS, VIBES,
};
pub use prompt::{build_prompt, combine_genres};
pub use selection::{AddOutcome, GenerationRequest, Selection, MAX_ITEMS, MIN_ITEMS};
