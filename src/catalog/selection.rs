//! User selection: one vibe plus items from a single category

use serde::{Deserialize, Serialize};

use super::data::{lookup_bpm, Category};

/// Minimum number of genres/instruments needed to generate
pub const MIN_ITEMS: usize = 2;

/// Maximum number of genres/instruments in one selection
pub const MAX_ITEMS: usize = 10;

/// Everything needed to generate a set of tracks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub vibe: String,
    pub items: Vec<String>,
    pub category: Category,
    pub bpm: u32,
}

/// Result of trying to add an item to a [`Selection`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// A vibe was added and replaced the previous one
    ReplacedVibe,
    /// The item is already selected
    Duplicate,
    /// Items from another category are already selected
    CategoryLocked,
    /// The selection already holds [`MAX_ITEMS`] items
    Full,
}

impl AddOutcome {
    pub fn is_added(&self) -> bool {
        matches!(self, AddOutcome::Added | AddOutcome::ReplacedVibe)
    }
}

/// Current selection state
///
/// The first genre or instrument locks the selection to its category;
/// removing the last item of that category unlocks it again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    vibe: Option<String>,
    items: Vec<String>,
    locked: Option<Category>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, category: Category, name: &str) -> AddOutcome {
        if self.contains(name) {
            return AddOutcome::Duplicate;
        }

        match category {
            Category::Vibes => {
                let replaced = self.vibe.replace(name.to_string()).is_some();
                if replaced {
                    AddOutcome::ReplacedVibe
                } else {
                    AddOutcome::Added
                }
            }
            _ => {
                if self.locked.is_some_and(|locked| locked != category) {
                    return AddOutcome::CategoryLocked;
                }
                if self.items.len() >= MAX_ITEMS {
                    return AddOutcome::Full;
                }
                self.locked = Some(category);
                self.items.push(name.to_string());
                AddOutcome::Added
            }
        }
    }

    /// Remove a vibe or item by name. Returns false if it was not selected.
    pub fn remove(&mut self, name: &str) -> bool {
        if self.vibe.as_deref() == Some(name) {
            self.vibe = None;
            return true;
        }

        let Some(pos) = self.items.iter().position(|i| i == name) else {
            return false;
        };
        self.items.remove(pos);
        if self.items.is_empty() {
            self.locked = None;
        }
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vibe.as_deref() == Some(name) || self.items.iter().any(|i| i == name)
    }

    pub fn vibe(&self) -> Option<&str> {
        self.vibe.as_deref()
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn locked_category(&self) -> Option<Category> {
        self.locked
    }

    /// Whether another item of `category` would be accepted
    pub fn can_add(&self, category: Category) -> bool {
        match category {
            Category::Vibes => true,
            _ => {
                self.locked.map_or(true, |locked| locked == category)
                    && self.items.len() < MAX_ITEMS
            }
        }
    }

    pub fn can_generate(&self) -> bool {
        self.vibe.is_some() && self.items.len() >= MIN_ITEMS
    }

    /// Tempo of the selected vibe, or `default_bpm`
    pub fn bpm(&self, default_bpm: u32) -> u32 {
        self.vibe
            .as_deref()
            .and_then(lookup_bpm)
            .unwrap_or(default_bpm)
    }

    /// Turn the selection into a request and reset it
    ///
    /// Returns `None` (leaving the selection untouched) when it cannot
    /// generate yet.
    pub fn take_request(&mut self, default_bpm: u32) -> Option<GenerationRequest> {
        if !self.can_generate() {
            return None;
        }

        let bpm = self.bpm(default_bpm);
        let taken = std::mem::take(self);
        Some(GenerationRequest {
            vibe: taken.vibe?,
            items: taken.items,
            category: taken.locked.unwrap_or(Category::Genres),
            bpm,
        })
    }

    /// Status line in the form `GENRES: 3/10 READY @ 120 BPM`
    pub fn status_line(&self, default_bpm: u32) -> String {
        let category = self
            .locked
            .map_or_else(|| "ITEMS".to_string(), |c| c.to_string().to_uppercase());
        let status = if self.items.len() >= MIN_ITEMS {
            "READY".to_string()
        } else {
            format!("NEED {}", MIN_ITEMS - self.items.len())
        };
        let vibe = self.vibe.as_deref().unwrap_or("NONE").to_uppercase();

        format!(
            "{}: {}/{} {} | VIBE: {} @ {} BPM",
            category,
            self.items.len(),
            MAX_ITEMS,
            status,
            vibe,
            self.bpm(default_bpm)
        )
    }
}
