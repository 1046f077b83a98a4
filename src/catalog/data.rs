//! Built-in catalog of vibes, genres and instruments

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_BPM;
use crate::error::MixerError;

/// One selectable catalog item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub emoji: &'static str,
}

const fn entry(name: &'static str, emoji: &'static str) -> CatalogEntry {
    CatalogEntry { name, emoji }
}

pub const VIBES: &[CatalogEntry] = &[
    entry("Nature", "🌿"),
    entry("Medieval", "🏰"),
    entry("Upbeat", "🎉"),
    entry("Chill", "😎"),
    entry("Energetic", "⚡"),
    entry("Melancholic", "😢"),
    entry("Dreamy", "💭"),
    entry("Epic", "🏔️"),
    entry("Mysterious", "🔮"),
    entry("Romantic", "💕"),
    entry("Nostalgic", "📷"),
    entry("Futuristic", "🚀"),
    entry("Peaceful", "🕊️"),
    entry("Intense", "🔥"),
    entry("Ethereal", "✨"),
    entry("Urban", "🌃"),
    entry("Tropical", "🌴"),
    entry("Dramatic", "🎭"),
    entry("Playful", "🎈"),
    entry("Inspirational", "💡"),
    entry("Cinematic", "🎬"),
    entry("Funky", "🕺"),
    entry("Retro", "📼"),
    entry("Ambient", "🌫️"),
    entry("Dark", "🌑"),
    entry("Festive", "🎊"),
    entry("Soothing", "🧘"),
    entry("Whimsical", "🦋"),
    entry("Elegant", "👑"),
    entry("Suspenseful", "😰"),
];

pub const GENRES: &[CatalogEntry] = &[
    entry("Jazz", "🎷"),
    entry("Chiptune", "🎮"),
    entry("Hyperpop", "⚡"),
    entry("Rock", "🎸"),
    entry("Pop", "🎵"),
    entry("Hip Hop", "🎤"),
    entry("R&B", "🎹"),
    entry("Electronic", "🎛️"),
    entry("Classical", "🎻"),
    entry("Country", "🤠"),
    entry("Metal", "🤘"),
    entry("Blues", "🎺"),
    entry("Reggae", "🌴"),
    entry("Folk", "🪕"),
    entry("Indie", "🎭"),
    entry("Punk", "⛓️"),
    entry("Soul", "❤️"),
    entry("Funk", "🕺"),
    entry("Disco", "🪩"),
    entry("Techno", "🤖"),
    entry("House", "🏠"),
    entry("Dubstep", "📈"),
    entry("Ambient", "🌌"),
    entry("Lofi", "📻"),
    entry("Trap", "💰"),
    entry("Latin", "💃"),
    entry("K-Pop", "🇰🇷"),
    entry("J-Pop", "🇯🇵"),
    entry("EDM", "🎧"),
    entry("Alternative", "🔄"),
    entry("Grunge", "👕"),
    entry("Synthwave", "🌆"),
    entry("Afrobeat", "🌍"),
    entry("Experimental", "🧪"),
];

pub const INSTRUMENTS: &[CatalogEntry] = &[
    entry("Piano", "🎹"),
    entry("Guitar", "🎸"),
    entry("Drums", "🥁"),
    entry("Bass", "🎸"),
    entry("Violin", "🎻"),
    entry("Synth", "🎛️"),
    entry("Saxophone", "🎷"),
    entry("Trumpet", "🎺"),
    entry("Flute", "🪈"),
    entry("Cello", "🎻"),
    entry("Harp", "🪕"),
    entry("Organ", "🎹"),
    entry("Accordion", "🪗"),
    entry("Harmonica", "🎵"),
    entry("Banjo", "🪕"),
    entry("Ukulele", "🎸"),
    entry("Mandolin", "🎵"),
    entry("Clarinet", "🎵"),
    entry("Oboe", "🎵"),
    entry("Trombone", "🎺"),
    entry("French Horn", "📯"),
    entry("Tuba", "📯"),
    entry("Xylophone", "🎵"),
    entry("Marimba", "🎵"),
    entry("Vibraphone", "🎵"),
    entry("Steel Drums", "🥁"),
    entry("Sitar", "🎸"),
    entry("Tabla", "🥁"),
    entry("Didgeridoo", "🎵"),
    entry("Bagpipes", "🎵"),
    entry("Kalimba", "🎵"),
    entry("808", "🔊"),
    entry("303", "🎛️"),
    entry("Theremin", "👻"),
];

/// Tempo associated with each vibe
const VIBE_BPM: &[(&str, u32)] = &[
    ("Nature", 85),
    ("Medieval", 75),
    ("Upbeat", 120),
    ("Chill", 80),
    ("Energetic", 128),
    ("Melancholic", 70),
    ("Dreamy", 75),
    ("Epic", 90),
    ("Mysterious", 85),
    ("Romantic", 72),
    ("Nostalgic", 88),
    ("Futuristic", 118),
    ("Peaceful", 65),
    ("Intense", 140),
    ("Ethereal", 70),
    ("Urban", 95),
    ("Tropical", 100),
    ("Dramatic", 85),
    ("Playful", 110),
    ("Inspirational", 92),
    ("Cinematic", 80),
    ("Funky", 105),
    ("Retro", 115),
    ("Ambient", 60),
    ("Dark", 78),
    ("Festive", 125),
    ("Soothing", 65),
    ("Whimsical", 108),
    ("Elegant", 76),
    ("Suspenseful", 82),
];

/// Tempo for a vibe, `None` when the vibe is not in the table
pub fn lookup_bpm(vibe: &str) -> Option<u32> {
    VIBE_BPM
        .iter()
        .find(|(name, _)| *name == vibe)
        .map(|(_, bpm)| *bpm)
}

/// Tempo for a vibe, falling back to [`DEFAULT_BPM`]
pub fn bpm_for_vibe(vibe: &str) -> u32 {
    lookup_bpm(vibe).unwrap_or(DEFAULT_BPM)
}

/// Catalog section an item belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Vibes,
    Genres,
    Instruments,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Vibes, Category::Genres, Category::Instruments];

    pub fn entries(&self) -> &'static [CatalogEntry] {
        match self {
            Category::Vibes => VIBES,
            Category::Genres => GENRES,
            Category::Instruments => INSTRUMENTS,
        }
    }

    pub fn find(&self, name: &str) -> Option<&'static CatalogEntry> {
        self.entries().iter().find(|e| e.name.eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Vibes => write!(f, "Vibes"),
            Category::Genres => write!(f, "Genres"),
            Category::Instruments => write!(f, "Instruments"),
        }
    }
}

impl FromStr for Category {
    type Err = MixerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "vibes" | "vibe" => Ok(Category::Vibes),
            "genres" | "genre" => Ok(Category::Genres),
            "instruments" | "instrument" => Ok(Category::Instruments),
            other => Err(MixerError::InvalidConfig {
                reason: format!("Unknown category: {}", other),
            }),
        }
    }
}
