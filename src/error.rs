//! Error handling for Vibemix
//!
//! Mixer pool operations never fail (invalid indices are ignored and pool
//! exhaustion is reported as `None`). The errors here cover everything
//! around the pool: audio files, configuration and track generation.

use thiserror::Error;

/// Result type alias for Vibemix operations
pub type Result<T> = std::result::Result<T, MixerError>;

/// Main error type for Vibemix operations
#[derive(Error, Debug)]
pub enum MixerError {
    // File Errors
    #[error("File not found: {path}")]
    FileNotFound {
        path: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Invalid audio file: {reason}")]
    InvalidAudio {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Unsupported audio format: {format}")]
    UnsupportedFormat { format: String },

    // Configuration Errors
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // Generation Errors
    #[error("Generation failed for '{item}': {reason}")]
    Generation { item: String, reason: String },

    #[error("Failed to decode audio payload: {0}")]
    Decode(#[from] base64::DecodeError),

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MixerError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            MixerError::FileNotFound { .. } => "FILE_NOT_FOUND",
            MixerError::InvalidAudio { .. } => "INVALID_AUDIO",
            MixerError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            MixerError::InvalidConfig { .. } => "INVALID_CONFIG",
            MixerError::Generation { .. } => "GENERATION_ERROR",
            MixerError::Decode(_) => "DECODE_ERROR",
            MixerError::Io(_) => "IO_ERROR",
            MixerError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if this error is recoverable
    ///
    /// A failed generation only affects one track; the session moves on
    /// to the next queued item.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            MixerError::FileNotFound { .. }
                | MixerError::InvalidAudio { .. }
                | MixerError::UnsupportedFormat { .. }
                | MixerError::Generation { .. }
                | MixerError::Decode(_)
        )
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            MixerError::FileNotFound { .. } => vec![
                "Check the file path is correct",
                "Verify the file hasn't been moved or deleted",
            ],
            MixerError::InvalidAudio { .. } => vec![
                "Try converting the file to 16-bit PCM WAV first",
                "The file may be corrupted - try re-exporting from source",
            ],
            MixerError::UnsupportedFormat { .. } => vec![
                "Layers accept 16-bit integer PCM at 48000 Hz",
                "Resample the file to 48 kHz before mixing",
            ],
            MixerError::InvalidConfig { .. } => vec![
                "Check the configuration file against the defaults",
                "Delete the configuration file to fall back to defaults",
            ],
            MixerError::Generation { .. } => vec![
                "Try a different vibe or item",
                "Check the network connection and try again",
            ],
            MixerError::Decode(_) => vec!["The generated payload was not valid base64 audio"],
            _ => vec![],
        }
    }
}
