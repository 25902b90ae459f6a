use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    // Configuration errors
    #[error("Config file not found at {path}. A template has been created - edit it if needed and run again.")]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid config: {message}")]
    ConfigInvalid { message: String },

    #[error("Failed to parse config file: {0}")]
    ConfigParseError(#[from] toml::de::Error),

    // Editing errors
    #[error(transparent)]
    Timeline(#[from] TimelineError),

    #[error("LRC export blocked: {reason}")]
    ExportBlocked { reason: String },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // IO errors
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Why an edit to the timeline was refused.
///
/// Rejected edits leave the timeline untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimelineError {
    #[error("No lyric line with id {id}")]
    LineNotFound { id: u64 },

    /// The timestamp would put the line before its predecessor or after its successor.
    #[error("Timestamp {timestamp}s for line {id} would break the ascending sequence")]
    TimestampOutOfOrder { id: u64, timestamp: f64 },

    #[error("Timestamp {timestamp} is not a non-negative number of seconds")]
    InvalidTimestamp { timestamp: f64 },

    #[error("No playback source attached")]
    NoPlaybackSource,
}

/// Errors reported by a playback source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// The player refused to start, e.g. an autoplay block.
    #[error("Playback failed: {reason}")]
    PlayRejected { reason: String },
}

pub type Result<T> = std::result::Result<T, CoreError>;
