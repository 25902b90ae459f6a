pub mod config;
pub mod error;
pub mod lrc;
pub mod paths;
pub mod playback;
pub mod studio;
pub mod time;
pub mod timeline;

pub use config::{
    write_template, ExportConfig, LoggingConfig, StudioConfig, TimelineConfig, CONFIG_TEMPLATE,
    DEFAULT_EXPORT_FILE_NAME,
};

/// Re-export toml error type for config parsing error handling
pub use toml::de::Error as TomlParseError;
pub use error::{CoreError, PlaybackError, Result, TimelineError};
pub use lrc::{LrcEntry, LrcExport, LrcMetadata};
pub use paths::{config_dir, config_path, log_file_path, CONFIG_DIR_NAME, CONFIG_FILE_NAME, LOG_FILE_NAME};
pub use playback::{PlaybackClock, PlaybackSource, TrackInfo};
pub use studio::{JumpOutcome, LyricStudio, StudioEvent};
pub use time::{format_lrc_timestamp, format_timestamp};
pub use timeline::{LineUpdate, LyricLine, Timeline};
