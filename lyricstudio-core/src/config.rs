use crate::error::{CoreError, Result};
use crate::lrc::{LrcMetadata, DEFAULT_ALBUM, DEFAULT_ARTIST, DEFAULT_TITLE};
use const_format::concatcp;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Default name of an exported LRC file
pub const DEFAULT_EXPORT_FILE_NAME: &str = "lyrics.lrc";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudioConfig {
    #[serde(default)]
    pub timeline: TimelineConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Spacing rules used when lines are created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineConfig {
    /// Seconds added past the predecessor when a new line would not follow it
    #[serde(default = "default_insert_nudge")]
    pub insert_nudge_secs: f64,
    /// Seconds between consecutive lines created from pasted text
    #[serde(default = "default_import_spacing")]
    pub import_spacing_secs: f64,
}

const fn default_insert_nudge() -> f64 {
    0.5
}

const fn default_import_spacing() -> f64 {
    2.0
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            insert_nudge_secs: default_insert_nudge(),
            import_spacing_secs: default_import_spacing(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_artist")]
    pub artist: String,
    #[serde(default = "default_album")]
    pub album: String,
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn default_artist() -> String {
    DEFAULT_ARTIST.to_string()
}

fn default_album() -> String {
    DEFAULT_ALBUM.to_string()
}

fn default_file_name() -> String {
    DEFAULT_EXPORT_FILE_NAME.to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            artist: default_artist(),
            album: default_album(),
            file_name: default_file_name(),
        }
    }
}

impl ExportConfig {
    /// ID tags to write into exported files
    #[must_use]
    pub fn metadata(&self) -> LrcMetadata {
        LrcMetadata {
            title: self.title.clone(),
            artist: self.artist.clone(),
            album: self.album.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Also write logs to a file next to the config
    #[serde(default)]
    pub enabled: bool,
}

impl StudioConfig {
    /// Get the configuration directory path (~/.config/lyricstudio/)
    #[must_use]
    pub fn config_dir() -> PathBuf {
        crate::paths::config_dir()
    }

    /// Get the config file path (~/.config/lyricstudio/config.toml)
    #[must_use]
    pub fn config_path() -> PathBuf {
        crate::paths::config_path()
    }

    /// Load config from the default location or create a template on first run
    ///
    /// # Errors
    ///
    /// Returns `ConfigNotFound` after writing the template, or an error if the
    /// file cannot be read, parsed or validated.
    pub fn load_or_create() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            write_template(&config_path)?;
            return Err(CoreError::ConfigNotFound { path: config_path });
        }

        Self::load_from(&config_path)
    }

    /// Load and validate config from a specific file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::parse(&content)?;
        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Parse and validate config from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or a value is out of range.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that spacing values are usable
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        let spacing = [
            ("timeline.insert_nudge_secs", self.timeline.insert_nudge_secs),
            ("timeline.import_spacing_secs", self.timeline.import_spacing_secs),
        ];

        for (field, value) in spacing {
            if !value.is_finite() || value <= 0.0 {
                return Err(CoreError::ConfigInvalid {
                    message: format!("{field} must be a positive number of seconds, got {value}"),
                });
            }
        }

        if self.export.file_name.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "export.file_name must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

/// Write the config template to `path`, creating parent directories
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn write_template(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, CONFIG_TEMPLATE)?;
    info!("Wrote config template to {:?}", path);
    Ok(())
}

/// Default configuration file contents
pub const CONFIG_TEMPLATE: &str = concatcp!(
    r#"# Lyric Studio Configuration
# ~/.config/lyricstudio/config.toml

[timeline]
# Seconds added past the previous line when a new line's time would not follow it
insert_nudge_secs = 0.5
# Seconds between lines created from pasted lyrics
import_spacing_secs = 2.0

[export]
title = ""#,
    DEFAULT_TITLE,
    r#""
artist = ""#,
    DEFAULT_ARTIST,
    r#""
album = ""#,
    DEFAULT_ALBUM,
    r#""
file_name = ""#,
    DEFAULT_EXPORT_FILE_NAME,
    r#""

[logging]
# Also write logs to ~/.config/lyricstudio/lyricstudio.log
enabled = false
"#
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_parses_to_defaults() {
        let config = StudioConfig::parse(CONFIG_TEMPLATE).unwrap();

        assert_eq!(config.timeline, TimelineConfig::default());
        assert_eq!(config.export.title, "Untitled Song");
        assert_eq!(config.export.artist, "Unknown Artist");
        assert_eq!(config.export.album, "Unknown Album");
        assert_eq!(config.export.file_name, "lyrics.lrc");
        assert!(!config.logging.enabled);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = StudioConfig::parse("").unwrap();
        assert!((config.timeline.insert_nudge_secs - 0.5).abs() < f64::EPSILON);
        assert!((config.timeline.import_spacing_secs - 2.0).abs() < f64::EPSILON);
        assert_eq!(config.export.metadata(), LrcMetadata::default());
    }

    #[test]
    fn test_partial_section() {
        let config = StudioConfig::parse("[export]\ntitle = \"My Song\"\n").unwrap();
        assert_eq!(config.export.title, "My Song");
        assert_eq!(config.export.artist, "Unknown Artist");
    }

    #[test]
    fn test_rejects_non_positive_spacing() {
        let result = StudioConfig::parse("[timeline]\nimport_spacing_secs = 0.0\n");
        assert!(matches!(result, Err(CoreError::ConfigInvalid { .. })));

        let result = StudioConfig::parse("[timeline]\ninsert_nudge_secs = -1.0\n");
        assert!(matches!(result, Err(CoreError::ConfigInvalid { .. })));
    }

    #[test]
    fn test_rejects_empty_file_name() {
        let result = StudioConfig::parse("[export]\nfile_name = \" \"\n");
        assert!(matches!(result, Err(CoreError::ConfigInvalid { .. })));
    }

    #[test]
    fn test_syntax_error() {
        let result = StudioConfig::parse("[timeline\n");
        assert!(matches!(result, Err(CoreError::ConfigParseError(_))));
    }

    #[test]
    fn test_write_template_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        write_template(&path).unwrap();
        let config = StudioConfig::load_from(&path).unwrap();
        assert_eq!(config.export.file_name, DEFAULT_EXPORT_FILE_NAME);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = StudioConfig::load_from(&dir.path().join("missing.toml"));
        assert!(matches!(result, Err(CoreError::IoError(_))));
    }
}
