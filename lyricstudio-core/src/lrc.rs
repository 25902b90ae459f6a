use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Title used when the track has none.
pub const DEFAULT_TITLE: &str = "Untitled Song";
/// Artist used when the track has none.
pub const DEFAULT_ARTIST: &str = "Unknown Artist";
/// Album used when the track has none.
pub const DEFAULT_ALBUM: &str = "Unknown Album";

/// LRC ID tags written at the top of an exported file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LrcMetadata {
    pub title: String,
    pub artist: String,
    pub album: String,
}

impl Default for LrcMetadata {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            artist: DEFAULT_ARTIST.to_string(),
            album: DEFAULT_ALBUM.to_string(),
        }
    }
}

/// A single exported lyric line with its formatted `MM:SS.ss` time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LrcEntry {
    pub time: String,
    pub text: String,
}

/// Export-ready LRC data: metadata plus lines sorted by timestamp.
///
/// `Display` renders the LRC file text:
///
/// ```text
/// [ti:Untitled Song]
/// [ar:Unknown Artist]
/// [al:Unknown Album]
///
/// [00:05.00]First line
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LrcExport {
    pub metadata: LrcMetadata,
    pub lines: Vec<LrcEntry>,
}

impl LrcExport {
    /// Replace the metadata tags
    #[must_use]
    pub fn with_metadata(mut self, metadata: LrcMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Pretty JSON form of the export, for logging or tooling.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for LrcExport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[ti:{}]", self.metadata.title)?;
        writeln!(f, "[ar:{}]", self.metadata.artist)?;
        writeln!(f, "[al:{}]", self.metadata.album)?;
        writeln!(f)?;

        for line in &self.lines {
            writeln!(f, "[{}]{}", line.time, line.text)?;
        }

        Ok(())
    }
}
