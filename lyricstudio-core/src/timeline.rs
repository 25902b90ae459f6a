//! Ordered lyric-line timeline.
//!
//! Lines keep the order they were inserted in; that is the editing order.
//! Preview and export work on a copy sorted by timestamp. Timestamps are kept
//! ascending along the editing order on the paths that can enforce it:
//! inserting a line and changing a line's timestamp.

use crate::config::TimelineConfig;
use crate::error::TimelineError;
use crate::lrc::{LrcEntry, LrcExport, LrcMetadata};
use crate::time::{format_lrc_timestamp, sanitize_seconds};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, info};

/// One timestamped lyric entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LyricLine {
    /// Session-unique id, never reused until the timeline is cleared
    pub id: u64,
    /// Lyric text, possibly empty while the user is still typing
    pub text: String,
    /// Seconds into the track at which this line appears
    pub timestamp: f64,
}

impl LyricLine {
    /// Create a new lyric line
    pub fn new(id: u64, text: impl Into<String>, timestamp: f64) -> Self {
        Self {
            id,
            text: text.into(),
            timestamp,
        }
    }

    /// Whether the text is blank after trimming
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Partial update for a lyric line; `None` fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineUpdate {
    pub text: Option<String>,
    pub timestamp: Option<f64>,
}

impl LineUpdate {
    /// Update only the text
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            timestamp: None,
        }
    }

    /// Update only the timestamp
    #[must_use]
    pub const fn timestamp(timestamp: f64) -> Self {
        Self {
            text: None,
            timestamp: Some(timestamp),
        }
    }

    /// Also set the text
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Also set the timestamp
    #[must_use]
    pub const fn with_timestamp(mut self, timestamp: f64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// The ordered lyric lines of one editing session
#[derive(Debug, Clone)]
pub struct Timeline {
    lines: Vec<LyricLine>,
    /// Highest id handed out so far, so deleted ids are not reissued
    last_id: u64,
    insert_nudge_secs: f64,
    import_spacing_secs: f64,
}

impl Default for Timeline {
    fn default() -> Self {
        Self::with_config(&TimelineConfig::default())
    }
}

impl Timeline {
    /// Create an empty timeline with default spacing rules
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty timeline using the configured spacing rules
    #[must_use]
    pub const fn with_config(config: &TimelineConfig) -> Self {
        Self {
            lines: Vec::new(),
            last_id: 0,
            insert_nudge_secs: config.insert_nudge_secs,
            import_spacing_secs: config.import_spacing_secs,
        }
    }

    /// Create a timeline holding `lines` as-is, in the given order
    #[must_use]
    pub fn from_lines(lines: Vec<LyricLine>) -> Self {
        let last_id = lines.iter().map(|line| line.id).max().unwrap_or(0);
        Self {
            lines,
            last_id,
            ..Self::default()
        }
    }

    /// Lines in editing order
    #[must_use]
    pub fn lines(&self) -> &[LyricLine] {
        &self.lines
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Look up a line by id
    #[must_use]
    pub fn get(&self, id: u64) -> Option<&LyricLine> {
        self.lines.iter().find(|line| line.id == id)
    }

    /// Position of a line in editing order
    #[must_use]
    pub fn index_of(&self, id: u64) -> Option<usize> {
        self.lines.iter().position(|line| line.id == id)
    }

    fn next_id(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| line.id)
            .max()
            .unwrap_or(0)
            .max(self.last_id)
            + 1
    }

    /// Insert an empty line and return its id.
    ///
    /// With `after_id` the line goes right after that line, otherwise at the
    /// end. The playback time is used as the timestamp when it fits between
    /// the new neighbours; otherwise it is nudged past the predecessor, or
    /// placed halfway between predecessor and successor.
    ///
    /// # Errors
    ///
    /// Returns `LineNotFound` if `after_id` does not name a line.
    pub fn add_line(&mut self, after_id: Option<u64>, current_time: f64) -> Result<u64, TimelineError> {
        let id = self.next_id();
        let candidate = sanitize_seconds(current_time);

        let (index, timestamp) = match after_id {
            Some(after_id) => {
                let index = self
                    .index_of(after_id)
                    .ok_or(TimelineError::LineNotFound { id: after_id })?;
                let prev = self.lines[index].timestamp;

                let mut timestamp = candidate;
                if timestamp <= prev {
                    timestamp = prev + self.insert_nudge_secs;
                }
                if let Some(next) = self.lines.get(index + 1) {
                    if timestamp >= next.timestamp {
                        timestamp = (prev + next.timestamp) / 2.0;
                    }
                }

                (index + 1, timestamp)
            }
            None => {
                let timestamp = match self.lines.last() {
                    Some(last) if candidate <= last.timestamp => last.timestamp + self.insert_nudge_secs,
                    _ => candidate,
                };
                (self.lines.len(), timestamp)
            }
        };

        self.lines.insert(index, LyricLine::new(id, String::new(), timestamp));
        self.last_id = id;
        debug!("Added lyric line {} at index {} ({:.2}s)", id, index, timestamp);

        Ok(id)
    }

    /// Check whether `timestamp` keeps the line at `index` between its neighbours.
    ///
    /// Ties with a neighbour are allowed.
    #[must_use]
    pub fn is_valid_timestamp_position(&self, index: usize, timestamp: f64) -> bool {
        let prev = index.checked_sub(1).and_then(|i| self.lines.get(i));
        let next = index.checked_add(1).and_then(|i| self.lines.get(i));

        if prev.is_some_and(|prev| timestamp < prev.timestamp) {
            return false;
        }
        if next.is_some_and(|next| timestamp > next.timestamp) {
            return false;
        }
        true
    }

    /// Merge `update` into the line with `id`.
    ///
    /// A timestamp change must keep the ascending order with the line's
    /// neighbours; if it does not, nothing is changed, text included.
    ///
    /// # Errors
    ///
    /// Returns `LineNotFound` for an unknown id, `InvalidTimestamp` for a
    /// negative or non-finite timestamp and `TimestampOutOfOrder` when the
    /// timestamp would break the ordering.
    pub fn update_line(&mut self, id: u64, update: LineUpdate) -> Result<(), TimelineError> {
        let index = self.index_of(id).ok_or(TimelineError::LineNotFound { id })?;

        if let Some(timestamp) = update.timestamp {
            if !timestamp.is_finite() || timestamp < 0.0 {
                return Err(TimelineError::InvalidTimestamp { timestamp });
            }
            if !self.is_valid_timestamp_position(index, timestamp) {
                debug!("Rejected timestamp {:.2}s for lyric line {}", timestamp, id);
                return Err(TimelineError::TimestampOutOfOrder { id, timestamp });
            }
        }

        let line = &mut self.lines[index];
        if let Some(text) = update.text {
            line.text = text;
        }
        if let Some(timestamp) = update.timestamp {
            line.timestamp = timestamp;
        }

        Ok(())
    }

    /// Remove a line. Unknown ids are ignored.
    pub fn delete_line(&mut self, id: u64) -> Option<LyricLine> {
        let index = self.index_of(id)?;
        let removed = self.lines.remove(index);
        debug!("Deleted lyric line {}", id);
        Some(removed)
    }

    /// Stamp a line with the current playback time.
    ///
    /// # Errors
    ///
    /// Same as [`Timeline::update_line`].
    pub fn set_current_time_as_timestamp(&mut self, id: u64, current_time: f64) -> Result<(), TimelineError> {
        self.update_line(id, LineUpdate::timestamp(sanitize_seconds(current_time)))
    }

    /// Whether stamping the line at `index` with the current playback time would succeed
    #[must_use]
    pub fn can_use_current_time(&self, index: usize, current_time: f64) -> bool {
        index < self.lines.len()
            && self.is_valid_timestamp_position(index, sanitize_seconds(current_time))
    }

    /// Whether any line has blank text. An empty timeline has none.
    #[must_use]
    pub fn has_empty_lines(&self) -> bool {
        self.lines.iter().any(LyricLine::is_empty)
    }

    /// Replace every line with one line per non-blank line of `raw`.
    ///
    /// Lines start at the playback time and are spaced two seconds apart by
    /// default. Returns the number of lines created; blank input leaves the
    /// timeline as it was.
    pub fn add_lines_from_external_text(&mut self, raw: &str, current_time: f64) -> usize {
        let texts: Vec<&str> = raw
            .lines()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .collect();

        if texts.is_empty() {
            return 0;
        }

        let start = sanitize_seconds(current_time);
        let first_id = self.next_id();

        self.lines = (first_id..)
            .zip(0u32..)
            .zip(texts)
            .map(|((id, step), text)| {
                LyricLine::new(id, text, start + f64::from(step) * self.import_spacing_secs)
            })
            .collect();

        if let Some(last) = self.lines.last() {
            self.last_id = last.id;
        }

        info!("Imported {} lyric lines starting at {:.2}s", self.lines.len(), start);
        self.lines.len()
    }

    /// Lines sorted by timestamp. Equal timestamps keep their editing order.
    #[must_use]
    pub fn sorted_lines(&self) -> Vec<&LyricLine> {
        let mut sorted: Vec<&LyricLine> = self.lines.iter().collect();
        sorted.sort_by(|a, b| a.timestamp.partial_cmp(&b.timestamp).unwrap_or(Ordering::Equal));
        sorted
    }

    /// Id of the line showing at `position`: the last line, in timestamp
    /// order, that starts at or before it
    #[must_use]
    pub fn active_line_id(&self, position: f64) -> Option<u64> {
        self.sorted_lines()
            .into_iter()
            .rev()
            .find(|line| line.timestamp <= position)
            .map(|line| line.id)
    }

    /// Lines around `position` in timestamp order, for a scrolling preview
    #[must_use]
    pub fn visible_lines(&self, position: f64, before: usize, after: usize) -> Vec<&LyricLine> {
        let sorted = self.sorted_lines();
        let current_idx = sorted
            .iter()
            .rposition(|line| line.timestamp <= position)
            .unwrap_or(0);

        let start = current_idx.saturating_sub(before);
        let end = current_idx.saturating_add(after).saturating_add(1).min(sorted.len());

        sorted.get(start..end).map(<[_]>::to_vec).unwrap_or_default()
    }

    /// Build export data with placeholder metadata
    #[must_use]
    pub fn generate_lrc(&self) -> LrcExport {
        let lines: Vec<LrcEntry> = self
            .sorted_lines()
            .into_iter()
            .map(|line| LrcEntry {
                time: format_lrc_timestamp(line.timestamp),
                text: line.text.clone(),
            })
            .collect();

        debug!("Generated LRC data with {} lines", lines.len());

        LrcExport {
            metadata: LrcMetadata::default(),
            lines,
        }
    }

    /// Drop every line and start id assignment over
    pub fn clear(&mut self) {
        self.lines.clear();
        self.last_id = 0;
    }
}
