//! Editing session for one loaded track.
//!
//! `LyricStudio` owns the timeline, the attached playback source and the view
//! flags of the lyric editor. Every change is published as a [`StudioEvent`]
//! so views can re-render without reaching into shared state.

use crate::config::{StudioConfig, TimelineConfig};
use crate::error::{CoreError, Result, TimelineError};
use crate::lrc::{LrcExport, LrcMetadata};
use crate::playback::{PlaybackSource, TrackInfo};
use crate::timeline::{LineUpdate, LyricLine, Timeline};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Result of asking the studio to jump to a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpOutcome {
    /// Seeked to the line and playback started
    Playing,
    /// Seeked to the line but the player refused to start
    PlaybackRejected,
    /// No track is loaded, nothing happened
    NoPlaybackSource,
    /// The id does not name a line, nothing happened
    LineNotFound,
}

/// Events emitted by the studio
#[derive(Debug, Clone, PartialEq)]
pub enum StudioEvent {
    /// A track was loaded and the timeline reset
    TrackLoaded { track: TrackInfo },
    /// The track was removed and the timeline cleared
    TrackRemoved,
    LineAdded { id: u64, index: usize, timestamp: f64 },
    LineUpdated { id: u64 },
    LineDeleted { id: u64 },
    /// An edit was refused; the timeline is unchanged
    EditRejected { id: u64, error: TimelineError },
    /// The timeline was replaced by lines from pasted text
    LinesImported { count: usize },
    PreviewToggled { visible: bool },
    ExternalLyricsToggled { visible: bool },
    /// Playback was moved to a line
    Jumped { id: u64, timestamp: f64, outcome: JumpOutcome },
}

/// Lyric editing session
pub struct LyricStudio {
    timeline: Timeline,
    timeline_config: TimelineConfig,
    metadata: LrcMetadata,
    playback: Option<Box<dyn PlaybackSource>>,
    track: Option<TrackInfo>,
    show_preview: bool,
    show_external_lyrics: bool,
    event_tx: broadcast::Sender<StudioEvent>,
}

impl Default for LyricStudio {
    fn default() -> Self {
        Self::with_config(&StudioConfig::default())
    }
}

impl LyricStudio {
    /// Create a studio with default settings and no track
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a studio using the timeline and export settings from `config`
    #[must_use]
    pub fn with_config(config: &StudioConfig) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            timeline: Timeline::with_config(&config.timeline),
            timeline_config: config.timeline.clone(),
            metadata: config.export.metadata(),
            playback: None,
            track: None,
            show_preview: false,
            show_external_lyrics: false,
            event_tx,
        }
    }

    /// Subscribe to studio events
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StudioEvent> {
        self.event_tx.subscribe()
    }

    fn emit(&self, event: StudioEvent) {
        // No subscribers is fine
        let _ = self.event_tx.send(event);
    }

    #[must_use]
    pub const fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Lines in editing order
    #[must_use]
    pub fn lines(&self) -> &[LyricLine] {
        self.timeline.lines()
    }

    #[must_use]
    pub const fn track(&self) -> Option<&TrackInfo> {
        self.track.as_ref()
    }

    #[must_use]
    pub const fn track_loaded(&self) -> bool {
        self.track.is_some()
    }

    /// Current playback position in seconds, `0.0` without a track
    #[must_use]
    pub fn current_time(&self) -> f64 {
        self.playback.as_ref().map_or(0.0, |source| source.current_time())
    }

    /// Track length in seconds, `0.0` without a track
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.playback.as_ref().map_or(0.0, |source| source.duration())
    }

    /// Attach a new track and start an empty timeline for it
    pub fn load_track(&mut self, track: TrackInfo, source: Box<dyn PlaybackSource>) {
        info!("Loaded track {} ({:?})", track.name, track.duration);

        self.timeline = Timeline::with_config(&self.timeline_config);
        self.playback = Some(source);
        self.track = Some(track.clone());
        self.show_preview = false;
        self.show_external_lyrics = false;

        self.emit(StudioEvent::TrackLoaded { track });
    }

    /// Detach the track and drop its lyrics
    pub fn remove_track(&mut self) {
        if let Some(track) = self.track.take() {
            info!("Removed track {}", track.name);
        }

        self.timeline.clear();
        self.playback = None;
        self.show_preview = false;
        self.show_external_lyrics = false;

        self.emit(StudioEvent::TrackRemoved);
    }

    fn reject(&self, id: u64, error: TimelineError) -> TimelineError {
        debug!("Edit of line {} rejected: {}", id, error);
        self.emit(StudioEvent::EditRejected {
            id,
            error: error.clone(),
        });
        error
    }

    /// Add an empty line at the current playback time, after `after_id` or at the end
    ///
    /// # Errors
    ///
    /// Returns `LineNotFound` if `after_id` does not name a line.
    pub fn add_line(&mut self, after_id: Option<u64>) -> std::result::Result<u64, TimelineError> {
        let current_time = self.current_time();

        match self.timeline.add_line(after_id, current_time) {
            Ok(id) => {
                let index = self.timeline.index_of(id).unwrap_or_default();
                let timestamp = self.timeline.get(id).map_or(0.0, |line| line.timestamp);
                self.emit(StudioEvent::LineAdded { id, index, timestamp });
                Ok(id)
            }
            Err(e) => Err(self.reject(after_id.unwrap_or_default(), e)),
        }
    }

    /// Apply a partial update to a line
    ///
    /// # Errors
    ///
    /// See [`Timeline::update_line`].
    pub fn update_line(&mut self, id: u64, update: LineUpdate) -> std::result::Result<(), TimelineError> {
        match self.timeline.update_line(id, update) {
            Ok(()) => {
                self.emit(StudioEvent::LineUpdated { id });
                Ok(())
            }
            Err(e) => Err(self.reject(id, e)),
        }
    }

    /// Remove a line; unknown ids are ignored
    pub fn delete_line(&mut self, id: u64) -> Option<LyricLine> {
        let removed = self.timeline.delete_line(id)?;
        self.emit(StudioEvent::LineDeleted { id });
        Some(removed)
    }

    /// Stamp a line with the current playback position
    ///
    /// # Errors
    ///
    /// Returns `NoPlaybackSource` without a track, otherwise see
    /// [`Timeline::update_line`].
    pub fn set_current_time_as_timestamp(&mut self, id: u64) -> std::result::Result<(), TimelineError> {
        if self.playback.is_none() {
            return Err(self.reject(id, TimelineError::NoPlaybackSource));
        }

        let current_time = self.current_time();
        match self.timeline.set_current_time_as_timestamp(id, current_time) {
            Ok(()) => {
                self.emit(StudioEvent::LineUpdated { id });
                Ok(())
            }
            Err(e) => Err(self.reject(id, e)),
        }
    }

    /// Whether the line at `index` can take the current playback position
    #[must_use]
    pub fn can_use_current_time(&self, index: usize) -> bool {
        self.playback.is_some() && self.timeline.can_use_current_time(index, self.current_time())
    }

    /// Replace the timeline with lines from pasted text, starting at the playback position
    pub fn import_external_text(&mut self, raw: &str) -> usize {
        let count = self
            .timeline
            .add_lines_from_external_text(raw, self.current_time());

        if count > 0 {
            self.emit(StudioEvent::LinesImported { count });
        }
        count
    }

    #[must_use]
    pub fn has_empty_lines(&self) -> bool {
        self.timeline.has_empty_lines()
    }

    /// Export data with the configured metadata
    #[must_use]
    pub fn generate_lrc(&self) -> LrcExport {
        self.timeline.generate_lrc().with_metadata(self.metadata.clone())
    }

    /// Whether the lyrics are complete enough to export
    #[must_use]
    pub fn can_export(&self) -> bool {
        !self.timeline.is_empty() && !self.timeline.has_empty_lines()
    }

    /// Render the LRC file text
    ///
    /// # Errors
    ///
    /// Returns `ExportBlocked` when there are no lines or a line has no text.
    pub fn export_lrc(&self) -> Result<String> {
        if self.timeline.is_empty() {
            return Err(CoreError::ExportBlocked {
                reason: "there are no lyric lines".to_string(),
            });
        }
        if self.timeline.has_empty_lines() {
            return Err(CoreError::ExportBlocked {
                reason: "fill in all lyric lines before exporting".to_string(),
            });
        }

        let export = self.generate_lrc();
        debug!("Exporting {} lyric lines", export.lines.len());
        Ok(export.to_string())
    }

    #[must_use]
    pub const fn show_preview(&self) -> bool {
        self.show_preview
    }

    #[must_use]
    pub const fn show_external_lyrics(&self) -> bool {
        self.show_external_lyrics
    }

    /// Whether the preview may be shown
    #[must_use]
    pub fn can_preview(&self) -> bool {
        self.can_export() && !self.show_external_lyrics
    }

    /// Whether the pasted-lyrics panel may be toggled
    #[must_use]
    pub const fn can_toggle_external_lyrics(&self) -> bool {
        !self.show_preview
    }

    /// Show or hide the preview. Showing is refused while `can_preview` is false.
    pub fn set_show_preview(&mut self, visible: bool) -> bool {
        if visible && !self.can_preview() {
            return false;
        }
        if self.show_preview != visible {
            self.show_preview = visible;
            self.emit(StudioEvent::PreviewToggled { visible });
        }
        true
    }

    /// Show or hide the pasted-lyrics panel. Refused while the preview is shown.
    pub fn set_show_external_lyrics(&mut self, visible: bool) -> bool {
        if visible && !self.can_toggle_external_lyrics() {
            return false;
        }
        if self.show_external_lyrics != visible {
            self.show_external_lyrics = visible;
            self.emit(StudioEvent::ExternalLyricsToggled { visible });
        }
        true
    }

    /// Id of the line the preview highlights at the current position
    #[must_use]
    pub fn active_line_id(&self) -> Option<u64> {
        self.timeline.active_line_id(self.current_time())
    }

    /// Lines in timestamp order, as the preview shows them
    #[must_use]
    pub fn preview_lines(&self) -> Vec<&LyricLine> {
        self.timeline.sorted_lines()
    }

    /// Seek to a line's timestamp and start playback.
    ///
    /// A player that refuses to start is logged, not treated as an error.
    pub async fn jump_to_line(&mut self, id: u64) -> JumpOutcome {
        let Some(timestamp) = self.timeline.get(id).map(|line| line.timestamp) else {
            return JumpOutcome::LineNotFound;
        };
        let Some(source) = self.playback.as_mut() else {
            return JumpOutcome::NoPlaybackSource;
        };

        source.seek(timestamp);
        let outcome = match source.play().await {
            Ok(()) => JumpOutcome::Playing,
            Err(e) => {
                warn!("Playback failed after jumping to line {}: {}", id, e);
                JumpOutcome::PlaybackRejected
            }
        };

        self.emit(StudioEvent::Jumped {
            id,
            timestamp,
            outcome,
        });
        outcome
    }
}
