//! Playback source interface and an in-memory clock implementation.

use crate::error::PlaybackError;
use crate::time::seconds_to_duration;
use async_trait::async_trait;
use std::time::{Duration, Instant};

/// Audio player the studio reads positions from and sends seeks to.
///
/// The studio only pulls `current_time` when an edit needs it; it never
/// subscribes to position updates.
#[async_trait]
pub trait PlaybackSource: Send {
    /// Current position in seconds
    fn current_time(&self) -> f64;

    /// Track length in seconds, `0.0` while unknown
    fn duration(&self) -> f64;

    fn is_playing(&self) -> bool;

    /// Move the playhead to `seconds`
    fn seek(&mut self, seconds: f64);

    /// Start playback.
    ///
    /// # Errors
    ///
    /// Returns `PlayRejected` if the player refuses to start, e.g. because
    /// autoplay is blocked.
    async fn play(&mut self) -> Result<(), PlaybackError>;

    fn pause(&mut self);
}

/// Information about the loaded track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackInfo {
    /// Display name, usually the uploaded file name
    pub name: String,
    /// Track duration
    pub duration: Duration,
}

impl TrackInfo {
    /// Create a new track info
    pub fn new(name: impl Into<String>, duration: Duration) -> Self {
        Self {
            name: name.into(),
            duration,
        }
    }
}

/// Playback position tracker driven by explicit updates.
///
/// While playing, the position advances with wall-clock time since the last
/// update, clamped to the track duration. `sync_position` corrects drift the
/// way a media element's periodic time update would.
#[derive(Debug, Clone)]
pub struct PlaybackClock {
    /// Whether the clock is advancing
    pub is_playing: bool,
    /// Position at `updated_at`
    pub position: Duration,
    /// Total track duration, zero while unknown
    pub duration: Duration,
    /// When `position` was last set (for interpolation)
    pub updated_at: Instant,
    play_rejection: Option<String>,
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl PlaybackClock {
    /// Create a paused clock at the start of a track
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            is_playing: false,
            position: Duration::ZERO,
            duration,
            updated_at: Instant::now(),
            play_rejection: None,
        }
    }

    /// Make every `play` call fail with `reason`
    #[must_use]
    pub fn with_blocked_autoplay(mut self, reason: impl Into<String>) -> Self {
        self.play_rejection = Some(reason.into());
        self
    }

    /// Let `play` succeed again
    pub fn allow_autoplay(&mut self) {
        self.play_rejection = None;
    }

    fn clamp(&self, position: Duration) -> Duration {
        if self.duration.is_zero() {
            position
        } else {
            position.min(self.duration)
        }
    }

    /// Get interpolated position based on time elapsed since last update
    #[must_use]
    pub fn interpolated_position(&self) -> Duration {
        if !self.is_playing {
            return self.position;
        }

        self.clamp(self.position + self.updated_at.elapsed())
    }

    /// Reset the reference position, as reported by the player
    pub fn sync_position(&mut self, position: Duration) {
        self.position = self.clamp(position);
        self.updated_at = Instant::now();
    }
}

#[async_trait]
impl PlaybackSource for PlaybackClock {
    fn current_time(&self) -> f64 {
        self.interpolated_position().as_secs_f64()
    }

    fn duration(&self) -> f64 {
        self.duration.as_secs_f64()
    }

    fn is_playing(&self) -> bool {
        self.is_playing
    }

    fn seek(&mut self, seconds: f64) {
        self.sync_position(seconds_to_duration(seconds));
    }

    async fn play(&mut self) -> Result<(), PlaybackError> {
        if let Some(reason) = &self.play_rejection {
            return Err(PlaybackError::PlayRejected {
                reason: reason.clone(),
            });
        }

        if !self.is_playing {
            self.updated_at = Instant::now();
            self.is_playing = true;
        }
        Ok(())
    }

    fn pause(&mut self) {
        self.position = self.interpolated_position();
        self.updated_at = Instant::now();
        self.is_playing = false;
    }
}
