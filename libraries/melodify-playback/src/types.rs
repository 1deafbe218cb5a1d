//! Core types for playback management

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Track information for queue management
///
/// Immutable value handed over by the catalog. Two tracks are equal when
/// their identifiers are equal, regardless of the remaining metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier within a session
    pub id: String,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Album name
    pub album: String,

    /// Cover art URL
    pub artwork_url: String,

    /// Preview/stream URL handed to the device driver
    pub stream_url: String,

    /// Track duration as advertised by the catalog, in seconds
    pub duration_secs: u32,
}

impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Track {}

/// Playback state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    /// Waiting for the device to resolve the current track
    Loading,

    /// Currently playing
    Playing,

    /// Paused mid-track
    Paused,

    /// Nothing playing, position at zero
    Stopped,

    /// Loading or playback failed; cleared by the next load
    Error(String),
}

impl PlaybackState {
    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackState::Playing)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, PlaybackState::Error(_))
    }
}

/// Configuration for the playback controller and its session runtime
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Position sampling cadence (default: 100ms)
    pub sample_interval: Duration,

    /// Elapsed seconds after which "previous" restarts the track (default: 3)
    pub restart_threshold_secs: f64,

    /// Seconds jumped back by rewind (default: 10)
    pub rewind_step_secs: f64,

    /// Upper bound on the recently played window (default: 5)
    pub recent_cap: usize,

    /// Re-seed the recent window when fewer unseen tracks remain (default: 3)
    pub reseed_min_available: usize,

    /// Re-seeding only applies to queues longer than this (default: 5)
    pub reseed_min_queue: usize,

    /// Capacity of the broadcast event channel (default: 256)
    pub event_capacity: usize,

    /// Initial shuffle setting (default: off)
    pub shuffle: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            sample_interval: Duration::from_millis(100),
            restart_threshold_secs: 3.0,
            rewind_step_secs: 10.0,
            recent_cap: 5,
            reseed_min_available: 3,
            reseed_min_queue: 5,
            event_capacity: 256,
            shuffle: false,
        }
    }
}

/// Read-only view of the session for UI binding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSnapshot {
    pub current_track: Option<Track>,
    pub state: PlaybackState,
    pub position: f64,
    pub duration: f64,
    pub progress: f64,
    pub shuffle_enabled: bool,
    pub queue_len: usize,
    pub current_index: Option<usize>,
}

impl Default for PlaybackSnapshot {
    fn default() -> Self {
        Self {
            current_track: None,
            state: PlaybackState::Stopped,
            position: 0.0,
            duration: 0.0,
            progress: 0.0,
            shuffle_enabled: false,
            queue_len: 0,
            current_index: None,
        }
    }
}

/// Format seconds as `m:ss` for display
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: &str, title: &str) -> Track {
        Track {
            id: id.to_string(),
            title: title.to_string(),
            artist: "Test Artist".to_string(),
            album: "Test Album".to_string(),
            artwork_url: String::new(),
            stream_url: format!("https://cdn.example.com/{}.mp3", id),
            duration_secs: 30,
        }
    }

    #[test]
    fn default_config() {
        let config = PlaybackConfig::default();
        assert_eq!(config.sample_interval, Duration::from_millis(100));
        assert_eq!(config.restart_threshold_secs, 3.0);
        assert_eq!(config.rewind_step_secs, 10.0);
        assert_eq!(config.recent_cap, 5);
        assert!(!config.shuffle);
    }

    #[test]
    fn track_equality_is_identifier_based() {
        assert_eq!(track("1", "Blinding Lights"), track("1", "Renamed"));
        assert_ne!(track("1", "Same"), track("2", "Same"));
    }

    #[test]
    fn format_time_minutes_and_seconds() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(9.9), "0:09");
        assert_eq!(format_time(201.0), "3:21");
        assert_eq!(format_time(-4.0), "0:00");
        assert_eq!(format_time(f64::NAN), "0:00");
    }

    #[test]
    fn error_state_carries_message() {
        let state = PlaybackState::Error("Invalid track URL".to_string());
        assert!(state.is_error());
        assert!(!state.is_playing());
        assert_eq!(state, PlaybackState::Error("Invalid track URL".to_string()));
    }
}
