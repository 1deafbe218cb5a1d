//! Playback Events
//!
//! Event-based communication for UI synchronization. Events are emitted at
//! key points:
//! - State changes (loading/playing/paused/stopped/error)
//! - Track changes (every load)
//! - Position updates (every accepted sampler tick)
//! - Queue and shuffle changes

use crate::types::{PlaybackState, Track};
use serde::{Deserialize, Serialize};

/// Events emitted by the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Playback state changed
    StateChanged {
        /// The new playback state
        state: PlaybackState,
    },

    /// A new track became current
    TrackChanged {
        /// The new (current) track
        track: Track,
        /// ID of the previous track (if any)
        previous_track_id: Option<String>,
    },

    /// Periodic position update
    PositionUpdate {
        /// Elapsed seconds
        position: f64,
        /// Track duration in seconds (0 until resolved)
        duration: f64,
        /// position / duration, 0 when the duration is unknown
        progress: f64,
    },

    /// Queue replaced
    QueueChanged {
        /// New queue length
        length: usize,
    },

    /// Shuffle toggled
    ShuffleChanged {
        enabled: bool,
    },

    /// Loading or playback failed
    Error {
        /// Error message
        message: String,
    },
}

impl PlaybackEvent {
    /// Short name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            PlaybackEvent::StateChanged { .. } => "state_changed",
            PlaybackEvent::TrackChanged { .. } => "track_changed",
            PlaybackEvent::PositionUpdate { .. } => "position_update",
            PlaybackEvent::QueueChanged { .. } => "queue_changed",
            PlaybackEvent::ShuffleChanged { .. } => "shuffle_changed",
            PlaybackEvent::Error { .. } => "error",
        }
    }
}
