//! Transport state machine
//!
//! ```text
//! Stopped ──load──▶ Loading ──resolved──▶ Playing ◀──▶ Paused
//!    ▲                 │                     │           │
//!    │                 └──failed──▶ Error    └───stop────┴──▶ Stopped
//! ```
//!
//! Every active state carries the track it refers to, so `Playing` without
//! a track cannot be constructed. A stop that lands before a resolution
//! succeeded keeps the track for display but leaves nothing to resume.
//! Transitions here are pure bookkeeping; the manager issues the matching
//! device commands.

use crate::types::{PlaybackState, Track};

#[derive(Debug, Clone)]
enum Status {
    Stopped { track: Option<Track>, attached: bool },
    Loading { track: Track, generation: u64 },
    Playing { track: Track },
    Paused { track: Track },
    Failed { track: Option<Track>, message: String },
}

/// Result of applying a finished duration resolution
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// Resolution matched the pending load and playback started
    Started,

    /// Resolution matched the pending load but failed
    Failed(String),

    /// A newer load or a stop superseded this resolution
    Stale,
}

#[derive(Debug, Clone)]
pub struct Transport {
    status: Status,

    /// Incremented by every load and every stop
    generation: u64,
}

impl Transport {
    pub fn new() -> Self {
        Self {
            status: Status::Stopped {
                track: None,
                attached: false,
            },
            generation: 0,
        }
    }

    /// Public projection of the current status
    pub fn state(&self) -> PlaybackState {
        match &self.status {
            Status::Stopped { .. } => PlaybackState::Stopped,
            Status::Loading { .. } => PlaybackState::Loading,
            Status::Playing { .. } => PlaybackState::Playing,
            Status::Paused { .. } => PlaybackState::Paused,
            Status::Failed { message, .. } => PlaybackState::Error(message.clone()),
        }
    }

    /// Track the transport currently refers to
    pub fn track(&self) -> Option<&Track> {
        match &self.status {
            Status::Loading { track, .. } | Status::Playing { track } | Status::Paused { track } => {
                Some(track)
            }
            Status::Stopped { track, .. } | Status::Failed { track, .. } => track.as_ref(),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.status, Status::Playing { .. })
    }

    /// Whether a source is attached to the device (resolved and not stopped)
    pub fn has_source(&self) -> bool {
        matches!(self.status, Status::Playing { .. } | Status::Paused { .. })
    }

    /// Enter `Loading` for `track`, superseding any in-flight resolution
    ///
    /// Returns the generation the resolution must present to be applied.
    pub fn begin_load(&mut self, track: Track) -> u64 {
        self.generation += 1;
        self.status = Status::Loading {
            track,
            generation: self.generation,
        };
        self.generation
    }

    /// Fail a load before it starts (malformed stream reference)
    pub fn reject(&mut self, track: Track, message: String) {
        self.generation += 1;
        self.status = Status::Failed {
            track: Some(track),
            message,
        };
    }

    /// Apply a resolution result if it belongs to the pending load
    pub fn complete_load(
        &mut self,
        generation: u64,
        result: std::result::Result<(), String>,
    ) -> LoadOutcome {
        let track = match &self.status {
            Status::Loading {
                track,
                generation: pending,
            } if *pending == generation => track.clone(),
            _ => return LoadOutcome::Stale,
        };

        match result {
            Ok(()) => {
                self.status = Status::Playing { track };
                LoadOutcome::Started
            }
            Err(message) => {
                self.status = Status::Failed {
                    track: Some(track),
                    message: message.clone(),
                };
                LoadOutcome::Failed(message)
            }
        }
    }

    /// Track that was stopped before its source ever resolved
    ///
    /// Starting it again needs a fresh load rather than a resume.
    pub fn unresolved_stop(&self) -> Option<&Track> {
        match &self.status {
            Status::Stopped {
                track: Some(track),
                attached: false,
            } => Some(track),
            _ => None,
        }
    }

    /// `Paused`, or `Stopped` with an attached source → `Playing`
    ///
    /// `Loading` and `Error` only leave through a load, so they are left alone.
    pub fn play(&mut self) -> bool {
        let track = match &self.status {
            Status::Paused { track }
            | Status::Stopped {
                track: Some(track),
                attached: true,
            } => track.clone(),
            _ => return false,
        };
        self.status = Status::Playing { track };
        true
    }

    /// `Playing` → `Paused`
    pub fn pause(&mut self) -> bool {
        let Status::Playing { track } = &self.status else {
            return false;
        };
        self.status = Status::Paused {
            track: track.clone(),
        };
        true
    }

    /// Any state → `Stopped`, keeping the track for a later `play`
    ///
    /// Also invalidates a pending resolution. Only a resolved source stays
    /// attached; stopping `Loading` or `Error` leaves nothing to resume.
    pub fn stop(&mut self) {
        let track = self.track().cloned();
        let attached = matches!(
            self.status,
            Status::Playing { .. } | Status::Paused { .. } | Status::Stopped { attached: true, .. }
        );
        self.generation += 1;
        self.status = Status::Stopped { track, attached };
    }

    /// Device reported a failure for the attached or loading source
    pub fn fail(&mut self, message: String) -> bool {
        if !matches!(
            self.status,
            Status::Loading { .. } | Status::Playing { .. } | Status::Paused { .. }
        ) {
            return false;
        }
        let track = self.track().cloned();
        self.generation += 1;
        self.status = Status::Failed { track, message };
        true
    }
}

impl Default for Transport {
    fn default() -> Self {
        Self::new()
    }
}
