//! Playback manager - core orchestration
//!
//! Coordinates the queue, the transport state machine and the device.
//! Everything here runs on one owner; asynchronous duration resolution is
//! handed out as a [`LoadRequest`] and fed back through
//! [`PlaybackManager::complete_load`].

use crate::{
    device::{DeviceDriver, PositionSample},
    error::{PlaybackError, Result},
    events::PlaybackEvent,
    history::RecentlyPlayed,
    queue::Queue,
    shuffle::ShufflePolicy,
    transport::{LoadOutcome, Transport},
    types::{PlaybackConfig, PlaybackSnapshot, PlaybackState, Track},
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Duration resolution the owner must run against the device
#[derive(Debug, Clone, PartialEq)]
pub struct LoadRequest {
    /// Must be handed back unchanged to `complete_load`
    pub generation: u64,
    pub track: Track,
}

/// Central playback management
///
/// Orchestrates all playback functionality:
/// - Queue management (circular, with source order kept for unshuffle)
/// - Smart shuffle (recently played tracks kept out of rotation)
/// - Transport state machine (loading/playing/paused/stopped/error)
/// - Position observation (sampler ticks → position, duration, progress)
pub struct PlaybackManager {
    config: PlaybackConfig,
    driver: Arc<dyn DeviceDriver>,

    // State
    transport: Transport,
    queue: Queue,
    position: f64,
    duration: f64,

    // Resolution waiting to be dispatched by the owner
    pending_load: Option<LoadRequest>,

    // Event queue for UI synchronization
    pending_events: Vec<PlaybackEvent>,
}

impl PlaybackManager {
    /// Create new playback manager
    pub fn new(config: PlaybackConfig, driver: Arc<dyn DeviceDriver>) -> Self {
        let queue = Queue::new(ShufflePolicy::from(&config), config.shuffle);
        Self::with_queue(config, driver, queue)
    }

    /// Create a manager whose shuffles are reproducible
    pub fn with_seed(config: PlaybackConfig, driver: Arc<dyn DeviceDriver>, seed: u64) -> Self {
        let queue = Queue::with_seed(ShufflePolicy::from(&config), config.shuffle, seed);
        Self::with_queue(config, driver, queue)
    }

    fn with_queue(config: PlaybackConfig, driver: Arc<dyn DeviceDriver>, queue: Queue) -> Self {
        Self {
            config,
            driver,
            transport: Transport::new(),
            queue,
            position: 0.0,
            duration: 0.0,
            pending_load: None,
            pending_events: Vec::new(),
        }
    }

    // ===== Queue =====

    /// Replace the queue and load the track at `start_index` (clamped)
    ///
    /// An empty list clears the queue without loading anything.
    pub fn set_queue(&mut self, tracks: Vec<Track>, start_index: usize) {
        let to_load = self.queue.set(tracks, start_index).cloned();
        info!(
            tracks = self.queue.len(),
            start_index,
            shuffle = self.queue.is_shuffled(),
            "Queue replaced"
        );
        self.emit(PlaybackEvent::QueueChanged {
            length: self.queue.len(),
        });

        if let Some(track) = to_load {
            self.load_track(track);
        }
    }

    /// Skip to next track, wrapping at the end
    pub fn next(&mut self) {
        if let Some(track) = self.queue.advance().cloned() {
            self.load_track(track);
        }
    }

    /// Go to previous track
    ///
    /// Past the restart threshold this restarts the current track instead,
    /// without touching the queue.
    pub fn previous(&mut self) {
        if self.queue.is_empty() {
            return;
        }

        if self.position > self.config.restart_threshold_secs {
            debug!(position = self.position, "Restarting current track");
            self.seek(0.0);
            self.set_position(0.0);
            return;
        }

        if let Some(track) = self.queue.retreat().cloned() {
            self.load_track(track);
        }
    }

    /// Flip shuffle; the playing track keeps playing either way
    pub fn toggle_shuffle(&mut self) {
        let playing = self.current_track().cloned();
        let enabled = self.queue.toggle_shuffle(playing.as_ref());
        info!(enabled, "Shuffle toggled");
        self.emit(PlaybackEvent::ShuffleChanged { enabled });
    }

    /// Recompute the shuffled order around the current track
    ///
    /// No-op when shuffle is off.
    pub fn reshuffle(&mut self) {
        let playing = self.current_track().cloned();
        self.queue.reshuffle(playing.as_ref());
    }

    // ===== Transport =====

    /// Load a track and start playing once the device resolves it
    ///
    /// A malformed stream reference fails immediately, without entering
    /// `Loading`. Any resolution still in flight is superseded.
    pub fn load_track(&mut self, track: Track) {
        let previous_track_id = self.current_track().map(|t| t.id.clone());
        self.set_position(0.0);
        self.duration = 0.0;

        if url::Url::parse(&track.stream_url).is_err() {
            warn!(track_id = %track.id, url = %track.stream_url, "Rejecting track with invalid URL");
            self.driver.pause();
            self.transport
                .reject(track.clone(), PlaybackError::InvalidSource.to_string());
            self.pending_load = None;
            self.emit_track_changed(track, previous_track_id);
            self.emit_state_changed();
            self.emit(PlaybackEvent::Error {
                message: PlaybackError::InvalidSource.to_string(),
            });
            return;
        }

        let generation = self.transport.begin_load(track.clone());
        info!(track_id = %track.id, title = %track.title, generation, "Loading track");

        self.pending_load = Some(LoadRequest {
            generation,
            track: track.clone(),
        });
        self.emit_track_changed(track, previous_track_id);
        self.emit_state_changed();
    }

    /// Hand out the resolution the owner should run next
    pub fn take_load_request(&mut self) -> Option<LoadRequest> {
        self.pending_load.take()
    }

    /// Apply a finished duration resolution
    ///
    /// Results for a superseded load are discarded.
    pub fn complete_load(&mut self, generation: u64, result: Result<f64>) {
        let duration = result.as_ref().ok().copied();
        let outcome = self.transport.complete_load(
            generation,
            result.map(|_| ()).map_err(|e| resolution_message(&e)),
        );

        match outcome {
            LoadOutcome::Started => {
                self.duration = duration.unwrap_or(0.0).max(0.0);
                info!(generation, duration = self.duration, "Track resolved");
                self.driver.play();
                self.emit_state_changed();
                self.emit_position_update();
            }
            LoadOutcome::Failed(message) => {
                warn!(generation, error = %message, "Track failed to load");
                self.driver.pause();
                self.emit_state_changed();
                self.emit(PlaybackEvent::Error { message });
            }
            LoadOutcome::Stale => {
                debug!(
                    generation,
                    current = self.transport.generation(),
                    "Discarding stale resolution"
                );
            }
        }
    }

    /// Start or resume playback
    ///
    /// A track stopped before it ever resolved is loaded again.
    pub fn play(&mut self) {
        if self.transport.play() {
            self.driver.play();
            self.emit_state_changed();
        } else if let Some(track) = self.transport.unresolved_stop().cloned() {
            debug!(track_id = %track.id, "Reloading track stopped before it resolved");
            self.load_track(track);
        }
    }

    /// Pause playback (only meaningful while playing)
    pub fn pause(&mut self) {
        if self.transport.pause() {
            self.driver.pause();
            self.emit_state_changed();
        }
    }

    /// Stop playback and rewind to the start
    ///
    /// The current track and the queue are kept; `play` starts it again,
    /// through a fresh load if it never resolved.
    pub fn stop(&mut self) {
        self.driver.pause();
        self.driver.seek(0.0);
        self.transport.stop();
        self.pending_load = None;
        self.set_position(0.0);
        self.emit_state_changed();
    }

    pub fn toggle_play_pause(&mut self) {
        if self.transport.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Seek to an absolute position; the caller keeps it in range
    pub fn seek(&mut self, seconds: f64) {
        self.driver.seek(seconds);
    }

    /// Seek to a fraction of the resolved duration
    pub fn seek_to_percent(&mut self, fraction: f64) {
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        self.seek(fraction * self.duration);
    }

    /// Jump back by the rewind step, not past the start
    pub fn rewind(&mut self) {
        let target = (self.position - self.config.rewind_step_secs).max(0.0);
        self.seek(target);
    }

    // ===== Device notifications =====

    /// Periodic sampler tick
    ///
    /// Ticks without an attached source, or while a load is pending, are
    /// dropped. Never changes the playback state.
    pub fn on_position_sample(&mut self, sample: Option<PositionSample>) {
        let Some(sample) = sample else {
            return;
        };
        if !self.transport.has_source() {
            return;
        }

        if sample.duration > 0.0 {
            self.duration = sample.duration;
        }
        let mut position = sample.position.max(0.0);
        if self.duration > 0.0 {
            position = position.min(self.duration);
        }
        self.set_position(position);
        self.emit_position_update();
    }

    /// Source finished naturally: advance
    pub fn on_end_of_track(&mut self) {
        if !self.transport.is_playing() {
            debug!("Ignoring end of track while not playing");
            return;
        }
        debug!("Track finished, advancing");
        self.next();
    }

    /// Device failed after load; the queue is left intact
    pub fn on_device_failure(&mut self, reason: &str) {
        let message = PlaybackError::DriverFailure(reason.to_string()).to_string();
        if self.transport.fail(message.clone()) {
            warn!(error = %message, "Device failure");
            self.pending_load = None;
            self.emit_state_changed();
            self.emit(PlaybackEvent::Error { message });
        }
    }

    // ===== Observation =====

    pub fn state(&self) -> PlaybackState {
        self.transport.state()
    }

    /// Track loaded (or being loaded) by the transport
    pub fn current_track(&self) -> Option<&Track> {
        self.transport.track()
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// position / duration, 0 while the duration is unknown
    pub fn progress(&self) -> f64 {
        if self.duration > 0.0 {
            self.position / self.duration
        } else {
            0.0
        }
    }

    pub fn is_shuffle_enabled(&self) -> bool {
        self.queue.is_shuffled()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.queue.current_index()
    }

    /// Tracks in source order
    pub fn queue(&self) -> &[Track] {
        self.queue.original()
    }

    /// Tracks in traversal order
    pub fn play_order(&self) -> &[Track] {
        self.queue.play_order()
    }

    /// Track at `index` in the play order
    pub fn track_at(&self, index: usize) -> Result<&Track> {
        self.queue
            .get(index)
            .ok_or(PlaybackError::IndexOutOfBounds(index))
    }

    pub fn recently_played(&self) -> &RecentlyPlayed {
        self.queue.recently_played()
    }

    /// Generation of the most recent load or stop
    pub fn load_generation(&self) -> u64 {
        self.transport.generation()
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            current_track: self.current_track().cloned(),
            state: self.state(),
            position: self.position,
            duration: self.duration,
            progress: self.progress(),
            shuffle_enabled: self.is_shuffle_enabled(),
            queue_len: self.queue.len(),
            current_index: self.current_index(),
        }
    }

    // ===== Events =====

    /// Drain pending events
    ///
    /// The owner should call this after every operation to forward events
    /// to the UI.
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    fn set_position(&mut self, position: f64) {
        self.position = position;
    }

    fn emit(&mut self, event: PlaybackEvent) {
        self.pending_events.push(event);
    }

    fn emit_state_changed(&mut self) {
        let state = self.state();
        self.emit(PlaybackEvent::StateChanged { state });
    }

    fn emit_track_changed(&mut self, track: Track, previous_track_id: Option<String>) {
        self.emit(PlaybackEvent::TrackChanged {
            track,
            previous_track_id,
        });
    }

    fn emit_position_update(&mut self) {
        let event = PlaybackEvent::PositionUpdate {
            position: self.position,
            duration: self.duration,
            progress: self.progress(),
        };
        self.emit(event);
    }
}

/// Text shown for a failed resolution
fn resolution_message(error: &PlaybackError) -> String {
    match error {
        PlaybackError::ResolutionFailure(_) | PlaybackError::InvalidSource => error.to_string(),
        other => PlaybackError::ResolutionFailure(other.to_string()).to_string(),
    }
}
