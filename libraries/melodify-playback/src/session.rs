//! Async session runtime
//!
//! A single tokio task owns the [`PlaybackManager`] and serializes every
//! mutation through one `select!` loop:
//!
//! - UI commands from [`SessionHandle`]
//! - finished duration resolutions (spawned per load, fed back by channel)
//! - device notifications (end of track, failures)
//! - the periodic position sampler
//!
//! Events are fanned out on a broadcast channel and the latest
//! [`PlaybackSnapshot`] is kept in a watch channel.

use crate::{
    device::{DeviceDriver, DeviceEvent},
    error::{PlaybackError, Result},
    events::PlaybackEvent,
    manager::{LoadRequest, PlaybackManager},
    types::{PlaybackConfig, PlaybackSnapshot, Track},
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Commands accepted by the session loop
#[derive(Debug, Clone)]
pub enum SessionCommand {
    SetQueue { tracks: Vec<Track>, start_index: usize },
    Next,
    Previous,
    Play,
    Pause,
    Stop,
    TogglePlayPause,
    Seek(f64),
    SeekToPercent(f64),
    Rewind,
    ToggleShuffle,
    Reshuffle,
    Shutdown,
}

/// Result of a spawned duration resolution
#[derive(Debug)]
struct LoadCompletion {
    generation: u64,
    result: Result<f64>,
}

/// Cloneable handle to a running session
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<SessionCommand>,
    events: broadcast::Sender<PlaybackEvent>,
    snapshot: watch::Receiver<PlaybackSnapshot>,
}

impl SessionHandle {
    /// Send a raw command
    pub fn send(&self, command: SessionCommand) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| PlaybackError::SessionClosed)
    }

    pub fn set_queue(&self, tracks: Vec<Track>, start_index: usize) -> Result<()> {
        self.send(SessionCommand::SetQueue {
            tracks,
            start_index,
        })
    }

    pub fn next(&self) -> Result<()> {
        self.send(SessionCommand::Next)
    }

    pub fn previous(&self) -> Result<()> {
        self.send(SessionCommand::Previous)
    }

    pub fn play(&self) -> Result<()> {
        self.send(SessionCommand::Play)
    }

    pub fn pause(&self) -> Result<()> {
        self.send(SessionCommand::Pause)
    }

    pub fn stop(&self) -> Result<()> {
        self.send(SessionCommand::Stop)
    }

    pub fn toggle_play_pause(&self) -> Result<()> {
        self.send(SessionCommand::TogglePlayPause)
    }

    pub fn seek(&self, seconds: f64) -> Result<()> {
        self.send(SessionCommand::Seek(seconds))
    }

    pub fn seek_to_percent(&self, fraction: f64) -> Result<()> {
        self.send(SessionCommand::SeekToPercent(fraction))
    }

    pub fn rewind(&self) -> Result<()> {
        self.send(SessionCommand::Rewind)
    }

    pub fn toggle_shuffle(&self) -> Result<()> {
        self.send(SessionCommand::ToggleShuffle)
    }

    pub fn reshuffle(&self) -> Result<()> {
        self.send(SessionCommand::Reshuffle)
    }

    /// Ask the session to tear down
    ///
    /// Await the `JoinHandle` from [`PlaybackSession::spawn`] to know when
    /// cleanup has finished.
    pub fn shutdown(&self) -> Result<()> {
        self.send(SessionCommand::Shutdown)
    }

    /// Subscribe to playback events
    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackEvent> {
        self.events.subscribe()
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Watch receiver for snapshot changes
    pub fn watch(&self) -> watch::Receiver<PlaybackSnapshot> {
        self.snapshot.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }
}

/// Session loop state; lives inside the spawned task
pub struct PlaybackSession {
    manager: PlaybackManager,
    driver: Arc<dyn DeviceDriver>,
    sample_interval: Duration,
    commands: mpsc::UnboundedReceiver<SessionCommand>,
    device_events: mpsc::UnboundedReceiver<DeviceEvent>,
    loads_tx: mpsc::UnboundedSender<LoadCompletion>,
    loads_rx: mpsc::UnboundedReceiver<LoadCompletion>,
    events: broadcast::Sender<PlaybackEvent>,
    snapshot: watch::Sender<PlaybackSnapshot>,
}

impl PlaybackSession {
    /// Spawn a session on the current tokio runtime
    pub fn spawn(
        config: PlaybackConfig,
        driver: Arc<dyn DeviceDriver>,
    ) -> (SessionHandle, JoinHandle<()>) {
        let manager = PlaybackManager::new(config, driver.clone());
        Self::spawn_with_manager(manager, driver)
    }

    /// Spawn a session around an existing manager
    pub fn spawn_with_manager(
        manager: PlaybackManager,
        driver: Arc<dyn DeviceDriver>,
    ) -> (SessionHandle, JoinHandle<()>) {
        let config = manager.config().clone();
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (loads_tx, loads_rx) = mpsc::unbounded_channel();
        let (events_tx, _) = broadcast::channel(config.event_capacity.max(1));
        let (snapshot_tx, snapshot_rx) = watch::channel(manager.snapshot());

        let session = Self {
            device_events: driver.subscribe(),
            manager,
            driver,
            sample_interval: config.sample_interval,
            commands: commands_rx,
            loads_tx,
            loads_rx,
            events: events_tx.clone(),
            snapshot: snapshot_tx,
        };

        let handle = SessionHandle {
            commands: commands_tx,
            events: events_tx,
            snapshot: snapshot_rx,
        };

        let task = tokio::spawn(session.run());
        (handle, task)
    }

    async fn run(mut self) {
        info!(interval_ms = self.sample_interval.as_millis() as u64, "Playback session started");

        let mut sampler = tokio::time::interval(self.sample_interval);
        sampler.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                command = self.commands.recv() => {
                    match command {
                        Some(SessionCommand::Shutdown) | None => break,
                        Some(command) => self.apply(command),
                    }
                }
                Some(event) = self.device_events.recv() => {
                    match event {
                        DeviceEvent::EndOfTrack => self.manager.on_end_of_track(),
                        DeviceEvent::Failure(reason) => self.manager.on_device_failure(&reason),
                    }
                }
                Some(done) = self.loads_rx.recv() => {
                    self.manager.complete_load(done.generation, done.result);
                }
                _ = sampler.tick() => {
                    self.manager.on_position_sample(self.driver.sample());
                }
            }

            self.dispatch_load();
            self.publish();
        }

        self.teardown();
    }

    fn apply(&mut self, command: SessionCommand) {
        debug!(?command, "Session command");
        match command {
            SessionCommand::SetQueue {
                tracks,
                start_index,
            } => self.manager.set_queue(tracks, start_index),
            SessionCommand::Next => self.manager.next(),
            SessionCommand::Previous => self.manager.previous(),
            SessionCommand::Play => self.manager.play(),
            SessionCommand::Pause => self.manager.pause(),
            SessionCommand::Stop => self.manager.stop(),
            SessionCommand::TogglePlayPause => self.manager.toggle_play_pause(),
            SessionCommand::Seek(seconds) => self.manager.seek(seconds),
            SessionCommand::SeekToPercent(fraction) => self.manager.seek_to_percent(fraction),
            SessionCommand::Rewind => self.manager.rewind(),
            SessionCommand::ToggleShuffle => self.manager.toggle_shuffle(),
            SessionCommand::Reshuffle => self.manager.reshuffle(),
            SessionCommand::Shutdown => {}
        }
    }

    /// Run the pending resolution off the loop and feed the result back
    fn dispatch_load(&mut self) {
        let Some(LoadRequest { generation, track }) = self.manager.take_load_request() else {
            return;
        };

        let driver = self.driver.clone();
        let done = self.loads_tx.clone();
        tokio::spawn(async move {
            let result = driver.load_source(&track.stream_url).await;
            // Receiver is gone once the session has shut down
            let _ = done.send(LoadCompletion { generation, result });
        });
    }

    fn publish(&mut self) {
        for event in self.manager.drain_events() {
            // No subscribers is fine
            let _ = self.events.send(event);
        }

        let next = self.manager.snapshot();
        self.snapshot.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }

    fn teardown(&mut self) {
        self.device_events.close();
        self.loads_rx.close();
        self.driver.release();
        info!("Playback session stopped");
    }
}
