//! Shared helpers for playback integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use melodify_playback::{
    DeviceDriver, DeviceEvent, PlaybackError, PositionSample, Result, Track,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;

pub fn create_test_track(id: &str) -> Track {
    Track {
        id: id.to_string(),
        title: format!("Track {}", id),
        artist: "Test Artist".to_string(),
        album: "Test Album".to_string(),
        artwork_url: format!("https://img.example.com/{}.jpg", id),
        stream_url: format!("https://cdn.example.com/{}.mp3", id),
        duration_secs: 30,
    }
}

pub fn create_tracks(len: usize) -> Vec<Track> {
    (0..len).map(|i| create_test_track(&format!("t{}", i))).collect()
}

pub fn ids(tracks: &[Track]) -> Vec<String> {
    tracks.iter().map(|t| t.id.clone()).collect()
}

pub fn sorted_ids(tracks: &[Track]) -> Vec<String> {
    let mut ids = ids(tracks);
    ids.sort();
    ids
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Load(String),
    Play,
    Pause,
    Seek(f64),
}

/// How the mock resolves a given stream URL
#[derive(Debug, Clone)]
pub struct LoadBehavior {
    pub delay: Duration,
    pub result: std::result::Result<f64, String>,
}

/// Mock device with scripted resolutions and a controllable playhead
pub struct MockDevice {
    commands: Mutex<Vec<Command>>,
    behaviors: Mutex<HashMap<String, LoadBehavior>>,
    default_duration: f64,
    sample: Mutex<Option<PositionSample>>,
    listener: Mutex<Option<mpsc::UnboundedSender<DeviceEvent>>>,
    released: AtomicBool,
}

impl MockDevice {
    pub fn new(default_duration: f64) -> Self {
        Self {
            commands: Mutex::new(Vec::new()),
            behaviors: Mutex::new(HashMap::new()),
            default_duration,
            sample: Mutex::new(None),
            listener: Mutex::new(None),
            released: AtomicBool::new(false),
        }
    }

    /// Script the resolution of one track
    pub fn on_load(&self, track: &Track, delay: Duration, result: std::result::Result<f64, String>) {
        self.behaviors
            .lock()
            .unwrap()
            .insert(track.stream_url.clone(), LoadBehavior { delay, result });
    }

    pub fn set_position(&self, position: f64, duration: f64) {
        *self.sample.lock().unwrap() = Some(PositionSample { position, duration });
    }

    pub fn detach(&self) {
        *self.sample.lock().unwrap() = None;
    }

    /// Push a notification as the real device would
    pub fn emit(&self, event: DeviceEvent) -> bool {
        self.listener
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(|tx| tx.send(event).is_ok())
    }

    pub fn commands(&self) -> Vec<Command> {
        self.commands.lock().unwrap().clone()
    }

    pub fn transport_commands(&self) -> Vec<Command> {
        self.commands()
            .into_iter()
            .filter(|c| !matches!(c, Command::Load(_)))
            .collect()
    }

    pub fn clear(&self) {
        self.commands.lock().unwrap().clear();
    }

    pub fn was_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }

    fn record(&self, command: Command) {
        self.commands.lock().unwrap().push(command);
    }
}

#[async_trait]
impl DeviceDriver for MockDevice {
    async fn load_source(&self, stream_url: &str) -> Result<f64> {
        self.record(Command::Load(stream_url.to_string()));
        let behavior = self.behaviors.lock().unwrap().get(stream_url).cloned();

        match behavior {
            Some(behavior) => {
                tokio::time::sleep(behavior.delay).await;
                behavior.result.map_err(PlaybackError::ResolutionFailure)
            }
            None => Ok(self.default_duration),
        }
    }

    fn play(&self) {
        self.record(Command::Play);
    }

    fn pause(&self) {
        self.record(Command::Pause);
    }

    fn seek(&self, seconds: f64) {
        self.record(Command::Seek(seconds));
    }

    fn sample(&self) -> Option<PositionSample> {
        *self.sample.lock().unwrap()
    }

    fn subscribe(&self) -> mpsc::UnboundedReceiver<DeviceEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        *self.listener.lock().unwrap() = Some(tx);
        rx
    }

    fn release(&self) {
        self.listener.lock().unwrap().take();
        self.released.store(true, Ordering::SeqCst);
    }
}
