//! Simulated output device
//!
//! Stands in for a platform media framework: it never produces sound, but
//! keeps a wall-clock playhead, reports a fixed length for every source and
//! announces end of track when the playhead runs out.

use async_trait::async_trait;
use melodify_playback::{DeviceDriver, DeviceEvent, PlaybackError, PositionSample, Result};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

#[derive(Debug, Default)]
struct Playhead {
    /// Length of the attached source; `None` while detached
    duration: Option<f64>,
    /// Position at the last play/pause/seek
    anchor: f64,
    /// Set while playing
    started_at: Option<Instant>,
    /// Bumped whenever a pending end-of-track timer becomes invalid
    epoch: u64,
    timer: Option<JoinHandle<()>>,
}

impl Playhead {
    fn position(&self) -> f64 {
        let elapsed = self
            .started_at
            .map_or(0.0, |started| started.elapsed().as_secs_f64());
        let position = self.anchor + elapsed;
        self.duration.map_or(position, |d| position.min(d))
    }

    fn cancel_timer(&mut self) {
        self.epoch += 1;
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

struct Shared {
    playhead: Mutex<Playhead>,
    listener: Mutex<Option<mpsc::UnboundedSender<DeviceEvent>>>,
}

impl Shared {
    fn playhead(&self) -> MutexGuard<'_, Playhead> {
        // Poisoning leaves the playhead consistent
        self.playhead
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn notify(&self, event: DeviceEvent) {
        let listener = self
            .listener
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(tx) = listener.as_ref() {
            // Receiver is gone once the session has shut down
            let _ = tx.send(event);
        }
    }
}

/// Device that plays silence in real time
#[derive(Clone)]
pub struct SimulatedDevice {
    shared: Arc<Shared>,
    track_secs: f64,
    load_latency: Duration,
}

impl SimulatedDevice {
    pub fn new(track_secs: f64, load_latency: Duration) -> Self {
        Self {
            shared: Arc::new(Shared {
                playhead: Mutex::new(Playhead::default()),
                listener: Mutex::new(None),
            }),
            track_secs,
            load_latency,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.shared.playhead().started_at.is_some()
    }

    /// Arm the end-of-track timer for the remaining playhead
    fn schedule_end(&self, playhead: &mut Playhead) {
        playhead.cancel_timer();
        let Some(duration) = playhead.duration else {
            return;
        };
        let remaining = (duration - playhead.position()).max(0.0);
        let epoch = playhead.epoch;
        let shared = Arc::clone(&self.shared);

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!("No tokio runtime, end of track will not be reported");
            return;
        };

        playhead.timer = Some(runtime.spawn(async move {
            tokio::time::sleep(Duration::from_secs_f64(remaining)).await;

            {
                let mut playhead = shared.playhead();
                if playhead.epoch != epoch {
                    return;
                }
                playhead.anchor = duration;
                playhead.started_at = None;
                playhead.timer = None;
            }

            debug!("Simulated source finished");
            shared.notify(DeviceEvent::EndOfTrack);
        }));
    }
}

#[async_trait]
impl DeviceDriver for SimulatedDevice {
    async fn load_source(&self, stream_url: &str) -> Result<f64> {
        {
            let mut playhead = self.shared.playhead();
            playhead.cancel_timer();
            let epoch = playhead.epoch;
            *playhead = Playhead {
                epoch,
                ..Playhead::default()
            };
        }

        if !(stream_url.starts_with("http://") || stream_url.starts_with("https://")) {
            return Err(PlaybackError::ResolutionFailure(format!(
                "unsupported stream: {}",
                stream_url
            )));
        }

        tokio::time::sleep(self.load_latency).await;

        let mut playhead = self.shared.playhead();
        playhead.duration = Some(self.track_secs);
        debug!(url = %stream_url, duration = self.track_secs, "Simulated source attached");
        Ok(self.track_secs)
    }

    fn play(&self) {
        let mut playhead = self.shared.playhead();
        if playhead.duration.is_none() || playhead.started_at.is_some() {
            return;
        }
        playhead.started_at = Some(Instant::now());
        self.schedule_end(&mut playhead);
    }

    fn pause(&self) {
        let mut playhead = self.shared.playhead();
        if playhead.started_at.is_none() {
            return;
        }
        playhead.anchor = playhead.position();
        playhead.started_at = None;
        playhead.cancel_timer();
    }

    fn seek(&self, seconds: f64) {
        let mut playhead = self.shared.playhead();
        let Some(duration) = playhead.duration else {
            return;
        };
        playhead.anchor = seconds.clamp(0.0, duration);
        if playhead.started_at.is_some() {
            playhead.started_at = Some(Instant::now());
            self.schedule_end(&mut playhead);
        }
    }

    fn sample(&self) -> Option<PositionSample> {
        let playhead = self.shared.playhead();
        playhead.duration.map(|duration| PositionSample {
            position: playhead.position(),
            duration,
        })
    }

    fn subscribe(&self) -> mpsc::UnboundedReceiver<DeviceEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        *self
            .shared
            .listener
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(tx);
        rx
    }

    fn release(&self) {
        self.shared.playhead().cancel_timer();
        self.shared
            .listener
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take();
    }
}
