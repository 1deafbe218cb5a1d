//! Playback device abstraction
//!
//! The controller never decodes audio. It drives an opaque device (native
//! media framework, network renderer, simulator) through this trait.

use crate::error::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Notifications pushed by the device
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceEvent {
    /// The loaded source finished naturally (not on stop or seek)
    EndOfTrack,

    /// I/O or decode failure after the source was loaded
    Failure(String),
}

/// Position read by the periodic sampler
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionSample {
    /// Elapsed seconds
    pub position: f64,

    /// Source duration in seconds, 0 when unknown
    pub duration: f64,
}

/// Platform playback device
///
/// Transport commands are fire-and-forget. Only source resolution is
/// asynchronous.
#[async_trait]
pub trait DeviceDriver: Send + Sync {
    /// Attach a source and resolve its duration in seconds
    ///
    /// Failures should be reported as `PlaybackError::ResolutionFailure`.
    async fn load_source(&self, stream_url: &str) -> Result<f64>;

    /// Start or resume output
    fn play(&self);

    /// Pause output
    fn pause(&self);

    /// Move the playhead
    fn seek(&self, seconds: f64);

    /// Current playhead, or `None` when no source is attached
    fn sample(&self) -> Option<PositionSample>;

    /// Register the listener for end-of-track and failure notifications
    fn subscribe(&self) -> mpsc::UnboundedReceiver<DeviceEvent>;

    /// Drop listeners and any attached source on session teardown
    fn release(&self) {}
}
