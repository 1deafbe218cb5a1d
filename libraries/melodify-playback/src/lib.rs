//! Melodify - Playback Session Controller
//!
//! Platform-agnostic playback control for Melodify.
//!
//! This crate provides:
//! - Circular play queue (source order kept for unshuffle)
//! - Smart shuffle (recently played tracks kept out of the rotation)
//! - Transport state machine (loading, playing, paused, stopped, error)
//! - Seek, rewind and restart-on-previous
//! - Position/progress observation via events and snapshots
//! - An async session runtime owning all of the above
//!
//! # Architecture
//!
//! `melodify-playback` never decodes audio. The platform supplies a
//! [`DeviceDriver`] (native media framework, renderer, simulator) and the
//! controller drives it with transport commands. The controller itself is
//! synchronous and single-owner; [`PlaybackSession`] runs it on a tokio
//! task and bridges the asynchronous boundaries (duration resolution,
//! device notifications, position sampling) back onto that task.
//!
//! # Example: Driving the manager directly
//!
//! ```rust,ignore
//! use melodify_playback::{PlaybackConfig, PlaybackManager};
//! use std::sync::Arc;
//!
//! let mut manager = PlaybackManager::new(PlaybackConfig::default(), Arc::new(device));
//! manager.set_queue(tracks, 0);
//!
//! // The owner runs the resolution against the device
//! if let Some(request) = manager.take_load_request() {
//!     let duration = device.load_source(&request.track.stream_url).await;
//!     manager.complete_load(request.generation, duration);
//! }
//! ```
//!
//! # Example: Session runtime
//!
//! ```rust,ignore
//! use melodify_playback::{PlaybackConfig, PlaybackSession};
//!
//! let (handle, task) = PlaybackSession::spawn(PlaybackConfig::default(), driver);
//! let mut events = handle.subscribe();
//!
//! handle.set_queue(tracks, 0)?;
//! handle.toggle_shuffle()?;
//!
//! while let Ok(event) = events.recv().await {
//!     println!("{:?}", event);
//! }
//!
//! handle.shutdown()?;
//! task.await?;
//! ```

mod device;
mod error;
mod events;
mod history;
mod manager;
mod queue;
mod session;
mod shuffle;
mod transport;
pub mod types;

// Public exports
pub use device::{DeviceDriver, DeviceEvent, PositionSample};
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use history::RecentlyPlayed;
pub use manager::{LoadRequest, PlaybackManager};
pub use queue::Queue;
pub use session::{PlaybackSession, SessionCommand, SessionHandle};
pub use shuffle::{shuffle_random, smart_shuffle, ShuffleOutcome, ShufflePolicy};
pub use types::{format_time, PlaybackConfig, PlaybackSnapshot, PlaybackState, Track};
