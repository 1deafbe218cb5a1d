//! Melodify command-line player
//!
//! Wires the catalog client to a playback session running against a
//! simulated output device.

pub mod config;
pub mod device;
pub mod player;

pub use config::AppConfig;
pub use device::SimulatedDevice;
pub use player::{play_queue, print_tracks, PlayOptions};
