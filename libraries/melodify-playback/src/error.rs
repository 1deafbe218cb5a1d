//! Error types for playback management

use thiserror::Error;

/// Playback errors
///
/// The first three kinds all surface to the UI as `PlaybackState::Error`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// Stream reference could not be parsed
    #[error("Invalid track URL")]
    InvalidSource,

    /// Device could not resolve the track's duration
    #[error("Failed to load track duration: {0}")]
    ResolutionFailure(String),

    /// Device reported an I/O or decode failure after load
    #[error("Playback failed: {0}")]
    DriverFailure(String),

    /// Index out of bounds
    #[error("Index out of bounds: {0}")]
    IndexOutOfBounds(usize),

    /// Session runtime has shut down
    #[error("Playback session is closed")]
    SessionClosed,
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
