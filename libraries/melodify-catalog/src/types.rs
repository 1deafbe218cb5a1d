//! Types for catalog requests and responses.

use melodify_playback::Track;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Public catalog endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.deezer.com";

/// Configuration for connecting to the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Base URL of the catalog API (e.g., "https://api.deezer.com")
    pub base_url: String,
    /// Whole-request timeout
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl CatalogConfig {
    /// Create a config pointing at a different catalog host.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// Envelope shared by the search and chart endpoints.
#[derive(Debug, Deserialize)]
pub struct TrackListResponse {
    pub data: Vec<CatalogTrack>,
}

/// Track as returned by the catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogTrack {
    pub id: i64,
    pub title: String,
    /// Preview length in seconds
    pub duration: u32,
    /// Preview stream URL
    pub preview: String,
    pub artist: CatalogArtist,
    pub album: CatalogAlbum,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogArtist {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogAlbum {
    pub id: i64,
    pub title: String,
    pub cover_medium: String,
}

impl From<CatalogTrack> for Track {
    fn from(track: CatalogTrack) -> Self {
        Self {
            id: track.id.to_string(),
            title: track.title,
            artist: track.artist.name,
            album: track.album.title,
            artwork_url: track.album.cover_medium,
            stream_url: track.preview,
            duration_secs: track.duration,
        }
    }
}
