//! Melodify Catalog Client
//!
//! HTTP client for the public track catalog that feeds the player.
//!
//! # Features
//!
//! - **Search**: free-text track search
//! - **Charts**: current top tracks, used when there is nothing to search for
//!
//! Results come back as [`melodify_playback::Track`] values, ready to be
//! handed to a playback session.
//!
//! # Example
//!
//! ```ignore
//! use melodify_catalog::{CatalogClient, CatalogConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CatalogClient::new(CatalogConfig::default())?;
//!
//!     let tracks = client.search_tracks("daft punk").await?;
//!     println!("Found {} tracks", tracks.len());
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::CatalogClient;
pub use error::{CatalogError, Result};
pub use types::{
    CatalogAlbum, CatalogArtist, CatalogConfig, CatalogTrack, TrackListResponse, DEFAULT_BASE_URL,
};
