//! Catalog HTTP client.

use crate::error::{CatalogError, Result};
use crate::types::{CatalogConfig, TrackListResponse};
use melodify_playback::Track;
use reqwest::Client;
use tracing::{debug, info};
use url::Url;

/// Client for the track catalog.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: Client,
    base_url: Url,
}

impl CatalogClient {
    /// Create a new client with the given configuration.
    pub fn new(config: CatalogConfig) -> Result<Self> {
        if config.base_url.trim().is_empty() {
            return Err(CatalogError::InvalidUrl("URL cannot be empty".into()));
        }

        let base = config.base_url.trim_end_matches('/');
        if !base.starts_with("http://") && !base.starts_with("https://") {
            return Err(CatalogError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        // Trailing slash so that `join` appends instead of replacing the last segment
        let base_url = Url::parse(&format!("{}/", base))
            .map_err(|e| CatalogError::InvalidUrl(e.to_string()))?;

        let http = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(format!("Melodify/{} (CLI)", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, base_url })
    }

    /// Base URL requests are resolved against.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Search tracks by free text.
    ///
    /// A blank query returns the current chart instead.
    pub async fn search_tracks(&self, query: &str) -> Result<Vec<Track>> {
        let query = query.trim();
        if query.is_empty() {
            debug!("Empty search query, falling back to top tracks");
            return self.top_tracks().await;
        }

        let mut url = self.endpoint("search")?;
        url.query_pairs_mut().append_pair("q", query);

        let tracks = self.fetch_tracks(url).await?;
        info!(query = %query, results = tracks.len(), "Search completed");
        Ok(tracks)
    }

    /// Current top tracks.
    pub async fn top_tracks(&self) -> Result<Vec<Track>> {
        let url = self.endpoint("chart/0/tracks")?;
        let tracks = self.fetch_tracks(url).await?;
        info!(results = tracks.len(), "Fetched top tracks");
        Ok(tracks)
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| CatalogError::InvalidUrl(e.to_string()))
    }

    async fn fetch_tracks(&self, url: Url) -> Result<Vec<Track>> {
        debug!(url = %url, "Fetching track list");

        let response = self.http.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(CatalogError::ServerError {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let list: TrackListResponse = serde_json::from_slice(&body).map_err(|e| {
            CatalogError::Decode(format!("Failed to parse track list: {}", e))
        })?;

        Ok(list.data.into_iter().map(Track::from).collect())
    }
}
