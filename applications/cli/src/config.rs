/// CLI configuration
use melodify_catalog::{CatalogConfig, DEFAULT_BASE_URL};
use melodify_playback::PlaybackConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "melodify.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub catalog: CatalogSettings,

    #[serde(default)]
    pub playback: PlaybackSettings,

    #[serde(default)]
    pub device: DeviceSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackSettings {
    #[serde(default = "default_sample_interval_ms")]
    pub sample_interval_ms: u64,

    #[serde(default = "default_restart_threshold_secs")]
    pub restart_threshold_secs: f64,

    #[serde(default = "default_rewind_step_secs")]
    pub rewind_step_secs: f64,

    #[serde(default = "default_recent_cap")]
    pub recent_cap: usize,

    #[serde(default)]
    pub shuffle: bool,
}

/// Simulated output device
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeviceSettings {
    /// Playback length reported for every source, in seconds
    #[serde(default = "default_track_secs")]
    pub track_secs: f64,

    #[serde(default = "default_load_latency_ms")]
    pub load_latency_ms: u64,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// `path` defaults to `melodify.toml`; a missing file is not an error.
    /// Environment variables prefixed with `MELODIFY_` override the file,
    /// with `__` between section and key (`MELODIFY_CATALOG__BASE_URL`).
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let path = path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), Path::to_path_buf);
        let file = path
            .exists()
            .then(|| config::File::from(path.as_path()));

        Self::from_sources(file, Self::environment())
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix("MELODIFY")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    /// Build from an optional file-like source plus environment overrides
    pub fn from_sources<S>(
        file: Option<S>,
        environment: config::Environment,
    ) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let mut settings = config::Config::builder();
        if let Some(file) = file {
            settings = settings.add_source(file);
        }
        settings = settings.add_source(environment);

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.catalog.base_url.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "catalog base URL is required (set MELODIFY_CATALOG__BASE_URL)".to_string(),
            ));
        }

        if self.playback.sample_interval_ms == 0 {
            return Err(config::ConfigError::Message(
                "playback sample interval must be positive".to_string(),
            ));
        }

        if self.device.track_secs.is_nan() || self.device.track_secs <= 0.0 {
            return Err(config::ConfigError::Message(format!(
                "device track length must be positive, got {}",
                self.device.track_secs
            )));
        }

        Ok(())
    }

    pub fn catalog_config(&self) -> CatalogConfig {
        CatalogConfig {
            base_url: self.catalog.base_url.clone(),
            request_timeout: Duration::from_secs(self.catalog.timeout_secs),
            connect_timeout: Duration::from_secs(self.catalog.connect_timeout_secs),
        }
    }

    pub fn playback_config(&self) -> PlaybackConfig {
        PlaybackConfig {
            sample_interval: Duration::from_millis(self.playback.sample_interval_ms),
            restart_threshold_secs: self.playback.restart_threshold_secs,
            rewind_step_secs: self.playback.rewind_step_secs,
            recent_cap: self.playback.recent_cap,
            shuffle: self.playback.shuffle,
            ..Default::default()
        }
    }
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            sample_interval_ms: default_sample_interval_ms(),
            restart_threshold_secs: default_restart_threshold_secs(),
            rewind_step_secs: default_rewind_step_secs(),
            recent_cap: default_recent_cap(),
            shuffle: false,
        }
    }
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            track_secs: default_track_secs(),
            load_latency_ms: default_load_latency_ms(),
        }
    }
}

// Default values
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_sample_interval_ms() -> u64 {
    100
}

fn default_restart_threshold_secs() -> f64 {
    3.0
}

fn default_rewind_step_secs() -> f64 {
    10.0
}

fn default_recent_cap() -> usize {
    5
}

fn default_track_secs() -> f64 {
    30.0
}

fn default_load_latency_ms() -> u64 {
    150
}
