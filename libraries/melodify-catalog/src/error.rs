//! Error types for the catalog client.

use thiserror::Error;

/// Errors that can occur when talking to the catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Base URL or request URL could not be built
    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(String),

    /// Transport-level failure (DNS, connect, timeout, TLS)
    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Response body did not match the expected shape
    #[error("Failed to parse response: {0}")]
    Decode(String),

    /// Non-2xx response
    #[error("Server error ({status})")]
    ServerError { status: u16 },
}

impl CatalogError {
    /// Text suitable for showing to the listener
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidUrl(_) => "Invalid request URL.".to_string(),
            Self::Network(_) => {
                "Network error. Please check your connection and try again.".to_string()
            }
            Self::Decode(_) => "Error processing data from the server.".to_string(),
            Self::ServerError { status } => {
                format!("Server error (code: {}). Please try again later.", status)
            }
        }
    }
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
