//! Error types raised by the Jellyfin client.

use reqwest::StatusCode;
use thiserror::Error;

/// Convenient result alias returning [`JellyfinError`] failures.
pub type JellyfinResult<T> = Result<T, JellyfinError>;

/// Failures that can occur while talking to Jellyfin.
#[derive(Debug, Error)]
pub enum JellyfinError {
    /// Base URL or API key is missing; no request was attempted.
    #[error("Jellyfin not configured. Set JELLYFIN_BASE_URL and JELLYFIN_API_KEY.")]
    NotConfigured,
    /// The configured base URL cannot be used to build request URLs.
    #[error("invalid Jellyfin base URL `{base_url}`")]
    InvalidBaseUrl { base_url: String },
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build Jellyfin client")]
    ClientBuilder {
        #[source]
        source: reqwest::Error,
    },
    /// The request could not be sent or the response body could not be read.
    #[error("failed to reach Jellyfin at `{path}`: {source}")]
    RequestSend {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// Jellyfin answered with a non-success status.
    #[error("Jellyfin request failed: {status} {body}")]
    Upstream {
        path: String,
        status: StatusCode,
        body: String,
    },
    /// The response body did not match the expected shape.
    #[error("failed to decode Jellyfin response for `{path}`: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
