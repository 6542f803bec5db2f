//! Upstream movie catalog (TMDB) integration.
//!
//! The `MovieCatalog` trait is the seam between the discovery layer and the
//! network; `TmdbClient` is the real implementation and
//! `testing::MockCatalog` the test double.

mod rate_limit;
mod request;
mod tmdb;
mod types;

pub use rate_limit::{RequestPacer, TokenBucket};
pub use request::{DiscoveryRequest, SortCriterion};
pub use tmdb::TmdbClient;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when talking to the upstream catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded, please wait before retrying")]
    RateLimitExceeded,

    /// Resource not found (404).
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not configured (missing or rejected API key).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

impl CatalogError {
    /// HTTP status carried by this error, if the upstream answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            CatalogError::HttpError(e) => e.status().map(|s| s.as_u16()),
            CatalogError::RateLimitExceeded => Some(429),
            CatalogError::NotFound(_) => Some(404),
            CatalogError::ApiError { status, .. } => Some(*status),
            CatalogError::ParseError(_) | CatalogError::NotConfigured(_) => None,
        }
    }
}

/// Read-only access to the upstream movie catalog.
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Execute a search or discover request, returning status and body as-is.
    ///
    /// `Err` means no usable response arrived (transport failure, missing
    /// credential, undecodable 2xx body).
    async fn execute(&self, request: &DiscoveryRequest) -> Result<CatalogResponse, CatalogError>;

    /// Get the full record for a catalog id (`videos` left empty).
    async fn get_movie(&self, id: u64) -> Result<MovieDetail, CatalogError>;

    /// Get the video list for a catalog id.
    async fn get_videos(&self, id: u64) -> Result<Vec<VideoRecord>, CatalogError>;

    /// Get the upstream's daily trending movies.
    async fn trending_today(&self) -> Result<Vec<MovieSummary>, CatalogError>;
}
