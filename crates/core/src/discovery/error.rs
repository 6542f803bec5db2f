use thiserror::Error;

use crate::catalog::CatalogError;

/// Shown when no upstream credential is configured.
pub const CONFIGURATION_MESSAGE: &str =
    "TMDB API key is not configured. Please check your configuration.";

/// Shown for transport and HTTP failures during search.
pub const SEARCH_FAILED_MESSAGE: &str = "Error fetching movies. Please try again later.";

/// Shown for every detail failure.
pub const DETAIL_FAILED_MESSAGE: &str = "Could not load movie details.";

/// Fallback when the upstream reports a failure without a message.
pub const UPSTREAM_FALLBACK_MESSAGE: &str = "Failed to fetch movies";

/// Errors surfaced by the discovery layer.
///
/// Carries strings rather than source errors so view state can hold and
/// clone it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscoveryError {
    /// No upstream credential.
    #[error("TMDB API key is not configured")]
    Configuration,

    /// Transport failure or non-2xx response.
    #[error("Fetch failed (status {status:?}): {message}")]
    Fetch {
        status: Option<u16>,
        message: String,
    },

    /// 2xx response whose body reports a failure.
    #[error("Upstream reported failure: {message}")]
    Upstream { message: String },

    /// Identifier could not be resolved to a catalog id.
    #[error("No movie found for '{0}'")]
    NotFound(String),

    /// Detail record could not be fetched.
    #[error("Failed to load movie details: {0}")]
    DetailFetch(String),
}

impl DiscoveryError {
    /// Message for the view layer.
    pub fn user_message(&self) -> String {
        match self {
            DiscoveryError::Configuration => CONFIGURATION_MESSAGE.to_string(),
            DiscoveryError::Fetch { .. } => SEARCH_FAILED_MESSAGE.to_string(),
            DiscoveryError::Upstream { message } => message.clone(),
            DiscoveryError::NotFound(_) | DiscoveryError::DetailFetch(_) => {
                DETAIL_FAILED_MESSAGE.to_string()
            }
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, DiscoveryError::Configuration)
    }
}

impl From<CatalogError> for DiscoveryError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotConfigured(_) => DiscoveryError::Configuration,
            other => DiscoveryError::Fetch {
                status: other.status(),
                message: other.to_string(),
            },
        }
    }
}
