//! Search term -> upstream request.

use rand::Rng;
use tracing::debug;

use super::DiscoveryError;
use crate::catalog::{DiscoveryRequest, SortCriterion, UpstreamCredential};

/// Highest page drawn for discovery mode.
pub const MAX_DISCOVER_PAGE: u32 = 5;

/// Turns a stabilized search term into a `DiscoveryRequest`.
///
/// An empty term browses: each call draws a sort order and a page
/// independently and uniformly, so repeated empty searches show different
/// slices of the catalog.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    credential: Option<UpstreamCredential>,
}

impl QueryBuilder {
    pub fn new(credential: Option<UpstreamCredential>) -> Self {
        Self { credential }
    }

    pub fn is_configured(&self) -> bool {
        self.credential.is_some()
    }

    /// Build with the thread-local RNG.
    pub fn build(&self, term: &str) -> Result<DiscoveryRequest, DiscoveryError> {
        self.build_with_rng(term, &mut rand::thread_rng())
    }

    pub fn build_with_rng<R: Rng + ?Sized>(
        &self,
        term: &str,
        rng: &mut R,
    ) -> Result<DiscoveryRequest, DiscoveryError> {
        self.ensure_configured()?;

        let term = term.trim();
        let request = if term.is_empty() {
            random_discover(rng)
        } else {
            DiscoveryRequest::Search {
                query: term.to_string(),
            }
        };

        debug!(mode = request.label(), ?request, "Built discovery request");
        Ok(request)
    }

    /// Search-mode request for `text`, whatever its shape.
    pub fn search(&self, text: &str) -> Result<DiscoveryRequest, DiscoveryError> {
        self.ensure_configured()?;
        Ok(DiscoveryRequest::Search {
            query: text.trim().to_string(),
        })
    }

    fn ensure_configured(&self) -> Result<(), DiscoveryError> {
        if self.credential.is_none() {
            return Err(DiscoveryError::Configuration);
        }
        Ok(())
    }
}

/// Uniform sort criterion and page in `1..=MAX_DISCOVER_PAGE`.
pub fn random_discover<R: Rng + ?Sized>(rng: &mut R) -> DiscoveryRequest {
    let sort_by = SortCriterion::ALL[rng.gen_range(0..SortCriterion::ALL.len())];
    let page = rng.gen_range(1..=MAX_DISCOVER_PAGE);
    DiscoveryRequest::Discover { sort_by, page }
}
