//! Identifier resolution and cancelable detail loads.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex_lite::Regex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{DiscoveryError, QueryBuilder, ResultReconciler};
use crate::catalog::{MovieCatalog, MovieDetail, UpstreamCredential};
use crate::metrics::DETAIL_LOADS;

static NUMERIC_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").unwrap());

/// A state transition produced by a detail load.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailUpdate {
    Loading,
    /// Detail with its `videos` filled (possibly empty).
    Loaded(MovieDetail),
    Failed(DiscoveryError),
}

/// How a load sequence ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    Failed,
    /// Superseded or torn down; the final update was discarded.
    Cancelled,
}

impl LoadOutcome {
    fn as_str(&self) -> &'static str {
        match self {
            LoadOutcome::Applied => "applied",
            LoadOutcome::Failed => "failed",
            LoadOutcome::Cancelled => "cancelled",
        }
    }
}

/// Receives detail updates.
///
/// `apply` must check `token` and mutate under the same lock, returning
/// `false` (and changing nothing) once the token is cancelled.
pub trait DetailSink: Send + Sync {
    fn apply(&self, token: &CancellationToken, update: DetailUpdate) -> bool;
}

/// Resolves numeric ids or titles to a full detail record.
#[derive(Clone)]
pub struct DetailResolver {
    catalog: Arc<dyn MovieCatalog>,
    query_builder: QueryBuilder,
}

impl DetailResolver {
    pub fn new(catalog: Arc<dyn MovieCatalog>, credential: Option<UpstreamCredential>) -> Self {
        Self {
            catalog,
            query_builder: QueryBuilder::new(credential),
        }
    }

    /// Numeric identifiers are used directly; anything else goes through
    /// search and takes the first hit. Never treats free text as an id.
    pub async fn resolve_id(&self, identifier: &str) -> Result<u64, DiscoveryError> {
        if !self.query_builder.is_configured() {
            return Err(DiscoveryError::Configuration);
        }

        let identifier = identifier.trim();
        if NUMERIC_ID.is_match(identifier) {
            return identifier
                .parse::<u64>()
                .map_err(|_| DiscoveryError::NotFound(identifier.to_string()));
        }
        if identifier.is_empty() {
            return Err(DiscoveryError::NotFound(String::new()));
        }

        let request = self.query_builder.search(identifier)?;
        let results = ResultReconciler::settle(self.catalog.execute(&request).await)
            .map_err(|e| {
                debug!(identifier = %identifier, "Title search failed: {}", e);
                DiscoveryError::NotFound(identifier.to_string())
            })?;

        results
            .first()
            .map(|movie| movie.id)
            .ok_or_else(|| DiscoveryError::NotFound(identifier.to_string()))
    }

    /// Detail and videos, fetched concurrently. A videos failure leaves the list empty.
    pub async fn fetch(&self, id: u64) -> Result<MovieDetail, DiscoveryError> {
        let (detail, videos) =
            tokio::join!(self.catalog.get_movie(id), self.catalog.get_videos(id));

        let mut detail = detail.map_err(|e| DiscoveryError::DetailFetch(e.to_string()))?;
        detail.videos = match videos {
            Ok(videos) => videos,
            Err(e) => {
                debug!(id = id, "Videos not available: {}", e);
                Vec::new()
            }
        };
        Ok(detail)
    }

    pub async fn resolve(&self, identifier: &str) -> Result<MovieDetail, DiscoveryError> {
        let id = self.resolve_id(identifier).await?;
        self.fetch(id).await
    }

    /// Full load sequence against `sink`, guarded by `token`.
    ///
    /// In-flight requests are not aborted on cancellation; their results
    /// are dropped by the sink.
    pub async fn load(
        &self,
        identifier: &str,
        token: &CancellationToken,
        sink: &dyn DetailSink,
    ) -> LoadOutcome {
        let outcome = if !sink.apply(token, DetailUpdate::Loading) {
            LoadOutcome::Cancelled
        } else {
            let (update, outcome) = match self.resolve(identifier).await {
                Ok(detail) => (DetailUpdate::Loaded(detail), LoadOutcome::Applied),
                Err(e) => {
                    warn!(identifier = %identifier, "Could not load movie details: {}", e);
                    (DetailUpdate::Failed(e), LoadOutcome::Failed)
                }
            };

            if sink.apply(token, update) {
                outcome
            } else {
                LoadOutcome::Cancelled
            }
        };

        if outcome != LoadOutcome::Failed {
            info!(identifier = %identifier, outcome = outcome.as_str(), "Detail load finished");
        }
        DETAIL_LOADS.with_label_values(&[outcome.as_str()]).inc();
        outcome
    }
}
