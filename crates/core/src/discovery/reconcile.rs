//! Raw upstream responses -> result lists, and the search pipeline built on them.

use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::Value;
use tracing::{debug, warn};

use super::{DiscoveryError, QueryBuilder, UPSTREAM_FALLBACK_MESSAGE};
use crate::analytics::AnalyticsReporter;
use crate::catalog::{CatalogError, CatalogResponse, DiscoveryRequest, MovieCatalog, MovieSummary};
use crate::metrics::SEARCH_RUNS;

/// Result of one search cycle. `error` set means `results` is empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOutcome {
    pub results: Vec<MovieSummary>,
    pub error: Option<DiscoveryError>,
}

impl SearchOutcome {
    pub fn loaded(results: Vec<MovieSummary>) -> Self {
        Self {
            results,
            error: None,
        }
    }

    pub fn failed(error: DiscoveryError) -> Self {
        Self {
            results: Vec::new(),
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Classifies upstream responses and shuffles successful result lists.
pub struct ResultReconciler;

impl ResultReconciler {
    /// Extract the result list from a response, or classify its failure.
    pub fn parse(response: &CatalogResponse) -> Result<Vec<MovieSummary>, DiscoveryError> {
        let body = &response.body;

        if !response.is_success() {
            let message = body
                .get("status_message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {}", response.status));
            return Err(DiscoveryError::Fetch {
                status: Some(response.status),
                message,
            });
        }

        if body.get("success") == Some(&Value::Bool(false)) {
            return Err(DiscoveryError::Upstream {
                message: upstream_message(body, "status_message"),
            });
        }

        if body.get("Response").and_then(Value::as_str) == Some("False") {
            return Err(DiscoveryError::Upstream {
                message: upstream_message(body, "Error"),
            });
        }

        match body.get("results") {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(results) => serde_json::from_value(results.clone()).map_err(|e| {
                DiscoveryError::Fetch {
                    status: Some(response.status),
                    message: format!("Malformed results: {}", e),
                }
            }),
        }
    }

    /// Parse an executed request, mapping transport errors along the way.
    pub fn settle(
        result: Result<CatalogResponse, CatalogError>,
    ) -> Result<Vec<MovieSummary>, DiscoveryError> {
        let response = result.map_err(DiscoveryError::from)?;
        Self::parse(&response)
    }

    pub fn reconcile(result: Result<CatalogResponse, CatalogError>) -> SearchOutcome {
        Self::reconcile_with_rng(result, &mut rand::thread_rng())
    }

    pub fn reconcile_with_rng<R: Rng + ?Sized>(
        result: Result<CatalogResponse, CatalogError>,
        rng: &mut R,
    ) -> SearchOutcome {
        match Self::settle(result) {
            Ok(results) => SearchOutcome::loaded(Self::shuffle_with_rng(results, rng)),
            Err(e) => SearchOutcome::failed(e),
        }
    }

    /// Uniform permutation for presentation.
    pub fn shuffle(results: Vec<MovieSummary>) -> Vec<MovieSummary> {
        Self::shuffle_with_rng(results, &mut rand::thread_rng())
    }

    pub fn shuffle_with_rng<R: Rng + ?Sized>(
        mut results: Vec<MovieSummary>,
        rng: &mut R,
    ) -> Vec<MovieSummary> {
        results.shuffle(rng);
        results
    }
}

fn upstream_message(body: &Value, field: &str) -> String {
    body.get(field)
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .unwrap_or(UPSTREAM_FALLBACK_MESSAGE)
        .to_string()
}

/// Term -> request -> response -> outcome, plus the analytics report.
#[derive(Clone)]
pub struct SearchPipeline {
    query_builder: QueryBuilder,
    catalog: Arc<dyn MovieCatalog>,
    reporter: AnalyticsReporter,
}

impl SearchPipeline {
    pub fn new(
        query_builder: QueryBuilder,
        catalog: Arc<dyn MovieCatalog>,
        reporter: AnalyticsReporter,
    ) -> Self {
        Self {
            query_builder,
            catalog,
            reporter,
        }
    }

    /// Run one cycle for a stabilized term. Never fails; errors land in the outcome.
    pub async fn run(&self, term: &str) -> SearchOutcome {
        let request = match self.query_builder.build(term) {
            Ok(request) => request,
            Err(e) => {
                warn!("Search not attempted: {}", e);
                SEARCH_RUNS.with_label_values(&["none", "error"]).inc();
                return SearchOutcome::failed(e);
            }
        };

        self.execute(&request).await
    }

    /// Execute an already built request.
    pub async fn execute(&self, request: &DiscoveryRequest) -> SearchOutcome {
        let mode = request.label();
        let results = match ResultReconciler::settle(self.catalog.execute(request).await) {
            Ok(results) => results,
            Err(e) => {
                warn!(mode = mode, "Error fetching movies: {}", e);
                SEARCH_RUNS.with_label_values(&[mode, "error"]).inc();
                return SearchOutcome::failed(e);
            }
        };

        // Report the upstream's own top hit, before shuffling.
        if let (Some(term), Some(top)) = (request.query_text(), results.first()) {
            self.reporter.report_search(term, top);
        }

        debug!(mode = mode, count = results.len(), "Fetched movies");
        SEARCH_RUNS.with_label_values(&[mode, "ok"]).inc();
        SearchOutcome::loaded(ResultReconciler::shuffle(results))
    }
}
