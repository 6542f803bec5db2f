//! Optional analytics backend: search counts and the trending list they feed.
//!
//! Everything here is best-effort. `AnalyticsError` never converts into
//! `DiscoveryError`; no analytics failure reaches a search or trending caller.

mod sqlite;

pub use sqlite::SqliteAnalytics;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::catalog::MovieSummary;
use crate::discovery::TrendingEntry;
use crate::metrics::ANALYTICS_FAILURES;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Analytics backend unavailable: {0}")]
    Unavailable(String),
}

/// Storage for search counts.
#[async_trait]
pub trait AnalyticsBackend: Send + Sync {
    /// Count one search for `term`, remembering its top result.
    async fn record_search(
        &self,
        term: &str,
        top_result: &MovieSummary,
    ) -> Result<(), AnalyticsError>;

    /// Most-searched entries, highest count first.
    async fn trending(&self, limit: usize) -> Result<Vec<TrendingEntry>, AnalyticsError>;
}

/// Backend used when analytics is not configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAnalytics;

#[async_trait]
impl AnalyticsBackend for NoopAnalytics {
    async fn record_search(&self, _term: &str, _top: &MovieSummary) -> Result<(), AnalyticsError> {
        Ok(())
    }

    async fn trending(&self, _limit: usize) -> Result<Vec<TrendingEntry>, AnalyticsError> {
        Ok(Vec::new())
    }
}

/// Fire-and-forget dispatch of search reports.
#[derive(Clone)]
pub struct AnalyticsReporter {
    backend: Arc<dyn AnalyticsBackend>,
}

impl AnalyticsReporter {
    pub fn new(backend: Arc<dyn AnalyticsBackend>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &Arc<dyn AnalyticsBackend> {
        &self.backend
    }

    /// Report a search in the background.
    ///
    /// The returned handle may be dropped; failures are logged and counted,
    /// never returned.
    pub fn report_search(&self, term: &str, top_result: &MovieSummary) -> JoinHandle<()> {
        let backend = Arc::clone(&self.backend);
        let term = term.to_string();
        let top_result = top_result.clone();

        tokio::spawn(async move {
            if let Err(e) = backend.record_search(&term, &top_result).await {
                ANALYTICS_FAILURES
                    .with_label_values(&["record_search"])
                    .inc();
                debug!("Analytics not available, skipping search count update: {}", e);
            }
        })
    }
}
