//! Mock analytics backend for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::analytics::{AnalyticsBackend, AnalyticsError};
use crate::catalog::MovieSummary;
use crate::discovery::TrendingEntry;

/// In-memory `AnalyticsBackend` that records every search.
#[derive(Debug, Default)]
pub struct MockAnalytics {
    /// Recorded `(term, top result id)` pairs.
    searches: Arc<RwLock<Vec<(String, u64)>>>,
    /// Returned from `trending`, as configured.
    trending: Arc<RwLock<Vec<TrendingEntry>>>,
    /// When set, every operation fails.
    failing: Arc<RwLock<bool>>,
    trending_calls: Arc<RwLock<usize>>,
}

impl MockAnalytics {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_trending(&self, entries: Vec<TrendingEntry>) {
        *self.trending.write().await = entries;
    }

    /// Make every subsequent call fail until reset.
    pub async fn set_failing(&self, failing: bool) {
        *self.failing.write().await = failing;
    }

    pub async fn recorded_searches(&self) -> Vec<(String, u64)> {
        self.searches.read().await.clone()
    }

    pub async fn trending_calls(&self) -> usize {
        *self.trending_calls.read().await
    }
}

#[async_trait]
impl AnalyticsBackend for MockAnalytics {
    async fn record_search(
        &self,
        term: &str,
        top_result: &MovieSummary,
    ) -> Result<(), AnalyticsError> {
        if *self.failing.read().await {
            return Err(AnalyticsError::Unavailable("mock failure".to_string()));
        }
        self.searches
            .write()
            .await
            .push((term.to_string(), top_result.id));
        Ok(())
    }

    async fn trending(&self, _limit: usize) -> Result<Vec<TrendingEntry>, AnalyticsError> {
        *self.trending_calls.write().await += 1;
        if *self.failing.read().await {
            return Err(AnalyticsError::Unavailable("mock failure".to_string()));
        }
        Ok(self.trending.read().await.clone())
    }
}
