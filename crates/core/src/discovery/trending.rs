//! Trending shortlist: analytics first, upstream daily trending as fallback.

use std::sync::Arc;

use tracing::{debug, warn};

use super::TrendingEntry;
use crate::analytics::AnalyticsBackend;
use crate::catalog::{MovieCatalog, UpstreamCredential};
use crate::metrics::{ANALYTICS_FAILURES, TRENDING_SOURCE};
use crate::presentation::PosterUrls;

#[derive(Clone)]
pub struct TrendingAggregator {
    analytics: Arc<dyn AnalyticsBackend>,
    catalog: Arc<dyn MovieCatalog>,
    credential: Option<UpstreamCredential>,
    posters: PosterUrls,
    limit: usize,
}

impl TrendingAggregator {
    pub fn new(
        analytics: Arc<dyn AnalyticsBackend>,
        catalog: Arc<dyn MovieCatalog>,
        credential: Option<UpstreamCredential>,
        posters: PosterUrls,
        limit: usize,
    ) -> Self {
        Self {
            analytics,
            catalog,
            credential,
            posters,
            limit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// At most `limit` entries. Never fails; an empty list means no source had any.
    pub async fn load(&self) -> Vec<TrendingEntry> {
        match self.analytics.trending(self.limit).await {
            Ok(entries) if !entries.is_empty() => {
                TRENDING_SOURCE.with_label_values(&["analytics"]).inc();
                return entries.into_iter().take(self.limit).collect();
            }
            Ok(_) => {}
            Err(e) => {
                ANALYTICS_FAILURES.with_label_values(&["trending"]).inc();
                debug!("Analytics trending not available: {}", e);
            }
        }

        if self.credential.is_none() {
            TRENDING_SOURCE.with_label_values(&["none"]).inc();
            return Vec::new();
        }

        match self.catalog.trending_today().await {
            Ok(movies) => {
                TRENDING_SOURCE.with_label_values(&["upstream"]).inc();
                movies
                    .iter()
                    .take(self.limit)
                    .map(|movie| TrendingEntry::from_upstream(movie, &self.posters))
                    .collect()
            }
            Err(e) => {
                warn!("Error fetching trending movies: {}", e);
                TRENDING_SOURCE.with_label_values(&["none"]).inc();
                Vec::new()
            }
        }
    }
}
