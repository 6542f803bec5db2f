use std::sync::Arc;
use std::time::Duration;

use marquee_core::{
    AnalyticsBackend, AnalyticsReporter, Config, DetailResolver, MovieCatalog, PosterUrls,
    QueryBuilder, SanitizedConfig, SearchPipeline, TrendingAggregator,
};

/// Shared application state
///
/// Holds the stateless discovery components; per-session view state lives
/// in the WebSocket session.
pub struct AppState {
    config: Config,
    pipeline: SearchPipeline,
    trending: TrendingAggregator,
    resolver: DetailResolver,
    posters: PosterUrls,
}

impl AppState {
    pub fn new(
        config: Config,
        catalog: Arc<dyn MovieCatalog>,
        analytics: Arc<dyn AnalyticsBackend>,
    ) -> Self {
        let credential = config.tmdb.credential();
        let posters = PosterUrls::new(config.tmdb.image_base_url.clone());

        let pipeline = SearchPipeline::new(
            QueryBuilder::new(credential.clone()),
            Arc::clone(&catalog),
            AnalyticsReporter::new(Arc::clone(&analytics)),
        );
        let trending = TrendingAggregator::new(
            analytics,
            Arc::clone(&catalog),
            credential.clone(),
            posters.clone(),
            config.discovery.trending_limit,
        );
        let resolver = DetailResolver::new(catalog, credential);

        Self {
            config,
            pipeline,
            trending,
            resolver,
            posters,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn pipeline(&self) -> &SearchPipeline {
        &self.pipeline
    }

    pub fn trending(&self) -> &TrendingAggregator {
        &self.trending
    }

    pub fn resolver(&self) -> &DetailResolver {
        &self.resolver
    }

    pub fn posters(&self) -> &PosterUrls {
        &self.posters
    }

    /// Quiescence window for live search sessions.
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.config.discovery.debounce_ms)
    }
}
