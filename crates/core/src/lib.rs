pub mod analytics;
pub mod catalog;
pub mod config;
pub mod discovery;
pub mod metrics;
pub mod presentation;
pub mod testing;
pub mod view;

pub use analytics::{
    AnalyticsBackend, AnalyticsError, AnalyticsReporter, NoopAnalytics, SqliteAnalytics,
};
pub use catalog::{
    CatalogError, CatalogResponse, DiscoveryRequest, MovieCatalog, MovieDetail, MovieSummary,
    SortCriterion, TmdbClient, UpstreamCredential, VideoRecord,
};
pub use config::{
    load_config, load_config_from_str, validate_config, AnalyticsBackendKind, Config,
    ConfigError, SanitizedConfig, TmdbConfig,
};
pub use discovery::{
    select_trailer, DebounceGate, DetailResolver, DetailSink, DetailUpdate, DiscoveryError,
    LoadOutcome, QueryBuilder, ResultReconciler, SearchOutcome, SearchPipeline,
    TrendingAggregator, TrendingEntry,
};
pub use presentation::{PosterUrls, PLACEHOLDER_POSTER};
pub use view::{DetailPresentation, DetailState, DetailView, SearchState, TrendingState};
