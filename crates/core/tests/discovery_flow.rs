//! Discovery flow integration tests.
//!
//! These tests drive the orchestration components together over the mock
//! catalog and the real SQLite analytics store:
//! - Debounced typing triggers a single search
//! - Searches feed the trending list
//! - Trending entries open the detail view

use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use marquee_core::{
    testing::{fixtures, MockCatalog, RecordedCatalogCall},
    AnalyticsBackend, AnalyticsReporter, DebounceGate, DetailResolver, DetailView,
    DiscoveryRequest, LoadOutcome, PosterUrls, QueryBuilder, SearchPipeline, SearchState,
    SqliteAnalytics, TrendingAggregator, UpstreamCredential,
};

/// Test helper wiring the discovery components to shared mocks.
struct TestHarness {
    catalog: Arc<MockCatalog>,
    analytics: Arc<SqliteAnalytics>,
    pipeline: SearchPipeline,
    trending: TrendingAggregator,
    resolver: DetailResolver,
    _temp_dir: TempDir,
}

impl TestHarness {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let posters = PosterUrls::new("https://image.tmdb.org/t/p/w500");
        let analytics = Arc::new(
            SqliteAnalytics::new(&temp_dir.path().join("analytics.db"), posters.clone())
                .expect("Failed to create analytics store"),
        );
        let catalog = Arc::new(MockCatalog::new());
        let credential = Some(UpstreamCredential::new("test-token"));

        let pipeline = SearchPipeline::new(
            QueryBuilder::new(credential.clone()),
            catalog.clone(),
            AnalyticsReporter::new(analytics.clone()),
        );
        let trending = TrendingAggregator::new(
            analytics.clone(),
            catalog.clone(),
            credential.clone(),
            posters,
            5,
        );
        let resolver = DetailResolver::new(catalog.clone(), credential);

        Self {
            catalog,
            analytics,
            pipeline,
            trending,
            resolver,
            _temp_dir: temp_dir,
        }
    }

    /// Wait until the analytics store has recorded `term`.
    async fn wait_for_report(&self, term: &str) {
        for _ in 0..100 {
            if self.analytics.count_for(term).unwrap() > 0 {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("search for '{}' was never reported", term);
    }
}

#[tokio::test]
async fn test_trending_prefers_searched_movies() {
    let harness = TestHarness::new();
    harness
        .catalog
        .set_search_results("inception", vec![fixtures::movie_summary(27205, "Inception")])
        .await;
    harness
        .catalog
        .set_trending(vec![fixtures::movie_summary(1, "Upstream Pick")])
        .await;

    // Nothing searched yet: upstream trending fills in.
    let before = harness.trending.load().await;
    assert_eq!(before.len(), 1);
    assert_eq!(before[0].title, "Upstream Pick");

    let outcome = harness.pipeline.run("inception").await;
    assert!(outcome.is_ok());
    harness.wait_for_report("inception").await;

    harness.catalog.clear_calls().await;
    let after = harness.trending.load().await;
    assert_eq!(after.len(), 1);
    assert_eq!(after[0].title, "Inception");
    assert_eq!(after[0].movie_id, Some(27205));
    assert_eq!(
        after[0].poster_url,
        "https://image.tmdb.org/t/p/w500/poster-27205.jpg"
    );
    assert_eq!(harness.catalog.call_count().await, 0);
}

#[tokio::test]
async fn test_trending_entry_opens_detail() {
    let harness = TestHarness::new();
    harness
        .catalog
        .set_search_results("matrix", vec![fixtures::movie_summary(603, "The Matrix")])
        .await;
    harness
        .catalog
        .add_movie(fixtures::movie_detail(603, "The Matrix"))
        .await;
    harness
        .catalog
        .set_videos(
            603,
            vec![
                fixtures::video("YouTube", "Teaser", "teaser"),
                fixtures::video("YouTube", "Trailer", "m8e-FF8MsqU"),
            ],
        )
        .await;

    harness.pipeline.run("matrix").await;
    harness.wait_for_report("matrix").await;
    let trending = harness.trending.load().await;
    let target = trending[0].link_target();
    assert_eq!(target, "603");

    harness.catalog.clear_calls().await;
    let view = DetailView::new();
    let outcome = view.load(&harness.resolver, &target).await;
    assert_eq!(outcome, LoadOutcome::Applied);

    let state = view.snapshot();
    assert_eq!(state.detail.map(|d| d.title), Some("The Matrix".to_string()));
    assert_eq!(
        marquee_core::select_trailer(&state.videos).map(|v| v.key.as_str()),
        Some("m8e-FF8MsqU")
    );

    // Numeric target: straight to detail, no title search.
    let calls = harness.catalog.recorded_calls().await;
    assert!(!calls
        .iter()
        .any(|c| matches!(c, RecordedCatalogCall::Execute(_))));
}

#[tokio::test(start_paused = true)]
async fn test_debounced_typing_runs_one_search() {
    let harness = TestHarness::new();
    harness
        .catalog
        .set_search_results("dune", vec![fixtures::movie_summary(438631, "Dune")])
        .await;

    let (mut gate, mut terms) = DebounceGate::new(Duration::from_millis(500));
    for term in ["d", "du", "dun", "dune"] {
        gate.push(term.to_string());
        tokio::time::sleep(Duration::from_millis(120)).await;
    }

    let term = tokio::time::timeout(Duration::from_secs(2), terms.recv())
        .await
        .expect("debounced term")
        .expect("channel open");
    assert_eq!(term, "dune");

    let mut state = SearchState::default();
    state.begin_loading();
    state.apply(harness.pipeline.run(&term).await);

    assert_eq!(state.results.len(), 1);
    assert_eq!(state.error, None);
    assert_eq!(
        harness.catalog.recorded_calls().await,
        vec![RecordedCatalogCall::Execute(DiscoveryRequest::Search {
            query: "dune".to_string()
        })]
    );
}

#[tokio::test]
async fn test_analytics_trending_limit_and_order() {
    let harness = TestHarness::new();
    for (i, term) in ["a", "b", "c", "d", "e", "f", "g"].iter().enumerate() {
        let movie = fixtures::movie_summary(i as u64 + 1, &term.to_uppercase());
        for _ in 0..=i {
            harness.analytics.record_search(term, &movie).await.unwrap();
        }
    }

    let trending = harness.trending.load().await;
    let titles: Vec<&str> = trending.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["G", "F", "E", "D", "C"]);
}
