//! Mock movie catalog for testing.

use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::catalog::{
    CatalogError, CatalogResponse, DiscoveryRequest, MovieCatalog, MovieDetail, MovieSummary,
    VideoRecord,
};

/// A recorded catalog call for test assertions.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCatalogCall {
    Execute(DiscoveryRequest),
    GetMovie(u64),
    GetVideos(u64),
    TrendingToday,
}

/// Mock implementation of the MovieCatalog trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable search, discover, detail and trending data
/// - Track calls for assertions
/// - Simulate failures and per-movie latency
#[derive(Debug, Default)]
pub struct MockCatalog {
    /// Detail records by id.
    movies: Arc<RwLock<HashMap<u64, MovieDetail>>>,
    /// Video lists by id.
    videos: Arc<RwLock<HashMap<u64, Vec<VideoRecord>>>>,
    /// Search results keyed by exact query text.
    search_results: Arc<RwLock<HashMap<String, Vec<MovieSummary>>>>,
    /// Returned for every discover request.
    discover_results: Arc<RwLock<Vec<MovieSummary>>>,
    trending: Arc<RwLock<Vec<MovieSummary>>>,
    /// If set, `execute` returns this response verbatim.
    raw_response: Arc<RwLock<Option<CatalogResponse>>>,
    /// If set, every videos call fails.
    fail_videos: Arc<RwLock<bool>>,
    /// Artificial latency for detail and videos calls, by id.
    delays: Arc<RwLock<HashMap<u64, Duration>>>,
    /// Recorded calls.
    calls: Arc<RwLock<Vec<RecordedCatalogCall>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<CatalogError>>>,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    pub async fn add_movie(&self, movie: MovieDetail) {
        self.movies.write().await.insert(movie.id, movie);
    }

    pub async fn set_videos(&self, id: u64, videos: Vec<VideoRecord>) {
        self.videos.write().await.insert(id, videos);
    }

    pub async fn set_search_results(&self, query: &str, results: Vec<MovieSummary>) {
        self.search_results
            .write()
            .await
            .insert(query.to_string(), results);
    }

    pub async fn set_discover_results(&self, results: Vec<MovieSummary>) {
        *self.discover_results.write().await = results;
    }

    pub async fn set_trending(&self, movies: Vec<MovieSummary>) {
        *self.trending.write().await = movies;
    }

    /// Return this response from every `execute` call.
    pub async fn set_raw_response(&self, response: CatalogResponse) {
        *self.raw_response.write().await = Some(response);
    }

    pub async fn fail_videos(&self, fail: bool) {
        *self.fail_videos.write().await = fail;
    }

    /// Delay detail and videos calls for `id`.
    pub async fn set_delay(&self, id: u64, delay: Duration) {
        self.delays.write().await.insert(id, delay);
    }

    /// Make the next operation fail.
    pub async fn set_next_error(&self, error: CatalogError) {
        *self.next_error.write().await = Some(error);
    }

    // =========================================================================
    // Assertions
    // =========================================================================

    pub async fn recorded_calls(&self) -> Vec<RecordedCatalogCall> {
        self.calls.read().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }

    pub async fn clear_calls(&self) {
        self.calls.write().await.clear();
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn record(&self, call: RecordedCatalogCall) {
        self.calls.write().await.push(call);
    }

    async fn take_error(&self) -> Option<CatalogError> {
        self.next_error.write().await.take()
    }

    async fn wait_for(&self, id: u64) {
        let delay = self.delays.read().await.get(&id).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

fn list_body(results: &[MovieSummary]) -> serde_json::Value {
    json!({
        "page": 1,
        "results": results,
        "total_pages": 1,
        "total_results": results.len(),
    })
}

#[async_trait]
impl MovieCatalog for MockCatalog {
    async fn execute(&self, request: &DiscoveryRequest) -> Result<CatalogResponse, CatalogError> {
        self.record(RecordedCatalogCall::Execute(request.clone()))
            .await;

        if let Some(error) = self.take_error().await {
            return Err(error);
        }
        if let Some(response) = self.raw_response.read().await.clone() {
            return Ok(response);
        }

        let results = match request {
            DiscoveryRequest::Search { query } => self
                .search_results
                .read()
                .await
                .get(query)
                .cloned()
                .unwrap_or_default(),
            DiscoveryRequest::Discover { .. } => self.discover_results.read().await.clone(),
        };

        Ok(CatalogResponse::new(200, list_body(&results)))
    }

    async fn get_movie(&self, id: u64) -> Result<MovieDetail, CatalogError> {
        self.record(RecordedCatalogCall::GetMovie(id)).await;

        if let Some(error) = self.take_error().await {
            return Err(error);
        }
        self.wait_for(id).await;

        self.movies
            .read()
            .await
            .get(&id)
            .cloned()
            .map(|mut movie| {
                movie.videos.clear();
                movie
            })
            .ok_or_else(|| CatalogError::NotFound(format!("movie/{}", id)))
    }

    async fn get_videos(&self, id: u64) -> Result<Vec<VideoRecord>, CatalogError> {
        self.record(RecordedCatalogCall::GetVideos(id)).await;

        if let Some(error) = self.take_error().await {
            return Err(error);
        }
        self.wait_for(id).await;

        if *self.fail_videos.read().await {
            return Err(CatalogError::ApiError {
                status: 500,
                message: "videos unavailable".to_string(),
            });
        }

        Ok(self
            .videos
            .read()
            .await
            .get(&id)
            .cloned()
            .unwrap_or_default())
    }

    async fn trending_today(&self) -> Result<Vec<MovieSummary>, CatalogError> {
        self.record(RecordedCatalogCall::TrendingToday).await;

        if let Some(error) = self.take_error().await {
            return Err(error);
        }

        Ok(self.trending.read().await.clone())
    }
}
