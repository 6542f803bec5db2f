//! Common test utilities for API testing with mocks.
//!
//! This module provides a test fixture that creates an in-process router
//! with mock catalog and analytics backends injected, so the HTTP surface
//! can be tested without reaching TMDB.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use marquee_core::testing::{MockAnalytics, MockCatalog};
use marquee_core::config::DiscoveryConfig;
use marquee_core::{Config, TmdbConfig};
use marquee_server::{api::create_router, state::AppState};

/// Re-export fixtures for test convenience
pub use marquee_core::testing::fixtures;

/// Test fixture for API testing with mock dependencies.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_search() {
///     let fixture = TestFixture::new();
///     fixture.catalog.set_search_results("dune", vec![...]).await;
///
///     let response = fixture.get("/api/v1/movies?query=dune").await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock catalog - configure search, detail and trending data
    pub catalog: Arc<MockCatalog>,
    /// Mock analytics - inspect recorded searches, seed trending
    pub analytics: Arc<MockAnalytics>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub text: String,
}

impl TestFixture {
    /// Fixture with an API key configured.
    pub fn new() -> Self {
        Self::with_config(TestConfig::default())
    }

    /// Fixture without an API key.
    pub fn unconfigured() -> Self {
        Self::with_config(TestConfig {
            api_key: None,
            ..Default::default()
        })
    }

    pub fn with_config(test_config: TestConfig) -> Self {
        let catalog = Arc::new(MockCatalog::new());
        let analytics = Arc::new(MockAnalytics::new());

        let config = Config {
            tmdb: TmdbConfig {
                api_key: test_config.api_key,
                image_base_url: "https://img.test/w500".to_string(),
                ..Default::default()
            },
            discovery: DiscoveryConfig {
                debounce_ms: test_config.debounce_ms,
                ..Default::default()
            },
            ..Default::default()
        };

        let state = Arc::new(AppState::new(
            config,
            Arc::clone(&catalog) as Arc<dyn marquee_core::MovieCatalog>,
            Arc::clone(&analytics) as Arc<dyn marquee_core::AnalyticsBackend>,
        ));

        Self {
            router: create_router(state),
            catalog,
            analytics,
        }
    }

    /// Serve the router on a loopback port, for clients that need a real socket.
    pub async fn serve(&self) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");
        let router = self.router.clone();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        addr
    }

    /// Send a GET request to the test router.
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let text = String::from_utf8_lossy(&body_bytes).to_string();
        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body, text }
    }

    /// Wait until the fire-and-forget analytics report lands.
    pub async fn wait_for_recorded_searches(&self, count: usize) -> Vec<(String, u64)> {
        for _ in 0..100 {
            let recorded = self.analytics.recorded_searches().await;
            if recorded.len() >= count {
                return recorded;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        self.analytics.recorded_searches().await
    }
}

/// Configuration for test fixture.
#[derive(Debug, Clone)]
pub struct TestConfig {
    pub api_key: Option<String>,
    /// Search debounce window
    pub debounce_ms: u64,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            api_key: Some("test-token".to_string()),
            debounce_ms: 500,
        }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}

/// Helper to assert a JSON path equals expected value.
#[macro_export]
macro_rules! assert_json_path {
    ($json:expr, $path:expr, $expected:expr) => {
        let actual = &$json[$path];
        assert_eq!(
            actual, &$expected,
            "Path '{}' expected {:?}, got {:?}",
            $path, $expected, actual
        );
    };
}
