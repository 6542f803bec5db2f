//! TMDB (The Movie Database) API client.
//!
//! Every request carries the bearer credential from configuration. A client
//! built without a credential refuses to send anything and reports
//! `NotConfigured` instead.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::rate_limit::RequestPacer;
use super::request::DiscoveryRequest;
use super::types::{CatalogResponse, MovieDetail, MovieSummary, UpstreamCredential, VideoRecord};
use super::{CatalogError, MovieCatalog};
use crate::config::TmdbConfig;
use crate::metrics::UPSTREAM_REQUESTS;

/// TMDB API client.
pub struct TmdbClient {
    client: Client,
    base_url: String,
    language: String,
    credential: Option<UpstreamCredential>,
    pacer: RequestPacer,
}

impl TmdbClient {
    /// Create a new TMDB client.
    pub fn new(config: &TmdbConfig) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
            credential: config.credential(),
            pacer: RequestPacer::new(config.rate_limit_rpm),
        })
    }

    /// Whether a bearer credential is available.
    pub fn is_configured(&self) -> bool {
        self.credential.is_some()
    }

    async fn send(
        &self,
        label: &'static str,
        path_and_query: &str,
    ) -> Result<Response, CatalogError> {
        let credential = self
            .credential
            .as_ref()
            .ok_or_else(|| CatalogError::NotConfigured("TMDB API key is required".to_string()))?;

        self.pacer.acquire().await;

        let url = format!("{}{}", self.base_url, path_and_query);
        debug!("TMDB {}: GET {}", label, url);

        let result = self
            .client
            .get(&url)
            .bearer_auth(credential.expose())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await;

        match result {
            Ok(response) => {
                let outcome = if response.status().is_success() {
                    "success"
                } else {
                    "http_error"
                };
                UPSTREAM_REQUESTS.with_label_values(&[label, outcome]).inc();
                Ok(response)
            }
            Err(e) => {
                UPSTREAM_REQUESTS
                    .with_label_values(&[label, "transport_error"])
                    .inc();
                Err(e.into())
            }
        }
    }

    /// Map non-success statuses of typed endpoints to errors.
    async fn check_status(response: Response, what: String) -> Result<Response, CatalogError> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(what));
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(CatalogError::NotConfigured(
                "Invalid TMDB API key".to_string(),
            ));
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(CatalogError::RateLimitExceeded);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl MovieCatalog for TmdbClient {
    async fn execute(&self, request: &DiscoveryRequest) -> Result<CatalogResponse, CatalogError> {
        let response = self
            .send(request.label(), &request.path_and_query(&self.language))
            .await?;

        let status = response.status();
        let text = response.text().await?;

        let body = match serde_json::from_str::<Value>(&text) {
            Ok(body) => body,
            Err(e) if status.is_success() => {
                return Err(CatalogError::ParseError(format!(
                    "Failed to parse {} response: {}",
                    request.label(),
                    e
                )))
            }
            // Error pages are often not JSON; keep the text for diagnostics.
            Err(_) => Value::String(text),
        };

        Ok(CatalogResponse::new(status.as_u16(), body))
    }

    async fn get_movie(&self, id: u64) -> Result<MovieDetail, CatalogError> {
        let response = self.send("movie", &format!("/movie/{}", id)).await?;
        let response = Self::check_status(response, format!("Movie ID {}", id)).await?;

        let mut detail: MovieDetail = response.json().await.map_err(|e| {
            CatalogError::ParseError(format!("Failed to parse movie response: {}", e))
        })?;
        detail.videos.clear();

        Ok(detail)
    }

    async fn get_videos(&self, id: u64) -> Result<Vec<VideoRecord>, CatalogError> {
        let response = self
            .send("videos", &format!("/movie/{}/videos", id))
            .await?;
        let response = Self::check_status(response, format!("Videos for movie ID {}", id)).await?;

        let videos: TmdbListResponse<VideoRecord> = response.json().await.map_err(|e| {
            CatalogError::ParseError(format!("Failed to parse videos response: {}", e))
        })?;

        Ok(videos.results)
    }

    async fn trending_today(&self) -> Result<Vec<MovieSummary>, CatalogError> {
        let path = format!(
            "/trending/movie/day?language={}",
            urlencoding::encode(&self.language)
        );
        let response = self.send("trending", &path).await?;
        let response = Self::check_status(response, "Trending movies".to_string()).await?;

        let trending: TmdbListResponse<MovieSummary> = response.json().await.map_err(|e| {
            CatalogError::ParseError(format!("Failed to parse trending response: {}", e))
        })?;

        Ok(trending.results)
    }
}

// ============================================================================
// TMDB API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct TmdbListResponse<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}
