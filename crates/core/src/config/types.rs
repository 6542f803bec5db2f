use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

use crate::catalog::UpstreamCredential;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

/// TMDB upstream configuration.
///
/// A missing API key surfaces as a typed error at request time, not at
/// startup.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TmdbConfig {
    /// Bearer token (TMDB "API Read Access Token").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Image base including the size segment, e.g. `.../t/p/w500`.
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    #[serde(default = "default_language")]
    pub language: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Client-side request pacing, requests per minute (default: 2400)
    #[serde(default = "default_rate_limit")]
    pub rate_limit_rpm: u32,
}

impl TmdbConfig {
    /// The configured credential, if any. Blank keys count as absent.
    pub fn credential(&self) -> Option<UpstreamCredential> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(UpstreamCredential::new)
    }
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            image_base_url: default_image_base_url(),
            language: default_language(),
            timeout_secs: default_timeout(),
            rate_limit_rpm: default_rate_limit(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_rate_limit() -> u32 {
    2400
}

/// Analytics backend configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalyticsConfig {
    #[serde(default)]
    pub backend: AnalyticsBackendKind,
    /// SQLite database path (used when backend = "sqlite")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            backend: AnalyticsBackendKind::None,
            path: None,
        }
    }
}

/// Available analytics backends
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AnalyticsBackendKind {
    #[default]
    None,
    Sqlite,
}

/// Discovery tuning
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DiscoveryConfig {
    /// Quiescence window for search input, milliseconds (default: 500)
    #[serde(default = "default_debounce")]
    pub debounce_ms: u64,
    /// Maximum trending entries (default: 5)
    #[serde(default = "default_trending_limit")]
    pub trending_limit: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce(),
            trending_limit: default_trending_limit(),
        }
    }
}

fn default_debounce() -> u64 {
    500
}

fn default_trending_limit() -> usize {
    5
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub tmdb: SanitizedTmdbConfig,
    pub analytics: AnalyticsConfig,
    pub discovery: DiscoveryConfig,
}

/// Sanitized TMDB config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedTmdbConfig {
    pub base_url: String,
    pub image_base_url: String,
    pub language: String,
    pub api_key_configured: bool,
    pub timeout_secs: u64,
    pub rate_limit_rpm: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            tmdb: SanitizedTmdbConfig {
                base_url: config.tmdb.base_url.clone(),
                image_base_url: config.tmdb.image_base_url.clone(),
                language: config.tmdb.language.clone(),
                api_key_configured: config.tmdb.credential().is_some(),
                timeout_secs: config.tmdb.timeout_secs,
                rate_limit_rpm: config.tmdb.rate_limit_rpm,
            },
            analytics: config.analytics.clone(),
            discovery: config.discovery.clone(),
        }
    }
}
