use super::{types::Config, AnalyticsBackendKind, ConfigError};

/// Upper bound on `discovery.trending_limit`
pub const MAX_TRENDING_LIMIT: usize = 5;

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Debounce window and trending limit are positive
/// - Trending limit does not exceed [`MAX_TRENDING_LIMIT`]
/// - SQLite analytics has a database path
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.discovery.debounce_ms == 0 {
        return Err(ConfigError::ValidationError(
            "discovery.debounce_ms must be greater than 0".to_string(),
        ));
    }

    if config.discovery.trending_limit == 0 {
        return Err(ConfigError::ValidationError(
            "discovery.trending_limit must be greater than 0".to_string(),
        ));
    }

    if config.discovery.trending_limit > MAX_TRENDING_LIMIT {
        return Err(ConfigError::ValidationError(format!(
            "discovery.trending_limit must be at most {}",
            MAX_TRENDING_LIMIT
        )));
    }

    if config.tmdb.rate_limit_rpm == 0 {
        return Err(ConfigError::ValidationError(
            "tmdb.rate_limit_rpm must be greater than 0".to_string(),
        ));
    }

    if config.analytics.backend == AnalyticsBackendKind::Sqlite && config.analytics.path.is_none()
    {
        return Err(ConfigError::ValidationError(
            "analytics.path is required when analytics.backend = \"sqlite\"".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AnalyticsConfig, DiscoveryConfig, ServerConfig};
    use std::net::IpAddr;

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let config = Config {
            server: ServerConfig {
                host: "0.0.0.0".parse::<IpAddr>().unwrap(),
                port: 0,
            },
            ..Default::default()
        };
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_zero_debounce_fails() {
        let config = Config {
            discovery: DiscoveryConfig {
                debounce_ms: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_trending_limit_capped() {
        let over = Config {
            discovery: DiscoveryConfig {
                trending_limit: MAX_TRENDING_LIMIT + 1,
                ..Default::default()
            },
            ..Default::default()
        };
        let err = validate_config(&over).unwrap_err();
        assert!(err.to_string().contains("discovery.trending_limit"));

        let at_cap = Config {
            discovery: DiscoveryConfig {
                trending_limit: MAX_TRENDING_LIMIT,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(validate_config(&at_cap).is_ok());
    }

    #[test]
    fn test_validate_sqlite_requires_path() {
        let config = Config {
            analytics: AnalyticsConfig {
                backend: AnalyticsBackendKind::Sqlite,
                path: None,
            },
            ..Default::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("analytics.path"));
    }
}
