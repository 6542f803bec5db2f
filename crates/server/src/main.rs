use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use marquee_core::{
    load_config, validate_config, AnalyticsBackend, AnalyticsBackendKind, MovieCatalog,
    NoopAnalytics, PosterUrls, SqliteAnalytics, TmdbClient,
};
use marquee_server::{api::create_router, state::AppState};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("marquee {}", VERSION);

    // Determine config path
    let config_path = std::env::var("MARQUEE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    if config.tmdb.credential().is_none() {
        warn!("No TMDB API key configured; search and detail requests will fail until one is set");
    }

    let catalog: Arc<dyn MovieCatalog> =
        Arc::new(TmdbClient::new(&config.tmdb).context("Failed to create TMDB client")?);
    info!("TMDB client initialized ({})", config.tmdb.base_url);

    let analytics: Arc<dyn AnalyticsBackend> = match config.analytics.backend {
        AnalyticsBackendKind::None => {
            info!("Search analytics disabled");
            Arc::new(NoopAnalytics)
        }
        AnalyticsBackendKind::Sqlite => {
            let path = config
                .analytics
                .path
                .as_ref()
                .context("analytics.path is required for the sqlite backend")?;
            let posters = PosterUrls::new(config.tmdb.image_base_url.clone());
            let store = SqliteAnalytics::new(path, posters)
                .with_context(|| format!("Failed to open analytics store at {:?}", path))?;
            info!("Search analytics stored in {:?}", path);
            Arc::new(store)
        }
    };

    // Create app state
    let state = Arc::new(AppState::new(config.clone(), catalog, analytics));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
