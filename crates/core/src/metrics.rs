//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Upstream catalog calls (by endpoint and outcome)
//! - Trending source selection
//! - Search input debouncing
//! - Detail loads and analytics side-channel failures

use once_cell::sync::Lazy;
use prometheus::{core::Collector, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Upstream Catalog
// =============================================================================

/// Upstream requests total by endpoint and outcome.
pub static UPSTREAM_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "marquee_upstream_requests_total",
            "Total requests sent to the upstream metadata service",
        ),
        &["endpoint", "outcome"], // outcome: "success", "http_error", "transport_error"
    )
    .unwrap()
});

// =============================================================================
// Discovery
// =============================================================================

/// Which source produced the trending list.
pub static TRENDING_SOURCE: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "marquee_trending_source_total",
            "Trending lists served, by source",
        ),
        &["source"], // "analytics", "upstream", "none"
    )
    .unwrap()
});

/// Stabilized search terms emitted by debounce gates.
pub static DEBOUNCE_EMITTED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "marquee_debounce_emitted_total",
        "Search terms emitted after the quiescence window",
    )
    .unwrap()
});

/// Pending debounce timers invalidated before firing.
pub static DEBOUNCE_SUPERSEDED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "marquee_debounce_superseded_total",
        "Pending debounce timers cancelled by newer input or teardown",
    )
    .unwrap()
});

/// Search pipeline runs by result.
pub static SEARCH_RUNS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("marquee_search_runs_total", "Search pipeline runs"),
        &["mode", "result"], // mode: "search", "discover", "none"; result: "ok", "error"
    )
    .unwrap()
});

/// Detail loads by outcome.
pub static DETAIL_LOADS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("marquee_detail_loads_total", "Detail load sequences"),
        &["outcome"], // "applied", "failed", "cancelled"
    )
    .unwrap()
});

// =============================================================================
// Analytics
// =============================================================================

/// Analytics side-channel failures (swallowed).
pub static ANALYTICS_FAILURES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "marquee_analytics_failures_total",
            "Analytics backend failures absorbed by the discovery layer",
        ),
        &["operation"], // "record_search", "trending"
    )
    .unwrap()
});

/// All core metrics, for registration in a server-side registry.
pub fn all_metrics() -> Vec<Box<dyn Collector>> {
    vec![
        Box::new(UPSTREAM_REQUESTS.clone()),
        Box::new(TRENDING_SOURCE.clone()),
        Box::new(DEBOUNCE_EMITTED.clone()),
        Box::new(DEBOUNCE_SUPERSEDED.clone()),
        Box::new(SEARCH_RUNS.clone()),
        Box::new(DETAIL_LOADS.clone()),
        Box::new(ANALYTICS_FAILURES.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus::Registry;

    #[test]
    fn test_all_metrics_register() {
        let registry = Registry::new();
        for metric in all_metrics() {
            registry.register(metric).unwrap();
        }

        UPSTREAM_REQUESTS
            .with_label_values(&["search", "success"])
            .inc();
        let families = registry.gather();
        assert!(families
            .iter()
            .any(|f| f.get_name() == "marquee_upstream_requests_total"));
    }
}
