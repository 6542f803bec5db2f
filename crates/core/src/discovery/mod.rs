//! Movie discovery orchestration.
//!
//! Decides which upstream query to issue for a search term, reconciles the
//! trending sources, resolves detail identifiers and keeps fast typing from
//! flooding the upstream. Components here hold no view state; callers own it
//! (see `crate::view`).

mod debounce;
mod detail;
mod error;
mod query;
mod reconcile;
mod trailer;
mod trending;
mod types;

pub use debounce::DebounceGate;
pub use detail::{DetailResolver, DetailSink, DetailUpdate, LoadOutcome};
pub use error::{
    DiscoveryError, CONFIGURATION_MESSAGE, DETAIL_FAILED_MESSAGE, SEARCH_FAILED_MESSAGE,
    UPSTREAM_FALLBACK_MESSAGE,
};
pub use query::{random_discover, QueryBuilder, MAX_DISCOVER_PAGE};
pub use reconcile::{ResultReconciler, SearchOutcome, SearchPipeline};
pub use trailer::{select_trailer, TRAILER_KIND, TRAILER_SITE};
pub use trending::TrendingAggregator;
pub use types::TrendingEntry;
