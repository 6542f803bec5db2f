//! Test doubles for the catalog and analytics seams.
//!
//! # Example
//!
//! ```rust,ignore
//! use marquee_core::testing::{fixtures, MockAnalytics, MockCatalog};
//!
//! let catalog = MockCatalog::new();
//! catalog.add_movie(fixtures::movie_detail(27205, "Inception")).await;
//! catalog
//!     .set_search_results("inception", vec![fixtures::movie_summary(27205, "Inception")])
//!     .await;
//!
//! let analytics = MockAnalytics::new();
//! analytics.set_failing(true).await;
//! ```

mod mock_analytics;
mod mock_catalog;

pub use mock_analytics::MockAnalytics;
pub use mock_catalog::{MockCatalog, RecordedCatalogCall};

/// Test fixtures and helper functions.
pub mod fixtures {
    use serde_json::Map;

    use crate::catalog::{Genre, MovieDetail, MovieSummary, ProductionCompany, VideoRecord};
    use crate::discovery::TrendingEntry;

    /// A list entry with a poster at `/poster-{id}.jpg`.
    pub fn movie_summary(id: u64, title: &str) -> MovieSummary {
        MovieSummary {
            id,
            title: title.to_string(),
            poster_path: Some(format!("/poster-{}.jpg", id)),
            vote_average: 7.5,
            release_date: Some("2020-01-01".to_string()),
            original_language: Some("en".to_string()),
            extra: Map::new(),
        }
    }

    /// A full record with every optional field populated.
    pub fn movie_detail(id: u64, title: &str) -> MovieDetail {
        MovieDetail {
            id,
            title: title.to_string(),
            original_title: Some(title.to_string()),
            tagline: Some("Your mind is the scene of the crime.".to_string()),
            overview: Some(format!("Overview of {}", title)),
            homepage: Some(format!("https://movies.test/{}", id)),
            poster_path: Some(format!("/poster-{}.jpg", id)),
            backdrop_path: Some(format!("/backdrop-{}.jpg", id)),
            release_date: Some("2010-07-15".to_string()),
            runtime: Some(148),
            vote_average: Some(8.369),
            vote_count: Some(35_123),
            budget: Some(160_000_000),
            revenue: Some(825_532_764),
            status: Some("Released".to_string()),
            genres: vec![
                Genre {
                    id: 28,
                    name: "Action".to_string(),
                },
                Genre {
                    id: 878,
                    name: "Science Fiction".to_string(),
                },
            ],
            production_companies: vec![ProductionCompany {
                id: 923,
                name: "Legendary Pictures".to_string(),
                logo_path: None,
            }],
            videos: Vec::new(),
        }
    }

    pub fn video(site: &str, kind: &str, key: &str) -> VideoRecord {
        VideoRecord {
            site: site.to_string(),
            kind: kind.to_string(),
            key: key.to_string(),
            name: Some(format!("{} {}", site, kind)),
            official: Some(true),
        }
    }

    pub fn trending_entry(id: &str, title: &str, movie_id: Option<u64>) -> TrendingEntry {
        TrendingEntry {
            id: id.to_string(),
            title: title.to_string(),
            poster_url: format!("https://img.test/w500/{}.jpg", id),
            movie_id,
        }
    }
}
