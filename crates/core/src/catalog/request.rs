//! Upstream request descriptors.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sort orders available to discovery mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortCriterion {
    #[serde(rename = "popularity.desc")]
    PopularityDesc,
    #[serde(rename = "vote_average.desc")]
    VoteAverageDesc,
    #[serde(rename = "release_date.desc")]
    ReleaseDateDesc,
    #[serde(rename = "vote_count.desc")]
    VoteCountDesc,
    #[serde(rename = "revenue.desc")]
    RevenueDesc,
}

impl SortCriterion {
    pub const ALL: [SortCriterion; 5] = [
        SortCriterion::PopularityDesc,
        SortCriterion::VoteAverageDesc,
        SortCriterion::ReleaseDateDesc,
        SortCriterion::VoteCountDesc,
        SortCriterion::RevenueDesc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortCriterion::PopularityDesc => "popularity.desc",
            SortCriterion::VoteAverageDesc => "vote_average.desc",
            SortCriterion::ReleaseDateDesc => "release_date.desc",
            SortCriterion::VoteCountDesc => "vote_count.desc",
            SortCriterion::RevenueDesc => "revenue.desc",
        }
    }
}

impl fmt::Display for SortCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One list fetch against the upstream service.
///
/// Search and discover parameters are mutually exclusive, so each mode is
/// its own variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DiscoveryRequest {
    /// `/search/movie?query=...`
    Search { query: String },
    /// `/discover/movie?sort_by=...&page=...`
    Discover { sort_by: SortCriterion, page: u32 },
}

impl DiscoveryRequest {
    pub fn endpoint(&self) -> &'static str {
        match self {
            DiscoveryRequest::Search { .. } => "/search/movie",
            DiscoveryRequest::Discover { .. } => "/discover/movie",
        }
    }

    pub fn is_search(&self) -> bool {
        matches!(self, DiscoveryRequest::Search { .. })
    }

    /// The search text, present only in search mode.
    pub fn query_text(&self) -> Option<&str> {
        match self {
            DiscoveryRequest::Search { query } => Some(query),
            DiscoveryRequest::Discover { .. } => None,
        }
    }

    /// Short label used for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            DiscoveryRequest::Search { .. } => "search",
            DiscoveryRequest::Discover { .. } => "discover",
        }
    }

    /// Endpoint plus URL-escaped query string, relative to the API base.
    pub fn path_and_query(&self, language: &str) -> String {
        match self {
            DiscoveryRequest::Search { query } => {
                format!("/search/movie?query={}", urlencoding::encode(query))
            }
            DiscoveryRequest::Discover { sort_by, page } => format!(
                "/discover/movie?sort_by={}&page={}&include_adult=false&include_video=false&language={}",
                sort_by,
                page,
                urlencoding::encode(language)
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_path_is_escaped() {
        let request = DiscoveryRequest::Search {
            query: "Amélie & friends?".to_string(),
        };
        assert_eq!(
            request.path_and_query("en-US"),
            "/search/movie?query=Am%C3%A9lie%20%26%20friends%3F"
        );
        assert!(request.is_search());
        assert_eq!(request.query_text(), Some("Amélie & friends?"));
    }

    #[test]
    fn test_discover_path() {
        let request = DiscoveryRequest::Discover {
            sort_by: SortCriterion::RevenueDesc,
            page: 3,
        };
        assert_eq!(
            request.path_and_query("en-US"),
            "/discover/movie?sort_by=revenue.desc&page=3&include_adult=false&include_video=false&language=en-US"
        );
        assert_eq!(request.endpoint(), "/discover/movie");
        assert_eq!(request.query_text(), None);
    }

    #[test]
    fn test_sort_criterion_serde_names() {
        for criterion in SortCriterion::ALL {
            let json = serde_json::to_string(&criterion).unwrap();
            assert_eq!(json, format!("\"{}\"", criterion.as_str()));
        }
    }
}
