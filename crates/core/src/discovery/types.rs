use serde::{Deserialize, Serialize};

use crate::catalog::MovieSummary;
use crate::presentation::PosterUrls;

/// One slot of the trending shortlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendingEntry {
    /// Analytics row id, or the upstream catalog id as a string.
    pub id: String,
    pub title: String,
    pub poster_url: String,
    /// Only set for entries from the analytics backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movie_id: Option<u64>,
}

impl TrendingEntry {
    /// Map an upstream trending movie.
    pub fn from_upstream(movie: &MovieSummary, posters: &PosterUrls) -> Self {
        Self {
            id: movie.id.to_string(),
            title: movie.title.clone(),
            poster_url: posters.url_for(movie.poster_path.as_deref()),
            movie_id: None,
        }
    }

    /// Identifier to open in the detail view: `movie_id`, then `id`, then `title`.
    pub fn link_target(&self) -> String {
        if let Some(movie_id) = self.movie_id {
            return movie_id.to_string();
        }
        if !self.id.is_empty() {
            return self.id.clone();
        }
        self.title.clone()
    }
}
