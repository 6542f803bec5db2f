//! Display helpers shared by every view: image URLs, formatted numbers,
//! watch-provider links and trailer embeds.

mod format;
mod video;
mod watch;

pub use format::*;
pub use video::{embed_url, thumbnail_url};
pub use watch::{watch_links, WatchCategory, WatchLink, WatchProvider};

use serde::{Deserialize, Serialize};

/// Shown whenever the upstream has no poster for a movie.
pub const PLACEHOLDER_POSTER: &str = "/no-movie.png";

/// Builds poster URLs from upstream path fragments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosterUrls {
    base: String,
}

impl PosterUrls {
    /// `base` includes the size segment, e.g. `https://image.tmdb.org/t/p/w500`.
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
        }
    }

    /// Base + fragment, or the placeholder when there is no fragment.
    pub fn url_for(&self, poster_path: Option<&str>) -> String {
        match poster_path.filter(|p| !p.is_empty()) {
            Some(path) if path.starts_with('/') => format!("{}{}", self.base, path),
            Some(path) => format!("{}/{}", self.base, path),
            None => PLACEHOLDER_POSTER.to_string(),
        }
    }
}
