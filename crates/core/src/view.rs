//! View state holders.
//!
//! All mutable discovery state lives here. The server keeps one of each
//! per session; orchestration components only produce values to apply.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::catalog::{MovieDetail, MovieSummary, VideoRecord};
use crate::discovery::{
    select_trailer, DetailResolver, DetailSink, DetailUpdate, LoadOutcome, SearchOutcome,
    TrendingEntry,
};
use crate::presentation::{
    company_line, embed_url, format_money, format_rating, format_runtime, format_vote_count,
    release_year, thumbnail_url, watch_links, PosterUrls, WatchLink,
};

/// Search list view: `{ results, is_loading, error }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchState {
    pub results: Vec<MovieSummary>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl SearchState {
    /// Enter loading; previous results stay visible until replaced.
    pub fn begin_loading(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    /// Replace the list wholesale with a finished cycle.
    pub fn apply(&mut self, outcome: SearchOutcome) {
        self.is_loading = false;
        self.error = outcome.error.map(|e| e.user_message());
        self.results = outcome.results;
    }
}

impl From<SearchOutcome> for SearchState {
    fn from(outcome: SearchOutcome) -> Self {
        let mut state = SearchState::default();
        state.apply(outcome);
        state
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrendingState {
    pub trending: Vec<TrendingEntry>,
}

/// Detail view: `{ detail, videos, is_loading, error }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DetailState {
    pub detail: Option<MovieDetail>,
    pub videos: Vec<VideoRecord>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl DetailState {
    fn apply(&mut self, update: DetailUpdate) {
        match update {
            DetailUpdate::Loading => {
                self.is_loading = true;
                self.error = None;
            }
            DetailUpdate::Loaded(mut detail) => {
                self.videos = std::mem::take(&mut detail.videos);
                self.detail = Some(detail);
                self.is_loading = false;
                self.error = None;
            }
            DetailUpdate::Failed(e) => {
                self.detail = None;
                self.videos.clear();
                self.is_loading = false;
                self.error = Some(e.user_message());
            }
        }
    }
}

/// Called with every applied detail state.
pub type DetailListener = Arc<dyn Fn(&DetailState) + Send + Sync>;

struct DetailViewInner {
    state: DetailState,
    current: Option<CancellationToken>,
}

/// Detail view holder where a newer load supersedes any older one.
///
/// Starting a load cancels the previous token under the state lock, and
/// every update re-checks its own token under that lock, so a stale load
/// can never write after a newer one started.
pub struct DetailView {
    inner: Mutex<DetailViewInner>,
    listener: Option<DetailListener>,
}

impl Default for DetailView {
    fn default() -> Self {
        Self::new()
    }
}

impl DetailView {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(DetailViewInner {
                state: DetailState::default(),
                current: None,
            }),
            listener: None,
        }
    }

    /// The listener runs with the state lock held and must not call back
    /// into the view.
    pub fn with_listener(listener: DetailListener) -> Self {
        Self {
            listener: Some(listener),
            ..Self::new()
        }
    }

    fn lock(&self) -> MutexGuard<'_, DetailViewInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self) -> CancellationToken {
        let mut inner = self.lock();
        if let Some(previous) = inner.current.take() {
            previous.cancel();
        }
        let token = CancellationToken::new();
        inner.current = Some(token.clone());
        token
    }

    /// Load `identifier`, superseding any load in progress.
    pub async fn load(&self, resolver: &DetailResolver, identifier: &str) -> LoadOutcome {
        let token = self.begin();
        resolver.load(identifier, &token, self).await
    }

    /// Cancel the current load; the state is left as last applied.
    pub fn unmount(&self) {
        if let Some(token) = self.lock().current.take() {
            token.cancel();
        }
    }

    pub fn snapshot(&self) -> DetailState {
        self.lock().state.clone()
    }
}

impl DetailSink for DetailView {
    fn apply(&self, token: &CancellationToken, update: DetailUpdate) -> bool {
        let mut inner = self.lock();
        if token.is_cancelled() {
            return false;
        }

        inner.state.apply(update);
        if let Some(listener) = &self.listener {
            listener(&inner.state);
        }
        true
    }
}

/// Trailer links for the player overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrailerView {
    pub key: String,
    pub name: Option<String>,
    pub embed_url: String,
    pub thumbnail_url: String,
}

impl TrailerView {
    fn from_video(video: &VideoRecord) -> Self {
        Self {
            key: video.key.clone(),
            name: video.name.clone(),
            embed_url: embed_url(&video.key),
            thumbnail_url: thumbnail_url(&video.key),
        }
    }
}

/// Display-ready detail record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailPresentation {
    pub id: u64,
    pub title: String,
    pub tagline: Option<String>,
    pub overview: Option<String>,
    pub homepage: Option<String>,
    pub status: Option<String>,
    pub poster_url: String,
    pub year: String,
    pub runtime: String,
    pub rating: String,
    pub vote_count: String,
    pub budget: String,
    pub revenue: String,
    pub genres: Vec<String>,
    pub companies: Option<String>,
    pub trailer: Option<TrailerView>,
    pub watch_links: Vec<WatchLink>,
}

impl DetailPresentation {
    /// `videos` are taken from the argument, not from `detail.videos`.
    pub fn new(detail: &MovieDetail, videos: &[VideoRecord], posters: &PosterUrls) -> Self {
        Self {
            id: detail.id,
            title: detail.title.clone(),
            tagline: detail.tagline.clone().filter(|t| !t.is_empty()),
            overview: detail.overview.clone(),
            homepage: detail.homepage.clone().filter(|h| !h.is_empty()),
            status: detail.status.clone(),
            poster_url: posters.url_for(detail.poster_path.as_deref()),
            year: release_year(detail.release_date.as_deref()),
            runtime: format_runtime(detail.runtime),
            rating: format_rating(detail.vote_average),
            vote_count: format_vote_count(detail.vote_count),
            budget: format_money(detail.budget),
            revenue: format_money(detail.revenue),
            genres: detail.genres.iter().map(|g| g.name.clone()).collect(),
            companies: company_line(&detail.production_companies),
            trailer: select_trailer(videos).map(TrailerView::from_video),
            watch_links: watch_links(&detail.title),
        }
    }
}
