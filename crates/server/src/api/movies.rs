//! Search and detail handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use marquee_core::{DetailPresentation, DiscoveryError, MovieDetail, SearchState, VideoRecord};
use serde::{Deserialize, Serialize};

use super::handlers::ErrorResponse;
use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Empty or absent browses instead of searching.
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct MovieDetailResponse {
    pub detail: MovieDetail,
    pub videos: Vec<VideoRecord>,
    pub presentation: DetailPresentation,
}

fn error_status(error: &DiscoveryError) -> StatusCode {
    match error {
        DiscoveryError::Configuration => StatusCode::SERVICE_UNAVAILABLE,
        DiscoveryError::NotFound(_) => StatusCode::NOT_FOUND,
        DiscoveryError::Fetch { .. }
        | DiscoveryError::Upstream { .. }
        | DiscoveryError::DetailFetch(_) => StatusCode::BAD_GATEWAY,
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/movies?query=
///
/// One search cycle. The body is the search view state whatever the status.
pub async fn search_movies(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> (StatusCode, Json<SearchState>) {
    let outcome = state.pipeline().run(&params.query).await;
    let status = outcome
        .error
        .as_ref()
        .map(error_status)
        .unwrap_or(StatusCode::OK);

    (status, Json(SearchState::from(outcome)))
}

/// GET /api/v1/movies/{id}
///
/// `id` is a catalog id or a title.
pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MovieDetailResponse>, impl IntoResponse> {
    match state.resolver().resolve(&id).await {
        Ok(mut detail) => {
            let videos = std::mem::take(&mut detail.videos);
            let presentation = DetailPresentation::new(&detail, &videos, state.posters());
            Ok(Json(MovieDetailResponse {
                detail,
                videos,
                presentation,
            }))
        }
        Err(e) => Err((
            error_status(&e),
            Json(ErrorResponse {
                error: e.user_message(),
            }),
        )),
    }
}
