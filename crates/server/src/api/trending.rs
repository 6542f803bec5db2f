use std::sync::Arc;

use axum::{extract::State, Json};
use marquee_core::TrendingEntry;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct TrendingItem {
    #[serde(flatten)]
    pub entry: TrendingEntry,
    /// Identifier to open in the detail view.
    pub link: String,
}

#[derive(Debug, Serialize)]
pub struct TrendingResponse {
    pub trending: Vec<TrendingItem>,
}

/// GET /api/v1/trending
///
/// Always 200; an empty list when no source had entries.
pub async fn get_trending(State(state): State<Arc<AppState>>) -> Json<TrendingResponse> {
    let trending = state
        .trending()
        .load()
        .await
        .into_iter()
        .map(|entry| TrendingItem {
            link: entry.link_target(),
            entry,
        })
        .collect();

    Json(TrendingResponse { trending })
}
