//! Search handler

use crate::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use spectra_common::{
    errors::Result,
    metrics,
    search::{SearchPage, SearchRequest},
};
use std::time::Instant;

/// Search response
#[derive(Serialize)]
pub struct SearchResponse {
    #[serde(flatten)]
    pub page: SearchPage,
    pub processing_time_ms: u64,
}

/// Run a structured record search
pub async fn search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>> {
    let start = Instant::now();

    let page = state
        .repo
        .search(&request, &state.config.search)
        .await?;

    let processing_time_ms = start.elapsed().as_millis() as u64;

    metrics::record_search(processing_time_ms as f64 / 1000.0, page.results.len());

    tracing::info!(
        total = page.total_count,
        page = page.page,
        returned = page.results.len(),
        latency_ms = processing_time_ms,
        "Search completed"
    );

    Ok(Json(SearchResponse {
        page,
        processing_time_ms,
    }))
}
