//! Summary and source registry handlers

use crate::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use spectra_common::{
    db::models::{DataSourceInfo, DatabaseSummary},
    errors::Result,
};

#[derive(Serialize)]
pub struct SummaryResponse {
    pub counts: Vec<DatabaseSummary>,
    pub total_records: i64,
}

/// Precomputed per-source, per-record-type counts for the whole store
pub async fn get_summary(State(state): State<AppState>) -> Result<Json<SummaryResponse>> {
    let counts = state.repo.database_summary().await?;
    let total_records = counts.iter().map(|c| c.record_count).sum();
    Ok(Json(SummaryResponse {
        counts,
        total_records,
    }))
}

/// Descriptive rows for every upstream data source
pub async fn get_sources(State(state): State<AppState>) -> Result<Json<Vec<DataSourceInfo>>> {
    Ok(Json(state.repo.data_sources().await?))
}
