//! Record handlers

use crate::AppState;
use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use spectra_common::{
    db::{RecordDetail, SpectrumDetail},
    errors::{AppError, Result},
    metrics,
    spectrum::{entropy_similarity, parse_peaks},
};
use validator::Validate;

/// Fetch one record with its payload and mapped substances
pub async fn get_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RecordDetail>> {
    let detail = state.repo.record_detail(&id).await?;
    Ok(Json(detail))
}

/// Fetch a spectrum payload with parsed peaks
pub async fn get_spectrum(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SpectrumDetail>> {
    let spectrum = state.repo.spectrum_by_id(&id).await?;
    Ok(Json(spectrum))
}

#[derive(Debug, Deserialize, Validate)]
pub struct SimilarityRequest {
    /// Query peaks, space-separated "mz:intensity" pairs
    #[validate(length(min = 1))]
    pub spectrum: String,

    /// Peak-matching tolerance in Da
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

fn default_tolerance() -> f64 {
    0.05
}

#[derive(Serialize)]
pub struct SimilarityResponse {
    pub internal_id: String,
    pub similarity: f64,
}

/// Entropy similarity between a submitted peak list and a stored spectrum
pub async fn spectrum_similarity(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SimilarityRequest>,
) -> Result<Json<SimilarityResponse>> {
    request.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: None,
    })?;

    let query_peaks = parse_peaks(&request.spectrum).map_err(|_| AppError::Validation {
        message: "expected space-separated mz:intensity pairs".to_string(),
        field: Some("spectrum".to_string()),
    })?;

    let stored = match state.repo.spectrum_by_id(&id).await? {
        SpectrumDetail::Mass { peaks, .. }
        | SpectrumDetail::Nmr { peaks, .. }
        | SpectrumDetail::Ir { peaks, .. } => peaks,
    };

    let similarity = entropy_similarity(&query_peaks, &stored, request.tolerance);

    Ok(Json(SimilarityResponse {
        internal_id: id,
        similarity,
    }))
}

/// Fetch the stored PDF for a document-backed record
pub async fn get_pdf(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let bytes = state.repo.pdf_by_id(&id).await?;
    metrics::record_blob_fetch("pdf");

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{}.pdf\"", id),
            ),
        ],
        bytes,
    ))
}
