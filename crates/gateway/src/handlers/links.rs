//! Method/spectrum link handlers

use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use spectra_common::{
    db::models::MethodSpectrumLink,
    errors::{AppError, Result},
};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    #[validate(length(min = 1))]
    pub method_id: String,

    #[validate(length(min = 1))]
    pub spectrum_id: String,
}

/// Associate a method record with a spectrum record. Both ids must exist
/// and carry the expected record type; a mismatch is a conflict.
pub async fn create_link(
    State(state): State<AppState>,
    Json(request): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<MethodSpectrumLink>)> {
    request.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: None,
    })?;

    let link = state
        .repo
        .insert_method_spectrum_link(&request.method_id, &request.spectrum_id)
        .await?;

    tracing::info!(
        method_id = %link.method_id,
        spectrum_id = %link.spectrum_id,
        "Method/spectrum link created"
    );

    Ok((StatusCode::CREATED, Json(link)))
}
