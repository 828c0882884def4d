//! Substance handlers

use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use spectra_common::{
    db::models::{AdditionalSource, ClassyFire, RecordInfo, Substance},
    db::RecordCounts,
    errors::{AppError, Result},
    metrics,
};
use std::collections::BTreeMap;
use validator::Validate;

/// Substance detail: identity row plus supplemental structure identifiers
/// and per-source record counts.
#[derive(Serialize)]
pub struct SubstanceResponse {
    #[serde(flatten)]
    pub substance: Substance,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smiles: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inchi: Option<String>,
    pub record_counts: Vec<RecordCounts>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ClassificationParams {
    /// Include descriptors and alternative parents, not just the taxonomy path
    #[serde(default)]
    pub full: bool,
}

/// ClassyFire row, either the taxonomy path alone or the whole record.
#[derive(Serialize)]
#[serde(untagged)]
pub enum ClassyFireView {
    Full(ClassyFire),
    Basic {
        kingdom: Option<String>,
        superklass: Option<String>,
        klass: Option<String>,
        subklass: Option<String>,
        direct_parent: Option<String>,
    },
}

impl ClassyFireView {
    fn from_model(model: ClassyFire, full: bool) -> Self {
        if full {
            ClassyFireView::Full(model)
        } else {
            ClassyFireView::Basic {
                kingdom: model.kingdom,
                superklass: model.superklass,
                klass: model.klass,
                subklass: model.subklass,
                direct_parent: model.direct_parent,
            }
        }
    }
}

#[derive(Serialize)]
pub struct ClassificationResponse {
    pub dtxsid: String,
    pub classyfire: Option<ClassyFireView>,
    pub functional_uses: Vec<String>,
}

#[derive(Serialize)]
pub struct SynonymsResponse {
    pub dtxsid: String,
    pub synonyms: Vec<String>,
}

#[derive(Serialize)]
pub struct SubstanceRecordsResponse {
    pub dtxsid: String,
    pub counts: Vec<RecordCounts>,
    pub records: Vec<RecordInfo>,
}

pub async fn get_substance(
    State(state): State<AppState>,
    Path(dtxsid): Path<String>,
) -> Result<Json<SubstanceResponse>> {
    let substance = state.repo.substance_by_dtxsid(&dtxsid).await?;
    let extra = state.repo.additional_substance_info(&dtxsid).await?;
    let record_counts = state.repo.record_counts_by_dtxsid(&dtxsid).await?;

    let (smiles, inchi) = extra.map(|e| (e.smiles, e.inchi)).unwrap_or((None, None));

    Ok(Json(SubstanceResponse {
        substance,
        smiles,
        inchi,
        record_counts,
    }))
}

pub async fn get_classification(
    State(state): State<AppState>,
    Path(dtxsid): Path<String>,
    Query(params): Query<ClassificationParams>,
) -> Result<Json<ClassificationResponse>> {
    // 404 on an unknown substance, not on a substance without classification
    state.repo.substance_by_dtxsid(&dtxsid).await?;

    let classyfire = state
        .repo
        .classyfire_for_dtxsid(&dtxsid)
        .await?
        .map(|model| ClassyFireView::from_model(model, params.full));
    let functional_uses = state.repo.functional_uses_for_dtxsid(&dtxsid).await?;

    Ok(Json(ClassificationResponse {
        dtxsid,
        classyfire,
        functional_uses,
    }))
}

pub async fn get_synonyms(
    State(state): State<AppState>,
    Path(dtxsid): Path<String>,
) -> Result<Json<SynonymsResponse>> {
    state.repo.substance_by_dtxsid(&dtxsid).await?;
    let synonyms = state.repo.synonyms_for_dtxsid(&dtxsid).await?;
    Ok(Json(SynonymsResponse { dtxsid, synonyms }))
}

pub async fn get_additional_sources(
    State(state): State<AppState>,
    Path(dtxsid): Path<String>,
) -> Result<Json<Vec<AdditionalSource>>> {
    state.repo.substance_by_dtxsid(&dtxsid).await?;
    Ok(Json(state.repo.additional_sources_for_dtxsid(&dtxsid).await?))
}

pub async fn get_records(
    State(state): State<AppState>,
    Path(dtxsid): Path<String>,
) -> Result<Json<SubstanceRecordsResponse>> {
    state.repo.substance_by_dtxsid(&dtxsid).await?;
    let counts = state.repo.record_counts_by_dtxsid(&dtxsid).await?;
    let records = state.repo.records_for_dtxsid(&dtxsid).await?;
    Ok(Json(SubstanceRecordsResponse {
        dtxsid,
        counts,
        records,
    }))
}

#[derive(Debug, Deserialize, Validate)]
pub struct LookupRequest {
    #[validate(length(min = 1, max = 500))]
    pub dtxsids: Vec<String>,
}

#[derive(Serialize)]
pub struct LookupResponse {
    /// dtxsid -> preferred name (absent substances are omitted)
    pub names: BTreeMap<String, Option<String>>,
    /// dtxsid -> record ids mapped to that substance
    pub record_ids: BTreeMap<String, Vec<String>>,
}

/// Batch lookup: preferred names and record ids for a set of substances
pub async fn lookup(
    State(state): State<AppState>,
    Json(request): Json<LookupRequest>,
) -> Result<Json<LookupResponse>> {
    request.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: Some("dtxsids".to_string()),
    })?;

    let names = state.repo.names_for_dtxsids(&request.dtxsids).await?;
    let record_ids = state.repo.ids_for_substances(&request.dtxsids).await?;

    Ok(Json(LookupResponse { names, record_ids }))
}

/// Exact molecular formula lookup
pub async fn by_formula(
    State(state): State<AppState>,
    Path(formula): Path<String>,
) -> Result<Json<Vec<Substance>>> {
    Ok(Json(state.repo.formula_search(formula.trim()).await?))
}

/// Extract the 14-character connectivity block from a full InChIKey or a
/// bare first block. Character-based, so arbitrary path segments (including
/// multi-byte input) reject cleanly instead of slicing mid-character.
fn inchikey_block(raw: &str) -> Result<String> {
    let key = raw.trim().to_uppercase();
    let block: String = key.chars().take(14).collect();
    if block.len() != 14 || !block.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(AppError::InvalidFilterValue {
            field: "inchikey".to_string(),
            value: raw.to_string(),
        });
    }
    Ok(block)
}

/// InChIKey lookup on the 14-character connectivity block. Accepts a full
/// key or a bare first block.
pub async fn by_inchikey(
    State(state): State<AppState>,
    Path(inchikey): Path<String>,
) -> Result<Json<Vec<Substance>>> {
    let block = inchikey_block(&inchikey)?;
    Ok(Json(state.repo.inchikey_first_block_search(&block).await?))
}

pub async fn get_image(
    State(state): State<AppState>,
    Path(dtxsid): Path<String>,
) -> Result<impl IntoResponse> {
    let bytes = state.repo.substance_image(&dtxsid).await?;
    metrics::record_blob_fetch("image");

    Ok(([(header::CONTENT_TYPE, "image/png")], bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inchikey_block_accepts_full_key_and_bare_block() {
        assert_eq!(
            inchikey_block("IISBACLAFKSPIT-UHFFFAOYSA-N").unwrap(),
            "IISBACLAFKSPIT"
        );
        assert_eq!(inchikey_block("iisbaclafkspit").unwrap(), "IISBACLAFKSPIT");
    }

    #[test]
    fn inchikey_block_rejects_short_and_non_letter_input() {
        assert!(matches!(
            inchikey_block("TOOSHORT"),
            Err(AppError::InvalidFilterValue { .. })
        ));
        assert!(matches!(
            inchikey_block("1234567890ABCD"),
            Err(AppError::InvalidFilterValue { .. })
        ));
    }

    #[test]
    fn inchikey_block_rejects_multibyte_input_without_panicking() {
        // 13 ASCII letters followed by a two-byte character: 14 chars,
        // 15 bytes, so a byte-indexed slice at 14 would split the char
        assert!(matches!(
            inchikey_block("AAAAAAAAAAAAAé"),
            Err(AppError::InvalidFilterValue { .. })
        ));
        assert!(matches!(
            inchikey_block("ÀÀÀÀÀÀÀÀÀÀÀÀÀÀ"),
            Err(AppError::InvalidFilterValue { .. })
        ));
    }
}
