//! Repository pattern for data access
//!
//! Single-record fetches and substance lookups go through SeaORM entity
//! finders; anything that crosses the record/substance join or aggregates
//! uses raw parameterized SQL on the same pool. Searches delegate to the
//! planner and assembler in `crate::search`.

use super::models::*;
use super::DbPool;
use crate::config::SearchConfig;
use crate::errors::{AppError, Result};
use crate::search::{self, SearchPage, SearchRequest};
use crate::spectrum::{clean_year, parse_peaks, Peak};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DbBackend, EntityTrait, FromQueryResult,
    QueryFilter, QueryOrder, Set, Statement,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// Repository for all record-store access
#[derive(Clone)]
pub struct Repository {
    pool: DbPool,
}

/// A record header joined with its type-specific payload and the
/// substances it is mapped to.
#[derive(Debug, Serialize)]
pub struct RecordDetail {
    #[serde(flatten)]
    pub record: RecordInfo,
    pub substances: Vec<Substance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<RecordDetailPayload>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum RecordDetailPayload {
    MassSpectrum(MassSpectrum),
    NmrSpectrum(NmrSpectrum),
    IrSpectrum(IrSpectrum),
    SpectrumPdf(SpectrumPdf),
    AnalyticalQc(AnalyticalQc),
    FactSheet(FactSheet),
    Method(Method),
}

/// A spectrum payload with peak text parsed into (m/z, intensity) pairs
/// where the technique stores peaks.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SpectrumDetail {
    Mass {
        #[serde(flatten)]
        spectrum: MassSpectrum,
        peaks: Vec<Peak>,
    },
    Nmr {
        #[serde(flatten)]
        spectrum: NmrSpectrum,
        peaks: Vec<Peak>,
    },
    Ir {
        #[serde(flatten)]
        spectrum: IrSpectrum,
        peaks: Vec<Peak>,
    },
}

/// Per-source, per-record-type counts for one substance.
#[derive(Debug, Serialize, FromQueryResult)]
pub struct RecordCounts {
    pub source: String,
    pub record_type: String,
    pub count: i64,
}

/// Which payload table holds a record's PDF, given its record_type.
/// Analytical QC reports share the Spectrum record_type but live in their
/// own table, distinguished by the internal_id prefix.
fn pdf_table_for(record_type: &str, internal_id: &str) -> Option<&'static str> {
    match record_type {
        "Spectrum" if internal_id.starts_with("AnalyticalQC-") => Some("analytical_qc"),
        "Spectrum" => Some("spectrum_pdfs"),
        "Fact Sheet" => Some("fact_sheets"),
        "Method" => Some("methods"),
        _ => None,
    }
}

/// Some sources carry the publication date only inside the document
/// metadata, as free-form text. Fall back to it when the typed column
/// is empty.
fn year_from_metadata(meta: Option<&serde_json::Value>) -> Option<i32> {
    let doc = meta?.as_object()?;
    ["year", "date", "publication_date"].iter().find_map(|key| {
        doc.get(*key).and_then(|value| match value {
            serde_json::Value::String(s) => clean_year(s),
            serde_json::Value::Number(n) => n.as_i64().map(|y| y as i32),
            _ => None,
        })
    })
}

impl Repository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    // ===== Search =====

    pub async fn search(
        &self,
        request: &SearchRequest,
        config: &SearchConfig,
    ) -> Result<SearchPage> {
        let plan = request.build(config)?;
        search::assembler::execute(self.pool.read(), plan).await
    }

    // ===== Record operations =====

    pub async fn record_detail(&self, internal_id: &str) -> Result<RecordDetail> {
        let record = RecordInfoEntity::find_by_id(internal_id)
            .one(self.pool.read())
            .await?
            .ok_or_else(|| AppError::RecordNotFound {
                id: internal_id.to_string(),
            })?;

        let substances = self.substances_for_ids(&[internal_id.to_string()]).await?;
        let payload = self.record_payload(&record).await?;

        Ok(RecordDetail {
            record,
            substances,
            payload,
        })
    }

    async fn record_payload(&self, record: &RecordInfo) -> Result<Option<RecordDetailPayload>> {
        let db = self.pool.read();
        let id = record.internal_id.as_str();

        let payload = match record.record_type.as_str() {
            "Spectrum" => {
                if id.starts_with("AnalyticalQC-") {
                    AnalyticalQcEntity::find_by_id(id)
                        .one(db)
                        .await?
                        .map(RecordDetailPayload::AnalyticalQc)
                } else if let Some(ms) = MassSpectrumEntity::find_by_id(id).one(db).await? {
                    Some(RecordDetailPayload::MassSpectrum(ms))
                } else if let Some(nmr) = NmrSpectrumEntity::find_by_id(id).one(db).await? {
                    Some(RecordDetailPayload::NmrSpectrum(nmr))
                } else if let Some(ir) = IrSpectrumEntity::find_by_id(id).one(db).await? {
                    Some(RecordDetailPayload::IrSpectrum(ir))
                } else {
                    SpectrumPdfEntity::find_by_id(id)
                        .one(db)
                        .await?
                        .map(RecordDetailPayload::SpectrumPdf)
                }
            }
            "Fact Sheet" => FactSheetEntity::find_by_id(id).one(db).await?.map(|mut fs| {
                if fs.year_published.is_none() {
                    fs.year_published = year_from_metadata(fs.pdf_metadata.as_ref());
                }
                RecordDetailPayload::FactSheet(fs)
            }),
            "Method" => MethodEntity::find_by_id(id).one(db).await?.map(|mut m| {
                if m.year_published.is_none() {
                    m.year_published = year_from_metadata(m.pdf_metadata.as_ref());
                }
                RecordDetailPayload::Method(m)
            }),
            _ => None,
        };
        Ok(payload)
    }

    /// Fetch a spectrum payload by record id, with peak text parsed.
    pub async fn spectrum_by_id(&self, internal_id: &str) -> Result<SpectrumDetail> {
        let db = self.pool.read();

        if let Some(spectrum) = MassSpectrumEntity::find_by_id(internal_id).one(db).await? {
            let peaks = parse_peaks(spectrum.spectrum.as_deref().unwrap_or_default())?;
            return Ok(SpectrumDetail::Mass { spectrum, peaks });
        }
        if let Some(spectrum) = NmrSpectrumEntity::find_by_id(internal_id).one(db).await? {
            let peaks = parse_peaks(spectrum.spectrum.as_deref().unwrap_or_default())?;
            return Ok(SpectrumDetail::Nmr { spectrum, peaks });
        }
        if let Some(spectrum) = IrSpectrumEntity::find_by_id(internal_id).one(db).await? {
            let peaks = parse_peaks(spectrum.spectrum.as_deref().unwrap_or_default())?;
            return Ok(SpectrumDetail::Ir { spectrum, peaks });
        }

        Err(AppError::NotFound {
            resource_type: "spectrum".into(),
            id: internal_id.to_string(),
        })
    }

    /// Fetch the PDF bytes for a document-backed record, routed by the
    /// record's type.
    pub async fn pdf_by_id(&self, internal_id: &str) -> Result<Vec<u8>> {
        let db = self.pool.read();

        let record = RecordInfoEntity::find_by_id(internal_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::RecordNotFound {
                id: internal_id.to_string(),
            })?;

        let pdf_data = match pdf_table_for(&record.record_type, internal_id) {
            Some("analytical_qc") => AnalyticalQcEntity::find_by_id(internal_id)
                .one(db)
                .await?
                .and_then(|m| m.pdf_data),
            Some("spectrum_pdfs") => SpectrumPdfEntity::find_by_id(internal_id)
                .one(db)
                .await?
                .and_then(|m| m.pdf_data),
            Some("fact_sheets") => FactSheetEntity::find_by_id(internal_id)
                .one(db)
                .await?
                .and_then(|m| m.pdf_data),
            Some("methods") => MethodEntity::find_by_id(internal_id)
                .one(db)
                .await?
                .and_then(|m| m.pdf_data),
            _ => None,
        };

        pdf_data.ok_or_else(|| AppError::NotFound {
            resource_type: "pdf".into(),
            id: internal_id.to_string(),
        })
    }

    // ===== Substance operations =====

    pub async fn substance_by_dtxsid(&self, dtxsid: &str) -> Result<Substance> {
        SubstanceEntity::find_by_id(dtxsid)
            .one(self.pool.read())
            .await?
            .ok_or_else(|| AppError::SubstanceNotFound {
                dtxsid: dtxsid.to_string(),
            })
    }

    pub async fn classyfire_for_dtxsid(&self, dtxsid: &str) -> Result<Option<ClassyFire>> {
        Ok(ClassyFireEntity::find_by_id(dtxsid)
            .one(self.pool.read())
            .await?)
    }

    pub async fn synonyms_for_dtxsid(&self, dtxsid: &str) -> Result<Vec<String>> {
        let rows = SynonymEntity::find()
            .filter(SynonymColumn::Dtxsid.eq(dtxsid))
            .order_by_asc(SynonymColumn::Synonym)
            .all(self.pool.read())
            .await?;
        Ok(rows.into_iter().map(|s| s.synonym).collect())
    }

    pub async fn functional_uses_for_dtxsid(&self, dtxsid: &str) -> Result<Vec<String>> {
        let rows = FunctionalUseEntity::find()
            .filter(FunctionalUseColumn::Dtxsid.eq(dtxsid))
            .order_by_asc(FunctionalUseColumn::UseClass)
            .all(self.pool.read())
            .await?;
        Ok(rows.into_iter().map(|r| r.use_class).collect())
    }

    pub async fn additional_sources_for_dtxsid(
        &self,
        dtxsid: &str,
    ) -> Result<Vec<AdditionalSource>> {
        Ok(AdditionalSourceEntity::find()
            .filter(AdditionalSourceColumn::Dtxsid.eq(dtxsid))
            .order_by_asc(AdditionalSourceColumn::SourceName)
            .all(self.pool.read())
            .await?)
    }

    pub async fn additional_substance_info(
        &self,
        dtxsid: &str,
    ) -> Result<Option<AdditionalSubstanceInfo>> {
        Ok(AdditionalSubstanceInfoEntity::find_by_id(dtxsid)
            .one(self.pool.read())
            .await?)
    }

    pub async fn substance_image(&self, dtxsid: &str) -> Result<Vec<u8>> {
        SubstanceImageEntity::find_by_id(dtxsid)
            .one(self.pool.read())
            .await?
            .and_then(|m| m.png_image)
            .ok_or_else(|| AppError::NotFound {
                resource_type: "substance image".into(),
                id: dtxsid.to_string(),
            })
    }

    /// How many records each source holds for a substance, by record type.
    pub async fn record_counts_by_dtxsid(&self, dtxsid: &str) -> Result<Vec<RecordCounts>> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            "SELECT r.source AS source, r.record_type AS record_type, COUNT(*) AS count \
             FROM record_info r \
             JOIN contents c ON c.internal_id = r.internal_id \
             WHERE c.dtxsid = $1 \
             GROUP BY r.source, r.record_type \
             ORDER BY r.source, r.record_type",
            [dtxsid.into()],
        );
        Ok(RecordCounts::find_by_statement(stmt)
            .all(self.pool.read())
            .await?)
    }

    /// All record headers mapped to a substance.
    pub async fn records_for_dtxsid(&self, dtxsid: &str) -> Result<Vec<RecordInfo>> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            "SELECT r.* FROM record_info r \
             JOIN contents c ON c.internal_id = r.internal_id \
             WHERE c.dtxsid = $1 \
             ORDER BY r.internal_id",
            [dtxsid.into()],
        );
        Ok(RecordInfoEntity::find()
            .from_raw_sql(stmt)
            .all(self.pool.read())
            .await?)
    }

    // ===== Bulk lookups =====

    /// dtxsid -> preferred name, for a batch of substances.
    pub async fn names_for_dtxsids(
        &self,
        dtxsids: &[String],
    ) -> Result<BTreeMap<String, Option<String>>> {
        if dtxsids.is_empty() {
            return Ok(BTreeMap::new());
        }
        let rows = SubstanceEntity::find()
            .filter(SubstanceColumn::Dtxsid.is_in(dtxsids.iter().cloned()))
            .all(self.pool.read())
            .await?;
        Ok(rows
            .into_iter()
            .map(|s| (s.dtxsid, s.preferred_name))
            .collect())
    }

    /// Substances mapped to any of the given record ids.
    pub async fn substances_for_ids(&self, internal_ids: &[String]) -> Result<Vec<Substance>> {
        if internal_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mappings = ContentsEntity::find()
            .filter(ContentsColumn::InternalId.is_in(internal_ids.iter().cloned()))
            .all(self.pool.read())
            .await?;
        let dtxsids: Vec<String> = mappings.into_iter().map(|c| c.dtxsid).collect();
        if dtxsids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(SubstanceEntity::find()
            .filter(SubstanceColumn::Dtxsid.is_in(dtxsids))
            .order_by_asc(SubstanceColumn::Dtxsid)
            .all(self.pool.read())
            .await?)
    }

    /// dtxsid -> record ids, for a batch of substances.
    pub async fn ids_for_substances(
        &self,
        dtxsids: &[String],
    ) -> Result<BTreeMap<String, Vec<String>>> {
        if dtxsids.is_empty() {
            return Ok(BTreeMap::new());
        }
        let mappings = ContentsEntity::find()
            .filter(ContentsColumn::Dtxsid.is_in(dtxsids.iter().cloned()))
            .order_by_asc(ContentsColumn::InternalId)
            .all(self.pool.read())
            .await?;
        let mut out: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for mapping in mappings {
            out.entry(mapping.dtxsid).or_default().push(mapping.internal_id);
        }
        Ok(out)
    }

    pub async fn formula_search(&self, formula: &str) -> Result<Vec<Substance>> {
        Ok(SubstanceEntity::find()
            .filter(SubstanceColumn::MolecularFormula.eq(formula))
            .order_by_asc(SubstanceColumn::Dtxsid)
            .all(self.pool.read())
            .await?)
    }

    /// Match substances on the 14-character InChIKey connectivity block,
    /// against both stored key variants.
    pub async fn inchikey_first_block_search(&self, first_block: &str) -> Result<Vec<Substance>> {
        let prefix = format!("{}%", first_block);
        Ok(SubstanceEntity::find()
            .filter(
                Condition::any()
                    .add(SubstanceColumn::JchemInchikey.like(&prefix))
                    .add(SubstanceColumn::IndigoInchikey.like(&prefix)),
            )
            .order_by_asc(SubstanceColumn::Dtxsid)
            .all(self.pool.read())
            .await?)
    }

    // ===== Summary operations =====

    pub async fn database_summary(&self) -> Result<Vec<DatabaseSummary>> {
        Ok(DatabaseSummaryEntity::find()
            .order_by_asc(DatabaseSummaryColumn::Source)
            .order_by_asc(DatabaseSummaryColumn::RecordType)
            .all(self.pool.read())
            .await?)
    }

    pub async fn data_sources(&self) -> Result<Vec<DataSourceInfo>> {
        Ok(DataSourceInfoEntity::find()
            .order_by_asc(DataSourceInfoColumn::Source)
            .all(self.pool.read())
            .await?)
    }

    // ===== Link operations =====

    /// Record a method/spectrum association. Both ids must resolve to
    /// records of the expected type.
    pub async fn insert_method_spectrum_link(
        &self,
        method_id: &str,
        spectrum_id: &str,
    ) -> Result<MethodSpectrumLink> {
        self.expect_record_type(method_id, "Method").await?;
        self.expect_record_type(spectrum_id, "Spectrum").await?;

        let link = MethodSpectrumLinkActiveModel {
            method_id: Set(method_id.to_string()),
            spectrum_id: Set(spectrum_id.to_string()),
        };
        Ok(link.insert(self.pool.write()).await?)
    }

    async fn expect_record_type(&self, internal_id: &str, expected: &str) -> Result<()> {
        let record = RecordInfoEntity::find_by_id(internal_id)
            .one(self.pool.read())
            .await?
            .ok_or_else(|| AppError::RecordNotFound {
                id: internal_id.to_string(),
            })?;
        if record.record_type != expected {
            return Err(AppError::LinkTypeMismatch {
                id: internal_id.to_string(),
                expected: expected.to_string(),
                actual: record.record_type,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_falls_back_to_document_metadata() {
        let meta = serde_json::json!({ "date": "4/30/2019", "publisher": "EPA" });
        assert_eq!(year_from_metadata(Some(&meta)), Some(2019));

        let meta = serde_json::json!({ "year": 2003 });
        assert_eq!(year_from_metadata(Some(&meta)), Some(2003));

        let meta = serde_json::json!({ "date": "unknown" });
        assert_eq!(year_from_metadata(Some(&meta)), None);
        assert_eq!(year_from_metadata(None), None);
    }

    #[test]
    fn pdf_routing_follows_record_type_and_id_prefix() {
        assert_eq!(pdf_table_for("Spectrum", "MoNA-123"), Some("spectrum_pdfs"));
        assert_eq!(
            pdf_table_for("Spectrum", "AnalyticalQC-DTXSID123"),
            Some("analytical_qc")
        );
        assert_eq!(pdf_table_for("Fact Sheet", "CFSRE-7"), Some("fact_sheets"));
        assert_eq!(pdf_table_for("Method", "ECM-42"), Some("methods"));
        assert_eq!(pdf_table_for("Monograph", "X-1"), None);
    }
}
