//! Result Assembler
//!
//! Renders a query plan into SQL and assembles the rows into a uniform
//! result envelope. Every subtype arm projects the identical column list
//! (absent variant columns are typed NULL casts) so the arms can be
//! combined with UNION ALL, ordered once, and paginated as a single
//! relation. Ordering always ends on internal_id ASC so pagination is
//! stable across requests.

use super::metadata::{parse_document, MetadataDocument};
use super::{QueryPlan, SelectPlan, Subtype};
use crate::errors::{AppError, Result};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, QueryResult, Statement};
use serde::Serialize;

/// Shared projection, identical across all arms. The variant slots are
/// filled per subtype below; order here must match the row mapping.
const SHARED_COLUMNS: &str = "r.internal_id AS internal_id, \
     r.record_type AS record_type, \
     c.dtxsid AS dtxsid, \
     s.preferred_name AS preferred_name, \
     s.casrn AS casrn, \
     s.molecular_weight AS molecular_weight, \
     r.source AS source, \
     r.link AS link, \
     r.experimental AS experimental, \
     r.description AS description, \
     r.data_type AS data_type";

/// Variant slots: (ms_level, splash, ionization_mode, nucleus, frequency,
/// temperature, ir_type, document_name, year_published,
/// has_associated_spectra, metadata).
fn variant_columns(subtype: Subtype) -> String {
    let null = VariantExprs {
        ms_level: "NULL::int",
        splash: "NULL::text",
        ionization_mode: "NULL::text",
        nucleus: "NULL::text",
        frequency: "NULL::float8",
        temperature: "NULL::float8",
        ir_type: "NULL::text",
        document_name: "NULL::text",
        year_published: "NULL::int",
        has_associated_spectra: "NULL::boolean",
        metadata: "NULL::jsonb",
    };

    let exprs = match subtype {
        Subtype::MassSpectrum => VariantExprs {
            ms_level: "t.ms_level",
            splash: "t.splash",
            ionization_mode: "t.ionization_mode",
            metadata: "t.spectrum_metadata",
            ..null
        },
        Subtype::NmrSpectrum => VariantExprs {
            nucleus: "t.nucleus",
            frequency: "t.frequency",
            temperature: "t.temperature",
            metadata: "t.spectrum_metadata",
            ..null
        },
        Subtype::IrSpectrum => VariantExprs {
            ir_type: "t.ir_type",
            metadata: "t.spectrum_metadata",
            ..null
        },
        Subtype::SpectrumPdf => VariantExprs {
            metadata: "t.pdf_metadata",
            ..null
        },
        Subtype::AnalyticalQc => VariantExprs {
            document_name: "t.filename",
            metadata: "t.pdf_metadata",
            ..null
        },
        Subtype::FactSheet => VariantExprs {
            document_name: "t.fact_sheet_name",
            year_published: "t.year_published",
            metadata: "t.pdf_metadata",
            ..null
        },
        Subtype::Method => VariantExprs {
            document_name: "t.method_name",
            year_published: "t.year_published",
            has_associated_spectra: "t.has_associated_spectra",
            metadata: "t.pdf_metadata",
            ..null
        },
    };

    format!(
        "{} AS ms_level, {} AS splash, {} AS ionization_mode, {} AS nucleus, \
         {} AS frequency, {} AS temperature, {} AS ir_type, {} AS document_name, \
         {} AS year_published, {} AS has_associated_spectra, {} AS metadata",
        exprs.ms_level,
        exprs.splash,
        exprs.ionization_mode,
        exprs.nucleus,
        exprs.frequency,
        exprs.temperature,
        exprs.ir_type,
        exprs.document_name,
        exprs.year_published,
        exprs.has_associated_spectra,
        exprs.metadata,
    )
}

struct VariantExprs {
    ms_level: &'static str,
    splash: &'static str,
    ionization_mode: &'static str,
    nucleus: &'static str,
    frequency: &'static str,
    temperature: &'static str,
    ir_type: &'static str,
    document_name: &'static str,
    year_published: &'static str,
    has_associated_spectra: &'static str,
    metadata: &'static str,
}

fn payload_table(subtype: Subtype) -> &'static str {
    match subtype {
        Subtype::MassSpectrum => "mass_spectra",
        Subtype::NmrSpectrum => "nmr_spectra",
        Subtype::IrSpectrum => "ir_spectra",
        Subtype::SpectrumPdf => "spectrum_pdfs",
        Subtype::AnalyticalQc => "analytical_qc",
        Subtype::FactSheet => "fact_sheets",
        Subtype::Method => "methods",
    }
}

fn arm_sql(subtype: Subtype, plan: &SelectPlan) -> String {
    let mut sql = format!(
        "SELECT {}, {} FROM {} t \
         JOIN record_info r ON r.internal_id = t.internal_id \
         JOIN contents c ON c.internal_id = r.internal_id \
         JOIN substances s ON s.dtxsid = c.dtxsid",
        SHARED_COLUMNS,
        variant_columns(subtype),
        payload_table(subtype),
    );

    let clauses: Vec<&str> = plan
        .shared_clauses
        .iter()
        .chain(plan.payload_clauses.iter())
        .map(String::as_str)
        .collect();
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql
}

/// Sorted union of all arms, no pagination.
fn union_sql(plan: &SelectPlan) -> String {
    let arms: Vec<String> = plan
        .subtypes
        .iter()
        .map(|&subtype| arm_sql(subtype, plan))
        .collect();
    format!(
        "SELECT * FROM ({}) results ORDER BY {}",
        arms.join(" UNION ALL "),
        plan.order.to_sql()
    )
}

fn count_sql(plan: &SelectPlan) -> String {
    let arms: Vec<String> = plan
        .subtypes
        .iter()
        .map(|&subtype| arm_sql(subtype, plan))
        .collect();
    format!("SELECT COUNT(*) FROM ({}) results", arms.join(" UNION ALL "))
}

/// Union with LIMIT/OFFSET appended; placeholder numbering continues from
/// the plan's values. Only usable when no post filters apply.
///
/// The page number is client-supplied and unbounded, so the offset math
/// saturates instead of overflowing; a page past the end reads as an
/// empty page, never a wrapped offset.
fn page_sql(plan: &SelectPlan) -> (String, Vec<sea_orm::Value>) {
    let offset = (plan.page - 1)
        .saturating_mul(plan.page_size)
        .min(i64::MAX as u64) as i64;
    let mut values = plan.values.clone();
    values.push((plan.page_size as i64).into());
    values.push(offset.into());
    let sql = format!(
        "{} LIMIT ${} OFFSET ${}",
        union_sql(plan),
        values.len() - 1,
        values.len()
    );
    (sql, values)
}

/// One search hit: the shared record header plus the type-specific fields.
#[derive(Debug, Clone, Serialize)]
pub struct RecordSummary {
    pub internal_id: String,
    pub dtxsid: String,
    pub preferred_name: Option<String>,
    pub casrn: Option<String>,
    pub molecular_weight: Option<f64>,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experimental: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,

    #[serde(flatten)]
    pub payload: RecordPayload,

    #[serde(skip_serializing_if = "MetadataDocument::is_empty")]
    pub metadata: MetadataDocument,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "record_type")]
pub enum RecordPayload {
    #[serde(rename = "Spectrum")]
    Spectrum {
        #[serde(skip_serializing_if = "Option::is_none")]
        ms_level: Option<i32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        splash: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        ionization_mode: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        nucleus: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        frequency: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        temperature: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        ir_type: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        document_name: Option<String>,
    },
    #[serde(rename = "Fact Sheet")]
    FactSheet {
        #[serde(skip_serializing_if = "Option::is_none")]
        document_name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        year_published: Option<i32>,
    },
    #[serde(rename = "Method")]
    Method {
        #[serde(skip_serializing_if = "Option::is_none")]
        document_name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        year_published: Option<i32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        has_associated_spectra: Option<bool>,
    },
}

/// The response envelope for a search: one page of results plus the total
/// match count before slicing.
#[derive(Debug, Clone, Serialize)]
pub struct SearchPage {
    pub results: Vec<RecordSummary>,
    pub total_count: u64,
    pub page: u64,
    pub page_size: u64,
}

impl SearchPage {
    pub fn empty(page: u64, page_size: u64) -> Self {
        SearchPage {
            results: Vec::new(),
            total_count: 0,
            page,
            page_size,
        }
    }
}

fn row_to_summary(row: &QueryResult) -> Result<RecordSummary> {
    let internal_id: String = row.try_get_by_index(0)?;
    let record_type: String = row.try_get_by_index(1)?;
    let dtxsid: String = row.try_get_by_index(2)?;
    let preferred_name: Option<String> = row.try_get_by_index(3)?;
    let casrn: Option<String> = row.try_get_by_index(4)?;
    let molecular_weight: Option<f64> = row.try_get_by_index(5)?;
    let source: String = row.try_get_by_index(6)?;
    let link: Option<String> = row.try_get_by_index(7)?;
    let experimental: Option<bool> = row.try_get_by_index(8)?;
    let description: Option<String> = row.try_get_by_index(9)?;
    let data_type: Option<String> = row.try_get_by_index(10)?;
    let ms_level: Option<i32> = row.try_get_by_index(11)?;
    let splash: Option<String> = row.try_get_by_index(12)?;
    let ionization_mode: Option<String> = row.try_get_by_index(13)?;
    let nucleus: Option<String> = row.try_get_by_index(14)?;
    let frequency: Option<f64> = row.try_get_by_index(15)?;
    let temperature: Option<f64> = row.try_get_by_index(16)?;
    let ir_type: Option<String> = row.try_get_by_index(17)?;
    let document_name: Option<String> = row.try_get_by_index(18)?;
    let year_published: Option<i32> = row.try_get_by_index(19)?;
    let has_associated_spectra: Option<bool> = row.try_get_by_index(20)?;
    let metadata_raw: Option<serde_json::Value> = row.try_get_by_index(21)?;

    let payload = match record_type.as_str() {
        "Spectrum" => RecordPayload::Spectrum {
            ms_level,
            splash,
            ionization_mode,
            nucleus,
            frequency,
            temperature,
            ir_type,
            document_name,
        },
        "Fact Sheet" => RecordPayload::FactSheet {
            document_name,
            year_published,
        },
        "Method" => RecordPayload::Method {
            document_name,
            year_published,
            has_associated_spectra,
        },
        other => {
            return Err(AppError::Internal {
                message: format!("record {} has unknown record_type {:?}", internal_id, other),
            })
        }
    };

    Ok(RecordSummary {
        internal_id,
        dtxsid,
        preferred_name,
        casrn,
        molecular_weight,
        source,
        link,
        experimental,
        description,
        data_type,
        payload,
        metadata: parse_document(metadata_raw),
    })
}

/// Slice one page out of an in-memory result set, preserving order.
/// Saturates on oversized page numbers rather than overflowing.
fn paginate(results: Vec<RecordSummary>, page: u64, page_size: u64) -> (Vec<RecordSummary>, u64) {
    let total = results.len() as u64;
    let start = (page - 1).saturating_mul(page_size).min(total) as usize;
    let end = start.saturating_add(page_size as usize).min(total as usize);
    (results[start..end].to_vec(), total)
}

/// Run a plan to completion. Metadata filters cannot be pushed into SQL
/// (the documents are schemaless), so plans carrying them fetch the full
/// sorted union and filter before slicing; total_count then reflects the
/// filtered set.
pub async fn execute(db: &DatabaseConnection, plan: QueryPlan) -> Result<SearchPage> {
    let plan = match plan {
        QueryPlan::Empty { page, page_size } => {
            crate::metrics::record_search_short_circuit();
            return Ok(SearchPage::empty(page, page_size));
        }
        QueryPlan::Select(plan) => plan,
    };

    if plan.post_filters.is_empty() {
        let count_stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            count_sql(&plan),
            plan.values.clone(),
        );
        let total_count: i64 = db
            .query_one(count_stmt)
            .await?
            .ok_or_else(|| AppError::Internal {
                message: "count query returned no row".into(),
            })?
            .try_get_by_index(0)?;

        let (sql, values) = page_sql(&plan);
        let rows = db
            .query_all(Statement::from_sql_and_values(DbBackend::Postgres, sql, values))
            .await?;
        let results = rows.iter().map(row_to_summary).collect::<Result<Vec<_>>>()?;

        return Ok(SearchPage {
            results,
            total_count: total_count as u64,
            page: plan.page,
            page_size: plan.page_size,
        });
    }

    let rows = db
        .query_all(Statement::from_sql_and_values(
            DbBackend::Postgres,
            union_sql(&plan),
            plan.values.clone(),
        ))
        .await?;

    let mut results = Vec::with_capacity(rows.len());
    for row in &rows {
        let summary = row_to_summary(row)?;
        if plan.post_filters.iter().all(|f| f.matches(&summary.metadata)) {
            results.push(summary);
        }
    }

    let (results, total_count) = paginate(results, plan.page, plan.page_size);
    Ok(SearchPage {
        results,
        total_count,
        page: plan.page,
        page_size: plan.page_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;
    use crate::search::{RangeFilter, SearchRequest, SortSpec};

    fn plan(request: SearchRequest) -> SelectPlan {
        match request.build(&SearchConfig::default()).unwrap() {
            QueryPlan::Select(plan) => plan,
            QueryPlan::Empty { .. } => panic!("expected select plan"),
        }
    }

    #[test]
    fn every_arm_projects_the_same_column_list() {
        let plan = plan(SearchRequest::default());
        let sql = union_sql(&plan);
        let arms: Vec<&str> = sql.split(" UNION ALL ").collect();
        assert_eq!(arms.len(), 7);
        let aliases = |arm: &str| arm.matches(" AS ").count();
        let expected = aliases(arms[0]);
        assert_eq!(expected, 22);
        for arm in &arms {
            assert_eq!(aliases(arm), expected);
        }
    }

    #[test]
    fn order_by_applies_to_the_whole_union() {
        let plan = plan(SearchRequest {
            sort: Some(SortSpec { field: "source".into(), descending: true }),
            ..Default::default()
        });
        let sql = union_sql(&plan);
        let order_at = sql.rfind("ORDER BY").unwrap();
        let last_union_at = sql.rfind("UNION ALL").unwrap();
        assert!(order_at > last_union_at);
        assert!(sql.ends_with("ORDER BY source DESC, internal_id ASC"));
    }

    #[test]
    fn pagination_placeholders_continue_plan_numbering() {
        let p = plan(SearchRequest {
            formula: Some("C8H10N4O2".into()),
            page: Some(3),
            page_size: Some(50),
            ..Default::default()
        });
        assert_eq!(p.values.len(), 1);
        let (sql, values) = page_sql(&p);
        assert_eq!(values.len(), 3);
        assert!(sql.ends_with("LIMIT $2 OFFSET $3"));
        assert_eq!(values[1], sea_orm::Value::from(50i64));
        assert_eq!(values[2], sea_orm::Value::from(100i64));
    }

    #[test]
    fn narrowed_plan_emits_only_matching_arms() {
        let p = plan(SearchRequest {
            year_published: Some(RangeFilter { min: Some(2010), max: None }),
            ..Default::default()
        });
        let sql = union_sql(&p);
        assert!(sql.contains("FROM fact_sheets t"));
        assert!(sql.contains("FROM methods t"));
        assert!(!sql.contains("FROM mass_spectra t"));
        assert!(sql.contains("t.year_published >= $1"));
    }

    #[test]
    fn clauses_repeat_verbatim_in_each_arm() {
        let p = plan(SearchRequest {
            formula: Some("C2H6O".into()),
            ..Default::default()
        });
        let sql = union_sql(&p);
        assert_eq!(sql.matches("s.molecular_formula = $1").count(), 7);
    }

    #[test]
    fn count_query_wraps_the_same_union() {
        let p = plan(SearchRequest::default());
        let sql = count_sql(&p);
        assert!(sql.starts_with("SELECT COUNT(*) FROM ("));
        assert!(!sql.contains("ORDER BY"));
        assert_eq!(sql.matches("UNION ALL").count(), 6);
    }

    fn summary(id: &str) -> RecordSummary {
        RecordSummary {
            internal_id: id.to_string(),
            dtxsid: "DTXSID7020182".into(),
            preferred_name: Some("Bisphenol A".into()),
            casrn: Some("80-05-7".into()),
            molecular_weight: Some(228.29),
            source: "MoNA".into(),
            link: None,
            experimental: Some(true),
            description: None,
            data_type: Some("Mass Spectrum".into()),
            payload: RecordPayload::Spectrum {
                ms_level: Some(2),
                splash: None,
                ionization_mode: None,
                nucleus: None,
                frequency: None,
                temperature: None,
                ir_type: None,
                document_name: None,
            },
            metadata: MetadataDocument::new(),
        }
    }

    #[test]
    fn paginate_preserves_order_and_counts_before_slicing() {
        let all: Vec<RecordSummary> = (0..7).map(|i| summary(&format!("r{}", i))).collect();
        let (page, total) = paginate(all, 2, 3);
        assert_eq!(total, 7);
        let ids: Vec<&str> = page.iter().map(|r| r.internal_id.as_str()).collect();
        assert_eq!(ids, vec!["r3", "r4", "r5"]);
    }

    #[test]
    fn oversized_page_number_saturates_the_offset() {
        let p = plan(SearchRequest {
            page: Some(u64::MAX),
            page_size: Some(50),
            ..Default::default()
        });
        let (sql, values) = page_sql(&p);
        assert!(sql.ends_with("LIMIT $1 OFFSET $2"));
        assert_eq!(values[0], sea_orm::Value::from(50i64));
        assert_eq!(values[1], sea_orm::Value::from(i64::MAX));
    }

    #[test]
    fn paginate_with_oversized_page_is_empty_with_true_total() {
        let all: Vec<RecordSummary> = (0..3).map(|i| summary(&format!("r{}", i))).collect();
        let (page, total) = paginate(all, u64::MAX, 25);
        assert_eq!(total, 3);
        assert!(page.is_empty());
    }

    #[test]
    fn paginate_past_the_end_is_empty_with_true_total() {
        let all: Vec<RecordSummary> = (0..4).map(|i| summary(&format!("r{}", i))).collect();
        let (page, total) = paginate(all, 5, 25);
        assert_eq!(total, 4);
        assert!(page.is_empty());
    }

    #[test]
    fn record_type_tag_serializes_with_display_names() {
        let json = serde_json::to_value(summary("MoNA-1")).unwrap();
        assert_eq!(json["record_type"], "Spectrum");
        assert_eq!(json["ms_level"], 2);

        let mut fact_sheet = summary("CFSRE-9");
        fact_sheet.payload = RecordPayload::FactSheet {
            document_name: Some("Fentanyl analogue sheet".into()),
            year_published: Some(2021),
        };
        let json = serde_json::to_value(fact_sheet).unwrap();
        assert_eq!(json["record_type"], "Fact Sheet");
        assert_eq!(json["year_published"], 2021);
    }
}
