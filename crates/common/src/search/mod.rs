//! Filter Predicate Builder
//!
//! Translates a structured search request (substance identifiers, spectral
//! types, numeric ranges, classification paths, source filters, metadata
//! predicates) into a query plan over the joined record tables. All
//! criteria in one request are AND-combined; validation runs completely
//! before any SQL executes. When the requested filters are structurally
//! unsatisfiable (a source that cannot supply any requested record type,
//! or contradictory payload filters) the plan short-circuits to an empty
//! result without touching storage.

pub mod assembler;
pub mod metadata;
pub mod sources;

pub use assembler::{RecordPayload, RecordSummary, SearchPage};
pub use metadata::{MetadataDocument, MetadataFilter, MetadataOp, MetadataValue};

use crate::config::SearchConfig;
use crate::errors::{AppError, Result};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Record variants, tagged by record_info.record_type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RecordType {
    #[serde(rename = "Spectrum")]
    Spectrum,
    #[serde(rename = "Fact Sheet")]
    FactSheet,
    #[serde(rename = "Method")]
    Method,
}

impl RecordType {
    pub const ALL: &'static [RecordType] =
        &[RecordType::Spectrum, RecordType::FactSheet, RecordType::Method];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::Spectrum => "Spectrum",
            RecordType::FactSheet => "Fact Sheet",
            RecordType::Method => "Method",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|rt| rt.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

/// Spectral technique domain for the spectrum_types filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SpectrumType {
    #[serde(rename = "Mass Spectrum")]
    Mass,
    #[serde(rename = "NMR Spectrum")]
    Nmr,
    #[serde(rename = "IR Spectrum")]
    Ir,
}

impl SpectrumType {
    pub const ALL: &'static [SpectrumType] =
        &[SpectrumType::Mass, SpectrumType::Nmr, SpectrumType::Ir];

    pub fn as_str(&self) -> &'static str {
        match self {
            SpectrumType::Mass => "Mass Spectrum",
            SpectrumType::Nmr => "NMR Spectrum",
            SpectrumType::Ir => "IR Spectrum",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|st| st.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

/// One per-subtype query arm of the union. Every subtype maps to exactly
/// one payload table and one record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Subtype {
    MassSpectrum,
    NmrSpectrum,
    IrSpectrum,
    SpectrumPdf,
    AnalyticalQc,
    FactSheet,
    Method,
}

impl Subtype {
    pub const ALL: &'static [Subtype] = &[
        Subtype::MassSpectrum,
        Subtype::NmrSpectrum,
        Subtype::IrSpectrum,
        Subtype::SpectrumPdf,
        Subtype::AnalyticalQc,
        Subtype::FactSheet,
        Subtype::Method,
    ];

    pub fn record_type(&self) -> RecordType {
        match self {
            Subtype::MassSpectrum
            | Subtype::NmrSpectrum
            | Subtype::IrSpectrum
            | Subtype::SpectrumPdf
            | Subtype::AnalyticalQc => RecordType::Spectrum,
            Subtype::FactSheet => RecordType::FactSheet,
            Subtype::Method => RecordType::Method,
        }
    }
}

/// Inclusive numeric range; a missing bound is unbounded on that side.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RangeFilter<T> {
    pub min: Option<T>,
    pub max: Option<T>,
}

impl<T: PartialOrd + Copy + Into<f64>> RangeFilter<T> {
    pub fn validate(&self, field: &str) -> Result<()> {
        if let (Some(lo), Some(hi)) = (self.min, self.max) {
            if lo > hi {
                return Err(AppError::InvalidRange {
                    field: field.to_string(),
                    lower: lo.into(),
                    upper: hi.into(),
                });
            }
        }
        Ok(())
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// Per-level ClassyFire path filter. Each provided level constrains that
/// level only; it does not cascade to descendants. Substances without a
/// classification row never match.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassificationFilter {
    pub kingdom: Option<String>,
    pub superklass: Option<String>,
    pub klass: Option<String>,
    pub subklass: Option<String>,
    pub direct_parent: Option<String>,
}

impl ClassificationFilter {
    fn levels(&self) -> Vec<(&'static str, &str)> {
        [
            ("kingdom", self.kingdom.as_deref()),
            ("superklass", self.superklass.as_deref()),
            ("klass", self.klass.as_deref()),
            ("subklass", self.subklass.as_deref()),
            ("direct_parent", self.direct_parent.as_deref()),
        ]
        .into_iter()
        .filter_map(|(col, v)| v.map(|v| (col, v)))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.levels().is_empty()
    }
}

/// Requested result ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    #[serde(default)]
    pub descending: bool,
}

/// Whitelisted sort fields; each names a column of the union projection.
pub const SORT_FIELDS: &[&str] = &[
    "internal_id",
    "preferred_name",
    "casrn",
    "molecular_weight",
    "source",
    "record_type",
    "data_type",
    "year_published",
];

/// Validated ordering carried by the plan. internal_id is always the
/// final tiebreaker so pagination is deterministic under duplicate keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub field: &'static str,
    pub descending: bool,
}

impl OrderBy {
    pub fn to_sql(&self) -> String {
        let dir = if self.descending { "DESC" } else { "ASC" };
        if self.field == "internal_id" {
            format!("internal_id {}", dir)
        } else {
            format!("{} {}, internal_id ASC", self.field, dir)
        }
    }
}

/// What kind of identifier a free-text substance term looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    Dtxsid,
    Casrn,
    Inchikey,
    Name,
}

fn casrn_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]+-[0-9]{2}-[0-9]$").unwrap())
}

fn inchikey_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z]{14}(-[A-Z]{8}[SN][A-Z]-[A-Z])?$").unwrap())
}

fn dtxsid_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^DTXSID[0-9]+$").unwrap())
}

/// Classify a search term as a DTXSID, CASRN, InChIKey (full or first
/// block), or a plain name.
pub fn classify_search_term(term: &str) -> IdentifierKind {
    let term = term.trim();
    if dtxsid_re().is_match(term) {
        IdentifierKind::Dtxsid
    } else if casrn_re().is_match(term) {
        IdentifierKind::Casrn
    } else if inchikey_re().is_match(term) {
        IdentifierKind::Inchikey
    } else {
        IdentifierKind::Name
    }
}

/// The configuration object the endpoint layer builds from a request.
/// Every field is optional; present fields are AND-combined.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequest {
    /// Free-text substance identifier: DTXSID, CASRN, InChIKey, or name
    pub substance: Option<String>,

    /// Exact molecular formula
    pub formula: Option<String>,

    /// Record type domain: "Spectrum", "Fact Sheet", "Method"
    pub record_types: Option<Vec<String>>,

    /// Spectral technique domain: "Mass Spectrum", "NMR Spectrum", "IR Spectrum"
    pub spectrum_types: Option<Vec<String>>,

    /// Source domain, validated against the source registry
    pub sources: Option<Vec<String>>,

    /// Membership test against record_info.methodologies
    pub methodology: Option<String>,

    pub molecular_weight: Option<RangeFilter<f64>>,
    pub monoisotopic_mass: Option<RangeFilter<f64>>,
    pub ms_level: Option<RangeFilter<i32>>,
    pub frequency: Option<RangeFilter<f64>>,
    pub temperature: Option<RangeFilter<f64>>,
    pub year_published: Option<RangeFilter<i32>>,

    pub classification: Option<ClassificationFilter>,

    pub metadata: Option<Vec<MetadataFilter>>,

    pub sort: Option<SortSpec>,

    /// 1-based page number
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

/// Output of the predicate builder.
#[derive(Debug)]
pub enum QueryPlan {
    /// Structurally unsatisfiable request; no SQL runs.
    Empty { page: u64, page_size: u64 },

    Select(SelectPlan),
}

/// A satisfiable plan: one query arm per subtype sharing a single
/// positional-parameter list, plus filters evaluated after the fetch.
#[derive(Debug)]
pub struct SelectPlan {
    pub subtypes: Vec<Subtype>,

    /// Clauses over the shared aliases r (record_info), c (contents),
    /// s (substances); identical in every arm.
    pub shared_clauses: Vec<String>,

    /// Clauses over the payload alias t; only applied to arms whose
    /// payload table carries the column (guaranteed by subtype narrowing).
    pub payload_clauses: Vec<String>,

    /// Positional values; placeholders are numbered across both clause
    /// lists and may repeat across arms.
    pub values: Vec<sea_orm::Value>,

    /// Metadata filters evaluated typed-on-read after the sorted fetch.
    pub post_filters: Vec<MetadataFilter>,

    pub order: OrderBy,
    pub page: u64,
    pub page_size: u64,
}

/// Incremental clause/value accumulator. Placeholders are numbered in
/// bind order; the assembler may append its own (LIMIT/OFFSET) afterwards.
#[derive(Debug, Default)]
struct PredicateBuilder {
    shared: Vec<String>,
    payload: Vec<String>,
    values: Vec<sea_orm::Value>,
}

impl PredicateBuilder {
    fn bind<V: Into<sea_orm::Value>>(&mut self, value: V) -> String {
        self.values.push(value.into());
        format!("${}", self.values.len())
    }

    fn shared(&mut self, clause: String) {
        self.shared.push(clause);
    }

    fn payload(&mut self, clause: String) {
        self.payload.push(clause);
    }

    fn range<T>(&mut self, column: &str, filter: &RangeFilter<T>, shared: bool)
    where
        T: Into<sea_orm::Value> + Copy,
    {
        let mut parts = Vec::new();
        if let Some(lo) = filter.min {
            let p = self.bind(lo);
            parts.push(format!("{} >= {}", column, p));
        }
        if let Some(hi) = filter.max {
            let p = self.bind(hi);
            parts.push(format!("{} <= {}", column, p));
        }
        for clause in parts {
            if shared {
                self.shared(clause);
            } else {
                self.payload(clause);
            }
        }
    }
}

impl SearchRequest {
    /// Validate every criterion and produce a query plan. No SQL executes
    /// here; all domain and range errors surface before storage is touched.
    pub fn build(&self, config: &SearchConfig) -> Result<QueryPlan> {
        let page = self.page.unwrap_or(1).max(1);
        let page_size = self
            .page_size
            .unwrap_or(config.default_page_size)
            .clamp(1, config.max_page_size);

        // Domain validation first: enum-like filters reject unknown values.
        let record_types = self.validated_record_types()?;
        let spectrum_types = self.validated_spectrum_types()?;
        let sources = self.validated_sources()?;
        let order = self.validated_order()?;

        self.validate_ranges()?;
        let post_filters = self.metadata.clone().unwrap_or_default();
        for filter in &post_filters {
            filter.validate()?;
        }

        // Structural narrowing: which subtype arms can satisfy the request.
        let subtypes = self.narrowed_subtypes(&record_types, &spectrum_types);
        if subtypes.is_empty() {
            return Ok(QueryPlan::Empty { page, page_size });
        }

        // A source filter that cannot supply any surviving record type
        // makes the request unsatisfiable without running a query.
        if let Some(ref sources) = sources {
            let effective: BTreeSet<RecordType> =
                subtypes.iter().map(|s| s.record_type()).collect();
            let reachable = sources
                .iter()
                .any(|s| s.record_types.iter().any(|rt| effective.contains(rt)));
            if !reachable {
                return Ok(QueryPlan::Empty { page, page_size });
            }
        }

        let mut builder = PredicateBuilder::default();

        if let Some(ref term) = self.substance {
            if !term.trim().is_empty() {
                self.substance_clause(&mut builder, term);
            }
        }

        if let Some(ref formula) = self.formula {
            let p = builder.bind(formula.trim().to_string());
            builder.shared(format!("s.molecular_formula = {}", p));
        }

        if let Some(sources) = sources {
            let placeholders: Vec<String> = sources
                .iter()
                .map(|s| builder.bind(s.name.to_string()))
                .collect();
            builder.shared(format!("r.source IN ({})", placeholders.join(", ")));
        }

        if let Some(ref methodology) = self.methodology {
            let p = builder.bind(methodology.trim().to_string());
            builder.shared(format!("{} = ANY(r.methodologies)", p));
        }

        if let Some(ref range) = self.molecular_weight {
            builder.range("s.molecular_weight", range, true);
        }
        if let Some(ref range) = self.monoisotopic_mass {
            builder.range("s.monoisotopic_mass", range, true);
        }
        if let Some(ref range) = self.ms_level {
            builder.range("t.ms_level", range, false);
        }
        if let Some(ref range) = self.frequency {
            builder.range("t.frequency", range, false);
        }
        if let Some(ref range) = self.temperature {
            builder.range("t.temperature", range, false);
        }
        if let Some(ref range) = self.year_published {
            builder.range("t.year_published", range, false);
        }

        if let Some(ref classification) = self.classification {
            if !classification.is_empty() {
                let conditions: Vec<String> = classification
                    .levels()
                    .into_iter()
                    .map(|(column, value)| {
                        let p = builder.bind(value.to_string());
                        format!("cf.{} = {}", column, p)
                    })
                    .collect();
                builder.shared(format!(
                    "EXISTS (SELECT 1 FROM classyfire cf WHERE cf.dtxsid = s.dtxsid AND {})",
                    conditions.join(" AND ")
                ));
            }
        }

        Ok(QueryPlan::Select(SelectPlan {
            subtypes,
            shared_clauses: builder.shared,
            payload_clauses: builder.payload,
            values: builder.values,
            post_filters,
            order,
            page,
            page_size,
        }))
    }

    fn validated_record_types(&self) -> Result<Option<BTreeSet<RecordType>>> {
        let Some(ref raw) = self.record_types else {
            return Ok(None);
        };
        let mut set = BTreeSet::new();
        for value in raw {
            let rt = RecordType::parse(value).ok_or_else(|| AppError::InvalidFilterValue {
                field: "record_types".into(),
                value: value.clone(),
            })?;
            set.insert(rt);
        }
        Ok(Some(set))
    }

    fn validated_spectrum_types(&self) -> Result<Option<BTreeSet<SpectrumType>>> {
        let Some(ref raw) = self.spectrum_types else {
            return Ok(None);
        };
        let mut set = BTreeSet::new();
        for value in raw {
            let st = SpectrumType::parse(value).ok_or_else(|| AppError::InvalidFilterValue {
                field: "spectrum_types".into(),
                value: value.clone(),
            })?;
            set.insert(st);
        }
        Ok(Some(set))
    }

    fn validated_sources(&self) -> Result<Option<Vec<&'static sources::SourceInfo>>> {
        let Some(ref raw) = self.sources else {
            return Ok(None);
        };
        raw.iter()
            .map(|name| {
                sources::lookup(name).ok_or_else(|| AppError::InvalidFilterValue {
                    field: "sources".into(),
                    value: name.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }

    fn validated_order(&self) -> Result<OrderBy> {
        let Some(ref sort) = self.sort else {
            return Ok(OrderBy { field: "internal_id", descending: false });
        };
        let field = SORT_FIELDS
            .iter()
            .copied()
            .find(|f| *f == sort.field)
            .ok_or_else(|| AppError::InvalidSortField {
                field: sort.field.clone(),
            })?;
        Ok(OrderBy {
            field,
            descending: sort.descending,
        })
    }

    fn validate_ranges(&self) -> Result<()> {
        if let Some(ref r) = self.molecular_weight {
            r.validate("molecular_weight")?;
        }
        if let Some(ref r) = self.monoisotopic_mass {
            r.validate("monoisotopic_mass")?;
        }
        if let Some(ref r) = self.ms_level {
            r.validate("ms_level")?;
        }
        if let Some(ref r) = self.frequency {
            r.validate("frequency")?;
        }
        if let Some(ref r) = self.temperature {
            r.validate("temperature")?;
        }
        if let Some(ref r) = self.year_published {
            r.validate("year_published")?;
        }
        Ok(())
    }

    /// Intersect the subtype arms implied by record_types, spectrum_types,
    /// and the payload-bound range filters. An empty result means the
    /// request is unsatisfiable as posed.
    fn narrowed_subtypes(
        &self,
        record_types: &Option<BTreeSet<RecordType>>,
        spectrum_types: &Option<BTreeSet<SpectrumType>>,
    ) -> Vec<Subtype> {
        let mut set: BTreeSet<Subtype> = Subtype::ALL.iter().copied().collect();

        if let Some(record_types) = record_types {
            set.retain(|s| record_types.contains(&s.record_type()));
        }

        if let Some(spectrum_types) = spectrum_types {
            // A spectral-technique filter only ever matches spectrum records.
            set.retain(|s| match s {
                Subtype::MassSpectrum => spectrum_types.contains(&SpectrumType::Mass),
                Subtype::NmrSpectrum => spectrum_types.contains(&SpectrumType::Nmr),
                Subtype::IrSpectrum => spectrum_types.contains(&SpectrumType::Ir),
                _ => false,
            });
        }

        let bounded = |r: &Option<RangeFilter<i32>>| r.as_ref().is_some_and(|r| !r.is_unbounded());
        let bounded_f = |r: &Option<RangeFilter<f64>>| r.as_ref().is_some_and(|r| !r.is_unbounded());

        if bounded(&self.ms_level) {
            set.retain(|s| *s == Subtype::MassSpectrum);
        }
        if bounded_f(&self.frequency) || bounded_f(&self.temperature) {
            set.retain(|s| *s == Subtype::NmrSpectrum);
        }
        if bounded(&self.year_published) {
            set.retain(|s| matches!(s, Subtype::FactSheet | Subtype::Method));
        }

        set.into_iter().collect()
    }

    /// Identifier/text match, unioned (OR) across the eligible columns for
    /// the detected identifier kind.
    fn substance_clause(&self, builder: &mut PredicateBuilder, term: &str) {
        let term = term.trim();
        match classify_search_term(term) {
            IdentifierKind::Dtxsid => {
                let p = builder.bind(term.to_string());
                builder.shared(format!("c.dtxsid = {}", p));
            }
            IdentifierKind::Casrn => {
                let p = builder.bind(term.to_string());
                builder.shared(format!("s.casrn = {}", p));
            }
            IdentifierKind::Inchikey => {
                // Match on the connectivity block so stereo/protonation
                // variants of the same skeleton are found together.
                let prefix = format!("{}%", &term[..14]);
                let p = builder.bind(prefix);
                builder.shared(format!(
                    "(s.jchem_inchikey LIKE {p} OR s.indigo_inchikey LIKE {p})",
                    p = p
                ));
            }
            IdentifierKind::Name => {
                let needle = format!("%{}%", term.to_lowercase());
                let p = builder.bind(needle);
                builder.shared(format!(
                    "(LOWER(s.preferred_name) LIKE {p} OR EXISTS \
                     (SELECT 1 FROM synonyms sy WHERE sy.dtxsid = s.dtxsid \
                      AND LOWER(sy.synonym) LIKE {p}))",
                    p = p
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SearchConfig {
        SearchConfig::default()
    }

    fn select(plan: QueryPlan) -> SelectPlan {
        match plan {
            QueryPlan::Select(plan) => plan,
            QueryPlan::Empty { .. } => panic!("expected select plan"),
        }
    }

    #[test]
    fn classifies_identifier_kinds() {
        assert_eq!(classify_search_term("DTXSID7020182"), IdentifierKind::Dtxsid);
        assert_eq!(classify_search_term("80-05-7"), IdentifierKind::Casrn);
        assert_eq!(
            classify_search_term("IISBACLAFKSPIT-UHFFFAOYSA-N"),
            IdentifierKind::Inchikey
        );
        assert_eq!(classify_search_term("IISBACLAFKSPIT"), IdentifierKind::Inchikey);
        assert_eq!(classify_search_term("bisphenol a"), IdentifierKind::Name);
    }

    #[test]
    fn inverted_range_fails_before_planning() {
        let request = SearchRequest {
            molecular_weight: Some(RangeFilter { min: Some(500.0), max: Some(100.0) }),
            ..Default::default()
        };
        match request.build(&config()) {
            Err(AppError::InvalidRange { field, lower, upper }) => {
                assert_eq!(field, "molecular_weight");
                assert_eq!(lower, 500.0);
                assert_eq!(upper, 100.0);
            }
            other => panic!("expected InvalidRange, got {:?}", other),
        }
    }

    #[test]
    fn unknown_source_is_rejected() {
        let request = SearchRequest {
            sources: Some(vec!["NotARealSource".into()]),
            ..Default::default()
        };
        match request.build(&config()) {
            Err(AppError::InvalidFilterValue { field, value }) => {
                assert_eq!(field, "sources");
                assert_eq!(value, "NotARealSource");
            }
            other => panic!("expected InvalidFilterValue, got {:?}", other),
        }
    }

    #[test]
    fn unknown_record_type_is_rejected() {
        let request = SearchRequest {
            record_types: Some(vec!["Monograph".into()]),
            ..Default::default()
        };
        assert!(matches!(
            request.build(&config()),
            Err(AppError::InvalidFilterValue { .. })
        ));
    }

    #[test]
    fn non_whitelisted_sort_field_is_rejected() {
        let request = SearchRequest {
            sort: Some(SortSpec { field: "pdf_data".into(), descending: false }),
            ..Default::default()
        };
        assert!(matches!(
            request.build(&config()),
            Err(AppError::InvalidSortField { .. })
        ));
    }

    #[test]
    fn disjoint_source_and_record_type_short_circuits() {
        // ECM only supplies methods; asking it for spectra cannot match.
        let request = SearchRequest {
            sources: Some(vec!["Environmental Chemistry Methods".into()]),
            record_types: Some(vec!["Spectrum".into()]),
            ..Default::default()
        };
        assert!(matches!(
            request.build(&config()).unwrap(),
            QueryPlan::Empty { .. }
        ));
    }

    #[test]
    fn contradictory_payload_filters_short_circuit() {
        // ms_level lives on mass spectra, frequency on NMR spectra.
        let request = SearchRequest {
            ms_level: Some(RangeFilter { min: Some(2), max: Some(2) }),
            frequency: Some(RangeFilter { min: Some(400.0), max: None }),
            ..Default::default()
        };
        assert!(matches!(
            request.build(&config()).unwrap(),
            QueryPlan::Empty { .. }
        ));
    }

    #[test]
    fn spectrum_type_with_ms_level_narrows_to_mass_arm() {
        let request = SearchRequest {
            spectrum_types: Some(vec!["Mass Spectrum".into()]),
            ms_level: Some(RangeFilter { min: Some(2), max: Some(2) }),
            ..Default::default()
        };
        let plan = select(request.build(&config()).unwrap());
        assert_eq!(plan.subtypes, vec![Subtype::MassSpectrum]);
        assert_eq!(plan.payload_clauses, vec!["t.ms_level >= $1", "t.ms_level <= $2"]);
        assert_eq!(plan.values.len(), 2);
    }

    #[test]
    fn year_filter_keeps_only_document_arms() {
        let request = SearchRequest {
            year_published: Some(RangeFilter { min: Some(2015), max: None }),
            ..Default::default()
        };
        let plan = select(request.build(&config()).unwrap());
        assert_eq!(plan.subtypes, vec![Subtype::FactSheet, Subtype::Method]);
    }

    #[test]
    fn placeholder_numbering_matches_value_count() {
        let request = SearchRequest {
            substance: Some("caffeine".into()),
            formula: Some("C8H10N4O2".into()),
            sources: Some(vec!["MoNA".into(), "MassBank EU".into()]),
            molecular_weight: Some(RangeFilter { min: Some(100.0), max: Some(300.0) }),
            ..Default::default()
        };
        let plan = select(request.build(&config()).unwrap());
        // name(1) + formula(1) + sources(2) + weight bounds(2)
        assert_eq!(plan.values.len(), 6);
        let last = format!("${}", plan.values.len());
        let all = plan.shared_clauses.join(" ");
        assert!(all.contains(&last));
        assert!(!all.contains(&format!("${}", plan.values.len() + 1)));
    }

    #[test]
    fn name_search_unions_preferred_name_and_synonyms() {
        let request = SearchRequest {
            substance: Some("atrazine".into()),
            ..Default::default()
        };
        let plan = select(request.build(&config()).unwrap());
        let clause = &plan.shared_clauses[0];
        assert!(clause.contains("LOWER(s.preferred_name) LIKE"));
        assert!(clause.contains("synonyms"));
        assert!(clause.contains(" OR "));
    }

    #[test]
    fn classification_filter_constrains_selected_levels_only() {
        let request = SearchRequest {
            classification: Some(ClassificationFilter {
                kingdom: Some("Organic compounds".into()),
                klass: Some("Benzenoids".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let plan = select(request.build(&config()).unwrap());
        let clause = plan
            .shared_clauses
            .iter()
            .find(|c| c.contains("classyfire"))
            .expect("classification clause");
        assert!(clause.contains("cf.kingdom = $1"));
        assert!(clause.contains("cf.klass = $2"));
        assert!(!clause.contains("cf.superklass"));
        assert!(clause.starts_with("EXISTS"));
    }

    #[test]
    fn sort_always_tiebreaks_on_internal_id() {
        let request = SearchRequest {
            sort: Some(SortSpec { field: "molecular_weight".into(), descending: false }),
            ..Default::default()
        };
        let plan = select(request.build(&config()).unwrap());
        assert_eq!(plan.order.to_sql(), "molecular_weight ASC, internal_id ASC");

        let request = SearchRequest {
            sort: Some(SortSpec { field: "internal_id".into(), descending: true }),
            ..Default::default()
        };
        let plan = select(request.build(&config()).unwrap());
        assert_eq!(plan.order.to_sql(), "internal_id DESC");
    }

    #[test]
    fn page_size_is_clamped() {
        let request = SearchRequest {
            page_size: Some(10_000),
            ..Default::default()
        };
        let plan = select(request.build(&config()).unwrap());
        assert_eq!(plan.page_size, config().max_page_size);
        assert_eq!(plan.page, 1);
    }
}
