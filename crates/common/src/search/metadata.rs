//! Semi-structured metadata documents and typed-on-read filters
//!
//! Several tables carry a JSON metadata column (spectrum_metadata,
//! pdf_metadata) whose schema is not fixed. Values are modeled as a small
//! tagged union rather than free-form JSON so filters can type-check on
//! read: a missing key excludes the record, and a type mismatch (say a
//! numeric comparison against a string value) excludes the record instead
//! of failing the request.

use crate::errors::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A metadata document: string keys to tagged values.
pub type MetadataDocument = BTreeMap<String, MetadataValue>;

/// One metadata value: number, string, boolean, null, or nested mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Map(MetadataDocument),
}

/// Parse a raw JSON column into a document. Anything that is not a JSON
/// object (including a parse failure upstream) reads as an empty document,
/// so every key lookup against it excludes the record.
pub fn parse_document(raw: Option<serde_json::Value>) -> MetadataDocument {
    raw.and_then(|value| serde_json::from_value::<MetadataDocument>(value).ok())
        .unwrap_or_default()
}

/// A single metadata criterion, AND-combined with the rest of the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataFilter {
    /// Key looked up in the record's metadata document
    pub key: String,

    #[serde(flatten)]
    pub op: MetadataOp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum MetadataOp {
    /// Exact value equality (typed: number to number, string to string)
    Equals { value: MetadataValue },

    /// Case-insensitive substring match against a string value
    Contains { value: String },

    /// Inclusive numeric range; either bound may be omitted
    Range { min: Option<f64>, max: Option<f64> },
}

impl MetadataFilter {
    /// Validate the filter shape before any query runs.
    pub fn validate(&self) -> Result<()> {
        if self.key.trim().is_empty() {
            return Err(AppError::Validation {
                message: "metadata filter key cannot be empty".into(),
                field: Some("metadata".into()),
            });
        }
        if let MetadataOp::Range { min: Some(lo), max: Some(hi) } = self.op {
            if lo > hi {
                return Err(AppError::InvalidRange {
                    field: format!("metadata.{}", self.key),
                    lower: lo,
                    upper: hi,
                });
            }
        }
        Ok(())
    }

    /// Whether a record with the given metadata document passes this filter.
    ///
    /// Fail-soft: a missing key or a type mismatch excludes the record,
    /// it is never an error.
    pub fn matches(&self, doc: &MetadataDocument) -> bool {
        let Some(value) = doc.get(&self.key) else {
            return false;
        };

        match (&self.op, value) {
            (MetadataOp::Equals { value: expected }, actual) => expected == actual,
            (MetadataOp::Contains { value: needle }, MetadataValue::String(haystack)) => {
                haystack.to_lowercase().contains(&needle.to_lowercase())
            }
            (MetadataOp::Contains { .. }, _) => false,
            (MetadataOp::Range { min, max }, MetadataValue::Number(n)) => {
                min.map_or(true, |lo| *n >= lo) && max.map_or(true, |hi| *n <= hi)
            }
            (MetadataOp::Range { .. }, _) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> MetadataDocument {
        parse_document(Some(json!({
            "instrument": "Orbitrap Fusion",
            "collision_energy": 35.0,
            "polarity": "positive",
            "centroided": true,
            "vendor": { "name": "Thermo" }
        })))
    }

    #[test]
    fn missing_key_excludes() {
        let filter = MetadataFilter {
            key: "resolution".into(),
            op: MetadataOp::Equals { value: MetadataValue::Number(60000.0) },
        };
        assert!(!filter.matches(&doc()));
    }

    #[test]
    fn type_mismatch_fails_soft() {
        // Numeric range against a string value: excluded, not an error
        let filter = MetadataFilter {
            key: "instrument".into(),
            op: MetadataOp::Range { min: Some(1.0), max: None },
        };
        assert!(!filter.matches(&doc()));
    }

    #[test]
    fn equals_is_typed() {
        let filter = MetadataFilter {
            key: "centroided".into(),
            op: MetadataOp::Equals { value: MetadataValue::Bool(true) },
        };
        assert!(filter.matches(&doc()));

        // "true" as a string does not equal true as a bool
        let filter = MetadataFilter {
            key: "centroided".into(),
            op: MetadataOp::Equals { value: MetadataValue::String("true".into()) },
        };
        assert!(!filter.matches(&doc()));
    }

    #[test]
    fn contains_is_case_insensitive() {
        let filter = MetadataFilter {
            key: "instrument".into(),
            op: MetadataOp::Contains { value: "orbitrap".into() },
        };
        assert!(filter.matches(&doc()));
    }

    #[test]
    fn range_bounds_inclusive() {
        let filter = MetadataFilter {
            key: "collision_energy".into(),
            op: MetadataOp::Range { min: Some(35.0), max: Some(35.0) },
        };
        assert!(filter.matches(&doc()));
    }

    #[test]
    fn inverted_range_rejected_up_front() {
        let filter = MetadataFilter {
            key: "collision_energy".into(),
            op: MetadataOp::Range { min: Some(50.0), max: Some(10.0) },
        };
        assert!(matches!(
            filter.validate(),
            Err(crate::errors::AppError::InvalidRange { .. })
        ));
    }

    #[test]
    fn non_object_column_reads_as_empty() {
        let doc = parse_document(Some(json!(["not", "an", "object"])));
        assert!(doc.is_empty());
        assert!(parse_document(None).is_empty());
    }

    #[test]
    fn nested_mapping_round_trips() {
        let d = doc();
        match d.get("vendor") {
            Some(MetadataValue::Map(inner)) => {
                assert_eq!(inner.get("name"), Some(&MetadataValue::String("Thermo".into())));
            }
            other => panic!("expected nested map, got {:?}", other),
        }
    }
}
