//! Fixed registry of upstream data sources
//!
//! Source names form a closed domain: a filter naming an unknown source is
//! rejected up front rather than silently matching nothing. Each source
//! only ever supplies certain record types, which lets the planner prove
//! some source/record-type combinations unsatisfiable without a query.

use crate::search::RecordType;

#[derive(Debug, Clone, Copy)]
pub struct SourceInfo {
    pub name: &'static str,
    pub record_types: &'static [RecordType],
}

pub const SOURCE_REGISTRY: &[SourceInfo] = &[
    SourceInfo {
        name: "MoNA",
        record_types: &[RecordType::Spectrum],
    },
    SourceInfo {
        name: "MassBank EU",
        record_types: &[RecordType::Spectrum],
    },
    SourceInfo {
        name: "SpectraBase",
        record_types: &[RecordType::Spectrum],
    },
    SourceInfo {
        name: "CFSRE",
        record_types: &[RecordType::Spectrum, RecordType::FactSheet],
    },
    SourceInfo {
        name: "Scientific Working Group",
        record_types: &[RecordType::Spectrum, RecordType::FactSheet],
    },
    SourceInfo {
        name: "Environmental Chemistry Methods",
        record_types: &[RecordType::Method],
    },
    SourceInfo {
        name: "Agilent",
        record_types: &[RecordType::Spectrum, RecordType::Method],
    },
    SourceInfo {
        name: "Analytical QC",
        record_types: &[RecordType::Spectrum],
    },
];

/// Case-insensitive lookup of a source by name.
pub fn lookup(name: &str) -> Option<&'static SourceInfo> {
    SOURCE_REGISTRY
        .iter()
        .find(|s| s.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert!(lookup("mona").is_some());
        assert!(lookup("MASSBANK EU").is_some());
        assert!(lookup("NotARealSource").is_none());
    }

    #[test]
    fn method_sources_do_not_claim_fact_sheets() {
        let ecm = lookup("Environmental Chemistry Methods").unwrap();
        assert_eq!(ecm.record_types, &[RecordType::Method]);
    }
}
