//! Document payload entities (PDF-backed record types)
//!
//! pdf_data columns are only read by single-record fetch operations;
//! list queries never project them.

pub mod spectrum_pdfs {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "spectrum_pdfs")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
        pub internal_id: String,

        #[serde(skip_serializing)]
        pub pdf_data: Option<Vec<u8>>,

        #[sea_orm(column_type = "JsonBinary", nullable)]
        pub pdf_metadata: Option<Json>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod fact_sheets {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "fact_sheets")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
        pub internal_id: String,

        #[sea_orm(column_type = "Text", nullable)]
        pub fact_sheet_name: Option<String>,

        /// Substance or substance class the sheet covers
        #[sea_orm(column_type = "Text", nullable)]
        pub analyte: Option<String>,

        pub year_published: Option<i32>,

        #[serde(skip_serializing)]
        pub pdf_data: Option<Vec<u8>>,

        #[sea_orm(column_type = "JsonBinary", nullable)]
        pub pdf_metadata: Option<Json>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod methods {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "methods")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
        pub internal_id: String,

        #[sea_orm(column_type = "Text", nullable)]
        pub method_name: Option<String>,

        #[sea_orm(column_type = "Text", nullable)]
        pub method_number: Option<String>,

        #[sea_orm(column_type = "Text", nullable)]
        pub publisher: Option<String>,

        pub year_published: Option<i32>,

        pub has_associated_spectra: Option<bool>,

        #[serde(skip_serializing)]
        pub pdf_data: Option<Vec<u8>>,

        #[sea_orm(column_type = "JsonBinary", nullable)]
        pub pdf_metadata: Option<Json>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "crate::db::models::links::methods_with_spectra::Entity")]
        SpectrumLinks,
    }

    impl Related<crate::db::models::links::methods_with_spectra::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::SpectrumLinks.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod analytical_qc {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    /// Analytical QC reports; stored as spectrum records with a PDF payload
    /// and internal_id prefixed "AnalyticalQC-".
    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "analytical_qc")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
        pub internal_id: String,

        #[sea_orm(column_type = "Text", nullable)]
        pub filename: Option<String>,

        /// Curator call on substance purity/stability
        #[sea_orm(column_type = "Text", nullable)]
        pub annotation: Option<String>,

        #[sea_orm(column_type = "Text", nullable)]
        pub study: Option<String>,

        #[serde(skip_serializing)]
        pub pdf_data: Option<Vec<u8>>,

        #[sea_orm(column_type = "JsonBinary", nullable)]
        pub pdf_metadata: Option<Json>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}
