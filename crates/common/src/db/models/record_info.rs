//! Record header entity
//!
//! Every record (spectrum, fact sheet, method) has exactly one row here;
//! the type-specific payload lives in its own table keyed by internal_id.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "record_info")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub internal_id: String,

    /// "Spectrum", "Fact Sheet", or "Method"
    #[sea_orm(column_type = "Text")]
    pub record_type: String,

    #[sea_orm(column_type = "Text")]
    pub source: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub link: Option<String>,

    pub experimental: Option<bool>,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    /// Finer-grained type, e.g. "Mass Spectrum" for a spectrum record
    #[sea_orm(column_type = "Text", nullable)]
    pub data_type: Option<String>,

    /// Analytical methodologies attached to the record (GC-MS, LC-MS/MS, ...)
    pub methodologies: Option<Vec<String>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::contents::Entity")]
    Contents,
}

impl Related<super::contents::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
