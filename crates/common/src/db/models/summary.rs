//! Database summary entity
//!
//! Precomputed counts per source and record type, refreshed by an
//! out-of-band job. This service only reads it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "database_summary")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub source: String,

    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub record_type: String,

    pub record_count: i64,

    pub substance_count: Option<i64>,

    pub last_updated: Option<Date>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
