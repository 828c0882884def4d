//! Substance identity entity
//!
//! One row per DSSTox substance. Two InChIKey variants are stored because
//! the upstream curation pipeline computes them with different toolkits
//! and they occasionally disagree on the protonation block.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "substances")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub dtxsid: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub dtxcid: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub casrn: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub jchem_inchikey: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub indigo_inchikey: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub preferred_name: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub molecular_formula: Option<String>,

    pub molecular_weight: Option<f64>,

    pub monoisotopic_mass: Option<f64>,

    /// Whether a structure image exists in the upstream dashboard
    pub image_in_comptox: Option<bool>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::synonym::Entity")]
    Synonyms,

    #[sea_orm(has_many = "super::contents::Entity")]
    Contents,
}

impl Related<super::synonym::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Synonyms.def()
    }
}

impl Related<super::contents::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
