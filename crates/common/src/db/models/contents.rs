//! Contents join entity: dtxsid <-> internal_id
//!
//! Many-to-many: a substance may have many records; a record generally
//! belongs to one substance but the table permits otherwise (mixtures).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contents")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub internal_id: String,

    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub dtxsid: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::substance::Entity",
        from = "Column::Dtxsid",
        to = "super::substance::Column::Dtxsid"
    )]
    Substance,

    #[sea_orm(
        belongs_to = "super::record_info::Entity",
        from = "Column::InternalId",
        to = "super::record_info::Column::InternalId"
    )]
    RecordInfo,
}

impl Related<super::substance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Substance.def()
    }
}

impl Related<super::record_info::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecordInfo.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
