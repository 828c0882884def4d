//! Substance classification entities

pub mod classyfire {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    /// ClassyFire taxonomy assignment, denormalized per substance:
    /// kingdom > superklass > klass > subklass > direct_parent.
    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "classyfire")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
        pub dtxsid: String,

        #[sea_orm(column_type = "Text", nullable)]
        pub kingdom: Option<String>,

        #[sea_orm(column_type = "Text", nullable)]
        pub superklass: Option<String>,

        #[sea_orm(column_type = "Text", nullable)]
        pub klass: Option<String>,

        #[sea_orm(column_type = "Text", nullable)]
        pub subklass: Option<String>,

        #[sea_orm(column_type = "Text", nullable)]
        pub direct_parent: Option<String>,

        #[sea_orm(column_type = "Text", nullable)]
        pub geometric_descriptor: Option<String>,

        pub alternative_parents: Option<Vec<String>>,

        pub substituents: Option<Vec<String>>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod functional_use {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "functional_use_classifications")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
        pub dtxsid: String,

        #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
        pub use_class: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}
