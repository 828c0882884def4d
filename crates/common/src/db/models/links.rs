//! Join and side tables: method/spectrum links, supplemental sources,
//! substance images, extra structure identifiers, source registry rows.

pub mod methods_with_spectra {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    /// Pairs a method record with a spectrum record. Both referenced IDs
    /// must resolve to record_info rows of the matching record_type;
    /// the repository enforces this on insert.
    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "methods_with_spectra")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
        pub method_id: String,

        #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
        pub spectrum_id: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "crate::db::models::documents::methods::Entity",
            from = "Column::MethodId",
            to = "crate::db::models::documents::methods::Column::InternalId"
        )]
        Method,
    }

    impl Related<crate::db::models::documents::methods::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Method.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod additional_sources {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    /// Links to supplemental information (Wikipedia, ChemExpo, ...) per substance.
    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "additional_sources")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
        pub dtxsid: String,

        #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
        pub source_name: String,

        #[sea_orm(column_type = "Text", nullable)]
        pub link: Option<String>,

        #[sea_orm(column_type = "Text", nullable)]
        pub description: Option<String>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod substance_images {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "substance_images")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
        pub dtxsid: String,

        #[serde(skip_serializing)]
        pub png_image: Option<Vec<u8>>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod additional_substance_info {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "additional_substance_info")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
        pub dtxsid: String,

        #[sea_orm(column_type = "Text", nullable)]
        pub smiles: Option<String>,

        #[sea_orm(column_type = "Text", nullable)]
        pub inchi: Option<String>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod data_source_info {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    /// Descriptive row per upstream data source.
    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "data_source_info")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
        pub source: String,

        #[sea_orm(column_type = "Text", nullable)]
        pub full_name: Option<String>,

        #[sea_orm(column_type = "Text", nullable)]
        pub url: Option<String>,

        #[sea_orm(column_type = "Text", nullable)]
        pub description: Option<String>,

        pub date_refreshed: Option<Date>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}
