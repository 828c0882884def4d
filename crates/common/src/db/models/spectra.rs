//! Spectrum payload entities
//!
//! One table per spectral technique. Peak data is stored as the
//! space-separated "mz:intensity" text the ingestion pipeline produces;
//! parsing lives in `crate::spectrum`.

pub mod mass_spectra {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "mass_spectra")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
        pub internal_id: String,

        #[sea_orm(column_type = "Text", nullable)]
        pub spectrum: Option<String>,

        /// SPLASH content hash of the spectrum
        #[sea_orm(column_type = "Text", nullable)]
        pub splash: Option<String>,

        pub spectral_entropy: Option<f64>,

        pub normalized_entropy: Option<f64>,

        pub ms_level: Option<i32>,

        #[sea_orm(column_type = "Text", nullable)]
        pub ionization_mode: Option<String>,

        /// Semi-structured acquisition metadata; schema not fixed
        #[sea_orm(column_type = "JsonBinary", nullable)]
        pub spectrum_metadata: Option<Json>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod nmr_spectra {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "nmr_spectra")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
        pub internal_id: String,

        #[sea_orm(column_type = "Text", nullable)]
        pub spectrum: Option<String>,

        #[sea_orm(column_type = "Text", nullable)]
        pub nucleus: Option<String>,

        /// Spectrometer frequency in MHz
        pub frequency: Option<f64>,

        /// Acquisition temperature in Kelvin
        pub temperature: Option<f64>,

        #[sea_orm(column_type = "Text", nullable)]
        pub solvent: Option<String>,

        #[sea_orm(column_type = "JsonBinary", nullable)]
        pub coupling_constants: Option<Json>,

        #[sea_orm(column_type = "JsonBinary", nullable)]
        pub spectrum_metadata: Option<Json>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod ir_spectra {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "ir_spectra")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
        pub internal_id: String,

        #[sea_orm(column_type = "Text", nullable)]
        pub spectrum: Option<String>,

        /// FTIR, ATR, etc.
        #[sea_orm(column_type = "Text", nullable)]
        pub ir_type: Option<String>,

        #[sea_orm(column_type = "JsonBinary", nullable)]
        pub spectrum_metadata: Option<Json>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}
