//! SeaORM entities for the record-store schema
//!
//! One module per table concern. internal_id is unique per record across
//! all type-specific tables; dtxsid is unique per substance; a type-specific
//! payload row must not exist without a matching record_info row of the
//! corresponding record_type.

pub mod classification;
pub mod contents;
pub mod documents;
pub mod links;
pub mod record_info;
pub mod spectra;
pub mod substance;
pub mod summary;
pub mod synonym;

// Re-export with friendly aliases
pub use classification::classyfire::{
    ActiveModel as ClassyFireActiveModel, Column as ClassyFireColumn, Entity as ClassyFireEntity,
    Model as ClassyFire,
};
pub use classification::functional_use::{
    Column as FunctionalUseColumn, Entity as FunctionalUseEntity, Model as FunctionalUse,
};
pub use contents::{
    ActiveModel as ContentsActiveModel, Column as ContentsColumn, Entity as ContentsEntity,
    Model as Contents,
};
pub use documents::analytical_qc::{
    Column as AnalyticalQcColumn, Entity as AnalyticalQcEntity, Model as AnalyticalQc,
};
pub use documents::fact_sheets::{
    Column as FactSheetColumn, Entity as FactSheetEntity, Model as FactSheet,
};
pub use documents::methods::{Column as MethodColumn, Entity as MethodEntity, Model as Method};
pub use documents::spectrum_pdfs::{
    Column as SpectrumPdfColumn, Entity as SpectrumPdfEntity, Model as SpectrumPdf,
};
pub use links::additional_sources::{
    Column as AdditionalSourceColumn, Entity as AdditionalSourceEntity, Model as AdditionalSource,
};
pub use links::additional_substance_info::{
    Column as AdditionalSubstanceInfoColumn, Entity as AdditionalSubstanceInfoEntity,
    Model as AdditionalSubstanceInfo,
};
pub use links::data_source_info::{
    Column as DataSourceInfoColumn, Entity as DataSourceInfoEntity, Model as DataSourceInfo,
};
pub use links::methods_with_spectra::{
    ActiveModel as MethodSpectrumLinkActiveModel, Column as MethodSpectrumLinkColumn,
    Entity as MethodSpectrumLinkEntity, Model as MethodSpectrumLink,
};
pub use links::substance_images::{
    Column as SubstanceImageColumn, Entity as SubstanceImageEntity, Model as SubstanceImage,
};
pub use record_info::{
    ActiveModel as RecordInfoActiveModel, Column as RecordInfoColumn, Entity as RecordInfoEntity,
    Model as RecordInfo,
};
pub use spectra::ir_spectra::{
    Column as IrSpectrumColumn, Entity as IrSpectrumEntity, Model as IrSpectrum,
};
pub use spectra::mass_spectra::{
    Column as MassSpectrumColumn, Entity as MassSpectrumEntity, Model as MassSpectrum,
};
pub use spectra::nmr_spectra::{
    Column as NmrSpectrumColumn, Entity as NmrSpectrumEntity, Model as NmrSpectrum,
};
pub use substance::{
    ActiveModel as SubstanceActiveModel, Column as SubstanceColumn, Entity as SubstanceEntity,
    Model as Substance,
};
pub use summary::{Column as DatabaseSummaryColumn, Entity as DatabaseSummaryEntity, Model as DatabaseSummary};
pub use synonym::{Column as SynonymColumn, Entity as SynonymEntity, Model as Synonym};
