//! Spectra Common Library
//!
//! Shared code for the spectra services including:
//! - Database models and repository patterns
//! - Search planning and result assembly
//! - Spectral math (peak parsing, entropy similarity)
//! - Error types and handling
//! - Configuration management
//! - Metrics and observability

pub mod config;
pub mod db;
pub mod errors;
pub mod metrics;
pub mod search;
pub mod spectrum;

// Re-export commonly used types
pub use config::AppConfig;
pub use db::Repository;
pub use errors::{AppError, Result};
pub use search::{SearchPage, SearchRequest};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
