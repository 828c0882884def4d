//! API handlers module

pub mod health;
pub mod links;
pub mod records;
pub mod search;
pub mod substances;
pub mod summary;
