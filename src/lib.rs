//! benchex - browsable dashboard over AI benchmark and dataset metadata.
//!
//! The dataset table is loaded once from CSV and shared read-only. Each
//! viewing session carries its own filters, page, and selection, and every
//! interaction runs one pure recompute step over the table.

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod server;
pub mod services;

pub use error::{DataLoadError, NotFoundError};
pub use models::DatasetRecord;
pub use repository::Table;
