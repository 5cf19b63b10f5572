//! Error types for dataset loading and lookup.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading the dataset source.
///
/// None of these are fatal: the caller renders an empty table with a warning.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("Dataset file not found: {0}")]
    NotFound(PathBuf),

    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unparsable dataset file: {0}")]
    Csv(#[from] csv::Error),

    #[error("Dataset file is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

/// A dataset id that does not resolve against the loaded table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Dataset not found: {0}")]
pub struct NotFoundError(pub String);
