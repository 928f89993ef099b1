//! Cohort data handling for the model inspection panel

pub mod cohort;
pub mod schema;
pub mod sources;

use arrow::error::ArrowError;
use thiserror::Error;
use tokio::task::JoinError;

// Re-exports
pub use cohort::MemoryCohort;
pub use schema::{ExplanationMetadata, FeatureMeta};
pub use sources::CsvCohort;

/// Errors that can occur in cohort data operations
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Arrow error: {0}")]
    Arrow(ArrowError),

    #[error("CSV parsing error: {0}")]
    Csv(String),

    #[error("shape mismatch in {context}: expected {expected}, got {actual}")]
    ShapeMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("unknown class index {0}")]
    UnknownClass(usize),

    #[error("missing column: {0}")]
    MissingColumn(String),

    #[error("Join error: {0}")]
    Join(#[from] JoinError),

    #[error("Other error: {0}")]
    Other(String),
}

impl From<csv::Error> for DataError {
    fn from(error: csv::Error) -> Self {
        match error.kind() {
            csv::ErrorKind::Io(io_err) => {
                DataError::Io(std::io::Error::new(io_err.kind(), error.to_string()))
            }
            _ => DataError::Csv(error.to_string()),
        }
    }
}

impl From<ArrowError> for DataError {
    fn from(error: ArrowError) -> Self {
        DataError::Arrow(error)
    }
}
