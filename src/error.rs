//! Error types for the task store and its persistence adapter.

use thiserror::Error;

/// Failures raised by task operations.
#[derive(Error, Debug)]
pub enum TaskError {
    /// Input was rejected; the collection is unchanged.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The referenced task id is not in the collection.
    #[error("task {0} not found")]
    NotFound(String),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// Terminal or file I/O outside the task storage itself.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures raised by a [`crate::storage::TaskStorage`] backend.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("storage unavailable: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored tasks are malformed: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("storage quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded { needed: usize, quota: usize },
}

pub type Result<T> = std::result::Result<T, TaskError>;
