use std::path::PathBuf;

use shelf_types::{BookId, ValidationError};

/// Errors from collection store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The candidate or merged fields are invalid.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No book with this id exists.
    #[error("book not found: {0}")]
    NotFound(BookId),

    /// The backing storage could not be reached or written.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The id generator produced an id that is already in use.
    #[error("duplicate book id generated: {0}")]
    DuplicateId(BookId),

    /// A persisted library file could not be decoded.
    #[error("corrupt library file {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub(crate) fn abandoned(op: &str) -> Self {
        Self::Unavailable(format!("{op} abandoned before commit"))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
