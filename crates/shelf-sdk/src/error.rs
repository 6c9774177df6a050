use shelf_query::QueryError;
use shelf_store::StoreError;
use shelf_types::ValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("book not found: {0}")]
    NotFound(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("invalid query: {0}")]
    Query(#[from] QueryError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl LibraryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

impl From<StoreError> for LibraryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(e) => Self::Validation(e),
            StoreError::NotFound(id) => Self::NotFound(id.to_string()),
            StoreError::Unavailable(reason) => Self::Unavailable(reason),
            StoreError::Io(e) => Self::Unavailable(e.to_string()),
            e @ StoreError::Corrupt { .. } => Self::Unavailable(e.to_string()),
            e @ StoreError::DuplicateId(_) => Self::Internal(e.to_string()),
        }
    }
}

pub type LibraryResult<T> = Result<T, LibraryError>;

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_types::BookId;

    #[test]
    fn store_errors_map_to_library_kinds() {
        let id = BookId::new();
        assert!(LibraryError::from(StoreError::NotFound(id)).is_not_found());
        assert!(LibraryError::from(StoreError::Unavailable("disk full".into())).is_unavailable());
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(LibraryError::from(StoreError::Io(io)).is_unavailable());
        assert!(matches!(
            LibraryError::from(StoreError::DuplicateId(id)),
            LibraryError::Internal(_)
        ));
        let invalid = ValidationError::single("title", "must not be empty");
        assert!(matches!(
            LibraryError::from(StoreError::Validation(invalid)),
            LibraryError::Validation(_)
        ));
    }
}
