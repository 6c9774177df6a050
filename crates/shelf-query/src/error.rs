/// Errors from parsing query parameters.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("unknown sort key {0:?} (expected title, author, year, added or insertion)")]
    UnknownSortKey(String),
}
