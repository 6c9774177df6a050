//! Read-only query engine for Shelf.
//!
//! Everything here works on a snapshot of books (a slice handed over by
//! the caller) and never mutates it. The store owns the records; this
//! crate only decides which of them to return and in what order.
//!
//! # Key Types
//!
//! - [`search`] / [`search_ranked`] -- case-insensitive, ranked text search
//! - [`MatchRank`] -- how strongly a book matched a query
//! - [`BookFilter`] -- status / genre / author constraints
//! - [`SortKey`] -- explicit list orderings
//! - [`find_by_identifier`] -- resolve an id, title or ISBN to one book

pub mod error;
pub mod filter;
pub mod lookup;
pub mod search;
pub mod sort;

pub use error::QueryError;
pub use filter::BookFilter;
pub use lookup::find_by_identifier;
pub use search::{normalize_query, search, search_ranked, MatchRank, SearchHit};
pub use sort::{sort_and_limit, sort_books, SortKey};
