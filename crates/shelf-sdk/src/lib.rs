//! High-level SDK for Shelf.
//!
//! [`Library`] is the single entry point for applications embedding a
//! book collection: it owns a store backend, runs every store call on the
//! blocking pool under a timeout, resolves human identifiers and caches
//! statistics per store version.

pub mod config;
pub mod error;
pub mod library;

pub use config::LibraryConfig;
pub use error::{LibraryError, LibraryResult};
pub use library::Library;

// Re-export key types
pub use shelf_query::{BookFilter, SortKey};
pub use shelf_stats::{RankedCount, Statistics};
pub use shelf_types::{Book, BookDraft, BookId, BookPatch, BookStatus, FieldIssue, ValidationError};
