//! Foundation types for Shelf, a personal book collection store.
//!
//! This crate defines the book record and everything needed to build one
//! safely from caller input. Every other Shelf crate depends on
//! `shelf-types`.
//!
//! # Key Types
//!
//! - [`Book`] -- A stored book record (the sole entity)
//! - [`BookId`] -- Time-ordered UUID v7 book identifier
//! - [`BookStatus`] -- Closed set of reading/ownership states
//! - [`BookDraft`] -- Candidate fields for creating a book
//! - [`BookPatch`] -- Partial fields for editing a book
//! - [`BookFields`] -- Validated, normalized field values
//! - [`ValidationError`] -- Field-level validation failures

pub mod book;
pub mod draft;
pub mod error;
pub mod id;
pub mod status;

pub use book::{Book, Timestamp};
pub use draft::{current_year, BookDraft, BookFields, BookPatch, MIN_PUBLICATION_YEAR};
pub use error::{FieldIssue, TypeError, ValidationError};
pub use id::BookId;
pub use status::BookStatus;
