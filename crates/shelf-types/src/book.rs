use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::draft::BookFields;
use crate::id::BookId;
use crate::status::BookStatus;

/// Wall-clock timestamp used for `createdAt` / `updatedAt`.
pub type Timestamp = DateTime<Utc>;

/// A stored book record.
///
/// Books are created and mutated only by a collection store; everything
/// else sees clones. `updated_at` strictly increases with every revision
/// of the same record, even if the wall clock has not moved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub genre: Option<String>,
    pub publication_year: Option<i32>,
    pub status: BookStatus,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Book {
    /// Build a fresh record: `created_at == updated_at == now`.
    pub fn from_fields(id: BookId, fields: BookFields, now: Timestamp) -> Self {
        Self {
            id,
            title: fields.title,
            author: fields.author,
            isbn: fields.isbn,
            genre: fields.genre,
            publication_year: fields.publication_year,
            status: fields.status,
            notes: fields.notes,
            created_at: now,
            updated_at: now,
        }
    }

    /// Produce the next revision of this record with new field values.
    ///
    /// `id` and `created_at` carry over; `updated_at` moves to `now`, or
    /// one microsecond past the previous value if `now` is not later.
    pub fn revise(&self, fields: BookFields, now: Timestamp) -> Self {
        let updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + chrono::Duration::microseconds(1)
        };
        Self {
            updated_at,
            created_at: self.created_at,
            ..Self::from_fields(self.id, fields, now)
        }
    }

    /// The record's current content as validated fields.
    pub fn fields(&self) -> BookFields {
        BookFields {
            title: self.title.clone(),
            author: self.author.clone(),
            isbn: self.isbn.clone(),
            genre: self.genre.clone(),
            publication_year: self.publication_year,
            status: self.status,
            notes: self.notes.clone(),
        }
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.publication_year {
            Some(year) => write!(f, "{} by {} ({year})", self.title, self.author),
            None => write!(f, "{} by {} (Unknown)", self.title, self.author),
        }
    }
}
