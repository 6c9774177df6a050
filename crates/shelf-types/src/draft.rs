//! Caller-supplied book fields and their validation.
//!
//! [`BookDraft`] is what a caller hands over to create a book and
//! [`BookPatch`] what it hands over to edit one. Neither is trusted:
//! both funnel through [`BookDraft::validate_at`], which is the single
//! place the entity rules live.

use chrono::{Datelike, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::book::Book;
use crate::error::{FieldIssue, ValidationError};
use crate::status::BookStatus;

/// Earliest accepted publication year.
pub const MIN_PUBLICATION_YEAR: i32 = 1000;

/// The current calendar year (UTC).
pub fn current_year() -> i32 {
    Utc::now().year()
}

/// Candidate fields for a new book.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub genre: Option<String>,
    pub publication_year: Option<i32>,
    /// Raw status text; `None` means the default status.
    pub status: Option<String>,
    pub notes: Option<String>,
}

/// Validated and normalized book content.
///
/// Only [`BookDraft::validate_at`] produces these, so holding one means
/// the entity invariants hold.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BookFields {
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub genre: Option<String>,
    pub publication_year: Option<i32>,
    pub status: BookStatus,
    pub notes: Option<String>,
}

impl BookDraft {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            ..Self::default()
        }
    }

    pub fn with_isbn(mut self, isbn: impl Into<String>) -> Self {
        self.isbn = Some(isbn.into());
        self
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.publication_year = Some(year);
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Validate against the current UTC year.
    pub fn validate(&self) -> Result<BookFields, ValidationError> {
        self.validate_at(current_year())
    }

    /// Validate against an explicit current year.
    ///
    /// Trims every text field, drops blank optional fields, checks the
    /// publication year bound and parses the status. All failing fields
    /// are collected into one error.
    pub fn validate_at(&self, current_year: i32) -> Result<BookFields, ValidationError> {
        let mut issues = Vec::new();

        let title = self.title.trim();
        if title.is_empty() {
            issues.push(FieldIssue::new("title", "is required"));
        }
        let author = self.author.trim();
        if author.is_empty() {
            issues.push(FieldIssue::new("author", "is required"));
        }

        if let Some(year) = self.publication_year {
            if !(MIN_PUBLICATION_YEAR..=current_year).contains(&year) {
                issues.push(FieldIssue::new(
                    "publicationYear",
                    format!("must be between {MIN_PUBLICATION_YEAR} and {current_year}, got {year}"),
                ));
            }
        }

        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => BookStatus::default(),
            Some(raw) => match raw.parse::<BookStatus>() {
                Ok(status) => status,
                Err(err) => {
                    issues.push(FieldIssue::new("status", err.to_string()));
                    BookStatus::default()
                }
            },
        };

        if !issues.is_empty() {
            return Err(ValidationError::new(issues));
        }

        Ok(BookFields {
            title: title.to_string(),
            author: author.to_string(),
            isbn: normalize(self.isbn.as_deref()),
            genre: normalize(self.genre.as_deref()),
            publication_year: self.publication_year,
            status,
            notes: normalize(self.notes.as_deref()),
        })
    }
}

impl From<&Book> for BookDraft {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            isbn: book.isbn.clone(),
            genre: book.genre.clone(),
            publication_year: book.publication_year,
            status: Some(book.status.to_string()),
            notes: book.notes.clone(),
        }
    }
}

/// Partial edit of an existing book.
///
/// Absent fields are left untouched. An optional text field given as an
/// empty string is cleared; `publicationYear: null` clears the year.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub publication_year: Option<Option<i32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl BookPatch {
    /// A patch that only changes the status.
    pub fn status(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Overlay this patch on an existing book, producing an unvalidated
    /// draft of the merged result.
    pub fn merge_onto(&self, book: &Book) -> BookDraft {
        let mut draft = BookDraft::from(book);
        if let Some(title) = &self.title {
            draft.title = title.clone();
        }
        if let Some(author) = &self.author {
            draft.author = author.clone();
        }
        if let Some(isbn) = &self.isbn {
            draft.isbn = Some(isbn.clone());
        }
        if let Some(genre) = &self.genre {
            draft.genre = Some(genre.clone());
        }
        if let Some(year) = self.publication_year {
            draft.publication_year = year;
        }
        if let Some(status) = &self.status {
            draft.status = Some(status.clone());
        }
        if let Some(notes) = &self.notes {
            draft.notes = Some(notes.clone());
        }
        draft
    }
}

/// Distinguishes an explicit `null` from a missing key.
fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<i32>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<i32>::deserialize(deserializer).map(Some)
}

fn normalize(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    use crate::id::BookId;

    const YEAR: i32 = 2026;

    fn hobbit() -> BookDraft {
        BookDraft::new("The Hobbit", "J.R.R. Tolkien")
            .with_isbn("978-0547928227")
            .with_genre("Fantasy")
            .with_year(1937)
    }

    #[test]
    fn valid_draft_defaults_to_available() {
        let fields = hobbit().validate_at(YEAR).unwrap();
        assert_eq!(fields.title, "The Hobbit");
        assert_eq!(fields.status, BookStatus::Available);
        assert_eq!(fields.publication_year, Some(1937));
    }

    #[test]
    fn trims_and_drops_blank_optionals() {
        let draft = BookDraft::new("  Dune ", " Frank Herbert\t")
            .with_isbn("  ")
            .with_genre(" Science Fiction ")
            .with_notes("");
        let fields = draft.validate_at(YEAR).unwrap();
        assert_eq!(fields.title, "Dune");
        assert_eq!(fields.author, "Frank Herbert");
        assert_eq!(fields.isbn, None);
        assert_eq!(fields.genre.as_deref(), Some("Science Fiction"));
        assert_eq!(fields.notes, None);
    }

    #[test]
    fn reports_every_failing_field() {
        let draft = BookDraft::new(" ", "")
            .with_year(999)
            .with_status("Lost");
        let err = draft.validate_at(YEAR).unwrap_err();
        assert_eq!(err.issues().len(), 4);
        for field in ["title", "author", "publicationYear", "status"] {
            assert!(err.has_field(field), "missing issue for {field}");
        }
    }

    #[test]
    fn year_bounds_are_inclusive() {
        assert!(BookDraft::new("a", "b").with_year(1000).validate_at(YEAR).is_ok());
        assert!(BookDraft::new("a", "b").with_year(YEAR).validate_at(YEAR).is_ok());
        assert!(BookDraft::new("a", "b").with_year(YEAR + 1).validate_at(YEAR).is_err());
    }

    #[test]
    fn status_text_is_parsed() {
        let fields = hobbit().with_status("reading").validate_at(YEAR).unwrap();
        assert_eq!(fields.status, BookStatus::Reading);
        let fields = hobbit().with_status("  ").validate_at(YEAR).unwrap();
        assert_eq!(fields.status, BookStatus::Available);
    }

    #[test]
    fn draft_deserializes_from_camel_case() {
        let draft: BookDraft = serde_json::from_str(
            r#"{"title":"Emma","author":"Jane Austen","publicationYear":1815,"status":"Wishlist"}"#,
        )
        .unwrap();
        assert_eq!(draft.publication_year, Some(1815));
        assert_eq!(draft.status.as_deref(), Some("Wishlist"));
    }

    #[test]
    fn missing_required_fields_fail_validation_not_parsing() {
        let draft: BookDraft = serde_json::from_str(r#"{"genre":"Poetry"}"#).unwrap();
        let err = draft.validate_at(YEAR).unwrap_err();
        assert!(err.has_field("title"));
        assert!(err.has_field("author"));
    }

    fn stored_hobbit() -> Book {
        let now = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        Book::from_fields(BookId::new(), hobbit().validate_at(YEAR).unwrap(), now)
    }

    #[test]
    fn patch_overlays_only_given_fields() {
        let book = stored_hobbit();
        let patch = BookPatch {
            genre: Some(String::new()),
            status: Some("Read".into()),
            ..BookPatch::default()
        };
        let fields = patch.merge_onto(&book).validate_at(YEAR).unwrap();
        assert_eq!(fields.title, "The Hobbit");
        assert_eq!(fields.genre, None);
        assert_eq!(fields.status, BookStatus::Read);
        assert_eq!(fields.publication_year, Some(1937));
    }

    #[test]
    fn patch_null_year_clears_missing_year_keeps() {
        let book = stored_hobbit();

        let clear: BookPatch = serde_json::from_str(r#"{"publicationYear":null}"#).unwrap();
        assert_eq!(clear.publication_year, Some(None));
        let fields = clear.merge_onto(&book).validate_at(YEAR).unwrap();
        assert_eq!(fields.publication_year, None);

        let keep: BookPatch = serde_json::from_str(r#"{"notes":"signed"}"#).unwrap();
        assert_eq!(keep.publication_year, None);
        let fields = keep.merge_onto(&book).validate_at(YEAR).unwrap();
        assert_eq!(fields.publication_year, Some(1937));
        assert_eq!(fields.notes.as_deref(), Some("signed"));
    }

    #[test]
    fn empty_patch() {
        assert!(BookPatch::default().is_empty());
        assert!(!BookPatch::status("Read").is_empty());
    }

    proptest! {
        #[test]
        fn non_blank_names_always_validate(
            title in "[A-Za-z0-9][A-Za-z0-9 ]{0,30}",
            author in "[A-Za-z][A-Za-z .]{0,30}",
            pad in " {0,3}",
        ) {
            let draft = BookDraft::new(format!("{pad}{title}{pad}"), format!("{pad}{author}{pad}"));
            let fields = draft.validate_at(YEAR).unwrap();
            prop_assert_eq!(fields.title, title.trim());
            prop_assert_eq!(fields.author, author.trim());
        }

        #[test]
        fn year_accepted_iff_in_range(year in -5000i32..5000) {
            let result = BookDraft::new("t", "a").with_year(year).validate_at(YEAR);
            prop_assert_eq!(result.is_ok(), (MIN_PUBLICATION_YEAR..=YEAR).contains(&year));
        }
    }
}
