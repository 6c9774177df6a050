use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when parsing primitive Shelf types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid book id: {0}")]
    InvalidId(String),

    #[error("unknown status {0:?} (expected one of Available, Reading, Read, Borrowed, Wishlist)")]
    UnknownStatus(String),
}

/// A single rejected field, reported with its wire name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Candidate book fields failed validation.
///
/// Every failing field is reported, not just the first one found.
#[derive(Clone, Debug, Error, PartialEq, Eq, Serialize, Deserialize)]
#[error("invalid book fields: {}", summarize(.issues))]
pub struct ValidationError {
    issues: Vec<FieldIssue>,
}

impl ValidationError {
    /// Build from a list of issues. Callers only construct this with at
    /// least one issue.
    pub fn new(issues: Vec<FieldIssue>) -> Self {
        Self { issues }
    }

    /// Shorthand for a single-field failure.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(vec![FieldIssue::new(field, message)])
    }

    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }

    /// Returns `true` if the given field was rejected.
    pub fn has_field(&self, field: &str) -> bool {
        self.issues.iter().any(|issue| issue.field == field)
    }
}

fn summarize(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("{}: {}", issue.field, issue.message))
        .collect::<Vec<_>>()
        .join("; ")
}
