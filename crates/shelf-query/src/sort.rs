use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use shelf_types::Book;

use crate::error::QueryError;

/// Explicit orderings for listing books.
///
/// The store lists in insertion order; callers that want anything else
/// ask for it here.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Store order.
    #[default]
    Insertion,
    /// Title, case-insensitive.
    Title,
    /// Author, case-insensitive.
    Author,
    /// Publication year ascending; books without a year last.
    Year,
    /// Creation time ascending.
    #[serde(alias = "date_added")]
    Added,
    /// Most recently added first.
    #[serde(alias = "newest")]
    Recent,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Insertion => "insertion",
            Self::Title => "title",
            Self::Author => "author",
            Self::Year => "year",
            Self::Added => "added",
            Self::Recent => "recent",
        }
    }
}

impl FromStr for SortKey {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "insertion" | "none" => Ok(Self::Insertion),
            "title" => Ok(Self::Title),
            "author" => Ok(Self::Author),
            "year" => Ok(Self::Year),
            "added" | "date_added" => Ok(Self::Added),
            "recent" | "newest" => Ok(Self::Recent),
            _ => Err(QueryError::UnknownSortKey(s.to_string())),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable sort in place by the given key.
pub fn sort_books(books: &mut [Book], key: SortKey) {
    match key {
        SortKey::Insertion => {}
        SortKey::Title => books.sort_by_cached_key(|b| b.title.to_lowercase()),
        SortKey::Author => books.sort_by_cached_key(|b| b.author.to_lowercase()),
        SortKey::Year => books.sort_by_key(|b| (b.publication_year.is_none(), b.publication_year)),
        SortKey::Added => books.sort_by_key(|b| b.created_at),
        SortKey::Recent => books.sort_by_key(|b| std::cmp::Reverse(b.created_at)),
    }
}

/// Sort, then keep at most `limit` books.
pub fn sort_and_limit(books: &mut Vec<Book>, key: SortKey, limit: Option<usize>) {
    sort_books(books, key);
    if let Some(limit) = limit {
        books.truncate(limit);
    }
}
