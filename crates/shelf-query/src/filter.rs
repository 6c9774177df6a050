use serde::{Deserialize, Serialize};
use shelf_types::{Book, BookStatus};

/// Optional constraints applied to list and search results.
///
/// Every set field must match; an empty filter matches every book.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookFilter {
    /// Exact status.
    pub status: Option<BookStatus>,
    /// Genre, compared case-insensitively as a whole value.
    pub genre: Option<String>,
    /// Case-insensitive substring of the author.
    pub author: Option<String>,
}

impl BookFilter {
    /// Returns `true` if no constraint is set.
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.genre.is_none() && self.author.is_none()
    }

    /// Returns `true` if the given book satisfies every set constraint.
    pub fn matches(&self, book: &Book) -> bool {
        if let Some(status) = self.status {
            if book.status != status {
                return false;
            }
        }
        if let Some(ref genre) = self.genre {
            let wanted = genre.trim().to_lowercase();
            match &book.genre {
                Some(g) if g.to_lowercase() == wanted => {}
                _ => return false,
            }
        }
        if let Some(ref author) = self.author {
            let wanted = author.trim().to_lowercase();
            if !book.author.to_lowercase().contains(&wanted) {
                return false;
            }
        }
        true
    }

    /// Keep the matching books, preserving their order.
    pub fn apply(&self, books: Vec<Book>) -> Vec<Book> {
        if self.is_empty() {
            return books;
        }
        books.into_iter().filter(|book| self.matches(book)).collect()
    }
}
