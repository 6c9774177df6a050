use std::collections::{BTreeMap, HashMap};

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use shelf_types::{Book, BookStatus, Timestamp};

/// A name and how many books carry it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedCount {
    pub name: String,
    pub count: usize,
}

/// Statistics derived from a whole collection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_books: usize,
    /// Every status is present, zero-filled.
    pub status_counts: BTreeMap<BookStatus, usize>,
    /// Most frequent first, ties alphabetical. Books without a genre are
    /// not counted.
    pub top_genres: Vec<RankedCount>,
    /// Most frequent first, ties alphabetical.
    pub top_authors: Vec<RankedCount>,
    /// Head of `top_genres` before any truncation.
    pub top_genre: Option<String>,
    /// Head of `top_authors` before any truncation.
    pub top_author: Option<String>,
    /// `Read` books last updated in the current calendar year (UTC).
    pub books_read_this_year: usize,
    /// `Read` books last updated in the previous calendar year (UTC).
    pub books_read_last_year: usize,
    pub currently_reading: usize,
    /// Books per publication year, ascending. Books without a year are
    /// not counted.
    pub publication_years: BTreeMap<i32, usize>,
}

impl Statistics {
    /// Derive statistics from a snapshot of books.
    ///
    /// `updated_at` stands in for "date finished" on `Read` books: it is
    /// the last time the record changed, which for a finished book is
    /// normally the move to `Read`.
    pub fn compute(books: &[Book], now: Timestamp) -> Self {
        let this_year = now.year();
        let last_year = this_year - 1;

        let mut status_counts: BTreeMap<BookStatus, usize> =
            BookStatus::ALL.into_iter().map(|s| (s, 0)).collect();
        let mut genres: HashMap<&str, usize> = HashMap::new();
        let mut authors: HashMap<&str, usize> = HashMap::new();
        let mut publication_years = BTreeMap::new();
        let mut books_read_this_year = 0;
        let mut books_read_last_year = 0;

        for book in books {
            *status_counts.entry(book.status).or_default() += 1;

            if let Some(genre) = book.genre.as_deref().filter(|g| !g.trim().is_empty()) {
                *genres.entry(genre).or_default() += 1;
            }
            if !book.author.trim().is_empty() {
                *authors.entry(book.author.as_str()).or_default() += 1;
            }
            if let Some(year) = book.publication_year {
                *publication_years.entry(year).or_default() += 1;
            }

            if book.status == BookStatus::Read {
                let read_year = book.updated_at.year();
                if read_year == this_year {
                    books_read_this_year += 1;
                } else if read_year == last_year {
                    books_read_last_year += 1;
                }
            }
        }

        let currently_reading = status_counts[&BookStatus::Reading];
        let top_genres = rank(genres);
        let top_authors = rank(authors);

        Self {
            total_books: books.len(),
            status_counts,
            top_genre: top_genres.first().map(|r| r.name.clone()),
            top_author: top_authors.first().map(|r| r.name.clone()),
            top_genres,
            top_authors,
            books_read_this_year,
            books_read_last_year,
            currently_reading,
            publication_years,
        }
    }

    /// Count for one status.
    pub fn count(&self, status: BookStatus) -> usize {
        self.status_counts.get(&status).copied().unwrap_or(0)
    }

    /// Keep only the first `n` entries of each ranking.
    pub fn limit_top(mut self, n: usize) -> Self {
        self.top_genres.truncate(n);
        self.top_authors.truncate(n);
        self
    }
}

fn rank(counts: HashMap<&str, usize>) -> Vec<RankedCount> {
    let mut ranked: Vec<RankedCount> = counts
        .into_iter()
        .map(|(name, count)| RankedCount {
            name: name.to_string(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    ranked
}
