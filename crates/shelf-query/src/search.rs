//! Ranked text search over book titles, authors, genres and ISBNs.

use serde::Serialize;
use shelf_types::Book;

use crate::filter::BookFilter;

/// How a book matched a query. Lower ranks sort first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum MatchRank {
    /// The whole title equals the query.
    ExactTitle,
    /// The whole author equals the query.
    ExactAuthor,
    /// The title contains the query.
    TitleContains,
    /// The author, genre or ISBN contains the query.
    OtherContains,
}

/// A matching book and how it matched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub book: Book,
    pub rank: MatchRank,
}

/// Trim and lowercase a query. Returns `None` for a blank query.
pub fn normalize_query(query: &str) -> Option<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Classify one book against an already-normalized query.
fn rank(book: &Book, needle: &str) -> Option<MatchRank> {
    let title = book.title.to_lowercase();
    let author = book.author.to_lowercase();

    if title == needle {
        return Some(MatchRank::ExactTitle);
    }
    if author == needle {
        return Some(MatchRank::ExactAuthor);
    }
    if title.contains(needle) {
        return Some(MatchRank::TitleContains);
    }

    let other = [Some(&book.author), book.genre.as_ref(), book.isbn.as_ref()];
    other
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(needle))
        .then_some(MatchRank::OtherContains)
}

/// Search and keep the match rank of every hit.
///
/// Hits are ordered by rank, then most recently created first, then by
/// id (descending) so equal timestamps still order deterministically.
/// A blank query matches nothing.
pub fn search_ranked(books: &[Book], query: &str, filter: &BookFilter) -> Vec<SearchHit> {
    let Some(needle) = normalize_query(query) else {
        return Vec::new();
    };

    let mut hits: Vec<SearchHit> = books
        .iter()
        .filter(|book| filter.matches(book))
        .filter_map(|book| {
            rank(book, &needle).map(|rank| SearchHit {
                book: book.clone(),
                rank,
            })
        })
        .collect();

    hits.sort_by(|a, b| {
        a.rank
            .cmp(&b.rank)
            .then_with(|| b.book.created_at.cmp(&a.book.created_at))
            .then_with(|| b.book.id.cmp(&a.book.id))
    });
    hits
}

/// Search without a filter and return the books only.
pub fn search(books: &[Book], query: &str) -> Vec<Book> {
    search_ranked(books, query, &BookFilter::default())
        .into_iter()
        .map(|hit| hit.book)
        .collect()
}
