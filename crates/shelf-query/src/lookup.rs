use shelf_types::{Book, BookId};

/// Shortest id prefix accepted as an identifier.
const MIN_ID_PREFIX: usize = 8;

/// Resolve a human-supplied identifier to a single book.
///
/// Tried in order, first hit wins:
/// 1. a full book id
/// 2. a title, compared case-insensitively as a whole value
/// 3. an ISBN, compared exactly after trimming
/// 4. an id prefix of at least 8 characters that matches exactly one book
///
/// When several books share a title or ISBN, the earliest in `books`
/// order is returned.
pub fn find_by_identifier<'a>(books: &'a [Book], identifier: &str) -> Option<&'a Book> {
    let identifier = identifier.trim();
    if identifier.is_empty() {
        return None;
    }

    if let Ok(id) = BookId::parse(identifier) {
        if let Some(book) = books.iter().find(|b| b.id == id) {
            return Some(book);
        }
    }

    let lowered = identifier.to_lowercase();
    if let Some(book) = books.iter().find(|b| b.title.to_lowercase() == lowered) {
        return Some(book);
    }

    if let Some(book) = books
        .iter()
        .find(|b| b.isbn.as_deref().map(str::trim) == Some(identifier))
    {
        return Some(book);
    }

    if lowered.len() >= MIN_ID_PREFIX {
        let mut candidates = books
            .iter()
            .filter(|b| b.id.to_string().starts_with(&lowered));
        if let (Some(book), None) = (candidates.next(), candidates.next()) {
            return Some(book);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shelf_types::BookDraft;

    fn book(title: &str, isbn: Option<&str>) -> Book {
        let mut draft = BookDraft::new(title, "Someone");
        draft.isbn = isbn.map(str::to_string);
        Book::from_fields(BookId::new(), draft.validate_at(2026).unwrap(), Utc::now())
    }

    fn shelf() -> Vec<Book> {
        vec![
            book("The Hobbit", Some("978-0547928227")),
            book("Dune", Some("978-0441172719")),
            book("The Hobbit", None),
        ]
    }

    #[test]
    fn by_full_id() {
        let books = shelf();
        let id = books[2].id.to_string();
        assert_eq!(find_by_identifier(&books, &id).unwrap().id, books[2].id);
    }

    #[test]
    fn by_title_case_insensitive_first_wins() {
        let books = shelf();
        let found = find_by_identifier(&books, "  the HOBBIT ").unwrap();
        assert_eq!(found.id, books[0].id);
    }

    #[test]
    fn by_isbn() {
        let books = shelf();
        let found = find_by_identifier(&books, "978-0441172719").unwrap();
        assert_eq!(found.title, "Dune");
    }

    #[test]
    fn by_unique_id_prefix() {
        let books = shelf();
        let prefix = books[1].id.to_string()[..13].to_string();
        let matches = books
            .iter()
            .filter(|b| b.id.to_string().starts_with(&prefix))
            .count();
        let found = find_by_identifier(&books, &prefix);
        if matches == 1 {
            assert_eq!(found.unwrap().id, books[1].id);
        } else {
            assert!(found.is_none());
        }
    }

    #[test]
    fn short_prefix_and_unknown_miss() {
        let books = shelf();
        let short = books[0].id.to_string()[..4].to_string();
        assert!(find_by_identifier(&books, &short).is_none());
        assert!(find_by_identifier(&books, "Neuromancer").is_none());
        assert!(find_by_identifier(&books, "  ").is_none());
        assert!(find_by_identifier(&[], "Dune").is_none());
    }
}
