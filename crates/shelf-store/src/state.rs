//! Backend-independent collection state shared by every store.

use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use shelf_types::{current_year, Book, BookDraft, BookId, BookPatch, Timestamp};

use crate::error::{StoreError, StoreResult};
use crate::traits::CollectionSnapshot;

/// Books keyed by insertion sequence, plus an id index.
#[derive(Clone, Debug, Default)]
pub(crate) struct CollectionState {
    books: BTreeMap<u64, Book>,
    index: HashMap<BookId, u64>,
    next_seq: u64,
    version: u64,
    /// Latest `created_at` handed out; creation times strictly increase.
    last_created: Option<Timestamp>,
}

impl CollectionState {
    /// Rebuild state from already-validated records (e.g. a loaded file).
    ///
    /// Records keep the order they are given in. The version starts at 0.
    pub(crate) fn from_books(books: impl IntoIterator<Item = Book>) -> Result<Self, BookId> {
        let mut state = Self::default();
        for book in books {
            if state.index.contains_key(&book.id) {
                return Err(book.id);
            }
            state.push(book);
        }
        Ok(state)
    }

    pub(crate) fn version(&self) -> u64 {
        self.version
    }

    pub(crate) fn len(&self) -> usize {
        self.books.len()
    }

    pub(crate) fn get(&self, id: &BookId) -> StoreResult<&Book> {
        self.index
            .get(id)
            .and_then(|seq| self.books.get(seq))
            .ok_or(StoreError::NotFound(*id))
    }

    pub(crate) fn books(&self) -> impl Iterator<Item = &Book> {
        self.books.values()
    }

    pub(crate) fn snapshot(&self) -> CollectionSnapshot {
        CollectionSnapshot {
            version: self.version,
            books: self.books.values().cloned().collect(),
        }
    }

    pub(crate) fn insert(&mut self, draft: &BookDraft) -> StoreResult<Book> {
        let fields = draft.validate()?;
        let id = BookId::new();
        debug_assert!(
            !self.index.contains_key(&id),
            "duplicate book id generated: {id}"
        );
        if self.index.contains_key(&id) {
            return Err(StoreError::DuplicateId(id));
        }

        let book = Book::from_fields(id, fields, self.creation_time());
        self.push(book.clone());
        self.version += 1;
        Ok(book)
    }

    pub(crate) fn update(&mut self, id: &BookId, patch: &BookPatch) -> StoreResult<Book> {
        let seq = *self.index.get(id).ok_or(StoreError::NotFound(*id))?;
        let current = self.books.get(&seq).ok_or(StoreError::NotFound(*id))?;

        let fields = patch.merge_onto(current).validate_at(current_year())?;
        let revised = current.revise(fields, Utc::now());
        self.books.insert(seq, revised.clone());
        self.version += 1;
        Ok(revised)
    }

    pub(crate) fn remove(&mut self, id: &BookId) -> StoreResult<Book> {
        let seq = self.index.remove(id).ok_or(StoreError::NotFound(*id))?;
        let book = self.books.remove(&seq).ok_or(StoreError::NotFound(*id))?;
        self.version += 1;
        Ok(book)
    }

    fn creation_time(&self) -> Timestamp {
        let now = Utc::now();
        match self.last_created {
            Some(last) if now <= last => last + chrono::Duration::microseconds(1),
            _ => now,
        }
    }

    fn push(&mut self, book: Book) {
        if self.last_created.map_or(true, |last| book.created_at > last) {
            self.last_created = Some(book.created_at);
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.index.insert(book.id, seq);
        self.books.insert(seq, book);
    }
}
