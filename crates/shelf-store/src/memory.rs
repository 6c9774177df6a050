use std::sync::RwLock;

use shelf_types::{Book, BookDraft, BookId, BookPatch};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::guard::CommitGuard;
use crate::state::CollectionState;
use crate::traits::{CollectionSnapshot, CollectionStore};

/// In-memory book collection.
///
/// Intended for tests and embedding. Mutations run under the write lock,
/// so they are serialized and readers see either the old or the new
/// state. Books are cloned on the way in and out.
pub struct InMemoryCollectionStore {
    state: RwLock<CollectionState>,
}

impl InMemoryCollectionStore {
    /// Create a new empty collection.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(CollectionState::default()),
        }
    }
}

impl Default for InMemoryCollectionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CollectionStore for InMemoryCollectionStore {
    fn add_guarded(&self, draft: &BookDraft, guard: &CommitGuard) -> StoreResult<Book> {
        let mut state = self.state.write().expect("lock poisoned");
        if !guard.begin_commit() {
            return Err(StoreError::abandoned("add"));
        }
        let book = state.insert(draft)?;
        debug!(id = %book.id, title = %book.title, "book added");
        Ok(book)
    }

    fn update_guarded(
        &self,
        id: &BookId,
        patch: &BookPatch,
        guard: &CommitGuard,
    ) -> StoreResult<Book> {
        let mut state = self.state.write().expect("lock poisoned");
        if !guard.begin_commit() {
            return Err(StoreError::abandoned("update"));
        }
        let book = state.update(id, patch)?;
        debug!(id = %book.id, status = %book.status, "book updated");
        Ok(book)
    }

    fn delete_guarded(&self, id: &BookId, guard: &CommitGuard) -> StoreResult<Book> {
        let mut state = self.state.write().expect("lock poisoned");
        if !guard.begin_commit() {
            return Err(StoreError::abandoned("delete"));
        }
        let book = state.remove(id)?;
        debug!(id = %book.id, "book deleted");
        Ok(book)
    }

    fn get(&self, id: &BookId) -> StoreResult<Book> {
        let state = self.state.read().expect("lock poisoned");
        state.get(id).cloned()
    }

    fn snapshot(&self) -> StoreResult<CollectionSnapshot> {
        let state = self.state.read().expect("lock poisoned");
        Ok(state.snapshot())
    }

    fn version(&self) -> u64 {
        self.state.read().expect("lock poisoned").version()
    }

    fn len(&self) -> StoreResult<usize> {
        Ok(self.state.read().expect("lock poisoned").len())
    }
}

impl std::fmt::Debug for InMemoryCollectionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read().expect("lock poisoned");
        f.debug_struct("InMemoryCollectionStore")
            .field("book_count", &state.len())
            .field("version", &state.version())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_types::BookStatus;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    fn hobbit() -> BookDraft {
        BookDraft::new("The Hobbit", "J.R.R. Tolkien")
            .with_genre("Fantasy")
            .with_year(1937)
    }

    // -----------------------------------------------------------------------
    // Core CRUD
    // -----------------------------------------------------------------------

    #[test]
    fn add_and_get() {
        let store = InMemoryCollectionStore::new();
        let book = store.add(&hobbit()).unwrap();
        assert_eq!(book.title, "The Hobbit");
        assert_eq!(book.status, BookStatus::Available);
        assert_eq!(book.created_at, book.updated_at);
        assert_eq!(store.get(&book.id).unwrap(), book);
    }

    #[test]
    fn add_rejects_invalid_fields() {
        let store = InMemoryCollectionStore::new();
        let err = store.add(&BookDraft::new("", "Nobody")).unwrap_err();
        match err {
            StoreError::Validation(v) => assert!(v.has_field("title")),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(store.is_empty().unwrap());
        assert_eq!(store.version(), 0);
    }

    #[test]
    fn add_assigns_unique_ids() {
        let store = InMemoryCollectionStore::new();
        let ids: HashSet<_> = (0..50)
            .map(|i| store.add(&BookDraft::new(format!("Book {i}"), "A")).unwrap().id)
            .collect();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn list_is_insertion_ordered() {
        let store = InMemoryCollectionStore::new();
        let titles = ["Zeta", "Alpha", "Mu"];
        for t in titles {
            store.add(&BookDraft::new(t, "A")).unwrap();
        }
        let listed: Vec<_> = store.list().unwrap().into_iter().map(|b| b.title).collect();
        assert_eq!(listed, titles);
    }

    #[test]
    fn update_status_bumps_updated_at() {
        let store = InMemoryCollectionStore::new();
        let book = store.add(&hobbit()).unwrap();
        let before = store.get(&book.id).unwrap().updated_at;

        store.update(&book.id, &BookPatch::status("Read")).unwrap();
        let after = store.get(&book.id).unwrap();
        assert_eq!(after.status, BookStatus::Read);
        assert!(after.updated_at > before);
        assert_eq!(after.created_at, book.created_at);
    }

    #[test]
    fn invalid_update_leaves_book_unchanged() {
        let store = InMemoryCollectionStore::new();
        let book = store.add(&hobbit()).unwrap();
        let patch = BookPatch {
            author: Some("   ".into()),
            ..BookPatch::default()
        };
        assert!(matches!(
            store.update(&book.id, &patch),
            Err(StoreError::Validation(_))
        ));
        assert_eq!(store.get(&book.id).unwrap(), book);
    }

    // -----------------------------------------------------------------------
    // Missing ids
    // -----------------------------------------------------------------------

    #[test]
    fn unknown_id_is_not_found_everywhere() {
        let store = InMemoryCollectionStore::new();
        store.add(&hobbit()).unwrap();
        let ghost = BookId::new();
        assert!(store.get(&ghost).unwrap_err().is_not_found());
        assert!(store
            .update(&ghost, &BookPatch::status("Read"))
            .unwrap_err()
            .is_not_found());
        assert!(store.delete(&ghost).unwrap_err().is_not_found());
        assert!(!store.contains(&ghost).unwrap());
    }

    #[test]
    fn not_found_wins_over_invalid_patch() {
        let store = InMemoryCollectionStore::new();
        let err = store
            .update(&BookId::new(), &BookPatch::status("Lost"))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn delete_twice() {
        let store = InMemoryCollectionStore::new();
        let keep = store.add(&BookDraft::new("Keep", "A")).unwrap();
        let gone = store.add(&BookDraft::new("Gone", "A")).unwrap();

        let removed = store.delete(&gone.id).unwrap();
        assert_eq!(removed.id, gone.id);
        let after_first = store.snapshot().unwrap();

        assert!(store.delete(&gone.id).unwrap_err().is_not_found());
        assert_eq!(store.snapshot().unwrap(), after_first);
        assert_eq!(store.list().unwrap(), vec![keep]);
    }

    // -----------------------------------------------------------------------
    // Versioning
    // -----------------------------------------------------------------------

    #[test]
    fn version_counts_successful_mutations() {
        let store = InMemoryCollectionStore::new();
        let book = store.add(&hobbit()).unwrap();
        store.update(&book.id, &BookPatch::status("Reading")).unwrap();
        let _ = store.delete(&BookId::new());
        store.delete(&book.id).unwrap();
        assert_eq!(store.version(), 3);
    }

    #[test]
    fn abandoned_mutations_commit_nothing() {
        let store = InMemoryCollectionStore::new();
        let book = store.add(&hobbit()).unwrap();

        let guard = CommitGuard::new();
        assert!(guard.abandon());
        let err = store.add_guarded(&BookDraft::new("Emma", "Jane Austen"), &guard).unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
        assert!(store
            .update_guarded(&book.id, &BookPatch::status("Read"), &guard)
            .is_err());
        assert!(store.delete_guarded(&book.id, &guard).is_err());

        assert_eq!(store.list().unwrap(), vec![book]);
        assert_eq!(store.version(), 1);
    }

    #[test]
    fn committed_guard_cannot_be_abandoned() {
        let store = InMemoryCollectionStore::new();
        let guard = CommitGuard::new();
        store.add_guarded(&hobbit(), &guard).unwrap();
        assert!(!guard.abandon());
        assert_eq!(store.len().unwrap(), 1);
    }

    // -----------------------------------------------------------------------
    // Concurrency
    // -----------------------------------------------------------------------

    #[test]
    fn concurrent_adds_lose_nothing() {
        let store = Arc::new(InMemoryCollectionStore::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    (0..25)
                        .map(|i| {
                            store
                                .add(&BookDraft::new(format!("t{t}-{i}"), "Writer"))
                                .unwrap()
                                .id
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut ids = HashSet::new();
        for h in handles {
            for id in h.join().expect("thread should not panic") {
                assert!(ids.insert(id), "duplicate id {id}");
            }
        }
        assert_eq!(ids.len(), 200);
        assert_eq!(store.len().unwrap(), 200);
        assert_eq!(store.version(), 200);
    }

    #[test]
    fn concurrent_reads_see_whole_books() {
        let store = Arc::new(InMemoryCollectionStore::new());
        let book = store.add(&hobbit()).unwrap();

        let writer = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..100 {
                    let status = if i % 2 == 0 { "Reading" } else { "Read" };
                    store.update(&book.id, &BookPatch::status(status)).unwrap();
                }
            })
        };
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..100 {
                        let snap = store.snapshot().unwrap();
                        assert_eq!(snap.books.len(), 1);
                        assert_eq!(snap.books[0].title, "The Hobbit");
                    }
                })
            })
            .collect();

        writer.join().expect("writer should not panic");
        for r in readers {
            r.join().expect("reader should not panic");
        }
        assert_eq!(store.version(), 101);
    }

    #[test]
    fn debug_format() {
        let store = InMemoryCollectionStore::new();
        store.add(&hobbit()).unwrap();
        let debug = format!("{store:?}");
        assert!(debug.contains("InMemoryCollectionStore"));
        assert!(debug.contains("book_count"));
    }
}
