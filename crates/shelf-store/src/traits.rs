use shelf_types::{Book, BookDraft, BookId, BookPatch};

use crate::error::{StoreError, StoreResult};
use crate::guard::CommitGuard;

/// All books at one store version.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CollectionSnapshot {
    /// Mutation counter the books were read at.
    pub version: u64,
    /// Books in insertion order.
    pub books: Vec<Book>,
}

/// Owner of a book collection.
///
/// All implementations must satisfy these invariants:
/// - Ids are unique across the collection at all times.
/// - `add`, `update` and `delete` are serialized with respect to one another.
/// - Reads never observe a partially applied mutation.
/// - A failed mutation leaves the collection unchanged.
/// - A mutation whose guard was abandoned fails with `Unavailable` and
///   leaves the collection unchanged.
/// - `version()` increases by one with every successful mutation.
pub trait CollectionStore: Send + Sync {
    /// Validate `draft`, assign a fresh id and store the new book, unless
    /// `guard` was abandoned first.
    fn add_guarded(&self, draft: &BookDraft, guard: &CommitGuard) -> StoreResult<Book>;

    /// Overlay `patch` on the book, re-validate and store the revision,
    /// unless `guard` was abandoned first.
    ///
    /// Fails with `NotFound` before any validation if the id is unknown.
    fn update_guarded(&self, id: &BookId, patch: &BookPatch, guard: &CommitGuard)
        -> StoreResult<Book>;

    /// Permanently remove a book and return the removed record, unless
    /// `guard` was abandoned first.
    fn delete_guarded(&self, id: &BookId, guard: &CommitGuard) -> StoreResult<Book>;

    /// Read a single book.
    fn get(&self, id: &BookId) -> StoreResult<Book>;

    /// Read every book together with the version it was read at.
    fn snapshot(&self) -> StoreResult<CollectionSnapshot>;

    /// Current mutation counter.
    fn version(&self) -> u64;

    /// Validate `draft`, assign a fresh id and store the new book.
    fn add(&self, draft: &BookDraft) -> StoreResult<Book> {
        self.add_guarded(draft, &CommitGuard::unguarded())
    }

    /// Overlay `patch` on the book, re-validate and store the revision.
    fn update(&self, id: &BookId, patch: &BookPatch) -> StoreResult<Book> {
        self.update_guarded(id, patch, &CommitGuard::unguarded())
    }

    /// Permanently remove a book and return the removed record.
    fn delete(&self, id: &BookId) -> StoreResult<Book> {
        self.delete_guarded(id, &CommitGuard::unguarded())
    }

    /// All books in insertion order.
    fn list(&self) -> StoreResult<Vec<Book>> {
        Ok(self.snapshot()?.books)
    }

    /// Number of stored books.
    fn len(&self) -> StoreResult<usize> {
        Ok(self.list()?.len())
    }

    /// Returns `true` if the collection holds no books.
    fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Check whether a book exists.
    fn contains(&self, id: &BookId) -> StoreResult<bool> {
        match self.get(id) {
            Ok(_) => Ok(true),
            Err(StoreError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
