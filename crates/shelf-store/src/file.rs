//! Durable collection store backed by a single JSON document.
//!
//! On-disk format:
//! ```text
//! {
//!   "name": "My Library",
//!   "books": { "<id>": { ...book... }, ... }
//! }
//! ```
//!
//! Every mutation rewrites the whole document to a temporary file in the
//! same directory and atomically renames it over the old one, so a crash
//! leaves either the previous or the next version on disk.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

use serde::{Deserialize, Serialize};
use shelf_types::{current_year, Book, BookDraft, BookId, BookPatch};
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::guard::CommitGuard;
use crate::state::CollectionState;
use crate::traits::{CollectionSnapshot, CollectionStore};

#[derive(Serialize, Deserialize)]
struct LibraryDocument {
    name: String,
    #[serde(default)]
    books: BTreeMap<BookId, Book>,
}

/// JSON-file-backed book collection.
///
/// Mutations are serialized by a writer mutex. The next state is built
/// and persisted off to the side, then swapped in under a short write
/// lock, so readers are never blocked on disk I/O and never see a state
/// that failed to persist.
pub struct JsonFileStore {
    path: PathBuf,
    name: String,
    state: RwLock<CollectionState>,
    writer: Mutex<()>,
}

impl JsonFileStore {
    /// Open the library at `path`, or start an empty one if the file does
    /// not exist yet. Nothing is written until the first mutation.
    ///
    /// A library name stored in the file takes precedence over `name`.
    pub fn open(path: impl AsRef<Path>, name: impl Into<String>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let mut name = name.into();

        let state = match fs::File::open(&path) {
            Ok(file) => {
                let doc: LibraryDocument = serde_json::from_reader(BufReader::new(file))
                    .map_err(|e| StoreError::Corrupt {
                        path: path.clone(),
                        reason: e.to_string(),
                    })?;
                name = doc.name;
                let state = Self::restore(&path, doc.books)?;
                info!(path = %path.display(), books = state.len(), "library loaded");
                state
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no library file yet; starting empty");
                CollectionState::default()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            name,
            state: RwLock::new(state),
            writer: Mutex::new(()),
        })
    }

    /// Path of the backing JSON document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Library display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rebuild insertion order from a loaded id map: ids are map keys, so
    /// order is recovered from `(created_at, id)`.
    ///
    /// Every record must still pass validation; a hand-edited file cannot
    /// smuggle in an empty title or an out-of-range year.
    fn restore(path: &Path, books: BTreeMap<BookId, Book>) -> StoreResult<CollectionState> {
        let corrupt = |reason: String| StoreError::Corrupt {
            path: path.to_path_buf(),
            reason,
        };
        let year = current_year();

        let mut ordered = Vec::with_capacity(books.len());
        for (key, book) in books {
            if key != book.id {
                return Err(corrupt(format!("entry {key} holds book {}", book.id)));
            }
            if let Err(e) = BookDraft::from(&book).validate_at(year) {
                return Err(corrupt(format!("book {key}: {e}")));
            }
            if book.updated_at < book.created_at {
                return Err(corrupt(format!("book {key}: updatedAt precedes createdAt")));
            }
            ordered.push(book);
        }
        ordered.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        CollectionState::from_books(ordered).map_err(|id| corrupt(format!("duplicate book id {id}")))
    }

    fn persist(&self, state: &CollectionState) -> io::Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let doc = LibraryDocument {
            name: self.name.clone(),
            books: state.books().map(|book| (book.id, book.clone())).collect(),
        };

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, &doc)?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        debug!(path = %self.path.display(), books = state.len(), "library saved");
        Ok(())
    }

    /// Apply one mutation: clone, mutate, claim the commit, persist, swap.
    fn mutate<F>(&self, op: &'static str, guard: &CommitGuard, apply: F) -> StoreResult<Book>
    where
        F: FnOnce(&mut CollectionState) -> StoreResult<Book>,
    {
        let _serialized = self.writer.lock().expect("writer mutex poisoned");

        let mut next = self.state.read().expect("lock poisoned").clone();
        let book = apply(&mut next)?;

        if !guard.begin_commit() {
            debug!(op, "mutation abandoned before commit");
            return Err(StoreError::abandoned(op));
        }

        if let Err(e) = self.persist(&next) {
            warn!(op, path = %self.path.display(), error = %e, "failed to save library");
            return Err(StoreError::Unavailable(format!(
                "cannot write {}: {e}",
                self.path.display()
            )));
        }

        *self.state.write().expect("lock poisoned") = next;
        debug!(op, id = %book.id, "mutation committed");
        Ok(book)
    }
}

impl CollectionStore for JsonFileStore {
    fn add_guarded(&self, draft: &BookDraft, guard: &CommitGuard) -> StoreResult<Book> {
        self.mutate("add", guard, |state| state.insert(draft))
    }

    fn update_guarded(
        &self,
        id: &BookId,
        patch: &BookPatch,
        guard: &CommitGuard,
    ) -> StoreResult<Book> {
        self.mutate("update", guard, |state| state.update(id, patch))
    }

    fn delete_guarded(&self, id: &BookId, guard: &CommitGuard) -> StoreResult<Book> {
        self.mutate("delete", guard, |state| state.remove(id))
    }

    fn get(&self, id: &BookId) -> StoreResult<Book> {
        self.state.read().expect("lock poisoned").get(id).cloned()
    }

    fn snapshot(&self) -> StoreResult<CollectionSnapshot> {
        Ok(self.state.read().expect("lock poisoned").snapshot())
    }

    fn version(&self) -> u64 {
        self.state.read().expect("lock poisoned").version()
    }

    fn len(&self) -> StoreResult<usize> {
        Ok(self.state.read().expect("lock poisoned").len())
    }
}

impl std::fmt::Debug for JsonFileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonFileStore")
            .field("path", &self.path)
            .field("name", &self.name)
            .finish()
    }
}
