use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use shelf_query::{find_by_identifier, search_ranked, sort_and_limit, BookFilter, SortKey};
use shelf_stats::{StatsCache, Statistics};
use shelf_store::{
    CollectionStore, CommitGuard, InMemoryCollectionStore, JsonFileStore, StoreResult,
};
use shelf_types::{Book, BookDraft, BookId, BookPatch};
use tracing::{debug, info, warn};

use crate::config::LibraryConfig;
use crate::error::{LibraryError, LibraryResult};

/// High-level Shelf library API.
///
/// Store calls are synchronous; each one runs on the blocking pool and is
/// bounded by `timeout`. When the timeout elapses the mutation is abandoned
/// through its [`CommitGuard`] and [`LibraryError::Unavailable`] is
/// returned; an abandoned mutation never commits. If the store had already
/// begun committing, the call waits for that commit and reports its real
/// outcome instead.
pub struct Library {
    name: String,
    store: Arc<dyn CollectionStore>,
    stats: StatsCache,
    timeout: Duration,
}

impl Library {
    /// Wrap an existing store backend.
    pub fn new(name: impl Into<String>, store: Arc<dyn CollectionStore>) -> Self {
        Self {
            name: name.into(),
            store,
            stats: StatsCache::new(),
            timeout: LibraryConfig::default().write_timeout(),
        }
    }

    /// An empty, non-persistent library.
    pub fn in_memory(name: impl Into<String>) -> Self {
        Self::new(name, Arc::new(InMemoryCollectionStore::new()))
    }

    /// Open (or start) the JSON-backed library described by `config`.
    pub fn open(config: &LibraryConfig) -> LibraryResult<Self> {
        let store = JsonFileStore::open(&config.data_path, config.library_name.clone())?;
        let name = store.name().to_string();
        info!(
            name = %name,
            path = %config.data_path.display(),
            books = store.len()?,
            "library opened"
        );
        Ok(Self::new(name, Arc::new(store)).with_timeout(config.write_timeout()))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Current store version.
    pub fn version(&self) -> u64 {
        self.store.version()
    }

    // ---- Mutations ----

    pub async fn add(&self, draft: BookDraft) -> LibraryResult<Book> {
        self.run("add", move |store, guard| store.add_guarded(&draft, guard)).await
    }

    pub async fn update(&self, id: BookId, patch: BookPatch) -> LibraryResult<Book> {
        self.run("update", move |store, guard| {
            store.update_guarded(&id, &patch, guard)
        })
        .await
    }

    /// Change only the status of a book.
    pub async fn set_status(&self, id: BookId, status: impl Into<String>) -> LibraryResult<Book> {
        self.update(id, BookPatch::status(status)).await
    }

    pub async fn delete(&self, id: BookId) -> LibraryResult<Book> {
        self.run("delete", move |store, guard| store.delete_guarded(&id, guard)).await
    }

    // ---- Reads ----

    pub async fn get(&self, id: BookId) -> LibraryResult<Book> {
        self.run("get", move |store, _| store.get(&id)).await
    }

    /// Books matching `filter`, ordered by `sort`, at most `limit` of them.
    pub async fn list(
        &self,
        filter: &BookFilter,
        sort: SortKey,
        limit: Option<usize>,
    ) -> LibraryResult<Vec<Book>> {
        let books = self.run("list", |store, _| store.list()).await?;
        let mut books = filter.apply(books);
        sort_and_limit(&mut books, sort, limit);
        Ok(books)
    }

    /// Ranked search; a blank query returns no books.
    pub async fn search(&self, query: &str, filter: &BookFilter) -> LibraryResult<Vec<Book>> {
        if shelf_query::normalize_query(query).is_none() {
            return Ok(Vec::new());
        }
        let books = self.run("search", |store, _| store.list()).await?;
        let hits = search_ranked(&books, query, filter);
        debug!(query, hits = hits.len(), "search");
        Ok(hits.into_iter().map(|hit| hit.book).collect())
    }

    /// Statistics for the current collection, cached per store version.
    pub async fn stats(&self) -> LibraryResult<Arc<Statistics>> {
        let now = Utc::now();
        if let Some(stats) = self.stats.get(self.store.version(), now) {
            return Ok(stats);
        }
        let (version, stats) = self
            .run("stats", move |store, _| {
                let snapshot = store.snapshot()?;
                Ok((snapshot.version, Statistics::compute(&snapshot.books, now)))
            })
            .await?;
        Ok(self.stats.put(version, now, stats))
    }

    /// Resolve an id, title or ISBN to a single book.
    pub async fn resolve(&self, identifier: &str) -> LibraryResult<Book> {
        let books = self.run("resolve", |store, _| store.list()).await?;
        find_by_identifier(&books, identifier)
            .cloned()
            .ok_or_else(|| LibraryError::NotFound(identifier.trim().to_string()))
    }

    /// Parse a book id supplied by a caller.
    ///
    /// A malformed id cannot name a stored book, so it is reported as
    /// not found.
    pub fn parse_id(raw: &str) -> LibraryResult<BookId> {
        BookId::parse(raw.trim()).map_err(|_| LibraryError::NotFound(raw.to_string()))
    }

    async fn run<T, F>(&self, op: &'static str, f: F) -> LibraryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn CollectionStore, &CommitGuard) -> StoreResult<T> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let guard = CommitGuard::new();
        let store_guard = guard.clone();
        let mut task = tokio::task::spawn_blocking(move || f(store.as_ref(), &store_guard));

        let joined = match tokio::time::timeout(self.timeout, &mut task).await {
            Ok(joined) => joined,
            Err(_) if guard.abandon() => {
                warn!(op, timeout_ms = self.timeout.as_millis() as u64, "store call timed out");
                return Err(LibraryError::Unavailable(format!(
                    "{op} timed out after {}ms",
                    self.timeout.as_millis()
                )));
            }
            Err(_) => {
                debug!(op, "timeout elapsed mid-commit; waiting for the outcome");
                task.await
            }
        };
        match joined {
            Ok(result) => result.map_err(LibraryError::from),
            Err(e) => Err(LibraryError::Internal(format!("{op} task failed: {e}"))),
        }
    }
}

impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library")
            .field("name", &self.name)
            .field("version", &self.store.version())
            .field("timeout", &self.timeout)
            .finish()
    }
}
