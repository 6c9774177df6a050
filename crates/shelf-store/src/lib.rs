//! Book collection storage for Shelf.
//!
//! The store exclusively owns every [`Book`](shelf_types::Book) record and
//! is the only component that creates, revises or removes them. Callers
//! receive clones.
//!
//! # Storage Backends
//!
//! All backends implement the [`CollectionStore`] trait:
//!
//! - [`InMemoryCollectionStore`] -- `RwLock`-guarded store for tests and embedding
//! - [`JsonFileStore`] -- durable store persisted as a single JSON document
//!
//! # Design Rules
//!
//! 1. Every mutation validates its input before touching state.
//! 2. Mutations are serialized; concurrent callers see a total order.
//! 3. Readers never observe a partially applied mutation.
//! 4. A mutation that fails (validation, lookup or persistence) leaves the
//!    collection exactly as it was.
//! 5. `list()` returns books in insertion order.
//! 6. Errors are returned to the caller and never retried internally.
//! 7. A mutation whose [`CommitGuard`] was abandoned commits nothing.

pub mod error;
pub mod file;
pub mod guard;
pub mod memory;
mod state;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use file::JsonFileStore;
pub use guard::CommitGuard;
pub use memory::InMemoryCollectionStore;
pub use traits::{CollectionSnapshot, CollectionStore};
