//! HTTP server for Shelf.
//!
//! Exposes a [`Library`](shelf_sdk::Library) as a small JSON API under
//! `/v1`: book CRUD, status changes, search, listing and statistics.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use error::{ErrorBody, ServerError, ServerResult};
pub use router::build_router;
pub use server::ShelfServer;
