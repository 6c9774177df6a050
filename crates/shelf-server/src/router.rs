use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;
use shelf_sdk::Library;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::handler;

/// Build the axum router with all Shelf endpoints.
pub fn build_router(library: Arc<Library>, config: &ServerConfig) -> Router {
    let cors = if config.allow_any_origin {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    Router::new()
        .route("/v1/health", get(handler::health_handler))
        .route("/v1/info", get(handler::info_handler))
        .route("/v1/books", post(handler::add_book).get(handler::list_books))
        .route("/v1/books/search", get(handler::search_books))
        .route(
            "/v1/books/:id",
            get(handler::get_book)
                .patch(handler::update_book)
                .delete(handler::delete_book),
        )
        .route("/v1/books/:id/status", put(handler::set_status))
        .route("/v1/stats", get(handler::stats_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(library)
}
