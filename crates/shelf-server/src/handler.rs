use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::error::Category;
use serde_json::{json, Value};
use shelf_query::{BookFilter, SortKey};
use shelf_sdk::{
    Book, BookDraft, BookPatch, BookStatus, Library, LibraryError, Statistics, ValidationError,
};
use tracing::info;

use crate::error::{ServerError, ServerResult};

pub type AppState = Arc<Library>;

/// Optional list/search constraints from the query string.
#[derive(Debug, Default, Deserialize)]
pub struct FilterParams {
    pub status: Option<String>,
    pub genre: Option<String>,
    pub author: Option<String>,
}

impl FilterParams {
    fn into_filter(self) -> ServerResult<BookFilter> {
        let status = match non_blank(self.status) {
            Some(s) => Some(
                s.parse::<BookStatus>()
                    .map_err(|e| ServerError::BadRequest(e.to_string()))?,
            ),
            None => None,
        };
        Ok(BookFilter {
            status,
            genre: non_blank(self.genre),
            author: non_blank(self.author),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub sort: Option<String>,
    /// Kept as text: flattened query params only carry strings.
    pub limit: Option<String>,
    #[serde(flatten)]
    pub filter: FilterParams,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    #[serde(flatten)]
    pub filter: FilterParams,
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub status: String,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Decode a JSON request body.
///
/// Malformed JSON is a bad request. Well-formed JSON whose values have the
/// wrong shape is a validation failure naming the offending field.
fn body<T: DeserializeOwned>(bytes: &[u8]) -> ServerResult<T> {
    let mut de = serde_json::Deserializer::from_slice(bytes);
    let value = serde_path_to_error::deserialize(&mut de).map_err(|err| {
        let path = err.path().to_string();
        let inner = err.into_inner();
        match inner.classify() {
            Category::Data => {
                let field = if path == "." { "body".to_string() } else { path };
                ServerError::from(LibraryError::Validation(ValidationError::single(
                    field,
                    data_message(&inner),
                )))
            }
            _ => ServerError::BadRequest(format!("invalid JSON body: {inner}")),
        }
    })?;
    de.end()
        .map_err(|e| ServerError::BadRequest(format!("invalid JSON body: {e}")))?;
    Ok(value)
}

/// Data error text without serde_json's trailing position.
fn data_message(err: &serde_json::Error) -> String {
    let text = err.to_string();
    match text.rfind(" at line ") {
        Some(at) => text[..at].to_string(),
        None => text,
    }
}

/// Health check handler.
pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Info handler.
pub async fn info_handler(State(library): State<AppState>) -> Json<Value> {
    Json(json!({
        "name": "shelf-server",
        "version": env!("CARGO_PKG_VERSION"),
        "library": library.name(),
    }))
}

pub async fn add_book(
    State(library): State<AppState>,
    payload: Bytes,
) -> ServerResult<(StatusCode, Json<Book>)> {
    let book = library.add(body::<BookDraft>(&payload)?).await?;
    info!(id = %book.id, title = %book.title, "book added");
    Ok((StatusCode::CREATED, Json(book)))
}

pub async fn update_book(
    State(library): State<AppState>,
    Path(id): Path<String>,
    payload: Bytes,
) -> ServerResult<Json<Book>> {
    let id = Library::parse_id(&id)?;
    let patch: BookPatch = body(&payload)?;
    Ok(Json(library.update(id, patch).await?))
}

pub async fn set_status(
    State(library): State<AppState>,
    Path(id): Path<String>,
    payload: Bytes,
) -> ServerResult<Json<Book>> {
    let id = Library::parse_id(&id)?;
    let StatusBody { status } = body(&payload)?;
    Ok(Json(library.set_status(id, status).await?))
}

pub async fn delete_book(
    State(library): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Json<Value>> {
    let id = Library::parse_id(&id)?;
    let book = library.delete(id).await?;
    info!(id = %book.id, "book deleted");
    Ok(Json(json!({ "success": true, "book": book })))
}

pub async fn get_book(
    State(library): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Json<Book>> {
    let id = Library::parse_id(&id)?;
    Ok(Json(library.get(id).await?))
}

pub async fn list_books(
    State(library): State<AppState>,
    Query(params): Query<ListParams>,
) -> ServerResult<Json<Vec<Book>>> {
    let sort = match non_blank(params.sort) {
        Some(s) => s.parse::<SortKey>().map_err(LibraryError::from)?,
        None => SortKey::default(),
    };
    let limit = match non_blank(params.limit) {
        Some(s) => Some(
            s.trim()
                .parse::<usize>()
                .map_err(|_| ServerError::BadRequest(format!("invalid limit: {s}")))?,
        ),
        None => None,
    };
    let filter = params.filter.into_filter()?;
    Ok(Json(library.list(&filter, sort, limit).await?))
}

pub async fn search_books(
    State(library): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ServerResult<Json<Vec<Book>>> {
    let filter = params.filter.into_filter()?;
    Ok(Json(library.search(&params.q, &filter).await?))
}

pub async fn stats_handler(State(library): State<AppState>) -> ServerResult<Json<Statistics>> {
    let stats = library.stats().await?;
    Ok(Json(Statistics::clone(&stats)))
}
