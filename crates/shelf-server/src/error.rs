use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use shelf_sdk::LibraryError;
use shelf_types::FieldIssue;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Library(#[from] LibraryError),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldIssue>>,
}

impl ServerError {
    /// HTTP status and error kind reported to the client.
    pub fn status(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Library(LibraryError::Validation(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "ValidationError")
            }
            Self::Library(LibraryError::NotFound(_)) => (StatusCode::NOT_FOUND, "NotFoundError"),
            Self::Library(LibraryError::Unavailable(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "StoreUnavailableError")
            }
            Self::Library(LibraryError::Query(_)) | Self::BadRequest(_) => {
                (StatusCode::BAD_REQUEST, "BadRequest")
            }
            Self::Library(_) | Self::Io(_) | Self::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "InternalError")
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        let fields = match &self {
            Self::Library(LibraryError::Validation(v)) => Some(v.issues().to_vec()),
            _ => None,
        };
        let body = ErrorBody {
            error: kind,
            message: self.to_string(),
            fields,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_types::ValidationError;

    #[test]
    fn status_mapping() {
        let validation = ServerError::from(LibraryError::Validation(ValidationError::single(
            "title",
            "must not be empty",
        )));
        assert_eq!(validation.status().0, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            ServerError::from(LibraryError::NotFound("x".into())).status(),
            (StatusCode::NOT_FOUND, "NotFoundError")
        );
        assert_eq!(
            ServerError::from(LibraryError::Unavailable("timeout".into())).status().0,
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(ServerError::BadRequest("x".into()).status().0, StatusCode::BAD_REQUEST);
        assert_eq!(
            ServerError::Internal("x".into()).status().0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
