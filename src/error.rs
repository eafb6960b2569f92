// src/error.rs
// =============================================================================
// Error types shared across the app.
//
// Two layers:
// - SourceError: what went wrong while talking to Gitea
// - PagesError: what the request as a whole ended with
//
// Every PagesError maps to exactly one HTTP status. NotFound deliberately
// covers both "does not exist" and "not allowed to be served" so a visitor
// cannot tell which private repositories exist.
// =============================================================================

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Failure of a single call to the content source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The remote answered 404
    #[error("not found on remote")]
    NotFound,
    /// Any other non-success status
    #[error("unexpected status code '{0}'")]
    Status(u16),
    /// Connection failure, timeout, or a broken response body
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

/// Terminal outcome of resolving a request.
#[derive(Debug, Error)]
pub enum PagesError {
    #[error("not found")]
    NotFound,
    #[error("remote error: {message}")]
    Remote {
        status: Option<u16>,
        message: String,
    },
    #[error("parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, PagesError>;

impl From<SourceError> for PagesError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::NotFound => PagesError::NotFound,
            SourceError::Status(code) => PagesError::Remote {
                status: Some(code),
                message: err.to_string(),
            },
            other => PagesError::Remote {
                status: None,
                message: other.to_string(),
            },
        }
    }
}

impl PagesError {
    /// HTTP status the front end answers with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            PagesError::NotFound => StatusCode::NOT_FOUND,
            PagesError::Remote { .. } => StatusCode::BAD_GATEWAY,
            PagesError::Parse(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for PagesError {
    fn into_response(self) -> Response {
        // The body never says why a page is missing
        let body = match &self {
            PagesError::NotFound => "404 page not found",
            PagesError::Remote { status, message } => {
                tracing::warn!(status = ?status, error = %message, "remote request failed");
                "502 bad gateway"
            }
            PagesError::Parse(message) => {
                tracing::warn!(error = %message, "cannot parse page");
                "500 internal server error"
            }
        };

        (self.status_code(), body).into_response()
    }
}
