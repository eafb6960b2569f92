// src/server.rs
// =============================================================================
// The HTTP front end.
//
// Every GET request, whatever its path, goes through the same handler:
// 1. Read Host, path and ?ref= from the request
// 2. request::resolve_target -> owner / repo / file / ref
// 3. ContentResolver::open -> bytes (or a PagesError)
// 4. Write the bytes with a Content-Type guessed from the file name
//
// The shared state is read-only, so handlers never wait on each other.
// =============================================================================

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use percent_encoding::percent_decode_str;
use serde::Deserialize;

use crate::content::ContentResolver;
use crate::gitea::ContentSource;
use crate::render::is_markdown;
use crate::request::resolve_target;

pub struct AppState<S> {
    pub resolver: ContentResolver<S>,
    /// "" = compatibility mode
    pub domain: String,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(rename = "ref")]
    pub git_ref: Option<String>,
}

pub fn build_router<S>(state: AppState<S>) -> Router
where
    S: ContentSource + 'static,
{
    Router::new()
        .route("/", get(serve_page::<S>))
        .route("/*path", get(serve_page::<S>))
        .with_state(Arc::new(state))
}

pub async fn serve_page<S>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    uri: Uri,
    Query(query): Query<PageQuery>,
) -> Response
where
    S: ContentSource + 'static,
{
    // HTTP/2 requests may carry the host only in the URI authority
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| uri.host());

    let Some(host) = host else {
        return (StatusCode::BAD_REQUEST, "missing host header").into_response();
    };

    let path = percent_decode_str(uri.path()).decode_utf8_lossy();
    let target = resolve_target(host, &path, query.git_ref.as_deref(), &state.domain);
    tracing::debug!(?target, "resolved request");

    match state.resolver.open(target, state.domain.is_empty()).await {
        Ok(file) => {
            let content_type = content_type_for(&file.name);
            ([(header::CONTENT_TYPE, content_type)], file.into_content()).into_response()
        }
        Err(err) => err.into_response(),
    }
}

// Guesses a Content-Type from the file extension
//
// Markdown is rendered to HTML before it is served, so .md is text/html.
fn content_type_for(file_name: &str) -> &'static str {
    if is_markdown(file_name) {
        return "text/html; charset=utf-8";
    }

    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" | "mjs" => "text/javascript; charset=utf-8",
        "json" => "application/json",
        "txt" => "text/plain; charset=utf-8",
        "xml" => "application/xml",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "pdf" => "application/pdf",
        "wasm" => "application/wasm",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        _ => "application/octet-stream",
    }
}
