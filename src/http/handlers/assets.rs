use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::http::types::AppState;
use crate::media;

/// Serve a stored photo for the index page thumbnails. The name is sanitized
/// by the media store, so a crafted path resolves inside the upload directory
/// or not at all.
pub async fn photo(State(state): State<Arc<AppState>>, Path(name): Path<String>) -> Response {
    match state.media.open(&name) {
        Ok(bytes) => (
            [(header::CONTENT_TYPE, media::content_type(&name))],
            bytes,
        )
            .into_response(),
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}
