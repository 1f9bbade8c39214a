//! Permalink page for a single post

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::pages;
use crate::AppState;

/// Handler for `GET /blog/{id}`
///
/// Ids are extracted as `u64`, so non-numeric paths never reach the
/// storage lookup.
pub async fn handler(State(state): State<Arc<AppState>>, Path(post_id): Path<u64>) -> Response {
    match state.storage.get_post(post_id) {
        Some(post) => Html(pages::post_page(&state.config.site.name, &post)).into_response(),
        None => (StatusCode::NOT_FOUND, "No such post").into_response(),
    }
}
