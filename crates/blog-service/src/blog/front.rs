//! Front page listing the most recent posts

use std::sync::Arc;

use axum::{extract::State, response::Html};

use crate::pages;
use crate::AppState;

/// Handler for `GET /blog`
pub async fn handler(State(state): State<Arc<AppState>>) -> Html<String> {
    let posts = state
        .storage
        .recent_posts(state.config.site.front_page_posts);
    Html(pages::front_page(&state.config.site.name, &posts))
}
