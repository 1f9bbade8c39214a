//! New-post submission form

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;

use crate::pages;
use crate::AppState;

/// New-post form data
#[derive(Debug, Deserialize)]
pub struct NewPostForm {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub content: String,
}

/// Handler for `GET /blog/newpost` - shows the empty form
pub async fn get_handler(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(pages::new_post_form(&state.config.site.name, "", "", None))
}

/// Handler for `POST /blog/newpost`
///
/// Persists the post and redirects to its permalink, or re-renders the
/// form with the submitted values when a field is missing.
pub async fn post_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<NewPostForm>,
) -> Response {
    if form.subject.is_empty() || form.content.is_empty() {
        return Html(pages::new_post_form(
            &state.config.site.name,
            &form.subject,
            &form.content,
            Some("subject and content, please!"),
        ))
        .into_response();
    }

    match state.storage.create_post(&form.subject, &form.content) {
        Ok(id) => {
            tracing::info!(post_id = id, "Published new post");
            Redirect::to(&format!("/blog/{}", id)).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to store post: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to store post").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::storage::Storage;
    use crate::AppState;

    fn test_app() -> (TempDir, axum::Router, Arc<AppState>) {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::default();
        let storage = Storage::new(temp_dir.path().to_str().unwrap()).unwrap();
        let state = Arc::new(AppState { config, storage });
        (temp_dir, crate::router(state.clone()), state)
    }

    fn form_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/blog/newpost")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_string(res: axum::http::Response<Body>) -> String {
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn valid_submission_redirects_to_the_permalink() {
        let (_tmp, app, state) = test_app();

        let res = app
            .oneshot(form_request("subject=Hello&content=First+post"))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        let location = res
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap();
        assert_eq!(location, "/blog/1");

        let post = state.storage.get_post(1).unwrap();
        assert_eq!(post.subject, "Hello");
        assert_eq!(post.content, "First post");
    }

    #[tokio::test]
    async fn missing_content_re_renders_the_form() {
        let (_tmp, app, state) = test_app();

        let res = app
            .oneshot(form_request("subject=Only+a+subject&content="))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        let body = body_string(res).await;
        assert!(body.contains("subject and content, please!"));
        // Entered subject is carried back into the form
        assert!(body.contains(r#"value="Only a subject""#));

        assert!(state.storage.recent_posts(10).is_empty());
    }

    #[tokio::test]
    async fn missing_subject_re_renders_the_form() {
        let (_tmp, app, _state) = test_app();

        let res = app
            .oneshot(form_request("subject=&content=Body+without+subject"))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        let body = body_string(res).await;
        assert!(body.contains("subject and content, please!"));
        assert!(body.contains("Body without subject"));
    }
}
