//! Signup with validated credentials, and the welcome page
//!
//! Short alphanumeric usernames, 3-20 character passwords, and a loose
//! shape check on the optional email. There is no login or session flow;
//! a successful signup lands on the welcome page and that is the end of
//! the story.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::pages::{self, SignupErrors};
use crate::storage::{generate_salt, hash_password, StoredUser};
use crate::AppState;

static USERNAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_-]{3,20}$").unwrap());
static PASSWORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^.{3,20}$").unwrap());
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\S]+@[\S]+\.[\S]+$").unwrap());

/// Signup form data
#[derive(Debug, Default, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub verify: String,
    #[serde(default)]
    pub email: String,
}

/// Handler for `GET /signup` - shows the empty form
pub async fn get_handler(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(pages::signup_form(
        &state.config.site.name,
        "",
        "",
        &SignupErrors::default(),
    ))
}

/// Handler for `POST /signup`
pub async fn post_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SignupForm>,
) -> Response {
    let mut errors = SignupErrors::default();

    if !USERNAME_RE.is_match(&form.username) {
        errors.username = Some("That's not a valid username.");
    } else if state.storage.get_user(&form.username).is_some() {
        errors.username = Some("That user already exists.");
    }

    if !PASSWORD_RE.is_match(&form.password) {
        errors.password = Some("That wasn't a valid password.");
    } else if form.verify != form.password {
        errors.verify = Some("Your passwords didn't match.");
    }

    if !form.email.is_empty() && !EMAIL_RE.is_match(&form.email) {
        errors.email = Some("That's not a valid e-mail.");
    }

    if errors.any() {
        return Html(pages::signup_form(
            &state.config.site.name,
            &form.username,
            &form.email,
            &errors,
        ))
        .into_response();
    }

    let salt = generate_salt();
    let user = StoredUser {
        username: form.username.clone(),
        pw_hash: hash_password(&form.username, &form.password, &salt),
        email: if form.email.is_empty() {
            None
        } else {
            Some(form.email.clone())
        },
        created_at: Utc::now(),
    };

    if let Err(e) = state.storage.create_user(user) {
        tracing::error!("Failed to store user account: {:?}", e);
        return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to create account").into_response();
    }

    tracing::info!(username = %form.username, "New user signed up");

    // The username passed validation, so it is safe in a query string as-is
    Redirect::to(&format!("/welcome?username={}", form.username)).into_response()
}

/// Welcome query parameters
#[derive(Debug, Deserialize)]
pub struct WelcomeQuery {
    #[serde(default)]
    pub username: String,
}

/// Handler for `GET /welcome`
///
/// A missing or invalid username bounces back to the signup form.
pub async fn welcome_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WelcomeQuery>,
) -> Response {
    if !USERNAME_RE.is_match(&query.username) {
        return Redirect::to("/signup").into_response();
    }
    Html(pages::welcome_page(&state.config.site.name, &query.username)).into_response()
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

    fn signup_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/signup")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_string(res: axum::http::Response<Body>) -> String {
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn valid_signup_redirects_to_welcome() {
        let (_tmp, app, state) = test_app();

        let res = app
            .oneshot(signup_request(
                "username=frank&password=hunter2&verify=hunter2&email=",
            ))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        let location = res
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap();
        assert_eq!(location, "/welcome?username=frank");

        let user = state.storage.get_user("frank").unwrap();
        assert!(!user.pw_hash.contains("hunter2"));
        assert!(user.email.is_none());
    }

    #[tokio::test]
    async fn invalid_username_re_renders_with_message() {
        let (_tmp, app, state) = test_app();

        let res = app
            .oneshot(signup_request(
                "username=a!&password=hunter2&verify=hunter2&email=",
            ))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        let body = body_string(res).await;
        assert!(body.contains("That&#x27;s not a valid username."));
        assert!(state.storage.get_user("a!").is_none());
    }

    #[tokio::test]
    async fn short_password_is_rejected() {
        let (_tmp, app, _state) = test_app();

        let res = app
            .oneshot(signup_request("username=frank&password=ab&verify=ab&email="))
            .await
            .unwrap();

        let body = body_string(res).await;
        assert!(body.contains("That wasn&#x27;t a valid password."));
    }

    #[tokio::test]
    async fn mismatched_passwords_are_rejected() {
        let (_tmp, app, _state) = test_app();

        let res = app
            .oneshot(signup_request(
                "username=frank&password=hunter2&verify=hunter3&email=",
            ))
            .await
            .unwrap();

        let body = body_string(res).await;
        assert!(body.contains("Your passwords didn&#x27;t match."));
        // Passwords are never echoed back into the form
        assert!(!body.contains("hunter2"));
        assert!(!body.contains("hunter3"));
    }

    #[tokio::test]
    async fn malformed_email_is_rejected() {
        let (_tmp, app, _state) = test_app();

        let res = app
            .oneshot(signup_request(
                "username=frank&password=hunter2&verify=hunter2&email=not-an-email",
            ))
            .await
            .unwrap();

        let body = body_string(res).await;
        assert!(body.contains("That&#x27;s not a valid e-mail."));
        assert!(body.contains(r#"value="not-an-email""#));
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let (_tmp, app, _state) = test_app();

        let first = app
            .clone()
            .oneshot(signup_request(
                "username=frank&password=hunter2&verify=hunter2&email=",
            ))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::SEE_OTHER);

        let second = app
            .oneshot(signup_request(
                "username=frank&password=other33&verify=other33&email=",
            ))
            .await
            .unwrap();

        let body = body_string(second).await;
        assert!(body.contains("That user already exists."));
    }

    #[tokio::test]
    async fn welcome_greets_a_valid_username() {
        let (_tmp, app, _state) = test_app();

        let res = app
            .oneshot(
                Request::builder()
                    .uri("/welcome?username=frank")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        let body = body_string(res).await;
        assert!(body.contains("Welcome, frank!"));
    }

    #[tokio::test]
    async fn welcome_without_a_username_bounces_to_signup() {
        let (_tmp, app, _state) = test_app();

        let res = app
            .oneshot(Request::builder().uri("/welcome").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        let location = res
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap();
        assert_eq!(location, "/signup");
    }
}
