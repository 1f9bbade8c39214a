//! Visit-counter demo backed by a tamper-evident cookie
//!
//! The counter lives entirely in a client-held cookie whose value is a
//! `secure_value` token. Everything that can fail on the way in - a
//! missing cookie, a token that fails validation, a value that is not a
//! number - normalizes to a count of zero instead of erroring the
//! request.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
};
use cookie::Cookie;

use crate::AppState;

/// Handler for `GET /`
pub async fn handler(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let cookie_name = &state.config.counter.cookie_name;
    let prior = counter_from_headers(&headers, cookie_name);
    // A forged-but-valid token can carry u64::MAX, so don't wrap
    let visits = prior.saturating_add(1);

    let cookie = Cookie::build((
        cookie_name.clone(),
        secure_value::encode(&visits.to_string()),
    ))
    .path("/")
    .build();

    let body = if prior > 1000 {
        "You are the best ever!".to_string()
    } else {
        format!("You've been here {} times!", visits)
    };

    ([(header::SET_COOKIE, cookie.to_string())], body).into_response()
}

/// Reads the prior visit count out of the request cookies.
///
/// A missing cookie, a token that fails validation, or a value that does
/// not parse as a non-negative integer all count as zero.
fn counter_from_headers(headers: &HeaderMap, cookie_name: &str) -> u64 {
    let Some(cookie_header) = headers.get(header::COOKIE) else {
        return 0;
    };
    let Ok(cookie_str) = cookie_header.to_str() else {
        return 0;
    };

    for cookie_part in cookie_str.split(';') {
        if let Ok(cookie) = Cookie::parse(cookie_part.trim()) {
            if cookie.name() == cookie_name {
                let count = secure_value::decode(cookie.value())
                    .and_then(|value| value.parse::<u64>().ok());
                return match count {
                    Some(count) => count,
                    None => {
                        tracing::debug!("Discarding invalid visit cookie");
                        0
                    }
                };
            }
        }
    }
    0
}
