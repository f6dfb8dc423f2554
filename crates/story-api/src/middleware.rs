use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::{
    Json,
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use story_types::api::ErrorResponse;

use crate::rate_limit::{RateDecision, RateLimiter};

const RATE_LIMITED_MESSAGE: &str = "Too many requests, please try again later.";

pub const X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
pub const X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
pub const X_RATELIMIT_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");

/// Reject the request with 429 once its peer address has used up the
/// current window. Every response carries the `X-RateLimit-*` headers.
pub async fn enforce_rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    req: Request,
    next: Next,
) -> Response {
    let limit = limiter.max_requests();

    match limiter.check(addr.ip()) {
        RateDecision::Allowed {
            remaining,
            reset_after,
        } => {
            let mut response = next.run(req).await;
            insert_limit_headers(response.headers_mut(), limit, remaining, reset_after);
            response
        }
        RateDecision::Limited { retry_after } => {
            warn!(client = %addr.ip(), path = %req.uri().path(), "Rate limit exceeded");

            let mut response = (
                StatusCode::TOO_MANY_REQUESTS,
                [(header::RETRY_AFTER, ceil_secs(retry_after).max(1).to_string())],
                Json(ErrorResponse {
                    error: RATE_LIMITED_MESSAGE.to_string(),
                }),
            )
                .into_response();
            insert_limit_headers(response.headers_mut(), limit, 0, retry_after);
            response
        }
    }
}

/// `X-RateLimit-Reset` is the Unix time, in whole seconds rounded up, at
/// which the window resets.
fn insert_limit_headers(headers: &mut HeaderMap, limit: u32, remaining: u32, reset_after: Duration) {
    let reset_at = SystemTime::now()
        .checked_add(reset_after)
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(ceil_secs)
        .unwrap_or_default();

    headers.insert(X_RATELIMIT_LIMIT, HeaderValue::from(limit));
    headers.insert(X_RATELIMIT_REMAINING, HeaderValue::from(remaining));
    headers.insert(X_RATELIMIT_RESET, HeaderValue::from(reset_at));
}

// Round up so clients never retry inside the window.
fn ceil_secs(d: Duration) -> u64 {
    d.as_secs() + u64::from(d.subsec_nanos() > 0)
}
