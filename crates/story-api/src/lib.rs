pub mod error;
pub mod health;
pub mod middleware;
pub mod rate_limit;
pub mod state;
pub mod stories;

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::rate_limit::RateLimiter;
use crate::state::AppState;

/// Every route the service exposes, behind the per-address rate limiter.
///
/// The limiter keys on `ConnectInfo<SocketAddr>`, so the router must be
/// served with `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn router(state: AppState, limiter: Arc<RateLimiter>) -> Router {
    Router::new()
        .route(
            "/api/stories",
            get(stories::list_stories).post(stories::submit_story),
        )
        .route("/api/flagged", get(stories::list_flagged))
        .route("/health", get(health::health))
        .with_state(state)
        .layer(axum::middleware::from_fn_with_state(
            limiter,
            middleware::enforce_rate_limit,
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
