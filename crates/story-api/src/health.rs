use axum::{Json, extract::State};

use story_types::api::HealthResponse;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /health: liveness plus story totals.
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let counts = tokio::task::spawn_blocking(move || state.db.count_stories())
        .await
        .map_err(anyhow::Error::from)??;

    Ok(Json(HealthResponse {
        status: "ok",
        stories: counts.visible,
        flagged: counts.flagged,
    }))
}
