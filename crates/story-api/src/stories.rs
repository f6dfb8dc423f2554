use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};
use tracing::{info, warn};

use story_db::models::StoryRow;
use story_filter::clean_input;
use story_types::api::{ListQuery, Pagination, SubmitStoryRequest, SubmitStoryResponse};
use story_types::models::Story;

use crate::error::ApiError;
use crate::state::AppState;

/// Display name used when a submission carries none.
pub const ANONYMOUS: &str = "Anon";

/// POST /api/stories: validate, sanitize, classify, persist.
pub async fn submit_story(
    State(state): State<AppState>,
    payload: Result<Json<SubmitStoryRequest>, JsonRejection>,
) -> Result<Json<SubmitStoryResponse>, ApiError> {
    let req = match payload {
        Ok(Json(req)) => req,
        // No JSON content type means no parsed body at all; the consent
        // check below then rejects it like any other empty submission.
        Err(JsonRejection::MissingJsonContentType(_)) => SubmitStoryRequest::default(),
        Err(e) => {
            warn!("Rejected story body: {}", e.body_text());
            return Err(ApiError::InvalidBody);
        }
    };

    if !req.is_age_confirmed() {
        return Err(ApiError::AgeConfirmationRequired);
    }

    let mut username = clean_input(req.username.as_deref());
    if username.is_empty() {
        username = ANONYMOUS.to_string();
    }
    let text = clean_input(req.text.as_deref());
    if text.is_empty() {
        return Err(ApiError::TextRequired);
    }

    let flagged = state.filter.classify(&username, &text);

    // Run blocking DB insert off the async runtime
    let db = state.clone();
    let id = tokio::task::spawn_blocking(move || db.db.create_story(&username, &text, flagged))
        .await
        .map_err(anyhow::Error::from)??;

    info!(id, flagged, "Story stored");
    Ok(Json(SubmitStoryResponse {
        ok: true,
        id,
        flagged,
    }))
}

/// GET /api/stories: unflagged stories, newest first, paginated.
pub async fn list_stories(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Story>>, ApiError> {
    let page = Pagination::from_query(&query);

    let rows = tokio::task::spawn_blocking(move || state.db.list_visible(page.limit, page.offset))
        .await
        .map_err(anyhow::Error::from)??;

    Ok(Json(rows.into_iter().map(to_story).collect()))
}

/// GET /api/flagged: every flagged story. Deliberately unauthenticated.
pub async fn list_flagged(State(state): State<AppState>) -> Result<Json<Vec<Story>>, ApiError> {
    let rows = tokio::task::spawn_blocking(move || state.db.list_flagged())
        .await
        .map_err(anyhow::Error::from)??;

    Ok(Json(rows.into_iter().map(to_story).collect()))
}

fn to_story(row: StoryRow) -> Story {
    Story {
        id: row.id,
        username: row.username,
        text: row.text,
        created_at: row.created_at,
        flagged: row.flagged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_timestamp_is_served_verbatim() {
        let story = to_story(StoryRow {
            id: 9,
            username: "Anon".into(),
            text: "hello".into(),
            created_at: "2024-03-05 14:30:09".into(),
            flagged: true,
        });
        let json = serde_json::to_value(&story).unwrap();
        assert_eq!(json["created_at"], "2024-03-05 14:30:09");
        assert_eq!(json["flagged"], 1);
        assert_eq!(json["id"], 9);
    }
}
