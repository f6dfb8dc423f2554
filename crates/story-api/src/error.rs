use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use story_types::api::ErrorResponse;

/// Everything a handler can fail with. The `Display` text is exactly what the
/// client sees in `{"error": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request body")]
    InvalidBody,

    #[error("Age confirmation required")]
    AgeConfirmationRequired,

    #[error("Text required")]
    TextRequired,

    /// Storage or runtime failure. Logged, never shown to the caller.
    #[error("Server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody | ApiError::AgeConfirmationRequired | ApiError::TextRequired => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(ref e) = self {
            error!("Internal error: {:#}", e);
        }

        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_details_stay_private() {
        let err = ApiError::from(anyhow::anyhow!("disk I/O error at /var/lib/stories.db"));
        assert_eq!(err.to_string(), "Server error");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_errors_are_bad_requests() {
        assert_eq!(ApiError::TextRequired.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::AgeConfirmationRequired.to_string(), "Age confirmation required");
    }
}
