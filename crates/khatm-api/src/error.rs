use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use khatm_types::api::ErrorBody;

/// The API error taxonomy. Every handler returns this; the body is always
/// `{ "error": <message> }` and the message never carries internals.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(&'static str),

    #[error("Quran content service is unavailable")]
    Upstream(#[from] khatm_quran::QuranError),

    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Upstream(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Full detail stays server-side; the client gets the short message.
        match &self {
            ApiError::Upstream(e) => error!("Content API failure: {}", e),
            ApiError::Internal(e) => error!("Internal error: {:#}", e),
            _ => {}
        }

        (
            self.status(),
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_distinguish_the_error_taxonomy() {
        assert_eq!(ApiError::Unauthenticated.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden("no").status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::NotFound("gone").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::BadRequest("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::Conflict("dup").status(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::Internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_errors_do_not_leak_detail() {
        let err = ApiError::Internal(anyhow::anyhow!("secret table missing"));
        assert_eq!(err.to_string(), "Internal error");
    }
}
