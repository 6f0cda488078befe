use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::referrals::lifecycle::TransitionError;

/// Failure taxonomy for the domain operations. Handlers return this
/// directly; the `IntoResponse` impl is the single place errors are
/// translated to HTTP.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("referral limit reached ({0})")]
    LimitReached(i32),

    #[error("referral limit already used {0} times, cannot reduce below that")]
    LimitBelowUsage(i32),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Transition(TransitionError::InterviewTimeRequired) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::LimitReached(_)
            | ApiError::LimitBelowUsage(_)
            | ApiError::Transition(_)
            | ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Internal details stay in the logs, not the body.
        let message = match &self {
            ApiError::Internal(e) => {
                error!(error = %e, "internal error");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Internal(anyhow::Error::new(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::referrals::lifecycle::Status;

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(
            ApiError::Validation("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::LimitReached(5).status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::LimitBelowUsage(3).status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::NotFound("referral").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Transition(TransitionError::InterviewTimeRequired).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Transition(TransitionError::CannotCancelConfirmed).status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn invalid_transition_names_both_states() {
        let err = ApiError::Transition(TransitionError::InvalidTransition {
            from: Status::Pending,
            to: Status::Confirmed,
        });
        let msg = err.to_string();
        assert!(msg.contains("Pending"));
        assert!(msg.contains("Confirmed"));
    }

    #[test]
    fn limit_reached_carries_ceiling() {
        assert!(ApiError::LimitReached(2).to_string().contains("(2)"));
    }
}
