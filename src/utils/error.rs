use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::utils::api_response::ApiResponse;

/// Errors surfaced to the caller by the planning engine.
///
/// The first four variants are caller-input problems and are never retried;
/// store failures stay opaque and are only logged server-side.
#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Inconsistent(String),

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl PlannerError {
    pub fn not_found(entity: &str, id: i32) -> Self {
        Self::NotFound(format!("{entity} {id} not found"))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) | Self::Inconsistent(_) | Self::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for PlannerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            PlannerError::Database(e) => {
                tracing::error!(error = %e, "store operation failed");
                ApiResponse::<()>::error(status, "Internal server error", None).into_response()
            }
            other => ApiResponse::<()>::error(status, other.to_string(), None).into_response(),
        }
    }
}

/// Maps a unique-constraint violation to `Conflict`; anything else stays an
/// opaque store failure. Used on writes racing against the
/// (task_id, employee_id) constraint.
pub fn conflict_on_unique(e: sqlx::Error, message: &str) -> PlannerError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            PlannerError::Conflict(message.to_string())
        }
        _ => PlannerError::Database(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_errors_map_to_client_status_codes() {
        assert_eq!(
            PlannerError::not_found("Task", 7).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            PlannerError::Conflict("duplicate".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            PlannerError::Inconsistent("wrong work order".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            PlannerError::Validation("endTime before startTime".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn store_errors_stay_internal() {
        let err = PlannerError::Database(sqlx::Error::RowNotFound);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn non_unique_violations_pass_through() {
        let err = conflict_on_unique(sqlx::Error::RowNotFound, "Assignment already exists");
        assert!(matches!(err, PlannerError::Database(_)));
    }
}
