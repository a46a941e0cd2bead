// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use crate::domain::{
    dashboard::DashboardError, grade::GradeError, module::ModuleError, subject::SubjectError,
    submission::SubmissionError,
};

/// Global Application Error Enum.
/// Every context error funnels into one of these before reaching the client.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error
    InternalServerError(String),

    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    AuthError(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict (duplicate answer, duplicate grade name)
    Conflict(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

/// Converts the error into a JSON response with the matching HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::AuthError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };
        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<ModuleError> for AppError {
    fn from(err: ModuleError) -> Self {
        let msg = err.to_string();
        match err {
            ModuleError::ModuleNotFound
            | ModuleError::QuestionNotFound
            | ModuleError::ChoiceNotFound
            | ModuleError::SubjectNotFound
            | ModuleError::GradeNotFound => AppError::NotFound(msg),
            ModuleError::MinTwoChoices
            | ModuleError::MaxFourChoices
            | ModuleError::MultipleCorrectAnswers
            | ModuleError::NoCorrectAnswer => AppError::BadRequest(msg),
            ModuleError::Upstream(_) | ModuleError::Storage(_) => {
                AppError::InternalServerError(msg)
            }
        }
    }
}

impl From<SubmissionError> for AppError {
    fn from(err: SubmissionError) -> Self {
        let msg = err.to_string();
        match err {
            SubmissionError::SubmissionNotFound
            | SubmissionError::ModuleNotFound
            | SubmissionError::QuestionNotFound
            | SubmissionError::ChoiceNotFound => AppError::NotFound(msg),
            SubmissionError::CannotSubmit
            | SubmissionError::CannotCancel
            | SubmissionError::SubmissionAlreadyDone => AppError::BadRequest(msg),
            SubmissionError::DuplicateAnswer => AppError::Conflict(msg),
            // A status outside the enum can only come from a corrupted row.
            SubmissionError::InvalidStatus(_)
            | SubmissionError::Upstream(_)
            | SubmissionError::Storage(_) => AppError::InternalServerError(msg),
        }
    }
}

impl From<GradeError> for AppError {
    fn from(err: GradeError) -> Self {
        let msg = err.to_string();
        match err {
            GradeError::NotFound => AppError::NotFound(msg),
            GradeError::AlreadyExists => AppError::Conflict(msg),
            GradeError::Storage(_) => AppError::InternalServerError(msg),
        }
    }
}

impl From<SubjectError> for AppError {
    fn from(err: SubjectError) -> Self {
        let msg = err.to_string();
        match err {
            SubjectError::NotFound => AppError::NotFound(msg),
            SubjectError::AlreadyExists => AppError::Conflict(msg),
            SubjectError::Storage(_) => AppError::InternalServerError(msg),
        }
    }
}

impl From<DashboardError> for AppError {
    fn from(err: DashboardError) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: impl Into<AppError>) -> StatusCode {
        err.into().into_response().status()
    }

    #[test]
    fn test_domain_errors_map_to_status_codes() {
        assert_eq!(status_of(ModuleError::ModuleNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_of(ModuleError::MaxFourChoices), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(SubmissionError::DuplicateAnswer), StatusCode::CONFLICT);
        assert_eq!(
            status_of(SubmissionError::SubmissionAlreadyDone),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(GradeError::AlreadyExists), StatusCode::CONFLICT);
        assert_eq!(
            status_of(SubmissionError::Upstream("boom".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
