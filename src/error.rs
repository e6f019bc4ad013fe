//! Request outcomes that stop a request before a normal response.
//!
//! Callers can always tell a throttled request from bad input from a
//! downstream failure: each maps to its own status code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::query::ValidationErrors;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    /// Admission control turned the request away.
    #[error("rate limit exceeded")]
    RateLimited,

    /// One or more query parameters were invalid.
    #[error("failed validation: {0}")]
    Validation(ValidationErrors),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Store(StoreError::EditConflict) => StatusCode::CONFLICT,
            AppError::Store(StoreError::RecordNotFound) => StatusCode::NOT_FOUND,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::RateLimited => json!({ "error": "rate limit exceeded" }),
            AppError::Validation(errors) => json!({ "error": errors }),
            AppError::Store(StoreError::EditConflict) => json!({
                "error": "unable to update the record due to an edit conflict, please try again"
            }),
            AppError::Store(StoreError::RecordNotFound) => {
                json!({ "error": "the requested resource could not be found" })
            }
            AppError::Store(err) => {
                tracing::error!(error = %err, "Store request failed");
                json!({
                    "error": "the server encountered a problem and could not process your request"
                })
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_status_codes_are_distinct() {
        assert_eq!(AppError::RateLimited.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            AppError::Validation(ValidationErrors::default()).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::from(StoreError::Timeout(Duration::from_secs(3))).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(AppError::from(StoreError::EditConflict).status(), StatusCode::CONFLICT);
        assert_eq!(AppError::from(StoreError::RecordNotFound).status(), StatusCode::NOT_FOUND);
    }
}
