//! API Errors
//!
//! Maps domain failures onto `{"error": "..."}` JSON responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use echolink::DomainError;

use crate::models::ErrorResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// The client sees `message`; `source` is only logged
    #[error("{message}")]
    Internal {
        message: &'static str,
        #[source]
        source: DomainError,
    },
}

impl ApiError {
    /// Classify a domain error, hiding internal details behind `message`
    pub fn from_domain(source: DomainError, message: &'static str) -> Self {
        match source {
            DomainError::Validation(msg) => ApiError::BadRequest(msg),
            DomainError::NotFound { .. } => ApiError::NotFound(source.to_string()),
            source => ApiError::Internal { message, source },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Internal { message, source } => {
                tracing::error!("{}: {}", message, source);
            }
            other => tracing::warn!("Request rejected: {}", other),
        }

        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_mapping() {
        let err = ApiError::from_domain(DomainError::validation("bad"), "Failed");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "bad");

        let err = ApiError::from_domain(DomainError::not_found("Call", "CA1"), "Failed");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err = ApiError::from_domain(
            DomainError::ExternalService("secret upstream detail".to_string()),
            "Failed to fetch calls",
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Failed to fetch calls");
    }
}
