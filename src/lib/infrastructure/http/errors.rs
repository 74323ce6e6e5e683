//! API error-handling module

use std::fmt;

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use utoipa::ToSchema;

use crate::domain::{
    communication::{email_addresses::RecipientsError, mailer::DraftError},
    content::{GenerationError, OptimizationError, UploadError},
    pipeline::ValidationError,
};

/// An error response
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// The error message
    #[schema(example = "Internal server error")]
    pub error: String,
}

/// An error raised in the API
#[derive(Debug, Deserialize, ToSchema)]
pub struct ApiError {
    /// The status code
    #[schema(example = 500, value_type = u16)]
    #[serde(with = "http_serde::status_code")]
    pub status: StatusCode,

    /// The error message
    #[schema(example = "Internal server error")]
    pub message: String,
}

impl ApiError {
    /// Create a new API error
    pub fn new(status: StatusCode, message: &str) -> Self {
        Self {
            status,
            message: message.to_string(),
        }
    }

    /// Create a new unprocessable entity error
    pub fn new_422(message: &str) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    /// Create new internal server error
    pub fn new_500(message: &str) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Create a new bad gateway error, for failures of a backend we depend on
    pub fn new_502(message: &str) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }

    /// Create a new service unavailable error, for backends without credentials
    pub fn new_503(message: &str) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::new_500(&err.to_string())
    }
}

impl From<RecipientsError> for ApiError {
    fn from(err: RecipientsError) -> Self {
        ApiError::new_422(&err.to_string())
    }
}

impl From<DraftError> for ApiError {
    fn from(err: DraftError) -> Self {
        ApiError::new_422(&err.to_string())
    }
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        ApiError::new_422(&err.to_string())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        debug!(field = err.field(), "ValidationError -> ApiError");

        ApiError::new_422(&err.to_string())
    }
}

impl From<GenerationError> for ApiError {
    fn from(err: GenerationError) -> Self {
        warn!("{err}");

        match err {
            GenerationError::NotConfigured(_) => ApiError::new_503(&err.to_string()),
            GenerationError::Backend(_) | GenerationError::MalformedResponse(_) => {
                ApiError::new_502(&err.to_string())
            }
        }
    }
}

impl From<OptimizationError> for ApiError {
    fn from(err: OptimizationError) -> Self {
        warn!("{err}");

        match err {
            OptimizationError::NotConfigured(_) => ApiError::new_503(&err.to_string()),
            OptimizationError::Backend(_) | OptimizationError::MalformedResponse(_) => {
                ApiError::new_502(&err.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::new(rejection.status(), &rejection.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::new(rejection.status(), &rejection.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::new(err.status(), &err.body_text())
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use axum::{body::to_bytes, http::StatusCode, response::IntoResponse};
    use testresult::TestResult;

    use super::*;

    #[tokio::test]
    async fn test_error_response() -> TestResult {
        let error = ApiError::new_500("Internal server error");

        let response = error.into_response();
        let body = to_bytes(response.into_body(), usize::MAX).await?;

        assert_eq!(body, r#"{"error":"Internal server error"}"#);

        Ok(())
    }

    #[test]
    fn test_api_error_from_error() {
        let error = anyhow!("Internal server error");
        let api_error = ApiError::from(error);

        assert_eq!(api_error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_error.message, "Internal server error");
    }

    #[test]
    fn test_validation_errors_are_unprocessable() {
        let errors = [
            ApiError::from(RecipientsError::Empty),
            ApiError::from(DraftError::EmptySubject),
            ApiError::from(UploadError::InvalidFileType("text/plain".to_string())),
            ApiError::from(ValidationError::EmptyPrompt),
        ];

        for error in errors {
            assert_eq!(error.status, StatusCode::UNPROCESSABLE_ENTITY);
        }
    }

    #[test]
    fn test_backend_errors() {
        let unconfigured = ApiError::from(GenerationError::NotConfigured("no key".to_string()));
        assert_eq!(unconfigured.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            unconfigured.message,
            "Content generation is not configured: no key"
        );

        let failed = ApiError::from(OptimizationError::Backend("timeout".to_string()));
        assert_eq!(failed.status, StatusCode::BAD_GATEWAY);
        assert_eq!(failed.message, "Failed to optimize HTML: timeout");

        let malformed =
            ApiError::from(GenerationError::MalformedResponse("not JSON".to_string()));
        assert_eq!(malformed.status, StatusCode::BAD_GATEWAY);
    }
}
