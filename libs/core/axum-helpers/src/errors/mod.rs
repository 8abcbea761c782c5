pub mod codes;
pub mod handlers;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Standard error body returned for every failed request.
///
/// ```json
/// {
///   "code": 2002,
///   "error": "MALFORMED_UPSTREAM_RESPONSE",
///   "message": "LLM response contains no closing brace"
/// }
/// ```
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable error identifier
    pub error: String,
    /// Human-readable detail
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            error: code.as_str().to_string(),
            message: message.into(),
            details: None,
        }
    }
}

/// Application error type that can be converted to HTTP responses.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON parsing error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),

    // Recommendation pipeline failures. These all surface as 500 with the
    // detail string as the message.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Malformed upstream response: {0}")]
    MalformedUpstreamResponse(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Provisioning timeout: {0}")]
    ProvisioningTimeout(String),
}

impl AppError {
    /// Status, code and message this error renders as.
    pub fn parts(&self) -> (StatusCode, ErrorCode, String) {
        match self {
            AppError::SerdeJson(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::SerdeJsonError,
                ErrorCode::SerdeJsonError.default_message().to_string(),
            ),
            AppError::Io(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::IoError,
                ErrorCode::IoError.default_message().to_string(),
            ),
            AppError::JsonExtractorRejection(e) => {
                (e.status(), ErrorCode::JsonExtraction, e.body_text())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorCode::NotFound, msg.clone()),
            AppError::InternalServerError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalError,
                msg.clone(),
            ),
            AppError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorCode::ServiceUnavailable,
                msg.clone(),
            ),
            AppError::InvalidInput(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InvalidInput,
                msg.clone(),
            ),
            AppError::MalformedUpstreamResponse(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::MalformedUpstreamResponse,
                msg.clone(),
            ),
            AppError::UpstreamUnavailable(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::UpstreamUnavailable,
                msg.clone(),
            ),
            AppError::ProvisioningTimeout(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::ProvisioningTimeout,
                msg.clone(),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        if status.is_server_error() {
            tracing::error!(error_code = code.code(), error = %self, "Request failed");
        } else {
            tracing::info!(error_code = code.code(), error = %self, "Request rejected");
        }

        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_errors_map_to_internal_server_error() {
        for err in [
            AppError::InvalidInput("items must not be empty".into()),
            AppError::MalformedUpstreamResponse("no closing brace".into()),
            AppError::UpstreamUnavailable("connection refused".into()),
            AppError::ProvisioningTimeout("index not ready".into()),
        ] {
            let (status, _, _) = err.parts();
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn test_parts_carry_detail_message() {
        let (_, code, message) =
            AppError::MalformedUpstreamResponse("no closing brace".into()).parts();
        assert_eq!(code, ErrorCode::MalformedUpstreamResponse);
        assert_eq!(message, "no closing brace");
    }

    #[test]
    fn test_not_found_status() {
        let response = AppError::NotFound("missing".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_error_response_omits_empty_details() {
        let body = ErrorResponse::new(ErrorCode::InvalidInput, "empty");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["code"], 1012);
        assert_eq!(json["error"], "INVALID_INPUT");
        assert!(json.get("details").is_none());
    }
}
