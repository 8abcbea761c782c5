//! Type-safe error codes for API responses.
//!
//! Each code carries a string identifier for clients, an integer for logs and
//! metrics, and a default message.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::UpstreamUnavailable;
//! assert_eq!(code.as_str(), "UPSTREAM_UNAVAILABLE");
//! assert_eq!(code.code(), 2001);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1999)
    /// Request body could not be extracted as JSON
    JsonExtraction,

    /// Requested route or resource was not found
    NotFound,

    /// An unexpected internal server error occurred
    InternalError,

    /// Service is temporarily unavailable
    ServiceUnavailable,

    /// Request content was rejected by domain rules
    InvalidInput,

    // Upstream errors (2000-2999)
    /// A managed service could not be reached or answered with a failure
    UpstreamUnavailable,

    /// A managed service answered with content that could not be interpreted
    MalformedUpstreamResponse,

    /// A provisioned resource did not become ready in time
    ProvisioningTimeout,

    // I/O errors (4000s)
    IoError,

    // JSON errors (5000s)
    SerdeJsonError,
}

impl ErrorCode {
    /// SCREAMING_SNAKE_CASE identifier for programmatic handling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::JsonExtraction => "JSON_EXTRACTION",
            Self::NotFound => "NOT_FOUND",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::InvalidInput => "INVALID_INPUT",
            Self::UpstreamUnavailable => "UPSTREAM_UNAVAILABLE",
            Self::MalformedUpstreamResponse => "MALFORMED_UPSTREAM_RESPONSE",
            Self::ProvisioningTimeout => "PROVISIONING_TIMEOUT",
            Self::IoError => "IO_ERROR",
            Self::SerdeJsonError => "SERDE_JSON_ERROR",
        }
    }

    /// Integer code for logs and metrics.
    ///
    /// - 1000-1999: client errors
    /// - 2000-2999: upstream service errors
    /// - 4000-4999: I/O errors
    /// - 5000-5999: serialization errors
    pub fn code(&self) -> i32 {
        match self {
            Self::JsonExtraction => 1003,
            Self::NotFound => 1004,
            Self::InternalError => 1005,
            Self::ServiceUnavailable => 1011,
            Self::InvalidInput => 1012,

            Self::UpstreamUnavailable => 2001,
            Self::MalformedUpstreamResponse => 2002,
            Self::ProvisioningTimeout => 2003,

            Self::IoError => 4001,
            Self::SerdeJsonError => 5001,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::JsonExtraction => "Failed to parse request body",
            Self::NotFound => "Resource not found",
            Self::InternalError => "An internal server error occurred",
            Self::ServiceUnavailable => "Service is temporarily unavailable",
            Self::InvalidInput => "Request input was rejected",
            Self::UpstreamUnavailable => "An upstream service is unavailable",
            Self::MalformedUpstreamResponse => "An upstream service returned an unreadable response",
            Self::ProvisioningTimeout => "Resource did not become ready in time",
            Self::IoError => "I/O error occurred",
            Self::SerdeJsonError => "JSON serialization error",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_string_representation() {
        assert_eq!(ErrorCode::InvalidInput.as_str(), "INVALID_INPUT");
        assert_eq!(ErrorCode::NotFound.as_str(), "NOT_FOUND");
        assert_eq!(
            ErrorCode::MalformedUpstreamResponse.as_str(),
            "MALFORMED_UPSTREAM_RESPONSE"
        );
    }

    #[test]
    fn test_error_code_integer_ranges() {
        assert_eq!(ErrorCode::JsonExtraction.code(), 1003);
        assert_eq!(ErrorCode::UpstreamUnavailable.code(), 2001);
        assert_eq!(ErrorCode::ProvisioningTimeout.code(), 2003);
    }

    #[test]
    fn test_error_code_display_matches_serialization() {
        let code = ErrorCode::UpstreamUnavailable;
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, format!("\"{}\"", code));

        let back: ErrorCode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, code);
    }
}
