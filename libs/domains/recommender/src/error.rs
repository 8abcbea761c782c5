use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use domain_vector::VectorError;
use thiserror::Error;

/// Everything a recommendation request can fail with
#[derive(Debug, Error)]
pub enum RecommenderError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Provisioning timeout: {0}")]
    ProvisioningTimeout(String),
}

pub type RecommenderResult<T> = Result<T, RecommenderError>;

impl RecommenderError {
    /// Metric label
    pub fn kind(&self) -> &'static str {
        match self {
            RecommenderError::InvalidInput(_) => "invalid_input",
            RecommenderError::MalformedResponse(_) => "malformed_response",
            RecommenderError::UpstreamUnavailable(_) => "upstream_unavailable",
            RecommenderError::ProvisioningTimeout(_) => "provisioning_timeout",
        }
    }
}

impl From<VectorError> for RecommenderError {
    fn from(err: VectorError) -> Self {
        match err {
            VectorError::Validation(msg) => RecommenderError::InvalidInput(msg),
            err @ VectorError::ProvisioningTimeout { .. } => {
                RecommenderError::ProvisioningTimeout(err.to_string())
            }
            other => RecommenderError::UpstreamUnavailable(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for RecommenderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RecommenderError::MalformedResponse(err.to_string())
        } else {
            RecommenderError::UpstreamUnavailable(err.to_string())
        }
    }
}

/// Convert RecommenderError to AppError for standardized error responses
impl From<RecommenderError> for AppError {
    fn from(err: RecommenderError) -> Self {
        match err {
            RecommenderError::InvalidInput(msg) => AppError::InvalidInput(msg),
            RecommenderError::MalformedResponse(msg) => AppError::MalformedUpstreamResponse(msg),
            RecommenderError::UpstreamUnavailable(msg) => AppError::UpstreamUnavailable(msg),
            RecommenderError::ProvisioningTimeout(msg) => AppError::ProvisioningTimeout(msg),
        }
    }
}

impl IntoResponse for RecommenderError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use std::time::Duration;

    #[test]
    fn test_every_variant_is_a_server_error() {
        for err in [
            RecommenderError::InvalidInput("items must not be empty".into()),
            RecommenderError::MalformedResponse("no closing brace".into()),
            RecommenderError::UpstreamUnavailable("timeout".into()),
            RecommenderError::ProvisioningTimeout("index".into()),
        ] {
            assert_eq!(
                err.into_response().status(),
                StatusCode::INTERNAL_SERVER_ERROR
            );
        }
    }

    #[test]
    fn test_vector_errors_fold_into_taxonomy() {
        assert!(matches!(
            RecommenderError::from(VectorError::NotFound("index".into())),
            RecommenderError::UpstreamUnavailable(_)
        ));
        assert!(matches!(
            RecommenderError::from(VectorError::Search("ragged row".into())),
            RecommenderError::UpstreamUnavailable(_)
        ));
        assert!(matches!(
            RecommenderError::from(VectorError::ProvisioningTimeout {
                resource: "index".into(),
                waited: Duration::from_secs(60),
            }),
            RecommenderError::ProvisioningTimeout(_)
        ));
    }
}
