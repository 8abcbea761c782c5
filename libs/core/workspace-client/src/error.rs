use thiserror::Error;

pub type WorkspaceResult<T> = Result<T, WorkspaceError>;

/// Failures talking to a workspace REST API
#[derive(Error, Debug)]
pub enum WorkspaceError {
    /// Connection, TLS or timeout failure before a response arrived
    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// Non-2xx response
    #[error("{url} returned {status}{}: {message}", code_suffix(.error_code))]
    Status {
        url: String,
        status: u16,
        error_code: Option<String>,
        message: String,
    },

    /// 2xx response whose body did not match the expected shape
    #[error("Unexpected response body from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("Invalid client configuration: {0}")]
    Config(String),
}

fn code_suffix(code: &Option<String>) -> String {
    code.as_deref()
        .map(|c| format!(" ({})", c))
        .unwrap_or_default()
}

impl WorkspaceError {
    pub fn status(&self) -> Option<u16> {
        match self {
            WorkspaceError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            WorkspaceError::Status {
                status, error_code, ..
            } => *status == 404 || error_code.as_deref() == Some("RESOURCE_DOES_NOT_EXIST"),
            _ => false,
        }
    }

    pub fn is_already_exists(&self) -> bool {
        match self {
            WorkspaceError::Status {
                status, error_code, ..
            } => *status == 409 || error_code.as_deref() == Some("RESOURCE_ALREADY_EXISTS"),
            _ => false,
        }
    }

    pub(crate) fn transport(url: &str, err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            format!("timed out ({})", err)
        } else {
            err.to_string()
        };
        WorkspaceError::Transport {
            url: url.to_string(),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(status: u16, code: Option<&str>) -> WorkspaceError {
        WorkspaceError::Status {
            url: "https://host/api".into(),
            status,
            error_code: code.map(str::to_string),
            message: "nope".into(),
        }
    }

    #[test]
    fn test_not_found_by_status_or_code() {
        assert!(status(404, None).is_not_found());
        assert!(status(400, Some("RESOURCE_DOES_NOT_EXIST")).is_not_found());
        assert!(!status(500, None).is_not_found());
    }

    #[test]
    fn test_already_exists() {
        assert!(status(409, None).is_already_exists());
        assert!(status(400, Some("RESOURCE_ALREADY_EXISTS")).is_already_exists());
    }

    #[test]
    fn test_status_display_includes_error_code() {
        let rendered = status(404, Some("RESOURCE_DOES_NOT_EXIST")).to_string();
        assert!(rendered.contains("404"));
        assert!(rendered.contains("RESOURCE_DOES_NOT_EXIST"));
    }
}
