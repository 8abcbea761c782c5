use thiserror::Error;
use workspace_client::WorkspaceError;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Workspace API error: {0}")]
    Upstream(#[from] WorkspaceError),

    #[error("Statement {statement_id} {state}: {message}")]
    Statement {
        statement_id: String,
        state: String,
        message: String,
    },

    #[error("Statement {statement_id} still running after {waited_secs}s")]
    StatementTimeout {
        statement_id: String,
        waited_secs: u64,
    },

    #[error("Unexpected statement result: {0}")]
    Result(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;
