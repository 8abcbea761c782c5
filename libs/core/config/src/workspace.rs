use crate::{env_or_default, env_parse_or, env_required, ConfigError, FromEnv};
use std::fmt;
use std::time::Duration;

pub const WORKSPACE_URL_VAR: &str = "LLM_RECOMMENDER_WORKSPACE_URL";
pub const TOKEN_VAR: &str = "LLM_RECOMMENDER_PAT";
pub const HTTP_TIMEOUT_VAR: &str = "LLM_RECOMMENDER_HTTP_TIMEOUT_SECS";

/// Connection settings for the managed workspace hosting every external service
#[derive(Clone, PartialEq, Eq)]
pub struct WorkspaceConfig {
    /// Base URL without a trailing slash
    pub url: String,
    pub token: String,
    pub http_timeout: Duration,
}

impl WorkspaceConfig {
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            http_timeout: Duration::from_secs(300),
        }
    }

    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    /// Join an absolute API path onto the workspace URL
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.url, path.trim_start_matches('/'))
    }
}

// Token stays out of logs
impl fmt::Debug for WorkspaceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkspaceConfig")
            .field("url", &self.url)
            .field("token", &"<redacted>")
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

impl FromEnv for WorkspaceConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = env_required(WORKSPACE_URL_VAR)?;
        let token = env_required(TOKEN_VAR)?;
        let timeout_secs = env_parse_or(HTTP_TIMEOUT_VAR, 300u64)?;

        Ok(Self::new(url, token).with_http_timeout(Duration::from_secs(timeout_secs)))
    }
}

/// Names of the tables, indexes and endpoints provisioned in the workspace
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceNames {
    pub catalog: String,
    pub schema: String,
    pub table: String,
    pub index: String,
    pub vector_search_endpoint: String,
    pub embedding_endpoint: String,
}

impl ResourceNames {
    /// `{catalog}.{schema}.{name}`
    pub fn qualify(&self, name: &str) -> String {
        format!("{}.{}.{}", self.catalog, self.schema, name)
    }

    pub fn table_name(&self) -> String {
        self.qualify(&self.table)
    }

    pub fn index_name(&self) -> String {
        self.qualify(&self.index)
    }

    fn validate(self) -> Result<Self, ConfigError> {
        for (key, value) in [
            ("LLM_RECOMMENDER_CATALOG", &self.catalog),
            ("LLM_RECOMMENDER_SCHEMA", &self.schema),
            ("LLM_RECOMMENDER_TABLE", &self.table),
            ("LLM_RECOMMENDER_INDEX", &self.index),
            ("LLM_RECOMMENDER_VS_ENDPOINT", &self.vector_search_endpoint),
            ("LLM_RECOMMENDER_EMBEDDING_ENDPOINT", &self.embedding_endpoint),
        ] {
            validate_identifier(key, value)?;
        }
        Ok(self)
    }
}

impl Default for ResourceNames {
    fn default() -> Self {
        Self {
            catalog: "llm_recommender".to_string(),
            schema: "llm_recommender".to_string(),
            table: "products".to_string(),
            index: "product_index".to_string(),
            vector_search_endpoint: "vs_llm_recommender_embeddings".to_string(),
            embedding_endpoint: "llm_recommender_embeddings".to_string(),
        }
    }
}

impl FromEnv for ResourceNames {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Self {
            catalog: env_or_default("LLM_RECOMMENDER_CATALOG", &defaults.catalog),
            schema: env_or_default("LLM_RECOMMENDER_SCHEMA", &defaults.schema),
            table: env_or_default("LLM_RECOMMENDER_TABLE", &defaults.table),
            index: env_or_default("LLM_RECOMMENDER_INDEX", &defaults.index),
            vector_search_endpoint: env_or_default(
                "LLM_RECOMMENDER_VS_ENDPOINT",
                &defaults.vector_search_endpoint,
            ),
            embedding_endpoint: env_or_default(
                "LLM_RECOMMENDER_EMBEDDING_ENDPOINT",
                &defaults.embedding_endpoint,
            ),
        }
        .validate()
    }
}

/// Identifiers end up inside SQL text and URL paths, so only `[A-Za-z0-9_]` is allowed
pub fn validate_identifier(key: &str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::ParseError {
            key: key.to_string(),
            details: "identifier must not be empty".to_string(),
        });
    }
    if let Some(bad) = value
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_'))
    {
        return Err(ConfigError::ParseError {
            key: key.to_string(),
            details: format!("invalid character '{}' in identifier '{}'", bad, value),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_config_from_env() {
        temp_env::with_vars(
            [
                (WORKSPACE_URL_VAR, Some("https://example.cloud.databricks.com/")),
                (TOKEN_VAR, Some("dapi-secret")),
                (HTTP_TIMEOUT_VAR, None),
            ],
            || {
                let config = WorkspaceConfig::from_env().unwrap();
                assert_eq!(config.url, "https://example.cloud.databricks.com");
                assert_eq!(config.token, "dapi-secret");
                assert_eq!(config.http_timeout, Duration::from_secs(300));
            },
        );
    }

    #[test]
    fn test_workspace_config_missing_token() {
        temp_env::with_vars(
            [
                (WORKSPACE_URL_VAR, Some("https://example.cloud.databricks.com")),
                (TOKEN_VAR, None),
            ],
            || {
                let err = WorkspaceConfig::from_env().unwrap_err();
                assert!(err.to_string().contains(TOKEN_VAR));
            },
        );
    }

    #[test]
    fn test_workspace_config_debug_redacts_token() {
        let config = WorkspaceConfig::new("https://host", "dapi-secret");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("dapi-secret"));
        assert!(rendered.contains("redacted"));
    }

    #[test]
    fn test_endpoint_joins_paths() {
        let config = WorkspaceConfig::new("https://host/", "t");
        assert_eq!(
            config.endpoint("/api/2.0/serving-endpoints"),
            "https://host/api/2.0/serving-endpoints"
        );
        assert_eq!(config.endpoint("api/2.0/x"), "https://host/api/2.0/x");
    }

    #[test]
    fn test_resource_names_defaults() {
        temp_env::with_vars(
            [
                ("LLM_RECOMMENDER_CATALOG", None::<&str>),
                ("LLM_RECOMMENDER_SCHEMA", None),
                ("LLM_RECOMMENDER_TABLE", None),
                ("LLM_RECOMMENDER_INDEX", None),
                ("LLM_RECOMMENDER_VS_ENDPOINT", None),
                ("LLM_RECOMMENDER_EMBEDDING_ENDPOINT", None),
            ],
            || {
                let names = ResourceNames::from_env().unwrap();
                assert_eq!(names.table_name(), "llm_recommender.llm_recommender.products");
                assert_eq!(
                    names.index_name(),
                    "llm_recommender.llm_recommender.product_index"
                );
            },
        );
    }

    #[test]
    fn test_resource_names_rejects_injection() {
        temp_env::with_var("LLM_RECOMMENDER_TABLE", Some("products; DROP TABLE x"), || {
            let err = ResourceNames::from_env().unwrap_err();
            assert!(err.to_string().contains("LLM_RECOMMENDER_TABLE"));
        });
    }

    #[test]
    fn test_validate_identifier_rejects_empty() {
        assert!(validate_identifier("K", "").is_err());
        assert!(validate_identifier("K", "product_index_2").is_ok());
    }
}
