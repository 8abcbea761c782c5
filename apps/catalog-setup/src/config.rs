//! Configuration for catalog setup

use core_config::{
    ConfigError, Environment, FromEnv, env_optional,
    workspace::{ResourceNames, WorkspaceConfig},
};
use eyre::{Result, WrapErr};

pub const WAREHOUSE_ID_VAR: &str = "LLM_RECOMMENDER_WAREHOUSE_ID";

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub workspace: WorkspaceConfig,
    pub names: ResourceNames,
    /// SQL warehouse for table statements; only the catalog steps need it
    pub warehouse_id: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            environment: Environment::from_env(),
            workspace: WorkspaceConfig::from_env().wrap_err("invalid workspace configuration")?,
            names: ResourceNames::from_env().wrap_err("invalid resource names")?,
            warehouse_id: env_optional(WAREHOUSE_ID_VAR),
        })
    }

    pub fn warehouse_id(&self) -> Result<&str, ConfigError> {
        self.warehouse_id
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar(WAREHOUSE_ID_VAR.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warehouse_is_only_required_on_demand() {
        temp_env::with_vars(
            [
                ("LLM_RECOMMENDER_WORKSPACE_URL", Some("https://adb-1.azuredatabricks.net")),
                ("LLM_RECOMMENDER_PAT", Some("dapi")),
                (WAREHOUSE_ID_VAR, None),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert!(config.warehouse_id().is_err());
                assert_eq!(config.names.table_name(), "llm_recommender.llm_recommender.products");
            },
        );
    }

    #[test]
    fn test_warehouse_from_env() {
        temp_env::with_vars(
            [
                ("LLM_RECOMMENDER_WORKSPACE_URL", Some("https://adb-1.azuredatabricks.net")),
                ("LLM_RECOMMENDER_PAT", Some("dapi")),
                (WAREHOUSE_ID_VAR, Some("abc123")),
            ],
            || assert_eq!(Config::from_env().unwrap().warehouse_id().unwrap(), "abc123"),
        );
    }
}
