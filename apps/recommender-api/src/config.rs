//! Configuration for Recommender API

use core_config::{AppInfo, FromEnv, app_info, server::ServerConfig, workspace::WorkspaceConfig};
use domain_recommender::{GatewayConfig, RecommenderSettings};
use eyre::WrapErr;

pub use core_config::Environment;

/// Application configuration, read once at startup
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub environment: Environment,
    pub workspace: WorkspaceConfig,
    pub gateway: GatewayConfig,
    pub recommender: RecommenderSettings,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        Ok(Self {
            app: app_info!(),
            server: ServerConfig::from_env().wrap_err("invalid server configuration")?,
            environment: Environment::from_env(),
            workspace: WorkspaceConfig::from_env().wrap_err("invalid workspace configuration")?,
            gateway: GatewayConfig::from_env().wrap_err("invalid model endpoint configuration")?,
            recommender: RecommenderSettings::from_env()
                .wrap_err("invalid recommender configuration")?,
        })
    }
}
