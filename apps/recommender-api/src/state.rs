//! Application state management

use domain_recommender::{ChatCompletionGateway, RecommendationService};
use domain_vector::DatabricksVectorSearch;
use workspace_client::WorkspaceClient;

use crate::config::Config;

pub type Recommender = RecommendationService<ChatCompletionGateway, DatabricksVectorSearch>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub workspace: WorkspaceClient,
}

impl AppState {
    pub fn new(config: Config) -> eyre::Result<Self> {
        let workspace = WorkspaceClient::new(config.workspace.clone())?;
        Ok(Self { config, workspace })
    }

    /// Recommendation pipeline wired to the configured model and index
    pub fn recommender(&self) -> eyre::Result<Recommender> {
        let gateway = ChatCompletionGateway::new(self.config.gateway.clone())?;
        let index = DatabricksVectorSearch::new(self.workspace.clone());
        Ok(RecommendationService::new(
            gateway,
            index,
            self.config.recommender.clone(),
        ))
    }
}
