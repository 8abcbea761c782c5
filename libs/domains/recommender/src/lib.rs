//! Recommender Domain
//!
//! Next-purchase recommendations: a language model proposes general item
//! names from a purchase history, and the product index maps them onto
//! concrete catalog entries.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← POST /recommendations
//! └──────┬──────┘
//!        │
//! ┌──────▼──────────────────┐
//! │  RecommendationService  │  ← prompt → model → parse → search → project
//! └──────┬────────────┬─────┘
//!        │            │
//! ┌──────▼──────┐ ┌───▼──────────┐
//! │ LlmGateway  │ │ VectorIndex  │  (domain_vector)
//! └─────────────┘ └──────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use core_config::{FromEnv, workspace::WorkspaceConfig};
//! use domain_recommender::{
//!     ChatCompletionGateway, GatewayConfig, RecommendationService, RecommenderSettings, handlers,
//! };
//! use domain_vector::DatabricksVectorSearch;
//! use workspace_client::WorkspaceClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = ChatCompletionGateway::new(GatewayConfig::from_env()?)?;
//! let index = DatabricksVectorSearch::new(WorkspaceClient::new(WorkspaceConfig::from_env()?)?);
//! let service = RecommendationService::new(gateway, index, RecommenderSettings::from_env()?);
//!
//! let router = handlers::router(service);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod gateway;
pub mod handlers;
pub mod models;
pub mod parser;
pub mod prompt;
pub mod service;

pub use error::{RecommenderError, RecommenderResult};
pub use gateway::{ChatCompletionGateway, GatewayConfig, LlmGateway};
pub use handlers::ApiDoc;
pub use models::{GeneralSuggestion, RecommendationRequest};
pub use parser::parse_suggestions;
pub use prompt::build_prompt;
pub use service::{RecommendationService, RecommenderSettings};
