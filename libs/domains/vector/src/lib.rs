//! Vector Domain Library
//!
//! Embedding endpoints and the product similarity index, both hosted by the
//! data platform workspace.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐         ┌────────────────────┐
//! │  VectorService   │         │  ServingEndpoints  │  ← model serving lifecycle
//! └────────┬─────────┘         └────────────────────┘
//!          │
//! ┌────────▼─────────┐         ┌────────────────────┐
//! │   VectorIndex    │         │ EmbeddingProvider  │
//! │     (trait)      │         │      (trait)       │
//! └────────┬─────────┘         └─────────┬──────────┘
//!          │                             │
//! ┌────────▼──────────────┐    ┌─────────▼──────────────┐
//! │ DatabricksVectorSearch│    │ ServingEndpointEmbedder│
//! └───────────────────────┘    └────────────────────────┘
//! ```
//!
//! The index is a delta-sync index: the workspace embeds the `text` column of
//! the source table itself, so nothing here writes vectors. The embedding
//! provider exists to smoke-test the serving endpoint the index depends on.
//!
//! # Usage
//!
//! ```rust,no_run
//! use core_config::{FromEnv, workspace::WorkspaceConfig};
//! use domain_vector::{DatabricksVectorSearch, SearchQuery, VectorService};
//! use workspace_client::WorkspaceClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = WorkspaceClient::new(WorkspaceConfig::from_env()?)?;
//! let service = VectorService::new(DatabricksVectorSearch::new(client));
//!
//! let hits = service
//!     .search("llm_recommender.llm_recommender.product_index", SearchQuery::new("winter boots", 5))
//!     .await?;
//! for hit in hits {
//!     println!("{:?} {:?}", hit.get_str("text"), hit.score);
//! }
//! # Ok(())
//! # }
//! ```

pub mod embedding;
pub mod error;
pub mod index;
pub mod models;
pub mod provisioning;
pub mod service;

pub use embedding::{EmbeddingProvider, ServingEndpointEmbedder, ServingEndpoints};
pub use error::{VectorError, VectorResult};
pub use index::{DatabricksVectorSearch, VectorIndex};
pub use models::*;
pub use provisioning::{PollOutcome, PollPolicy, Readiness, poll_until_ready, wait_until_ready};
pub use service::VectorService;
