//! # Workspace Client
//!
//! Authenticated JSON-over-HTTPS access to the managed workspace REST APIs
//! (model serving, vector search, SQL statement execution). Domain crates
//! build typed clients on top of [`WorkspaceClient`] and fold
//! [`WorkspaceError`] into their own error enums.
//!
//! ```ignore
//! use core_config::{workspace::WorkspaceConfig, FromEnv};
//! use workspace_client::WorkspaceClient;
//!
//! let client = WorkspaceClient::new(WorkspaceConfig::from_env()?)?;
//! let endpoint: Option<serde_json::Value> =
//!     client.get_optional("/api/2.0/serving-endpoints/llm_recommender_embeddings").await?;
//! ```

mod client;
pub mod error;

pub use client::WorkspaceClient;
pub use error::{WorkspaceError, WorkspaceResult};
