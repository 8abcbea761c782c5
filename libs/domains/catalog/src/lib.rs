//! Catalog Domain
//!
//! The product table the similarity index syncs from.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │    Loader    │  ← JSON Lines dataset → CatalogRecord
//! └──────┬───────┘
//!        │
//! ┌──────▼───────┐
//! │   Service    │  ← Validation, table replacement, batched append
//! └──────┬───────┘
//!        │
//! ┌──────▼───────┐
//! │    Store     │  ← ProductStore trait + SQL warehouse implementation
//! └──────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use core_config::{FromEnv, workspace::{ResourceNames, WorkspaceConfig}};
//! use domain_catalog::{CatalogService, DatabricksSqlStore, load_jsonl};
//! use workspace_client::WorkspaceClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = WorkspaceClient::new(WorkspaceConfig::from_env()?)?;
//! let store = DatabricksSqlStore::new(client, "warehouse-id", ResourceNames::from_env()?);
//! let service = CatalogService::new(store);
//!
//! let records = load_jsonl("data/products.jsonl").await?;
//! service.load(records).await?;
//! service.enable_change_feed().await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;
pub mod models;
pub mod service;
pub mod sql;
pub mod store;

pub use error::{CatalogError, CatalogResult};
pub use loader::{load_jsonl, parse_jsonl};
pub use models::{CatalogRecord, LoadSummary, Product};
pub use service::CatalogService;
pub use sql::DatabricksSqlStore;
pub use store::ProductStore;
