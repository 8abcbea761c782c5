mod databricks;

pub use databricks::DatabricksVectorSearch;

use async_trait::async_trait;

use crate::error::VectorResult;
use crate::models::{DeltaSyncIndexSpec, IndexInfo, SearchHit, SearchQuery};

/// A similarity index over the product catalog.
///
/// Synchronization with the source table is owned by the index service;
/// callers only see whatever state the index currently holds. A search
/// against an index that has not been populated yet returns no hits.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Create a delta-sync index over `spec.source_table`
    async fn create(&self, spec: &DeltaSyncIndexSpec) -> VectorResult<IndexInfo>;

    /// `None` when no index with this name exists
    async fn describe(&self, index_name: &str) -> VectorResult<Option<IndexInfo>>;

    /// Up to `query.num_results` hits, best first
    async fn search(&self, index_name: &str, query: SearchQuery) -> VectorResult<Vec<SearchHit>>;

    /// Returns whether an index was deleted
    async fn delete(&self, index_name: &str) -> VectorResult<bool>;
}
