use async_trait::async_trait;

use crate::error::CatalogResult;
use crate::models::{CatalogRecord, Product};

/// Persistence for the product table
///
/// The table is append-only. Identity keys are assigned by the store and
/// change tracking must be switched on before an index can sync from it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Fully-qualified table name
    fn table_name(&self) -> String;

    /// Create the catalog and schema if they do not exist
    async fn ensure_namespace(&self) -> CatalogResult<()>;

    /// Create the product table, replacing any existing one
    async fn create_table(&self) -> CatalogResult<()>;

    /// Insert records in order; returns the number of rows written
    async fn append(&self, records: &[CatalogRecord]) -> CatalogResult<u64>;

    /// Turn on the row-level change feed
    async fn enable_change_feed(&self) -> CatalogResult<()>;

    async fn count(&self) -> CatalogResult<u64>;

    /// First `limit` products by id
    async fn list(&self, limit: u32) -> CatalogResult<Vec<Product>>;
}
