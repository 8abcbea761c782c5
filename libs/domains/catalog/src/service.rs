//! Catalog Service - loading the product table

use std::sync::Arc;

use tracing::{info, instrument};

use crate::error::{CatalogError, CatalogResult};
use crate::models::{CatalogRecord, LoadSummary, Product};
use crate::store::ProductStore;

/// Rows per INSERT statement
pub const DEFAULT_BATCH_SIZE: usize = 50;

pub struct CatalogService<S: ProductStore> {
    store: Arc<S>,
    batch_size: usize,
}

impl<S: ProductStore> CatalogService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Replace the product table with `records`.
    ///
    /// Every record is normalized before the store is touched, so a bad row
    /// never leaves a half-created table behind.
    #[instrument(skip(self, records), fields(records = records.len(), table = %self.store.table_name()))]
    pub async fn load(&self, records: Vec<CatalogRecord>) -> CatalogResult<LoadSummary> {
        if records.is_empty() {
            return Err(CatalogError::Validation(
                "catalog dataset contains no records".to_string(),
            ));
        }

        let records = records
            .into_iter()
            .map(CatalogRecord::normalize)
            .collect::<CatalogResult<Vec<_>>>()?;

        self.store.ensure_namespace().await?;
        self.store.create_table().await?;

        let mut rows_appended = 0;
        let mut batches = 0;
        for chunk in records.chunks(self.batch_size) {
            rows_appended += self.store.append(chunk).await?;
            batches += 1;
        }

        let table_rows = self.store.count().await?;
        info!(rows_appended, batches, table_rows, "Catalog loaded");

        Ok(LoadSummary {
            rows_appended,
            batches,
            table_rows,
        })
    }

    #[instrument(skip(self))]
    pub async fn enable_change_feed(&self) -> CatalogResult<()> {
        self.store.enable_change_feed().await
    }

    pub async fn count(&self) -> CatalogResult<u64> {
        self.store.count().await
    }

    pub async fn preview(&self, limit: u32) -> CatalogResult<Vec<Product>> {
        self.store.list(limit).await
    }
}
