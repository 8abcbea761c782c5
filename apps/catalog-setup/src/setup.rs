//! Setup Runner
//!
//! One-time provisioning of everything the recommender API reads from:
//! the product table, its change feed, the embedding endpoint and the
//! delta-sync index.

use std::path::Path;

use domain_catalog::{CatalogService, DatabricksSqlStore, LoadSummary, Product, load_jsonl};
use domain_vector::{
    DatabricksVectorSearch, DeltaSyncIndexSpec, EmbeddingProvider, EndpointType, IndexInfo,
    PollPolicy, SearchQuery, ServedModel, ServingEndpointEmbedder, ServingEndpoints, VectorIndex,
    VectorResult, VectorService, wait_until_ready,
};
use eyre::{Result, WrapErr};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{error, info, warn};
use workspace_client::WorkspaceClient;

use crate::config::Config;

/// Sentences sent through the embedding endpoint once it is ready
const EMBEDDING_PROBE: [&str; 2] = ["This is a test", "This is only a test"];

/// Rows shown after a catalog load
const PREVIEW_ROWS: u32 = 5;

#[derive(Debug, Clone, Serialize)]
pub struct CatalogReport {
    pub table: String,
    pub index_dropped: bool,
    pub summary: LoadSummary,
    pub preview: Vec<Product>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbeddingReport {
    pub endpoint: String,
    pub created: bool,
    pub waited_secs: u64,
    pub dimensions: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexReport {
    pub index: String,
    pub endpoint_created: bool,
    pub waited_secs: u64,
    pub indexed_rows: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResultRow {
    pub score: Option<f64>,
    pub fields: Map<String, Value>,
}

/// Which embedding model to put behind the serving endpoint
#[derive(Debug, Clone)]
pub struct EmbeddingModel {
    pub name: String,
    pub version: String,
    pub scale_to_zero: bool,
}

pub struct SetupRunner {
    client: WorkspaceClient,
    config: Config,
}

impl SetupRunner {
    pub fn new(config: Config) -> Result<Self> {
        let client = WorkspaceClient::new(config.workspace.clone())
            .wrap_err("failed to build workspace client")?;
        Ok(Self { client, config })
    }

    fn catalog(&self) -> Result<CatalogService<DatabricksSqlStore>> {
        let store = DatabricksSqlStore::new(
            self.client.clone(),
            self.config.warehouse_id()?,
            self.config.names.clone(),
        );
        Ok(CatalogService::new(store))
    }

    fn vectors(&self) -> VectorService<DatabricksVectorSearch> {
        VectorService::new(DatabricksVectorSearch::new(self.client.clone()))
    }

    /// Replace the product table with the dataset at `dataset`.
    ///
    /// The index is dropped first: a replaced source table cannot be synced
    /// incrementally.
    pub async fn load_catalog(&self, dataset: &Path) -> Result<CatalogReport> {
        let catalog = self.catalog()?;
        let records = load_jsonl(dataset)
            .await
            .wrap_err_with(|| format!("failed to read dataset {}", dataset.display()))?;

        let index_name = self.config.names.index_name();
        let index_dropped =
            index_drop_outcome(&index_name, self.vectors().drop_index(&index_name).await)?;

        let summary = catalog.load(records).await.wrap_err("catalog load failed")?;
        let preview = catalog.preview(PREVIEW_ROWS).await?;

        Ok(CatalogReport {
            table: self.config.names.table_name(),
            index_dropped,
            summary,
            preview,
        })
    }

    pub async fn enable_change_feed(&self) -> Result<()> {
        self.catalog()?
            .enable_change_feed()
            .await
            .wrap_err("failed to enable the change data feed")
    }

    /// Serve `model` behind the embedding endpoint and check it answers
    pub async fn deploy_embeddings(&self, model: &EmbeddingModel) -> Result<EmbeddingReport> {
        let endpoint = &self.config.names.embedding_endpoint;
        let endpoints = ServingEndpoints::new(self.client.clone());

        let served = ServedModel::new(&model.name, &model.version)
            .with_scale_to_zero(model.scale_to_zero);
        let created = endpoints
            .ensure(endpoint, served)
            .await
            .wrap_err("failed to create serving endpoint")?;

        let waited = wait_until_ready(endpoint, PollPolicy::SERVING_ENDPOINT, || {
            endpoints.readiness(endpoint)
        })
        .await?;

        let embedder = ServingEndpointEmbedder::new(self.client.clone(), endpoint.clone());
        let probe: Vec<String> = EMBEDDING_PROBE.iter().map(|s| s.to_string()).collect();
        let vectors = embedder
            .embed_batch(&probe)
            .await
            .wrap_err("embedding endpoint is ready but did not answer the probe")?;
        let dimensions = vectors.first().map(Vec::len).unwrap_or_default();
        info!(endpoint = %endpoint, dimensions, "Embedding endpoint answered");

        Ok(EmbeddingReport {
            endpoint: endpoint.clone(),
            created,
            waited_secs: waited.as_secs(),
            dimensions,
        })
    }

    /// Vector search endpoint and delta-sync index over the product table
    pub async fn create_index(&self) -> Result<IndexReport> {
        let names = &self.config.names;
        let search = DatabricksVectorSearch::new(self.client.clone());

        let endpoint_created = search
            .ensure_endpoint(&names.vector_search_endpoint, EndpointType::Standard)
            .await
            .wrap_err("failed to create vector search endpoint")?;
        wait_until_ready(
            &names.vector_search_endpoint,
            PollPolicy::VECTOR_SEARCH_ENDPOINT,
            || search.endpoint_readiness(&names.vector_search_endpoint),
        )
        .await?;

        let vectors = self.vectors();
        let spec = DeltaSyncIndexSpec::new(
            names.index_name(),
            &names.vector_search_endpoint,
            names.table_name(),
            &names.embedding_endpoint,
        );
        vectors
            .ensure_index(&spec)
            .await
            .wrap_err("failed to create index")?;
        let waited = vectors.wait_for_index(&spec.index_name).await?;

        let info: Option<IndexInfo> = vectors.index().describe(&spec.index_name).await?;
        Ok(IndexReport {
            index: spec.index_name,
            endpoint_created,
            waited_secs: waited.as_secs(),
            indexed_rows: info.and_then(|i| i.status.indexed_row_count),
        })
    }

    pub async fn search(&self, query: &str, num_results: usize) -> Result<Vec<SearchResultRow>> {
        let hits = self
            .vectors()
            .search(
                &self.config.names.index_name(),
                SearchQuery::new(query, num_results),
            )
            .await?;

        Ok(hits
            .into_iter()
            .map(|hit| SearchResultRow {
                score: hit.score,
                fields: hit.fields,
            })
            .collect())
    }
}

/// A missing index is fine; any other failure stops the table from being
/// replaced under an index that may still be serving.
fn index_drop_outcome(index_name: &str, result: VectorResult<bool>) -> Result<bool> {
    match result {
        Ok(dropped) => Ok(dropped),
        Err(e) if e.is_not_found() => {
            warn!(index = %index_name, "No existing index to drop");
            Ok(false)
        }
        Err(e) => {
            error!(error = %e, index = %index_name, "Failed to drop existing index");
            Err(e).wrap_err_with(|| format!("failed to drop index {}", index_name))
        }
    }
}
