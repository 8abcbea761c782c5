use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, instrument};
use workspace_client::WorkspaceClient;

use super::VectorIndex;
use crate::error::{VectorError, VectorResult};
use crate::models::{
    DeltaSyncIndexSpec, EndpointState, EndpointType, IndexInfo, PipelineType, SearchHit,
    SearchQuery, VectorSearchEndpoint,
};
use crate::provisioning::Readiness;

const ENDPOINTS: &str = "/api/2.0/vector-search/endpoints";
const INDEXES: &str = "/api/2.0/vector-search/indexes";
const SCORE_COLUMN: &str = "score";

/// Vector search REST API client
#[derive(Clone)]
pub struct DatabricksVectorSearch {
    client: WorkspaceClient,
}

// ===== Wire types =====

#[derive(Debug, Serialize)]
struct CreateEndpointRequest<'a> {
    name: &'a str,
    endpoint_type: EndpointType,
}

#[derive(Debug, Deserialize)]
struct EndpointResponse {
    name: String,
    #[serde(default)]
    endpoint_type: EndpointType,
    endpoint_status: Option<EndpointStatusBody>,
}

#[derive(Debug, Deserialize)]
struct EndpointStatusBody {
    state: EndpointState,
    message: Option<String>,
}

impl From<EndpointResponse> for VectorSearchEndpoint {
    fn from(body: EndpointResponse) -> Self {
        let (state, message) = match body.endpoint_status {
            Some(status) => (status.state, status.message),
            None => (EndpointState::Unknown, None),
        };
        Self {
            name: body.name,
            endpoint_type: body.endpoint_type,
            state,
            message,
        }
    }
}

#[derive(Debug, Serialize)]
struct CreateIndexRequest<'a> {
    name: &'a str,
    endpoint_name: &'a str,
    primary_key: &'a str,
    index_type: &'static str,
    delta_sync_index_spec: DeltaSyncSpecBody<'a>,
}

#[derive(Debug, Serialize)]
struct DeltaSyncSpecBody<'a> {
    source_table: &'a str,
    pipeline_type: PipelineType,
    embedding_source_columns: [EmbeddingSourceColumn<'a>; 1],
}

#[derive(Debug, Serialize)]
struct EmbeddingSourceColumn<'a> {
    name: &'a str,
    embedding_model_endpoint_name: &'a str,
}

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    query_text: &'a str,
    columns: &'a [String],
    num_results: usize,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    manifest: Manifest,
    #[serde(default)]
    result: QueryResult,
}

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    columns: Vec<ManifestColumn>,
}

#[derive(Debug, Deserialize)]
struct ManifestColumn {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct QueryResult {
    #[serde(default)]
    data_array: Vec<Vec<Value>>,
}

/// Turn positional rows into named hits using the manifest column order
fn decode_hits(response: QueryResponse) -> VectorResult<Vec<SearchHit>> {
    let columns: Vec<String> = response
        .manifest
        .columns
        .into_iter()
        .map(|c| c.name)
        .collect();

    response
        .result
        .data_array
        .into_iter()
        .enumerate()
        .map(|(row_index, row)| {
            if row.len() != columns.len() {
                return Err(VectorError::Search(format!(
                    "row {} has {} values but the manifest lists {} columns",
                    row_index,
                    row.len(),
                    columns.len()
                )));
            }

            let mut fields: Map<String, Value> = columns.iter().cloned().zip(row).collect();
            let score = fields.remove(SCORE_COLUMN).and_then(|v| v.as_f64());
            Ok(SearchHit { fields, score })
        })
        .collect()
}

impl DatabricksVectorSearch {
    pub fn new(client: WorkspaceClient) -> Self {
        Self { client }
    }

    fn index_path(index_name: &str) -> String {
        format!("{}/{}", INDEXES, index_name)
    }

    // ===== Endpoint management =====

    #[instrument(skip(self))]
    pub async fn get_endpoint(&self, name: &str) -> VectorResult<Option<VectorSearchEndpoint>> {
        let body: Option<EndpointResponse> = self
            .client
            .get_optional(&format!("{}/{}", ENDPOINTS, name))
            .await?;
        Ok(body.map(Into::into))
    }

    #[instrument(skip(self))]
    pub async fn create_endpoint(
        &self,
        name: &str,
        endpoint_type: EndpointType,
    ) -> VectorResult<()> {
        let _: Value = self
            .client
            .post(ENDPOINTS, &CreateEndpointRequest { name, endpoint_type })
            .await?;
        info!(name, ?endpoint_type, "Vector search endpoint creation requested");
        Ok(())
    }

    /// Create the endpoint if missing. Returns whether a creation was requested.
    #[instrument(skip(self))]
    pub async fn ensure_endpoint(
        &self,
        name: &str,
        endpoint_type: EndpointType,
    ) -> VectorResult<bool> {
        if self.get_endpoint(name).await?.is_some() {
            info!(name, "Vector search endpoint already exists");
            return Ok(false);
        }

        match self.create_endpoint(name, endpoint_type).await {
            Ok(()) => Ok(true),
            // lost a race with another creator
            Err(VectorError::Upstream(e)) if e.is_already_exists() => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub async fn endpoint_readiness(&self, name: &str) -> VectorResult<Readiness> {
        let endpoint = self
            .get_endpoint(name)
            .await?
            .ok_or_else(|| VectorError::NotFound(format!("vector search endpoint {}", name)))?;

        Ok(match endpoint.state {
            EndpointState::Online => Readiness::Ready,
            EndpointState::Offline => Readiness::Failed(
                endpoint
                    .message
                    .unwrap_or_else(|| format!("endpoint {} is offline", name)),
            ),
            other => Readiness::Pending(format!("{:?}", other)),
        })
    }
}

#[async_trait]
impl VectorIndex for DatabricksVectorSearch {
    #[instrument(skip(self, spec), fields(index = %spec.index_name))]
    async fn create(&self, spec: &DeltaSyncIndexSpec) -> VectorResult<IndexInfo> {
        let request = CreateIndexRequest {
            name: &spec.index_name,
            endpoint_name: &spec.endpoint_name,
            primary_key: &spec.primary_key,
            index_type: "DELTA_SYNC",
            delta_sync_index_spec: DeltaSyncSpecBody {
                source_table: &spec.source_table,
                pipeline_type: spec.pipeline_type,
                embedding_source_columns: [EmbeddingSourceColumn {
                    name: &spec.text_column,
                    embedding_model_endpoint_name: &spec.embedding_endpoint,
                }],
            },
        };

        let info: IndexInfo = self.client.post(INDEXES, &request).await?;
        info!(source = %spec.source_table, "Delta-sync index created");
        Ok(info)
    }

    #[instrument(skip(self))]
    async fn describe(&self, index_name: &str) -> VectorResult<Option<IndexInfo>> {
        Ok(self.client.get_optional(&Self::index_path(index_name)).await?)
    }

    #[instrument(skip(self, query), fields(num_results = query.num_results))]
    async fn search(&self, index_name: &str, query: SearchQuery) -> VectorResult<Vec<SearchHit>> {
        if query.num_results == 0 {
            return Err(VectorError::Validation(
                "num_results must be at least 1".to_string(),
            ));
        }

        let request = QueryRequest {
            query_text: &query.query_text,
            columns: &query.columns,
            num_results: query.num_results,
        };

        let response: QueryResponse = self
            .client
            .post(&format!("{}/query", Self::index_path(index_name)), &request)
            .await?;

        let hits = decode_hits(response)?;
        debug!(hits = hits.len(), "Similarity search completed");
        Ok(hits)
    }

    #[instrument(skip(self))]
    async fn delete(&self, index_name: &str) -> VectorResult<bool> {
        Ok(self.client.delete(&Self::index_path(index_name)).await?)
    }
}
