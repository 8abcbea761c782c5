use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use workspace_client::WorkspaceClient;

use super::EmbeddingProvider;
use crate::error::{VectorError, VectorResult};
use crate::models::Embedding;

/// Embeddings from a model deployed on a serving endpoint
#[derive(Clone)]
pub struct ServingEndpointEmbedder {
    client: WorkspaceClient,
    endpoint_name: String,
}

impl ServingEndpointEmbedder {
    pub fn new(client: WorkspaceClient, endpoint_name: impl Into<String>) -> Self {
        Self {
            client,
            endpoint_name: endpoint_name.into(),
        }
    }

    fn invocations_path(&self) -> String {
        format!("/serving-endpoints/{}/invocations", self.endpoint_name)
    }
}

/// Single-column pandas "split" frame: `{"columns": [0], "data": [["a"], ["b"]]}`
#[derive(Debug, Serialize)]
struct InvocationRequest<'a> {
    dataframe_split: DataframeSplit<'a>,
}

#[derive(Debug, Serialize)]
struct DataframeSplit<'a> {
    columns: [u8; 1],
    data: Vec<[&'a str; 1]>,
}

#[derive(Debug, Deserialize)]
struct InvocationResponse {
    predictions: Vec<Embedding>,
}

#[async_trait]
impl EmbeddingProvider for ServingEndpointEmbedder {
    fn model(&self) -> &str {
        &self.endpoint_name
    }

    #[instrument(skip(self, texts), fields(endpoint = %self.endpoint_name, count = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> VectorResult<Vec<Embedding>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let request = InvocationRequest {
            dataframe_split: DataframeSplit {
                columns: [0],
                data: texts.iter().map(|t| [t.as_str()]).collect(),
            },
        };

        let response: InvocationResponse = self
            .client
            .post(&self.invocations_path(), &request)
            .await?;

        if response.predictions.len() != texts.len() {
            return Err(VectorError::Embedding(format!(
                "Endpoint {} returned {} embeddings for {} inputs",
                self.endpoint_name,
                response.predictions.len(),
                texts.len()
            )));
        }

        debug!(
            dimension = response.predictions.first().map(Vec::len).unwrap_or(0),
            "Embedded batch"
        );
        Ok(response.predictions)
    }
}
