use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument};
use workspace_client::WorkspaceClient;

use crate::error::{VectorError, VectorResult};
use crate::models::{ServedModel, ServingEndpoint};
use crate::provisioning::Readiness;

const SERVING_ENDPOINTS: &str = "/api/2.0/serving-endpoints";

/// Lifecycle of model serving endpoints
#[derive(Clone)]
pub struct ServingEndpoints {
    client: WorkspaceClient,
}

#[derive(Debug, Serialize)]
struct CreateEndpointRequest<'a> {
    name: &'a str,
    config: EndpointConfig<'a>,
}

#[derive(Debug, Serialize)]
struct EndpointConfig<'a> {
    served_models: &'a [ServedModel],
}

impl ServingEndpoints {
    pub fn new(client: WorkspaceClient) -> Self {
        Self { client }
    }

    #[instrument(skip(self))]
    pub async fn get(&self, name: &str) -> VectorResult<Option<ServingEndpoint>> {
        Ok(self
            .client
            .get_optional(&format!("{}/{}", SERVING_ENDPOINTS, name))
            .await?)
    }

    #[instrument(skip(self, served_models))]
    pub async fn create(&self, name: &str, served_models: &[ServedModel]) -> VectorResult<()> {
        if served_models.is_empty() {
            return Err(VectorError::Validation(
                "a serving endpoint needs at least one served model".to_string(),
            ));
        }

        let request = CreateEndpointRequest {
            name,
            config: EndpointConfig { served_models },
        };
        let _: Value = self.client.post(SERVING_ENDPOINTS, &request).await?;

        info!(name, "Serving endpoint creation requested");
        Ok(())
    }

    /// Create the endpoint unless one with this name already exists.
    /// Returns whether a creation was requested.
    #[instrument(skip(self, served_model))]
    pub async fn ensure(&self, name: &str, served_model: ServedModel) -> VectorResult<bool> {
        if self.get(name).await?.is_some() {
            info!(name, "Serving endpoint already exists");
            return Ok(false);
        }

        self.create(name, &[served_model]).await?;
        Ok(true)
    }

    /// Single readiness observation for [`poll_until_ready`](crate::provisioning::poll_until_ready)
    pub async fn readiness(&self, name: &str) -> VectorResult<Readiness> {
        let endpoint = self
            .get(name)
            .await?
            .ok_or_else(|| VectorError::NotFound(format!("serving endpoint {}", name)))?;

        Ok(if endpoint.update_failed() {
            Readiness::Failed(format!("configuration update failed for {}", name))
        } else if endpoint.is_ready() {
            Readiness::Ready
        } else {
            Readiness::Pending("NOT_READY".to_string())
        })
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, name: &str) -> VectorResult<bool> {
        Ok(self
            .client
            .delete(&format!("{}/{}", SERVING_ENDPOINTS, name))
            .await?)
    }
}
