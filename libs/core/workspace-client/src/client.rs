use core_config::workspace::WorkspaceConfig;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, warn};

use crate::error::{WorkspaceError, WorkspaceResult};

/// Error envelope returned by workspace APIs on failure
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error_code: Option<String>,
    message: Option<String>,
}

/// Bearer-authenticated client bound to one workspace.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct WorkspaceClient {
    http: Client,
    config: WorkspaceConfig,
}

impl WorkspaceClient {
    pub fn new(config: WorkspaceConfig) -> WorkspaceResult<Self> {
        let http = Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| WorkspaceError::Config(e.to_string()))?;

        Ok(Self { http, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.url
    }

    pub fn url(&self, path: &str) -> String {
        self.config.endpoint(path)
    }

    #[instrument(skip(self))]
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> WorkspaceResult<T> {
        let url = self.url(path);
        let response = self.send(&url, self.http.get(&url)).await?;
        decode(&url, response).await
    }

    /// GET that maps "does not exist" to `None`
    #[instrument(skip(self))]
    pub async fn get_optional<T: DeserializeOwned>(&self, path: &str) -> WorkspaceResult<Option<T>> {
        match self.get(path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_not_found() => {
                debug!(path, "Resource does not exist");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self, body))]
    pub async fn post<B, T>(&self, path: &str, body: &B) -> WorkspaceResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let response = self.send(&url, self.http.post(&url).json(body)).await?;
        decode(&url, response).await
    }

    /// DELETE; `Ok(false)` when the resource was already gone
    #[instrument(skip(self))]
    pub async fn delete(&self, path: &str) -> WorkspaceResult<bool> {
        let url = self.url(path);
        match self.send(&url, self.http.delete(&url)).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn send(&self, url: &str, request: RequestBuilder) -> WorkspaceResult<Response> {
        let response = request
            .bearer_auth(&self.config.token)
            .send()
            .await
            .map_err(|e| WorkspaceError::transport(url, e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let parsed: Option<ApiErrorBody> = serde_json::from_str(&text).ok();
        let (error_code, message) = match parsed {
            Some(body) => (body.error_code, body.message.unwrap_or(text)),
            None => (None, text),
        };

        if status.as_u16() != 404 {
            warn!(url, status = status.as_u16(), ?error_code, "Workspace API request failed");
        }

        Err(WorkspaceError::Status {
            url: url.to_string(),
            status: status.as_u16(),
            error_code,
            message,
        })
    }
}

async fn decode<T: DeserializeOwned>(url: &str, response: Response) -> WorkspaceResult<T> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| WorkspaceError::transport(url, e))?;

    // Some create/update calls answer 200 with an empty body
    let body: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"{}"
    } else {
        &bytes[..]
    };

    serde_json::from_slice(body).map_err(|e| WorkspaceError::Decode {
        url: url.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> WorkspaceClient {
        WorkspaceClient::new(WorkspaceConfig::new(server.uri(), "dapi-test")).unwrap()
    }

    #[tokio::test]
    async fn test_get_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/2.0/serving-endpoints/embeddings"))
            .and(header("authorization", "Bearer dapi-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "embeddings"})))
            .expect(1)
            .mount(&server)
            .await;

        let body: Value = client(&server)
            .get("/api/2.0/serving-endpoints/embeddings")
            .await
            .unwrap();
        assert_eq!(body["name"], "embeddings");
    }

    #[tokio::test]
    async fn test_get_optional_maps_missing_resource_to_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error_code": "RESOURCE_DOES_NOT_EXIST",
                "message": "Endpoint not found"
            })))
            .mount(&server)
            .await;

        let body: Option<Value> = client(&server).get_optional("/api/2.0/x").await.unwrap();
        assert!(body.is_none());
    }

    #[tokio::test]
    async fn test_error_body_is_parsed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/2.0/vector-search/endpoints"))
            .and(body_json(json!({"name": "vs"})))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error_code": "INVALID_PARAMETER_VALUE",
                "message": "bad endpoint type"
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .post::<_, Value>("/api/2.0/vector-search/endpoints", &json!({"name": "vs"}))
            .await
            .unwrap_err();

        match err {
            WorkspaceError::Status {
                status,
                error_code,
                message,
                ..
            } => {
                assert_eq!(status, 400);
                assert_eq!(error_code.as_deref(), Some("INVALID_PARAMETER_VALUE"));
                assert_eq!(message, "bad endpoint type");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_success_body_decodes_as_object() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let body: Value = client(&server).post("/api/2.0/y", &json!({})).await.unwrap();
        assert_eq!(body, json!({}));
    }

    #[tokio::test]
    async fn test_delete_missing_returns_false() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        assert!(!client(&server).delete("/api/2.0/z").await.unwrap());
    }

    #[tokio::test]
    async fn test_timeout_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let config = WorkspaceConfig::new(server.uri(), "t").with_http_timeout(Duration::from_millis(50));
        let err = WorkspaceClient::new(config)
            .unwrap()
            .get::<Value>("/slow")
            .await
            .unwrap_err();

        assert!(matches!(err, WorkspaceError::Transport { .. }));
    }
}
