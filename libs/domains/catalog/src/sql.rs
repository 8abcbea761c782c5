//! Product table on a SQL warehouse, driven through the statement execution API

use std::time::Duration;

use async_trait::async_trait;
use core_config::workspace::ResourceNames;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, instrument};
use workspace_client::WorkspaceClient;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{CatalogRecord, Product};
use crate::store::ProductStore;

const STATEMENTS: &str = "/api/2.0/sql/statements";

#[derive(Debug, Serialize)]
struct StatementRequest<'a> {
    warehouse_id: &'a str,
    statement: &'a str,
    wait_timeout: &'static str,
    on_wait_timeout: &'static str,
    format: &'static str,
    disposition: &'static str,
    #[serde(skip_serializing_if = "no_parameters")]
    parameters: &'a [Parameter],
}

fn no_parameters(parameters: &&[Parameter]) -> bool {
    parameters.is_empty()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct Parameter {
    name: String,
    value: String,
    #[serde(rename = "type")]
    kind: &'static str,
}

impl Parameter {
    fn string(name: String, value: &str) -> Self {
        Self {
            name,
            value: value.to_string(),
            kind: "STRING",
        }
    }
}

#[derive(Debug, Deserialize)]
struct StatementResponse {
    statement_id: String,
    status: StatementStatus,
    #[serde(default)]
    result: Option<StatementResult>,
}

#[derive(Debug, Deserialize)]
struct StatementStatus {
    state: String,
    error: Option<StatementErrorBody>,
}

#[derive(Debug, Deserialize)]
struct StatementErrorBody {
    message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct StatementResult {
    #[serde(default)]
    data_array: Vec<Vec<Value>>,
}

/// [`ProductStore`] backed by a SQL warehouse
pub struct DatabricksSqlStore {
    client: WorkspaceClient,
    warehouse_id: String,
    names: ResourceNames,
    poll_interval: Duration,
    max_wait: Duration,
}

impl DatabricksSqlStore {
    pub fn new(
        client: WorkspaceClient,
        warehouse_id: impl Into<String>,
        names: ResourceNames,
    ) -> Self {
        Self {
            client,
            warehouse_id: warehouse_id.into(),
            names,
            poll_interval: Duration::from_secs(2),
            max_wait: Duration::from_secs(10 * 60),
        }
    }

    /// How often and how long to poll statements that outlive the inline wait
    pub fn with_polling(mut self, poll_interval: Duration, max_wait: Duration) -> Self {
        self.poll_interval = poll_interval;
        self.max_wait = max_wait;
        self
    }

    /// Run one statement to completion and return its rows
    #[instrument(skip(self, parameters), fields(parameters = parameters.len()))]
    async fn execute(
        &self,
        statement: &str,
        parameters: &[Parameter],
    ) -> CatalogResult<Vec<Vec<Value>>> {
        let request = StatementRequest {
            warehouse_id: &self.warehouse_id,
            statement,
            wait_timeout: "30s",
            on_wait_timeout: "CONTINUE",
            format: "JSON_ARRAY",
            disposition: "INLINE",
            parameters,
        };

        let mut response: StatementResponse = self.client.post(STATEMENTS, &request).await?;
        let started = Instant::now();

        loop {
            match response.status.state.as_str() {
                "SUCCEEDED" => {
                    return Ok(response.result.unwrap_or_default().data_array);
                }
                "PENDING" | "RUNNING" => {
                    if started.elapsed() >= self.max_wait {
                        return Err(CatalogError::StatementTimeout {
                            statement_id: response.statement_id,
                            waited_secs: started.elapsed().as_secs(),
                        });
                    }
                    debug!(
                        statement_id = %response.statement_id,
                        state = %response.status.state,
                        "Statement still running"
                    );
                    sleep(self.poll_interval).await;
                    response = self
                        .client
                        .get(&format!("{}/{}", STATEMENTS, response.statement_id))
                        .await?;
                }
                _ => {
                    let message = response
                        .status
                        .error
                        .and_then(|e| e.message)
                        .unwrap_or_else(|| "no error message".to_string());
                    return Err(CatalogError::Statement {
                        statement_id: response.statement_id,
                        state: response.status.state,
                        message,
                    });
                }
            }
        }
    }
}

/// Multi-row INSERT with one named marker per value
fn insert_statement(table: &str, records: &[CatalogRecord]) -> (String, Vec<Parameter>) {
    let mut rows = Vec::with_capacity(records.len());
    let mut parameters = Vec::with_capacity(records.len() * 4);

    for (i, record) in records.iter().enumerate() {
        rows.push(format!(
            "(:product_{i}, :category_{i}, :description_{i}, :text_{i})"
        ));
        parameters.push(Parameter::string(format!("product_{i}"), &record.product));
        parameters.push(Parameter::string(format!("category_{i}"), &record.category));
        parameters.push(Parameter::string(format!("description_{i}"), &record.description));
        parameters.push(Parameter::string(format!("text_{i}"), record.text()));
    }

    let statement = format!(
        "INSERT INTO {} (product, category, description, text) VALUES {}",
        table,
        rows.join(", ")
    );
    (statement, parameters)
}

fn as_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn as_u64(value: Option<&Value>) -> CatalogResult<u64> {
    let value = value.ok_or_else(|| CatalogError::Result("empty result".to_string()))?;
    as_string(value)
        .parse()
        .map_err(|_| CatalogError::Result(format!("expected an integer, got {}", value)))
}

fn product_from_row(row: &[Value]) -> CatalogResult<Product> {
    match row {
        [id, name, category, description, text] => Ok(Product {
            id: as_string(id)
                .parse()
                .map_err(|_| CatalogError::Result(format!("invalid product id {}", id)))?,
            name: as_string(name),
            category: as_string(category),
            description: as_string(description),
            text: as_string(text),
        }),
        _ => Err(CatalogError::Result(format!(
            "expected 5 columns, got {}",
            row.len()
        ))),
    }
}

#[async_trait]
impl ProductStore for DatabricksSqlStore {
    fn table_name(&self) -> String {
        self.names.table_name()
    }

    async fn ensure_namespace(&self) -> CatalogResult<()> {
        self.execute(&format!("CREATE CATALOG IF NOT EXISTS {}", self.names.catalog), &[])
            .await?;
        self.execute(
            &format!(
                "CREATE SCHEMA IF NOT EXISTS {}.{}",
                self.names.catalog, self.names.schema
            ),
            &[],
        )
        .await?;
        Ok(())
    }

    async fn create_table(&self) -> CatalogResult<()> {
        let statement = format!(
            "CREATE OR REPLACE TABLE {} (\
             id BIGINT GENERATED ALWAYS AS IDENTITY, \
             product STRING, \
             category STRING, \
             description STRING, \
             text STRING)",
            self.table_name()
        );
        self.execute(&statement, &[]).await?;
        info!(table = %self.table_name(), "Product table created");
        Ok(())
    }

    async fn append(&self, records: &[CatalogRecord]) -> CatalogResult<u64> {
        if records.is_empty() {
            return Ok(0);
        }
        let (statement, parameters) = insert_statement(&self.table_name(), records);
        self.execute(&statement, &parameters).await?;
        Ok(records.len() as u64)
    }

    async fn enable_change_feed(&self) -> CatalogResult<()> {
        let statement = format!(
            "ALTER TABLE {} SET TBLPROPERTIES (delta.enableChangeDataFeed = true)",
            self.table_name()
        );
        self.execute(&statement, &[]).await?;
        info!(table = %self.table_name(), "Change data feed enabled");
        Ok(())
    }

    async fn count(&self) -> CatalogResult<u64> {
        let rows = self
            .execute(&format!("SELECT COUNT(*) FROM {}", self.table_name()), &[])
            .await?;
        as_u64(rows.first().and_then(|row| row.first()))
    }

    async fn list(&self, limit: u32) -> CatalogResult<Vec<Product>> {
        let statement = format!(
            "SELECT id, product, category, description, text FROM {} ORDER BY id LIMIT {}",
            self.table_name(),
            limit
        );
        self.execute(&statement, &[])
            .await?
            .iter()
            .map(|row| product_from_row(row))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_config::workspace::WorkspaceConfig;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn store(server: &MockServer) -> DatabricksSqlStore {
        let client = WorkspaceClient::new(WorkspaceConfig::new(server.uri(), "dapi")).unwrap();
        DatabricksSqlStore::new(client, "wh-1", ResourceNames::default())
            .with_polling(Duration::from_millis(5), Duration::from_secs(5))
    }

    fn succeeded(rows: Value) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "statement_id": "st-1",
            "status": {"state": "SUCCEEDED"},
            "result": {"data_array": rows}
        }))
    }

    #[test]
    fn test_insert_statement_binds_every_value() {
        let records = vec![
            CatalogRecord::new("Scarf", "Accessories", "Wool").with_text("Scarf: Wool"),
            CatalogRecord::new("Beanie", "Accessories", "Knit").with_text("Beanie: Knit"),
        ];
        let (statement, parameters) = insert_statement("c.s.products", &records);

        assert_eq!(
            statement,
            "INSERT INTO c.s.products (product, category, description, text) VALUES \
             (:product_0, :category_0, :description_0, :text_0), \
             (:product_1, :category_1, :description_1, :text_1)"
        );
        assert_eq!(parameters.len(), 8);
        assert_eq!(parameters[4], Parameter::string("product_1".into(), "Beanie"));
    }

    #[tokio::test]
    async fn test_count_parses_string_cell() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/2.0/sql/statements"))
            .and(body_partial_json(json!({
                "warehouse_id": "wh-1",
                "statement": "SELECT COUNT(*) FROM llm_recommender.llm_recommender.products"
            })))
            .respond_with(succeeded(json!([["24"]])))
            .mount(&server)
            .await;

        assert_eq!(store(&server).count().await.unwrap(), 24);
    }

    #[tokio::test]
    async fn test_running_statement_is_polled() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "statement_id": "st-9",
                "status": {"state": "RUNNING"}
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/2.0/sql/statements/st-9"))
            .respond_with(succeeded(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        store(&server).enable_change_feed().await.unwrap();
    }

    #[tokio::test]
    async fn test_failed_statement_carries_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "statement_id": "st-2",
                "status": {
                    "state": "FAILED",
                    "error": {"message": "TABLE_OR_VIEW_NOT_FOUND"}
                }
            })))
            .mount(&server)
            .await;

        match store(&server).count().await.unwrap_err() {
            CatalogError::Statement { state, message, .. } => {
                assert_eq!(state, "FAILED");
                assert_eq!(message, "TABLE_OR_VIEW_NOT_FOUND");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_list_maps_rows_to_products() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(succeeded(json!([
                ["1", "Scarf", "Accessories", "Wool", "Scarf: Wool"]
            ])))
            .mount(&server)
            .await;

        let products = store(&server).list(10).await.unwrap();
        assert_eq!(products[0].id, 1);
        assert_eq!(products[0].name, "Scarf");
    }

    #[tokio::test]
    async fn test_append_nothing_sends_no_statement() {
        let server = MockServer::start().await;
        assert_eq!(store(&server).append(&[]).await.unwrap(), 0);
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
