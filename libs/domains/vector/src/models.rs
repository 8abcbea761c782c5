use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Dense vector produced by an embedding model
pub type Embedding = Vec<f32>;

// ===== Vector search endpoints =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EndpointType {
    #[default]
    Standard,
    StorageOptimized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EndpointState {
    Online,
    Provisioning,
    Offline,
    #[serde(other)]
    Unknown,
}

/// Compute that hosts one or more vector indexes
#[derive(Debug, Clone, PartialEq)]
pub struct VectorSearchEndpoint {
    pub name: String,
    pub endpoint_type: EndpointType,
    pub state: EndpointState,
    pub message: Option<String>,
}

// ===== Delta-sync indexes =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PipelineType {
    /// Sync only when explicitly triggered
    #[default]
    Triggered,
    Continuous,
}

/// Definition of an index kept in sync with a change-tracked source table.
///
/// The index service embeds `text_column` through `embedding_endpoint`
/// itself; this system never sends vectors to the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeltaSyncIndexSpec {
    pub index_name: String,
    pub endpoint_name: String,
    pub source_table: String,
    pub primary_key: String,
    pub text_column: String,
    pub embedding_endpoint: String,
    pub pipeline_type: PipelineType,
}

impl DeltaSyncIndexSpec {
    pub fn new(
        index_name: impl Into<String>,
        endpoint_name: impl Into<String>,
        source_table: impl Into<String>,
        embedding_endpoint: impl Into<String>,
    ) -> Self {
        Self {
            index_name: index_name.into(),
            endpoint_name: endpoint_name.into(),
            source_table: source_table.into(),
            primary_key: "id".to_string(),
            text_column: "text".to_string(),
            embedding_endpoint: embedding_endpoint.into(),
            pipeline_type: PipelineType::Triggered,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IndexStatus {
    #[serde(default)]
    pub ready: bool,
    pub message: Option<String>,
    pub indexed_row_count: Option<u64>,
    pub detailed_state: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IndexInfo {
    pub name: String,
    pub endpoint_name: Option<String>,
    pub primary_key: Option<String>,
    #[serde(default)]
    pub status: IndexStatus,
}

// ===== Similarity search =====

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub query_text: String,
    pub columns: Vec<String>,
    pub num_results: usize,
}

impl SearchQuery {
    pub fn new(query_text: impl Into<String>, num_results: usize) -> Self {
        Self {
            query_text: query_text.into(),
            columns: vec!["id".to_string(), "text".to_string()],
            num_results,
        }
    }

    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }
}

/// One ranked search result, addressed by column name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchHit {
    pub fields: Map<String, Value>,
    pub score: Option<f64>,
}

impl SearchHit {
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.get(column)
    }

    pub fn get_str(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(Value::as_str)
    }
}

// ===== Model serving endpoints =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WorkloadType {
    #[default]
    #[serde(rename = "CPU")]
    Cpu,
    #[serde(rename = "GPU_SMALL")]
    GpuSmall,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WorkloadSize {
    #[default]
    Small,
    Medium,
    Large,
}

/// A registered model version exposed through a serving endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServedModel {
    pub name: String,
    pub model_name: String,
    pub model_version: String,
    pub workload_type: WorkloadType,
    pub workload_size: WorkloadSize,
    pub scale_to_zero_enabled: bool,
}

impl ServedModel {
    /// Small CPU deployment that scales to zero when idle
    pub fn new(model_name: impl Into<String>, model_version: impl Into<String>) -> Self {
        let model_name = model_name.into();
        Self {
            name: format!("{}_1", model_name.replace('.', "_")),
            model_name,
            model_version: model_version.into(),
            workload_type: WorkloadType::Cpu,
            workload_size: WorkloadSize::Small,
            scale_to_zero_enabled: true,
        }
    }

    pub fn with_workload_size(mut self, size: WorkloadSize) -> Self {
        self.workload_size = size;
        self
    }

    pub fn with_scale_to_zero(mut self, enabled: bool) -> Self {
        self.scale_to_zero_enabled = enabled;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServingReadiness {
    Ready,
    NotReady,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfigUpdateState {
    NotUpdating,
    InProgress,
    UpdateFailed,
    UpdateCanceled,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServingEndpointState {
    pub ready: ServingReadiness,
    pub config_update: Option<ConfigUpdateState>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServingEndpoint {
    pub name: String,
    pub state: ServingEndpointState,
}

impl ServingEndpoint {
    pub fn is_ready(&self) -> bool {
        self.state.ready == ServingReadiness::Ready
    }

    pub fn update_failed(&self) -> bool {
        self.state.config_update == Some(ConfigUpdateState::UpdateFailed)
    }
}
