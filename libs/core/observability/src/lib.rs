//! Observability utilities for the recommender services.
//!
//! - Prometheus metrics recording and export
//! - Recommendation pipeline metrics ([`RecommenderMetrics`])
//! - Axum middleware for automatic request metrics
//!
//! ```rust,ignore
//! use observability::{init_metrics, metrics_handler, RecommenderMetrics};
//!
//! init_metrics()?;
//! RecommenderMetrics::record_recommendation("success", 0.42);
//!
//! let app = Router::new().route("/metrics", get(metrics_handler));
//! ```

pub mod middleware;
pub mod recommender;

pub use middleware::metrics_middleware;
pub use recommender::{RecommenderMetrics, UpstreamTimer};

pub use metrics::{counter, gauge, histogram};

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::info;

static METRICS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the Prometheus recorder once per process.
///
/// Later calls return the existing handle.
pub fn init_metrics() -> Result<&'static PrometheusHandle, BuildError> {
    METRICS_HANDLE.get_or_try_init(|| {
        let handle = PrometheusBuilder::new().install_recorder()?;

        info!("Prometheus metrics recorder initialized");
        register_metric_descriptions();

        Ok(handle)
    })
}

pub fn get_metrics_handle() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE.get()
}

/// Axum handler for `/metrics`
pub async fn metrics_handler() -> String {
    match get_metrics_handle() {
        Some(handle) => handle.render(),
        None => "# Metrics not initialized\n".to_string(),
    }
}

fn register_metric_descriptions() {
    use metrics::{describe_counter, describe_histogram};

    // HTTP
    describe_counter!("http_requests_total", "Total number of HTTP requests");
    describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_counter!(
        "http_requests_errors_total",
        "Total number of HTTP request errors"
    );

    // Recommendation pipeline
    describe_counter!(
        "recommendations_total",
        "Recommendation requests by outcome"
    );
    describe_histogram!(
        "recommendation_duration_seconds",
        "End-to-end recommendation latency in seconds"
    );
    describe_histogram!(
        "recommendation_general_items",
        "Generalized items suggested by the language model per request"
    );
    describe_histogram!(
        "recommendation_specific_items",
        "Catalog items returned per request"
    );
    describe_counter!(
        "upstream_calls_total",
        "Calls to managed services by service and outcome"
    );
    describe_histogram!(
        "upstream_call_duration_seconds",
        "Managed service call latency in seconds"
    );

    // Provisioning
    describe_counter!(
        "provisioning_polls_total",
        "Readiness polls by resource and observed state"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_metrics_handler_renders_after_init() {
        let handle = init_metrics().unwrap();
        let again = init_metrics().unwrap();
        assert!(std::ptr::eq(handle, again));

        RecommenderMetrics::record_recommendation("success", 0.1);
        let rendered = metrics_handler().await;
        assert!(rendered.contains("recommendations_total"));
    }
}
