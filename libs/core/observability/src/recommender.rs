//! Recommendation pipeline metrics.

use metrics::{counter, histogram};
use std::time::Instant;

pub struct RecommenderMetrics;

impl RecommenderMetrics {
    /// `outcome` is "success" or the error kind (e.g. "malformed_response")
    pub fn record_recommendation(outcome: &str, duration_secs: f64) {
        counter!("recommendations_total", "outcome" => outcome.to_string()).increment(1);
        histogram!("recommendation_duration_seconds", "outcome" => outcome.to_string())
            .record(duration_secs);
    }

    pub fn record_suggestion_counts(general: usize, specific: usize) {
        histogram!("recommendation_general_items").record(general as f64);
        histogram!("recommendation_specific_items").record(specific as f64);

        tracing::debug!(general, specific, "Recorded suggestion counts");
    }

    pub fn record_upstream_call(service: &str, outcome: &str, duration_secs: f64) {
        counter!(
            "upstream_calls_total",
            "service" => service.to_string(),
            "outcome" => outcome.to_string()
        )
        .increment(1);
        histogram!("upstream_call_duration_seconds", "service" => service.to_string())
            .record(duration_secs);
    }

    pub fn record_provisioning_poll(resource: &str, ready: bool) {
        counter!(
            "provisioning_polls_total",
            "resource" => resource.to_string(),
            "ready" => ready.to_string()
        )
        .increment(1);
    }
}

/// Times one call to a managed service.
///
/// Records as "error" when dropped without `success()`/`failure()`.
pub struct UpstreamTimer {
    start: Instant,
    service: &'static str,
    recorded: bool,
}

impl UpstreamTimer {
    pub fn start(service: &'static str) -> Self {
        Self {
            start: Instant::now(),
            service,
            recorded: false,
        }
    }

    pub fn success(mut self) -> f64 {
        self.finish("success")
    }

    pub fn failure(mut self) -> f64 {
        self.finish("error")
    }

    fn finish(&mut self, outcome: &str) -> f64 {
        self.recorded = true;
        let elapsed = self.start.elapsed().as_secs_f64();
        RecommenderMetrics::record_upstream_call(self.service, outcome, elapsed);
        elapsed
    }
}

impl Drop for UpstreamTimer {
    fn drop(&mut self) {
        if !self.recorded {
            self.finish("error");
        }
    }
}
