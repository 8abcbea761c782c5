//! Readiness polling for resources that provision asynchronously.
//!
//! Used only by setup tooling; request serving never waits on provisioning.

use std::future::Future;
use std::time::Duration;

use observability::RecommenderMetrics;
use tokio::time::{Instant, sleep};
use tracing::{info, warn};

use crate::error::{VectorError, VectorResult};

/// What a single status check observed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    /// Still provisioning; carries the reported state for logs
    Pending(String),
    /// Provisioning ended in a terminal failure
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Ready { attempts: u32, elapsed: Duration },
    TimedOut { attempts: u32, elapsed: Duration },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub timeout: Duration,
}

impl PollPolicy {
    /// Model serving endpoints: every 30 s for up to 30 min
    pub const SERVING_ENDPOINT: PollPolicy = PollPolicy {
        interval: Duration::from_secs(30),
        timeout: Duration::from_secs(30 * 60),
    };

    /// Vector search endpoints: every 60 s for up to 60 min
    pub const VECTOR_SEARCH_ENDPOINT: PollPolicy = PollPolicy {
        interval: Duration::from_secs(60),
        timeout: Duration::from_secs(60 * 60),
    };

    /// Delta-sync indexes: every 60 s for up to 120 min
    pub const VECTOR_INDEX: PollPolicy = PollPolicy {
        interval: Duration::from_secs(60),
        timeout: Duration::from_secs(120 * 60),
    };

    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }
}

/// Run `check` every `policy.interval` until it reports ready or
/// `policy.timeout` has elapsed.
///
/// The first check happens immediately. A check that errors or reports
/// [`Readiness::Failed`] ends polling with an error.
pub async fn poll_until_ready<F, Fut>(
    resource: &str,
    policy: PollPolicy,
    mut check: F,
) -> VectorResult<PollOutcome>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = VectorResult<Readiness>>,
{
    let start = Instant::now();
    let deadline = start + policy.timeout;
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        match check().await? {
            Readiness::Ready => {
                RecommenderMetrics::record_provisioning_poll(resource, true);
                let elapsed = start.elapsed();
                info!(resource, attempts, ?elapsed, "Resource is ready");
                return Ok(PollOutcome::Ready { attempts, elapsed });
            }
            Readiness::Failed(message) => {
                RecommenderMetrics::record_provisioning_poll(resource, false);
                return Err(VectorError::ProvisioningFailed {
                    resource: resource.to_string(),
                    message,
                });
            }
            Readiness::Pending(state) => {
                RecommenderMetrics::record_provisioning_poll(resource, false);
                info!(resource, %state, attempts, "Waiting for resource to become ready");
            }
        }

        let now = Instant::now();
        if now >= deadline {
            let elapsed = start.elapsed();
            warn!(resource, attempts, ?elapsed, "Gave up waiting for resource");
            return Ok(PollOutcome::TimedOut { attempts, elapsed });
        }
        sleep(policy.interval.min(deadline - now)).await;
    }
}

/// [`poll_until_ready`], with a timeout turned into
/// [`VectorError::ProvisioningTimeout`].
pub async fn wait_until_ready<F, Fut>(
    resource: &str,
    policy: PollPolicy,
    check: F,
) -> VectorResult<Duration>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = VectorResult<Readiness>>,
{
    match poll_until_ready(resource, policy, check).await? {
        PollOutcome::Ready { elapsed, .. } => Ok(elapsed),
        PollOutcome::TimedOut { elapsed, .. } => Err(VectorError::ProvisioningTimeout {
            resource: resource.to_string(),
            waited: elapsed,
        }),
    }
}
