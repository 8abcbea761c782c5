use std::time::Duration;

use tracing::{info, instrument};

use crate::error::{VectorError, VectorResult};
use crate::index::VectorIndex;
use crate::models::{DeltaSyncIndexSpec, IndexInfo, SearchHit, SearchQuery};
use crate::provisioning::{PollPolicy, Readiness, wait_until_ready};

/// Index lifecycle and search on top of a [`VectorIndex`]
pub struct VectorService<I: VectorIndex> {
    index: I,
    poll_policy: PollPolicy,
}

impl<I: VectorIndex> VectorService<I> {
    pub fn new(index: I) -> Self {
        Self {
            index,
            poll_policy: PollPolicy::VECTOR_INDEX,
        }
    }

    pub fn with_poll_policy(mut self, poll_policy: PollPolicy) -> Self {
        self.poll_policy = poll_policy;
        self
    }

    pub fn index(&self) -> &I {
        &self.index
    }

    // ===== Lifecycle =====

    /// Delete the index if it exists. Replacing the source table invalidates
    /// a delta-sync index, so this runs before the table is recreated.
    #[instrument(skip(self))]
    pub async fn drop_index(&self, index_name: &str) -> VectorResult<bool> {
        let deleted = self.index.delete(index_name).await?;
        if deleted {
            info!(index_name, "Deleted existing index");
        }
        Ok(deleted)
    }

    /// Return the existing index, or create it from `spec`
    #[instrument(skip(self, spec), fields(index = %spec.index_name))]
    pub async fn ensure_index(&self, spec: &DeltaSyncIndexSpec) -> VectorResult<IndexInfo> {
        if let Some(existing) = self.index.describe(&spec.index_name).await? {
            info!("Index already exists");
            return Ok(existing);
        }
        self.index.create(spec).await
    }

    pub async fn readiness(&self, index_name: &str) -> VectorResult<Readiness> {
        let info = self
            .index
            .describe(index_name)
            .await?
            .ok_or_else(|| VectorError::NotFound(format!("index {}", index_name)))?;

        if info.status.ready {
            return Ok(Readiness::Ready);
        }

        let state = info
            .status
            .detailed_state
            .or(info.status.message)
            .unwrap_or_else(|| "NOT_READY".to_string());

        if state.contains("FAILED") {
            Ok(Readiness::Failed(state))
        } else {
            Ok(Readiness::Pending(state))
        }
    }

    /// Poll until the index reports ready, bounded by the poll policy
    pub async fn wait_for_index(&self, index_name: &str) -> VectorResult<Duration> {
        wait_until_ready(index_name, self.poll_policy, || self.readiness(index_name)).await
    }

    // ===== Search =====

    #[instrument(skip(self, query), fields(num_results = query.num_results))]
    pub async fn search(&self, index_name: &str, query: SearchQuery) -> VectorResult<Vec<SearchHit>> {
        self.index.search(index_name, query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::MockVectorIndex;
    use crate::models::IndexStatus;
    use mockall::Sequence;

    const INDEX: &str = "c.s.product_index";

    fn info(ready: bool, state: &str) -> IndexInfo {
        IndexInfo {
            name: INDEX.to_string(),
            endpoint_name: Some("vs".to_string()),
            primary_key: Some("id".to_string()),
            status: IndexStatus {
                ready,
                message: None,
                indexed_row_count: None,
                detailed_state: Some(state.to_string()),
            },
        }
    }

    fn spec() -> DeltaSyncIndexSpec {
        DeltaSyncIndexSpec::new(INDEX, "vs", "c.s.products", "embeddings")
    }

    #[tokio::test]
    async fn test_ensure_index_keeps_existing() {
        let mut mock = MockVectorIndex::new();
        mock.expect_describe()
            .returning(|_| Ok(Some(info(true, "ONLINE"))));
        mock.expect_create().times(0);

        let service = VectorService::new(mock);
        let result = service.ensure_index(&spec()).await.unwrap();
        assert!(result.status.ready);
    }

    #[tokio::test]
    async fn test_ensure_index_creates_when_missing() {
        let mut mock = MockVectorIndex::new();
        mock.expect_describe().returning(|_| Ok(None));
        mock.expect_create()
            .withf(|s| s.source_table == "c.s.products" && s.text_column == "text")
            .times(1)
            .returning(|_| Ok(info(false, "PROVISIONING_INITIAL_SNAPSHOT")));

        let service = VectorService::new(mock);
        assert!(!service.ensure_index(&spec()).await.unwrap().status.ready);
    }

    #[tokio::test]
    async fn test_readiness_missing_index_is_not_found() {
        let mut mock = MockVectorIndex::new();
        mock.expect_describe().returning(|_| Ok(None));

        let err = VectorService::new(mock).readiness(INDEX).await.unwrap_err();
        assert!(matches!(err, VectorError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_readiness_reports_failed_state() {
        let mut mock = MockVectorIndex::new();
        mock.expect_describe()
            .returning(|_| Ok(Some(info(false, "OFFLINE_FAILED"))));

        let readiness = VectorService::new(mock).readiness(INDEX).await.unwrap();
        assert_eq!(readiness, Readiness::Failed("OFFLINE_FAILED".into()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_index_polls_until_ready() {
        let mut seq = Sequence::new();
        let mut mock = MockVectorIndex::new();
        mock.expect_describe()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_| Ok(Some(info(false, "PROVISIONING_INITIAL_SNAPSHOT"))));
        mock.expect_describe()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(Some(info(true, "ONLINE_NO_PENDING_UPDATE"))));

        let waited = VectorService::new(mock)
            .wait_for_index(INDEX)
            .await
            .unwrap();
        assert_eq!(waited, Duration::from_secs(120));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_index_times_out() {
        let mut mock = MockVectorIndex::new();
        mock.expect_describe()
            .returning(|_| Ok(Some(info(false, "PROVISIONING_INITIAL_SNAPSHOT"))));

        let err = VectorService::new(mock)
            .with_poll_policy(PollPolicy::new(
                Duration::from_secs(10),
                Duration::from_secs(30),
            ))
            .wait_for_index(INDEX)
            .await
            .unwrap_err();
        assert!(matches!(err, VectorError::ProvisioningTimeout { .. }));
    }

    #[tokio::test]
    async fn test_drop_index_reports_absence() {
        let mut mock = MockVectorIndex::new();
        mock.expect_delete().returning(|_| Ok(false));

        assert!(!VectorService::new(mock).drop_index(INDEX).await.unwrap());
    }
}
