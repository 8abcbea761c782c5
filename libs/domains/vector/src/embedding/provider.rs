use async_trait::async_trait;

use crate::error::VectorResult;
use crate::models::Embedding;

/// Converts text into fixed-dimension vectors.
///
/// Implementations are stateless between calls. The vector index embeds
/// catalog rows on its own; this seam is used to verify a deployed model and
/// by anything that needs query vectors directly.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Identifier of the model or endpoint doing the embedding
    fn model(&self) -> &str;

    /// One vector per input, in input order
    async fn embed_batch(&self, texts: &[String]) -> VectorResult<Vec<Embedding>>;

    async fn embed(&self, text: &str) -> VectorResult<Embedding> {
        self.embed_batch(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| crate::error::VectorError::Embedding("No embedding returned".to_string()))
    }
}
