mod endpoint;
mod provider;
mod serving;

pub use endpoint::ServingEndpoints;
pub use provider::EmbeddingProvider;
#[cfg(test)]
pub use provider::MockEmbeddingProvider;
pub use serving::ServingEndpointEmbedder;
