//! Recommendation Service - the two-stage pipeline

use std::time::Instant;

use core_config::{ConfigError, FromEnv, env_parse_or, workspace::ResourceNames};
use domain_vector::{SearchQuery, VectorIndex};
use observability::{RecommenderMetrics, UpstreamTimer};
use tracing::{info, instrument, warn};

use crate::error::{RecommenderError, RecommenderResult};
use crate::gateway::LlmGateway;
use crate::parser::parse_suggestions;
use crate::prompt::build_prompt;

/// Column projected from each search hit
pub const TEXT_COLUMN: &str = "text";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommenderSettings {
    /// Fully-qualified index name
    pub index_name: String,
    /// Result count when a request does not name one
    pub default_num_items: usize,
    /// How many suggestions the prompt asks the model for
    pub suggestion_count: usize,
}

impl RecommenderSettings {
    pub fn new(index_name: impl Into<String>) -> Self {
        Self {
            index_name: index_name.into(),
            default_num_items: 5,
            suggestion_count: 5,
        }
    }
}

impl FromEnv for RecommenderSettings {
    fn from_env() -> Result<Self, ConfigError> {
        let names = ResourceNames::from_env()?;
        Ok(Self {
            index_name: names.index_name(),
            default_num_items: positive_count("LLM_RECOMMENDER_NUM_ITEMS")?,
            suggestion_count: positive_count("LLM_RECOMMENDER_SUGGESTION_COUNT")?,
        })
    }
}

/// Count variable defaulting to 5; zero is rejected at startup
fn positive_count(key: &str) -> Result<usize, ConfigError> {
    match env_parse_or(key, 5usize)? {
        0 => Err(ConfigError::ParseError {
            key: key.to_string(),
            details: "must be at least 1".to_string(),
        }),
        n => Ok(n),
    }
}

/// Turns a purchase history into concrete catalog items.
///
/// The model proposes general item names; the index maps them to products.
/// Either stage failing fails the request and nothing is retried.
pub struct RecommendationService<G: LlmGateway, I: VectorIndex> {
    gateway: G,
    index: I,
    settings: RecommenderSettings,
}

impl<G: LlmGateway, I: VectorIndex> RecommendationService<G, I> {
    pub fn new(gateway: G, index: I, settings: RecommenderSettings) -> Self {
        Self {
            gateway,
            index,
            settings,
        }
    }

    pub fn settings(&self) -> &RecommenderSettings {
        &self.settings
    }

    #[instrument(skip(self, items), fields(items = items.len()))]
    pub async fn recommend(
        &self,
        items: &[String],
        num_items: usize,
    ) -> RecommenderResult<Vec<String>> {
        let started = Instant::now();
        let result = self.run(items, num_items).await;

        let outcome = match &result {
            Ok(_) => "success",
            Err(e) => e.kind(),
        };
        RecommenderMetrics::record_recommendation(outcome, started.elapsed().as_secs_f64());
        result
    }

    async fn run(&self, items: &[String], num_items: usize) -> RecommenderResult<Vec<String>> {
        if num_items == 0 {
            return Err(RecommenderError::InvalidInput(
                "num_items must be at least 1".to_string(),
            ));
        }
        let prompt = build_prompt(items, self.settings.suggestion_count)?;

        let raw = self.gateway.complete(&prompt).await?;
        let suggestion = parse_suggestions(&raw)?;
        if suggestion.next_items.is_empty() {
            warn!("Model returned no suggestions");
        }

        let query = SearchQuery::new(suggestion.query_text(), num_items)
            .with_columns(["id", TEXT_COLUMN]);

        let timer = UpstreamTimer::start("vector_search");
        let hits = match self.index.search(&self.settings.index_name, query).await {
            Ok(hits) => {
                timer.success();
                hits
            }
            Err(e) => {
                timer.failure();
                return Err(e.into());
            }
        };

        let products = hits
            .iter()
            .take(num_items)
            .map(|hit| {
                hit.get_str(TEXT_COLUMN).map(str::to_string).ok_or_else(|| {
                    RecommenderError::UpstreamUnavailable(format!(
                        "search hit has no '{}' column",
                        TEXT_COLUMN
                    ))
                })
            })
            .collect::<RecommenderResult<Vec<_>>>()?;

        RecommenderMetrics::record_suggestion_counts(suggestion.next_items.len(), products.len());
        info!(
            general = suggestion.next_items.len(),
            specific = products.len(),
            "Recommendations assembled"
        );
        Ok(products)
    }
}
