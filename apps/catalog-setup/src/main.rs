//! Catalog Setup
//!
//! One-time provisioning for the recommender: loads the product catalog,
//! deploys the embedding endpoint and builds the product similarity index.
//! Each step can run on its own or all of them in order with `all`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use core_config::tracing::{init_tracing, install_color_eyre};
use eyre::{Result, WrapErr};
use serde::Serialize;
use tracing::info;

mod config;
mod setup;

use config::Config;
use setup::{EmbeddingModel, SetupRunner};

#[derive(Parser)]
#[command(name = "catalog-setup")]
#[command(about = "Provision the product table, embedding endpoint and similarity index")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Clone)]
struct ModelArgs {
    /// Registered embedding model to serve (e.g. `llm_recommender.llm_recommender.all_minilm_l6_v2`)
    #[arg(long)]
    model_name: String,

    /// Registered model version
    #[arg(long, default_value = "1")]
    model_version: String,

    /// Keep at least one replica warm
    #[arg(long)]
    no_scale_to_zero: bool,
}

impl From<ModelArgs> for EmbeddingModel {
    fn from(args: ModelArgs) -> Self {
        Self {
            name: args.model_name,
            version: args.model_version,
            scale_to_zero: !args.no_scale_to_zero,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Replace the product table with a JSON Lines dataset
    LoadCatalog {
        /// One product per line: {"product", "category", "description", "text"?}
        #[arg(short, long)]
        dataset: PathBuf,
    },

    /// Turn on the change data feed the index syncs from
    EnableChangeFeed,

    /// Create the embedding serving endpoint and wait until it answers
    DeployEmbeddings {
        #[command(flatten)]
        model: ModelArgs,
    },

    /// Create the vector search endpoint and index and wait until it is online
    CreateIndex,

    /// Query the index
    Search {
        #[arg(default_value = "winter boots")]
        query: String,

        #[arg(short, long, default_value_t = 5)]
        num_results: usize,
    },

    /// Run every step in order, then a smoke search
    All {
        #[arg(short, long)]
        dataset: PathBuf,

        #[command(flatten)]
        model: ModelArgs,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    init_tracing(&config.environment);

    observability::init_metrics().wrap_err("failed to install Prometheus recorder")?;

    let runner = SetupRunner::new(config)?;

    match cli.command {
        Commands::LoadCatalog { dataset } => {
            print_json(&runner.load_catalog(&dataset).await?)?;
        }

        Commands::EnableChangeFeed => {
            runner.enable_change_feed().await?;
            info!("Change data feed enabled");
        }

        Commands::DeployEmbeddings { model } => {
            print_json(&runner.deploy_embeddings(&EmbeddingModel::from(model)).await?)?;
        }

        Commands::CreateIndex => {
            print_json(&runner.create_index().await?)?;
        }

        Commands::Search { query, num_results } => {
            print_json(&runner.search(&query, num_results).await?)?;
        }

        Commands::All { dataset, model } => {
            info!("Step 1/5: loading catalog");
            let catalog = runner.load_catalog(&dataset).await?;
            info!(rows = catalog.summary.table_rows, "Catalog loaded");

            info!("Step 2/5: enabling change data feed");
            runner.enable_change_feed().await?;

            info!("Step 3/5: deploying embedding endpoint");
            let embeddings = runner.deploy_embeddings(&EmbeddingModel::from(model)).await?;

            info!("Step 4/5: creating index");
            let index = runner.create_index().await?;

            info!("Step 5/5: smoke search");
            let hits = runner.search("winter boots", 5).await?;

            print_json(&serde_json::json!({
                "catalog": catalog,
                "embeddings": embeddings,
                "index": index,
                "search": hits,
            }))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_search_defaults() {
        let cli = Cli::try_parse_from(["catalog-setup", "search"]).unwrap();
        match cli.command {
            Commands::Search { query, num_results } => {
                assert_eq!(query, "winter boots");
                assert_eq!(num_results, 5);
            }
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn test_deploy_embeddings_requires_model_name() {
        assert!(Cli::try_parse_from(["catalog-setup", "deploy-embeddings"]).is_err());

        let cli = Cli::try_parse_from([
            "catalog-setup",
            "deploy-embeddings",
            "--model-name",
            "llm_recommender.llm_recommender.all_minilm_l6_v2",
        ])
        .unwrap();
        match cli.command {
            Commands::DeployEmbeddings { model } => {
                let model = EmbeddingModel::from(model);
                assert_eq!(model.version, "1");
                assert!(model.scale_to_zero);
            }
            _ => panic!("expected deploy-embeddings"),
        }
    }
}
