//! Command-line interface for cassandra-fixture
//!
//! # Usage Examples
//!
//! ```bash
//! # Map a dataset and print its keyspace layout
//! cassandra-fixture validate dataset.yaml
//!
//! # Load into an in-memory cluster, overriding replication
//! cassandra-fixture load dataset.json \
//!   --replication-factor 3 \
//!   --strategy NetworkTopologyStrategy
//!
//! # Options can also come from a YAML file (onlySchema, replicationFactor, strategy)
//! cassandra-fixture load dataset.json --config loading.yaml --fixed-timestamp 1000
//! ```

use anyhow::Context;
use cassandra_fixture::cluster_client::MemoryCluster;
use cassandra_fixture::dataset::{DataSet, ParsedDataSet};
use cassandra_fixture::{DataLoader, LoadingOption, TimestampPolicy};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "cassandra-fixture")]
#[command(about = "Load keyspace schemas and test data from dataset documents")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Map a dataset and print its keyspace layout
    Validate {
        /// Dataset file (.json, .yaml or .yml)
        dataset: PathBuf,

        /// Seed for generator expressions (same seed = same values)
        #[arg(long, default_value = "0")]
        seed: u64,
    },

    /// Load a dataset into an in-memory cluster and report what was written
    Load {
        /// Dataset file (.json, .yaml or .yml)
        dataset: PathBuf,

        /// Seed for generator expressions (same seed = same values)
        #[arg(long, default_value = "0")]
        seed: u64,

        /// YAML file with loading options; command-line flags take precedence
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Stamp columns without a timestamp with this value instead of the current time
        #[arg(long)]
        fixed_timestamp: Option<i64>,

        #[command(flatten)]
        options: LoadingOption,
    },
}

fn read_options(config: Option<&Path>, flags: LoadingOption) -> anyhow::Result<LoadingOption> {
    let Some(path) = config else {
        return Ok(flags);
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let from_file = LoadingOption::from_yaml(&content)
        .with_context(|| format!("Invalid config file {}", path.display()))?;

    Ok(LoadingOption {
        only_schema: flags.only_schema || from_file.only_schema,
        replication_factor: flags.replication_factor.or(from_file.replication_factor),
        strategy: flags.strategy.or(from_file.strategy),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { dataset, seed } => {
            let dataset = ParsedDataSet::from_file(&dataset).with_seed(seed);
            let keyspace = dataset.keyspace().context("Dataset is invalid")?;

            println!(
                "keyspace {} ({}, replication factor {})",
                keyspace.name, keyspace.strategy, keyspace.replication_factor
            );
            for cf in &keyspace.column_families {
                println!(
                    "  {} [{}] key {} comparator {} values {}: {} rows",
                    cf.name,
                    cf.column_type,
                    cf.key_type.declaration(),
                    cf.comparator_type.declaration(),
                    cf.default_column_value_type,
                    cf.rows.len()
                );
            }
        }
        Commands::Load {
            dataset,
            seed,
            config,
            fixed_timestamp,
            options,
        } => {
            let options = read_options(config.as_deref(), options)?;
            let dataset = ParsedDataSet::from_file(&dataset).with_seed(seed);

            let mut loader = DataLoader::new(MemoryCluster::new());
            if let Some(ts) = fixed_timestamp {
                loader = loader.with_timestamp_policy(TimestampPolicy::Fixed(ts));
            }

            let summary = loader
                .load_with_options(&dataset, &options)
                .await
                .context("Load failed")?;

            println!(
                "keyspace {}: {} column families, {} mutations in {} batches",
                summary.keyspace, summary.column_families, summary.mutations, summary.batches
            );
            for cf in dataset.column_families()? {
                let rows = loader
                    .client()
                    .row_count(&summary.keyspace, &cf.name)
                    .await
                    .unwrap_or_default();
                println!("  {}: {rows} rows", cf.name);
            }
        }
    }

    Ok(())
}
