//! Loading options.

use clap::Args;
use dataset_core::StrategyModel;
use serde::{Deserialize, Deserializer};

/// Options for a single load.
///
/// Derives [`clap::Args`] so a CLI can flatten it, and deserializes from the
/// same camelCase keys in a YAML or JSON config (`onlySchema`,
/// `replicationFactor`, `strategy`).
#[derive(Args, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoadingOption {
    /// Create the keyspace and its column families without loading any row
    #[arg(long)]
    pub only_schema: bool,

    /// Replication factor to use instead of the dataset's
    #[arg(long)]
    pub replication_factor: Option<u32>,

    /// Replication strategy to use instead of the dataset's (short or qualified class name)
    #[arg(long, value_parser = parse_strategy)]
    #[serde(deserialize_with = "deserialize_strategy")]
    pub strategy: Option<StrategyModel>,
}

impl LoadingOption {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_only_schema(mut self, only_schema: bool) -> Self {
        self.only_schema = only_schema;
        self
    }

    pub fn with_replication_factor(mut self, replication_factor: u32) -> Self {
        self.replication_factor = Some(replication_factor);
        self
    }

    pub fn with_strategy(mut self, strategy: StrategyModel) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Parse options from a YAML (or JSON) document.
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    pub fn is_only_schema(&self) -> bool {
        self.only_schema
    }

    pub fn override_replication_factor(&self) -> bool {
        self.replication_factor.is_some()
    }

    pub fn override_strategy(&self) -> bool {
        self.strategy.is_some()
    }
}

fn parse_strategy(s: &str) -> Result<StrategyModel, String> {
    s.parse().map_err(|e: dataset_core::ParseError| e.to_string())
}

fn deserialize_strategy<'de, D>(deserializer: D) -> Result<Option<StrategyModel>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|s| s.parse().map_err(serde::de::Error::custom))
        .transpose()
}
