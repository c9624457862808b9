//! The schema and data loader.

use crate::args::LoadingOption;
use crate::clock::{LoadClock, TimestampPolicy};
use crate::error::LoadError;
use crate::insert::column_family_batch;
use crate::schema::keyspace_definition;
use cluster_client::{ClusterClient, MutationBatch};
use dataset::DataSet;
use tracing::{debug, info};

/// What a load did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    pub keyspace: String,
    /// Whether a keyspace of the same name was dropped first
    pub dropped_existing: bool,
    pub column_families: usize,
    /// Batches submitted (empty families submit none)
    pub batches: usize,
    pub mutations: usize,
}

/// Loads datasets into the cluster behind a [`ClusterClient`].
///
/// Each load replaces the keyspace: an existing keyspace of the same name is
/// dropped, the keyspace is recreated from the dataset, and every column
/// family's rows are written in one batch. A failure leaves the cluster as it
/// was at that point; the drop is never undone.
///
/// # Example
///
/// ```rust
/// use cassandra_fixture::DataLoader;
/// use cluster_client::MemoryCluster;
/// use dataset::ParsedDataSet;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let loader = DataLoader::new(MemoryCluster::new());
/// let dataset = ParsedDataSet::from_yaml(
///     "name: ks1\ncolumnFamilies:\n  - name: cf\n    rows:\n      - key: \"01\"\n        columns:\n          - {name: \"02\", value: \"03\"}\n",
/// );
/// loader.load(&dataset).await.unwrap();
/// assert_eq!(loader.client().row_count("ks1", "cf").await, Some(1));
/// # });
/// ```
pub struct DataLoader<C: ClusterClient> {
    client: C,
    clock: LoadClock,
}

impl<C: ClusterClient> DataLoader<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            clock: LoadClock::new(TimestampPolicy::default()),
        }
    }

    /// Set how columns without a timestamp are stamped.
    pub fn with_timestamp_policy(mut self, policy: TimestampPolicy) -> Self {
        self.clock = LoadClock::new(policy);
        self
    }

    pub fn timestamp_policy(&self) -> TimestampPolicy {
        self.clock.policy()
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn into_client(self) -> C {
        self.client
    }

    /// Load a dataset with default options.
    pub async fn load<D: DataSet + ?Sized>(&self, dataset: &D) -> Result<LoadSummary, LoadError> {
        self.load_with_options(dataset, &LoadingOption::default())
            .await
    }

    /// Load a dataset.
    ///
    /// The dataset is mapped and every batch is built before the cluster is
    /// touched, so mapping errors and bad counter values never drop anything.
    pub async fn load_with_options<D: DataSet + ?Sized>(
        &self,
        dataset: &D,
        options: &LoadingOption,
    ) -> Result<LoadSummary, LoadError> {
        let keyspace = dataset.keyspace()?;
        let definition = keyspace_definition(keyspace, options);

        let mut batches: Vec<(&str, MutationBatch)> = Vec::new();
        if !options.is_only_schema() {
            let timestamp = self.clock.next();
            debug!("Default column timestamp for this load: {timestamp}");
            for cf in &keyspace.column_families {
                batches.push((cf.name.as_str(), column_family_batch(cf, timestamp)?));
            }
        }

        let dropped_existing = self
            .client
            .describe_keyspace(&keyspace.name)
            .await?
            .is_some();
        if dropped_existing {
            info!("Dropping existing keyspace '{}'", keyspace.name);
            self.client.drop_keyspace(&keyspace.name).await?;
        }

        info!(
            "Creating keyspace '{}' ({}, replication factor {}) with {} column families",
            definition.name,
            definition.strategy_class,
            definition.replication_factor,
            definition.column_families.len()
        );
        self.client.add_keyspace(definition, true).await?;

        let mut summary = LoadSummary {
            keyspace: keyspace.name.clone(),
            dropped_existing,
            column_families: keyspace.column_families.len(),
            batches: 0,
            mutations: 0,
        };

        if options.is_only_schema() {
            info!("Schema only: skipping data for keyspace '{}'", keyspace.name);
            return Ok(summary);
        }

        for (column_family, batch) in batches {
            if batch.is_empty() {
                debug!("No rows to load for column family '{column_family}'");
                continue;
            }
            let mutations = batch.len();
            self.client.execute(&keyspace.name, batch).await?;
            info!("Loaded {mutations} mutations into column family '{column_family}'");
            summary.batches += 1;
            summary.mutations += mutations;
        }

        info!(
            "Keyspace '{}' loaded: {} mutations in {} batches",
            summary.keyspace, summary.mutations, summary.batches
        );
        Ok(summary)
    }
}
