//! In-process cluster.
//!
//! [`MemoryCluster`] implements [`ClusterClient`] over plain maps guarded by
//! a tokio mutex. It enforces the same shape rules a real cluster would:
//! mutations must target an existing keyspace and column family, counters
//! only go to counter families, and super mutations only go to super
//! families. Cells are ordered by their encoded bytes.

use crate::definition::{ColumnFamilyDefinition, KeyspaceDefinition};
use crate::mutation::{Column, Mutation, MutationBatch};
use crate::traits::ClusterClient;
use anyhow::{anyhow, bail, Result};
use dataset_core::ColumnType;
use std::collections::BTreeMap;
use tokio::sync::Mutex;
use tracing::debug;

/// A stored cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredCell {
    Value { value: Vec<u8>, timestamp: i64 },
    Counter(i64),
}

impl StoredCell {
    pub fn value(&self) -> Option<&[u8]> {
        match self {
            Self::Value { value, .. } => Some(value),
            Self::Counter(_) => None,
        }
    }

    pub fn timestamp(&self) -> Option<i64> {
        match self {
            Self::Value { timestamp, .. } => Some(*timestamp),
            Self::Counter(_) => None,
        }
    }

    pub fn counter(&self) -> Option<i64> {
        match self {
            Self::Counter(count) => Some(*count),
            Self::Value { .. } => None,
        }
    }
}

/// All cells stored under one row key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredRow {
    pub columns: BTreeMap<Vec<u8>, StoredCell>,
    pub super_columns: BTreeMap<Vec<u8>, BTreeMap<Vec<u8>, StoredCell>>,
}

impl StoredRow {
    pub fn column(&self, name: &[u8]) -> Option<&StoredCell> {
        self.columns.get(name)
    }

    pub fn super_column(&self, super_column: &[u8], name: &[u8]) -> Option<&StoredCell> {
        self.super_columns.get(super_column)?.get(name)
    }

    /// Number of cells, counting sub-columns of super columns.
    pub fn cell_count(&self) -> usize {
        self.columns.len() + self.super_columns.values().map(BTreeMap::len).sum::<usize>()
    }
}

struct StoredKeyspace {
    definition: KeyspaceDefinition,
    /// Rows per column family name
    data: BTreeMap<String, BTreeMap<Vec<u8>, StoredRow>>,
}

#[derive(Default)]
struct ClusterState {
    keyspaces: BTreeMap<String, StoredKeyspace>,
    dropped: Vec<String>,
    executed_batches: usize,
}

/// An in-memory [`ClusterClient`].
#[derive(Default)]
pub struct MemoryCluster {
    state: Mutex<ClusterState>,
}

impl MemoryCluster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of the keyspaces currently defined.
    pub async fn keyspace_names(&self) -> Vec<String> {
        self.state.lock().await.keyspaces.keys().cloned().collect()
    }

    /// Keyspaces dropped so far, in order.
    pub async fn dropped_keyspaces(&self) -> Vec<String> {
        self.state.lock().await.dropped.clone()
    }

    /// Number of batches applied so far.
    pub async fn batches_executed(&self) -> usize {
        self.state.lock().await.executed_batches
    }

    /// Number of rows stored in a column family, `None` if it does not exist.
    pub async fn row_count(&self, keyspace: &str, column_family: &str) -> Option<usize> {
        let state = self.state.lock().await;
        state
            .keyspaces
            .get(keyspace)?
            .data
            .get(column_family)
            .map(BTreeMap::len)
    }

    /// A copy of one stored row.
    pub async fn row(&self, keyspace: &str, column_family: &str, key: &[u8]) -> Option<StoredRow> {
        let state = self.state.lock().await;
        state
            .keyspaces
            .get(keyspace)?
            .data
            .get(column_family)?
            .get(key)
            .cloned()
    }
}

fn write_cell(cells: &mut BTreeMap<Vec<u8>, StoredCell>, column: Column) {
    let newer = match cells.get(&column.name) {
        Some(StoredCell::Value { timestamp, .. }) => column.timestamp >= *timestamp,
        _ => true,
    };
    if newer {
        cells.insert(
            column.name,
            StoredCell::Value {
                value: column.value,
                timestamp: column.timestamp,
            },
        );
    }
}

fn add_to_counter(cells: &mut BTreeMap<Vec<u8>, StoredCell>, name: Vec<u8>, delta: i64) {
    let cell = cells.entry(name).or_insert(StoredCell::Counter(0));
    if let StoredCell::Counter(count) = cell {
        *count = count.wrapping_add(delta);
    }
}

/// Reject a mutation whose shape does not fit its column family.
fn check_shape(definition: &ColumnFamilyDefinition, mutation: &Mutation) -> Result<()> {
    let is_super_mutation = matches!(
        mutation,
        Mutation::SuperInsert { .. } | Mutation::SuperCounter { .. }
    );
    let is_super_family = definition.column_type == ColumnType::Super;
    if is_super_mutation != is_super_family {
        bail!(
            "column family '{}' is {} but received a {} mutation",
            definition.name,
            definition.column_type,
            if is_super_mutation { "super" } else { "standard" }
        );
    }
    if mutation.is_counter() != definition.is_counter() {
        bail!(
            "column family '{}' {} counters",
            definition.name,
            if definition.is_counter() { "only accepts" } else { "does not accept" }
        );
    }
    Ok(())
}

#[async_trait::async_trait]
impl ClusterClient for MemoryCluster {
    async fn describe_keyspace(&self, name: &str) -> Result<Option<KeyspaceDefinition>> {
        let state = self.state.lock().await;
        Ok(state.keyspaces.get(name).map(|ks| ks.definition.clone()))
    }

    async fn drop_keyspace(&self, name: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.keyspaces.remove(name).is_none() {
            bail!("keyspace '{name}' does not exist");
        }
        state.dropped.push(name.to_string());
        debug!("dropped keyspace '{name}'");
        Ok(())
    }

    async fn add_keyspace(
        &self,
        definition: KeyspaceDefinition,
        wait_for_schema_agreement: bool,
    ) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.keyspaces.contains_key(&definition.name) {
            bail!("keyspace '{}' already exists", definition.name);
        }

        let mut data = BTreeMap::new();
        for cf in &definition.column_families {
            if cf.keyspace != definition.name {
                bail!(
                    "column family '{}' belongs to keyspace '{}', not '{}'",
                    cf.name,
                    cf.keyspace,
                    definition.name
                );
            }
            if data.insert(cf.name.clone(), BTreeMap::new()).is_some() {
                bail!("duplicate column family '{}'", cf.name);
            }
        }

        debug!(
            "created keyspace '{}' with {} column families (schema agreement: {})",
            definition.name,
            definition.column_families.len(),
            wait_for_schema_agreement
        );
        state
            .keyspaces
            .insert(definition.name.clone(), StoredKeyspace { definition, data });
        Ok(())
    }

    async fn execute(&self, keyspace: &str, batch: MutationBatch) -> Result<()> {
        let mut state = self.state.lock().await;
        let stored = state
            .keyspaces
            .get_mut(keyspace)
            .ok_or_else(|| anyhow!("keyspace '{keyspace}' does not exist"))?;

        // Validate everything first so a bad batch leaves no partial writes.
        for mutation in batch.mutations() {
            let definition = stored
                .definition
                .column_family(mutation.column_family())
                .ok_or_else(|| {
                    anyhow!(
                        "column family '{}' does not exist in keyspace '{keyspace}'",
                        mutation.column_family()
                    )
                })?;
            check_shape(definition, mutation)?;
        }

        let applied = batch.len();
        for mutation in batch.into_mutations() {
            let rows = stored
                .data
                .get_mut(mutation.column_family())
                .ok_or_else(|| anyhow!("column family '{}' has no storage", mutation.column_family()))?;
            match mutation {
                Mutation::Insert { key, column, .. } => {
                    write_cell(&mut rows.entry(key).or_default().columns, column);
                }
                Mutation::SuperInsert {
                    key,
                    super_column,
                    column,
                    ..
                } => {
                    let row = rows.entry(key).or_default();
                    write_cell(row.super_columns.entry(super_column).or_default(), column);
                }
                Mutation::Counter {
                    key, column, delta, ..
                } => {
                    add_to_counter(&mut rows.entry(key).or_default().columns, column, delta);
                }
                Mutation::SuperCounter {
                    key,
                    super_column,
                    column,
                    delta,
                    ..
                } => {
                    let row = rows.entry(key).or_default();
                    add_to_counter(row.super_columns.entry(super_column).or_default(), column, delta);
                }
            }
        }

        state.executed_batches += 1;
        debug!("applied {applied} mutations to keyspace '{keyspace}'");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column_family(name: &str, column_type: ColumnType, counter: bool) -> ColumnFamilyDefinition {
        ColumnFamilyDefinition {
            keyspace: "ks1".to_string(),
            name: name.to_string(),
            column_type,
            comment: None,
            comparator_type: "BytesType".to_string(),
            comparator_alias: String::new(),
            sub_comparator_type: None,
            key_validation_class: "BytesType".to_string(),
            default_validation_class: if counter {
                "CounterColumnType".to_string()
            } else {
                "BytesType".to_string()
            },
            compaction_strategy: None,
            compaction_strategy_options: Vec::new(),
            gc_grace_seconds: None,
            max_compaction_threshold: None,
            min_compaction_threshold: None,
            read_repair_chance: None,
            replicate_on_write: None,
            column_definitions: Vec::new(),
        }
    }

    fn keyspace() -> KeyspaceDefinition {
        KeyspaceDefinition {
            name: "ks1".to_string(),
            strategy_class: "org.apache.cassandra.locator.SimpleStrategy".to_string(),
            replication_factor: 1,
            column_families: vec![
                column_family("cf", ColumnType::Standard, false),
                column_family("scf", ColumnType::Super, false),
                column_family("counters", ColumnType::Standard, true),
            ],
        }
    }

    fn column(name: u8, value: u8, timestamp: i64) -> Column {
        Column {
            name: vec![name],
            value: vec![value],
            timestamp,
        }
    }

    #[tokio::test]
    async fn test_keyspace_lifecycle() {
        let cluster = MemoryCluster::new();
        assert_eq!(cluster.describe_keyspace("ks1").await.unwrap(), None);

        cluster.add_keyspace(keyspace(), true).await.unwrap();
        assert_eq!(
            cluster.describe_keyspace("ks1").await.unwrap(),
            Some(keyspace())
        );
        assert!(cluster.add_keyspace(keyspace(), true).await.is_err());

        cluster.drop_keyspace("ks1").await.unwrap();
        assert!(cluster.keyspace_names().await.is_empty());
        assert_eq!(cluster.dropped_keyspaces().await, vec!["ks1".to_string()]);
        assert!(cluster.drop_keyspace("ks1").await.is_err());
    }

    #[tokio::test]
    async fn test_insert_last_write_wins() {
        let cluster = MemoryCluster::new();
        cluster.add_keyspace(keyspace(), false).await.unwrap();

        let mut batch = MutationBatch::new();
        batch.add_insertion("cf", vec![1], column(2, 10, 100));
        batch.add_insertion("cf", vec![1], column(2, 11, 50));
        batch.add_insertion("cf", vec![1], column(3, 12, 100));
        cluster.execute("ks1", batch).await.unwrap();

        let row = cluster.row("ks1", "cf", &[1]).await.unwrap();
        assert_eq!(row.column(&[2]).and_then(StoredCell::value), Some(&[10u8][..]));
        assert_eq!(row.column(&[2]).and_then(StoredCell::timestamp), Some(100));
        assert_eq!(row.cell_count(), 2);
        assert_eq!(cluster.row_count("ks1", "cf").await, Some(1));
        assert_eq!(cluster.batches_executed().await, 1);
    }

    #[tokio::test]
    async fn test_counters_accumulate() {
        let cluster = MemoryCluster::new();
        cluster.add_keyspace(keyspace(), false).await.unwrap();

        for delta in [5, 7] {
            let mut batch = MutationBatch::new();
            batch.add_counter("counters", vec![1], vec![2], delta);
            cluster.execute("ks1", batch).await.unwrap();
        }

        let row = cluster.row("ks1", "counters", &[1]).await.unwrap();
        assert_eq!(row.column(&[2]).and_then(StoredCell::counter), Some(12));
    }

    #[tokio::test]
    async fn test_super_columns_nest() {
        let cluster = MemoryCluster::new();
        cluster.add_keyspace(keyspace(), false).await.unwrap();

        let mut batch = MutationBatch::new();
        batch.add_super_insertion("scf", vec![1], vec![9], column(2, 10, 1));
        batch.add_super_insertion("scf", vec![1], vec![9], column(3, 11, 1));
        cluster.execute("ks1", batch).await.unwrap();

        let row = cluster.row("ks1", "scf", &[1]).await.unwrap();
        assert!(row.columns.is_empty());
        assert_eq!(
            row.super_column(&[9], &[3]).and_then(StoredCell::value),
            Some(&[11u8][..])
        );
        assert_eq!(row.cell_count(), 2);
    }

    #[tokio::test]
    async fn test_rejects_mismatched_mutations() {
        let cluster = MemoryCluster::new();
        cluster.add_keyspace(keyspace(), false).await.unwrap();

        let mut batch = MutationBatch::new();
        batch.add_insertion("counters", vec![1], column(2, 3, 1));
        assert!(cluster.execute("ks1", batch).await.is_err());

        let mut batch = MutationBatch::new();
        batch.add_insertion("scf", vec![1], column(2, 3, 1));
        assert!(cluster.execute("ks1", batch).await.is_err());

        let mut batch = MutationBatch::new();
        batch.add_counter("cf", vec![1], vec![2], 1);
        assert!(cluster.execute("ks1", batch).await.is_err());

        let mut batch = MutationBatch::new();
        batch.add_insertion("missing", vec![1], column(2, 3, 1));
        assert!(cluster.execute("ks1", batch).await.is_err());

        let mut batch = MutationBatch::new();
        batch.add_insertion("cf", vec![1], column(2, 3, 1));
        assert!(cluster.execute("ks2", batch).await.is_err());

        // Validation happens before any write.
        let mut batch = MutationBatch::new();
        batch.add_insertion("cf", vec![1], column(2, 3, 1));
        batch.add_counter("cf", vec![1], vec![2], 1);
        assert!(cluster.execute("ks1", batch).await.is_err());
        assert_eq!(cluster.row_count("ks1", "cf").await, Some(0));
        assert_eq!(cluster.batches_executed().await, 0);
    }
}
