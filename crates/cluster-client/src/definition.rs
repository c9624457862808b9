//! Schema definitions submitted to the cluster.

use dataset_core::{ColumnType, IndexType, ValueType};

/// A keyspace and the column families created with it.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyspaceDefinition {
    pub name: String,
    /// Fully qualified replication strategy class
    pub strategy_class: String,
    pub replication_factor: u32,
    pub column_families: Vec<ColumnFamilyDefinition>,
}

impl KeyspaceDefinition {
    pub fn column_family(&self, name: &str) -> Option<&ColumnFamilyDefinition> {
        self.column_families.iter().find(|cf| cf.name == name)
    }
}

/// A column family as the cluster sees it.
///
/// Types are carried as marshal class names. Aliases are appended to the
/// class name where the cluster expects them (`key_validation_class`) and
/// kept apart where it does not (`comparator_type` / `comparator_alias`).
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnFamilyDefinition {
    pub keyspace: String,
    pub name: String,
    pub column_type: ColumnType,
    pub comment: Option<String>,

    pub comparator_type: String,
    /// Composite or reversed qualifier of the comparator, empty otherwise
    pub comparator_alias: String,
    pub sub_comparator_type: Option<String>,
    pub key_validation_class: String,
    pub default_validation_class: String,

    pub compaction_strategy: Option<String>,
    pub compaction_strategy_options: Vec<(String, String)>,
    pub gc_grace_seconds: Option<i32>,
    pub max_compaction_threshold: Option<i32>,
    pub min_compaction_threshold: Option<i32>,
    pub read_repair_chance: Option<f64>,
    pub replicate_on_write: Option<bool>,

    pub column_definitions: Vec<ColumnDefinition>,
}

impl ColumnFamilyDefinition {
    /// Whether the family stores counters.
    pub fn is_counter(&self) -> bool {
        self.default_validation_class == ValueType::Counter.class_name()
    }

    /// Full comparator declaration, class name followed by its alias.
    pub fn comparator(&self) -> String {
        format!("{}{}", self.comparator_type, self.comparator_alias)
    }
}

/// Validation and index declared for a single column name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
    /// Encoded column name
    pub name: Vec<u8>,
    pub validation_class: String,
    pub index_type: Option<IndexType>,
    pub index_name: Option<String>,
}
