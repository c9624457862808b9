//! The validated dataset model.
//!
//! A dataset is a tree: one [`KeyspaceModel`] owns its column families, each
//! [`ColumnFamilyModel`] owns its metadata and rows, and rows own their
//! columns and super columns. Every name, key and value in the tree is already
//! typed, so the loader never has to look at document text again.

use crate::error::ParseError;
use crate::types::{TypeDescriptor, ValueType};
use crate::values::GenericValue;
use std::fmt;
use std::str::FromStr;

/// Package prefix of the replication strategy classes.
pub const LOCATOR_PACKAGE: &str = "org.apache.cassandra.locator.";

/// Replication factor applied when the document does not set one.
pub const DEFAULT_REPLICATION_FACTOR: u32 = 1;

/// Keyspace replication strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyModel {
    #[default]
    SimpleStrategy,
    NetworkTopologyStrategy,
    OldNetworkTopologyStrategy,
}

impl StrategyModel {
    /// Short class name, e.g. `SimpleStrategy`.
    pub fn name(self) -> &'static str {
        match self {
            Self::SimpleStrategy => "SimpleStrategy",
            Self::NetworkTopologyStrategy => "NetworkTopologyStrategy",
            Self::OldNetworkTopologyStrategy => "OldNetworkTopologyStrategy",
        }
    }

    /// Fully qualified strategy class name.
    pub fn class_name(self) -> String {
        format!("{LOCATOR_PACKAGE}{}", self.name())
    }
}

impl FromStr for StrategyModel {
    type Err = ParseError;

    /// Accepts the short or the fully qualified class name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let short = s.trim().strip_prefix(LOCATOR_PACKAGE).unwrap_or(s.trim());
        [
            Self::SimpleStrategy,
            Self::NetworkTopologyStrategy,
            Self::OldNetworkTopologyStrategy,
        ]
        .into_iter()
        .find(|strategy| strategy.name() == short)
        .ok_or_else(|| ParseError::InvalidStrategy(s.to_string()))
    }
}

impl fmt::Display for StrategyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.class_name())
    }
}

/// Column family kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnType {
    #[default]
    Standard,
    Super,
}

impl ColumnType {
    pub fn name(self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Super => "Super",
        }
    }
}

impl FromStr for ColumnType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            t if t.eq_ignore_ascii_case("standard") => Ok(Self::Standard),
            t if t.eq_ignore_ascii_case("super") => Ok(Self::Super),
            other => Err(ParseError::Structure(format!(
                "invalid column family type: {other}"
            ))),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Secondary index kind declared in column metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexType {
    Keys,
    Custom,
    Composites,
}

impl IndexType {
    pub fn name(self) -> &'static str {
        match self {
            Self::Keys => "KEYS",
            Self::Custom => "CUSTOM",
            Self::Composites => "COMPOSITES",
        }
    }
}

impl FromStr for IndexType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "KEYS" => Ok(Self::Keys),
            "CUSTOM" => Ok(Self::Custom),
            "COMPOSITES" => Ok(Self::Composites),
            other => Err(ParseError::Structure(format!("invalid index type: {other}"))),
        }
    }
}

impl fmt::Display for IndexType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Root of a dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyspaceModel {
    pub name: String,
    pub strategy: StrategyModel,
    pub replication_factor: u32,
    pub column_families: Vec<ColumnFamilyModel>,
}

impl KeyspaceModel {
    /// A keyspace with the default strategy and replication factor.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            strategy: StrategyModel::default(),
            replication_factor: DEFAULT_REPLICATION_FACTOR,
            column_families: Vec::new(),
        }
    }
}

/// A column family with its typing, tuning options and rows.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnFamilyModel {
    pub name: String,
    pub column_type: ColumnType,
    pub comment: Option<String>,

    /// Row key type; its alias is kept only for composites
    pub key_type: TypeDescriptor,

    /// Column name type; its alias is kept for composite or reversed types
    pub comparator_type: TypeDescriptor,

    /// Sub-column name type, only for super column families
    pub sub_comparator_type: Option<ValueType>,

    pub default_column_value_type: ValueType,
    pub columns_metadata: Vec<ColumnMetadataModel>,

    pub compaction_strategy: Option<String>,
    pub compaction_strategy_options: Vec<CompactionStrategyOptionModel>,
    pub gc_grace_seconds: Option<i32>,
    pub max_compaction_threshold: Option<i32>,
    pub min_compaction_threshold: Option<i32>,
    pub read_repair_chance: Option<f64>,
    pub replicate_on_write: Option<bool>,

    pub rows: Vec<RowModel>,
}

impl ColumnFamilyModel {
    /// A standard column family typed entirely as byte blobs.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: ColumnType::Standard,
            comment: None,
            key_type: TypeDescriptor::simple(ValueType::Bytes),
            comparator_type: TypeDescriptor::simple(ValueType::Bytes),
            sub_comparator_type: None,
            default_column_value_type: ValueType::Bytes,
            columns_metadata: Vec::new(),
            compaction_strategy: None,
            compaction_strategy_options: Vec::new(),
            gc_grace_seconds: None,
            max_compaction_threshold: None,
            min_compaction_threshold: None,
            read_repair_chance: None,
            replicate_on_write: None,
            rows: Vec::new(),
        }
    }

    /// Whether column values are server-side counters.
    pub fn is_counter(&self) -> bool {
        self.default_column_value_type == ValueType::Counter
    }

    pub fn key_type_alias(&self) -> &str {
        &self.key_type.alias
    }

    pub fn comparator_type_alias(&self) -> &str {
        &self.comparator_type.alias
    }
}

/// Validation and indexing declared for one column name.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMetadataModel {
    pub column_name: GenericValue,
    pub validation_class: ValueType,
    pub index_type: Option<IndexType>,
    pub index_name: Option<String>,
}

impl ColumnMetadataModel {
    /// The index name to declare, defaulting to the column name.
    ///
    /// `None` when the column is not indexed.
    pub fn effective_index_name(&self) -> Option<String> {
        self.index_type.map(|_| {
            self.index_name
                .clone()
                .unwrap_or_else(|| self.column_name.to_string())
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowModel {
    pub key: GenericValue,
    pub columns: Vec<ColumnModel>,
    /// Populated only in super column families
    pub super_columns: Vec<SuperColumnModel>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SuperColumnModel {
    pub name: GenericValue,
    pub columns: Vec<ColumnModel>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnModel {
    pub name: GenericValue,
    /// `None` is written as an empty byte blob
    pub value: Option<GenericValue>,
    /// `None` is stamped by the loader
    pub timestamp: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompactionStrategyOptionModel {
    pub name: String,
    pub value: String,
}

impl CompactionStrategyOptionModel {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}
