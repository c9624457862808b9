//! Core types for cassandra-fixture datasets.
//!
//! This crate provides the foundational types shared by the mapper and the
//! loader:
//!
//! - [`ValueType`] / [`TypeDescriptor`] - the closed set of marshal types and
//!   composite/reversed declarations built from them
//! - [`GenericValue`] - one typed scalar with its canonical byte encoding
//! - [`KeyspaceModel`] and friends - the validated dataset tree
//! - [`ParseError`] - everything that can go wrong before the cluster is touched
//!
//! # Architecture
//!
//! ```text
//! dataset-core (this crate)
//!    │
//!    ├─── dataset-generator  (generator expressions, type extraction)
//!    ├─── dataset            (document IR and the mapper)
//!    └─── cluster-client     (schema definitions and mutations)
//! ```
//!
//! # Example
//!
//! ```rust
//! use dataset_core::{GenericValue, TypeDescriptor};
//!
//! let comparator = TypeDescriptor::parse("CompositeType(LongType,UTF8Type)").unwrap();
//! let name = GenericValue::parse("12:abc", &comparator).unwrap();
//! assert_eq!(GenericValue::decode(&comparator, &name.to_bytes()).unwrap(), name);
//! ```

pub mod error;
pub mod model;
pub mod types;
pub mod values;

pub use error::ParseError;
pub use model::{
    ColumnFamilyModel, ColumnMetadataModel, ColumnModel, ColumnType,
    CompactionStrategyOptionModel, IndexType, KeyspaceModel, RowModel, StrategyModel,
    SuperColumnModel, DEFAULT_REPLICATION_FACTOR,
};
pub use types::{
    extract_alias_components, type_from_name, TypeDescriptor, ValueType, REVERSED_QUALIFIER,
};
pub use values::{GenericValue, COMPOSITE_SEPARATOR};
