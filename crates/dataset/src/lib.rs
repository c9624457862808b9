//! Dataset documents and their mapping to the validated model.
//!
//! A dataset document (JSON or YAML) describes one keyspace: its column
//! families, their typing, and the rows to load. This crate reads documents
//! into a loose intermediate representation ([`parsed`]) and maps that onto
//! the typed [`KeyspaceModel`](dataset_core::KeyspaceModel) tree
//! ([`mapper`]).
//!
//! # Example
//!
//! ```rust
//! use dataset::{DataSet, ParsedDataSet};
//! use dataset_core::GenericValue;
//!
//! let dataset = ParsedDataSet::from_json(
//!     r#"{ "name": "ks1", "columnFamilies": [{
//!         "name": "cf", "keyType": "LongType",
//!         "rows": [{ "key": 10, "columns": [{ "name": "0a", "value": "0b" }] }]
//!     }] }"#,
//! );
//! let rows = &dataset.column_families().unwrap()[0].rows;
//! assert_eq!(rows[0].key, GenericValue::Long(10));
//! ```

pub mod dataset;
pub mod mapper;
pub mod parsed;

pub use dataset::{DataSet, DataSetSource, ParsedDataSet};
pub use mapper::DataSetMapper;
pub use parsed::{
    ParsedColumn, ParsedColumnFamily, ParsedColumnMetadata, ParsedCompactionStrategyOption,
    ParsedKeyspace, ParsedRow, ParsedScalar, ParsedSuperColumn,
};
