//! Cassandra-fixture library
//!
//! Loads a keyspace schema and its test data into a cluster from a dataset
//! document, replacing whatever keyspace of the same name was there.
//!
//! # Pipeline
//!
//! ```text
//! JSON / YAML document
//!    │  dataset::ParsedDataSet       (deserialize, map, cache)
//!    ▼
//! KeyspaceModel                      (typed names, keys and values)
//!    │  DataLoader                   (definitions + mutation batches)
//!    ▼
//! ClusterClient                      (describe, drop, create, execute)
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! # Check that a dataset maps cleanly
//! cassandra-fixture validate tests/data/users.yaml
//!
//! # Load it into an in-memory cluster and report what was written
//! cassandra-fixture load tests/data/users.yaml --replication-factor 3
//! ```

pub mod args;
pub mod clock;
pub mod error;
pub mod insert;
pub mod loader;
pub mod schema;

pub use args::LoadingOption;
pub use clock::TimestampPolicy;
pub use error::LoadError;
pub use loader::{DataLoader, LoadSummary};

// Re-export the workspace crates for convenience
pub use cluster_client;
pub use dataset;
pub use dataset_core;
