//! Cluster client abstraction for cassandra-fixture.
//!
//! The loader talks to a cluster only through the [`ClusterClient`] trait:
//! describe, drop and create keyspaces, and execute batches of mutations.
//! Everything crossing the trait is already encoded to bytes and class names,
//! so implementations never see dataset types.
//!
//! # Implementations
//!
//! - [`MemoryCluster`] - an in-process cluster that keeps schemas, cells and
//!   counters in memory, for tests and dry runs

pub mod definition;
pub mod memory;
pub mod mutation;
pub mod traits;

pub use definition::{ColumnDefinition, ColumnFamilyDefinition, KeyspaceDefinition};
pub use memory::{MemoryCluster, StoredCell, StoredRow};
pub use mutation::{Column, Mutation, MutationBatch};
pub use traits::ClusterClient;
