//! Error types for the loader.

use dataset_core::ParseError;
use thiserror::Error;

/// Errors that can occur during a load.
///
/// Nothing is retried and nothing is rolled back: once the existing keyspace
/// has been dropped it stays dropped, whatever fails afterwards.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The dataset could not be mapped.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// A cluster call failed, passed through as the client reported it.
    #[error(transparent)]
    Cluster(#[from] anyhow::Error),

    /// A counter column holds something other than an integer.
    #[error("Column '{column}' of counter column family '{column_family}' has no integral value")]
    InvalidCounterValue {
        column_family: String,
        column: String,
    },
}
