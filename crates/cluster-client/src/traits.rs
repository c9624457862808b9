//! ClusterClient trait definition.

use crate::definition::KeyspaceDefinition;
use crate::mutation::MutationBatch;
use anyhow::Result;

/// Trait for the schema and data operations the loader needs.
///
/// The loader is generic over this trait, so calls are statically
/// dispatched:
///
/// ```ignore
/// pub async fn load<C: ClusterClient>(client: &C, keyspace: KeyspaceDefinition) -> Result<()> {
///     if client.describe_keyspace(&keyspace.name).await?.is_some() {
///         client.drop_keyspace(&keyspace.name).await?;
///     }
///     client.add_keyspace(keyspace, true).await
/// }
/// ```
#[async_trait::async_trait]
pub trait ClusterClient: Send + Sync {
    /// Look up a keyspace, `None` if it does not exist.
    async fn describe_keyspace(&self, name: &str) -> Result<Option<KeyspaceDefinition>>;

    /// Drop a keyspace and all of its data.
    async fn drop_keyspace(&self, name: &str) -> Result<()>;

    /// Create a keyspace with its column families.
    ///
    /// With `wait_for_schema_agreement` the call returns only once every
    /// node reports the new schema.
    async fn add_keyspace(
        &self,
        definition: KeyspaceDefinition,
        wait_for_schema_agreement: bool,
    ) -> Result<()>;

    /// Apply a batch of mutations to `keyspace`.
    async fn execute(&self, keyspace: &str, batch: MutationBatch) -> Result<()>;
}
