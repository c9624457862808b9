//! End-to-end loads of dataset documents into the in-memory cluster.

use anyhow::bail;
use cassandra_fixture::cluster_client::{
    ClusterClient, KeyspaceDefinition, MemoryCluster, MutationBatch, StoredCell,
};
use cassandra_fixture::dataset::ParsedDataSet;
use cassandra_fixture::dataset_core::{GenericValue, ParseError, StrategyModel, TypeDescriptor};
use cassandra_fixture::{DataLoader, LoadError, LoadingOption, TimestampPolicy};
use std::path::PathBuf;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter("cassandra_fixture=debug,dataset=debug,cluster_client=debug")
        .with_test_writer()
        .try_init()
        .ok();
}

fn fixture(name: &str) -> ParsedDataSet {
    ParsedDataSet::from_file(
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests/data")
            .join(name),
    )
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[tokio::test]
async fn test_load_full_fixture() {
    init_tracing();

    let loader = DataLoader::new(MemoryCluster::new());
    let summary = loader.load(&fixture("users.yaml")).await.unwrap();

    assert_eq!(summary.keyspace, "fixture_ks");
    assert!(!summary.dropped_existing);
    assert_eq!(summary.column_families, 5);
    // The empty family submits no batch.
    assert_eq!(summary.batches, 4);
    assert_eq!(summary.mutations, 5 + 2 + 2 + 2);

    let cluster = loader.client();
    assert_eq!(cluster.batches_executed().await, 4);

    let definition = cluster.describe_keyspace("fixture_ks").await.unwrap().unwrap();
    let users = definition.column_family("users").unwrap();
    assert_eq!(users.comment.as_deref(), Some("registered users"));
    assert_eq!(users.gc_grace_seconds, Some(3600));
    assert_eq!(users.column_definitions.len(), 2);
    assert_eq!(users.column_definitions[0].index_name.as_deref(), Some("age"));
    assert_eq!(users.column_definitions[1].index_name, None);

    // Standard family, typed by metadata then by the default value type.
    let alice = cluster.row("fixture_ks", "users", b"alice").await.unwrap();
    assert_eq!(
        alice.column(b"age").and_then(StoredCell::value),
        Some(&30i64.to_be_bytes()[..])
    );
    assert_eq!(alice.column(b"active").and_then(StoredCell::value), Some(&[1u8][..]));
    assert_eq!(
        alice.column(b"email").and_then(StoredCell::value),
        Some(&b"alice@example.com"[..])
    );
    assert_eq!(alice.column(b"email").and_then(StoredCell::timestamp), Some(1000));

    let bob = cluster.row("fixture_ks", "users", b"bob").await.unwrap();
    assert_eq!(bob.column(b"nickname").and_then(StoredCell::value), Some(&[][..]));

    // Counter family.
    let home = cluster.row("fixture_ks", "page_views", b"home").await.unwrap();
    assert_eq!(home.column(b"hits").and_then(StoredCell::counter), Some(12));
    assert_eq!(home.column(b"uniques").and_then(StoredCell::counter), Some(5));

    // Super family: sub-column names typed by the sub-comparator.
    let timeline = cluster
        .row("fixture_ks", "timeline", &1i64.to_be_bytes())
        .await
        .unwrap();
    assert!(timeline.columns.is_empty());
    assert_eq!(
        timeline
            .super_column(b"monday", &2i64.to_be_bytes())
            .and_then(StoredCell::value),
        Some(&b"review"[..])
    );

    // Composite keys and column names.
    let key_type = TypeDescriptor::parse("CompositeType(LongType,UTF8Type)").unwrap();
    let comparator = TypeDescriptor::parse("CompositeType(UTF8Type,Int32Type)").unwrap();
    let key = GenericValue::parse("2024:login", &key_type).unwrap().to_bytes();
    let events = cluster.row("fixture_ks", "events", &key).await.unwrap();
    let alice_1 = GenericValue::parse("alice:1", &comparator).unwrap().to_bytes();
    let bob_2 = GenericValue::parse("bob:2", &comparator).unwrap().to_bytes();
    assert_eq!(
        events.column(&alice_1).and_then(StoredCell::value),
        Some(&[0x0a, 0xff][..])
    );
    assert_eq!(
        events.column(&bob_2).and_then(StoredCell::value).map(<[u8]>::len),
        Some(4)
    );

    assert_eq!(cluster.row_count("fixture_ks", "empty_family").await, Some(0));
}

#[tokio::test]
async fn test_malformed_hex_key_fails_load() {
    init_tracing();

    let loader = DataLoader::new(MemoryCluster::new());
    let err = loader.load(&fixture("bad_hex_key.json")).await.unwrap_err();

    match err {
        LoadError::Parse(parse) => {
            assert!(matches!(parse.root(), ParseError::InvalidLiteral { value, .. } if value == "ZZ"));
        }
        other => panic!("expected a parse error, got {other}"),
    }
    assert!(loader.client().keyspace_names().await.is_empty());
}

#[tokio::test]
async fn test_generator_in_counter_family_fails_load() {
    init_tracing();

    let loader = DataLoader::new(MemoryCluster::new());
    let err = loader
        .load(&fixture("counters_with_generator.json"))
        .await
        .unwrap_err();
    assert!(matches!(
        &err,
        LoadError::Parse(parse) if matches!(parse.root(), ParseError::CounterOverride(_))
    ));
}

#[tokio::test]
async fn test_existing_keyspace_is_dropped_first() {
    init_tracing();

    let loader = DataLoader::new(MemoryCluster::new());
    let dataset = fixture("simple.json");

    let first = loader.load(&dataset).await.unwrap();
    assert!(!first.dropped_existing);
    assert!(loader.client().dropped_keyspaces().await.is_empty());

    let second = loader.load(&dataset).await.unwrap();
    assert!(second.dropped_existing);
    assert_eq!(
        loader.client().dropped_keyspaces().await,
        vec!["ks1".to_string()]
    );
    assert_eq!(loader.client().row_count("ks1", "cf").await, Some(2));
}

#[tokio::test]
async fn test_reload_resets_counters() {
    init_tracing();

    let loader = DataLoader::new(MemoryCluster::new());
    let dataset = fixture("users.yaml");
    loader.load(&dataset).await.unwrap();
    loader.load(&dataset).await.unwrap();

    let home = loader
        .client()
        .row("fixture_ks", "page_views", b"home")
        .await
        .unwrap();
    assert_eq!(home.column(b"hits").and_then(StoredCell::counter), Some(12));
}

#[tokio::test]
async fn test_only_schema_loads_no_rows() {
    init_tracing();

    let loader = DataLoader::new(MemoryCluster::new());
    let options = LoadingOption::new().with_only_schema(true);
    let summary = loader
        .load_with_options(&fixture("users.yaml"), &options)
        .await
        .unwrap();
    assert_eq!(summary.mutations, 0);

    let cluster = loader.client();
    let definition = cluster.describe_keyspace("fixture_ks").await.unwrap().unwrap();
    assert_eq!(definition.column_families.len(), 5);
    for cf in &definition.column_families {
        assert_eq!(cluster.row_count("fixture_ks", &cf.name).await, Some(0));
    }
    assert_eq!(cluster.batches_executed().await, 0);
}

#[tokio::test]
async fn test_overrides_apply_to_keyspace() {
    init_tracing();

    let loader = DataLoader::new(MemoryCluster::new());
    let options = LoadingOption::new()
        .with_replication_factor(3)
        .with_strategy(StrategyModel::NetworkTopologyStrategy);
    loader
        .load_with_options(&fixture("simple.json"), &options)
        .await
        .unwrap();

    let definition = loader.client().describe_keyspace("ks1").await.unwrap().unwrap();
    assert_eq!(definition.replication_factor, 3);
    assert_eq!(
        definition.strategy_class,
        "org.apache.cassandra.locator.NetworkTopologyStrategy"
    );
}

#[tokio::test]
async fn test_default_timestamps_increase_between_loads() {
    init_tracing();

    let loader = DataLoader::new(MemoryCluster::new());
    let dataset = fixture("simple.json");

    let before = now_millis();
    loader.load(&dataset).await.unwrap();
    let first = loader
        .client()
        .row("ks1", "cf", &[0x01])
        .await
        .and_then(|row| row.column(&[0x02]).and_then(StoredCell::timestamp))
        .unwrap();

    loader.load(&dataset).await.unwrap();
    let second = loader
        .client()
        .row("ks1", "cf", &[0x01])
        .await
        .and_then(|row| row.column(&[0x02]).and_then(StoredCell::timestamp))
        .unwrap();
    let after = now_millis();

    assert!(first >= before);
    assert!(second > first);
    assert!(second - after < 1_000);
}

#[tokio::test]
async fn test_fixed_timestamp_policy() {
    init_tracing();

    let loader =
        DataLoader::new(MemoryCluster::new()).with_timestamp_policy(TimestampPolicy::Fixed(1234));
    assert_eq!(loader.timestamp_policy(), TimestampPolicy::Fixed(1234));
    loader.load(&fixture("simple.json")).await.unwrap();

    let row = loader.client().row("ks1", "cf", &[0x04]).await.unwrap();
    assert_eq!(row.column(&[0x05]).and_then(StoredCell::timestamp), Some(1234));
}

/// Memory cluster whose batch execution always fails.
struct FailingExecuteCluster {
    inner: MemoryCluster,
}

#[async_trait::async_trait]
impl ClusterClient for FailingExecuteCluster {
    async fn describe_keyspace(&self, name: &str) -> anyhow::Result<Option<KeyspaceDefinition>> {
        self.inner.describe_keyspace(name).await
    }

    async fn drop_keyspace(&self, name: &str) -> anyhow::Result<()> {
        self.inner.drop_keyspace(name).await
    }

    async fn add_keyspace(
        &self,
        definition: KeyspaceDefinition,
        wait_for_schema_agreement: bool,
    ) -> anyhow::Result<()> {
        self.inner
            .add_keyspace(definition, wait_for_schema_agreement)
            .await
    }

    async fn execute(&self, _keyspace: &str, _batch: MutationBatch) -> anyhow::Result<()> {
        bail!("connection reset by peer")
    }
}

#[tokio::test]
async fn test_cluster_failure_propagates_without_rollback() {
    init_tracing();

    let seeded = DataLoader::new(MemoryCluster::new());
    seeded.load(&fixture("simple.json")).await.unwrap();

    let loader = DataLoader::new(FailingExecuteCluster {
        inner: seeded.into_client(),
    });
    let err = loader.load(&fixture("simple.json")).await.unwrap_err();

    assert!(matches!(err, LoadError::Cluster(_)));
    assert_eq!(err.to_string(), "connection reset by peer");

    // The old keyspace was dropped and the new schema stays without rows.
    let cluster = &loader.client().inner;
    assert_eq!(cluster.dropped_keyspaces().await, vec!["ks1".to_string()]);
    assert!(cluster.describe_keyspace("ks1").await.unwrap().is_some());
    assert_eq!(cluster.row_count("ks1", "cf").await, Some(0));
}
