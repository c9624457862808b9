//! Schema definitions derived from the dataset model.

use crate::args::LoadingOption;
use cluster_client::{ColumnDefinition, ColumnFamilyDefinition, KeyspaceDefinition};
use dataset_core::{ColumnFamilyModel, ColumnMetadataModel, ColumnType, KeyspaceModel};

/// Build the keyspace definition, applying the option overrides.
pub fn keyspace_definition(keyspace: &KeyspaceModel, options: &LoadingOption) -> KeyspaceDefinition {
    let strategy = options.strategy.unwrap_or(keyspace.strategy);
    let replication_factor = options
        .replication_factor
        .unwrap_or(keyspace.replication_factor);

    KeyspaceDefinition {
        name: keyspace.name.clone(),
        strategy_class: strategy.class_name(),
        replication_factor,
        column_families: keyspace
            .column_families
            .iter()
            .map(|cf| column_family_definition(&keyspace.name, cf))
            .collect(),
    }
}

/// Build one column family definition.
///
/// The key validation class carries its alias inline; the comparator alias is
/// kept apart and is empty unless the comparator is composite or reversed.
pub fn column_family_definition(keyspace: &str, cf: &ColumnFamilyModel) -> ColumnFamilyDefinition {
    let sub_comparator_type = match cf.column_type {
        ColumnType::Super => cf
            .sub_comparator_type
            .map(|t| t.class_name().to_string()),
        ColumnType::Standard => None,
    };

    ColumnFamilyDefinition {
        keyspace: keyspace.to_string(),
        name: cf.name.clone(),
        column_type: cf.column_type,
        comment: cf.comment.clone(),
        comparator_type: cf.comparator_type.base.class_name().to_string(),
        comparator_alias: cf.comparator_type_alias().to_string(),
        sub_comparator_type,
        key_validation_class: cf.key_type.declaration(),
        default_validation_class: cf.default_column_value_type.class_name().to_string(),
        compaction_strategy: cf.compaction_strategy.clone(),
        compaction_strategy_options: cf
            .compaction_strategy_options
            .iter()
            .map(|o| (o.name.clone(), o.value.clone()))
            .collect(),
        gc_grace_seconds: cf.gc_grace_seconds,
        max_compaction_threshold: cf.max_compaction_threshold,
        min_compaction_threshold: cf.min_compaction_threshold,
        read_repair_chance: cf.read_repair_chance,
        replicate_on_write: cf.replicate_on_write,
        column_definitions: cf.columns_metadata.iter().map(column_definition).collect(),
    }
}

fn column_definition(metadata: &ColumnMetadataModel) -> ColumnDefinition {
    ColumnDefinition {
        name: metadata.column_name.to_bytes(),
        validation_class: metadata.validation_class.class_name().to_string(),
        index_type: metadata.index_type,
        index_name: metadata.effective_index_name(),
    }
}
