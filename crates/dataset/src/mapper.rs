//! Maps a parsed document onto the validated dataset model.
//!
//! Mapping is fail-fast: the first missing field or unreadable literal aborts
//! the whole keyspace, and the error is wrapped with the column family, row
//! and column it was found in.

use crate::parsed::{
    ParsedColumn, ParsedColumnFamily, ParsedColumnMetadata, ParsedKeyspace, ParsedRow,
    ParsedScalar, ParsedSuperColumn,
};
use dataset_core::{
    type_from_name, ColumnFamilyModel, ColumnMetadataModel, ColumnModel, ColumnType,
    CompactionStrategyOptionModel, GenericValue, KeyspaceModel, ParseError, RowModel,
    StrategyModel, SuperColumnModel, TypeDescriptor, ValueType,
};
use dataset_generator::{contains_generator_syntax, TypeExtractor};
use tracing::debug;

/// Validation class declared for a raw column name.
struct DeclaredColumn {
    raw_name: String,
    validation_class: ValueType,
}

/// Typing shared by every column of one column family.
struct ColumnTyping<'a> {
    name_type: &'a TypeDescriptor,
    default_value_type: ValueType,
    /// Empty inside super columns, where metadata does not apply
    declared: &'a [DeclaredColumn],
}

/// Translates [`ParsedKeyspace`] trees into [`KeyspaceModel`]s.
pub struct DataSetMapper {
    extractor: TypeExtractor,
}

impl DataSetMapper {
    /// Create a mapper whose generator expressions are seeded with `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            extractor: TypeExtractor::new(seed),
        }
    }

    /// Map a whole keyspace.
    pub fn map_keyspace(&mut self, parsed: &ParsedKeyspace) -> Result<KeyspaceModel, ParseError> {
        let name = parsed
            .name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| ParseError::MissingField("keyspace name".to_string()))?;

        let mut keyspace = KeyspaceModel::new(name);

        if parsed.replication_factor != 0 {
            keyspace.replication_factor = parsed.replication_factor;
        }

        if let Some(strategy) = &parsed.strategy {
            keyspace.strategy = strategy.parse::<StrategyModel>()?;
        }

        for (idx, parsed_cf) in parsed.column_families.iter().enumerate() {
            let label = match &parsed_cf.name {
                Some(name) => format!("column family '{name}'"),
                None => format!("column family #{idx}"),
            };
            let column_family = self
                .map_column_family(parsed_cf)
                .map_err(|e| e.context(label))?;
            keyspace.column_families.push(column_family);
        }

        debug!(
            "mapped keyspace '{}' with {} column families",
            keyspace.name,
            keyspace.column_families.len()
        );
        Ok(keyspace)
    }

    fn map_column_family(
        &mut self,
        parsed: &ParsedColumnFamily,
    ) -> Result<ColumnFamilyModel, ParseError> {
        let name = parsed
            .name
            .as_deref()
            .ok_or_else(|| ParseError::MissingField("column family name".to_string()))?;

        let mut column_family = ColumnFamilyModel::new(name);
        column_family.column_type = parsed.column_type.unwrap_or_default();
        column_family.comment = parsed.comment.clone();
        column_family.compaction_strategy = parsed.compaction_strategy.clone();
        column_family.compaction_strategy_options = parsed
            .compaction_strategy_options
            .iter()
            .map(|o| CompactionStrategyOptionModel::new(&o.name, &o.value))
            .collect();
        column_family.gc_grace_seconds = parsed.gc_grace_seconds;
        column_family.max_compaction_threshold = parsed.max_compaction_threshold;
        column_family.min_compaction_threshold = parsed.min_compaction_threshold;
        column_family.read_repair_chance = parsed.read_repair_chance;
        column_family.replicate_on_write = parsed.replicate_on_write;

        if let Some(key_type) = &parsed.key_type {
            let descriptor = TypeDescriptor::parse(key_type)?;
            // Only composite key types keep their alias.
            column_family.key_type = if descriptor.is_composite() {
                descriptor
            } else {
                TypeDescriptor::simple(descriptor.base)
            };
        }

        if let Some(comparator_type) = &parsed.comparator_type {
            column_family.comparator_type = TypeDescriptor::parse(comparator_type)?;
        }

        if let Some(sub_comparator_type) = &parsed.sub_comparator_type {
            if column_family.column_type != ColumnType::Super {
                return Err(ParseError::Structure(
                    "sub comparator type is only allowed on super column families".to_string(),
                ));
            }
            column_family.sub_comparator_type =
                Some(TypeDescriptor::parse(sub_comparator_type)?.base);
        }

        if let Some(default_type) = &parsed.default_column_value_type {
            column_family.default_column_value_type = type_from_name(default_type)?;
        }

        // Metadata first: column values are typed by it.
        let mut declared = Vec::with_capacity(parsed.columns_metadata.len());
        for parsed_metadata in &parsed.columns_metadata {
            let (metadata, raw_name) =
                self.map_column_metadata(parsed_metadata, &column_family.comparator_type)?;
            declared.push(DeclaredColumn {
                raw_name,
                validation_class: metadata.validation_class,
            });
            column_family.columns_metadata.push(metadata);
        }

        for (idx, parsed_row) in parsed.rows.iter().enumerate() {
            let row = self
                .map_row(parsed_row, &column_family, &declared)
                .map_err(|e| e.context(format!("row #{idx}")))?;
            column_family.rows.push(row);
        }

        debug!(
            "mapped column family '{}' ({}) with {} rows",
            column_family.name,
            column_family.column_type,
            column_family.rows.len()
        );
        Ok(column_family)
    }

    fn map_column_metadata(
        &self,
        parsed: &ParsedColumnMetadata,
        comparator_type: &TypeDescriptor,
    ) -> Result<(ColumnMetadataModel, String), ParseError> {
        let raw_name = parsed
            .name
            .as_ref()
            .map(ParsedScalar::as_text)
            .ok_or_else(|| ParseError::MissingField("column metadata name".to_string()))?;

        let validation_class = parsed.validation_class.as_deref().ok_or_else(|| {
            ParseError::MissingField(format!(
                "validation class of column metadata '{raw_name}'"
            ))
        })?;

        let metadata = ColumnMetadataModel {
            column_name: self.extractor.construct(raw_name, comparator_type)?,
            validation_class: type_from_name(validation_class)?,
            index_type: parsed.index_type,
            index_name: parsed.index_name.clone(),
        };
        Ok((metadata, raw_name.to_string()))
    }

    fn map_row(
        &mut self,
        parsed: &ParsedRow,
        column_family: &ColumnFamilyModel,
        declared: &[DeclaredColumn],
    ) -> Result<RowModel, ParseError> {
        let raw_key = parsed
            .key
            .as_ref()
            .map(ParsedScalar::as_text)
            .ok_or_else(|| ParseError::MissingField("row key".to_string()))?;
        let key = self.extractor.construct(raw_key, &column_family.key_type)?;

        let is_super = column_family.column_type == ColumnType::Super;
        if is_super && !parsed.columns.is_empty() {
            return Err(ParseError::Structure(format!(
                "row '{raw_key}' of a super column family must hold super columns, not columns"
            )));
        }
        if !is_super && !parsed.super_columns.is_empty() {
            return Err(ParseError::Structure(format!(
                "row '{raw_key}' of a standard column family cannot hold super columns"
            )));
        }

        let typing = ColumnTyping {
            name_type: &column_family.comparator_type,
            default_value_type: column_family.default_column_value_type,
            declared,
        };
        let columns = self
            .map_columns(&parsed.columns, &typing)
            .map_err(|e| e.context(format!("row '{raw_key}'")))?;

        let mut super_columns = Vec::with_capacity(parsed.super_columns.len());
        for parsed_super in &parsed.super_columns {
            let super_column = self
                .map_super_column(parsed_super, column_family)
                .map_err(|e| e.context(format!("row '{raw_key}'")))?;
            super_columns.push(super_column);
        }

        Ok(RowModel {
            key,
            columns,
            super_columns,
        })
    }

    fn map_super_column(
        &mut self,
        parsed: &ParsedSuperColumn,
        column_family: &ColumnFamilyModel,
    ) -> Result<SuperColumnModel, ParseError> {
        let raw_name = parsed
            .name
            .as_ref()
            .map(ParsedScalar::as_text)
            .ok_or_else(|| ParseError::MissingField("super column name".to_string()))?;
        let name = self
            .extractor
            .construct(raw_name, &column_family.comparator_type)?;

        // Sub-columns: no composite decomposition, no metadata.
        let sub_comparator = TypeDescriptor::simple(
            column_family
                .sub_comparator_type
                .unwrap_or(ValueType::Bytes),
        );
        let typing = ColumnTyping {
            name_type: &sub_comparator,
            default_value_type: column_family.default_column_value_type,
            declared: &[],
        };
        let columns = self
            .map_columns(&parsed.columns, &typing)
            .map_err(|e| e.context(format!("super column '{raw_name}'")))?;

        Ok(SuperColumnModel { name, columns })
    }

    fn map_columns(
        &mut self,
        parsed: &[ParsedColumn],
        typing: &ColumnTyping<'_>,
    ) -> Result<Vec<ColumnModel>, ParseError> {
        parsed
            .iter()
            .map(|column| self.map_column(column, typing))
            .collect()
    }

    fn map_column(
        &mut self,
        parsed: &ParsedColumn,
        typing: &ColumnTyping<'_>,
    ) -> Result<ColumnModel, ParseError> {
        let raw_name = parsed
            .name
            .as_ref()
            .map(ParsedScalar::as_text)
            .ok_or_else(|| ParseError::MissingField("column name".to_string()))?;
        let name = self.extractor.construct(raw_name, typing.name_type)?;

        let value = match &parsed.value {
            None => None,
            Some(raw) => Some(
                self.map_column_value(raw.as_text(), raw_name, typing)
                    .map_err(|e| e.context(format!("column '{raw_name}'")))?,
            ),
        };

        let timestamp = parsed
            .timestamp
            .as_ref()
            .map(|ts| {
                let text = ts.as_text();
                text.trim()
                    .parse::<i64>()
                    .map_err(|e| ParseError::invalid_literal(text, "timestamp", e))
            })
            .transpose()?;

        Ok(ColumnModel {
            name,
            value,
            timestamp,
        })
    }

    fn map_column_value(
        &mut self,
        raw_value: &str,
        raw_name: &str,
        typing: &ColumnTyping<'_>,
    ) -> Result<GenericValue, ParseError> {
        let is_generated = contains_generator_syntax(raw_value);
        let declared = typing
            .declared
            .iter()
            .find(|d| d.raw_name == raw_name)
            .map(|d| d.validation_class);

        let counter_typed = typing.default_value_type == ValueType::Counter
            || declared == Some(ValueType::Counter);
        if is_generated && counter_typed {
            return Err(ParseError::CounterOverride(raw_value.to_string()));
        }

        match declared {
            Some(validation_class) if !is_generated => {
                GenericValue::parse_literal(raw_value, validation_class)
            }
            _ => self.extractor.extract(raw_value, typing.default_value_type),
        }
    }
}

impl Default for DataSetMapper {
    fn default() -> Self {
        Self::new(0)
    }
}
