//! Mutation batches built from column family rows.

use crate::error::LoadError;
use cluster_client::{Column, MutationBatch};
use dataset_core::{ColumnFamilyModel, ColumnModel, GenericValue, ValueType};

/// Build the batch holding every row of `cf`.
///
/// Columns without a timestamp are stamped with `timestamp`. Counter
/// families become counter increments; their timestamps are not used.
pub fn column_family_batch(cf: &ColumnFamilyModel, timestamp: i64) -> Result<MutationBatch, LoadError> {
    let mut batch = MutationBatch::new();

    for row in &cf.rows {
        let key = row.key.to_bytes();

        for column in &row.columns {
            if cf.is_counter() {
                let delta = counter_delta(cf, column)?;
                batch.add_counter(&cf.name, key.clone(), column.name.to_bytes(), delta);
            } else {
                batch.add_insertion(&cf.name, key.clone(), cell(column, timestamp));
            }
        }

        for super_column in &row.super_columns {
            let super_name = super_column.name.to_bytes();
            for column in &super_column.columns {
                if cf.is_counter() {
                    let delta = counter_delta(cf, column)?;
                    batch.add_super_counter(
                        &cf.name,
                        key.clone(),
                        super_name.clone(),
                        column.name.to_bytes(),
                        delta,
                    );
                } else {
                    batch.add_super_insertion(
                        &cf.name,
                        key.clone(),
                        super_name.clone(),
                        cell(column, timestamp),
                    );
                }
            }
        }
    }

    Ok(batch)
}

fn cell(column: &ColumnModel, timestamp: i64) -> Column {
    Column {
        name: column.name.to_bytes(),
        // null values are written as empty blobs
        value: column
            .value
            .as_ref()
            .map(GenericValue::to_bytes)
            .unwrap_or_default(),
        timestamp: column.timestamp.unwrap_or(timestamp),
    }
}

fn counter_delta(cf: &ColumnFamilyModel, column: &ColumnModel) -> Result<i64, LoadError> {
    column
        .value
        .as_ref()
        .filter(|v| v.value_type().is_integral() && v.value_type() != ValueType::Date)
        .and_then(GenericValue::as_i64)
        .ok_or_else(|| LoadError::InvalidCounterValue {
            column_family: cf.name.clone(),
            column: column.name.to_string(),
        })
}
