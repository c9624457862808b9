//! Intermediate representation of a dataset document.
//!
//! These types mirror the document layout one-to-one and perform no
//! validation beyond what serde needs to read them. Every field that the
//! mapper requires is still optional here so that its absence can be reported
//! as a [`ParseError`](dataset_core::ParseError) naming the element.
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "name": "ks1",
//!   "replicationFactor": 1,
//!   "strategy": "SimpleStrategy",
//!   "columnFamilies": [{
//!     "name": "users",
//!     "keyType": "UTF8Type",
//!     "comparatorType": "UTF8Type",
//!     "defaultColumnValueType": "UTF8Type",
//!     "rows": [{ "key": "alice", "columns": [{ "name": "age", "value": "30" }] }]
//!   }]
//! }
//! ```

use dataset_core::{ColumnType, IndexType};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

/// A scalar exactly as it was written in the document.
///
/// Scalars are always read as text: `0x0aff`, `1.0` or a 30 digit integer
/// reach the mapper unchanged, and only the column's type decides what they
/// mean.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedScalar(String);

impl ParsedScalar {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The text the scalar was written as.
    pub fn as_text(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParsedScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParsedScalar {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ParsedScalar {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<i64> for ParsedScalar {
    fn from(i: i64) -> Self {
        Self(i.to_string())
    }
}

struct ScalarVisitor;

impl<'de> Visitor<'de> for ScalarVisitor {
    type Value = ParsedScalar;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a scalar")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(ParsedScalar::new(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(ParsedScalar(v))
    }
}

// YAML hands plain scalars over verbatim when asked for a string; JSON
// numbers and booleans are turned into strings before deserialization.
impl<'de> Deserialize<'de> for ParsedScalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(ScalarVisitor)
    }
}

/// Read an optional scalar field through its [`FromStr`] impl.
fn from_text<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    Option::<ParsedScalar>::deserialize(deserializer)?
        .map(|scalar| scalar.as_text().trim().parse::<T>().map_err(de::Error::custom))
        .transpose()
}

fn from_text_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Default,
    T::Err: fmt::Display,
{
    from_text(deserializer).map(Option::unwrap_or_default)
}

/// Replace every JSON number and boolean with its source text.
///
/// Needs `serde_json/arbitrary_precision` so that numbers keep the digits
/// they were written with.
pub(crate) fn stringify_scalars(value: &mut serde_json::Value) {
    use serde_json::Value;

    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => {
            items.iter_mut().for_each(stringify_scalars);
            return;
        }
        Value::Object(fields) => {
            fields.values_mut().for_each(stringify_scalars);
            return;
        }
        Value::Null | Value::String(_) => return,
    };
    *value = Value::String(text);
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedKeyspace {
    pub name: Option<String>,

    /// Zero means "not set"
    #[serde(default, deserialize_with = "from_text_or_default")]
    pub replication_factor: u32,

    pub strategy: Option<String>,

    #[serde(default)]
    pub column_families: Vec<ParsedColumnFamily>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedColumnFamily {
    pub name: Option<String>,

    #[serde(rename = "type", default, deserialize_with = "from_text")]
    pub column_type: Option<ColumnType>,

    pub comment: Option<String>,
    pub key_type: Option<String>,
    pub comparator_type: Option<String>,
    pub sub_comparator_type: Option<String>,
    pub default_column_value_type: Option<String>,

    pub compaction_strategy: Option<String>,
    #[serde(default)]
    pub compaction_strategy_options: Vec<ParsedCompactionStrategyOption>,
    #[serde(default, deserialize_with = "from_text")]
    pub gc_grace_seconds: Option<i32>,
    #[serde(default, deserialize_with = "from_text")]
    pub max_compaction_threshold: Option<i32>,
    #[serde(default, deserialize_with = "from_text")]
    pub min_compaction_threshold: Option<i32>,
    #[serde(default, deserialize_with = "from_text")]
    pub read_repair_chance: Option<f64>,
    #[serde(alias = "replicationOnWrite", default, deserialize_with = "from_text")]
    pub replicate_on_write: Option<bool>,

    #[serde(default)]
    pub columns_metadata: Vec<ParsedColumnMetadata>,

    #[serde(default)]
    pub rows: Vec<ParsedRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ParsedCompactionStrategyOption {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedColumnMetadata {
    pub name: Option<ParsedScalar>,
    pub validation_class: Option<String>,
    #[serde(default, deserialize_with = "from_text")]
    pub index_type: Option<IndexType>,
    pub index_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedRow {
    pub key: Option<ParsedScalar>,

    #[serde(default)]
    pub columns: Vec<ParsedColumn>,

    #[serde(default)]
    pub super_columns: Vec<ParsedSuperColumn>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ParsedSuperColumn {
    pub name: Option<ParsedScalar>,

    #[serde(default)]
    pub columns: Vec<ParsedColumn>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ParsedColumn {
    pub name: Option<ParsedScalar>,
    pub value: Option<ParsedScalar>,
    pub timestamp: Option<ParsedScalar>,
}

impl ParsedColumn {
    /// A column with a textual name and value.
    pub fn new(name: impl Into<ParsedScalar>, value: impl Into<ParsedScalar>) -> Self {
        Self {
            name: Some(name.into()),
            value: Some(value.into()),
            timestamp: None,
        }
    }
}
