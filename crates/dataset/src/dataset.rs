//! Dataset sources.

use crate::mapper::DataSetMapper;
use crate::parsed::{stringify_scalars, ParsedKeyspace};
use dataset_core::{ColumnFamilyModel, KeyspaceModel, ParseError};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info};

/// Anything the loader can read a keyspace from.
///
/// Implementations map their document once and hand out the same result,
/// failure included, on every later call.
pub trait DataSet: Send + Sync {
    /// The validated keyspace.
    fn keyspace(&self) -> Result<&KeyspaceModel, ParseError>;

    /// The keyspace's column families.
    fn column_families(&self) -> Result<&[ColumnFamilyModel], ParseError> {
        Ok(&self.keyspace()?.column_families)
    }
}

/// Where a [`ParsedDataSet`] reads its document from.
#[derive(Debug, Clone)]
pub enum DataSetSource {
    /// An already deserialized document
    Parsed(ParsedKeyspace),
    /// JSON text
    Json(String),
    /// YAML text
    Yaml(String),
    /// A `.json`, `.yaml` or `.yml` file
    File(PathBuf),
}

impl DataSetSource {
    /// Read the source into its intermediate representation.
    pub fn read(&self) -> Result<ParsedKeyspace, ParseError> {
        match self {
            Self::Parsed(parsed) => Ok(parsed.clone()),
            Self::Json(text) => parse_json(text),
            Self::Yaml(text) => parse_yaml(text),
            Self::File(path) => read_file(path),
        }
    }
}

fn parse_json(text: &str) -> Result<ParsedKeyspace, ParseError> {
    if text.trim().is_empty() {
        return Err(ParseError::EmptyDataSet);
    }
    let invalid = |e: serde_json::Error| ParseError::Document(format!("invalid JSON dataset: {e}"));

    let mut document: serde_json::Value = serde_json::from_str(text).map_err(invalid)?;
    stringify_scalars(&mut document);
    serde_json::from_value::<Option<ParsedKeyspace>>(document)
        .map_err(invalid)?
        .ok_or(ParseError::EmptyDataSet)
}

fn parse_yaml(text: &str) -> Result<ParsedKeyspace, ParseError> {
    if text.trim().is_empty() {
        return Err(ParseError::EmptyDataSet);
    }
    serde_yaml::from_str::<Option<ParsedKeyspace>>(text)
        .map_err(|e| ParseError::Document(format!("invalid YAML dataset: {e}")))?
        .ok_or(ParseError::EmptyDataSet)
}

fn read_file(path: &Path) -> Result<ParsedKeyspace, ParseError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let text = std::fs::read_to_string(path).map_err(|e| {
        ParseError::Document(format!("cannot read dataset {}: {e}", path.display()))
    })?;
    debug!("read {} bytes from {}", text.len(), path.display());

    match extension.as_deref() {
        Some("json") => parse_json(&text),
        Some("yaml") | Some("yml") => parse_yaml(&text),
        _ => Err(ParseError::Document(format!(
            "unsupported dataset file extension: {}",
            path.display()
        ))),
    }
}

/// A dataset backed by a document, mapped lazily on first access.
///
/// # Example
///
/// ```rust
/// use dataset::{DataSet, ParsedDataSet};
///
/// let dataset = ParsedDataSet::from_yaml("name: ks1\ncolumnFamilies:\n  - name: cf\n");
/// assert_eq!(dataset.keyspace().unwrap().name, "ks1");
/// assert_eq!(dataset.column_families().unwrap()[0].name, "cf");
/// ```
pub struct ParsedDataSet {
    source: DataSetSource,
    seed: u64,
    mapped: OnceLock<Result<KeyspaceModel, ParseError>>,
}

impl ParsedDataSet {
    pub fn new(source: DataSetSource) -> Self {
        Self {
            source,
            seed: 0,
            mapped: OnceLock::new(),
        }
    }

    pub fn from_parsed(parsed: ParsedKeyspace) -> Self {
        Self::new(DataSetSource::Parsed(parsed))
    }

    pub fn from_json(text: impl Into<String>) -> Self {
        Self::new(DataSetSource::Json(text.into()))
    }

    pub fn from_yaml(text: impl Into<String>) -> Self {
        Self::new(DataSetSource::Yaml(text.into()))
    }

    /// A dataset read from disk; the format follows the file extension.
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self::new(DataSetSource::File(path.into()))
    }

    /// Seed for generator expressions (`randomBytes`, `uuid()`, ...).
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    fn map(&self) -> Result<KeyspaceModel, ParseError> {
        let parsed = self.source.read()?;
        let keyspace = DataSetMapper::new(self.seed).map_keyspace(&parsed)?;
        info!(
            "Mapped dataset for keyspace '{}' ({} column families)",
            keyspace.name,
            keyspace.column_families.len()
        );
        Ok(keyspace)
    }
}

impl DataSet for ParsedDataSet {
    fn keyspace(&self) -> Result<&KeyspaceModel, ParseError> {
        self.mapped
            .get_or_init(|| self.map())
            .as_ref()
            .map_err(Clone::clone)
    }
}
