//! Error types raised while turning a dataset document into a model.

use thiserror::Error;

/// Errors that can occur while parsing or mapping a dataset.
///
/// Every variant is fatal to the load that produced it. The message names the
/// offending element so a broken fixture can be located quickly.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The document did not contain a keyspace at all.
    #[error("dataSet is empty")]
    EmptyDataSet,

    /// A mandatory field is absent.
    #[error("{0} is mandatory")]
    MissingField(String),

    /// A type name does not match any supported type.
    #[error("unknown type: {0}")]
    UnknownType(String),

    /// The keyspace replication strategy is not recognised.
    #[error("invalid keyspace strategy: {0}")]
    InvalidStrategy(String),

    /// A composite or reversed type alias is malformed.
    #[error("invalid type alias '{alias}': {reason}")]
    InvalidTypeAlias { alias: String, reason: String },

    /// A literal cannot be read under its target type.
    #[error("cannot parse '{value}' as {type_name}: {reason}")]
    InvalidLiteral {
        value: String,
        type_name: String,
        reason: String,
    },

    /// A composite value does not have the declared number of components.
    #[error("composite value '{value}' has {actual} components, expected {expected}")]
    CompositeArity {
        value: String,
        expected: usize,
        actual: usize,
    },

    /// A generator expression was used where a counter value is expected.
    #[error("impossible to override column value '{0}' into a counter column family")]
    CounterOverride(String),

    /// A generator expression is unknown or has bad arguments.
    #[error("invalid generator expression '{expression}': {reason}")]
    InvalidGenerator { expression: String, reason: String },

    /// The dataset tree is structurally inconsistent.
    #[error("{0}")]
    Structure(String),

    /// The document front-end (JSON, YAML, file) failed.
    #[error("failed to read dataset document: {0}")]
    Document(String),

    /// An error raised while mapping a named element of the tree.
    #[error("{element}: {source}")]
    InElement {
        element: String,
        #[source]
        source: Box<ParseError>,
    },
}

impl ParseError {
    /// Build an [`ParseError::InvalidLiteral`].
    pub fn invalid_literal(
        value: impl Into<String>,
        type_name: impl Into<String>,
        reason: impl ToString,
    ) -> Self {
        Self::InvalidLiteral {
            value: value.into(),
            type_name: type_name.into(),
            reason: reason.to_string(),
        }
    }

    /// Build an [`ParseError::InvalidTypeAlias`].
    pub fn invalid_alias(alias: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTypeAlias {
            alias: alias.into(),
            reason: reason.into(),
        }
    }

    /// Build an [`ParseError::InvalidGenerator`].
    pub fn invalid_generator(expression: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidGenerator {
            expression: expression.into(),
            reason: reason.into(),
        }
    }

    /// Wrap the error with the element that was being mapped.
    pub fn context(self, element: impl std::fmt::Display) -> Self {
        Self::InElement {
            element: element.to_string(),
            source: Box::new(self),
        }
    }

    /// The innermost error, with every element context stripped.
    pub fn root(&self) -> &ParseError {
        match self {
            Self::InElement { source, .. } => source.root(),
            other => other,
        }
    }
}
