//! Type tags for dataset values.
//!
//! This module defines `ValueType`, the closed set of marshal types a dataset
//! value can carry, and `TypeDescriptor`, which adds the composite components
//! and the reversed qualifier that a comparator or key type may declare.
//!
//! # Accepted spellings
//!
//! ```text
//! UTF8Type
//! org.apache.cassandra.db.marshal.LongType
//! LongType(reversed=true)
//! CompositeType(LongType,UTF8Type(reversed=true))
//! ```

use crate::error::ParseError;
use std::fmt;

/// Package prefix of the server-side marshal classes.
pub const MARSHAL_PACKAGE: &str = "org.apache.cassandra.db.marshal.";

/// Qualifier appended to a type to reverse its ordering.
pub const REVERSED_QUALIFIER: &str = "(reversed=true)";

/// The closed set of supported value types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// US-ASCII string
    Ascii,
    /// Raw byte blob
    Bytes,
    /// Arbitrary precision integer (stored as 64-bit, varint encoded)
    Integer,
    /// 32-bit signed integer
    Int32,
    /// 64-bit signed integer
    Long,
    /// Boolean
    Boolean,
    /// 64-bit IEEE 754 floating point
    Double,
    /// 32-bit IEEE 754 floating point
    Float,
    /// Milliseconds since the Unix epoch
    Date,
    /// UTF-8 string
    Utf8,
    /// Any UUID
    Uuid,
    /// Version 1 (time based) UUID
    TimeUuid,
    /// UUID ordered by its bytes
    LexicalUuid,
    /// Ordered sequence of component values
    Composite,
    /// Server-side incremented 64-bit counter
    Counter,
}

impl ValueType {
    /// Every supported type, in declaration order.
    pub const ALL: [ValueType; 15] = [
        ValueType::Ascii,
        ValueType::Bytes,
        ValueType::Integer,
        ValueType::Int32,
        ValueType::Long,
        ValueType::Boolean,
        ValueType::Double,
        ValueType::Float,
        ValueType::Date,
        ValueType::Utf8,
        ValueType::Uuid,
        ValueType::TimeUuid,
        ValueType::LexicalUuid,
        ValueType::Composite,
        ValueType::Counter,
    ];

    /// Short marshal class name, e.g. `UTF8Type`.
    pub fn class_name(self) -> &'static str {
        match self {
            Self::Ascii => "AsciiType",
            Self::Bytes => "BytesType",
            Self::Integer => "IntegerType",
            Self::Int32 => "Int32Type",
            Self::Long => "LongType",
            Self::Boolean => "BooleanType",
            Self::Double => "DoubleType",
            Self::Float => "FloatType",
            Self::Date => "DateType",
            Self::Utf8 => "UTF8Type",
            Self::Uuid => "UUIDType",
            Self::TimeUuid => "TimeUUIDType",
            Self::LexicalUuid => "LexicalUUIDType",
            Self::Composite => "CompositeType",
            Self::Counter => "CounterColumnType",
        }
    }

    /// Fully qualified marshal class name.
    pub fn qualified_class_name(self) -> String {
        format!("{MARSHAL_PACKAGE}{}", self.class_name())
    }

    /// Name of the type-cast function that forces a value to this type.
    ///
    /// Composite and counter values cannot be forced.
    pub fn function_name(self) -> Option<&'static str> {
        match self {
            Self::Ascii => Some("ascii"),
            Self::Bytes => Some("bytes"),
            Self::Integer => Some("integer"),
            Self::Int32 => Some("int32"),
            Self::Long => Some("long"),
            Self::Boolean => Some("boolean"),
            Self::Double => Some("double"),
            Self::Float => Some("float"),
            Self::Date => Some("date"),
            Self::Utf8 => Some("utf8"),
            Self::Uuid => Some("uuid"),
            Self::TimeUuid => Some("timeuuid"),
            Self::LexicalUuid => Some("lexicaluuid"),
            Self::Composite | Self::Counter => None,
        }
    }

    /// Look up a type by its type-cast function name (case-insensitive).
    pub fn from_function_name(name: &str) -> Option<ValueType> {
        Self::ALL
            .into_iter()
            .find(|t| t.function_name().is_some_and(|f| f.eq_ignore_ascii_case(name)))
    }

    /// Whether values of this type are integral numbers.
    pub fn is_integral(self) -> bool {
        matches!(
            self,
            Self::Integer | Self::Int32 | Self::Long | Self::Counter | Self::Date
        )
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name())
    }
}

/// Resolve a marshal class name to its type tag.
///
/// The name may be the short class name, the fully qualified one, or any
/// string ending in a known class name. Matching ignores case; when several
/// class names are suffixes of the input (`UUIDType` and `TimeUUIDType`) the
/// longest one wins.
pub fn type_from_name(name: &str) -> Result<ValueType, ParseError> {
    let lowered = name.trim().to_ascii_lowercase();
    if lowered.is_empty() {
        return Err(ParseError::UnknownType(name.to_string()));
    }

    ValueType::ALL
        .into_iter()
        .filter(|t| lowered.ends_with(&t.class_name().to_ascii_lowercase()))
        .max_by_key(|t| t.class_name().len())
        .ok_or_else(|| ParseError::UnknownType(name.to_string()))
}

/// Parse a composite alias such as `(LongType,UTF8Type)` into its components.
///
/// Components may carry their own reversed qualifier. Nested composites are
/// rejected.
pub fn extract_alias_components(alias: &str) -> Result<Vec<ValueType>, ParseError> {
    let trimmed = alias.trim();
    let inner = trimmed
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| ParseError::invalid_alias(alias, "expected '(' ... ')'"))?;

    let mut components = Vec::new();
    for piece in split_top_level(inner, alias)? {
        let piece = piece.trim();
        if piece.is_empty() {
            return Err(ParseError::invalid_alias(alias, "empty component type"));
        }
        let (head, qualifier) = split_qualifier(piece);
        if let Some(qualifier) = qualifier {
            if !is_reversed_qualifier(qualifier) {
                return Err(ParseError::invalid_alias(
                    alias,
                    format!("unexpected qualifier '{qualifier}'"),
                ));
            }
        }
        let component = type_from_name(head)?;
        if component == ValueType::Composite {
            return Err(ParseError::invalid_alias(alias, "nested composite types"));
        }
        components.push(component);
    }
    Ok(components)
}

/// Split on commas that are not nested inside parentheses.
fn split_top_level<'a>(inner: &'a str, alias: &str) -> Result<Vec<&'a str>, ParseError> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, ch) in inner.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| ParseError::invalid_alias(alias, "unbalanced parentheses"))?;
            }
            ',' if depth == 0 => {
                pieces.push(&inner[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(ParseError::invalid_alias(alias, "unbalanced parentheses"));
    }
    pieces.push(&inner[start..]);
    Ok(pieces)
}

/// Split `LongType(reversed=true)` into `LongType` and `(reversed=true)`.
fn split_qualifier(text: &str) -> (&str, Option<&str>) {
    match text.find('(') {
        Some(idx) => (&text[..idx], Some(&text[idx..])),
        None => (text, None),
    }
}

fn is_reversed_qualifier(qualifier: &str) -> bool {
    let compact: String = qualifier
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    compact.eq_ignore_ascii_case(REVERSED_QUALIFIER)
}

/// A resolved key, comparator or value type declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    /// The base type tag
    pub base: ValueType,

    /// Component types, non-empty only for composites
    pub components: Vec<ValueType>,

    /// The declaration text following the base type name.
    ///
    /// Kept only for composite or reversed declarations, empty otherwise.
    pub alias: String,
}

impl TypeDescriptor {
    /// A plain declaration with no alias.
    pub fn simple(base: ValueType) -> Self {
        Self {
            base,
            components: Vec::new(),
            alias: String::new(),
        }
    }

    /// Parse a type declaration.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let text = text.trim();
        let (head, qualifier) = split_qualifier(text);
        let base = type_from_name(head)?;

        match (base, qualifier) {
            (ValueType::Composite, Some(alias)) => Ok(Self {
                base,
                components: extract_alias_components(alias)?,
                    alias: alias.to_string(),
            }),
            (ValueType::Composite, None) => Err(ParseError::invalid_alias(
                text,
                "composite type requires component types",
            )),
            (_, Some(qualifier)) if is_reversed_qualifier(qualifier) => Ok(Self {
                base,
                components: Vec::new(),
                alias: qualifier.to_string(),
            }),
            (_, Some(qualifier)) => Err(ParseError::invalid_alias(
                text,
                format!("unexpected qualifier '{qualifier}'"),
            )),
            (_, None) => Ok(Self::simple(base)),
        }
    }

    /// Whether this is a composite declaration.
    pub fn is_composite(&self) -> bool {
        self.base == ValueType::Composite
    }

    /// Class name followed by the alias, e.g. `CompositeType(LongType,UTF8Type)`.
    pub fn declaration(&self) -> String {
        format!("{}{}", self.base.class_name(), self.alias)
    }
}

impl From<ValueType> for TypeDescriptor {
    fn from(base: ValueType) -> Self {
        Self::simple(base)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.declaration())
    }
}
