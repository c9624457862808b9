//! Typed dataset values and their canonical byte encoding.
//!
//! `GenericValue` has one variant per [`ValueType`]. Each variant carries its
//! native representation and knows how to read itself from the textual form
//! used in dataset documents and how to encode itself to, and decode itself
//! from, the bytes the cluster stores.

use crate::error::ParseError;
use crate::types::{TypeDescriptor, ValueType};
use chrono::DateTime;
use std::fmt;
use uuid::Uuid;

/// Separator between components of a composite literal.
pub const COMPOSITE_SEPARATOR: char = ':';

/// Terminator byte written after each composite component.
const END_OF_COMPONENT: u8 = 0;

/// A single typed scalar.
#[derive(Debug, Clone, PartialEq)]
pub enum GenericValue {
    Ascii(String),
    Bytes(Vec<u8>),
    Integer(i64),
    Int32(i32),
    Long(i64),
    Boolean(bool),
    Double(f64),
    Float(f32),
    /// Milliseconds since the Unix epoch
    Date(i64),
    Utf8(String),
    Uuid(Uuid),
    TimeUuid(Uuid),
    LexicalUuid(Uuid),
    Composite(Vec<GenericValue>),
    Counter(i64),
}

impl GenericValue {
    /// The type tag of this value.
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Ascii(_) => ValueType::Ascii,
            Self::Bytes(_) => ValueType::Bytes,
            Self::Integer(_) => ValueType::Integer,
            Self::Int32(_) => ValueType::Int32,
            Self::Long(_) => ValueType::Long,
            Self::Boolean(_) => ValueType::Boolean,
            Self::Double(_) => ValueType::Double,
            Self::Float(_) => ValueType::Float,
            Self::Date(_) => ValueType::Date,
            Self::Utf8(_) => ValueType::Utf8,
            Self::Uuid(_) => ValueType::Uuid,
            Self::TimeUuid(_) => ValueType::TimeUuid,
            Self::LexicalUuid(_) => ValueType::LexicalUuid,
            Self::Composite(_) => ValueType::Composite,
            Self::Counter(_) => ValueType::Counter,
        }
    }

    /// Read a literal under a full type declaration.
    ///
    /// Composite declarations split the text into components, every other
    /// declaration is read with [`GenericValue::parse_literal`].
    pub fn parse(text: &str, descriptor: &TypeDescriptor) -> Result<Self, ParseError> {
        if descriptor.is_composite() {
            Self::compose_composite(text, &descriptor.components)
        } else {
            Self::parse_literal(text, descriptor.base)
        }
    }

    /// Read a literal of a scalar type.
    pub fn parse_literal(text: &str, value_type: ValueType) -> Result<Self, ParseError> {
        let invalid = |reason: &dyn fmt::Display| {
            ParseError::invalid_literal(text, value_type.class_name(), reason)
        };

        let value = match value_type {
            ValueType::Ascii => {
                if !text.is_ascii() {
                    return Err(invalid(&"non-ASCII characters"));
                }
                Self::Ascii(text.to_string())
            }
            ValueType::Utf8 => Self::Utf8(text.to_string()),
            ValueType::Bytes => {
                let digits = text
                    .strip_prefix("0x")
                    .or_else(|| text.strip_prefix("0X"))
                    .unwrap_or(text);
                Self::Bytes(hex::decode(digits).map_err(|e| invalid(&e))?)
            }
            ValueType::Integer => Self::Integer(text.trim().parse().map_err(|e| invalid(&e))?),
            ValueType::Int32 => Self::Int32(text.trim().parse().map_err(|e| invalid(&e))?),
            ValueType::Long => Self::Long(text.trim().parse().map_err(|e| invalid(&e))?),
            ValueType::Counter => Self::Counter(text.trim().parse().map_err(|e| invalid(&e))?),
            ValueType::Boolean => match text.trim() {
                t if t.eq_ignore_ascii_case("true") => Self::Boolean(true),
                t if t.eq_ignore_ascii_case("false") => Self::Boolean(false),
                _ => return Err(invalid(&"expected true or false")),
            },
            ValueType::Double => Self::Double(text.trim().parse().map_err(|e| invalid(&e))?),
            ValueType::Float => Self::Float(text.trim().parse().map_err(|e| invalid(&e))?),
            ValueType::Date => {
                let trimmed = text.trim();
                match trimmed.parse::<i64>() {
                    Ok(millis) => Self::Date(millis),
                    Err(_) => Self::Date(
                        DateTime::parse_from_rfc3339(trimmed)
                            .map_err(|e| invalid(&e))?
                            .timestamp_millis(),
                    ),
                }
            }
            ValueType::Uuid => Self::Uuid(Uuid::parse_str(text.trim()).map_err(|e| invalid(&e))?),
            ValueType::LexicalUuid => {
                Self::LexicalUuid(Uuid::parse_str(text.trim()).map_err(|e| invalid(&e))?)
            }
            ValueType::TimeUuid => {
                let uuid = Uuid::parse_str(text.trim()).map_err(|e| invalid(&e))?;
                if uuid.get_version_num() != 1 {
                    return Err(invalid(&"not a version 1 UUID"));
                }
                Self::TimeUuid(uuid)
            }
            ValueType::Composite => {
                return Err(invalid(&"composite type requires component types"));
            }
        };
        Ok(value)
    }

    /// Build a composite value from `a:b:c` text, one literal per component type.
    pub fn compose_composite(text: &str, components: &[ValueType]) -> Result<Self, ParseError> {
        if components.is_empty() {
            return Err(ParseError::invalid_literal(
                text,
                ValueType::Composite.class_name(),
                "composite type requires component types",
            ));
        }

        let parts: Vec<&str> = text.split(COMPOSITE_SEPARATOR).collect();
        if parts.len() != components.len() {
            return Err(ParseError::CompositeArity {
                value: text.to_string(),
                expected: components.len(),
                actual: parts.len(),
            });
        }

        let values = parts
            .into_iter()
            .zip(components)
            .map(|(part, component)| {
                let value = Self::parse_literal(part, *component)?;
                if value.to_bytes().len() > usize::from(u16::MAX) {
                    return Err(ParseError::invalid_literal(
                        part,
                        component.class_name(),
                        "component longer than 65535 bytes",
                    ));
                }
                Ok(value)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::Composite(values))
    }

    /// Canonical byte encoding.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::Ascii(s) | Self::Utf8(s) => s.as_bytes().to_vec(),
            Self::Bytes(b) => b.clone(),
            Self::Integer(i) => encode_varint(*i),
            Self::Int32(i) => i.to_be_bytes().to_vec(),
            Self::Long(i) | Self::Counter(i) | Self::Date(i) => i.to_be_bytes().to_vec(),
            Self::Boolean(b) => vec![u8::from(*b)],
            Self::Double(d) => d.to_be_bytes().to_vec(),
            Self::Float(f) => f.to_be_bytes().to_vec(),
            Self::Uuid(u) | Self::TimeUuid(u) | Self::LexicalUuid(u) => u.as_bytes().to_vec(),
            Self::Composite(components) => {
                let mut out = Vec::new();
                for component in components {
                    let bytes = component.to_bytes();
                    // Parsing bounds components to u16; a hand-built composite must too.
                    debug_assert!(
                        bytes.len() <= usize::from(u16::MAX),
                        "composite component of {} bytes does not fit a u16 length",
                        bytes.len()
                    );
                    out.extend_from_slice(&(bytes.len() as u16).to_be_bytes());
                    out.extend_from_slice(&bytes);
                    out.push(END_OF_COMPONENT);
                }
                out
            }
        }
    }

    /// Decode canonical bytes under a full type declaration.
    pub fn decode(descriptor: &TypeDescriptor, bytes: &[u8]) -> Result<Self, ParseError> {
        if descriptor.is_composite() {
            decode_composite(&descriptor.components, bytes)
        } else {
            Self::decode_scalar(descriptor.base, bytes)
        }
    }

    /// Decode canonical bytes of a scalar type.
    pub fn decode_scalar(value_type: ValueType, bytes: &[u8]) -> Result<Self, ParseError> {
        let invalid = |reason: &dyn fmt::Display| {
            ParseError::invalid_literal(hex::encode(bytes), value_type.class_name(), reason)
        };
        let wrong_width = |expected: usize| invalid(&format!("expected {expected} bytes"));

        let value = match value_type {
            ValueType::Ascii => {
                let s = String::from_utf8(bytes.to_vec()).map_err(|e| invalid(&e))?;
                if !s.is_ascii() {
                    return Err(invalid(&"non-ASCII characters"));
                }
                Self::Ascii(s)
            }
            ValueType::Utf8 => Self::Utf8(String::from_utf8(bytes.to_vec()).map_err(|e| invalid(&e))?),
            ValueType::Bytes => Self::Bytes(bytes.to_vec()),
            ValueType::Integer => Self::Integer(decode_varint(bytes).ok_or_else(|| invalid(&"expected 1 to 8 bytes"))?),
            ValueType::Int32 => Self::Int32(i32::from_be_bytes(
                bytes.try_into().map_err(|_| wrong_width(4))?,
            )),
            ValueType::Long | ValueType::Counter | ValueType::Date => {
                let raw = i64::from_be_bytes(bytes.try_into().map_err(|_| wrong_width(8))?);
                match value_type {
                    ValueType::Long => Self::Long(raw),
                    ValueType::Counter => Self::Counter(raw),
                    _ => Self::Date(raw),
                }
            }
            ValueType::Boolean => match bytes {
                [b] => Self::Boolean(*b != 0),
                _ => return Err(wrong_width(1)),
            },
            ValueType::Double => Self::Double(f64::from_be_bytes(
                bytes.try_into().map_err(|_| wrong_width(8))?,
            )),
            ValueType::Float => Self::Float(f32::from_be_bytes(
                bytes.try_into().map_err(|_| wrong_width(4))?,
            )),
            ValueType::Uuid | ValueType::TimeUuid | ValueType::LexicalUuid => {
                let uuid = Uuid::from_slice(bytes).map_err(|e| invalid(&e))?;
                match value_type {
                    ValueType::Uuid => Self::Uuid(uuid),
                    ValueType::TimeUuid => Self::TimeUuid(uuid),
                    _ => Self::LexicalUuid(uuid),
                }
            }
            ValueType::Composite => {
                return Err(invalid(&"composite type requires component types"));
            }
        };
        Ok(value)
    }

    /// Integral payload, used for counter increments.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) | Self::Long(i) | Self::Counter(i) | Self::Date(i) => Some(*i),
            Self::Int32(i) => Some(i64::from(*i)),
            _ => None,
        }
    }

    /// Text payload of string values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Utf8(s) | Self::Ascii(s) => Some(s),
            _ => None,
        }
    }
}

/// Renders the value in the literal grammar it is parsed from.
impl fmt::Display for GenericValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascii(s) | Self::Utf8(s) => f.write_str(s),
            Self::Bytes(b) => f.write_str(&hex::encode(b)),
            Self::Integer(i) | Self::Long(i) | Self::Counter(i) | Self::Date(i) => write!(f, "{i}"),
            Self::Int32(i) => write!(f, "{i}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Double(d) => write!(f, "{d}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Uuid(u) | Self::TimeUuid(u) | Self::LexicalUuid(u) => write!(f, "{u}"),
            Self::Composite(components) => {
                for (idx, component) in components.iter().enumerate() {
                    if idx > 0 {
                        write!(f, "{COMPOSITE_SEPARATOR}")?;
                    }
                    write!(f, "{component}")?;
                }
                Ok(())
            }
        }
    }
}

/// Minimal big-endian two's complement encoding.
fn encode_varint(value: i64) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    let mut start = 0;
    while start < bytes.len() - 1 {
        let redundant = (bytes[start] == 0x00 && bytes[start + 1] & 0x80 == 0)
            || (bytes[start] == 0xff && bytes[start + 1] & 0x80 != 0);
        if !redundant {
            break;
        }
        start += 1;
    }
    bytes[start..].to_vec()
}

fn decode_varint(bytes: &[u8]) -> Option<i64> {
    if bytes.is_empty() || bytes.len() > 8 {
        return None;
    }
    let fill = if bytes[0] & 0x80 != 0 { 0xff } else { 0x00 };
    let mut buf = [fill; 8];
    buf[8 - bytes.len()..].copy_from_slice(bytes);
    Some(i64::from_be_bytes(buf))
}

fn decode_composite(components: &[ValueType], bytes: &[u8]) -> Result<GenericValue, ParseError> {
    let invalid = |reason: &str| {
        ParseError::invalid_literal(hex::encode(bytes), ValueType::Composite.class_name(), reason)
    };

    let mut values = Vec::with_capacity(components.len());
    let mut rest = bytes;
    while !rest.is_empty() {
        let component = components
            .get(values.len())
            .ok_or_else(|| invalid("more components than declared"))?;
        let [hi, lo, tail @ ..] = rest else {
            return Err(invalid("truncated component length"));
        };
        let len = usize::from(u16::from_be_bytes([*hi, *lo]));
        if tail.len() < len + 1 {
            return Err(invalid("truncated component"));
        }
        values.push(GenericValue::decode_scalar(*component, &tail[..len])?);
        rest = &tail[len + 1..];
    }

    if values.len() != components.len() {
        return Err(ParseError::CompositeArity {
            value: hex::encode(bytes),
            expected: components.len(),
            actual: values.len(),
        });
    }
    Ok(GenericValue::Composite(values))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_values() -> Vec<GenericValue> {
        vec![
            GenericValue::Ascii("ascii".to_string()),
            GenericValue::Bytes(vec![0xde, 0xad, 0xbe, 0xef]),
            GenericValue::Integer(-129),
            GenericValue::Int32(42),
            GenericValue::Long(i64::MIN),
            GenericValue::Boolean(true),
            GenericValue::Double(3.25),
            GenericValue::Float(-1.5),
            GenericValue::Date(1_700_000_000_000),
            GenericValue::Utf8("héllo".to_string()),
            GenericValue::Uuid(Uuid::parse_str("6ba7b810-9dad-41d1-80b4-00c04fd430c8").unwrap()),
            GenericValue::TimeUuid(
                Uuid::parse_str("13814000-1dd2-11b2-8080-808080808080").unwrap(),
            ),
            GenericValue::LexicalUuid(
                Uuid::parse_str("00000000-0000-0000-0000-000000000001").unwrap(),
            ),
            GenericValue::Counter(7),
        ]
    }

    #[test]
    fn test_scalar_bytes_round_trip() {
        for value in sample_values() {
            let decoded = GenericValue::decode_scalar(value.value_type(), &value.to_bytes()).unwrap();
            assert_eq!(decoded, value);
        }
    }

    #[test]
    fn test_composite_bytes_round_trip() {
        let descriptor = TypeDescriptor::parse("CompositeType(LongType,UTF8Type)").unwrap();
        let value = GenericValue::parse("12:abc", &descriptor).unwrap();
        assert_eq!(
            value,
            GenericValue::Composite(vec![
                GenericValue::Long(12),
                GenericValue::Utf8("abc".to_string())
            ])
        );

        let bytes = value.to_bytes();
        assert_eq!(bytes.len(), (2 + 8 + 1) + (2 + 3 + 1));
        assert_eq!(GenericValue::decode(&descriptor, &bytes).unwrap(), value);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "does not fit a u16 length")]
    fn test_oversized_composite_component_is_rejected() {
        let oversized = GenericValue::Composite(vec![GenericValue::Bytes(vec![0; 70_000])]);
        oversized.to_bytes();
    }

    #[test]
    fn test_varint_is_minimal() {
        assert_eq!(encode_varint(0), vec![0x00]);
        assert_eq!(encode_varint(127), vec![0x7f]);
        assert_eq!(encode_varint(128), vec![0x00, 0x80]);
        assert_eq!(encode_varint(-1), vec![0xff]);
        assert_eq!(encode_varint(-129), vec![0xff, 0x7f]);
    }

    #[test]
    fn test_parse_hex_bytes() {
        assert_eq!(
            GenericValue::parse_literal("0x0aff", ValueType::Bytes).unwrap(),
            GenericValue::Bytes(vec![0x0a, 0xff])
        );
        let err = GenericValue::parse_literal("ZZ", ValueType::Bytes).unwrap_err();
        assert!(matches!(err, ParseError::InvalidLiteral { .. }));
    }

    #[test]
    fn test_parse_literal_rejects_mismatches() {
        assert!(GenericValue::parse_literal("abc", ValueType::Long).is_err());
        assert!(GenericValue::parse_literal("3000000000", ValueType::Int32).is_err());
        assert!(GenericValue::parse_literal("yes", ValueType::Boolean).is_err());
        assert!(GenericValue::parse_literal("héllo", ValueType::Ascii).is_err());
        assert!(GenericValue::parse_literal("not-a-uuid", ValueType::Uuid).is_err());
        // version 4, not time based
        assert!(GenericValue::parse_literal(
            "6ba7b810-9dad-41d1-80b4-00c04fd430c8",
            ValueType::TimeUuid
        )
        .is_err());
    }

    #[test]
    fn test_parse_date_forms() {
        assert_eq!(
            GenericValue::parse_literal("1000", ValueType::Date).unwrap(),
            GenericValue::Date(1000)
        );
        assert_eq!(
            GenericValue::parse_literal("1970-01-01T00:00:01Z", ValueType::Date).unwrap(),
            GenericValue::Date(1000)
        );
    }

    #[test]
    fn test_composite_arity() {
        let components = [ValueType::Long, ValueType::Utf8, ValueType::Int32];
        assert!(GenericValue::compose_composite("1:a:2", &components).is_ok());
        assert!(matches!(
            GenericValue::compose_composite("1:a", &components),
            Err(ParseError::CompositeArity {
                expected: 3,
                actual: 2,
                ..
            })
        ));
        assert!(matches!(
            GenericValue::compose_composite("1:a:2:3", &components),
            Err(ParseError::CompositeArity {
                expected: 3,
                actual: 4,
                ..
            })
        ));
        assert!(matches!(
            GenericValue::compose_composite("x:a:2", &components),
            Err(ParseError::InvalidLiteral { .. })
        ));
    }

    #[test]
    fn test_display_matches_literal_grammar() {
        for value in sample_values() {
            let text = value.to_string();
            assert_eq!(
                GenericValue::parse_literal(&text, value.value_type()).unwrap(),
                value
            );
        }
    }

    #[test]
    fn test_decode_rejects_bad_widths() {
        assert!(GenericValue::decode_scalar(ValueType::Long, &[1, 2, 3]).is_err());
        assert!(GenericValue::decode_scalar(ValueType::Boolean, &[]).is_err());
        assert!(GenericValue::decode_scalar(ValueType::Integer, &[]).is_err());
    }
}
