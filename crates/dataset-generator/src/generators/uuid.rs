//! UUID value generators.

use dataset_core::{GenericValue, ValueType};
use rand::Rng;
use uuid::{Timestamp, Uuid};

/// 100ns intervals between 1582-10-15 and the Unix epoch.
const GREGORIAN_OFFSET: u64 = 0x01B2_1DD2_1381_4000;

/// Generate a random UUID v4 using the provided RNG.
pub fn generate_uuid_v4<R: Rng>(rng: &mut R, target: ValueType) -> Result<GenericValue, String> {
    let mut bytes = [0u8; 16];
    rng.fill(&mut bytes);

    bytes[6] = (bytes[6] & 0x0f) | 0x40; // Version 4
    bytes[8] = (bytes[8] & 0x3f) | 0x80; // Variant RFC 4122

    let uuid = Uuid::from_bytes(bytes);
    match target {
        ValueType::Uuid => Ok(GenericValue::Uuid(uuid)),
        ValueType::LexicalUuid => Ok(GenericValue::LexicalUuid(uuid)),
        ValueType::Utf8 => Ok(GenericValue::Utf8(uuid.to_string())),
        ValueType::Ascii => Ok(GenericValue::Ascii(uuid.to_string())),
        other => Err(format!("cannot produce {other}")),
    }
}

/// Generate a version 1 UUID for the given 100ns tick since the Unix epoch.
///
/// Clock sequence and node come from the RNG.
pub fn generate_time_uuid<R: Rng>(
    rng: &mut R,
    unix_ticks: u64,
    target: ValueType,
) -> Result<GenericValue, String> {
    let clock_seq = rng.random::<u16>() & 0x3fff;
    let node: [u8; 6] = rng.random();

    let timestamp = Timestamp::from_gregorian_time(unix_ticks.wrapping_add(GREGORIAN_OFFSET), clock_seq);
    let uuid = Uuid::new_v1(timestamp, &node);
    match target {
        ValueType::TimeUuid => Ok(GenericValue::TimeUuid(uuid)),
        ValueType::Uuid => Ok(GenericValue::Uuid(uuid)),
        ValueType::Utf8 => Ok(GenericValue::Utf8(uuid.to_string())),
        ValueType::Ascii => Ok(GenericValue::Ascii(uuid.to_string())),
        other => Err(format!("cannot produce {other}")),
    }
}
