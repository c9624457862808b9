//! Random byte blob generator.

use dataset_core::{GenericValue, ValueType};
use rand::Rng;

/// Upper bound on the length of a generated blob.
pub const MAX_RANDOM_BYTES: usize = 65_535;

/// Generate `len` random bytes as a value of `target`.
///
/// Text targets receive the hex rendering of the bytes.
pub fn generate_random_bytes<R: Rng>(
    rng: &mut R,
    len: usize,
    target: ValueType,
) -> Result<GenericValue, String> {
    if len > MAX_RANDOM_BYTES {
        return Err(format!("length {len} exceeds {MAX_RANDOM_BYTES}"));
    }

    let mut bytes = vec![0u8; len];
    rng.fill(bytes.as_mut_slice());

    match target {
        ValueType::Bytes => Ok(GenericValue::Bytes(bytes)),
        ValueType::Utf8 => Ok(GenericValue::Utf8(hex::encode(bytes))),
        ValueType::Ascii => Ok(GenericValue::Ascii(hex::encode(bytes))),
        other => Err(format!("cannot produce {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_fixed_length_blob() {
        let mut rng = StdRng::seed_from_u64(42);
        let value = generate_random_bytes(&mut rng, 16, ValueType::Bytes).unwrap();
        match value {
            GenericValue::Bytes(b) => assert_eq!(b.len(), 16),
            other => panic!("Expected Bytes value, got {other:?}"),
        }
    }

    #[test]
    fn test_text_target_gets_hex() {
        let mut rng = StdRng::seed_from_u64(42);
        let value = generate_random_bytes(&mut rng, 4, ValueType::Utf8).unwrap();
        let text = value.as_str().unwrap();
        assert_eq!(text.len(), 8);
        assert!(text.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_deterministic_for_seed() {
        let mut rng1 = StdRng::seed_from_u64(7);
        let mut rng2 = StdRng::seed_from_u64(7);
        assert_eq!(
            generate_random_bytes(&mut rng1, 8, ValueType::Bytes),
            generate_random_bytes(&mut rng2, 8, ValueType::Bytes)
        );
    }

    #[test]
    fn test_rejects_numeric_target() {
        let mut rng = StdRng::seed_from_u64(42);
        assert!(generate_random_bytes(&mut rng, 4, ValueType::Long).is_err());
    }
}
