//! Stateful generator that evaluates expressions during one mapping run.

use crate::expression::GeneratorExpression;
use crate::generators::{bytes, clock, sequence, uuid};
use chrono::Utc;
use dataset_core::{GenericValue, ParseError, ValueType};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;

/// Evaluates generator expressions.
///
/// The generator uses a seeded random number generator so that blobs and
/// random UUIDs are reproducible across runs with the same seed. Sequences
/// are counted per distinct expression.
pub struct ValueGenerator {
    /// Seeded random number generator for reproducibility
    rng: StdRng,
    /// Number of values drawn so far, per canonical sequence expression
    sequences: HashMap<String, i64>,
    /// Last 100ns tick handed to a time UUID
    last_uuid_tick: u64,
}

impl ValueGenerator {
    /// Create a new generator with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            sequences: HashMap::new(),
            last_uuid_tick: 0,
        }
    }

    /// Evaluate a value generator expression as a value of `target`.
    pub fn generate(
        &mut self,
        expression: &GeneratorExpression,
        target: ValueType,
    ) -> Result<GenericValue, ParseError> {
        let args = expression.args();
        let fail = |reason: String| {
            ParseError::invalid_generator(expression.canonical(), reason)
        };

        match expression.name.to_ascii_lowercase().as_str() {
            "randombytes" => {
                let [len] = args.as_slice() else {
                    return Err(fail(format!("expected 1 argument, got {}", args.len())));
                };
                let len = len
                    .parse::<usize>()
                    .map_err(|e| fail(format!("invalid length '{len}': {e}")))?;
                bytes::generate_random_bytes(&mut self.rng, len, target).map_err(fail)
            }
            "sequence" => {
                let (start, step) = sequence::parse_sequence_args(&args).map_err(fail)?;
                let drawn = self.sequences.entry(expression.canonical()).or_insert(0);
                let value = step
                    .checked_mul(*drawn)
                    .and_then(|offset| start.checked_add(offset))
                    .ok_or_else(|| fail("sequence overflow".to_string()))?;
                *drawn += 1;
                sequence::sequence_value(value, target).map_err(fail)
            }
            "uuid" if args.is_empty() => uuid::generate_uuid_v4(&mut self.rng, target).map_err(fail),
            "timeuuid" if args.is_empty() => {
                let tick = self.next_uuid_tick();
                uuid::generate_time_uuid(&mut self.rng, tick, target).map_err(fail)
            }
            "now" if args.is_empty() => clock::now_value(Utc::now(), target).map_err(fail),
            "uuid" | "timeuuid" | "now" => Err(fail("expected no arguments".to_string())),
            _ => Err(fail("unknown generator".to_string())),
        }
    }

    /// Current time in 100ns ticks, strictly increasing across calls.
    fn next_uuid_tick(&mut self) -> u64 {
        let now = Utc::now();
        let ticks = u64::try_from(now.timestamp_micros())
            .unwrap_or_default()
            .saturating_mul(10);
        self.last_uuid_tick = ticks.max(self.last_uuid_tick + 1);
        self.last_uuid_tick
    }
}

impl Default for ValueGenerator {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expr(text: &str) -> GeneratorExpression {
        GeneratorExpression::parse(text).unwrap()
    }

    #[test]
    fn test_sequence_increments_per_expression() {
        let mut generator = ValueGenerator::new(0);
        let a = expr("sequence(10)");
        let b = expr("sequence(100, 10)");

        assert_eq!(generator.generate(&a, ValueType::Long), Ok(GenericValue::Long(10)));
        assert_eq!(generator.generate(&a, ValueType::Long), Ok(GenericValue::Long(11)));
        assert_eq!(generator.generate(&b, ValueType::Long), Ok(GenericValue::Long(100)));
        assert_eq!(generator.generate(&b, ValueType::Long), Ok(GenericValue::Long(110)));
        assert_eq!(generator.generate(&a, ValueType::Long), Ok(GenericValue::Long(12)));
    }

    #[test]
    fn test_same_seed_same_values() {
        let mut g1 = ValueGenerator::new(42);
        let mut g2 = ValueGenerator::new(42);
        let blob = expr("randomBytes(12)");
        let id = expr("uuid()");
        assert_eq!(
            g1.generate(&blob, ValueType::Bytes),
            g2.generate(&blob, ValueType::Bytes)
        );
        assert_eq!(g1.generate(&id, ValueType::Uuid), g2.generate(&id, ValueType::Uuid));
    }

    #[test]
    fn test_time_uuids_are_distinct() {
        let mut generator = ValueGenerator::new(0);
        let e = expr("timeuuid()");
        let first = generator.generate(&e, ValueType::TimeUuid).unwrap();
        let second = generator.generate(&e, ValueType::TimeUuid).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_bad_expressions() {
        let mut generator = ValueGenerator::new(0);
        for text in ["randomBytes()", "randomBytes(x)", "frobnicate(1)", "now(1)", "sequence(a)"] {
            assert!(
                matches!(
                    generator.generate(&expr(text), ValueType::Bytes),
                    Err(ParseError::InvalidGenerator { .. })
                ),
                "{text}"
            );
        }
    }
}
