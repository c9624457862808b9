//! Resolve raw value text into typed values.

use crate::expression::GeneratorExpression;
use crate::generator::ValueGenerator;
use crate::generators::GENERATOR_NAMES;
use dataset_core::{GenericValue, ParseError, TypeDescriptor, ValueType};
use tracing::trace;

/// Turns value text into [`GenericValue`]s, evaluating function calls.
///
/// Two kinds of function call are understood:
///
/// - type casts such as `long(12)` or `bytes(0aff)`, which read their
///   argument as a literal of the named type regardless of the target type;
/// - value generators such as `randomBytes(16)` or `sequence(1)`, which
///   produce a value of the target type.
///
/// Text that is not a function call is read as a literal of the target type.
#[derive(Default)]
pub struct TypeExtractor {
    generator: ValueGenerator,
}

impl TypeExtractor {
    /// Create an extractor whose generators are seeded with `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            generator: ValueGenerator::new(seed),
        }
    }

    /// Resolve `raw` as a value of `target`.
    pub fn extract(&mut self, raw: &str, target: ValueType) -> Result<GenericValue, ParseError> {
        let Some(expression) = GeneratorExpression::parse(raw) else {
            return GenericValue::parse_literal(raw, target);
        };

        if let Some(cast) = cast_type(&expression) {
            trace!("casting '{}' to {}", expression.raw_args, cast);
            return GenericValue::parse_literal(&expression.raw_args, cast);
        }
        self.generator.generate(&expression, target)
    }

    /// Resolve a key or column name, which never contains function calls.
    pub fn construct(&self, raw: &str, descriptor: &TypeDescriptor) -> Result<GenericValue, ParseError> {
        GenericValue::parse(raw, descriptor)
    }
}

/// The type a cast expression forces, if the expression is a cast.
///
/// `uuid()` and `timeuuid()` with no argument are generators, with an
/// argument they are casts.
fn cast_type(expression: &GeneratorExpression) -> Option<ValueType> {
    let cast = ValueType::from_function_name(&expression.name)?;
    let is_generator = GENERATOR_NAMES.contains(&expression.name.to_ascii_lowercase().as_str());
    if is_generator && expression.raw_args.trim().is_empty() {
        None
    } else {
        Some(cast)
    }
}
