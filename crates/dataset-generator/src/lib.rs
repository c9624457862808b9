//! Generator expressions and type extraction for dataset values.
//!
//! Column values in a dataset document may be literals (`12`, `0aff`) or
//! function calls. This crate recognises the function-call syntax and
//! evaluates it through a [`ValueGenerator`] that is seeded, so the same
//! document always maps to the same values.
//!
//! # Example
//!
//! ```rust
//! use dataset_core::{GenericValue, ValueType};
//! use dataset_generator::TypeExtractor;
//!
//! let mut extractor = TypeExtractor::new(42);
//! assert_eq!(
//!     extractor.extract("sequence(1)", ValueType::Long).unwrap(),
//!     GenericValue::Long(1)
//! );
//! assert_eq!(
//!     extractor.extract("sequence(1)", ValueType::Long).unwrap(),
//!     GenericValue::Long(2)
//! );
//! ```
//!
//! # Generators
//!
//! - `randomBytes(n)` - `n` random bytes (hex text for text targets)
//! - `sequence(start[, step])` - incrementing numbers
//! - `uuid()` - random version 4 UUID
//! - `timeuuid()` - version 1 UUID for the current time
//! - `now()` - current time in milliseconds
//!
//! Casts (`utf8(x)`, `long(x)`, `bytes(x)`, ...) force the literal type.

pub mod expression;
pub mod extractor;
pub mod generator;
pub mod generators;

// Re-exports for convenience
pub use expression::{contains_generator_syntax, GeneratorExpression};
pub use extractor::TypeExtractor;
pub use generator::ValueGenerator;
