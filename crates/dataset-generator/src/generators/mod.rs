//! Individual value generators.
//!
//! Each generator produces a value of the requested target type, or explains
//! why it cannot.

pub mod bytes;
pub mod clock;
pub mod sequence;
pub mod uuid;

/// Names of the value generators, lower-cased.
pub const GENERATOR_NAMES: [&str; 5] = ["randombytes", "sequence", "uuid", "timeuuid", "now"];
