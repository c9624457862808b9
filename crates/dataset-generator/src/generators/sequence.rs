//! Incrementing sequence generator.

use dataset_core::{GenericValue, ValueType};

/// Convert the `n`-th sequence value to `target`.
pub fn sequence_value(value: i64, target: ValueType) -> Result<GenericValue, String> {
    match target {
        ValueType::Long => Ok(GenericValue::Long(value)),
        ValueType::Integer => Ok(GenericValue::Integer(value)),
        ValueType::Counter => Ok(GenericValue::Counter(value)),
        ValueType::Date => Ok(GenericValue::Date(value)),
        ValueType::Int32 => i32::try_from(value)
            .map(GenericValue::Int32)
            .map_err(|_| format!("{value} does not fit in {target}")),
        ValueType::Double => Ok(GenericValue::Double(value as f64)),
        ValueType::Float => Ok(GenericValue::Float(value as f32)),
        ValueType::Utf8 => Ok(GenericValue::Utf8(value.to_string())),
        ValueType::Ascii => Ok(GenericValue::Ascii(value.to_string())),
        other => Err(format!("cannot produce {other}")),
    }
}

/// Parse the `start[, step]` arguments of a sequence.
pub fn parse_sequence_args(args: &[&str]) -> Result<(i64, i64), String> {
    let parse = |arg: &str| {
        arg.parse::<i64>()
            .map_err(|e| format!("invalid sequence argument '{arg}': {e}"))
    };
    match args {
        [] => Ok((0, 1)),
        [start] => Ok((parse(start)?, 1)),
        [start, step] => Ok((parse(start)?, parse(step)?)),
        _ => Err(format!("expected at most 2 arguments, got {}", args.len())),
    }
}
