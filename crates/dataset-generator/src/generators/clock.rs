//! Current time generator.

use chrono::{DateTime, Utc};
use dataset_core::{GenericValue, ValueType};

/// Render `now` as a value of `target`.
pub fn now_value(now: DateTime<Utc>, target: ValueType) -> Result<GenericValue, String> {
    let millis = now.timestamp_millis();
    match target {
        ValueType::Date => Ok(GenericValue::Date(millis)),
        ValueType::Long => Ok(GenericValue::Long(millis)),
        ValueType::Integer => Ok(GenericValue::Integer(millis)),
        ValueType::Utf8 => Ok(GenericValue::Utf8(now.to_rfc3339())),
        ValueType::Ascii => Ok(GenericValue::Ascii(now.to_rfc3339())),
        other => Err(format!("cannot produce {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_now_value() {
        let now = Utc.timestamp_millis_opt(1_000).unwrap();
        assert_eq!(now_value(now, ValueType::Date), Ok(GenericValue::Date(1_000)));
        assert_eq!(now_value(now, ValueType::Long), Ok(GenericValue::Long(1_000)));
        assert!(now_value(now, ValueType::Boolean).is_err());
    }
}
