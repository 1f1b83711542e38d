use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Converts free-form operator input into a finite number.
///
/// Comma decimal separators are accepted ("0,35" parses as 0.35). Anything
/// unparseable, including the empty string, yields 0.0. Never panics.
pub fn coerce(raw: &str) -> f64 {
    let cleaned = raw.trim().replace(',', ".");
    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// A metric cell exactly as the operator entered it.
///
/// Stored and serialized as text; files written by earlier tooling keep goal
/// cells as JSON numbers, so deserialization accepts strings, numbers, and
/// null (null becomes the empty string).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RawValue(pub String);

impl RawValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The coerced numeric reading of this cell.
    pub fn as_number(&self) -> f64 {
        coerce(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        Self(format!("{value}"))
    }
}

struct RawValueVisitor;

impl<'de> Visitor<'de> for RawValueVisitor {
    type Value = RawValue;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a string, number, or null")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<RawValue, E> {
        Ok(RawValue(value.to_string()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<RawValue, E> {
        Ok(RawValue(value))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<RawValue, E> {
        Ok(RawValue(format!("{value}")))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<RawValue, E> {
        Ok(RawValue(value.to_string()))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<RawValue, E> {
        Ok(RawValue(value.to_string()))
    }

    fn visit_unit<E: de::Error>(self) -> Result<RawValue, E> {
        Ok(RawValue::default())
    }

    fn visit_none<E: de::Error>(self) -> Result<RawValue, E> {
        Ok(RawValue::default())
    }
}

impl<'de> Deserialize<'de> for RawValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RawValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_decimals() {
        assert_eq!(coerce("0.35"), 0.35);
        assert_eq!(coerce("3250"), 3250.0);
    }

    #[test]
    fn accepts_comma_decimal_separator() {
        assert_eq!(coerce("0,7"), 0.7);
        assert_eq!(coerce(" 4,6 "), 4.6);
    }

    #[test]
    fn invalid_input_coerces_to_zero() {
        assert_eq!(coerce(""), 0.0);
        assert_eq!(coerce("abc"), 0.0);
        assert_eq!(coerce("1,2,3"), 0.0);
        assert_eq!(coerce("NaN"), 0.0);
        assert_eq!(coerce("inf"), 0.0);
    }

    #[test]
    fn raw_value_accepts_json_numbers() {
        let from_number: RawValue = serde_json::from_str("3250").expect("number cell");
        assert_eq!(from_number.as_str(), "3250");

        let from_float: RawValue = serde_json::from_str("0.7").expect("float cell");
        assert_eq!(from_float.as_number(), 0.7);

        let from_null: RawValue = serde_json::from_str("null").expect("null cell");
        assert_eq!(from_null.as_number(), 0.0);
    }

    #[test]
    fn raw_value_serializes_as_text() {
        let cell = RawValue::new("0,35");
        assert_eq!(
            serde_json::to_string(&cell).expect("serialize"),
            "\"0,35\""
        );
    }
}
