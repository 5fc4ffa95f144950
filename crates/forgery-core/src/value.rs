use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Shape of a value produced by a directive or expected by a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Float,
    Text,
    Date,
    Time,
    Timestamp,
    Uuid,
    List,
    Map,
    Any,
}

impl ValueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Text => "text",
            ValueKind::Date => "date",
            ValueKind::Time => "time",
            ValueKind::Timestamp => "timestamp",
            ValueKind::Uuid => "uuid",
            ValueKind::List => "list",
            ValueKind::Map => "map",
            ValueKind::Any => "any",
        }
    }

    /// Structural kind of a JSON value; dates and uuids are reported as text.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(number) if number.is_f64() => ValueKind::Float,
            Value::Number(_) => ValueKind::Int,
            Value::String(_) => ValueKind::Text,
            Value::Array(_) => ValueKind::List,
            Value::Object(_) => ValueKind::Map,
        }
    }

    /// Returns true when a value of this kind is carried by `value`.
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            ValueKind::Any => true,
            ValueKind::Float => value.is_number(),
            ValueKind::Date => value.as_str().and_then(parse_date_value).is_some(),
            ValueKind::Time => value.as_str().and_then(parse_time_value).is_some(),
            ValueKind::Timestamp => value.as_str().and_then(parse_timestamp_value).is_some(),
            ValueKind::Uuid => value
                .as_str()
                .is_some_and(|text| uuid::Uuid::parse_str(text).is_ok()),
            kind => ValueKind::of(value) == kind,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value could not be converted into the requested type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {expected}, found {found}")]
pub struct CoercionError {
    pub expected: String,
    pub found: String,
}

impl CoercionError {
    pub fn new(expected: impl Into<String>, value: &Value) -> Self {
        Self {
            expected: expected.into(),
            found: describe_value(value),
        }
    }
}

/// Short human-readable rendering of a value for diagnostics.
pub fn describe_value(value: &Value) -> String {
    const MAX: usize = 40;
    let rendered = value.to_string();
    let rendered = if rendered.chars().count() > MAX {
        let cut: String = rendered.chars().take(MAX).collect();
        format!("{cut}...")
    } else {
        rendered
    };
    format!("{} {}", ValueKind::of(value), rendered)
}

/// Conversion from a rule literal or generated value into a field type.
///
/// Numeric widening, numeric strings and ISO date strings are accepted;
/// narrowing that would lose information is rejected.
pub trait FromValue: Sized {
    /// Declared kind, used when describing the field.
    fn kind() -> ValueKind;

    fn from_value(value: Value) -> Result<Self, CoercionError>;
}

impl FromValue for Value {
    fn kind() -> ValueKind {
        ValueKind::Any
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        Ok(value)
    }
}

impl FromValue for String {
    fn kind() -> ValueKind {
        ValueKind::Text
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        match value {
            Value::String(text) => Ok(text),
            Value::Number(number) => Ok(number.to_string()),
            Value::Bool(flag) => Ok(flag.to_string()),
            other => Err(CoercionError::new("string", &other)),
        }
    }
}

impl FromValue for bool {
    fn kind() -> ValueKind {
        ValueKind::Bool
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        match &value {
            Value::Bool(flag) => Ok(*flag),
            Value::String(text) => match text.trim() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(CoercionError::new("bool", &value)),
            },
            _ => Err(CoercionError::new("bool", &value)),
        }
    }
}

impl FromValue for char {
    fn kind() -> ValueKind {
        ValueKind::Text
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        if let Some(text) = value.as_str() {
            let mut chars = text.chars();
            if let (Some(ch), None) = (chars.next(), chars.next()) {
                return Ok(ch);
            }
        }
        Err(CoercionError::new("char", &value))
    }
}

macro_rules! int_from_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromValue for $ty {
                fn kind() -> ValueKind {
                    ValueKind::Int
                }

                fn from_value(value: Value) -> Result<Self, CoercionError> {
                    let expected = stringify!($ty);
                    let parsed = match &value {
                        Value::Number(number) => {
                            if let Some(int) = number.as_i64() {
                                <$ty>::try_from(int).ok()
                            } else if let Some(uint) = number.as_u64() {
                                <$ty>::try_from(uint).ok()
                            } else {
                                number
                                    .as_f64()
                                    .and_then(integral_f64)
                                    .and_then(|int| <$ty>::try_from(int).ok())
                            }
                        }
                        Value::String(text) => text.trim().parse::<$ty>().ok(),
                        _ => None,
                    };
                    parsed.ok_or_else(|| CoercionError::new(expected, &value))
                }
            }
        )*
    };
}

int_from_value!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

fn integral_f64(value: f64) -> Option<i64> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}

fn number_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
}

impl FromValue for f64 {
    fn kind() -> ValueKind {
        ValueKind::Float
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        number_as_f64(&value).ok_or_else(|| CoercionError::new("f64", &value))
    }
}

impl FromValue for f32 {
    fn kind() -> ValueKind {
        ValueKind::Float
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        number_as_f64(&value)
            .filter(|float| !float.is_finite() || float.abs() <= f32::MAX as f64)
            .map(|float| float as f32)
            .ok_or_else(|| CoercionError::new("f32", &value))
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn kind() -> ValueKind {
        T::kind()
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn kind() -> ValueKind {
        ValueKind::List
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        match value {
            Value::Array(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(CoercionError::new("list", &other)),
        }
    }
}

impl<T: FromValue> FromValue for HashMap<String, T> {
    fn kind() -> ValueKind {
        ValueKind::Map
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        match value {
            Value::Object(map) => map
                .into_iter()
                .map(|(key, value)| T::from_value(value).map(|value| (key, value)))
                .collect(),
            other => Err(CoercionError::new("map", &other)),
        }
    }
}

impl<T: FromValue> FromValue for BTreeMap<String, T> {
    fn kind() -> ValueKind {
        ValueKind::Map
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        match value {
            Value::Object(map) => map
                .into_iter()
                .map(|(key, value)| T::from_value(value).map(|value| (key, value)))
                .collect(),
            other => Err(CoercionError::new("map", &other)),
        }
    }
}

impl FromValue for NaiveDate {
    fn kind() -> ValueKind {
        ValueKind::Date
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        value
            .as_str()
            .and_then(|text| {
                parse_date_value(text).or_else(|| parse_timestamp_value(text).map(|ts| ts.date()))
            })
            .ok_or_else(|| CoercionError::new("date", &value))
    }
}

impl FromValue for NaiveTime {
    fn kind() -> ValueKind {
        ValueKind::Time
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        value
            .as_str()
            .and_then(parse_time_value)
            .ok_or_else(|| CoercionError::new("time", &value))
    }
}

impl FromValue for NaiveDateTime {
    fn kind() -> ValueKind {
        ValueKind::Timestamp
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        value
            .as_str()
            .and_then(parse_timestamp_value)
            .ok_or_else(|| CoercionError::new("timestamp", &value))
    }
}

impl FromValue for DateTime<Utc> {
    fn kind() -> ValueKind {
        ValueKind::Timestamp
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        value
            .as_str()
            .and_then(parse_timestamp_value)
            .map(|ts| ts.and_utc())
            .ok_or_else(|| CoercionError::new("timestamp", &value))
    }
}

impl FromValue for uuid::Uuid {
    fn kind() -> ValueKind {
        ValueKind::Uuid
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        value
            .as_str()
            .and_then(|text| uuid::Uuid::parse_str(text).ok())
            .ok_or_else(|| CoercionError::new("uuid", &value))
    }
}

pub fn parse_date_value(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

pub fn parse_time_value(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .ok()
        .or_else(|| NaiveTime::parse_from_str(value, "%H:%M:%S%.f").ok())
}

pub fn parse_timestamp_value(value: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.naive_utc())
        .or_else(|| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").ok())
        .or_else(|| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integral_floats_narrow_to_ints() {
        assert_eq!(i32::from_value(json!(7.0)), Ok(7));
        assert!(i32::from_value(json!(7.5)).is_err());
    }

    #[test]
    fn out_of_range_ints_are_rejected() {
        let err = u8::from_value(json!(300)).expect_err("300 does not fit u8");
        assert_eq!(err.expected, "u8");
        assert!(err.found.starts_with("int"));
    }

    #[test]
    fn long_values_are_truncated_in_diagnostics() {
        let long = "x".repeat(100);
        let described = describe_value(&json!(long));
        assert!(described.ends_with("..."));
        assert!(described.len() < 60);
    }
}
