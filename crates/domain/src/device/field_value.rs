//! Dynamically typed values used when mutating a device field by name.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// A single value destined for a named device field.
///
/// The device decides which variants it accepts; anything else is a
/// [`ValidationError`]. Integers are held wide enough for any JSON integer,
/// so an oversized value still reaches the field's range check.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Bool(bool),
    Int(i128),
    Float(f64),
    Text(String),
}

impl FieldValue {
    /// Convert a scalar from a persisted JSON record.
    ///
    /// Non-scalar values (null, arrays, objects) become [`Text`](Self::Text)
    /// so they are rejected by the field's own type check.
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Bool(b) => Self::Bool(*b),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(i128::from)
                .or_else(|| n.as_u64().map(i128::from))
                .map(Self::Int)
                .or_else(|| n.as_f64().map(Self::Float))
                .unwrap_or_else(|| Self::Text(n.to_string())),
            serde_json::Value::String(s) => Self::Text(s.clone()),
            other => Self::Text(other.to_string()),
        }
    }

    pub(crate) fn as_bool(&self, field: &'static str) -> Result<bool, ValidationError> {
        match self {
            Self::Bool(b) => Ok(*b),
            _ => Err(ValidationError::NotABoolean { field }),
        }
    }

    pub(crate) fn as_int(&self, field: &'static str) -> Result<i128, ValidationError> {
        match self {
            Self::Int(n) => Ok(*n),
            _ => Err(ValidationError::NotAnInteger { field }),
        }
    }
}

/// Parse user input: booleans, then integers, then decimals, else raw text.
impl FromStr for FieldValue {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("true") {
            return Ok(Self::Bool(true));
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return Ok(Self::Bool(false));
        }
        if let Ok(n) = trimmed.parse::<i128>() {
            return Ok(Self::Int(n));
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            return Ok(Self::Float(f));
        }
        Ok(Self::Text(s.to_string()))
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => b.fmt(f),
            Self::Int(n) => n.fmt(f),
            Self::Float(x) => x.fmt(f),
            Self::Text(s) => f.write_str(s),
        }
    }
}
