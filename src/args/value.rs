//! Typed argument values and coercion from raw text.

use std::num::{ParseFloatError, ParseIntError};

use serde::Serialize;
use thiserror::Error;

use crate::args::duration::{DurationError, DurationGrammar, HumanDuration};
use crate::args::schema::ArgumentType;

/// A bound argument value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Value {
    #[serde(rename = "string")]
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Duration(HumanDuration),
    /// Raw, unresolved entity reference.
    Entity(String),
    /// Placeholder for reply slots, which carry no text.
    None,
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Str(_) => "string",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Duration(_) => "duration",
            Value::Entity(_) => "entity",
            Value::None => "none",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoercionError {
    #[error(transparent)]
    Int(#[from] ParseIntError),
    #[error(transparent)]
    Float(#[from] ParseFloatError),
    #[error("expected one of true/false/t/f/1/0")]
    Bool,
    #[error(transparent)]
    Duration(#[from] DurationError),
}

/// Case-insensitive `true/false/t/f/1/0`.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "t" | "1" => Some(true),
        "false" | "f" | "0" => Some(false),
        _ => None,
    }
}

/// Convert raw text into a value of the declared type.
///
/// Pure: the same input always yields the same result.
pub fn coerce(
    raw: &str,
    ty: ArgumentType,
    durations: &DurationGrammar,
) -> Result<Value, CoercionError> {
    let value = match ty {
        ArgumentType::String => Value::Str(raw.to_string()),
        ArgumentType::Int => Value::Int(raw.parse()?),
        ArgumentType::Float => Value::Float(raw.parse()?),
        ArgumentType::Bool => Value::Bool(parse_bool(raw).ok_or(CoercionError::Bool)?),
        ArgumentType::Entity => Value::Entity(raw.to_string()),
        ArgumentType::Reply => Value::None,
        ArgumentType::Duration => Value::Duration(durations.parse(raw)?),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coerce_default(raw: &str, ty: ArgumentType) -> Result<Value, CoercionError> {
        coerce(raw, ty, &DurationGrammar::default())
    }

    #[test]
    fn int_parses_signed_base_ten() {
        assert_eq!(coerce_default("-42", ArgumentType::Int), Ok(Value::Int(-42)));
        assert!(coerce_default("4x", ArgumentType::Int).is_err());
        assert!(coerce_default("9223372036854775808", ArgumentType::Int).is_err());
        assert!(coerce_default("", ArgumentType::Int).is_err());
    }

    #[test]
    fn float_accepts_exponent() {
        assert_eq!(
            coerce_default("1.5e3", ArgumentType::Float),
            Ok(Value::Float(1500.0))
        );
        assert!(coerce_default("1,5", ArgumentType::Float).is_err());
    }

    #[test]
    fn bool_literals() {
        for raw in ["true", "TRUE", "t", "1"] {
            assert_eq!(coerce_default(raw, ArgumentType::Bool), Ok(Value::Bool(true)));
        }
        for raw in ["false", "False", "f", "0"] {
            assert_eq!(coerce_default(raw, ArgumentType::Bool), Ok(Value::Bool(false)));
        }
        assert_eq!(
            coerce_default("yes", ArgumentType::Bool),
            Err(CoercionError::Bool)
        );
    }

    #[test]
    fn entity_and_string_are_identity() {
        assert_eq!(
            coerce_default("@alice", ArgumentType::Entity),
            Ok(Value::Entity("@alice".into()))
        );
        assert_eq!(
            coerce_default("-x y", ArgumentType::String),
            Ok(Value::Str("-x y".into()))
        );
    }

    #[test]
    fn reply_ignores_text() {
        assert_eq!(coerce_default("anything", ArgumentType::Reply), Ok(Value::None));
    }

    #[test]
    fn coercion_is_repeatable() {
        for ty in [ArgumentType::Int, ArgumentType::Duration, ArgumentType::Bool] {
            assert_eq!(coerce_default("1d", ty), coerce_default("1d", ty));
        }
    }

    #[test]
    fn value_serializes_tagged() {
        let json = serde_json::to_string(&Value::Str("hi".into())).unwrap();
        assert_eq!(json, r#"{"type":"string","value":"hi"}"#);
        let json = serde_json::to_string(&Value::Duration(HumanDuration::from_seconds(3600))).unwrap();
        assert_eq!(json, r#"{"type":"duration","value":"1h"}"#);
    }
}
