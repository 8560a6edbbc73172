//! Coercion rules
//!
//! Built-in field types (declarable from JSON):
//! - str: any value, rendered in its plain textual form
//! - int: 64-bit signed integer; floats truncate, strings parse
//! - float: 64-bit floating point; ints widen, strings parse
//! - bool: truthiness of the input
//!
//! Custom rules wrap an arbitrary function under a label.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::errors::CoercionFailure;
use super::value::Value;

/// Built-in field types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Str,
    Int,
    Float,
    Bool,
}

impl FieldType {
    /// Returns the type name used in declarations and introspection
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::Str => "str",
            FieldType::Int => "int",
            FieldType::Float => "float",
            FieldType::Bool => "bool",
        }
    }

    /// Converts a raw value into this type's canonical value.
    pub fn coerce(&self, raw: &Value) -> Result<Value, CoercionFailure> {
        match self {
            FieldType::Str => Ok(Value::Str(raw.to_string())),
            FieldType::Int => to_int(raw).map(Value::Int),
            FieldType::Float => to_float(raw).map(Value::Float),
            FieldType::Bool => Ok(Value::Bool(truthy(raw))),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

fn to_int(raw: &Value) -> Result<i64, CoercionFailure> {
    match raw {
        Value::Int(i) => Ok(*i),
        Value::Bool(b) => Ok(i64::from(*b)),
        Value::Float(f) => {
            if !f.is_finite() {
                return Err(CoercionFailure::value_error(format!(
                    "cannot convert float {} to integer",
                    raw
                )));
            }
            let truncated = f.trunc();
            // i64::MIN is exactly representable, i64::MAX rounds up to 2^63
            if truncated < -9_223_372_036_854_775_808.0 || truncated >= 9_223_372_036_854_775_808.0 {
                return Err(CoercionFailure::value_error(format!(
                    "float {} out of integer range",
                    raw
                )));
            }
            Ok(truncated as i64)
        }
        Value::Str(s) => s.trim().parse::<i64>().map_err(|_| {
            CoercionFailure::value_error(format!(
                "invalid literal for int() with base 10: {}",
                raw.repr()
            ))
        }),
        Value::None => Err(CoercionFailure::type_error(
            "int() argument must be a string or a number, not 'NoneType'",
        )),
    }
}

fn to_float(raw: &Value) -> Result<f64, CoercionFailure> {
    match raw {
        Value::Float(f) => Ok(*f),
        Value::Int(i) => Ok(*i as f64),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::Str(s) => s.trim().parse::<f64>().map_err(|_| {
            CoercionFailure::value_error(format!(
                "could not convert string to float: {}",
                raw.repr()
            ))
        }),
        Value::None => Err(CoercionFailure::type_error(
            "float() argument must be a string or a number, not 'NoneType'",
        )),
    }
}

fn truthy(raw: &Value) -> bool {
    match raw {
        Value::None => false,
        Value::Bool(b) => *b,
        Value::Int(i) => *i != 0,
        Value::Float(f) => *f != 0.0,
        Value::Str(s) => !s.is_empty(),
    }
}

/// Signature of a custom coercion rule
pub type CoerceFn = dyn Fn(&Value) -> Result<Value, CoercionFailure> + Send + Sync;

/// The rule a field validator applies to every incoming value
#[derive(Clone)]
pub enum Coercion {
    Builtin(FieldType),
    Custom { label: String, rule: Arc<CoerceFn> },
}

impl Coercion {
    /// Wraps an arbitrary function as a named coercion rule
    pub fn custom<F>(label: impl Into<String>, rule: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, CoercionFailure> + Send + Sync + 'static,
    {
        Coercion::Custom {
            label: label.into(),
            rule: Arc::new(rule),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Coercion::Builtin(field_type) => field_type.type_name(),
            Coercion::Custom { label, .. } => label,
        }
    }

    pub fn apply(&self, raw: &Value) -> Result<Value, CoercionFailure> {
        match self {
            Coercion::Builtin(field_type) => field_type.coerce(raw),
            Coercion::Custom { rule, .. } => rule(raw),
        }
    }
}

impl From<FieldType> for Coercion {
    fn from(field_type: FieldType) -> Self {
        Coercion::Builtin(field_type)
    }
}

impl fmt::Debug for Coercion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coercion::Builtin(field_type) => f.debug_tuple("Builtin").field(field_type).finish(),
            Coercion::Custom { label, .. } => f
                .debug_struct("Custom")
                .field("label", label)
                .finish_non_exhaustive(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::errors::FailureKind;

    #[test]
    fn test_str_accepts_anything() {
        let c = FieldType::Str;
        assert_eq!(c.coerce(&Value::from("x")).unwrap(), Value::from("x"));
        assert_eq!(c.coerce(&Value::Int(7)).unwrap(), Value::from("7"));
        assert_eq!(c.coerce(&Value::Float(1.0)).unwrap(), Value::from("1.0"));
        assert_eq!(c.coerce(&Value::None).unwrap(), Value::from("None"));
        assert_eq!(c.coerce(&Value::Bool(true)).unwrap(), Value::from("True"));
    }

    #[test]
    fn test_int_coercion() {
        let c = FieldType::Int;
        assert_eq!(c.coerce(&Value::Int(1972)).unwrap(), Value::Int(1972));
        assert_eq!(c.coerce(&Value::Float(3.9)).unwrap(), Value::Int(3));
        assert_eq!(c.coerce(&Value::Float(-3.9)).unwrap(), Value::Int(-3));
        assert_eq!(c.coerce(&Value::from(" 42 ")).unwrap(), Value::Int(42));
        assert_eq!(c.coerce(&Value::Bool(true)).unwrap(), Value::Int(1));
    }

    #[test]
    fn test_int_rejections() {
        let c = FieldType::Int;
        let err = c.coerce(&Value::from("MCMLXXII")).unwrap_err();
        assert_eq!(err.kind, FailureKind::ValueError);
        assert!(err.reason.contains("'MCMLXXII'"));

        assert_eq!(
            c.coerce(&Value::None).unwrap_err().kind,
            FailureKind::TypeError
        );
        assert!(c.coerce(&Value::from("3.5")).is_err());
        assert!(c.coerce(&Value::Float(f64::NAN)).is_err());
        assert!(c.coerce(&Value::Float(1e300)).is_err());
    }

    #[test]
    fn test_float_coercion() {
        let c = FieldType::Float;
        assert_eq!(c.coerce(&Value::Int(137)).unwrap(), Value::Float(137.0));
        assert_eq!(c.coerce(&Value::from("2.5")).unwrap(), Value::Float(2.5));
        assert_eq!(c.coerce(&Value::Bool(false)).unwrap(), Value::Float(0.0));
        assert!(c.coerce(&Value::from("inf")).unwrap().as_float().unwrap().is_infinite());
    }

    #[test]
    fn test_float_rejections() {
        let c = FieldType::Float;
        assert_eq!(
            c.coerce(&Value::from("half stone")).unwrap_err().kind,
            FailureKind::ValueError
        );
        assert_eq!(
            c.coerce(&Value::None).unwrap_err().kind,
            FailureKind::TypeError
        );
        assert!(c.coerce(&Value::from("")).is_err());
    }

    #[test]
    fn test_bool_truthiness() {
        let c = FieldType::Bool;
        assert_eq!(c.coerce(&Value::None).unwrap(), Value::Bool(false));
        assert_eq!(c.coerce(&Value::Int(0)).unwrap(), Value::Bool(false));
        assert_eq!(c.coerce(&Value::from("")).unwrap(), Value::Bool(false));
        assert_eq!(c.coerce(&Value::from("False")).unwrap(), Value::Bool(true));
        assert_eq!(c.coerce(&Value::Float(0.5)).unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_custom_rule() {
        let positive = Coercion::custom("positive_int", |v| match v.as_int() {
            Some(i) if i > 0 => Ok(Value::Int(i)),
            Some(_) => Err(CoercionFailure::value_error("must be positive")),
            None => Err(CoercionFailure::type_error("expected int")),
        });
        assert_eq!(positive.label(), "positive_int");
        assert_eq!(positive.apply(&Value::Int(3)).unwrap(), Value::Int(3));
        assert!(positive.apply(&Value::Int(-3)).is_err());
        assert!(format!("{:?}", positive).contains("positive_int"));
    }

    #[test]
    fn test_field_type_serde_names() {
        let parsed: FieldType = serde_json::from_str("\"float\"").unwrap();
        assert_eq!(parsed, FieldType::Float);
        assert_eq!(serde_json::to_string(&FieldType::Str).unwrap(), "\"str\"");
    }
}
