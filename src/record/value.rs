//! Dynamic values flowing through field validators
//!
//! Raw inputs and canonical field values share one representation. Every value
//! has a canonical textual form (`repr`) used by record representations and
//! error messages:
//! - strings are quoted: `'text'`
//! - floats always carry a decimal point or exponent: `137.0`, `1e+16`
//! - booleans and none render as `True`, `False`, `None`

use std::fmt;

use serde_json::Value as Json;

use super::errors::CoercionFailure;

/// A dynamically typed field value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    /// Returns the type name used in coercion failures
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "NoneType",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
        }
    }

    /// Canonical textual form of the value
    pub fn repr(&self) -> String {
        match self {
            Value::Str(s) => quote(s),
            other => other.to_string(),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Converts to JSON for CLI output.
    ///
    /// Non-finite floats have no JSON number form and are emitted as their repr.
    pub fn to_json(&self) -> Json {
        match self {
            Value::None => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Int(i) => Json::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(Json::Number)
                .unwrap_or_else(|| Json::String(format_float(*f))),
            Value::Str(s) => Json::String(s.clone()),
        }
    }
}

/// Plain (unquoted) form, the way a string constructor would render it
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", format_float(*x)),
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

/// Shortest round-trip float text with a mandatory decimal point,
/// exponent written as `e+NN` / `e-NN`.
fn format_float(x: f64) -> String {
    if x.is_nan() {
        return "nan".into();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf".into() } else { "-inf".into() };
    }

    let text = format!("{:?}", x);
    match text.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => text,
    }
}

fn quote(s: &str) -> String {
    let delimiter = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut output = String::with_capacity(s.len() + 2);
    output.push(delimiter);
    for c in s.chars() {
        match c {
            '\\' => output.push_str("\\\\"),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '\t' => output.push_str("\\t"),
            c if c == delimiter => {
                output.push('\\');
                output.push(c);
            }
            c if c.is_control() => {
                let code = c as u32;
                if code < 0x100 {
                    output.push_str(&format!("\\x{:02x}", code));
                } else {
                    output.push_str(&format!("\\u{:04x}", code));
                }
            }
            c => output.push(c),
        }
    }
    output.push(delimiter);
    output
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::None, Into::into)
    }
}

impl TryFrom<&Json> for Value {
    type Error = CoercionFailure;

    fn try_from(json: &Json) -> Result<Self, Self::Error> {
        match json {
            Json::Null => Ok(Value::None),
            Json::Bool(b) => Ok(Value::Bool(*b)),
            Json::Number(n) => {
                // integers past i64 stay integers; they are never widened to float
                match (n.as_i64(), n.as_f64()) {
                    (Some(i), _) => Ok(Value::Int(i)),
                    (None, Some(f)) if n.is_f64() => Ok(Value::Float(f)),
                    _ => Err(CoercionFailure::value_error(format!(
                        "integer {} is out of range",
                        n
                    ))),
                }
            }
            Json::String(s) => Ok(Value::Str(s.clone())),
            Json::Array(_) => Err(CoercionFailure::type_error(
                "array values are not supported",
            )),
            Json::Object(_) => Err(CoercionFailure::type_error(
                "object values are not supported",
            )),
        }
    }
}
