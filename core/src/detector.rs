//! Runtime type classification for raw payload values.
//!
//! Every handler classifies its raw input through [`ValueKind`] before
//! coercing it. Classification is driven by the value's variant tag, never by
//! truthiness, so `null`, empty arrays and `0` are all told apart.
//!
//! An absent key is represented as `None` and classifies as
//! [`ValueKind::Undefined`].
//!
//! # Examples
//!
//! ```
//! use podeng_core::detector::{self, ValueKind};
//! use serde_json::json;
//!
//! assert_eq!(ValueKind::of(Some(&json!([1, 2]))), ValueKind::Array);
//! assert_eq!(ValueKind::of(None), ValueKind::Undefined);
//! assert!(detector::is_float(Some(&json!(30.5))));
//! assert!(detector::is_string_float(Some(&json!("30.000"))));
//! assert!(!detector::is_string_float(Some(&json!("30"))));
//! ```

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Number, Value};

static NUMERIC_STRING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?$").expect("static regex must compile")
});

/// Canonical structural tag of a raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Array,
    Object,
    String,
    Number,
    Boolean,
    Null,
    /// The key was not present at all.
    Undefined,
}

impl ValueKind {
    /// Classifies a possibly-absent value.
    pub fn of(value: Option<&Value>) -> Self {
        match value {
            None => Self::Undefined,
            Some(Value::Null) => Self::Null,
            Some(Value::Bool(_)) => Self::Boolean,
            Some(Value::Number(_)) => Self::Number,
            Some(Value::String(_)) => Self::String,
            Some(Value::Array(_)) => Self::Array,
            Some(Value::Object(_)) => Self::Object,
        }
    }

    /// Returns the lowercase tag name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Array => "array",
            Self::Object => "object",
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Null => "null",
            Self::Undefined => "undefined",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn is_array(value: Option<&Value>) -> bool {
    ValueKind::of(value) == ValueKind::Array
}

pub fn is_object(value: Option<&Value>) -> bool {
    ValueKind::of(value) == ValueKind::Object
}

pub fn is_string(value: Option<&Value>) -> bool {
    ValueKind::of(value) == ValueKind::String
}

pub fn is_number(value: Option<&Value>) -> bool {
    ValueKind::of(value) == ValueKind::Number
}

pub fn is_boolean(value: Option<&Value>) -> bool {
    ValueKind::of(value) == ValueKind::Boolean
}

pub fn is_null(value: Option<&Value>) -> bool {
    ValueKind::of(value) == ValueKind::Null
}

pub fn is_undefined(value: Option<&Value>) -> bool {
    ValueKind::of(value) == ValueKind::Undefined
}

/// `null` or absent.
pub fn is_nil(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}

/// Returns `true` for strings holding an RFC 3339 timestamp.
pub fn is_date(value: Option<&Value>) -> bool {
    match value {
        Some(Value::String(s)) => chrono::DateTime::parse_from_rfc3339(s).is_ok(),
        _ => false,
    }
}

/// A number with no fractional component.
pub fn is_int(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f.fract() == 0.0),
        _ => false,
    }
}

/// A number with a fractional component.
pub fn is_float(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f.fract() != 0.0),
        _ => false,
    }
}

/// A string that reads as a number and is written with a decimal point.
///
/// `"30.000"` qualifies even though its value is integral; `"30"` does not.
pub fn is_string_float(value: Option<&Value>) -> bool {
    match value {
        Some(Value::String(s)) => parse_numeric_str(s).is_some() && s.contains('.'),
        _ => false,
    }
}

/// Parses a decimal string (surrounding whitespace allowed) into a finite
/// `f64`. Empty and non-numeric strings yield `None`.
pub fn parse_numeric_str(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if !NUMERIC_STRING.is_match(trimmed) {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|f| f.is_finite())
}

/// Converts an `f64` into a JSON number, preferring the integer
/// representation when the value has no fractional part.
///
/// Non-finite values become `null`.
pub fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 {
        return Value::from(n as i64);
    }
    Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
}

/// JSON equality with numbers compared by value (`1` equals `1.0`).
pub fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}
