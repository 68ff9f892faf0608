//! Universal value type for participant variables.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Tolerance used wherever two floats are compared for equality
/// (float conditions, event equality).
pub const FLOAT_TOLERANCE: f32 = 1.0e-4;

/// Returns true if `a` and `b` differ by at most [`FLOAT_TOLERANCE`].
pub fn nearly_equal(a: f32, b: f32) -> bool {
    (a - b).abs() <= FLOAT_TOLERANCE
}

/// A participant variable value.
///
/// Covers the four variable types a participant can expose:
/// - Int (`i32`)
/// - Float (`f32`)
/// - Bool
/// - Name (an identifier-like string)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    Int(i32),
    Float(f32),
    Bool(bool),
    Name(String),
}

/// The type of a [`Value`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    Int,
    Float,
    Bool,
    Name,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ValueType::Int => "INT",
            ValueType::Float => "FLOAT",
            ValueType::Bool => "BOOL",
            ValueType::Name => "NAME",
        };
        f.write_str(s)
    }
}

// ============================================================================
// Type checking
// ============================================================================

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Int(_) => ValueType::Int,
            Value::Float(_) => ValueType::Float,
            Value::Bool(_) => ValueType::Bool,
            Value::Name(_) => ValueType::Name,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "INT",
            Value::Float(_) => "FLOAT",
            Value::Bool(_) => "BOOL",
            Value::Name(_) => "NAME",
        }
    }

    pub fn is_numeric(&self) -> bool { matches!(self, Value::Int(_) | Value::Float(_)) }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Ints widen to floats; nothing else converts.
    pub fn as_float(&self) -> Option<f32> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f32),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            Value::Name(s) => Some(s),
            _ => None,
        }
    }
}

// ============================================================================
// Conversions (From impls)
// ============================================================================

impl From<bool> for Value { fn from(v: bool) -> Self { Value::Bool(v) } }
impl From<i32> for Value { fn from(v: i32) -> Self { Value::Int(v) } }
impl From<f32> for Value { fn from(v: f32) -> Self { Value::Float(v) } }
impl From<String> for Value { fn from(v: String) -> Self { Value::Name(v) } }
impl From<&str> for Value { fn from(v: &str) -> Self { Value::Name(v.to_owned()) } }

// ============================================================================
// Display (used when substituting values into dialogue text)
// ============================================================================

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Name(s) => f.write_str(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_from() {
        assert_eq!(Value::from("Ada"), Value::Name("Ada".into()));
        assert_eq!(Value::from(42), Value::Int(42));
        assert_eq!(Value::from(1.5f32), Value::Float(1.5));
        assert_eq!(Value::from(true), Value::Bool(true));
    }

    #[test]
    fn test_int_widens_to_float() {
        assert_eq!(Value::Int(3).as_float(), Some(3.0));
        assert_eq!(Value::Float(3.0).as_int(), None);
    }

    #[test]
    fn test_display_is_bare() {
        assert_eq!(Value::Name("Lydia".into()).to_string(), "Lydia");
        assert_eq!(Value::Int(-7).to_string(), "-7");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
    }

    #[test]
    fn test_nearly_equal() {
        assert!(nearly_equal(1.0, 1.00005));
        assert!(!nearly_equal(1.0, 1.001));
    }
}
