//! Scalar value representation for feature attributes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Value held by a feature attribute.
///
/// This enum can hold any value that corresponds to a [`ValueType`]
/// variant. Untagged serde representation keeps the wire document plain
/// JSON: booleans, integers, floats and strings map directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer
    I64(i64),
    /// 64-bit floating point number
    F64(f64),
    /// UTF-8 string
    String(String),
}

impl Value {
    /// Returns the type of this value.
    pub fn ty(&self) -> ValueType {
        match self {
            Value::Bool(_) => ValueType::Bool,
            Value::I64(_) => ValueType::I64,
            Value::F64(_) => ValueType::F64,
            Value::String(_) => ValueType::String,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{}", v),
            Value::I64(v) => write!(f, "{}", v),
            Value::F64(v) => write!(f, "{}", v),
            Value::String(v) => write!(f, "{}", v),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::I64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::F64(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

/// Attribute types supported by feature schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// Boolean value
    Bool,
    /// 64-bit signed integer
    I64,
    /// 64-bit floating point number
    F64,
    /// UTF-8 string
    String,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Bool => write!(f, "bool"),
            ValueType::I64 => write!(f, "i64"),
            ValueType::F64 => write!(f, "f64"),
            ValueType::String => write!(f, "string"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_reports_its_type() {
        assert_eq!(Value::from(true).ty(), ValueType::Bool);
        assert_eq!(Value::from(7i64).ty(), ValueType::I64);
        assert_eq!(Value::from(1.5f64).ty(), ValueType::F64);
        assert_eq!(Value::from("x").ty(), ValueType::String);
    }

    #[test]
    fn untagged_json_roundtrip() {
        let v = Value::from("main street");
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, "\"main street\"");
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);

        let n: Value = serde_json::from_str("42").unwrap();
        assert_eq!(n, Value::I64(42));
    }
}
