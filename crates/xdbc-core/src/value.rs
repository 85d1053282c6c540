//! Cell values and typed extraction.

use serde::{Deserialize, Serialize};

/// A single cell of a result row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// NULL value
    Null,

    /// 64-bit signed integer
    Integer(i64),

    /// 64-bit floating point
    Double(f64),

    /// Text string
    Text(String),

    /// Binary data
    Bytes(Vec<u8>),
}

impl Value {
    /// Check if this value is NULL.
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// Extraction of a Rust value from a cell.
///
/// This is the one place where a cell's variant is matched against the
/// requested type. `None` means NULL or an incompatible variant.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for i32 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Integer(v) => {
                let narrowed = i32::try_from(*v).ok();
                if narrowed.is_none() {
                    tracing::trace!(value = v, "integer does not fit in i32");
                }
                narrowed
            }
            _ => None,
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromValue for f32 {
    #[allow(clippy::cast_possible_truncation)]
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Double(v) => Some(*v as f32),
            Value::Integer(v) => Some(*v as f32),
            _ => None,
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Double(v) => Some(*v),
            Value::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Text(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bytes(v) => Some(v.clone()),
            Value::Text(v) => Some(v.as_bytes().to_vec()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_extraction() {
        assert_eq!(i32::from_value(&Value::Integer(1001)), Some(1001));
        assert_eq!(i64::from_value(&Value::Integer(1 << 40)), Some(1 << 40));
        assert_eq!(i32::from_value(&Value::Integer(1 << 40)), None);
        assert_eq!(i32::from_value(&Value::Text("1".into())), None);
    }

    #[test]
    fn test_float_extraction() {
        assert_eq!(f64::from_value(&Value::Double(2.5)), Some(2.5));
        assert_eq!(f64::from_value(&Value::Integer(3)), Some(3.0));
        assert_eq!(f32::from_value(&Value::Double(0.5)), Some(0.5));
        assert_eq!(f64::from_value(&Value::Null), None);
    }

    #[test]
    fn test_text_and_bytes() {
        assert_eq!(
            String::from_value(&Value::Text("jack".into())),
            Some("jack".to_string())
        );
        assert_eq!(String::from_value(&Value::Integer(1)), None);
        assert_eq!(
            Vec::<u8>::from_value(&Value::Bytes(vec![1, 2])),
            Some(vec![1, 2])
        );
        assert_eq!(Vec::<u8>::from_value(&Value::Text("ab".into())), Some(b"ab".to_vec()));
    }

    #[test]
    fn test_null_yields_none() {
        assert_eq!(i32::from_value(&Value::Null), None);
        assert_eq!(String::from_value(&Value::Null), None);
        assert!(Value::Null.is_null());
    }
}
