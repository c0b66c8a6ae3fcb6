//! Scalar values exchanged with SQLite.
//!
//! # Responsibility
//! - Represent bind parameters and result cells as one tagged variant.
//! - Convert untyped JSON request parameters into that variant.
//! - Serialize result cells back into plain JSON scalars.
//!
//! # Invariants
//! - Booleans bind as integers `1`/`0`; SQLite never yields `Boolean` back.
//! - Blobs travel over JSON as arrays of byte values.

use rusqlite::types::{ToSql, ToSqlOutput, Value, ValueRef};
use serde::ser::{Serialize, Serializer};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One scalar bind parameter or result cell.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Boolean(bool),
    Blob(Vec<u8>),
}

/// Error raised when a JSON parameter has no scalar SQLite equivalent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingError {
    /// 1-based parameter position.
    pub index: usize,
    /// JSON type name of the rejected value.
    pub kind: &'static str,
}

impl Display for BindingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Error binding parameter {}: type '{}' is not supported",
            self.index, self.kind
        )
    }
}

impl Error for BindingError {}

impl SqlValue {
    /// Converts one JSON value at 1-based `index` into a bind parameter.
    ///
    /// # Errors
    /// - Objects, arrays that are not byte arrays, and integers beyond
    ///   `i64` range return [`BindingError`].
    pub fn from_json(index: usize, value: &serde_json::Value) -> Result<Self, BindingError> {
        use serde_json::Value as Json;

        match value {
            Json::Null => Ok(Self::Null),
            Json::Bool(flag) => Ok(Self::Boolean(*flag)),
            Json::Number(number) => {
                if let Some(int) = number.as_i64() {
                    Ok(Self::Integer(int))
                } else if number.is_u64() {
                    Err(BindingError {
                        index,
                        kind: "int",
                    })
                } else {
                    number.as_f64().map(Self::Real).ok_or(BindingError {
                        index,
                        kind: "float",
                    })
                }
            }
            Json::String(text) => Ok(Self::Text(text.clone())),
            Json::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_u64()
                        .and_then(|byte| u8::try_from(byte).ok())
                        .ok_or(BindingError {
                            index,
                            kind: "list",
                        })
                })
                .collect::<Result<Vec<u8>, _>>()
                .map(Self::Blob),
            Json::Object(_) => Err(BindingError {
                index,
                kind: "dict",
            }),
        }
    }

    /// Converts an ordered JSON parameter list, preserving positions.
    pub fn from_json_params(values: &[serde_json::Value]) -> Result<Vec<Self>, BindingError> {
        values
            .iter()
            .enumerate()
            .map(|(position, value)| Self::from_json(position + 1, value))
            .collect()
    }
}

impl ToSql for SqlValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Self::Null => ToSqlOutput::Owned(Value::Null),
            Self::Integer(value) => ToSqlOutput::Owned(Value::Integer(*value)),
            Self::Real(value) => ToSqlOutput::Owned(Value::Real(*value)),
            Self::Text(value) => ToSqlOutput::Borrowed(ValueRef::Text(value.as_bytes())),
            Self::Boolean(value) => ToSqlOutput::Owned(Value::Integer(i64::from(*value))),
            Self::Blob(value) => ToSqlOutput::Borrowed(ValueRef::Blob(value)),
        })
    }
}

impl From<ValueRef<'_>> for SqlValue {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Self::Null,
            ValueRef::Integer(value) => Self::Integer(value),
            ValueRef::Real(value) => Self::Real(value),
            ValueRef::Text(bytes) => Self::Text(String::from_utf8_lossy(bytes).into_owned()),
            ValueRef::Blob(bytes) => Self::Blob(bytes.to_vec()),
        }
    }
}

impl Serialize for SqlValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Integer(value) => serializer.serialize_i64(*value),
            Self::Real(value) if value.is_finite() => serializer.serialize_f64(*value),
            Self::Real(_) => serializer.serialize_unit(),
            Self::Text(value) => serializer.serialize_str(value),
            Self::Boolean(value) => serializer.serialize_bool(*value),
            Self::Blob(bytes) => bytes.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BindingError, SqlValue};
    use serde_json::json;

    #[test]
    fn json_scalars_map_to_tagged_values() {
        let values = SqlValue::from_json_params(&[
            json!(null),
            json!(true),
            json!(42),
            json!(-7),
            json!(2.5),
            json!("user"),
            json!([0, 255, 16]),
        ])
        .unwrap();

        assert_eq!(
            values,
            vec![
                SqlValue::Null,
                SqlValue::Boolean(true),
                SqlValue::Integer(42),
                SqlValue::Integer(-7),
                SqlValue::Real(2.5),
                SqlValue::Text("user".to_string()),
                SqlValue::Blob(vec![0, 255, 16]),
            ]
        );
    }

    #[test]
    fn objects_are_rejected_with_position() {
        let err = SqlValue::from_json_params(&[json!(1), json!({"a": 1})]).unwrap_err();
        assert_eq!(
            err,
            BindingError {
                index: 2,
                kind: "dict"
            }
        );
        assert_eq!(
            err.to_string(),
            "Error binding parameter 2: type 'dict' is not supported"
        );
    }

    #[test]
    fn arrays_must_hold_bytes_only() {
        assert!(SqlValue::from_json(1, &json!([1, 256])).is_err());
        assert!(SqlValue::from_json(1, &json!(["a"])).is_err());
        assert_eq!(
            SqlValue::from_json(1, &json!([])).unwrap(),
            SqlValue::Blob(Vec::new())
        );
    }

    #[test]
    fn integers_beyond_i64_are_rejected() {
        let err = SqlValue::from_json(3, &json!(u64::MAX)).unwrap_err();
        assert_eq!(err.index, 3);
        assert_eq!(err.kind, "int");
    }

    #[test]
    fn result_cells_serialize_as_plain_json() {
        let row = vec![
            SqlValue::Integer(1),
            SqlValue::Text("x".to_string()),
            SqlValue::Null,
            SqlValue::Real(0.5),
            SqlValue::Real(f64::INFINITY),
            SqlValue::Blob(vec![1, 2]),
        ];

        assert_eq!(
            serde_json::to_value(&row).unwrap(),
            json!([1, "x", null, 0.5, null, [1, 2]])
        );
    }
}
