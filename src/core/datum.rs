use std::fmt;
use std::sync::Arc;

use serde::de::{self, Deserializer, Visitor};
use serde::ser::{self, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ChartError, ChartResult};

/// Scalar read out of a caller-supplied record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DatumValue {
    Number(f64),
    Text(String),
}

impl DatumValue {
    /// Numeric view of the value; numeric text is coerced.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(text) => text.trim().parse::<f64>().ok(),
        }
    }

    /// Finite numeric view, used where a colour or position must be defined.
    #[must_use]
    pub fn as_finite_number(&self) -> Option<f64> {
        self.as_number().filter(|value| value.is_finite())
    }

    /// Key used by band and ordinal scales.
    #[must_use]
    pub fn category_key(&self) -> String {
        match self {
            Self::Number(value) => format_number(*value),
            Self::Text(text) => text.clone(),
        }
    }

    pub fn require_number(&self) -> ChartResult<f64> {
        self.as_number()
            .ok_or_else(|| ChartError::NonNumericValue {
                value: self.category_key(),
            })
    }

    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(number) => number.as_f64().map(Self::Number),
            Value::String(text) => Some(Self::Text(text.clone())),
            Value::Bool(flag) => Some(Self::Text(flag.to_string())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

impl fmt::Display for DatumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.category_key())
    }
}

impl From<f64> for DatumValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for DatumValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for DatumValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Shortest textual form of a number: `2010` rather than `2010.0`, and no `-0`.
#[must_use]
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_owned();
    }
    format!("{value}")
}

type AccessorFn = dyn Fn(&Value) -> Option<DatumValue> + Send + Sync;

/// Reads one field from a datum record.
///
/// `Field` accepts dotted paths into nested objects (`"values.year"`); numeric
/// segments index into arrays. `Func` computes the value from the record.
#[derive(Clone)]
pub enum DataAccessor {
    Field(String),
    Func(Arc<AccessorFn>),
}

impl DataAccessor {
    #[must_use]
    pub fn field(path: impl Into<String>) -> Self {
        Self::Field(path.into())
    }

    #[must_use]
    pub fn func<F>(accessor: F) -> Self
    where
        F: Fn(&Value) -> Option<DatumValue> + Send + Sync + 'static,
    {
        Self::Func(Arc::new(accessor))
    }

    #[must_use]
    pub fn resolve(&self, datum: &Value) -> Option<DatumValue> {
        match self {
            Self::Field(path) => lookup_path(datum, path).and_then(DatumValue::from_json),
            Self::Func(accessor) => accessor(datum),
        }
    }

    pub fn require(&self, datum: &Value) -> ChartResult<DatumValue> {
        self.resolve(datum).ok_or_else(|| ChartError::MissingField {
            field: self.describe(),
        })
    }

    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Field(path) => path.clone(),
            Self::Func(_) => "<computed>".to_owned(),
        }
    }
}

impl fmt::Debug for DataAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(path) => f.debug_tuple("Field").field(path).finish(),
            Self::Func(_) => f.write_str("Func(..)"),
        }
    }
}

impl PartialEq for DataAccessor {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Field(left), Self::Field(right)) => left == right,
            (Self::Func(left), Self::Func(right)) => Arc::ptr_eq(left, right),
            _ => false,
        }
    }
}

impl From<&str> for DataAccessor {
    fn from(path: &str) -> Self {
        Self::field(path)
    }
}

impl Serialize for DataAccessor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Field(path) => serializer.serialize_str(path),
            Self::Func(_) => Err(ser::Error::custom(
                "computed data accessors cannot be serialized",
            )),
        }
    }
}

impl<'de> Deserialize<'de> for DataAccessor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldVisitor;

        impl Visitor<'_> for FieldVisitor {
            type Value = DataAccessor;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a field name or dotted field path")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                if value.is_empty() {
                    return Err(E::custom("data accessor path must not be empty"));
                }
                Ok(DataAccessor::field(value))
            }
        }

        deserializer.deserialize_str(FieldVisitor)
    }
}

fn lookup_path<'a>(datum: &'a Value, path: &str) -> Option<&'a Value> {
    if let Some(direct) = datum.get(path) {
        return Some(direct);
    }
    path.split('.').try_fold(datum, |node, segment| match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}
