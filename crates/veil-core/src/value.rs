//! The PII payload type.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Error;

/// The payload of a personal data record.
///
/// A closed variant rather than an open dynamic type, so that encryption and
/// serialisation in backends stay total and exhaustive. Serialises untagged
/// to plain JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PiiValue {
  Text(String),
  Integer(i64),
  Float(f64),
  Bool(bool),
  /// Ordered sequence of nested values.
  Sequence(Vec<PiiValue>),
  /// String-keyed mapping of nested values, ordered by key.
  Mapping(BTreeMap<String, PiiValue>),
}

impl PiiValue {
  pub fn as_text(&self) -> Option<&str> {
    match self {
      Self::Text(s) => Some(s),
      _ => None,
    }
  }
}

impl From<&str> for PiiValue {
  fn from(value: &str) -> Self { Self::Text(value.to_owned()) }
}

impl From<String> for PiiValue {
  fn from(value: String) -> Self { Self::Text(value) }
}

impl From<i64> for PiiValue {
  fn from(value: i64) -> Self { Self::Integer(value) }
}

impl From<f64> for PiiValue {
  fn from(value: f64) -> Self { Self::Float(value) }
}

impl From<bool> for PiiValue {
  fn from(value: bool) -> Self { Self::Bool(value) }
}

impl<V: Into<PiiValue>> From<Vec<V>> for PiiValue {
  fn from(values: Vec<V>) -> Self {
    Self::Sequence(values.into_iter().map(Into::into).collect())
  }
}

/// Dynamic intake path for callers holding arbitrary JSON. `null` has no
/// counterpart in the closed variant and is rejected.
impl TryFrom<serde_json::Value> for PiiValue {
  type Error = Error;

  fn try_from(value: serde_json::Value) -> Result<Self, Error> {
    use serde_json::Value;

    Ok(match value {
      Value::Null => {
        return Err(Error::InvalidArgument(
          "personal data values cannot be null".into(),
        ));
      }
      Value::Bool(b) => Self::Bool(b),
      Value::Number(n) => match n.as_i64() {
        Some(i) => Self::Integer(i),
        None => match n.as_f64() {
          Some(f) => Self::Float(f),
          None => {
            return Err(Error::InvalidArgument(format!(
              "unrepresentable number: {n}"
            )));
          }
        },
      },
      Value::String(s) => Self::Text(s),
      Value::Array(items) => Self::Sequence(
        items
          .into_iter()
          .map(Self::try_from)
          .collect::<Result<_, _>>()?,
      ),
      Value::Object(entries) => Self::Mapping(
        entries
          .into_iter()
          .map(|(k, v)| Ok((k, Self::try_from(v)?)))
          .collect::<Result<_, Error>>()?,
      ),
    })
  }
}

impl From<PiiValue> for serde_json::Value {
  fn from(value: PiiValue) -> Self {
    match value {
      PiiValue::Text(s) => Self::String(s),
      PiiValue::Integer(i) => Self::from(i),
      PiiValue::Float(f) => Self::from(f),
      PiiValue::Bool(b) => Self::Bool(b),
      PiiValue::Sequence(items) => {
        Self::Array(items.into_iter().map(Self::from).collect())
      }
      PiiValue::Mapping(entries) => Self::Object(
        entries.into_iter().map(|(k, v)| (k, Self::from(v))).collect(),
      ),
    }
  }
}
