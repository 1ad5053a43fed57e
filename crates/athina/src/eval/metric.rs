//! Metric values and their coercion to JSON
//!
//! Metrics attached to an eval result can be anything an evaluation step
//! produced. Before they are sent they are coerced to plain JSON:
//!
//! - primitives and mappings pass through ([`MetricValue::Json`])
//! - objects that know how to describe themselves go through [`ToDict`]
//! - other serializable objects contribute their field mapping
//! - everything else is sent as its string form

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

use crate::types::EvalResultMetric;

/// Types that describe themselves as a JSON mapping.
pub trait ToDict {
    /// Produce the mapping sent over the wire.
    fn to_dict(&self) -> Map<String, Value>;
}

/// A metric value awaiting serialization.
#[derive(Clone)]
pub enum MetricValue {
    /// Plain JSON: primitives and mappings, sent unchanged
    Json(Value),
    /// An object with its own mapping
    Dict(Arc<dyn ToDict + Send + Sync>),
    /// The field mapping of a serializable object
    Fields(Map<String, Value>),
    /// String form of anything else
    Text(String),
}

impl MetricValue {
    /// Wrap an object that implements [`ToDict`].
    pub fn dict<T>(value: T) -> Self
    where
        T: ToDict + Send + Sync + 'static,
    {
        MetricValue::Dict(Arc::new(value))
    }

    /// Coerce a serializable object.
    ///
    /// Structs and maps yield their field mapping, primitives pass through,
    /// and anything whose serialized form is neither falls back to its
    /// `Debug` string.
    pub fn from_fields<T: Serialize + fmt::Debug>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(Value::Object(fields)) => MetricValue::Fields(fields),
            Ok(primitive @ (Value::Bool(_) | Value::Number(_) | Value::String(_))) => {
                MetricValue::Json(primitive)
            }
            _ => MetricValue::Text(format!("{value:?}")),
        }
    }

    /// Send `value` as its string form.
    pub fn from_display<T: fmt::Display + ?Sized>(value: &T) -> Self {
        MetricValue::Text(value.to_string())
    }

    /// The JSON sent over the wire.
    pub fn to_json(&self) -> Value {
        match self {
            MetricValue::Json(value) => value.clone(),
            MetricValue::Dict(object) => Value::Object(object.to_dict()),
            MetricValue::Fields(fields) => Value::Object(fields.clone()),
            MetricValue::Text(text) => Value::String(text.clone()),
        }
    }
}

impl fmt::Debug for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Json(value) => f.debug_tuple("Json").field(value).finish(),
            MetricValue::Dict(object) => f.debug_tuple("Dict").field(&object.to_dict()).finish(),
            MetricValue::Fields(fields) => f.debug_tuple("Fields").field(fields).finish(),
            MetricValue::Text(text) => f.debug_tuple("Text").field(text).finish(),
        }
    }
}

impl Serialize for MetricValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl From<Value> for MetricValue {
    fn from(value: Value) -> Self {
        MetricValue::Json(value)
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        MetricValue::Json(Value::from(value))
    }
}

impl From<i64> for MetricValue {
    fn from(value: i64) -> Self {
        MetricValue::Json(Value::from(value))
    }
}

impl From<bool> for MetricValue {
    fn from(value: bool) -> Self {
        MetricValue::Json(Value::Bool(value))
    }
}

impl From<&str> for MetricValue {
    fn from(value: &str) -> Self {
        MetricValue::Json(Value::String(value.to_string()))
    }
}

impl From<String> for MetricValue {
    fn from(value: String) -> Self {
        MetricValue::Json(Value::String(value))
    }
}

impl From<&EvalResultMetric> for MetricValue {
    fn from(metric: &EvalResultMetric) -> Self {
        MetricValue::from_fields(metric)
    }
}

impl From<EvalResultMetric> for MetricValue {
    fn from(metric: EvalResultMetric) -> Self {
        MetricValue::from(&metric)
    }
}
