//! Evaluation definitions and eval-result payloads
//!
//! An [`Eval`] describes an evaluation that ran outside this SDK. Its
//! results are logged against a dataset as an [`EvalResultsWithConfig`]:
//! the per-row results plus a [`DevelopmentEvalConfig`] describing the
//! evaluation. [`EvalResultsWithConfig::to_payload`] builds the body the
//! logging endpoint expects.

use serde_json::{Map, Value};
use tracing::warn;

pub mod logger;
pub mod metric;

pub use logger::{EvalLogger, LoggedEvalRun};
pub use metric::{MetricValue, ToDict};

use crate::types::EvalResult;

/// Maximum number of results sent per evaluation. Extra rows are dropped.
pub const MAX_LOGGED_RESULTS: usize = 1000;

/// An evaluation whose results can be logged.
pub trait Eval: Send + Sync {
    /// Evaluation type identifier
    fn name(&self) -> &str;

    /// Human-readable name; also keys the evaluation's column in result rows
    fn display_name(&self) -> &str;

    /// Optional description
    fn description(&self) -> Option<&str> {
        None
    }

    /// Portable configuration of the evaluation
    fn to_config(&self) -> Option<Value> {
        None
    }

    /// Model the evaluation ran with
    fn llm_engine(&self) -> Option<&str> {
        None
    }
}

/// A plain-data [`Eval`].
#[derive(Debug, Clone, PartialEq)]
pub struct EvalDefinition {
    name: String,
    display_name: String,
    description: Option<String>,
    config: Option<Value>,
    llm_engine: Option<String>,
}

impl EvalDefinition {
    /// Describe an evaluation by name and display name.
    pub fn new(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            description: None,
            config: None,
            llm_engine: None,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the portable configuration.
    pub fn with_config(mut self, config: Value) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the model the evaluation ran with.
    pub fn with_llm_engine(mut self, llm_engine: impl Into<String>) -> Self {
        self.llm_engine = Some(llm_engine.into());
        self
    }
}

impl Eval for EvalDefinition {
    fn name(&self) -> &str {
        &self.name
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn to_config(&self) -> Option<Value> {
        self.config.clone()
    }

    fn llm_engine(&self) -> Option<&str> {
        self.llm_engine.as_deref()
    }
}

/// Dataset name used when none is given: `"Batch Eval: A, B"`.
pub fn batch_dataset_name(evals: &[&dyn Eval]) -> String {
    let names: Vec<&str> = evals.iter().map(|eval| eval.name()).collect();
    format!("Batch Eval: {}", names.join(", "))
}

/// Drop every entry whose value is null. Only the top level is touched.
pub fn strip_nulls(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter().filter(|(_, value)| !value.is_null()).collect()
}

/// The result of one evaluation on one row, as sent to the logging endpoint.
#[derive(Debug, Clone, Default)]
pub struct EvalResultEntry {
    /// Metrics, coerced to JSON on send
    pub metrics: Vec<MetricValue>,
    /// Explanation of the result
    pub reason: Option<String>,
}

impl EvalResultEntry {
    /// Read an entry from a result mapping with optional `metrics` and
    /// `reason` keys.
    pub fn from_json(value: &Value) -> Self {
        let metrics = value
            .get("metrics")
            .and_then(Value::as_array)
            .map(|metrics| metrics.iter().cloned().map(MetricValue::Json).collect())
            .unwrap_or_default();

        let reason = match value.get("reason") {
            None | Some(Value::Null) => None,
            Some(Value::String(reason)) => Some(reason.clone()),
            Some(other) => Some(other.to_string()),
        };

        Self { metrics, reason }
    }

    /// The wire object `{metrics, reason}` with null fields removed.
    pub fn to_wire(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert(
            "metrics".to_string(),
            Value::Array(self.metrics.iter().map(MetricValue::to_json).collect()),
        );
        map.insert(
            "reason".to_string(),
            self.reason.clone().map(Value::String).unwrap_or(Value::Null),
        );
        strip_nulls(map)
    }
}

impl From<EvalResult> for EvalResultEntry {
    fn from(result: EvalResult) -> Self {
        Self {
            metrics: result.metrics.into_iter().map(MetricValue::from).collect(),
            reason: Some(result.explanation),
        }
    }
}

/// Describes the evaluation a batch of results came from.
#[derive(Debug, Clone, PartialEq)]
pub struct DevelopmentEvalConfig {
    /// Evaluation type identifier
    pub eval_type_id: String,
    /// Human-readable evaluation name
    pub eval_display_name: String,
    /// Portable configuration
    pub eval_config: Option<Value>,
    /// Model the evaluation ran with
    pub llm_engine: Option<String>,
}

impl DevelopmentEvalConfig {
    /// Describe `eval`.
    pub fn for_eval(eval: &dyn Eval) -> Self {
        Self {
            eval_type_id: eval.name().to_string(),
            eval_display_name: eval.display_name().to_string(),
            eval_config: eval.to_config(),
            llm_engine: eval.llm_engine().map(str::to_string),
        }
    }

    /// The wire object with null fields removed.
    pub fn to_wire(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("eval_type_id".to_string(), Value::String(self.eval_type_id.clone()));
        map.insert(
            "eval_display_name".to_string(),
            Value::String(self.eval_display_name.clone()),
        );
        map.insert(
            "eval_config".to_string(),
            self.eval_config.clone().unwrap_or(Value::Null),
        );
        map.insert(
            "llm_engine".to_string(),
            self.llm_engine.clone().map(Value::String).unwrap_or(Value::Null),
        );
        strip_nulls(map)
    }
}

/// Results of one evaluation plus its description.
#[derive(Debug, Clone)]
pub struct EvalResultsWithConfig {
    /// One entry per row
    pub eval_results: Vec<EvalResultEntry>,
    /// The evaluation the results came from
    pub development_eval_config: DevelopmentEvalConfig,
}

impl EvalResultsWithConfig {
    /// Build the logging body `{dataset_id, development_eval_config,
    /// eval_results}`.
    ///
    /// Only the first [`MAX_LOGGED_RESULTS`] results are included; a warning
    /// is logged when rows are dropped.
    pub fn to_payload(&self, dataset_id: &str) -> Value {
        let total = self.eval_results.len();
        if total > MAX_LOGGED_RESULTS {
            warn!(
                dataset_id,
                eval = %self.development_eval_config.eval_type_id,
                total,
                sent = MAX_LOGGED_RESULTS,
                "Truncating eval results"
            );
        }

        let eval_results: Vec<Value> = self
            .eval_results
            .iter()
            .take(MAX_LOGGED_RESULTS)
            .map(|entry| Value::Object(entry.to_wire()))
            .collect();

        let mut payload = Map::new();
        payload.insert("dataset_id".to_string(), Value::String(dataset_id.to_string()));
        payload.insert(
            "development_eval_config".to_string(),
            Value::Object(self.development_eval_config.to_wire()),
        );
        payload.insert("eval_results".to_string(), Value::Array(eval_results));
        Value::Object(payload)
    }
}
