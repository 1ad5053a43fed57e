//! Evaluation result value types

use serde::{Deserialize, Serialize};

/// A named numeric metric produced by an evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalResultMetric {
    /// Metric identifier
    pub id: String,
    /// Metric value
    pub value: f64,
}

impl EvalResultMetric {
    /// Create a metric.
    pub fn new(id: impl Into<String>, value: f64) -> Self {
        Self {
            id: id.into(),
            value,
        }
    }
}

/// Outcome of running one evaluation on one row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalResult {
    /// Evaluation type name
    pub name: String,
    /// Human-readable evaluation name
    pub display_name: String,
    /// Overall score
    pub score: f64,
    /// Whether the row passed
    pub passed: bool,
    /// Why the evaluation decided as it did
    pub explanation: String,
    /// Wall time of the evaluation in milliseconds
    #[serde(alias = "runtime")]
    pub runtime_ms: u64,
    /// Individual metrics
    #[serde(default)]
    pub metrics: Vec<EvalResultMetric>,
}
