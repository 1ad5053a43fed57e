//! Eval-run logging endpoint

use std::sync::Arc;

use serde_json::Value;
use tracing::error;

use super::Resource;
use crate::{
    error::Result,
    eval::EvalResultsWithConfig,
    http::{Call, Executor},
};

const LOG_RESULTS_PATH: &str = "/api/v1/eval_run/log-eval-results-sdk";

/// Eval-run logging resource.
#[derive(Clone)]
pub struct EvalRuns {
    executor: Arc<Executor>,
}

impl EvalRuns {
    pub(crate) fn new(executor: Arc<Executor>) -> Self {
        Self { executor }
    }

    /// Send a prepared logging body as is. Returns the server's JSON.
    pub async fn log_eval_results_with_config(&self, payload: &Value) -> Result<Value> {
        let call = Call::post(LOG_RESULTS_PATH).json(payload)?.allow_created();

        self.executor
            .execute(call)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to log eval results"))
    }

    /// Log one evaluation's results against a dataset.
    ///
    /// At most [`MAX_LOGGED_RESULTS`](crate::eval::MAX_LOGGED_RESULTS)
    /// results are sent. Null fields are removed from every result and
    /// from the evaluation config.
    pub async fn log_eval_results_to_dataset(
        &self,
        dataset_id: &str,
        results: &EvalResultsWithConfig,
    ) -> Result<Value> {
        let payload = results.to_payload(dataset_id);

        self.log_eval_results_with_config(&payload)
            .await
            .inspect_err(|e| {
                error!(
                    dataset_id,
                    eval = %results.development_eval_config.eval_type_id,
                    error = %e,
                    "Failed to log eval results to dataset"
                )
            })
    }
}

impl Resource for EvalRuns {
    fn executor(&self) -> &Executor {
        &self.executor
    }
}
