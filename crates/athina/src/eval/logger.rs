//! Create a dataset and log evaluation results against it

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{error, info};

use super::{DevelopmentEvalConfig, Eval, EvalResultEntry, EvalResultsWithConfig, batch_dataset_name};
use crate::{
    error::{Error, Result},
    http::Executor,
    resources::{Datasets, EvalRuns, Resource},
    types::{CreateDatasetRequest, Dataset, DatasetRow},
};

/// Outcome of [`EvalLogger::create_dataset_and_log_results`].
#[derive(Debug, Clone, PartialEq)]
pub struct LoggedEvalRun {
    /// The dataset the results were logged against
    pub dataset: Dataset,
    /// Link to the results in the web application
    pub view_url: String,
}

/// Logs evaluation runs: one dataset, one logging call per evaluation.
#[derive(Clone)]
pub struct EvalLogger {
    datasets: Datasets,
    eval_runs: EvalRuns,
    app_base_url: String,
}

impl EvalLogger {
    pub(crate) fn new(executor: Arc<Executor>, app_base_url: String) -> Self {
        Self {
            datasets: Datasets::new(executor.clone()),
            eval_runs: EvalRuns::new(executor),
            app_base_url,
        }
    }

    /// Create a dataset from `rows` and log each evaluation's results.
    ///
    /// Every row of `eval_results` must hold the result of each evaluation
    /// under `"{display_name}_athina_eval_result"`. Rows are checked before
    /// anything is sent, so a missing key creates no dataset.
    ///
    /// When `dataset_name` is `None` the name is built from the evaluation
    /// names (`"Batch Eval: A, B"`). Evaluations are logged one after the
    /// other; the first failure is returned and nothing is rolled back.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use athina::{Client, eval::EvalDefinition};
    /// # use serde_json::{json, Map, Value};
    /// # async fn example() -> athina::Result<()> {
    /// let client = Client::try_new("athina-key")?;
    /// let faithfulness = EvalDefinition::new("Faithfulness", "Faithfulness");
    ///
    /// let rows = vec![Map::from_iter([("query".to_string(), json!("What is Rust?"))])];
    /// let results = vec![Map::from_iter([(
    ///     "Faithfulness_athina_eval_result".to_string(),
    ///     json!({"metrics": [{"id": "faithfulness", "value": 1.0}], "reason": "supported"}),
    /// )])];
    ///
    /// let run = client
    ///     .eval_logger()
    ///     .create_dataset_and_log_results(rows, None, &[&faithfulness], &results)
    ///     .await?;
    /// println!("{}", run.view_url);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create_dataset_and_log_results(
        &self,
        rows: Vec<DatasetRow>,
        dataset_name: Option<String>,
        evals: &[&dyn Eval],
        eval_results: &[Map<String, Value>],
    ) -> Result<LoggedEvalRun> {
        let batches = evals
            .iter()
            .map(|eval| collect_results(*eval, eval_results))
            .collect::<Result<Vec<_>>>()?;

        let dataset_name = dataset_name.unwrap_or_else(|| batch_dataset_name(evals));
        let request = CreateDatasetRequest {
            description: Some(format!("Dataset created for {}", dataset_name)),
            name: dataset_name,
            language_model_id: None,
            prompt_template: None,
            dataset_rows: rows,
        };
        let dataset = self.datasets.create(&request).await?;

        for batch in &batches {
            self.eval_runs
                .log_eval_results_to_dataset(&dataset.id, batch)
                .await?;
        }

        let view_url = format!("{}/develop/{}", self.app_base_url, dataset.id);
        info!(dataset_id = %dataset.id, url = %view_url, "View the results at {}", view_url);

        Ok(LoggedEvalRun { dataset, view_url })
    }
}

impl Resource for EvalLogger {
    fn executor(&self) -> &Executor {
        self.datasets.executor()
    }
}

/// Pull one evaluation's results out of the result rows.
fn collect_results(eval: &dyn Eval, eval_results: &[Map<String, Value>]) -> Result<EvalResultsWithConfig> {
    let key = format!("{}_athina_eval_result", eval.display_name());

    let entries = eval_results
        .iter()
        .enumerate()
        .map(|(index, row)| {
            row.get(&key).map(EvalResultEntry::from_json).ok_or_else(|| {
                error!(eval = eval.name(), row = index, key = %key, "Eval result missing");
                Error::InvalidRequest(format!("row {} has no `{}` entry", index, key))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(EvalResultsWithConfig {
        eval_results: entries,
        development_eval_config: DevelopmentEvalConfig::for_eval(eval),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::EvalDefinition;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn row(key: &str, value: Value) -> Map<String, Value> {
        Map::from_iter([(key.to_string(), value)])
    }

    #[test]
    fn test_collect_results_reads_display_name_key() {
        let eval = EvalDefinition::new("faithfulness", "Faithfulness");
        let rows = vec![
            row("Faithfulness_athina_eval_result", json!({"reason": "a"})),
            row("Faithfulness_athina_eval_result", json!({"reason": "b"})),
        ];

        let batch = collect_results(&eval, &rows).unwrap();
        assert_eq!(batch.eval_results.len(), 2);
        assert_eq!(batch.eval_results[1].reason.as_deref(), Some("b"));
        assert_eq!(batch.development_eval_config.eval_type_id, "faithfulness");
    }

    #[test]
    fn test_collect_results_missing_key() {
        let eval = EvalDefinition::new("coherence", "Coherence");
        let rows = vec![row("Faithfulness_athina_eval_result", json!({}))];

        assert_matches!(
            collect_results(&eval, &rows),
            Err(Error::InvalidRequest(msg)) if msg.contains("Coherence_athina_eval_result")
        );
    }
}
