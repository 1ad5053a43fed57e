//! Example logging evaluation results with the Athina SDK
//!
//! Runs two toy evaluations locally, then creates a dataset from the rows
//! and logs both evaluations' results against it.
//!
//! # Prerequisites
//!
//! Set your API key:
//! ```bash
//! export ATHINA_API_KEY=...
//! ```
//!
//! # Usage
//!
//! ```bash
//! cargo run --example eval_logging
//! ```

use athina::eval::{Eval, EvalDefinition, EvalResultEntry};
use athina::types::{DatasetRow, EvalResult, EvalResultMetric};
use athina::{Client, MetricValue};
use serde_json::{Map, Value, json};

/// Scores a response by whether it mentions every word of the query.
fn keyword_overlap(eval: &dyn Eval, query: &str, response: &str) -> EvalResult {
    let words: Vec<&str> = query.split_whitespace().collect();
    let hits = words
        .iter()
        .filter(|w| response.to_lowercase().contains(&w.to_lowercase()))
        .count();
    let score = hits as f64 / words.len().max(1) as f64;

    EvalResult {
        name: eval.name().to_string(),
        display_name: eval.display_name().to_string(),
        score,
        passed: score >= 0.5,
        explanation: format!("{} of {} query words found", hits, words.len()),
        runtime_ms: 0,
        metrics: vec![EvalResultMetric::new("keyword_overlap", score)],
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "athina=info".into()),
        )
        .init();

    let client = Client::from_env()?;

    let overlap = EvalDefinition::new("KeywordOverlap", "Keyword Overlap")
        .with_description("Fraction of query words present in the response");
    let length = EvalDefinition::new("ResponseLength", "Response Length")
        .with_config(json!({"max_chars": 200}));

    let samples = [
        ("reset password", "Use the reset link to change your password."),
        ("export data", "Go to Settings."),
    ];

    let mut rows: Vec<DatasetRow> = Vec::new();
    let mut eval_results: Vec<Map<String, Value>> = Vec::new();
    for (query, response) in samples {
        let mut row = DatasetRow::new();
        row.insert("query".to_string(), json!(query));
        row.insert("response".to_string(), json!(response));
        rows.push(row);

        let overlap_entry = EvalResultEntry::from(keyword_overlap(&overlap, query, response));
        let length_entry = EvalResultEntry {
            metrics: vec![MetricValue::from(response.len() as i64)],
            reason: (response.len() > 200).then(|| "too long".to_string()),
        };

        let mut results = Map::new();
        for (eval, entry) in [(&overlap, overlap_entry), (&length, length_entry)] {
            results.insert(
                format!("{}_athina_eval_result", eval.display_name()),
                Value::Object(entry.to_wire()),
            );
        }
        eval_results.push(results);
    }

    let run = client
        .eval_logger()
        .create_dataset_and_log_results(rows, None, &[&overlap, &length], &eval_results)
        .await?;

    println!("Logged to dataset {}", run.dataset.id);
    println!("View the results at {}", run.view_url);
    Ok(())
}
