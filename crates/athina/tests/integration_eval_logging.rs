//! Eval-result logging pipeline against a mock server

mod common;

use assert_matches::assert_matches;
use athina::eval::{
    DevelopmentEvalConfig, EvalDefinition, EvalResultEntry, EvalResultsWithConfig,
};
use athina::types::{EvalResult, EvalResultMetric};
use athina::{Error, MetricValue, ToDict};
use pretty_assertions::assert_eq;
use serde::Serialize;
use serde_json::{Map, Value, json};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const LOG_PATH: &str = "/api/v1/eval_run/log-eval-results-sdk";

async fn mount_create_dataset(server: &MockServer, expected_name: &str) {
    Mock::given(method("POST"))
        .and(path("/api/v1/dataset_v2"))
        .and(body_partial_json(json!({
            "source": "dev_sdk",
            "name": expected_name,
            "description": format!("Dataset created for {}", expected_name)
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": {"dataset": {"id": "ds_eval", "name": expected_name}}
        })))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_log_results(server: &MockServer, times: u64) {
    Mock::given(method("POST"))
        .and(path(LOG_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
        .expect(times)
        .mount(server)
        .await;
}

async fn logged_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request: &&Request| request.url.path() == LOG_PATH)
        .map(|request| request.body_json::<Value>().unwrap())
        .collect()
}

fn result_row(display_name: &str, result: Value) -> Map<String, Value> {
    let mut row = Map::new();
    row.insert(format!("{}_athina_eval_result", display_name), result);
    row
}

fn config_for(eval: &EvalDefinition) -> DevelopmentEvalConfig {
    DevelopmentEvalConfig::for_eval(eval)
}

#[tokio::test]
async fn test_log_results_truncates_to_1000() {
    let mock_server = MockServer::start().await;
    mount_log_results(&mock_server, 1).await;

    let client = common::client_for(&mock_server);
    let eval = EvalDefinition::new("Faithfulness", "Faithfulness");
    let results = EvalResultsWithConfig {
        eval_results: (0..1500)
            .map(|i| EvalResultEntry {
                metrics: vec![json!({"id": "faithfulness", "value": 1.0}).into()],
                reason: Some(format!("row {}", i)),
            })
            .collect(),
        development_eval_config: config_for(&eval),
    };

    client
        .eval_runs()
        .log_eval_results_to_dataset("ds_1", &results)
        .await
        .unwrap();

    let bodies = logged_bodies(&mock_server).await;
    let sent = bodies[0]["eval_results"].as_array().unwrap();
    assert_eq!(sent.len(), 1000);
    assert_eq!(sent[999]["reason"], "row 999");
    assert_eq!(bodies[0]["dataset_id"], "ds_1");
}

#[tokio::test]
async fn test_log_results_strips_nulls() {
    let mock_server = MockServer::start().await;
    mount_log_results(&mock_server, 1).await;

    let client = common::client_for(&mock_server);
    let eval = EvalDefinition::new("Coherence", "Coherence");
    let results = EvalResultsWithConfig {
        eval_results: vec![
            EvalResultEntry::from_json(&json!({"metrics": [0.4], "reason": null})),
            EvalResultEntry::from_json(&json!({"reason": "clear structure"})),
        ],
        development_eval_config: config_for(&eval),
    };

    client
        .eval_runs()
        .log_eval_results_to_dataset("ds_1", &results)
        .await
        .unwrap();

    let bodies = logged_bodies(&mock_server).await;
    assert_eq!(
        bodies[0],
        json!({
            "dataset_id": "ds_1",
            "development_eval_config": {
                "eval_type_id": "Coherence",
                "eval_display_name": "Coherence"
            },
            "eval_results": [
                {"metrics": [0.4]},
                {"metrics": [], "reason": "clear structure"}
            ]
        })
    );
}

struct Precision {
    hits: u32,
    total: u32,
}

impl ToDict for Precision {
    fn to_dict(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("id".to_string(), json!("precision"));
        map.insert("value".to_string(), json!(self.hits as f64 / self.total as f64));
        map
    }
}

#[derive(Debug, Serialize)]
struct TokenUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[tokio::test]
async fn test_metric_coercion_on_the_wire() {
    let mock_server = MockServer::start().await;
    mount_log_results(&mock_server, 1).await;

    let client = common::client_for(&mock_server);
    let eval = EvalDefinition::new("ContextPrecision", "Context Precision");
    let results = EvalResultsWithConfig {
        eval_results: vec![EvalResultEntry {
            metrics: vec![
                MetricValue::from(json!({"id": "m1", "value": 0.5})),
                MetricValue::dict(Precision { hits: 1, total: 4 }),
                MetricValue::from_fields(&TokenUsage {
                    prompt_tokens: 120,
                    completion_tokens: 30,
                }),
                MetricValue::from_display(&std::net::Ipv4Addr::new(10, 0, 0, 1)),
                MetricValue::from(0.9),
            ],
            reason: None,
        }],
        development_eval_config: config_for(&eval),
    };

    client
        .eval_runs()
        .log_eval_results_to_dataset("ds_1", &results)
        .await
        .unwrap();

    let bodies = logged_bodies(&mock_server).await;
    assert_eq!(
        bodies[0]["eval_results"][0]["metrics"],
        json!([
            {"id": "m1", "value": 0.5},
            {"id": "precision", "value": 0.25},
            {"prompt_tokens": 120, "completion_tokens": 30},
            "10.0.0.1",
            0.9
        ])
    );
}

#[tokio::test]
async fn test_log_failure_is_returned() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(LOG_PATH))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "error": "Invalid eval results",
            "details": {"message": "eval_type_id is required"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = common::client_for(&mock_server);
    let err = client
        .eval_runs()
        .log_eval_results_with_config(&json!({"dataset_id": "ds_1", "eval_results": []}))
        .await
        .unwrap_err();

    assert_matches!(
        err,
        Error::ApiError { status: 422, ref details, .. }
            if details.as_deref() == Some("eval_type_id is required")
    );
}

#[tokio::test]
async fn test_create_dataset_and_log_results_default_name() {
    let mock_server = MockServer::start().await;
    mount_create_dataset(&mock_server, "Batch Eval: Faithfulness, Coherence").await;
    mount_log_results(&mock_server, 2).await;

    let client = common::client_for(&mock_server);
    let faithfulness = EvalDefinition::new("Faithfulness", "Faithfulness Check")
        .with_llm_engine("gpt-4o");
    let coherence = EvalDefinition::new("Coherence", "Coherence Check")
        .with_config(json!({"threshold": 0.7}));

    let rows = vec![result_row("query", json!("What is Rust?"))];
    let mut results_row = result_row(
        "Faithfulness Check",
        json!({"metrics": [{"id": "faithfulness", "value": 1.0}], "reason": "supported"}),
    );
    results_row.insert(
        "Coherence Check_athina_eval_result".to_string(),
        json!({"metrics": [{"id": "coherence", "value": 0.5}], "reason": null}),
    );

    let run = client
        .eval_logger()
        .create_dataset_and_log_results(rows, None, &[&faithfulness, &coherence], &[results_row])
        .await
        .unwrap();

    assert_eq!(run.dataset.id, "ds_eval");
    assert_eq!(run.view_url, "https://app.athina.test/develop/ds_eval");

    let bodies = logged_bodies(&mock_server).await;
    assert_eq!(bodies.len(), 2);
    assert_eq!(
        bodies[0]["development_eval_config"],
        json!({
            "eval_type_id": "Faithfulness",
            "eval_display_name": "Faithfulness Check",
            "llm_engine": "gpt-4o"
        })
    );
    assert_eq!(bodies[0]["eval_results"][0]["reason"], "supported");
    assert_eq!(
        bodies[1]["development_eval_config"]["eval_config"],
        json!({"threshold": 0.7})
    );
    assert_eq!(
        bodies[1]["eval_results"],
        json!([{"metrics": [{"id": "coherence", "value": 0.5}]}])
    );
}

#[tokio::test]
async fn test_create_dataset_and_log_results_explicit_name() {
    let mock_server = MockServer::start().await;
    mount_create_dataset(&mock_server, "nightly-rag").await;
    mount_log_results(&mock_server, 1).await;

    let client = common::client_for(&mock_server);
    let eval = EvalDefinition::new("Faithfulness", "Faithfulness");
    let result = EvalResult {
        name: "Faithfulness".into(),
        display_name: "Faithfulness".into(),
        score: 0.5,
        passed: false,
        explanation: "half the claims are unsupported".into(),
        runtime_ms: 830,
        metrics: vec![EvalResultMetric::new("faithfulness", 0.5)],
    };
    let results_row = result_row("Faithfulness", serde_json::to_value(&result).unwrap());

    let run = client
        .eval_logger()
        .create_dataset_and_log_results(
            Vec::new(),
            Some("nightly-rag".to_string()),
            &[&eval],
            &[results_row],
        )
        .await
        .unwrap();

    assert_eq!(run.dataset.name, "nightly-rag");
    let bodies = logged_bodies(&mock_server).await;
    assert_eq!(
        bodies[0]["eval_results"][0],
        json!({
            "metrics": [{"id": "faithfulness", "value": 0.5}],
        })
    );
}

#[tokio::test]
async fn test_missing_result_key_sends_nothing() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = common::client_for(&mock_server);
    let eval = EvalDefinition::new("Faithfulness", "Faithfulness");

    let result = client
        .eval_logger()
        .create_dataset_and_log_results(
            Vec::new(),
            None,
            &[&eval],
            &[result_row("Coherence", json!({}))],
        )
        .await;

    assert_matches!(result, Err(Error::InvalidRequest(_)));
}

#[tokio::test]
async fn test_dataset_failure_stops_pipeline() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/dataset_v2"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "Invalid API key"})))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_log_results(&mock_server, 0).await;

    let client = common::client_for(&mock_server);
    let eval = EvalDefinition::new("Faithfulness", "Faithfulness");

    let result = client
        .eval_logger()
        .create_dataset_and_log_results(
            Vec::new(),
            None,
            &[&eval],
            &[result_row("Faithfulness", json!({"metrics": []}))],
        )
        .await;

    assert_matches!(result, Err(Error::Unauthorized { .. }));
}

#[tokio::test]
async fn test_eval_result_converts_with_explanation_as_reason() {
    let mock_server = MockServer::start().await;
    mount_log_results(&mock_server, 1).await;

    let client = common::client_for(&mock_server);
    let eval = EvalDefinition::new("Faithfulness", "Faithfulness");
    let result = EvalResult {
        name: "Faithfulness".into(),
        display_name: "Faithfulness".into(),
        score: 1.0,
        passed: true,
        explanation: "all claims supported".into(),
        runtime_ms: 410,
        metrics: vec![EvalResultMetric::new("faithfulness", 1.0)],
    };
    let results = EvalResultsWithConfig {
        eval_results: vec![result.into()],
        development_eval_config: config_for(&eval),
    };

    client
        .eval_runs()
        .log_eval_results_to_dataset("ds_1", &results)
        .await
        .unwrap();

    let bodies = logged_bodies(&mock_server).await;
    assert_eq!(
        bodies[0]["eval_results"][0],
        json!({
            "metrics": [{"id": "faithfulness", "value": 1.0}],
            "reason": "all claims supported"
        })
    );
}
