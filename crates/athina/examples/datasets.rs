//! Example managing datasets with the Athina SDK
//!
//! This example shows how to:
//! 1. Create a dataset with a few rows
//! 2. Append more rows
//! 3. Fetch it back by name, one page at a time
//! 4. Delete it
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
//! cargo run --example datasets
//! ```

use athina::Client;
use athina::types::{CreateDatasetRequest, DatasetRow, FetchDatasetParams};
use serde_json::json;

fn row(query: &str, response: &str) -> DatasetRow {
    let mut row = DatasetRow::new();
    row.insert("query".to_string(), json!(query));
    row.insert("response".to_string(), json!(response));
    row
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "athina=info".into()),
        )
        .init();

    // Reads ATHINA_API_KEY and the optional base URL overrides
    let client = Client::from_env()?;

    let request = CreateDatasetRequest::builder()
        .name("support-questions")
        .description("Questions from the support inbox")
        .dataset_rows(vec![row(
            "How do I reset my password?",
            "Use the reset link on the login page.",
        )])
        .build()?;
    let dataset = client.datasets().create(&request).await?;
    println!("Created dataset {} ({})", dataset.name, dataset.id);

    client
        .datasets()
        .add_rows(
            &dataset.id,
            vec![row("Can I export my data?", "Yes, from Settings > Export.")],
        )
        .await?;

    let params = FetchDatasetParams::default().limit(50);
    let details = client.datasets().get_by_name(&dataset.name, params).await?;
    for row in &details.dataset_rows {
        println!("  {}", row["query"]);
    }

    let message = client.datasets().delete(&dataset.id).await?;
    println!("{}", message);

    Ok(())
}
