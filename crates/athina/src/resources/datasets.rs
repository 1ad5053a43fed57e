//! Datasets API endpoint

use std::sync::Arc;

use serde_json::{Value, json};

use super::Resource;
use crate::{
    error::Result,
    http::{Call, Executor},
    types::{CreateDatasetRequest, Dataset, DatasetDetails, DatasetRow, FetchDatasetParams},
    types::dataset::CreateDatasetBody,
};

const BASE_PATH: &str = "/api/v1/dataset_v2";

/// Datasets API resource.
///
/// # Example
///
/// ```rust,no_run
/// # use athina::{Client, types::CreateDatasetRequest};
/// # async fn example() -> athina::Result<()> {
/// let client = Client::try_new("athina-key")?;
///
/// let request = CreateDatasetRequest::builder()
///     .name("support-questions")
///     .build()
///     .unwrap();
/// let dataset = client.datasets().create(&request).await?;
///
/// for dataset in client.datasets().list().await? {
///     println!("{} {}", dataset.id, dataset.name);
/// }
/// # let _ = dataset;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Datasets {
    executor: Arc<Executor>,
}

impl Datasets {
    pub(crate) fn new(executor: Arc<Executor>) -> Self {
        Self { executor }
    }

    /// Create a dataset.
    pub async fn create(&self, request: &CreateDatasetRequest) -> Result<Dataset> {
        let call = Call::post(BASE_PATH)
            .json(&CreateDatasetBody::from(request))?
            .allow_created()
            .extract(&["data", "dataset"]);

        self.executor.execute_as(call).await
    }

    /// Append rows to a dataset. Returns the server's `data` payload.
    pub async fn add_rows(&self, dataset_id: &str, rows: Vec<DatasetRow>) -> Result<Value> {
        let call = Call::post(BASE_PATH)
            .segment(dataset_id)
            .segment("add-rows")
            .json(&json!({ "dataset_rows": rows }))?
            .allow_created()
            .extract(&["data"]);

        self.executor.execute(call).await
    }

    /// List all datasets.
    pub async fn list(&self) -> Result<Vec<Dataset>> {
        let call = Call::get(BASE_PATH).segment("all").extract(&["datasets"]);

        self.executor.execute_as(call).await
    }

    /// Delete a dataset. Returns the server's confirmation message.
    pub async fn delete(&self, dataset_id: &str) -> Result<String> {
        let call = Call::delete(BASE_PATH)
            .segment(dataset_id)
            .extract(&["data", "message"]);

        self.executor.execute_as(call).await
    }

    /// Fetch a dataset and a page of its rows by id.
    pub async fn get_by_id(
        &self,
        dataset_id: &str,
        params: FetchDatasetParams,
    ) -> Result<DatasetDetails> {
        let call = with_params(
            Call::post(BASE_PATH)
                .segment("fetch-by-id")
                .segment(dataset_id),
            params,
        )
        .extract(&["data"]);

        self.executor.execute_as(call).await
    }

    /// Fetch a dataset and a page of its rows by name.
    pub async fn get_by_name(
        &self,
        name: &str,
        params: FetchDatasetParams,
    ) -> Result<DatasetDetails> {
        let call = with_params(Call::post(BASE_PATH).segment("fetch-by-name"), params)
            .json(&json!({ "name": name }))?
            .extract(&["data"]);

        self.executor.execute_as(call).await
    }
}

impl Resource for Datasets {
    fn executor(&self) -> &Executor {
        &self.executor
    }
}

fn with_params(call: Call, params: FetchDatasetParams) -> Call {
    params
        .to_query()
        .into_iter()
        .fold(call, |call, (key, value)| call.query(key, value))
}
