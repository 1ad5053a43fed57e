//! Dataset types

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Source tag sent with every dataset created through this SDK.
pub const DATASET_SOURCE: &str = "dev_sdk";

/// One dataset row: column name to cell value.
pub type DatasetRow = Map<String, Value>;

/// A dataset as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Server-assigned identifier
    pub id: String,

    /// Dataset name
    pub name: String,

    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Where the dataset came from (`dev_sdk` for datasets created here)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Model the dataset's responses were produced with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_model_id: Option<String>,

    /// Prompt template the dataset's responses were produced with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_template: Option<Value>,

    /// Creation timestamp as reported by the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    /// Fields this SDK does not model
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A dataset together with (a page of) its rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetDetails {
    /// Dataset metadata
    pub dataset: Dataset,

    /// Rows, empty when fetched without rows
    #[serde(default)]
    pub dataset_rows: Vec<DatasetRow>,

    /// Fields this SDK does not model
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Request to create a dataset.
///
/// # Example
///
/// ```rust
/// use athina::types::CreateDatasetRequest;
///
/// let request = CreateDatasetRequest::builder()
///     .name("golden-set")
///     .description("Curated support questions")
///     .build()
///     .unwrap();
/// assert!(request.dataset_rows.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[builder(setter(into, strip_option))]
pub struct CreateDatasetRequest {
    /// Dataset name
    pub name: String,

    /// Free-form description
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub description: Option<String>,

    /// Model the rows' responses were produced with
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub language_model_id: Option<String>,

    /// Prompt template the rows' responses were produced with
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub prompt_template: Option<Value>,

    /// Initial rows
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default)]
    pub dataset_rows: Vec<DatasetRow>,
}

impl CreateDatasetRequest {
    /// Create a builder for constructing a CreateDatasetRequest.
    pub fn builder() -> CreateDatasetRequestBuilder {
        CreateDatasetRequestBuilder::default()
    }
}

/// Wire body for dataset creation: the request plus the fixed source tag.
#[derive(Debug, Serialize)]
pub(crate) struct CreateDatasetBody<'a> {
    pub source: &'static str,
    #[serde(flatten)]
    pub request: &'a CreateDatasetRequest,
}

impl<'a> From<&'a CreateDatasetRequest> for CreateDatasetBody<'a> {
    fn from(request: &'a CreateDatasetRequest) -> Self {
        Self {
            source: DATASET_SOURCE,
            request,
        }
    }
}

/// Paging for dataset fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchDatasetParams {
    /// Index of the first row
    pub offset: u64,
    /// Maximum number of rows
    pub limit: u64,
    /// Whether rows are returned at all
    pub include_dataset_rows: bool,
}

impl Default for FetchDatasetParams {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 1000,
            include_dataset_rows: true,
        }
    }
}

impl FetchDatasetParams {
    /// Set the row offset.
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// Set the row limit.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    /// Fetch metadata only.
    pub fn without_rows(mut self) -> Self {
        self.include_dataset_rows = false;
        self
    }

    /// Query pairs in the form the API expects.
    pub fn to_query(self) -> Vec<(&'static str, String)> {
        vec![
            ("offset", self.offset.to_string()),
            ("limit", self.limit.to_string()),
            ("include_dataset_rows", self.include_dataset_rows.to_string()),
        ]
    }
}
