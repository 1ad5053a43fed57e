//! Prompts API endpoint

use std::sync::Arc;

use serde_json::{Value, json};

use super::Resource;
use crate::{
    error::Result,
    http::{Call, Executor},
    types::{CreatePromptRequest, Prompt, PromptSlug, RunPromptRequest, UpdatePromptSlugRequest},
};

const BASE_PATH: &str = "/api/v1/prompt";

/// Prompts API resource.
///
/// Prompt templates live under a slug; each create adds a new version.
///
/// # Example
///
/// ```rust,no_run
/// # use athina::{Client, types::{CreatePromptRequest, PromptMessage, RunPromptRequest}};
/// # use serde_json::json;
/// # async fn example() -> athina::Result<()> {
/// let client = Client::try_new("athina-key")?;
///
/// let request = CreatePromptRequest::builder()
///     .prompt(vec![PromptMessage::user("Summarize: {{text}}")])
///     .model("gpt-4o")
///     .build()
///     .unwrap();
/// client.prompts().create("summarize", &request).await?;
///
/// let run = RunPromptRequest::builder()
///     .variables(json!({"text": "..."}).as_object().cloned().unwrap_or_default())
///     .build()
///     .unwrap();
/// let output = client.prompts().run("summarize", &run).await?;
/// # let _ = output;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Prompts {
    executor: Arc<Executor>,
}

impl Prompts {
    pub(crate) fn new(executor: Arc<Executor>) -> Self {
        Self { executor }
    }

    /// Get the default version of a slug.
    pub async fn default_prompt(&self, slug: &str) -> Result<Prompt> {
        let call = Call::get(BASE_PATH)
            .segment(slug)
            .segment("default")
            .extract(&["data", "prompt"]);

        self.executor.execute_as(call).await
    }

    /// List all slugs.
    pub async fn list_slugs(&self) -> Result<Vec<PromptSlug>> {
        let call = Call::get(BASE_PATH).segment("slug").segment("all").extract(&["data", "slugs"]);

        self.executor.execute_as(call).await
    }

    /// Delete a slug and all its versions. Returns the server's message.
    pub async fn delete_slug(&self, slug: &str) -> Result<String> {
        let call = Call::delete(BASE_PATH)
            .segment("slug")
            .segment(slug)
            .extract(&["message"]);

        self.executor.execute_as(call).await
    }

    /// Copy a slug under a new name.
    pub async fn duplicate_slug(&self, slug: &str, name: &str) -> Result<PromptSlug> {
        let call = Call::post(BASE_PATH)
            .segment("slug")
            .segment(slug)
            .segment("duplicate")
            .json(&json!({ "name": name }))?
            .allow_created()
            .extract(&["data", "slug"]);

        self.executor.execute_as(call).await
    }

    /// Create a new version under a slug, creating the slug if needed.
    pub async fn create(&self, slug: &str, request: &CreatePromptRequest) -> Result<Prompt> {
        let call = Call::post(BASE_PATH)
            .segment(slug)
            .json(request)?
            .allow_created()
            .extract(&["data", "prompt"]);

        self.executor.execute_as(call).await
    }

    /// Run a prompt. Returns the server's `data` payload.
    pub async fn run(&self, slug: &str, request: &RunPromptRequest) -> Result<Value> {
        let call = Call::post(BASE_PATH)
            .segment(slug)
            .segment("run")
            .json(request)?
            .extract(&["data"]);

        self.executor.execute(call).await
    }

    /// Make `version` the default version of a slug.
    pub async fn mark_default(&self, slug: &str, version: u64) -> Result<Prompt> {
        let call = Call::patch(BASE_PATH)
            .segment(slug)
            .segment(version)
            .segment("set-default")
            .extract(&["data", "prompt"]);

        self.executor.execute_as(call).await
    }

    /// Update a slug's metadata.
    pub async fn update_slug(
        &self,
        slug: &str,
        request: &UpdatePromptSlugRequest,
    ) -> Result<PromptSlug> {
        let call = Call::patch(BASE_PATH)
            .segment("slug")
            .segment(slug)
            .json(request)?
            .extract(&["data", "slug"]);

        self.executor.execute_as(call).await
    }
}

impl Resource for Prompts {
    fn executor(&self) -> &Executor {
        &self.executor
    }
}
