//! Prompt template types

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A chat message inside a prompt template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    /// `system`, `user` or `assistant`
    pub role: String,
    /// Message text, may contain `{{variable}}` placeholders
    pub content: String,
}

impl PromptMessage {
    /// A system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }

    /// A user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    /// An assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }

    fn new(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: content.into(),
        }
    }
}

/// One version of a prompt template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    /// Server-assigned identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Slug the version belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_slug: Option<String>,

    /// Version number within the slug
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,

    /// Template messages
    #[serde(default)]
    pub prompt: Vec<PromptMessage>,

    /// Model the template runs against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Commit message of this version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_message: Option<String>,

    /// Model parameters (temperature, max_tokens, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,

    /// Whether this is the slug's default version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,

    /// Fields this SDK does not model
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A prompt slug: the named container of prompt versions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptSlug {
    /// Server-assigned identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Slug name
    pub name: String,

    /// Directory the slug is filed under
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,

    /// Whether the slug is starred
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starred: Option<bool>,

    /// Display emoji
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,

    /// Fields this SDK does not model
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Request to create a new version under a slug.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[builder(setter(into, strip_option))]
pub struct CreatePromptRequest {
    /// Template messages
    pub prompt: Vec<PromptMessage>,

    /// Model the template runs against
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub model: Option<String>,

    /// Commit message
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub commit_message: Option<String>,

    /// Model parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub parameters: Option<Value>,
}

impl CreatePromptRequest {
    /// Create a builder for constructing a CreatePromptRequest.
    pub fn builder() -> CreatePromptRequestBuilder {
        CreatePromptRequestBuilder::default()
    }
}

/// Request to run a prompt template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[builder(setter(into, strip_option))]
pub struct RunPromptRequest {
    /// Values for the template's placeholders
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    #[builder(default)]
    pub variables: Map<String, Value>,

    /// Version to run, the default version when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub version: Option<u64>,

    /// Override the template's model
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub model: Option<String>,

    /// Override the template's parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub parameters: Option<Value>,
}

impl RunPromptRequest {
    /// Create a builder for constructing a RunPromptRequest.
    pub fn builder() -> RunPromptRequestBuilder {
        RunPromptRequestBuilder::default()
    }
}

/// Changes to a slug's metadata. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Builder)]
#[builder(setter(into, strip_option), default)]
pub struct UpdatePromptSlugRequest {
    /// Move the slug to this directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,

    /// Star or unstar the slug
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starred: Option<bool>,

    /// Set the display emoji
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
}

impl UpdatePromptSlugRequest {
    /// Create a builder for constructing an UpdatePromptSlugRequest.
    pub fn builder() -> UpdatePromptSlugRequestBuilder {
        UpdatePromptSlugRequestBuilder::default()
    }
}
