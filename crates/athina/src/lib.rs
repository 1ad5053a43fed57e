//! # Athina SDK
//!
//! Rust client for Athina's REST API:
//! - Dataset management (create, add rows, list, fetch, delete)
//! - Prompt template management (versions, slugs, runs)
//! - Evaluation result logging against datasets
//!
//! Every call goes through one execution policy: the `athina-api-key`
//! header, a per-request timeout, a fixed-delay retry on transport failures
//! and 5xx responses, and a single error-mapping boundary.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use athina::{Client, types::CreateDatasetRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::try_new("your-athina-api-key")?;
//!
//!     let dataset = client
//!         .datasets()
//!         .create(&CreateDatasetRequest::builder().name("golden-set").build()?)
//!         .await?;
//!
//!     println!("created {}", dataset.id);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Re-export commonly used types
pub use client::{Client, ClientBuilder};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use eval::{Eval, EvalDefinition, EvalLogger, LoggedEvalRun, MetricValue, ToDict};
pub use types::*;

// Module declarations
pub mod client;
pub mod config;
pub mod error;
pub mod eval;
pub mod http;
pub mod observability;
pub mod resources;
pub mod retry;
pub mod types;

// Re-export key dependencies for convenience
pub use async_trait::async_trait;
pub use serde_json::Value as JsonValue;

/// Prelude module for common imports
///
/// # Examples
///
/// ```rust
/// use athina::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Client, ClientConfig, Error, Result,
        eval::{Eval, EvalDefinition, MetricValue},
        types::{
            CreateDatasetRequest, CreatePromptRequest, Dataset, EvalResult, EvalResultMetric,
            FetchDatasetParams, Prompt, PromptMessage, RunPromptRequest,
        },
    };
}

/// SDK version, automatically updated from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
