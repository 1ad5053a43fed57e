//! API resource endpoints
//!
//! Each resource is a thin set of [`Call`](crate::http::Call) descriptions
//! run through the client's shared executor. Resources hold the executor,
//! never the [`Client`](crate::Client) itself.

pub mod datasets;
pub mod eval_runs;
pub mod prompts;

pub use datasets::Datasets;
pub use eval_runs::EvalRuns;
pub use prompts::Prompts;

use crate::http::Executor;

/// Base trait for API resources.
pub trait Resource {
    /// Get the executor the resource sends through.
    fn executor(&self) -> &Executor;
}
