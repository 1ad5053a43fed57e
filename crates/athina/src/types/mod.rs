//! Request and response types for the Athina API

pub use dataset::*;
pub use eval::*;
pub use prompt::*;

pub mod dataset;
pub mod eval;
pub mod prompt;
