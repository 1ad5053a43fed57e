//! HTTP layer
//!
//! Requests are described as [`Call`]s and run by the [`Executor`], which
//! owns retry, error classification and envelope unwrapping. The
//! [`Transport`] underneath only moves bytes.

pub use executor::{API_KEY_HEADER, Call, Executor, SuccessStatus, unwrap_envelope};
pub use request::ApiRequest;
pub use response::Response;
pub use transport::{ReqwestTransport, Transport};

mod executor;
mod request;
mod response;
mod transport;

// Re-export HTTP types from the http crate for convenience
pub use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
