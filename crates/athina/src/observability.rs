//! Structured logging for API calls
//!
//! Every request the executor sends is logged through this layer, so the
//! field names stay consistent across endpoints.

use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// HTTP request metadata for structured logging
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    /// HTTP method (GET, POST, etc.)
    pub method: String,
    /// Request path, without the base URL
    pub path: String,
    /// Attempt number, starting at 1
    pub attempt: u32,
}

impl RequestMetadata {
    /// Create new request metadata
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            attempt: 1,
        }
    }

    /// Set the attempt number
    pub fn with_attempt(mut self, attempt: u32) -> Self {
        self.attempt = attempt;
        self
    }

    /// Log request being sent
    pub fn log_request(&self) {
        debug!(
            method = %self.method,
            path = %self.path,
            attempt = self.attempt,
            "Sending HTTP request"
        );
    }

    /// Log a failure where no response came back
    pub fn log_transport_error(&self, elapsed: Duration, error: &str) {
        warn!(
            method = %self.method,
            path = %self.path,
            attempt = self.attempt,
            elapsed_ms = elapsed.as_millis() as u64,
            error = %error,
            "HTTP request could not be completed"
        );
    }
}

/// HTTP response metadata for structured logging
#[derive(Debug, Clone)]
pub struct ResponseMetadata {
    /// HTTP status code
    pub status: u16,
    /// Response body size in bytes
    pub body_size: usize,
    /// Time elapsed for the request
    pub elapsed: Duration,
}

impl ResponseMetadata {
    /// Create new response metadata
    pub fn new(status: u16, body_size: usize, elapsed: Duration) -> Self {
        Self {
            status,
            body_size,
            elapsed,
        }
    }

    /// Log successful response
    pub fn log_success(&self, request: &RequestMetadata) {
        info!(
            method = %request.method,
            path = %request.path,
            status = self.status,
            elapsed_ms = self.elapsed.as_millis() as u64,
            body_size = self.body_size,
            attempt = request.attempt,
            "HTTP request succeeded"
        );
    }

    /// Log failed response
    pub fn log_error(&self, request: &RequestMetadata, error: &str) {
        warn!(
            method = %request.method,
            path = %request.path,
            status = self.status,
            elapsed_ms = self.elapsed.as_millis() as u64,
            error = %error,
            attempt = request.attempt,
            "HTTP request failed"
        );
    }
}

/// Timer for measuring request duration
pub struct RequestTimer {
    start: Instant,
}

impl RequestTimer {
    /// Start a new timer
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get elapsed duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Install a `fmt` subscriber filtered by `RUST_LOG` (default `athina=info`).
///
/// Safe to call more than once; later calls are no-ops.
#[cfg(feature = "trace")]
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("athina=info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_metadata_creation() {
        let metadata = RequestMetadata::new("POST", "/api/v1/dataset_v2");
        assert_eq!(metadata.method, "POST");
        assert_eq!(metadata.path, "/api/v1/dataset_v2");
        assert_eq!(metadata.attempt, 1);
    }

    #[test]
    fn test_request_metadata_with_attempt() {
        let metadata = RequestMetadata::new("GET", "/api/v1/prompt/slug/all").with_attempt(2);
        assert_eq!(metadata.attempt, 2);
    }

    #[test]
    fn test_response_metadata_creation() {
        let elapsed = Duration::from_millis(500);
        let metadata = ResponseMetadata::new(201, 42, elapsed);
        assert_eq!(metadata.status, 201);
        assert_eq!(metadata.body_size, 42);
        assert_eq!(metadata.elapsed, elapsed);
    }

    #[test]
    fn test_request_timer() {
        let timer = RequestTimer::start();
        std::thread::sleep(Duration::from_millis(10));
        let elapsed = timer.elapsed();
        assert!(elapsed.as_millis() >= 10);
    }
}
