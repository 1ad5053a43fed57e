//! Common test utilities and helpers

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use athina::http::{ApiRequest, Response, Transport};
use athina::{Client, Error, Result, async_trait};
use wiremock::MockServer;

/// Load a response fixture
#[allow(dead_code)]
pub fn load_response_fixture(name: &str) -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let path = Path::new(manifest_dir)
        .join("tests")
        .join("fixtures")
        .join("responses")
        .join(format!("{}.json", name));

    std::fs::read_to_string(&path).unwrap_or_else(|e| {
        panic!(
            "Failed to load response fixture '{}' from {:?}: {}",
            name, path, e
        )
    })
}

/// Create a test API key
#[allow(dead_code)]
pub fn test_api_key() -> String {
    "athina-test-key-0123456789abcdef".to_string()
}

/// Client pointed at a mock server, with a short retry delay.
#[allow(dead_code)]
pub fn client_for(server: &MockServer) -> Client {
    Client::builder()
        .api_key(test_api_key())
        .api_base_url(server.uri())
        .app_base_url("https://app.athina.test")
        .retry_delay(Duration::from_millis(10))
        .build()
        .expect("Failed to build client")
}

/// Transport that records every request and answers from a script.
///
/// An empty script answers every request with a connection error.
#[derive(Debug, Default)]
pub struct SpyTransport {
    script: Mutex<Vec<Result<Response>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

#[allow(dead_code)]
impl SpyTransport {
    /// Spy that fails every request at the transport level.
    pub fn failing() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Spy that answers with `outcomes`, in order.
    pub fn scripted(outcomes: Vec<Result<Response>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(outcomes.into_iter().rev().collect()),
            requests: Mutex::default(),
        })
    }

    /// Number of requests that reached the transport.
    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Requests seen so far.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for SpyTransport {
    async fn send(&self, request: &ApiRequest) -> Result<Response> {
        self.requests.lock().unwrap().push(request.clone());
        self.script
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| Err(Error::Connection("connection refused".to_string())))
    }

    fn name(&self) -> &'static str {
        "spy"
    }
}

/// Client that sends through `transport`, with a short retry delay.
#[allow(dead_code)]
pub fn client_with_spy(api_key: Option<&str>, transport: Arc<SpyTransport>) -> Client {
    let mut builder = Client::builder()
        .transport(transport)
        .retry_delay(Duration::from_millis(10));
    if let Some(key) = api_key {
        builder = builder.api_key(key);
    }
    builder.build().expect("Failed to build client")
}
