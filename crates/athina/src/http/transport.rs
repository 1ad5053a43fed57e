//! Transport trait and the default `reqwest` implementation
//!
//! The transport is the only place that touches the network. It reports
//! transport-level failures as errors and hands back every HTTP response,
//! whatever its status, for the executor to classify.

use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

use super::{ApiRequest, Response};
use crate::error::{Error, Result};

/// Sends one HTTP request.
///
/// Implementations must not retry and must not interpret status codes:
/// `Ok` carries any response the server produced, `Err` means no response
/// was received ([`Error::Connection`] or [`Error::Timeout`]).
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Send a request and read the full response body.
    async fn send(&self, request: &ApiRequest) -> Result<Response>;

    /// Get the transport name for debugging/logging.
    fn name(&self) -> &'static str;
}

/// Default transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http_client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with the given client-wide timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(format!("athina-rust/{}", crate::VERSION))
            .build()
            .map_err(|e| Error::HttpClient(e.to_string()))?;

        Ok(Self { http_client })
    }

    /// Wrap an existing `reqwest` client.
    pub fn from_client(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &ApiRequest) -> Result<Response> {
        let mut req = self
            .http_client
            .request(request.method().clone(), request.url().as_str())
            .headers(request.headers().clone())
            .timeout(request.timeout_duration());

        if !request.query_pairs().is_empty() {
            req = req.query(request.query_pairs());
        }
        if let Some(body) = request.json_body() {
            req = req.json(body);
        }

        let resp = req.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout(request.timeout_duration())
            } else {
                Error::from(e)
            }
        })?;

        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.bytes().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout(request.timeout_duration())
            } else {
                Error::Connection(e.to_string())
            }
        })?;

        Ok(Response::new(status, headers, body.to_vec()))
    }

    fn name(&self) -> &'static str {
        "reqwest"
    }
}
