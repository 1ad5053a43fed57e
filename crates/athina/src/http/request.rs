//! Outgoing HTTP request description

use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::error::{Error, Result};

/// A fully resolved request, ready to hand to a [`Transport`](super::Transport).
///
/// Built by the executor: URL joined with the base, auth and default headers
/// attached, timeout set.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    url: Url,
    headers: HeaderMap,
    query: Vec<(String, String)>,
    body: Option<Value>,
    timeout: Duration,
}

impl ApiRequest {
    /// Create a new request with no headers, query or body.
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            query: Vec::new(),
            body: None,
            timeout: crate::config::DEFAULT_TIMEOUT,
        }
    }

    /// Try to set a header, returning an error if the name or value is invalid.
    pub fn try_header(mut self, key: &str, value: &str) -> Result<Self> {
        let name = key
            .parse::<HeaderName>()
            .map_err(|_| Error::InvalidHeaderName(key.to_string()))?;
        let value = value
            .parse::<HeaderValue>()
            .map_err(|_| Error::InvalidHeaderValue(format!("value for header '{}'", key)))?;

        self.headers.insert(name, value);
        Ok(self)
    }

    /// Merge a set of pre-validated headers.
    pub fn headers_from(mut self, headers: &HeaderMap) -> Self {
        for (key, value) in headers {
            self.headers.insert(key.clone(), value.clone());
        }
        self
    }

    /// Append query parameters.
    pub fn query(mut self, query: Vec<(String, String)>) -> Self {
        self.query.extend(query);
        self
    }

    /// Set the JSON body.
    pub fn body(mut self, body: Option<Value>) -> Self {
        self.body = body;
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Get the URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Get the headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get the query parameters.
    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    /// Get the JSON body, if any.
    pub fn json_body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Get the timeout.
    pub fn timeout_duration(&self) -> Duration {
        self.timeout
    }
}
