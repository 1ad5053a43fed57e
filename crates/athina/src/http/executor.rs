//! Uniform execution of API calls
//!
//! Every endpoint is described as a [`Call`]: verb, path segments, optional
//! body and query, which success statuses it accepts, and where its payload
//! sits in the response envelope. The [`Executor`] runs calls with one policy:
//!
//! 1. fail with [`Error::MissingCredential`] before any I/O when no key is set
//! 2. attach the `athina-api-key` header and send through the transport
//! 3. classify the status through [`Error::from_response`]
//! 4. retry retryable failures per the [`RetryPolicy`]
//! 5. unwrap the payload from the envelope

use http::{HeaderMap, Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use super::{ApiRequest, Transport};
use crate::{
    config::ClientConfig,
    error::{Error, Result},
    observability::{RequestMetadata, RequestTimer, ResponseMetadata},
    retry::RetryPolicy,
};

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "athina-api-key";

/// Which statuses count as success for a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SuccessStatus {
    /// Only 200
    #[default]
    Ok,
    /// 200 or 201, for create operations
    OkOrCreated,
}

impl SuccessStatus {
    /// Whether `status` is a success for this call.
    pub fn accepts(self, status: StatusCode) -> bool {
        match self {
            SuccessStatus::Ok => status == StatusCode::OK,
            SuccessStatus::OkOrCreated => status == StatusCode::OK || status == StatusCode::CREATED,
        }
    }
}

/// Description of one endpoint invocation.
#[derive(Debug, Clone)]
pub struct Call {
    method: Method,
    segments: Vec<String>,
    body: Option<Value>,
    query: Vec<(String, String)>,
    success: SuccessStatus,
    extract: Vec<&'static str>,
}

impl Call {
    /// Create a call for `method` on a fixed `path` (relative to the API
    /// base URL). Caller-supplied values go through [`Call::segment`].
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            segments: path
                .into()
                .split('/')
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
            body: None,
            query: Vec::new(),
            success: SuccessStatus::default(),
            extract: Vec::new(),
        }
    }

    /// A GET call.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// A POST call.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// A PATCH call.
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    /// A DELETE call.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append one path segment. Reserved characters such as `/`, `?` and
    /// `#` are percent-encoded when the URL is built.
    pub fn segment(mut self, value: impl ToString) -> Self {
        self.segments.push(value.to_string());
        self
    }

    /// Attach a JSON body.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Accept 201 Created as well as 200.
    pub fn allow_created(mut self) -> Self {
        self.success = SuccessStatus::OkOrCreated;
        self
    }

    /// Path of keys to the payload inside the envelope. Empty returns the
    /// whole body.
    pub fn extract(mut self, path: &[&'static str]) -> Self {
        self.extract = path.to_vec();
        self
    }

    /// Get the method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Get the path, segments joined unencoded.
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    /// Get the path segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Get the query parameters.
    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    /// Get the JSON body.
    pub fn json_body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Get the accepted success statuses.
    pub fn success(&self) -> SuccessStatus {
        self.success
    }

    /// Get the envelope key path.
    pub fn extract_path(&self) -> &[&'static str] {
        &self.extract
    }
}

/// Runs [`Call`]s against the API with the configured credential,
/// timeout and retry policy.
#[derive(Debug, Clone)]
pub struct Executor {
    transport: Arc<dyn Transport>,
    api_base_url: String,
    base_url: Url,
    api_key: Option<SecretString>,
    default_headers: HeaderMap,
    timeout: Duration,
    retry: RetryPolicy,
}

impl Executor {
    /// Create an executor from a transport and a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the API base URL is empty or not http(s).
    pub fn new(transport: Arc<dyn Transport>, config: &ClientConfig) -> Result<Self> {
        let api_base_url = crate::config::validate_base_url(config.api_base_url())?;
        let base_url = Url::parse(&api_base_url)
            .map_err(|e| Error::InvalidUrl(format!("'{}': {}", api_base_url, e)))?;

        Ok(Self {
            transport,
            api_base_url,
            base_url,
            api_key: config.api_key.clone(),
            default_headers: config.default_headers.clone(),
            timeout: config.timeout(),
            retry: RetryPolicy::new(config.max_attempts(), config.retry_delay()),
        })
    }

    /// The validated API base URL, without a trailing slash.
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// The retry policy in effect.
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// The transport name, for debugging.
    pub fn transport_name(&self) -> &'static str {
        self.transport.name()
    }

    /// Execute a call and return the unwrapped payload.
    pub async fn execute(&self, call: Call) -> Result<Value> {
        let request = self.prepare(&call)?;

        let call = &call;
        let request = &request;
        self.retry
            .run(move |attempt| self.attempt(call, request, attempt))
            .await
    }

    /// Execute a call and deserialize the unwrapped payload.
    pub async fn execute_as<T: DeserializeOwned>(&self, call: Call) -> Result<T> {
        let payload = self.execute(call).await?;
        serde_json::from_value(payload).map_err(Error::Serialization)
    }

    /// Resolve the URL and attach headers. Fails before any I/O when no
    /// credential is configured.
    fn prepare(&self, call: &Call) -> Result<ApiRequest> {
        let api_key = self
            .api_key
            .as_ref()
            .map(|key| key.expose_secret())
            .filter(|key| !key.is_empty())
            .ok_or(Error::MissingCredential)?;

        let url = self.resolve(call)?;

        ApiRequest::new(call.method().clone(), url)
            .headers_from(&self.default_headers)
            .try_header(API_KEY_HEADER, api_key)
            .map(|request| {
                request
                    .query(call.query_pairs().to_vec())
                    .body(call.json_body().cloned())
                    .timeout(self.timeout)
            })
    }

    /// Append the call's segments to the base URL, percent-encoding each.
    fn resolve(&self, call: &Call) -> Result<Url> {
        if let Some(segment) = call
            .segments()
            .iter()
            .find(|segment| matches!(segment.as_str(), "" | "." | ".."))
        {
            return Err(Error::InvalidRequest(format!(
                "path segment '{}' is not allowed",
                segment
            )));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                Error::InvalidUrl(format!("'{}' cannot be a base URL", self.api_base_url))
            })?
            .pop_if_empty()
            .extend(call.segments());
        Ok(url)
    }

    async fn attempt(&self, call: &Call, request: &ApiRequest, attempt: u32) -> Result<Value> {
        let request_meta =
            RequestMetadata::new(call.method().as_str(), call.path()).with_attempt(attempt);
        request_meta.log_request();
        let timer = RequestTimer::start();

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(error) => {
                request_meta.log_transport_error(timer.elapsed(), &error.to_string());
                return Err(error);
            }
        };

        let status = response.status();
        let response_meta =
            ResponseMetadata::new(status.as_u16(), response.body().len(), timer.elapsed());

        if !call.success().accepts(status) {
            let error = Error::from_response(status.as_u16(), &response.text());
            response_meta.log_error(&request_meta, &error.to_string());
            return Err(error);
        }
        response_meta.log_success(&request_meta);

        unwrap_envelope(response.json()?, call.extract_path())
    }
}

/// Take the value at `path` out of a response envelope.
pub fn unwrap_envelope(mut body: Value, path: &[&str]) -> Result<Value> {
    if path.is_empty() {
        return Ok(body);
    }

    let pointer: String = path.iter().map(|key| format!("/{key}")).collect();
    body.pointer_mut(&pointer).map(Value::take).ok_or_else(|| {
        Error::UnexpectedResponse(format!("missing field `{}` in response", path.join(".")))
    })
}
