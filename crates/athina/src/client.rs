//! Main client implementation for the Athina API

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use secrecy::SecretString;

use crate::{
    config::{ClientConfig, validate_base_url},
    error::{Error, Result},
    eval::EvalLogger,
    http::{Executor, ReqwestTransport, Transport},
    resources::{Datasets, EvalRuns, Prompts},
};

/// Main client for interacting with the Athina API.
///
/// Cloning is cheap: clones share the configuration, the transport and the
/// lazily created resources.
///
/// # Example
///
/// ```rust,no_run
/// use athina::Client;
///
/// # fn example() -> athina::Result<()> {
/// let client = Client::try_new("athina-key")?;
/// # let _ = client;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    executor: Arc<Executor>,
    app_base_url: String,

    datasets: OnceLock<Datasets>,
    prompts: OnceLock<Prompts>,
    eval_runs: OnceLock<EvalRuns>,
    eval_logger: OnceLock<EvalLogger>,
}

impl Client {
    /// Create a client with an API key and default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if a base URL from the environment is invalid or the
    /// HTTP client cannot be initialized.
    pub fn try_new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder().api_key(api_key).build()
    }

    /// Create a new client builder for advanced configuration.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Create a client from environment variables (and `.env`).
    ///
    /// A missing `ATHINA_API_KEY` is not an error here; calls will fail with
    /// [`Error::MissingCredential`] instead.
    #[cfg(feature = "env")]
    pub fn from_env() -> Result<Self> {
        Self::from_config(ClientConfig::from_env()?)
    }

    /// Create a client from a configuration object.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let transport = Arc::new(ReqwestTransport::new(config.timeout())?);
        Self::with_transport(config, transport)
    }

    /// Create a client that sends through a custom [`Transport`].
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        let executor = Arc::new(Executor::new(transport, &config)?);
        let app_base_url = validate_base_url(config.app_base_url())?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                executor,
                app_base_url,
                datasets: OnceLock::new(),
                prompts: OnceLock::new(),
                eval_runs: OnceLock::new(),
                eval_logger: OnceLock::new(),
            }),
        })
    }

    /// Access the Datasets API.
    pub fn datasets(&self) -> &Datasets {
        self.inner
            .datasets
            .get_or_init(|| Datasets::new(self.inner.executor.clone()))
    }

    /// Access the Prompts API.
    pub fn prompts(&self) -> &Prompts {
        self.inner
            .prompts
            .get_or_init(|| Prompts::new(self.inner.executor.clone()))
    }

    /// Access the eval-run logging API.
    pub fn eval_runs(&self) -> &EvalRuns {
        self.inner
            .eval_runs
            .get_or_init(|| EvalRuns::new(self.inner.executor.clone()))
    }

    /// Access the eval logger, which creates a dataset and logs results
    /// against it in one go.
    pub fn eval_logger(&self) -> &EvalLogger {
        self.inner.eval_logger.get_or_init(|| {
            EvalLogger::new(self.inner.executor.clone(), self.inner.app_base_url.clone())
        })
    }

    /// Base URL of the data and logging API.
    pub fn api_base_url(&self) -> &str {
        self.inner.executor.api_base_url()
    }

    /// Base URL of the web application.
    pub fn app_base_url(&self) -> &str {
        &self.inner.app_base_url
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("api_base_url", &self.api_base_url())
            .field("app_base_url", &self.app_base_url())
            .field("transport", &self.inner.executor.transport_name())
            .finish()
    }
}

/// Builder for creating a configured [`Client`].
#[derive(Default)]
pub struct ClientBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
}

impl std::fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("config", &self.config)
            .field("transport", &self.transport.as_ref().map(|t| t.name()))
            .finish()
    }
}

impl ClientBuilder {
    /// Start from an existing configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the API key for authentication.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.api_key = Some(SecretString::new(api_key.into().into_boxed_str()));
        self
    }

    /// Set the base URL of the data and logging API.
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_base_url = Some(url.into());
        self
    }

    /// Set the base URL of the web application.
    pub fn app_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.app_base_url = Some(url.into());
        self
    }

    /// Set the timeout for every request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Set the maximum number of attempts per call.
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.config.max_attempts = Some(max_attempts);
        self
    }

    /// Set the delay between attempts.
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.config.retry_delay = Some(delay);
        self
    }

    /// Add a custom default header.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is not valid in an HTTP header.
    pub fn default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self> {
        let key_str = key.into();
        let value_str = value.into();

        let key: http::HeaderName = key_str
            .parse()
            .map_err(|_| Error::InvalidHeaderName(key_str.clone()))?;
        let value: http::HeaderValue = value_str
            .parse()
            .map_err(|_| Error::InvalidHeaderValue(format!("value for header '{}'", key_str)))?;

        self.config.default_headers.insert(key, value);
        Ok(self)
    }

    /// Send through a custom transport instead of the default `reqwest` one.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client with the configured options.
    pub fn build(self) -> Result<Client> {
        match self.transport {
            Some(transport) => Client::with_transport(self.config, transport),
            None => Client::from_config(self.config),
        }
    }
}
