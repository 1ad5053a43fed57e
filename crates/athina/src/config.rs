//! Configuration for the Athina client

use http::HeaderMap;
use secrecy::SecretString;
use std::time::Duration;

/// Default base URL for the data and logging API.
pub const DEFAULT_API_BASE_URL: &str = "https://log.athina.ai";

/// Default base URL for the Athina web application.
pub const DEFAULT_APP_BASE_URL: &str = "https://app.athina.ai";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default number of attempts per call, the first one included.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;

/// Default fixed delay between attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Configuration for the Athina client.
///
/// Replaces the process-wide key and URL singletons: build one of these,
/// hand it to [`Client::from_config`](crate::Client::from_config), and every
/// request made through that client reads from it.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// API key sent as the `athina-api-key` header
    pub api_key: Option<SecretString>,

    /// Base URL for the data and logging API
    pub api_base_url: Option<String>,

    /// Base URL for the web application, used for result links only
    pub app_base_url: Option<String>,

    /// Timeout applied to every request, [`DEFAULT_TIMEOUT`] when unset
    pub timeout: Option<Duration>,

    /// Maximum attempts per call, the first one included,
    /// [`DEFAULT_MAX_ATTEMPTS`] when unset
    pub max_attempts: Option<u32>,

    /// Fixed delay between attempts, [`DEFAULT_RETRY_DELAY`] when unset
    pub retry_delay: Option<Duration>,

    /// Custom headers to include with every request
    pub default_headers: HeaderMap,
}

impl ClientConfig {
    /// Create a new configuration with an API key.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(SecretString::new(api_key.into().into_boxed_str())),
            ..Default::default()
        }
    }

    /// Load configuration from the environment, reading `.env` first.
    ///
    /// This will look for:
    /// - `ATHINA_API_KEY` for authentication
    /// - `ATHINA_API_BASE_URL` for the data and logging API
    /// - `ATHINA_APP_BASE_URL` for the web application
    /// - `ATHINA_TIMEOUT` for request timeout (in seconds)
    /// - `ATHINA_MAX_ATTEMPTS` for attempts per call
    ///
    /// Unparsable numbers and a zero timeout are ignored.
    #[cfg(feature = "env")]
    pub fn from_env() -> Result<Self, crate::error::Error> {
        use std::env;

        // A missing .env file is not an error
        let _ = dotenvy::dotenv();

        let mut config = Self::default();

        if let Ok(api_key) = env::var("ATHINA_API_KEY") {
            config.api_key = Some(SecretString::new(api_key.into_boxed_str()));
        }

        if let Ok(base_url) = env::var("ATHINA_API_BASE_URL") {
            config.api_base_url = Some(base_url);
        }

        if let Ok(app_url) = env::var("ATHINA_APP_BASE_URL") {
            config.app_base_url = Some(app_url);
        }

        if let Ok(timeout_str) = env::var("ATHINA_TIMEOUT")
            && let Ok(timeout_secs) = timeout_str.parse::<u64>()
            && timeout_secs > 0
        {
            config.timeout = Some(Duration::from_secs(timeout_secs));
        }

        if let Ok(attempts_str) = env::var("ATHINA_MAX_ATTEMPTS")
            && let Ok(max_attempts) = attempts_str.parse::<u32>()
        {
            config.max_attempts = Some(max_attempts);
        }

        Ok(config)
    }

    /// Merge this configuration with another, with the other taking precedence.
    ///
    /// Every field `other` sets wins, even when it equals the default.
    pub fn merge(mut self, other: ClientConfig) -> Self {
        if other.api_key.is_some() {
            self.api_key = other.api_key;
        }
        if other.api_base_url.is_some() {
            self.api_base_url = other.api_base_url;
        }
        if other.app_base_url.is_some() {
            self.app_base_url = other.app_base_url;
        }
        if other.timeout.is_some() {
            self.timeout = other.timeout;
        }
        if other.max_attempts.is_some() {
            self.max_attempts = other.max_attempts;
        }
        if other.retry_delay.is_some() {
            self.retry_delay = other.retry_delay;
        }
        for (key, value) in other.default_headers.iter() {
            self.default_headers.insert(key.clone(), value.clone());
        }

        self
    }

    /// The effective API base URL.
    pub fn api_base_url(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL)
    }

    /// The effective web application base URL.
    pub fn app_base_url(&self) -> &str {
        self.app_base_url.as_deref().unwrap_or(DEFAULT_APP_BASE_URL)
    }

    /// The effective request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout.unwrap_or(DEFAULT_TIMEOUT)
    }

    /// The effective attempt budget per call.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS)
    }

    /// The effective delay between attempts.
    pub fn retry_delay(&self) -> Duration {
        self.retry_delay.unwrap_or(DEFAULT_RETRY_DELAY)
    }
}

/// Check that `raw` is a usable base URL and return it without a trailing
/// slash, so paths can be appended directly.
pub(crate) fn validate_base_url(raw: &str) -> Result<String, crate::error::Error> {
    use crate::error::Error;

    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(Error::InvalidUrl("base URL must not be empty".to_string()));
    }

    let parsed = url::Url::parse(trimmed)
        .map_err(|e| Error::InvalidUrl(format!("'{}': {}", trimmed, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        other => Err(Error::InvalidUrl(format!(
            "'{}': unsupported scheme '{}', expected http or https",
            trimmed, other
        ))),
    }
}
