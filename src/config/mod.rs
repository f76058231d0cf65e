//! Configuration for the adapter client.
//!
//! The storage endpoint defaults to the fixed public S3 hostname. Timeouts are
//! unset by default: a stalled signer or storage response blocks the calling
//! operation until the transport gives up on its own.

use crate::error::{ConfigurationError, S3Error};
use std::time::Duration;

/// Default storage endpoint hostname.
pub const S3_ENDPOINT: &str = "s3.amazonaws.com";

/// Default URL scheme.
pub const DEFAULT_SCHEME: &str = "https";

/// Configuration for the adapter client.
#[derive(Debug, Clone)]
pub struct AdapterConfig {
    /// Storage endpoint hostname; requests go to `<bucket>.<endpoint>`.
    pub endpoint: String,

    /// URL scheme (`https` unless pointed at a local test server).
    pub scheme: String,

    /// Connection timeout, if any.
    pub connect_timeout: Option<Duration>,

    /// Whole-request timeout, if any.
    pub request_timeout: Option<Duration>,

    /// Verify TLS certificates.
    pub verify_ssl: bool,

    /// User-Agent header sent by the default transport.
    pub user_agent: String,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            endpoint: S3_ENDPOINT.to_string(),
            scheme: DEFAULT_SCHEME.to_string(),
            connect_timeout: None,
            request_timeout: None,
            verify_ssl: true,
            user_agent: format!("s3-object-adapter/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl AdapterConfig {
    /// Create a new configuration builder.
    pub fn builder() -> AdapterConfigBuilder {
        AdapterConfigBuilder::default()
    }

    /// Virtual-hosted host name for a bucket.
    pub fn host_for(&self, bucket: &str) -> String {
        format!("{}.{}", bucket, self.endpoint)
    }
}

/// Builder for [`AdapterConfig`].
#[derive(Debug, Default)]
pub struct AdapterConfigBuilder {
    endpoint: Option<String>,
    scheme: Option<String>,
    connect_timeout: Option<Duration>,
    request_timeout: Option<Duration>,
    verify_ssl: Option<bool>,
    user_agent: Option<String>,
    env_error: Option<S3Error>,
}

impl AdapterConfigBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the storage endpoint hostname.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the URL scheme.
    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = Some(scheme.into());
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the whole-request timeout.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Enable or disable TLS certificate verification.
    pub fn verify_ssl(mut self, verify: bool) -> Self {
        self.verify_ssl = Some(verify);
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Load overrides from environment variables.
    pub fn from_env(mut self) -> Self {
        if let Ok(endpoint) = std::env::var("S3_ADAPTER_ENDPOINT") {
            self.endpoint = Some(endpoint);
        }
        if let Ok(scheme) = std::env::var("S3_ADAPTER_SCHEME") {
            self.scheme = Some(scheme);
        }
        if let Some(timeout) = self.env_millis("S3_ADAPTER_CONNECT_TIMEOUT_MS", "connect_timeout") {
            self.connect_timeout = Some(timeout);
        }
        if let Some(timeout) = self.env_millis("S3_ADAPTER_TIMEOUT_MS", "request_timeout") {
            self.request_timeout = Some(timeout);
        }

        self
    }

    /// Read a millisecond duration. An unparseable value is kept as the
    /// error `build()` reports.
    fn env_millis(&mut self, var: &str, field: &str) -> Option<Duration> {
        let val = std::env::var(var).ok()?;
        match val.trim().parse::<u64>() {
            Ok(ms) => Some(Duration::from_millis(ms)),
            Err(_) => {
                if self.env_error.is_none() {
                    self.env_error = Some(invalid(
                        field,
                        &format!("{} must be a whole number of milliseconds, got '{}'", var, val),
                    ));
                }
                None
            }
        }
    }

    /// Build the configuration.
    pub fn build(self) -> Result<AdapterConfig, S3Error> {
        if let Some(err) = self.env_error {
            return Err(err);
        }

        let defaults = AdapterConfig::default();

        let endpoint = self.endpoint.unwrap_or(defaults.endpoint);
        if endpoint.is_empty() || endpoint.contains('/') {
            return Err(invalid("endpoint", "must be a bare host name"));
        }

        let scheme = self.scheme.unwrap_or(defaults.scheme).to_lowercase();
        if scheme != "https" && scheme != "http" {
            return Err(invalid("scheme", "must be http or https"));
        }

        Ok(AdapterConfig {
            endpoint,
            scheme,
            connect_timeout: self.connect_timeout.or(defaults.connect_timeout),
            request_timeout: self.request_timeout.or(defaults.request_timeout),
            verify_ssl: self.verify_ssl.unwrap_or(defaults.verify_ssl),
            user_agent: self.user_agent.unwrap_or(defaults.user_agent),
        })
    }
}

fn invalid(field: &str, message: &str) -> S3Error {
    S3Error::Configuration(ConfigurationError::InvalidConfiguration {
        field: field.to_string(),
        message: message.to_string(),
    })
}
