//! HTTP transport layer.
//!
//! Executes exactly one HTTP request per operation and buffers the whole
//! response body before returning. There are no retries, and no timeouts
//! unless the configuration asks for them.

use crate::config::AdapterConfig;
use crate::error::{NetworkError, S3Error};
use crate::pipeline::OperationRequest;
use crate::types::{ActionType, Verb};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// HTTP request to be sent.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: Verb,
    /// Request URL.
    pub url: String,
    /// Request headers.
    pub headers: BTreeMap<String, String>,
    /// Request body.
    pub body: Option<Bytes>,
}

impl HttpRequest {
    /// Create a new HTTP request.
    pub fn new(method: Verb, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: BTreeMap::new(),
            body: None,
        }
    }

    /// Set the request body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Add a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Get a header value by name (case-insensitive).
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// HTTP response received.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: Bytes,
}

impl HttpResponse {
    /// Check if the response indicates success (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get a header value by name (case-insensitive).
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// HTTP transport trait for making requests.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send an HTTP request and return the fully buffered response.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, S3Error>;
}

/// Everything the response parser needs from one exchange.
#[derive(Debug, Clone)]
pub struct ResponseEnvelope {
    /// HTTP status code.
    pub status: u16,
    /// Response headers, keys lower-cased.
    pub headers: HashMap<String, String>,
    /// Response body decoded as UTF-8.
    pub body: String,
    /// Verb of the request that produced this response.
    pub verb: Verb,
    /// Whether the request was object- or bucket-level.
    pub action_type: ActionType,
}

impl ResponseEnvelope {
    /// Build an envelope from a raw response.
    pub fn from_response(response: HttpResponse, verb: Verb, action_type: ActionType) -> Self {
        let headers = response
            .headers
            .into_iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v))
            .collect();

        Self {
            status: response.status,
            headers,
            body: String::from_utf8_lossy(&response.body).into_owned(),
            verb,
            action_type,
        }
    }

    /// Header value, treating empty values as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

/// Target URL for a request: `<scheme>://<bucket>.<endpoint>/<key>?<params>`.
pub fn request_url(config: &AdapterConfig, request: &OperationRequest) -> Result<String, S3Error> {
    let mut url = format!(
        "{}://{}/",
        config.scheme,
        config.host_for(&request.bucket_name)
    );
    if let Some(key) = request.object_key.as_deref() {
        url.push_str(key);
    }
    if !request.query_params.is_empty() {
        url.push('?');
        url.push_str(&request.query_params.join("&"));
    }

    Url::parse(&url).map_err(|e| NetworkError::InvalidUrl {
        url: url.clone(),
        message: e.to_string(),
    })?;

    Ok(url)
}

/// Execute a request descriptor with a single transport call.
pub async fn execute(
    config: &AdapterConfig,
    transport: &dyn HttpTransport,
    request: &OperationRequest,
) -> Result<ResponseEnvelope, S3Error> {
    let url = request_url(config, request)?;

    let mut http_request = HttpRequest::new(request.verb, url);
    http_request.headers = request.headers.clone();
    if let Some(body) = &request.body {
        http_request = http_request.with_body(body.clone());
    }

    debug!(method = %request.verb, url = %http_request.url, "Sending request");

    let response = transport.send(http_request).await?;

    debug!(status = response.status, bytes = response.body.len(), "Received response");

    Ok(ResponseEnvelope::from_response(
        response,
        request.verb,
        request.action_type,
    ))
}

/// Default HTTP transport using reqwest.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a new transport with default settings.
    pub fn new() -> Result<Self, S3Error> {
        Self::builder().build()
    }

    /// Create a transport builder.
    pub fn builder() -> ReqwestTransportBuilder {
        ReqwestTransportBuilder::new()
    }

    /// Create a transport from adapter configuration.
    pub fn from_config(config: &AdapterConfig) -> Result<Self, S3Error> {
        let mut builder = Self::builder()
            .verify_ssl(config.verify_ssl)
            .user_agent(config.user_agent.clone());
        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = config.request_timeout {
            builder = builder.request_timeout(timeout);
        }
        builder.build()
    }
}

fn map_send_error(e: reqwest::Error) -> NetworkError {
    if e.is_timeout() {
        NetworkError::Timeout {
            message: e.to_string(),
        }
    } else {
        NetworkError::ConnectionFailed {
            message: e.to_string(),
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, S3Error> {
        let method = reqwest::Method::from_bytes(request.method.as_str().as_bytes()).map_err(
            |e| NetworkError::ConnectionFailed {
                message: format!("Invalid HTTP method: {}", e),
            },
        )?;

        let mut req_builder = self.client.request(method, &request.url);

        for (name, value) in &request.headers {
            req_builder = req_builder.header(name, value);
        }

        if let Some(body) = request.body {
            req_builder = req_builder.body(body);
        }

        let response = req_builder.send().await.map_err(map_send_error)?;

        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();

        let body = response.bytes().await.map_err(|e| NetworkError::BodyRead {
            message: e.to_string(),
        })?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport").finish_non_exhaustive()
    }
}

/// Builder for reqwest transport.
pub struct ReqwestTransportBuilder {
    connect_timeout: Option<Duration>,
    request_timeout: Option<Duration>,
    pool_max_idle_per_host: usize,
    verify_ssl: bool,
    user_agent: String,
}

impl ReqwestTransportBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            connect_timeout: None,
            request_timeout: None,
            pool_max_idle_per_host: 100,
            verify_ssl: true,
            user_agent: format!("s3-object-adapter/{}", env!("CARGO_PKG_VERSION")),
        }
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

    /// Set the maximum idle connections per host.
    pub fn pool_max_idle_per_host(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Set whether to verify SSL certificates.
    pub fn verify_ssl(mut self, verify: bool) -> Self {
        self.verify_ssl = verify;
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build the transport.
    pub fn build(self) -> Result<ReqwestTransport, S3Error> {
        let mut builder = reqwest::Client::builder()
            .pool_max_idle_per_host(self.pool_max_idle_per_host)
            .danger_accept_invalid_certs(!self.verify_ssl)
            .user_agent(&self.user_agent);
        if let Some(timeout) = self.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| NetworkError::Client {
            message: e.to_string(),
        })?;

        Ok(ReqwestTransport { client })
    }
}

impl Default for ReqwestTransportBuilder {
    fn default() -> Self {
        Self::new()
    }
}
