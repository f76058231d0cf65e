//! Mock HTTP transport for testing.

use crate::error::{NetworkError, S3Error};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// Mock HTTP response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: Bytes,
}

impl MockResponse {
    /// A 200 response with an empty body.
    pub fn ok() -> Self {
        Self::status(200)
    }

    /// A 204 response.
    pub fn no_content() -> Self {
        Self::status(204)
    }

    /// A response with the given status and an empty body.
    pub fn status(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Bytes::new(),
        }
    }

    /// An error response with a body.
    pub fn error(status: u16, body: impl Into<Bytes>) -> Self {
        Self::status(status).with_body(body)
    }

    /// Set the body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Add a header.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Add multiple headers.
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }
}

#[derive(Default)]
struct State {
    responses: VecDeque<MockResponse>,
    default_response: Option<MockResponse>,
    requests: Vec<HttpRequest>,
    failure: Option<String>,
}

/// Mock HTTP transport.
///
/// Returns queued responses in order, then the default response if one is
/// set. Every request is recorded. Clones share state, so a test can keep a
/// handle after passing the transport to a client.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<State>>,
}

impl MockTransport {
    /// Create a transport with no responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport with queued responses.
    pub fn with_responses(responses: Vec<MockResponse>) -> Self {
        let transport = Self::new();
        transport.state.lock().responses.extend(responses);
        transport
    }

    /// Create a transport that always returns `response`.
    pub fn with_default(response: MockResponse) -> Self {
        let transport = Self::new();
        transport.state.lock().default_response = Some(response);
        transport
    }

    /// Queue a response.
    pub fn queue_response(&self, response: MockResponse) {
        self.state.lock().responses.push_back(response);
    }

    /// Fail every request with a connection error.
    pub fn fail_with(&self, message: impl Into<String>) {
        self.state.lock().failure = Some(message.into());
    }

    /// Recorded requests.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state.lock().requests.clone()
    }

    /// Number of requests sent.
    pub fn request_count(&self) -> usize {
        self.state.lock().requests.len()
    }

    /// Most recent request.
    pub fn last_request(&self) -> Option<HttpRequest> {
        self.state.lock().requests.last().cloned()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, S3Error> {
        let mut state = self.state.lock();
        state.requests.push(request);

        if let Some(message) = state.failure.clone() {
            return Err(NetworkError::ConnectionFailed { message }.into());
        }

        let response = state
            .responses
            .pop_front()
            .or_else(|| state.default_response.clone())
            .ok_or_else(|| NetworkError::ConnectionFailed {
                message: "no mock response queued".to_string(),
            })?;

        Ok(HttpResponse {
            status: response.status,
            headers: response.headers,
            body: response.body,
        })
    }
}
