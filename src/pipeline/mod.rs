//! Request pipeline.
//!
//! One invocation runs sign, attach, execute and parse in sequence. The first
//! failing stage ends the run and its error is returned unchanged.

use crate::config::AdapterConfig;
use crate::credentials::Credentials;
use crate::error::S3Error;
use crate::response::{self, ParsedResponse};
use crate::signing::{SignatureRequest, Signer};
use crate::transport::{self, HttpTransport};
use crate::types::{ActionType, Verb};
use bytes::Bytes;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Fully validated description of one storage request.
#[derive(Debug, Clone)]
pub struct OperationRequest {
    /// HTTP verb.
    pub verb: Verb,
    /// Object- or bucket-level request.
    pub action_type: ActionType,
    /// Bucket name.
    pub bucket_name: String,
    /// Object key; `None` for bucket-level requests.
    pub object_key: Option<String>,
    /// Signing credentials.
    pub credentials: Credentials,
    /// Request headers.
    pub headers: BTreeMap<String, String>,
    /// Encoded `name=value` query parameters, in order.
    pub query_params: Vec<String>,
    /// Request body.
    pub body: Option<Bytes>,
}

impl OperationRequest {
    /// Request addressing a single object.
    pub fn object(
        verb: Verb,
        bucket_name: impl Into<String>,
        object_key: impl Into<String>,
        credentials: Credentials,
    ) -> Self {
        Self {
            verb,
            action_type: ActionType::Object,
            bucket_name: bucket_name.into(),
            object_key: Some(object_key.into()),
            credentials,
            headers: BTreeMap::new(),
            query_params: Vec::new(),
            body: None,
        }
    }

    /// Request addressing the bucket itself.
    pub fn bucket(verb: Verb, bucket_name: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            verb,
            action_type: ActionType::Bucket,
            bucket_name: bucket_name.into(),
            object_key: None,
            credentials,
            headers: BTreeMap::new(),
            query_params: Vec::new(),
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

    /// Signer input for this request.
    pub fn signature_request(&self) -> SignatureRequest {
        SignatureRequest {
            verb: self.verb,
            bucket_name: self.bucket_name.clone(),
            object_key: self.object_key.clone().unwrap_or_default(),
            headers: self.headers.clone(),
            credentials: self.credentials.clone(),
        }
    }
}

/// Runs requests through signer, transport and parser.
#[derive(Clone)]
pub struct Pipeline {
    config: Arc<AdapterConfig>,
    signer: Arc<dyn Signer>,
    transport: Arc<dyn HttpTransport>,
}

impl Pipeline {
    /// Create a pipeline.
    pub fn new(
        config: Arc<AdapterConfig>,
        signer: Arc<dyn Signer>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            config,
            signer,
            transport,
        }
    }

    /// Execute one request.
    pub async fn execute(&self, mut request: OperationRequest) -> Result<ParsedResponse, S3Error> {
        let signature = self.signer.sign(&request.signature_request()).await?;
        debug!(verb = %request.verb, bucket = %request.bucket_name, "Request signed");

        signature.attach(&mut request.headers);

        let envelope = transport::execute(&self.config, self.transport.as_ref(), &request).await?;

        response::parse(&envelope)
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SigningError;
    use crate::mocks::{MockResponse, MockSigner, MockTransport};

    fn pipeline(signer: MockSigner, transport: MockTransport) -> Pipeline {
        Pipeline::new(
            Arc::new(AdapterConfig::default()),
            Arc::new(signer),
            Arc::new(transport),
        )
    }

    #[tokio::test]
    async fn test_signature_headers_attached() {
        let signer = MockSigner::new();
        let transport = MockTransport::new();
        transport.queue_response(MockResponse::ok().with_header("ETag", "\"e\""));

        let request = OperationRequest::object(Verb::Put, "b", "k", Credentials::new("a", "s"))
            .with_body("")
            .with_header("Content-Type", "text/plain");
        let parsed = pipeline(signer.clone(), transport.clone())
            .execute(request)
            .await
            .unwrap();

        assert_eq!(parsed.into_put().unwrap().e_tag.as_deref(), Some("e"));

        let signed = signer.requests();
        assert_eq!(signed.len(), 1);
        assert_eq!(signed[0].object_key, "k");
        assert!(!signed[0].headers.contains_key("Authorization"));

        let sent = transport.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].url, "https://b.s3.amazonaws.com/k");
        assert_eq!(sent[0].get_header("Authorization"), Some(MockSigner::AUTHORIZATION));
        assert_eq!(sent[0].get_header("Date"), Some(MockSigner::DATE));
        assert_eq!(sent[0].get_header("Content-Type"), Some("text/plain"));
    }

    #[tokio::test]
    async fn test_listing_signs_with_empty_key() {
        let signer = MockSigner::new();
        let transport = MockTransport::new();
        transport.queue_response(MockResponse::ok().with_body(
            "<ListBucketResult><Name>b</Name><IsTruncated>false</IsTruncated></ListBucketResult>",
        ));

        let request = OperationRequest::bucket(Verb::Get, "b", Credentials::new("a", "s"));
        pipeline(signer.clone(), transport)
            .execute(request)
            .await
            .unwrap();

        assert_eq!(signer.requests()[0].object_key, "");
    }

    #[tokio::test]
    async fn test_signer_failure_stops_pipeline() {
        let signer = MockSigner::new().with_error(|| {
            SigningError::Unavailable {
                message: "signer down".into(),
            }
            .into()
        });
        let transport = MockTransport::new();

        let request = OperationRequest::object(Verb::Delete, "b", "k", Credentials::new("a", "s"));
        let err = pipeline(signer, transport.clone())
            .execute(request)
            .await
            .unwrap_err();

        assert!(matches!(err, S3Error::Signing(SigningError::Unavailable { .. })));
        assert_eq!(transport.request_count(), 0);
    }
}
