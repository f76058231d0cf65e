//! Signer reached over HTTP.

use super::{Signature, SignatureRequest, Signer};
use crate::error::{ConfigurationError, S3Error, SigningError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;
use url::Url;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireRequest<'a> {
    http_verb: &'a str,
    bucket_name: &'a str,
    object_name: &'a str,
    headers: &'a BTreeMap<String, String>,
    aws_access_key_id: &'a str,
    secret_access_key: &'a str,
}

#[derive(Deserialize)]
struct WireSignature {
    authorization: String,
    date: String,
}

/// Signer that POSTs each signing request as JSON to a signing service.
///
/// The service receives `{httpVerb, bucketName, objectName, headers,
/// awsAccessKeyId, secretAccessKey}` and answers `{authorization, date}`.
pub struct RemoteSigner {
    client: reqwest::Client,
    url: Url,
}

impl RemoteSigner {
    /// Create a signer for the given service URL.
    pub fn new(url: impl AsRef<str>) -> Result<Self, S3Error> {
        Self::builder(url).build()
    }

    /// Create a builder.
    pub fn builder(url: impl AsRef<str>) -> RemoteSignerBuilder {
        RemoteSignerBuilder {
            url: url.as_ref().to_string(),
            timeout: None,
        }
    }

    /// Service URL.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl std::fmt::Debug for RemoteSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteSigner")
            .field("url", &self.url.as_str())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Signer for RemoteSigner {
    async fn sign(&self, request: &SignatureRequest) -> Result<Signature, S3Error> {
        let wire = WireRequest {
            http_verb: request.verb.as_str(),
            bucket_name: &request.bucket_name,
            object_name: &request.object_key,
            headers: &request.headers,
            aws_access_key_id: request.credentials.access_key_id(),
            secret_access_key: request.credentials.secret_access_key(),
        };

        debug!(
            verb = %request.verb,
            bucket = %request.bucket_name,
            key = %request.object_key,
            "Requesting signature"
        );

        let response = self
            .client
            .post(self.url.clone())
            .json(&wire)
            .send()
            .await
            .map_err(|e| SigningError::Unavailable {
                message: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| SigningError::Unavailable {
            message: format!("Failed to read signer response: {}", e),
        })?;

        if !status.is_success() {
            return Err(SigningError::SignerRejected {
                status: status.as_u16(),
                message: body,
            }
            .into());
        }

        let signature: WireSignature =
            serde_json::from_str(&body).map_err(|e| SigningError::InvalidResponse {
                message: e.to_string(),
            })?;

        Ok(Signature::new(signature.authorization, signature.date))
    }
}

/// Builder for [`RemoteSigner`].
#[derive(Debug)]
pub struct RemoteSignerBuilder {
    url: String,
    timeout: Option<Duration>,
}

impl RemoteSignerBuilder {
    /// Bound each signing call. Unbounded by default.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the signer.
    pub fn build(self) -> Result<RemoteSigner, S3Error> {
        let url = Url::parse(&self.url).map_err(|e| ConfigurationError::InvalidConfiguration {
            field: "signer_url".to_string(),
            message: e.to_string(),
        })?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| ConfigurationError::InvalidConfiguration {
            field: "signer_client".to_string(),
            message: e.to_string(),
        })?;

        Ok(RemoteSigner { client, url })
    }
}
