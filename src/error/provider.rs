//! Error document returned by the storage service.

use serde::Serialize;
use std::fmt;

/// Decoded `<Error>` document.
///
/// Every field is optional and only populated when the element is present in
/// the document. When the body is not an error document at all, only
/// `message` is set, holding the raw body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderError {
    /// Error code (e.g. `NoSuchKey`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Human-readable message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Request ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// Extended request ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_id: Option<String>,
    /// Resource the error refers to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    /// Name of the offending argument.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub argument_name: Option<String>,
    /// Value of the offending argument.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub argument_value: Option<String>,
    /// Access key the request was signed with.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aws_access_key_id: Option<String>,
    /// Signature the service received.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature_provided: Option<String>,
    /// String the service expected to be signed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub string_to_sign: Option<String>,
    /// Hex bytes of the expected string to sign.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub string_to_sign_bytes: Option<String>,
}

impl ProviderError {
    /// Wrap a body that could not be decoded as an error document.
    pub fn from_raw_body(body: impl Into<String>) -> Self {
        Self {
            message: Some(body.into()),
            ..Default::default()
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.code, &self.message) {
            (Some(code), Some(message)) => write!(f, "{}: {}", code, message),
            (Some(code), None) => f.write_str(code),
            (None, Some(message)) => f.write_str(message),
            (None, None) => f.write_str("unknown provider error"),
        }
    }
}

impl std::error::Error for ProviderError {}
