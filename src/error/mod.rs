//! Error types for the S3 object adapter.
//!
//! Every operation resolves to either a result object or exactly one of these
//! errors. Nothing is retried: the first failing stage surfaces its error
//! unchanged to the caller.

mod provider;

pub use provider::ProviderError;

use thiserror::Error;

/// Top-level error type for the adapter.
#[derive(Debug, Error)]
pub enum S3Error {
    /// A required parameter was absent or empty. Raised before any I/O.
    #[error("missing {field}")]
    MissingParameter {
        /// Name of the first missing field, in declared check order.
        field: &'static str,
    },

    /// The put payload could not be converted to a transmittable form.
    #[error("Could not convert object to JSON: {message}")]
    Serialization {
        /// Details from the encoder.
        message: String,
    },

    /// Error document returned by the storage service.
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Connection or network failure while talking to the storage service.
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    /// The response parser was handed a verb it has no parser for.
    #[error("Not Implemented")]
    NotImplemented {
        /// Raw response body.
        body: String,
    },

    /// The external signer failed or could not be reached.
    #[error("Signing error: {0}")]
    Signing(#[from] SigningError),

    /// Invalid client configuration.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// A response could not be interpreted.
    #[error("Response error: {0}")]
    Response(#[from] ResponseError),
}

impl S3Error {
    /// Returns the HTTP-equivalent status code for locally raised errors.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            S3Error::MissingParameter { .. } | S3Error::Serialization { .. } => Some(400),
            _ => None,
        }
    }

    /// Returns true if this is a `MissingParameter` error naming `field`.
    pub fn is_missing_parameter(&self, field: &str) -> bool {
        matches!(self, S3Error::MissingParameter { field: missing } if *missing == field)
    }

    /// Returns the decoded provider error, if this is one.
    pub fn provider_error(&self) -> Option<&ProviderError> {
        match self {
            S3Error::Provider(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the storage service request ID if the provider reported one.
    pub fn request_id(&self) -> Option<&str> {
        self.provider_error().and_then(|e| e.request_id.as_deref())
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Invalid configuration value.
    #[error("Invalid configuration: {field} - {message}")]
    InvalidConfiguration {
        /// The configuration field name.
        field: String,
        /// Error message.
        message: String,
    },

    /// The client was built without a signer.
    #[error("Missing signer: a signature provider must be supplied")]
    MissingSigner,
}

/// Errors raised while obtaining a request signature.
#[derive(Debug, Error)]
pub enum SigningError {
    /// The signer could not be reached.
    #[error("Signer unavailable: {message}")]
    Unavailable {
        /// Error message.
        message: String,
    },

    /// The signer answered but refused to sign.
    #[error("Signer rejected request with status {status}: {message}")]
    SignerRejected {
        /// Status returned by the signer.
        status: u16,
        /// Body returned by the signer.
        message: String,
    },

    /// The signer's answer could not be decoded.
    #[error("Invalid signer response: {message}")]
    InvalidResponse {
        /// Error message.
        message: String,
    },
}

/// Network and transport errors.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Connection failed.
    #[error("Connection failed: {message}")]
    ConnectionFailed {
        /// Error message.
        message: String,
    },

    /// A configured timeout elapsed.
    #[error("Request timed out: {message}")]
    Timeout {
        /// Error message.
        message: String,
    },

    /// The target URL could not be assembled.
    #[error("Invalid request URL '{url}': {message}")]
    InvalidUrl {
        /// The URL that failed to parse.
        url: String,
        /// Parser error.
        message: String,
    },

    /// The response body could not be read to completion.
    #[error("Failed to read response body: {message}")]
    BodyRead {
        /// Error message.
        message: String,
    },

    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {message}")]
    Client {
        /// Error message.
        message: String,
    },
}

/// Response interpretation errors.
#[derive(Debug, Error)]
pub enum ResponseError {
    /// XML parse error.
    #[error("XML parse error: {message}")]
    XmlParse {
        /// Error message.
        message: String,
    },

    /// The document's root element was not the expected one.
    #[error("Unexpected root element: expected {expected}, got {actual}")]
    UnexpectedRoot {
        /// Expected root element.
        expected: &'static str,
        /// Root element found, empty if the document had none.
        actual: String,
    },

    /// The parser produced a result of a different kind than the operation expects.
    #[error("Unexpected response: expected {expected} result, got {actual}")]
    UnexpectedResponse {
        /// Expected result kind.
        expected: &'static str,
        /// Result kind produced.
        actual: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_parameter_display() {
        let err = S3Error::MissingParameter { field: "bucketName" };
        assert_eq!(err.to_string(), "missing bucketName");
        assert!(err.is_missing_parameter("bucketName"));
        assert!(!err.is_missing_parameter("objectKey"));
    }

    #[test]
    fn test_status_code() {
        let serialization = S3Error::Serialization {
            message: "key must be a string".into(),
        };
        assert_eq!(serialization.status_code(), Some(400));

        let missing = S3Error::MissingParameter { field: "object" };
        assert_eq!(missing.status_code(), Some(400));

        let network = S3Error::Network(NetworkError::ConnectionFailed {
            message: "refused".into(),
        });
        assert_eq!(network.status_code(), None);
    }

    #[test]
    fn test_request_id_from_provider_error() {
        let err = S3Error::Provider(ProviderError {
            code: Some("NoSuchKey".into()),
            request_id: Some("4442587FB7D0A2F9".into()),
            ..Default::default()
        });
        assert_eq!(err.request_id(), Some("4442587FB7D0A2F9"));
        assert!(err.provider_error().is_some());

        let not_implemented = S3Error::NotImplemented { body: String::new() };
        assert!(not_implemented.request_id().is_none());
    }
}
