//! Request signing.
//!
//! The signature algorithm lives outside this crate. A [`Signer`] receives the
//! verb, bucket, object key, headers and credentials of a request and returns
//! the `Authorization` and `Date` header values to attach. A signature is
//! requested once per request and never reused, since the date is part of it.

mod remote;

pub use remote::{RemoteSigner, RemoteSignerBuilder};

use crate::credentials::Credentials;
use crate::error::S3Error;
use crate::types::Verb;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Input handed to a [`Signer`].
#[derive(Debug, Clone)]
pub struct SignatureRequest {
    /// HTTP verb.
    pub verb: Verb,
    /// Bucket name.
    pub bucket_name: String,
    /// Object key, empty for bucket-level requests.
    pub object_key: String,
    /// Headers that will be sent, before `Authorization` and `Date` are added.
    pub headers: BTreeMap<String, String>,
    /// Credentials to sign with.
    pub credentials: Credentials,
}

/// Header values produced by a [`Signer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// Value of the `Authorization` header.
    pub authorization: String,
    /// Value of the `Date` header.
    pub date: String,
}

impl Signature {
    /// Create a signature.
    pub fn new(authorization: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            authorization: authorization.into(),
            date: date.into(),
        }
    }

    /// Set the `Authorization` and `Date` headers, replacing any existing values.
    pub fn attach(&self, headers: &mut BTreeMap<String, String>) {
        headers.insert("Authorization".to_string(), self.authorization.clone());
        headers.insert("Date".to_string(), self.date.clone());
    }
}

/// External signature provider.
#[async_trait]
pub trait Signer: Send + Sync {
    /// Sign a request.
    async fn sign(&self, request: &SignatureRequest) -> Result<Signature, S3Error>;
}
