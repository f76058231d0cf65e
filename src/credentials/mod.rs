//! Per-request credentials.
//!
//! Credentials arrive with every operation's parameters and are handed to the
//! signer once; they are never stored beyond the call.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use std::fmt;

/// Access key pair used to sign a single request.
#[derive(Clone)]
pub struct Credentials {
    access_key_id: String,
    secret_access_key: SecretString,
}

impl Credentials {
    /// Create a credential pair.
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: SecretString::new(secret_access_key.into()),
        }
    }

    pub(crate) fn from_parts(access_key_id: &str, secret_access_key: &SecretString) -> Self {
        Self {
            access_key_id: access_key_id.to_string(),
            secret_access_key: secret_access_key.clone(),
        }
    }

    /// Get the access key ID.
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    /// Get the secret access key.
    ///
    /// Note: This exposes the secret. Use carefully and avoid logging.
    pub fn secret_access_key(&self) -> &str {
        self.secret_access_key.expose_secret()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"[REDACTED]")
            .finish()
    }
}

/// Deserialize an optional secret without requiring serde support in `secrecy`.
pub(crate) fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(SecretString::new))
}

/// True when the secret is present and non-empty.
pub(crate) fn secret_present(secret: &Option<SecretString>) -> bool {
    secret
        .as_ref()
        .map(|s| !s.expose_secret().is_empty())
        .unwrap_or(false)
}
