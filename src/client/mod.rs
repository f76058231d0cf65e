//! Adapter client and builder.

use crate::config::AdapterConfig;
use crate::error::{ConfigurationError, S3Error};
use crate::services::{BucketsService, ObjectsService};
use crate::signing::Signer;
use crate::transport::{HttpTransport, ReqwestTransport};
use once_cell::sync::OnceCell;
use std::sync::Arc;

/// Client trait.
pub trait S3Client: Send + Sync {
    /// Get the objects service.
    fn objects(&self) -> &ObjectsService;

    /// Get the buckets service.
    fn buckets(&self) -> &BucketsService;

    /// Get the client configuration.
    fn config(&self) -> &AdapterConfig;
}

/// Client implementation.
pub struct S3AdapterClient {
    config: Arc<AdapterConfig>,
    transport: Arc<dyn HttpTransport>,
    signer: Arc<dyn Signer>,

    objects: OnceCell<ObjectsService>,
    buckets: OnceCell<BucketsService>,
}

impl S3AdapterClient {
    /// Create a client from its parts.
    pub fn new(
        config: AdapterConfig,
        transport: Arc<dyn HttpTransport>,
        signer: Arc<dyn Signer>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            transport,
            signer,
            objects: OnceCell::new(),
            buckets: OnceCell::new(),
        }
    }

    /// Create a builder.
    pub fn builder() -> S3AdapterClientBuilder {
        S3AdapterClientBuilder::new()
    }
}

impl S3Client for S3AdapterClient {
    fn objects(&self) -> &ObjectsService {
        self.objects.get_or_init(|| {
            ObjectsService::new(
                self.config.clone(),
                self.transport.clone(),
                self.signer.clone(),
            )
        })
    }

    fn buckets(&self) -> &BucketsService {
        self.buckets.get_or_init(|| {
            BucketsService::new(
                self.config.clone(),
                self.transport.clone(),
                self.signer.clone(),
            )
        })
    }

    fn config(&self) -> &AdapterConfig {
        &self.config
    }
}

impl std::fmt::Debug for S3AdapterClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3AdapterClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Builder for [`S3AdapterClient`].
#[derive(Default)]
pub struct S3AdapterClientBuilder {
    config: Option<AdapterConfig>,
    from_env: bool,
    signer: Option<Arc<dyn Signer>>,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl S3AdapterClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the provided configuration.
    pub fn config(mut self, config: AdapterConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Load configuration from environment variables.
    pub fn from_env(mut self) -> Self {
        self.from_env = true;
        self
    }

    /// Signature provider. Required.
    pub fn signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Use a custom HTTP transport.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<S3AdapterClient, S3Error> {
        let signer = self.signer.ok_or(ConfigurationError::MissingSigner)?;

        let config = if let Some(config) = self.config {
            config
        } else if self.from_env {
            AdapterConfig::builder().from_env().build()?
        } else {
            AdapterConfig::default()
        };

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::from_config(&config)?),
        };

        Ok(S3AdapterClient::new(config, transport, signer))
    }
}
