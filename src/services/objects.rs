//! Object operations.

use crate::config::AdapterConfig;
use crate::error::S3Error;
use crate::pipeline::Pipeline;
use crate::signing::Signer;
use crate::transport::HttpTransport;
use crate::types::*;
use std::sync::Arc;
use tracing::instrument;

/// Service for delete, get and put.
#[derive(Debug)]
pub struct ObjectsService {
    pipeline: Pipeline,
}

impl ObjectsService {
    /// Create a new objects service.
    pub fn new(
        config: Arc<AdapterConfig>,
        transport: Arc<dyn HttpTransport>,
        signer: Arc<dyn Signer>,
    ) -> Self {
        Self {
            pipeline: Pipeline::new(config, signer, transport),
        }
    }

    /// Delete an object.
    ///
    /// Succeeds on status 204 with the delete marker, request ID and version ID
    /// taken from the response headers.
    #[instrument(skip(self, request), fields(bucket = ?request.bucket_name, key = ?request.object_key))]
    pub async fn delete(&self, request: DeleteObjectRequest) -> Result<DeleteObjectOutput, S3Error> {
        let operation = request.into_operation()?;
        self.pipeline.execute(operation).await?.into_delete()
    }

    /// Fetch an object.
    #[instrument(skip(self, request), fields(bucket = ?request.bucket_name, key = ?request.object_key))]
    pub async fn get(&self, request: GetObjectRequest) -> Result<GetObjectOutput, S3Error> {
        let operation = request.into_operation()?;
        self.pipeline.execute(operation).await?.into_get()
    }

    /// Store an object.
    ///
    /// Structured payloads are encoded to JSON before anything is signed or
    /// sent; an encoding failure returns [`S3Error::Serialization`].
    #[instrument(skip(self, request), fields(bucket = ?request.bucket_name, key = ?request.object_key))]
    pub async fn put(&self, request: PutObjectRequest) -> Result<PutObjectOutput, S3Error> {
        let operation = request.into_operation()?;
        self.pipeline.execute(operation).await?.into_put()
    }
}
