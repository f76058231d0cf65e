//! Bucket listing.

use crate::config::AdapterConfig;
use crate::error::S3Error;
use crate::pipeline::Pipeline;
use crate::signing::Signer;
use crate::transport::HttpTransport;
use crate::types::{GetBucketRequest, ListBucketOutput};
use std::sync::Arc;
use tracing::instrument;

/// Service for bucket listings.
#[derive(Debug)]
pub struct BucketsService {
    pipeline: Pipeline,
}

impl BucketsService {
    /// Create a new buckets service.
    pub fn new(
        config: Arc<AdapterConfig>,
        transport: Arc<dyn HttpTransport>,
        signer: Arc<dyn Signer>,
    ) -> Self {
        Self {
            pipeline: Pipeline::new(config, signer, transport),
        }
    }

    /// List the objects in a bucket, one page at a time.
    #[instrument(skip(self, request), fields(bucket = ?request.bucket_name, prefix = ?request.prefix))]
    pub async fn get_bucket(&self, request: GetBucketRequest) -> Result<ListBucketOutput, S3Error> {
        let operation = request.into_operation()?;
        self.pipeline.execute(operation).await?.into_list()
    }
}
