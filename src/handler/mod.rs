//! Entry points for callers that may not want the outcome.
//!
//! Each operation takes an optional reply channel. Without one, a listing or
//! object fetch has nothing to deliver and returns at once without signing or
//! sending anything. Deletes and puts have side effects, so they always run
//! and their outcome is only logged.

use crate::client::S3Client;
use crate::error::S3Error;
use crate::types::*;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// Channel on which an operation's outcome is delivered.
pub type Reply<T> = oneshot::Sender<Result<T, S3Error>>;

/// Dispatches operations and routes outcomes to optional reply channels.
#[derive(Clone)]
pub struct OperationHandler {
    client: Arc<dyn S3Client>,
}

impl OperationHandler {
    /// Wrap a client.
    pub fn new(client: Arc<dyn S3Client>) -> Self {
        Self { client }
    }

    /// Delete an object. Runs whether or not a reply channel is given.
    pub async fn delete_object(
        &self,
        request: DeleteObjectRequest,
        reply: Option<Reply<DeleteObjectOutput>>,
    ) {
        let result = self.client.objects().delete(request).await;
        deliver("deleteObject", result, reply);
    }

    /// Fetch an object. Does nothing without a reply channel.
    pub async fn get_object(&self, request: GetObjectRequest, reply: Option<Reply<GetObjectOutput>>) {
        let Some(reply) = reply else {
            debug!(operation = "getObject", "No reply channel, skipping");
            return;
        };
        let result = self.client.objects().get(request).await;
        deliver("getObject", result, Some(reply));
    }

    /// Store an object. Runs whether or not a reply channel is given.
    pub async fn put_object(&self, request: PutObjectRequest, reply: Option<Reply<PutObjectOutput>>) {
        let result = self.client.objects().put(request).await;
        deliver("putObject", result, reply);
    }

    /// List a bucket. Does nothing without a reply channel.
    pub async fn get_bucket(&self, request: GetBucketRequest, reply: Option<Reply<ListBucketOutput>>) {
        let Some(reply) = reply else {
            debug!(operation = "getBucket", "No reply channel, skipping");
            return;
        };
        let result = self.client.buckets().get_bucket(request).await;
        deliver("getBucket", result, Some(reply));
    }
}

impl std::fmt::Debug for OperationHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationHandler")
            .field("config", self.client.config())
            .finish_non_exhaustive()
    }
}

fn deliver<T>(operation: &'static str, result: Result<T, S3Error>, reply: Option<Reply<T>>) {
    match reply {
        Some(reply) => {
            if reply.send(result).is_err() {
                debug!(operation, "Reply receiver dropped");
            }
        }
        None => {
            if let Err(e) = result {
                warn!(operation, error = %e, "Operation failed with no reply channel");
            }
        }
    }
}
