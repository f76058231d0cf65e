//! Response interpretation.
//!
//! The parser is chosen by the request verb. PUT and GET succeed on 200 and
//! DELETE on 204. Any other status decodes the body as an `<Error>` document,
//! falling back to the raw body when it is not one. A successful GET on a
//! bucket-level request decodes the body as a listing instead of returning it
//! as object content.

mod expiration;

pub use expiration::extract_expiration;

use crate::error::{ProviderError, ResponseError, S3Error};
use crate::transport::ResponseEnvelope;
use crate::types::{
    ActionType, DeleteObjectOutput, GetObjectOutput, ListBucketOutput, PutObjectOutput, Verb,
};
use crate::xml;
use tracing::debug;

/// Decoded result of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedResponse {
    /// Successful put.
    Put(PutObjectOutput),
    /// Successful object fetch.
    Get(GetObjectOutput),
    /// Successful delete.
    Delete(DeleteObjectOutput),
    /// Successful listing.
    List(ListBucketOutput),
}

impl ParsedResponse {
    fn kind(&self) -> &'static str {
        match self {
            ParsedResponse::Put(_) => "put",
            ParsedResponse::Get(_) => "get",
            ParsedResponse::Delete(_) => "delete",
            ParsedResponse::List(_) => "list",
        }
    }

    fn mismatch(self, expected: &'static str) -> S3Error {
        S3Error::Response(ResponseError::UnexpectedResponse {
            expected,
            actual: self.kind(),
        })
    }

    /// Unwrap a put result.
    pub fn into_put(self) -> Result<PutObjectOutput, S3Error> {
        match self {
            ParsedResponse::Put(output) => Ok(output),
            other => Err(other.mismatch("put")),
        }
    }

    /// Unwrap an object fetch result.
    pub fn into_get(self) -> Result<GetObjectOutput, S3Error> {
        match self {
            ParsedResponse::Get(output) => Ok(output),
            other => Err(other.mismatch("get")),
        }
    }

    /// Unwrap a delete result.
    pub fn into_delete(self) -> Result<DeleteObjectOutput, S3Error> {
        match self {
            ParsedResponse::Delete(output) => Ok(output),
            other => Err(other.mismatch("delete")),
        }
    }

    /// Unwrap a listing result.
    pub fn into_list(self) -> Result<ListBucketOutput, S3Error> {
        match self {
            ParsedResponse::List(output) => Ok(output),
            other => Err(other.mismatch("list")),
        }
    }
}

/// Remove every `"` character.
pub fn strip_quotes(value: &str) -> String {
    value.replace('"', "")
}

/// Interpret a response envelope.
pub fn parse(envelope: &ResponseEnvelope) -> Result<ParsedResponse, S3Error> {
    debug!(headers = ?envelope.headers, "Response headers");
    debug!(body = %envelope.body, "Response body");

    match envelope.verb {
        Verb::Put => parse_put(envelope),
        Verb::Get => parse_get(envelope),
        Verb::Delete => parse_delete(envelope),
        Verb::Head | Verb::Post => Err(S3Error::NotImplemented {
            body: envelope.body.clone(),
        }),
    }
}

/// Decode an error body into the error to surface.
pub fn provider_error(body: &str) -> S3Error {
    match xml::parse_error_document(body) {
        Ok(error) => S3Error::Provider(error),
        Err(e) => {
            debug!(error = %e, "Error body is not an error document");
            S3Error::Provider(ProviderError::from_raw_body(body))
        }
    }
}

fn header(envelope: &ResponseEnvelope, name: &str) -> Option<String> {
    envelope.header(name).map(str::to_string)
}

fn flag(envelope: &ResponseEnvelope, name: &str) -> Option<bool> {
    envelope.header(name).map(|_| true)
}

fn parse_put(envelope: &ResponseEnvelope) -> Result<ParsedResponse, S3Error> {
    if envelope.status != 200 {
        return Err(provider_error(&envelope.body));
    }

    Ok(ParsedResponse::Put(PutObjectOutput {
        e_tag: envelope.header("etag").map(strip_quotes),
        expiration: envelope
            .header("x-amz-expiration")
            .and_then(extract_expiration),
        server_side_encryption: header(envelope, "x-amz-server-side-encryption"),
        version_id: header(envelope, "x-amz-version-id"),
        request_id: header(envelope, "x-amz-request-id"),
    }))
}

fn parse_get(envelope: &ResponseEnvelope) -> Result<ParsedResponse, S3Error> {
    if envelope.status != 200 {
        return Err(provider_error(&envelope.body));
    }

    if envelope.action_type == ActionType::Bucket {
        return parse_list(&envelope.body).map(ParsedResponse::List);
    }

    Ok(ParsedResponse::Get(GetObjectOutput {
        object: Some(envelope.body.clone()).filter(|body| !body.is_empty()),
        e_tag: envelope.header("etag").map(strip_quotes),
        delete_marker: flag(envelope, "x-amz-delete-marker"),
        expiration: envelope
            .header("x-amz-expiration")
            .and_then(extract_expiration),
        request_id: header(envelope, "x-amz-request-id"),
        restore: header(envelope, "x-amz-restore"),
        server_side_encryption: header(envelope, "x-amz-server-side-encryption"),
        version_id: header(envelope, "x-amz-version-id"),
        website_redirect_location: header(envelope, "x-amz-website-redirect-location"),
    }))
}

fn parse_list(body: &str) -> Result<ListBucketOutput, S3Error> {
    xml::parse_list_bucket_result(body).map_err(|e| {
        debug!(error = %e, "Listing body is not a ListBucketResult document");
        S3Error::Provider(ProviderError::from_raw_body(body))
    })
}

fn parse_delete(envelope: &ResponseEnvelope) -> Result<ParsedResponse, S3Error> {
    if envelope.status != 204 {
        return Err(provider_error(&envelope.body));
    }

    Ok(ParsedResponse::Delete(DeleteObjectOutput {
        delete_marker: flag(envelope, "x-amz-delete-marker"),
        request_id: header(envelope, "x-amz-request-id"),
        version_id: header(envelope, "x-amz-version-id"),
    }))
}
