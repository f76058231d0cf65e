//! Parameter objects for the four operations.
//!
//! Every field is optional at the type level so that a parameter object can be
//! deserialized straight from an inbound message and validated afterwards.
//! Required fields are checked in a fixed order and the first missing one is
//! reported; empty strings count as missing.

use super::common::{
    deserialize_count, deserialize_object, deserialize_string_or_number, encode_query_value,
    ObjectBody, Verb,
};
use crate::credentials::{deserialize_secret, secret_present, Credentials};
use crate::error::S3Error;
use crate::pipeline::OperationRequest;
use secrecy::SecretString;
use serde::Deserialize;
use std::collections::BTreeMap;

type Result<T> = std::result::Result<T, S3Error>;

fn required<'a>(value: &'a Option<String>, field: &'static str) -> Result<&'a str> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(S3Error::MissingParameter { field }),
    }
}

fn required_secret<'a>(
    value: &'a Option<SecretString>,
    field: &'static str,
) -> Result<&'a SecretString> {
    match value {
        Some(secret) if secret_present(value) => Ok(secret),
        _ => Err(S3Error::MissingParameter { field }),
    }
}

fn set_header(headers: &mut BTreeMap<String, String>, name: &str, value: &Option<String>) {
    if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
        headers.insert(name.to_string(), v.to_string());
    }
}

fn push_param(params: &mut Vec<String>, name: &str, value: Option<&str>) {
    if let Some(v) = value.filter(|v| !v.is_empty()) {
        params.push(format!("{}={}", name, encode_query_value(v)));
    }
}

/// Parameters for deleting an object.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeleteObjectRequest {
    /// Access key ID.
    #[serde(alias = "awsAccessKeyId")]
    pub access_key_id: Option<String>,
    /// Bucket name.
    pub bucket_name: Option<String>,
    /// Object key.
    #[serde(alias = "objectName")]
    pub object_key: Option<String>,
    /// Secret access key.
    #[serde(deserialize_with = "deserialize_secret")]
    pub secret_access_key: Option<SecretString>,
    /// Multi-factor authentication token (`x-amz-mfa`).
    pub mfa: Option<String>,
}

impl DeleteObjectRequest {
    /// Create a request for the given bucket and key.
    pub fn new(bucket_name: impl Into<String>, object_key: impl Into<String>) -> Self {
        Self {
            bucket_name: Some(bucket_name.into()),
            object_key: Some(object_key.into()),
            ..Default::default()
        }
    }

    /// Set the credentials used to sign the request.
    pub fn with_credentials(
        mut self,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        self.access_key_id = Some(access_key_id.into());
        self.secret_access_key = Some(SecretString::new(secret_access_key.into()));
        self
    }

    /// Set the MFA token.
    pub fn with_mfa(mut self, mfa: impl Into<String>) -> Self {
        self.mfa = Some(mfa.into());
        self
    }

    /// Validate and translate into a request descriptor.
    pub fn into_operation(&self) -> Result<OperationRequest> {
        let access_key_id = required(&self.access_key_id, "accessKeyId")?;
        let bucket_name = required(&self.bucket_name, "bucketName")?;
        let object_key = required(&self.object_key, "objectKey")?;
        let secret = required_secret(&self.secret_access_key, "secretAccessKey")?;

        let mut request = OperationRequest::object(
            Verb::Delete,
            bucket_name,
            object_key,
            Credentials::from_parts(access_key_id, secret),
        );
        set_header(&mut request.headers, "x-amz-mfa", &self.mfa);

        Ok(request)
    }
}

/// Parameters for fetching an object.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetObjectRequest {
    /// Access key ID.
    #[serde(alias = "awsAccessKeyId")]
    pub access_key_id: Option<String>,
    /// Bucket name.
    pub bucket_name: Option<String>,
    /// Object key.
    #[serde(alias = "objectName")]
    pub object_key: Option<String>,
    /// Secret access key.
    #[serde(deserialize_with = "deserialize_secret")]
    pub secret_access_key: Option<SecretString>,
    /// `If-Match` precondition.
    pub if_match: Option<String>,
    /// `If-Modified-Since` precondition.
    pub if_modified_since: Option<String>,
    /// `If-None-Match` precondition.
    pub if_none_match: Option<String>,
    /// `If-Unmodified-Since` precondition.
    pub if_unmodified_since: Option<String>,
    /// Byte range.
    pub range: Option<String>,
    /// Override for the response `Cache-Control`.
    pub response_cache_control: Option<String>,
    /// Override for the response `Content-Disposition`.
    pub response_content_disposition: Option<String>,
    /// Override for the response `Content-Encoding`.
    pub response_content_encoding: Option<String>,
    /// Override for the response `Content-Language`.
    pub response_content_language: Option<String>,
    /// Override for the response `Content-Type`.
    pub response_content_type: Option<String>,
    /// Override for the response `Expires`.
    pub response_expires: Option<String>,
}

impl GetObjectRequest {
    /// Create a request for the given bucket and key.
    pub fn new(bucket_name: impl Into<String>, object_key: impl Into<String>) -> Self {
        Self {
            bucket_name: Some(bucket_name.into()),
            object_key: Some(object_key.into()),
            ..Default::default()
        }
    }

    /// Set the credentials used to sign the request.
    pub fn with_credentials(
        mut self,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        self.access_key_id = Some(access_key_id.into());
        self.secret_access_key = Some(SecretString::new(secret_access_key.into()));
        self
    }

    /// Only return the object if its ETag matches.
    pub fn with_if_match(mut self, etag: impl Into<String>) -> Self {
        self.if_match = Some(etag.into());
        self
    }

    /// Only return the object if its ETag differs.
    pub fn with_if_none_match(mut self, etag: impl Into<String>) -> Self {
        self.if_none_match = Some(etag.into());
        self
    }

    /// Set the byte range, e.g. `bytes=0-99`.
    pub fn with_range(mut self, range: impl Into<String>) -> Self {
        self.range = Some(range.into());
        self
    }

    /// Override the response content type.
    pub fn with_response_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.response_content_type = Some(content_type.into());
        self
    }

    /// Validate and translate into a request descriptor.
    pub fn into_operation(&self) -> Result<OperationRequest> {
        let access_key_id = required(&self.access_key_id, "accessKeyId")?;
        let bucket_name = required(&self.bucket_name, "bucketName")?;
        let object_key = required(&self.object_key, "objectKey")?;
        let secret = required_secret(&self.secret_access_key, "secretAccessKey")?;

        let mut request = OperationRequest::object(
            Verb::Get,
            bucket_name,
            object_key,
            Credentials::from_parts(access_key_id, secret),
        );

        let headers = &mut request.headers;
        set_header(headers, "If-Match", &self.if_match);
        set_header(headers, "If-Modified-Since", &self.if_modified_since);
        set_header(headers, "If-None-Match", &self.if_none_match);
        set_header(headers, "If-Unmodified-Since", &self.if_unmodified_since);
        set_header(headers, "Range", &self.range);
        set_header(headers, "response-cache-control", &self.response_cache_control);
        set_header(
            headers,
            "response-content-disposition",
            &self.response_content_disposition,
        );
        set_header(
            headers,
            "response-content-encoding",
            &self.response_content_encoding,
        );
        set_header(
            headers,
            "response-content-language",
            &self.response_content_language,
        );
        set_header(headers, "response-content-type", &self.response_content_type);
        set_header(headers, "response-expires", &self.response_expires);

        Ok(request)
    }
}

/// Parameters for storing an object.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PutObjectRequest {
    /// Access key ID.
    #[serde(alias = "awsAccessKeyId")]
    pub access_key_id: Option<String>,
    /// Bucket name.
    pub bucket_name: Option<String>,
    /// Payload. An empty text payload is valid; `None` is not.
    #[serde(deserialize_with = "deserialize_object")]
    pub object: Option<ObjectBody>,
    /// Object key.
    #[serde(alias = "objectName")]
    pub object_key: Option<String>,
    /// Secret access key.
    #[serde(deserialize_with = "deserialize_secret")]
    pub secret_access_key: Option<SecretString>,
    /// Canned ACL (`x-amz-acl`).
    pub acl: Option<String>,
    /// `Cache-Control` header.
    pub cache_control: Option<String>,
    /// `Content-Disposition` header.
    pub content_disposition: Option<String>,
    /// `Content-Encoding` header.
    pub content_encoding: Option<String>,
    /// `Content-Length` header. Accepts a string or a number when deserialized.
    #[serde(deserialize_with = "deserialize_string_or_number")]
    pub content_length: Option<String>,
    /// `Content-MD5` header.
    #[serde(rename = "contentMD5", alias = "contentMd5")]
    pub content_md5: Option<String>,
    /// `Content-Type` header.
    pub content_type: Option<String>,
    /// `Expires` header.
    pub expires: Option<String>,
    /// `x-amz-grant-read` header.
    pub grant_read: Option<String>,
    /// `x-amz-grant-read-acp` header.
    pub grant_read_acp: Option<String>,
    /// `x-amz-grant-write-acp` header.
    pub grant_write_acp: Option<String>,
    /// `x-amz-grant-full-control` header.
    pub grant_full_control: Option<String>,
    /// User metadata, sent as `x-amz-meta-<name>` headers.
    pub meta: BTreeMap<String, String>,
    /// `x-amz-server-side-encryption` header.
    pub server_side_encryption: Option<String>,
    /// `x-amz-storage-class` header.
    pub storage_class: Option<String>,
    /// `x-amz-website-redirect-location` header.
    pub website_redirect_location: Option<String>,
}

impl PutObjectRequest {
    /// Create a request storing `object` under the given bucket and key.
    pub fn new(
        bucket_name: impl Into<String>,
        object_key: impl Into<String>,
        object: impl Into<ObjectBody>,
    ) -> Self {
        Self {
            bucket_name: Some(bucket_name.into()),
            object_key: Some(object_key.into()),
            object: Some(object.into()),
            ..Default::default()
        }
    }

    /// Set the credentials used to sign the request.
    pub fn with_credentials(
        mut self,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        self.access_key_id = Some(access_key_id.into());
        self.secret_access_key = Some(SecretString::new(secret_access_key.into()));
        self
    }

    /// Set the content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Set the canned ACL.
    pub fn with_acl(mut self, acl: impl Into<String>) -> Self {
        self.acl = Some(acl.into());
        self
    }

    /// Set the storage class.
    pub fn with_storage_class(mut self, storage_class: impl Into<String>) -> Self {
        self.storage_class = Some(storage_class.into());
        self
    }

    /// Add a metadata entry.
    pub fn with_meta(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta.insert(name.into(), value.into());
        self
    }

    /// Validate, encode the payload and translate into a request descriptor.
    ///
    /// Fails with [`S3Error::Serialization`] when a structured payload has no
    /// JSON representation.
    pub fn into_operation(&self) -> Result<OperationRequest> {
        let access_key_id = required(&self.access_key_id, "accessKeyId")?;
        let bucket_name = required(&self.bucket_name, "bucketName")?;
        let object = self
            .object
            .as_ref()
            .ok_or(S3Error::MissingParameter { field: "object" })?;
        let object_key = required(&self.object_key, "objectKey")?;
        let secret = required_secret(&self.secret_access_key, "secretAccessKey")?;

        let body = object.to_bytes()?;

        let mut request = OperationRequest::object(
            Verb::Put,
            bucket_name,
            object_key,
            Credentials::from_parts(access_key_id, secret),
        )
        .with_body(body);

        let headers = &mut request.headers;
        set_header(headers, "x-amz-acl", &self.acl);
        set_header(headers, "Cache-Control", &self.cache_control);
        set_header(headers, "Content-Disposition", &self.content_disposition);
        set_header(headers, "Content-Encoding", &self.content_encoding);
        set_header(headers, "Content-Length", &self.content_length);
        set_header(headers, "Content-MD5", &self.content_md5);
        set_header(headers, "Content-Type", &self.content_type);
        set_header(headers, "Expires", &self.expires);
        set_header(headers, "x-amz-grant-read", &self.grant_read);
        set_header(headers, "x-amz-grant-read-acp", &self.grant_read_acp);
        set_header(headers, "x-amz-grant-write-acp", &self.grant_write_acp);
        set_header(headers, "x-amz-grant-full-control", &self.grant_full_control);
        for (name, value) in &self.meta {
            headers.insert(format!("x-amz-meta-{}", name), value.clone());
        }
        set_header(
            headers,
            "x-amz-server-side-encryption",
            &self.server_side_encryption,
        );
        set_header(headers, "x-amz-storage-class", &self.storage_class);
        set_header(
            headers,
            "x-amz-website-redirect-location",
            &self.website_redirect_location,
        );

        Ok(request)
    }
}

/// Parameters for listing a bucket.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetBucketRequest {
    /// Access key ID.
    #[serde(alias = "awsAccessKeyId")]
    pub access_key_id: Option<String>,
    /// Bucket name.
    pub bucket_name: Option<String>,
    /// Secret access key.
    #[serde(deserialize_with = "deserialize_secret")]
    pub secret_access_key: Option<SecretString>,
    /// Group keys sharing a prefix up to this delimiter.
    pub delimiter: Option<String>,
    /// Start listing after this key.
    pub marker: Option<String>,
    /// Maximum number of keys to return. Zero is treated as unset. Accepts a
    /// string or a number when deserialized.
    #[serde(deserialize_with = "deserialize_count")]
    pub max_keys: Option<u32>,
    /// Only list keys with this prefix.
    pub prefix: Option<String>,
}

impl GetBucketRequest {
    /// Create a request listing the given bucket.
    pub fn new(bucket_name: impl Into<String>) -> Self {
        Self {
            bucket_name: Some(bucket_name.into()),
            ..Default::default()
        }
    }

    /// Set the credentials used to sign the request.
    pub fn with_credentials(
        mut self,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        self.access_key_id = Some(access_key_id.into());
        self.secret_access_key = Some(SecretString::new(secret_access_key.into()));
        self
    }

    /// Set the delimiter.
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = Some(delimiter.into());
        self
    }

    /// Set the marker.
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = Some(marker.into());
        self
    }

    /// Set the maximum number of keys.
    pub fn with_max_keys(mut self, max_keys: u32) -> Self {
        self.max_keys = Some(max_keys);
        self
    }

    /// Set the key prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Validate and translate into a request descriptor.
    ///
    /// Query parameters are emitted in the order delimiter, marker, max-keys,
    /// prefix, each percent-encoded.
    pub fn into_operation(&self) -> Result<OperationRequest> {
        let access_key_id = required(&self.access_key_id, "accessKeyId")?;
        let bucket_name = required(&self.bucket_name, "bucketName")?;
        let secret = required_secret(&self.secret_access_key, "secretAccessKey")?;

        let mut request = OperationRequest::bucket(
            Verb::Get,
            bucket_name,
            Credentials::from_parts(access_key_id, secret),
        );

        let max_keys = self.max_keys.filter(|n| *n > 0).map(|n| n.to_string());
        let params = &mut request.query_params;
        push_param(params, "delimiter", self.delimiter.as_deref());
        push_param(params, "marker", self.marker.as_deref());
        push_param(params, "max-keys", max_keys.as_deref());
        push_param(params, "prefix", self.prefix.as_deref());

        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ActionType;
    use bytes::Bytes;

    #[test]
    fn test_delete_request_headers() {
        let op = DeleteObjectRequest::new("b", "k")
            .with_credentials("a", "s")
            .with_mfa("20899872 301749")
            .into_operation()
            .unwrap();

        assert_eq!(op.verb, Verb::Delete);
        assert_eq!(op.object_key.as_deref(), Some("k"));
        assert_eq!(op.headers.get("x-amz-mfa").unwrap(), "20899872 301749");
        assert!(op.body.is_none());
    }

    #[test]
    fn test_delete_checks_fields_in_order() {
        let err = DeleteObjectRequest::default().into_operation().unwrap_err();
        assert!(err.is_missing_parameter("accessKeyId"));

        let err = DeleteObjectRequest {
            access_key_id: Some("a".into()),
            ..Default::default()
        }
        .into_operation()
        .unwrap_err();
        assert!(err.is_missing_parameter("bucketName"));
    }

    #[test]
    fn test_empty_string_counts_as_missing() {
        let err = GetObjectRequest::new("b", "")
            .with_credentials("a", "s")
            .into_operation()
            .unwrap_err();
        assert!(err.is_missing_parameter("objectKey"));

        let err = GetObjectRequest::new("b", "k")
            .with_credentials("a", "")
            .into_operation()
            .unwrap_err();
        assert!(err.is_missing_parameter("secretAccessKey"));
    }

    #[test]
    fn test_get_request_headers() {
        let op = GetObjectRequest::new("b", "k")
            .with_credentials("a", "s")
            .with_if_none_match("abc")
            .with_range("bytes=0-9")
            .with_response_content_type("text/plain")
            .into_operation()
            .unwrap();

        assert_eq!(op.headers.len(), 3);
        assert_eq!(op.headers.get("If-None-Match").unwrap(), "abc");
        assert_eq!(op.headers.get("Range").unwrap(), "bytes=0-9");
        assert_eq!(op.headers.get("response-content-type").unwrap(), "text/plain");
    }

    #[test]
    fn test_put_empty_object_is_valid() {
        let op = PutObjectRequest::new("b", "k", "")
            .with_credentials("a", "s")
            .into_operation()
            .unwrap();

        assert_eq!(op.verb, Verb::Put);
        assert_eq!(op.body, Some(Bytes::new()));
        assert!(op.headers.is_empty());
    }

    #[test]
    fn test_put_missing_object_checked_before_key() {
        let err = PutObjectRequest {
            access_key_id: Some("a".into()),
            bucket_name: Some("b".into()),
            ..Default::default()
        }
        .into_operation()
        .unwrap_err();
        assert!(err.is_missing_parameter("object"));
    }

    #[test]
    fn test_put_headers_and_metadata() {
        let op = PutObjectRequest::new("b", "k", "hello")
            .with_credentials("a", "s")
            .with_acl("public-read")
            .with_content_type("text/plain")
            .with_storage_class("REDUCED_REDUNDANCY")
            .with_meta("author", "me")
            .into_operation()
            .unwrap();

        assert_eq!(op.headers.get("x-amz-acl").unwrap(), "public-read");
        assert_eq!(op.headers.get("Content-Type").unwrap(), "text/plain");
        assert_eq!(
            op.headers.get("x-amz-storage-class").unwrap(),
            "REDUCED_REDUNDANCY"
        );
        assert_eq!(op.headers.get("x-amz-meta-author").unwrap(), "me");
        assert_eq!(op.body, Some(Bytes::from("hello")));
    }

    #[test]
    fn test_bucket_query_params_order_and_encoding() {
        let op = GetBucketRequest::new("b")
            .with_credentials("a", "s")
            .with_prefix("photos/2012/")
            .with_max_keys(40)
            .with_marker("photos/2012/a b")
            .with_delimiter("/")
            .into_operation()
            .unwrap();

        assert_eq!(op.action_type, ActionType::Bucket);
        assert!(op.object_key.is_none());
        assert_eq!(
            op.query_params,
            vec![
                "delimiter=%2F".to_string(),
                "marker=photos%2F2012%2Fa%20b".to_string(),
                "max-keys=40".to_string(),
                "prefix=photos%2F2012%2F".to_string(),
            ]
        );
    }

    #[test]
    fn test_deserialize_legacy_field_names() {
        let request: PutObjectRequest = serde_json::from_value(serde_json::json!({
            "awsAccessKeyId": "a",
            "bucketName": "b",
            "objectName": "k",
            "object": { "my": "test object" },
            "secretAccessKey": "s",
            "contentMD5": "abc==",
            "meta": { "color": "blue" }
        }))
        .unwrap();

        let op = request.into_operation().unwrap();
        assert_eq!(op.credentials.access_key_id(), "a");
        assert_eq!(op.object_key.as_deref(), Some("k"));
        assert_eq!(op.body, Some(Bytes::from(r#"{"my":"test object"}"#)));
        assert_eq!(op.headers.get("Content-MD5").unwrap(), "abc==");
        assert_eq!(op.headers.get("x-amz-meta-color").unwrap(), "blue");
    }

    #[test]
    fn test_deserialize_numeric_content_length() {
        let request: PutObjectRequest = serde_json::from_value(serde_json::json!({
            "awsAccessKeyId": "a",
            "bucketName": "b",
            "objectName": "k",
            "object": "integration test content",
            "secretAccessKey": "s",
            "contentLength": 24
        }))
        .unwrap();

        let op = request.into_operation().unwrap();
        assert_eq!(op.headers.get("Content-Length").unwrap(), "24");
    }

    #[test]
    fn test_deserialize_falsy_object_is_missing() {
        for object in [serde_json::json!(false), serde_json::json!(0)] {
            let request: PutObjectRequest = serde_json::from_value(serde_json::json!({
                "awsAccessKeyId": "a",
                "bucketName": "b",
                "objectName": "k",
                "object": object,
                "secretAccessKey": "s"
            }))
            .unwrap();

            let err = request.into_operation().unwrap_err();
            assert!(err.is_missing_parameter("object"));
        }
    }

    #[test]
    fn test_deserialize_string_max_keys() {
        let request: GetBucketRequest = serde_json::from_value(serde_json::json!({
            "awsAccessKeyId": "a",
            "bucketName": "b",
            "secretAccessKey": "s",
            "maxKeys": "50"
        }))
        .unwrap();
        assert_eq!(request.max_keys, Some(50));

        let op = request.into_operation().unwrap();
        assert_eq!(op.query_params, vec!["max-keys=50".to_string()]);

        let request: GetBucketRequest =
            serde_json::from_value(serde_json::json!({ "maxKeys": 25 })).unwrap();
        assert_eq!(request.max_keys, Some(25));
    }

    #[test]
    fn test_zero_max_keys_is_not_sent() {
        let op = GetBucketRequest::new("b")
            .with_credentials("a", "s")
            .with_max_keys(0)
            .with_prefix("p")
            .into_operation()
            .unwrap();

        assert_eq!(op.query_params, vec!["prefix=p".to_string()]);
    }
}
