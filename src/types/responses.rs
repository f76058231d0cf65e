//! Result types for the four operations.
//!
//! Each optional field is populated only when the storage service sent the
//! corresponding header or element; absent fields are omitted when the result
//! is serialized.

use super::common::Owner;
use serde::Serialize;

/// Object expiration rule decoded from the `x-amz-expiration` header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Expiration {
    /// Expiry timestamp, `YYYY-MM-DDTHH:MM:SS.sssZ`.
    #[serde(rename = "expiry-date")]
    pub expiry_date: String,
    /// Lifecycle rule ID.
    #[serde(rename = "rule-id")]
    pub rule_id: String,
}

/// Result of a successful delete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteObjectOutput {
    /// Set when the service created or removed a delete marker. Never `Some(false)`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_marker: Option<bool>,
    /// Request ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// Version ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
}

/// Result of a successful object fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetObjectOutput {
    /// Object content. Absent when the body was empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
    /// ETag without quotes.
    #[serde(rename = "ETag", skip_serializing_if = "Option::is_none")]
    pub e_tag: Option<String>,
    /// Delete marker flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_marker: Option<bool>,
    /// Expiration rule.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration: Option<Expiration>,
    /// Request ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// Archive restore status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restore: Option<String>,
    /// Server-side encryption algorithm.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_side_encryption: Option<String>,
    /// Version ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
    /// Website redirect location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website_redirect_location: Option<String>,
}

/// Result of a successful put.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PutObjectOutput {
    /// ETag without quotes.
    #[serde(rename = "ETag", skip_serializing_if = "Option::is_none")]
    pub e_tag: Option<String>,
    /// Expiration rule.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration: Option<Expiration>,
    /// Server-side encryption algorithm.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_side_encryption: Option<String>,
    /// Version ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
    /// Request ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// One `<Contents>` entry of a bucket listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectEntry {
    /// Object key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// ETag without quotes.
    #[serde(rename = "ETag", skip_serializing_if = "Option::is_none")]
    pub e_tag: Option<String>,
    /// Last modification time as sent by the service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    /// Size in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Storage class.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,
    /// Owner, when the listing includes one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<Owner>,
}

/// Result of a successful bucket listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBucketOutput {
    /// Whether more keys remain beyond this page.
    pub is_truncated: bool,
    /// Marker echoed back by the service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
    /// Prefix echoed back by the service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// Page size limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_keys: Option<u32>,
    /// Bucket name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Delimiter echoed back by the service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<String>,
    /// Marker to pass for the next page when a delimiter was used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_marker: Option<String>,
    /// Key prefixes rolled up by the delimiter.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub common_prefixes: Vec<String>,
    /// Listed objects, in document order. Always present, possibly empty.
    pub contents: Vec<ObjectEntry>,
}

impl ListBucketOutput {
    /// Keys of the listed objects.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.contents.iter().filter_map(|entry| entry.key.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_output_serializes_etag_name() {
        let output = PutObjectOutput {
            e_tag: Some("e".into()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&output).unwrap(),
            serde_json::json!({ "ETag": "e" })
        );
    }

    #[test]
    fn test_expiration_serializes_hyphenated() {
        let output = GetObjectOutput {
            expiration: Some(Expiration {
                expiry_date: "2012-12-23T00:00:00.000Z".into(),
                rule_id: "1".into(),
            }),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&output).unwrap(),
            serde_json::json!({
                "expiration": { "expiry-date": "2012-12-23T00:00:00.000Z", "rule-id": "1" }
            })
        );
    }

    #[test]
    fn test_empty_listing_keeps_contents() {
        let json = serde_json::to_value(ListBucketOutput::default()).unwrap();
        assert_eq!(json, serde_json::json!({ "isTruncated": false, "contents": [] }));
    }
}
