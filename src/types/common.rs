//! Common enums and data types.

use crate::error::S3Error;
use bytes::Bytes;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::sync::Arc;

/// HTTP verb of a storage request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    /// GET: fetch an object or list a bucket.
    Get,
    /// PUT: store an object.
    Put,
    /// DELETE: remove an object.
    Delete,
    /// HEAD. The response parser has no decoder for it.
    Head,
    /// POST. The response parser has no decoder for it.
    Post,
}

impl Verb {
    /// Returns the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Put => "PUT",
            Verb::Delete => "DELETE",
            Verb::Head => "HEAD",
            Verb::Post => "POST",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Characters left unescaped in query parameter values.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a query parameter value.
pub(crate) fn encode_query_value(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Whether a request addresses an object or the bucket itself.
///
/// A GET with `Bucket` is a listing and its body is decoded as a
/// `ListBucketResult` document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    /// Object-level request.
    #[default]
    Object,
    /// Bucket-level (list) request.
    Bucket,
}

/// Owner of a listed object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    /// Canonical user ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

type JsonEncoder = dyn Fn() -> serde_json::Result<Vec<u8>> + Send + Sync;

/// A structured value that is encoded to JSON when the put request is built.
///
/// Encoding is deferred so that a value which cannot be represented as JSON
/// fails the put operation itself, before any signing or network activity.
#[derive(Clone)]
pub struct JsonPayload {
    encoder: Arc<JsonEncoder>,
}

impl JsonPayload {
    /// Wrap a serializable value.
    pub fn new<T>(value: T) -> Self
    where
        T: Serialize + Send + Sync + 'static,
    {
        Self {
            encoder: Arc::new(move || serde_json::to_vec(&value)),
        }
    }

    /// Encode the value.
    pub fn encode(&self) -> Result<Bytes, S3Error> {
        (self.encoder)()
            .map(Bytes::from)
            .map_err(|e| S3Error::Serialization {
                message: e.to_string(),
            })
    }
}

impl fmt::Debug for JsonPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonPayload").finish_non_exhaustive()
    }
}

/// Payload of a put request.
#[derive(Debug, Clone)]
pub enum ObjectBody {
    /// Raw text, sent as-is. An empty string is a valid payload.
    Text(String),
    /// Raw bytes, sent as-is.
    Binary(Bytes),
    /// Structured value, sent as its JSON encoding.
    Json(JsonPayload),
}

impl ObjectBody {
    /// Structured payload from any serializable value.
    pub fn json<T>(value: T) -> Self
    where
        T: Serialize + Send + Sync + 'static,
    {
        ObjectBody::Json(JsonPayload::new(value))
    }

    /// Bytes to put on the wire.
    pub fn to_bytes(&self) -> Result<Bytes, S3Error> {
        match self {
            ObjectBody::Text(text) => Ok(Bytes::from(text.clone())),
            ObjectBody::Binary(bytes) => Ok(bytes.clone()),
            ObjectBody::Json(payload) => payload.encode(),
        }
    }
}

impl From<String> for ObjectBody {
    fn from(text: String) -> Self {
        ObjectBody::Text(text)
    }
}

impl From<&str> for ObjectBody {
    fn from(text: &str) -> Self {
        ObjectBody::Text(text.to_string())
    }
}

impl From<Bytes> for ObjectBody {
    fn from(bytes: Bytes) -> Self {
        ObjectBody::Binary(bytes)
    }
}

impl From<Vec<u8>> for ObjectBody {
    fn from(bytes: Vec<u8>) -> Self {
        ObjectBody::Binary(Bytes::from(bytes))
    }
}

/// Deserialize an optional put payload.
///
/// Strings become [`ObjectBody::Text`], including the empty string. `null`,
/// `false` and `0` carry no payload and decode as `None`, so validation
/// reports the object as missing. Any other value becomes [`ObjectBody::Json`].
pub(crate) fn deserialize_object<'de, D>(deserializer: D) -> Result<Option<ObjectBody>, D::Error>
where
    D: Deserializer<'de>,
{
    let body = match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null | serde_json::Value::Bool(false) => None,
        serde_json::Value::Number(n) if n.as_f64() == Some(0.0) => None,
        serde_json::Value::String(text) => Some(ObjectBody::Text(text)),
        other => Some(ObjectBody::json(other)),
    };
    Ok(body)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(serde_json::Number),
}

/// Deserialize an optional value sent either as a string or as a number,
/// keeping its text form.
pub(crate) fn deserialize_string_or_number<'de, D>(
    deserializer: D,
) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<StringOrNumber>::deserialize(deserializer)?.map(|value| match value {
            StringOrNumber::String(text) => text,
            StringOrNumber::Number(n) => n.to_string(),
        }),
    )
}

/// Deserialize an optional count sent either as a string or as a number.
/// An empty string decodes as `None`.
pub(crate) fn deserialize_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<StringOrNumber>::deserialize(deserializer)? {
        None => Ok(None),
        Some(StringOrNumber::String(text)) if text.trim().is_empty() => Ok(None),
        Some(StringOrNumber::String(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid count: {}", text))),
        Some(StringOrNumber::Number(n)) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid count: {}", n))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_verb_wire_names() {
        assert_eq!(Verb::Delete.to_string(), "DELETE");
        assert_eq!(Verb::Put.as_str(), "PUT");
    }

    #[test]
    fn test_encode_query_value() {
        assert_eq!(encode_query_value("photos/2012"), "photos%2F2012");
        assert_eq!(encode_query_value("a b&c"), "a%20b%26c");
        assert_eq!(encode_query_value("keep-_.!~*'()"), "keep-_.!~*'()");
    }

    #[test]
    fn test_text_body_is_sent_verbatim() {
        let body = ObjectBody::from("");
        assert_eq!(body.to_bytes().unwrap(), Bytes::new());

        let body = ObjectBody::from("{\"my\":\"test object\"}");
        assert_eq!(body.to_bytes().unwrap(), Bytes::from("{\"my\":\"test object\"}"));
    }

    #[test]
    fn test_json_body_encodes_value() {
        let body = ObjectBody::json(serde_json::json!({ "my": "test object" }));
        assert_eq!(body.to_bytes().unwrap(), Bytes::from(r#"{"my":"test object"}"#));
    }

    #[test]
    fn test_json_body_encoding_failure() {
        let mut map = HashMap::new();
        map.insert((1u8, 2u8), "tuple keys have no JSON form");
        let body = ObjectBody::json(map);

        let err = body.to_bytes().unwrap_err();
        assert!(matches!(err, S3Error::Serialization { .. }));
        assert_eq!(err.status_code(), Some(400));
    }

    #[derive(Deserialize)]
    struct Params {
        #[serde(default, deserialize_with = "deserialize_object")]
        object: Option<ObjectBody>,
        #[serde(default, deserialize_with = "deserialize_string_or_number")]
        length: Option<String>,
        #[serde(default, deserialize_with = "deserialize_count")]
        count: Option<u32>,
    }

    fn params(value: serde_json::Value) -> Params {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_deserialize_object() {
        let text = params(serde_json::json!({ "object": "plain" })).object.unwrap();
        assert!(matches!(text, ObjectBody::Text(ref t) if t == "plain"));

        let empty = params(serde_json::json!({ "object": "" })).object.unwrap();
        assert_eq!(empty.to_bytes().unwrap(), Bytes::new());

        let structured = params(serde_json::json!({ "object": { "a": [1, 2] } })).object.unwrap();
        assert_eq!(structured.to_bytes().unwrap(), Bytes::from(r#"{"a":[1,2]}"#));

        let number = params(serde_json::json!({ "object": 7 })).object.unwrap();
        assert_eq!(number.to_bytes().unwrap(), Bytes::from("7"));
    }

    #[test]
    fn test_falsy_object_is_absent() {
        assert!(params(serde_json::json!({ "object": false })).object.is_none());
        assert!(params(serde_json::json!({ "object": 0 })).object.is_none());
        assert!(params(serde_json::json!({ "object": null })).object.is_none());
        assert!(params(serde_json::json!({})).object.is_none());
    }

    #[test]
    fn test_string_or_number() {
        assert_eq!(params(serde_json::json!({ "length": 20 })).length.as_deref(), Some("20"));
        assert_eq!(params(serde_json::json!({ "length": "20" })).length.as_deref(), Some("20"));
        assert!(params(serde_json::json!({ "length": null })).length.is_none());
    }

    #[test]
    fn test_count_from_string_or_number() {
        assert_eq!(params(serde_json::json!({ "count": 50 })).count, Some(50));
        assert_eq!(params(serde_json::json!({ "count": "50" })).count, Some(50));
        assert_eq!(params(serde_json::json!({ "count": "" })).count, None);
        assert!(serde_json::from_value::<Params>(serde_json::json!({ "count": "many" })).is_err());
        assert!(serde_json::from_value::<Params>(serde_json::json!({ "count": -1 })).is_err());
    }
}
