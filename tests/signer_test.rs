//! Integration tests for RemoteSigner.

use s3_adapter::mocks::{MockResponse, MockTransport};
use s3_adapter::types::*;
use s3_adapter::{
    AdapterConfig, Credentials, RemoteSigner, S3AdapterClient, S3Client, S3Error, SignatureRequest,
    Signer, SigningError,
};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn signature_request() -> SignatureRequest {
    let mut headers = BTreeMap::new();
    headers.insert("Content-Type".to_string(), "text/plain".to_string());

    SignatureRequest {
        verb: Verb::Put,
        bucket_name: "b".to_string(),
        object_key: "k".to_string(),
        headers,
        credentials: Credentials::new("a", "s"),
    }
}

#[tokio::test]
async fn test_remote_signer_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/sign"))
        .and(body_json(json!({
            "httpVerb": "PUT",
            "bucketName": "b",
            "objectName": "k",
            "headers": { "Content-Type": "text/plain" },
            "awsAccessKeyId": "a",
            "secretAccessKey": "s"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "authorization": "AWS a:c2lnbmF0dXJl",
            "date": "Sun, 23 Dec 2012 00:00:00 GMT"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let signer = RemoteSigner::new(format!("{}/sign", mock_server.uri())).unwrap();
    let signature = signer.sign(&signature_request()).await.unwrap();

    assert_eq!(signature.authorization, "AWS a:c2lnbmF0dXJl");
    assert_eq!(signature.date, "Sun, 23 Dec 2012 00:00:00 GMT");
}

#[tokio::test]
async fn test_remote_signer_rejection() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_string("unknown access key"))
        .mount(&mock_server)
        .await;

    let signer = RemoteSigner::new(mock_server.uri()).unwrap();
    let err = signer.sign(&signature_request()).await.unwrap_err();

    match err {
        S3Error::Signing(SigningError::SignerRejected { status, message }) => {
            assert_eq!(status, 403);
            assert_eq!(message, "unknown access key");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn test_remote_signer_invalid_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "authorization": "x" })))
        .mount(&mock_server)
        .await;

    let signer = RemoteSigner::new(mock_server.uri()).unwrap();
    let err = signer.sign(&signature_request()).await.unwrap_err();

    assert!(matches!(err, S3Error::Signing(SigningError::InvalidResponse { .. })));
}

#[tokio::test]
async fn test_remote_signer_unreachable() {
    let mock_server = MockServer::start().await;
    let uri = mock_server.uri();
    drop(mock_server);

    let signer = RemoteSigner::new(uri).unwrap();
    let err = signer.sign(&signature_request()).await.unwrap_err();

    assert!(matches!(err, S3Error::Signing(SigningError::Unavailable { .. })));
}

#[tokio::test]
async fn test_client_with_remote_signer() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/sign"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "authorization": "AWS a:c2lnbmF0dXJl",
            "date": "Sun, 23 Dec 2012 00:00:00 GMT"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let transport = MockTransport::with_default(MockResponse::no_content());
    let client = S3AdapterClient::builder()
        .config(AdapterConfig::default())
        .signer(Arc::new(
            RemoteSigner::new(format!("{}/sign", mock_server.uri())).unwrap(),
        ))
        .transport(Arc::new(transport.clone()))
        .build()
        .unwrap();

    client
        .objects()
        .delete(DeleteObjectRequest::new("b", "k").with_credentials("a", "s"))
        .await
        .unwrap();

    let sent = transport.last_request().unwrap();
    assert_eq!(sent.get_header("Authorization"), Some("AWS a:c2lnbmF0dXJl"));
    assert_eq!(sent.get_header("Date"), Some("Sun, 23 Dec 2012 00:00:00 GMT"));
}
