//! Integration tests for BucketsService.

use s3_adapter::config::AdapterConfig;
use s3_adapter::mocks::{MockResponse, MockSigner, MockTransport, TestFixtures};
use s3_adapter::services::BucketsService;
use s3_adapter::types::*;
use std::sync::Arc;
use test_case::test_case;

fn create_test_service(transport: &MockTransport) -> BucketsService {
    let config = Arc::new(AdapterConfig::default());
    BucketsService::new(config, Arc::new(transport.clone()), Arc::new(MockSigner::new()))
}

fn list_request() -> GetBucketRequest {
    GetBucketRequest::new("bucket").with_credentials("a", "s")
}

#[tokio::test]
async fn test_get_bucket_success() {
    let transport = MockTransport::with_responses(vec![
        MockResponse::ok().with_body(TestFixtures::LIST_BUCKET_RESULT)
    ]);
    let service = create_test_service(&transport);

    let output = service.get_bucket(list_request()).await.unwrap();

    assert_eq!(output.name.as_deref(), Some("bucket"));
    assert_eq!(output.max_keys, Some(1000));
    assert!(!output.is_truncated);
    assert!(output.marker.is_none());
    assert!(output.prefix.is_none());
    assert_eq!(
        output.keys().collect::<Vec<_>>(),
        vec!["my-image.jpg", "my-third-image.jpg"]
    );
    assert_eq!(
        output.contents[1].e_tag.as_deref(),
        Some("1b2cf535f27731c974343645a3985328")
    );
    assert_eq!(output.contents[1].size, Some(64994));

    let recorded = transport.last_request().unwrap();
    assert_eq!(recorded.method, Verb::Get);
    assert_eq!(recorded.url, "https://bucket.s3.amazonaws.com/");
}

#[tokio::test]
async fn test_get_bucket_empty_listing() {
    let transport = MockTransport::with_responses(vec![
        MockResponse::ok().with_body(TestFixtures::EMPTY_LIST_BUCKET_RESULT)
    ]);
    let service = create_test_service(&transport);

    let output = service.get_bucket(list_request()).await.unwrap();

    assert!(output.contents.is_empty());
    assert_eq!(output.prefix.as_deref(), Some("nothing-here/"));
    assert!(output.marker.is_none());

    let json = serde_json::to_value(&output).unwrap();
    assert_eq!(json["contents"], serde_json::json!([]));
    assert!(json.get("marker").is_none());
}

#[tokio::test]
async fn test_get_bucket_query_parameters() {
    let transport = MockTransport::with_default(
        MockResponse::ok().with_body(TestFixtures::EMPTY_LIST_BUCKET_RESULT),
    );
    let service = create_test_service(&transport);

    let request = list_request()
        .with_prefix("photos/2006/")
        .with_delimiter("/")
        .with_max_keys(50)
        .with_marker("photos/2006/a");
    service.get_bucket(request).await.unwrap();

    assert_eq!(
        transport.last_request().unwrap().url,
        "https://bucket.s3.amazonaws.com/?delimiter=%2F&marker=photos%2F2006%2Fa&max-keys=50&prefix=photos%2F2006%2F"
    );
}

#[tokio::test]
async fn test_get_bucket_skips_empty_options() {
    let transport = MockTransport::with_default(
        MockResponse::ok().with_body(TestFixtures::EMPTY_LIST_BUCKET_RESULT),
    );
    let service = create_test_service(&transport);

    service
        .get_bucket(list_request().with_prefix("").with_marker("m"))
        .await
        .unwrap();

    assert_eq!(
        transport.last_request().unwrap().url,
        "https://bucket.s3.amazonaws.com/?marker=m"
    );
}

#[tokio::test]
async fn test_get_bucket_no_such_bucket() {
    let transport = MockTransport::with_responses(vec![MockResponse::error(
        404,
        TestFixtures::error_xml("NoSuchBucket", "The specified bucket does not exist"),
    )]);
    let service = create_test_service(&transport);

    let err = service.get_bucket(list_request()).await.unwrap_err();
    assert_eq!(err.provider_error().unwrap().code.as_deref(), Some("NoSuchBucket"));
}

#[tokio::test]
async fn test_get_bucket_unexpected_document() {
    let body = "<ListAllMyBucketsResult><Buckets/></ListAllMyBucketsResult>";
    let transport = MockTransport::with_responses(vec![MockResponse::ok().with_body(body)]);
    let service = create_test_service(&transport);

    let err = service.get_bucket(list_request()).await.unwrap_err();
    assert_eq!(err.provider_error().unwrap().message.as_deref(), Some(body));
}

#[test_case("accessKeyId")]
#[test_case("bucketName")]
#[test_case("secretAccessKey")]
#[tokio::test]
async fn test_get_bucket_missing_parameter(field: &str) {
    let transport = MockTransport::with_default(MockResponse::ok());
    let service = create_test_service(&transport);

    let mut request = list_request();
    match field {
        "accessKeyId" => request.access_key_id = None,
        "bucketName" => request.bucket_name = None,
        _ => request.secret_access_key = None,
    }

    let err = service.get_bucket(request).await.unwrap_err();
    assert!(err.is_missing_parameter(field));
    assert_eq!(transport.request_count(), 0);
}
