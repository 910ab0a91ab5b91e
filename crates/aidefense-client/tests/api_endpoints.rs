//! Endpoint-level tests for the scan API wrappers: query parameter
//! propagation, request body shapes, and error mapping.

use std::io::Write;

use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;

use aidefense_client::{ApiClient, API_KEY_HEADER};
use aidefense_core::models::{
    GetScanStatusRequest, ListScansRequest, RiskCategory, ScanStatus, Severity,
};
use aidefense_core::SdkError;

const PREFIX: &str = "/api/ai-defense/v1";

fn client_for(server: &ServerGuard) -> ApiClient {
    ApiClient::new(server.url(), "k".repeat(64)).expect("valid client")
}

#[tokio::test]
async fn list_scans_forwards_pagination_and_filters() {
    let mut server = Server::new_async().await;

    let list = server
        .mock("GET", format!("{PREFIX}/scans").as_str())
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("limit".into(), "25".into()),
            Matcher::UrlEncoded("offset".into(), "50".into()),
            Matcher::UrlEncoded("name".into(), "model.bin".into()),
            Matcher::UrlEncoded("status".into(), "COMPLETED".into()),
        ]))
        .with_body(
            json!({
                "scans": {
                    "items": [{
                        "scan_id": "scan-1",
                        "name": "model.bin",
                        "status": "COMPLETED",
                        "files_scanned": 1
                    }],
                    "paging": { "total": 1, "limit": 25, "offset": 50 }
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let request = ListScansRequest {
        limit: 25,
        offset: 50,
        name: Some("model.bin".to_string()),
        status: Some(vec![ScanStatus::Completed]),
        ..ListScansRequest::default()
    };
    let response = client_for(&server).list_scans(&request).await.unwrap();

    assert_eq!(response.scans.items.len(), 1);
    assert_eq!(response.scans.items[0].scan_id, "scan-1");
    assert_eq!(response.scans.items[0].status, ScanStatus::Completed);
    assert_eq!(response.scans.paging.total, Some(1));
    list.assert_async().await;
}

#[tokio::test]
async fn get_scan_forwards_result_filters() {
    let mut server = Server::new_async().await;

    let get = server
        .mock("GET", format!("{PREFIX}/scans/scan-1").as_str())
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("limit".into(), "10".into()),
            Matcher::UrlEncoded("offset".into(), "0".into()),
            Matcher::UrlEncoded("severity".into(), "CRITICAL".into()),
            Matcher::UrlEncoded("risk_category".into(), "VULNERABLE".into()),
        ]))
        .with_body(
            json!({
                "scan_status_info": { "scan_id": "scan-1", "status": "COMPLETED" }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let request = GetScanStatusRequest {
        severity: Some(vec![Severity::Critical]),
        risk_category: Some(RiskCategory::Vulnerable),
        ..GetScanStatusRequest::default()
    };
    let response = client_for(&server)
        .get_scan("scan-1", &request)
        .await
        .unwrap();

    assert_eq!(response.scan_status_info.status, ScanStatus::Completed);
    get.assert_async().await;
}

#[tokio::test]
async fn upload_scan_result_wraps_payload() {
    let mut server = Server::new_async().await;

    let upload = server
        .mock(
            "POST",
            format!("{PREFIX}/scans/scan-1/objects/obj-1/results").as_str(),
        )
        .match_body(Matcher::PartialJson(json!({
            "scan_result": { "threats_found": false }
        })))
        .with_status(200)
        .create_async()
        .await;

    client_for(&server)
        .upload_scan_result("scan-1", "obj-1", &json!({ "threats_found": false }))
        .await
        .unwrap();

    upload.assert_async().await;
}

#[tokio::test]
async fn mark_scan_completed_reports_errors() {
    let mut server = Server::new_async().await;

    let complete = server
        .mock("PUT", format!("{PREFIX}/scans/scan-1/complete").as_str())
        .match_body(Matcher::PartialJson(json!({ "errors": "truncated file" })))
        .with_status(200)
        .create_async()
        .await;

    client_for(&server)
        .mark_scan_completed("scan-1", "truncated file")
        .await
        .unwrap();

    complete.assert_async().await;
}

#[tokio::test]
async fn upload_file_streams_bytes_to_presigned_url() {
    let mut server = Server::new_async().await;
    let payload = "weights:0123456789".repeat(64);

    let create_object = server
        .mock("POST", format!("{PREFIX}/scans/scan-1/objects").as_str())
        .match_body(Matcher::PartialJson(json!({ "size": payload.len() })))
        .with_body(
            json!({
                "object_id": "obj-1",
                "upload_url": format!("{}/upload/obj-1", server.url())
            })
            .to_string(),
        )
        .create_async()
        .await;

    // The pre-signed PUT gets the exact file bytes with a known length and
    // no tenant API key.
    let upload = server
        .mock("PUT", "/upload/obj-1")
        .match_header("content-length", payload.len().to_string().as_str())
        .match_header(API_KEY_HEADER, Matcher::Missing)
        .match_body(Matcher::Exact(payload.clone()))
        .with_status(200)
        .create_async()
        .await;

    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(payload.as_bytes()).expect("write payload");
    file.flush().expect("flush");

    client_for(&server)
        .upload_file("scan-1", file.path())
        .await
        .unwrap();

    create_object.assert_async().await;
    upload.assert_async().await;
}

#[tokio::test]
async fn register_quota_rejection_maps_to_api_error() {
    let mut server = Server::new_async().await;

    server
        .mock("POST", format!("{PREFIX}/scans/register").as_str())
        .with_status(429)
        .with_header("x-request-id", "req-7")
        .with_body("scan quota exceeded")
        .create_async()
        .await;

    let err = client_for(&server).register_scan().await.unwrap_err();
    match err {
        SdkError::Api {
            status_code,
            request_id,
            message,
        } => {
            assert_eq!(status_code, 429);
            assert_eq!(request_id.as_deref(), Some("req-7"));
            assert!(message.contains("quota"));
        }
        other => panic!("expected an API error, got {other:?}"),
    }
}
