//! Scan endpoint wrappers for the AI Defense API.
//!
//! Each method is a single request/response round trip; the scan lifecycle
//! (ordering, polling, cleanup) lives in [`crate::scan`]. No wrapper
//! retries on its own — failures propagate to the caller.

use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};
use tokio_util::io::ReaderStream;

use aidefense_core::models::{
    CreateScanObjectRequest, CreateScanObjectResponse, GetScanStatusRequest,
    GetScanStatusResponse, ListScansRequest, ListScansResponse, RegisterScanResponse, RepoConfig,
    UrlType, ValidateScanUrlResponse,
};
use aidefense_core::SdkError;

use crate::ApiClient;

const SCANS: &str = "/scans";

fn scan_path(scan_id: &str) -> String {
    format!("{SCANS}/{scan_id}")
}

fn object_path(scan_id: &str, object_id: &str) -> String {
    format!("{}/objects/{object_id}", scan_path(scan_id))
}

#[derive(Debug, Serialize)]
struct ValidateScanUrlRequest<'a> {
    url: &'a str,
    #[serde(rename = "type")]
    url_type: UrlType,
    #[serde(skip_serializing_if = "Map::is_empty")]
    auth: Map<String, Value>,
}

impl ApiClient {
    /// Register a new scan session. The returned `scan_id` keys every
    /// subsequent operation.
    pub async fn register_scan(&self) -> Result<RegisterScanResponse, SdkError> {
        let result: RegisterScanResponse = self.post(&format!("{SCANS}/register")).await?;
        tracing::debug!(scan_id = %result.scan_id, "Registered scan");
        Ok(result)
    }

    /// Create a scan object for a file within an existing scan, obtaining
    /// the object id and a pre-signed upload URL.
    pub async fn create_scan_object(
        &self,
        scan_id: &str,
        request: &CreateScanObjectRequest,
    ) -> Result<CreateScanObjectResponse, SdkError> {
        let result: CreateScanObjectResponse = self
            .post_json(&format!("{}/objects", scan_path(scan_id)), request)
            .await?;
        tracing::debug!(scan_id = %scan_id, object_id = %result.object_id, "Created scan object");
        Ok(result)
    }

    /// Upload a local file into a scan: stat the size, create the scan
    /// object, then PUT the bytes to the pre-signed URL. The pre-signed
    /// request carries no API auth header.
    pub async fn upload_file(&self, scan_id: &str, file_path: &Path) -> Result<(), SdkError> {
        let metadata = tokio::fs::metadata(file_path).await?;
        if !metadata.is_file() {
            return Err(SdkError::Validation(format!(
                "Not a file: {}",
                file_path.display()
            )));
        }
        let file_name = file_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                SdkError::Validation(format!("Invalid file name: {}", file_path.display()))
            })?;

        let request = CreateScanObjectRequest {
            file_name: file_name.to_string(),
            size: Some(metadata.len()),
        };
        let created = self.create_scan_object(scan_id, &request).await?;
        let upload_url = created.upload_url.ok_or_else(|| {
            SdkError::internal("create_scan_object returned no upload_url")
        })?;

        // Model files can be multi-GB; stream from disk instead of
        // buffering. The size is known up front, so the body is not chunked.
        let file = tokio::fs::File::open(file_path).await?;
        let body = reqwest::Body::wrap_stream(ReaderStream::new(file));
        let response = self
            .http()
            .put(&upload_url)
            .header(reqwest::header::CONTENT_LENGTH, metadata.len())
            .body(body)
            .send()
            .await?;
        Self::check_status(response).await?;

        tracing::info!(
            scan_id = %scan_id,
            file_name = %file_name,
            size = metadata.len(),
            "Uploaded file for scanning"
        );
        Ok(())
    }

    /// Submit per-object scan results back to the service.
    pub async fn upload_scan_result(
        &self,
        scan_id: &str,
        object_id: &str,
        scan_result: &Value,
    ) -> Result<(), SdkError> {
        let body = serde_json::json!({ "scan_result": scan_result });
        self.post_json_no_content(&format!("{}/results", object_path(scan_id, object_id)), &body)
            .await
    }

    /// Mark a scan as completed, optionally reporting errors encountered
    /// while scanning.
    pub async fn mark_scan_completed(&self, scan_id: &str, errors: &str) -> Result<(), SdkError> {
        let body = serde_json::json!({ "errors": errors });
        self.put_json_no_content(&format!("{}/complete", scan_path(scan_id)), &body)
            .await
    }

    /// Start scanning the uploaded/validated content. Idempotent on the
    /// server side.
    pub async fn trigger_scan(&self, scan_id: &str) -> Result<(), SdkError> {
        self.put_no_content(&format!("{}/run", scan_path(scan_id)))
            .await?;
        tracing::info!(scan_id = %scan_id, "Triggered scan");
        Ok(())
    }

    /// Server-side check that a repository URL and its credentials are
    /// usable. Must precede `trigger_scan` for repository scans.
    pub async fn validate_scan_url(
        &self,
        scan_id: &str,
        repo: &RepoConfig,
    ) -> Result<ValidateScanUrlResponse, SdkError> {
        let request = ValidateScanUrlRequest {
            url: &repo.url,
            url_type: repo.url_type()?,
            auth: repo.credential_payload()?,
        };
        let result: ValidateScanUrlResponse = self
            .post_json(&format!("{}/validate_url", scan_path(scan_id)), &request)
            .await?;
        tracing::debug!(
            scan_id = %scan_id,
            url = %repo.url,
            is_accessible = result.is_accessible,
            "Validated repository URL"
        );
        Ok(result)
    }

    /// Current status plus a paginated slice of per-object results.
    pub async fn get_scan(
        &self,
        scan_id: &str,
        request: &GetScanStatusRequest,
    ) -> Result<GetScanStatusResponse, SdkError> {
        self.get(&scan_path(scan_id), &request.to_params()).await
    }

    /// Paginated listing of scans for the tenant.
    pub async fn list_scans(
        &self,
        request: &ListScansRequest,
    ) -> Result<ListScansResponse, SdkError> {
        self.get(SCANS, &request.to_params()).await
    }

    /// Request cancellation of a non-terminal scan. The transition is
    /// asynchronous; poll `get_scan` to confirm CANCELED.
    pub async fn cancel_scan(&self, scan_id: &str) -> Result<(), SdkError> {
        self.post_no_content(&format!("{}/cancel", scan_path(scan_id)))
            .await?;
        tracing::debug!(scan_id = %scan_id, "Requested scan cancellation");
        Ok(())
    }

    /// Delete the server-side scan record and all associated data.
    pub async fn delete_scan(&self, scan_id: &str) -> Result<(), SdkError> {
        self.delete(&scan_path(scan_id)).await?;
        tracing::debug!(scan_id = %scan_id, "Deleted scan");
        Ok(())
    }
}
