//! Managed scan lifecycle.
//!
//! `ModelScanClient` drives a scan end to end: register, upload or
//! validate, trigger, then poll at a fixed interval until the scan reaches
//! a terminal status. A failure after registration runs the cleanup
//! protocol (cancel, wait for CANCELED, delete) so no orphaned scan
//! resources remain on the server, and the original failure is the one the
//! caller sees. A poll timeout is the exception: the scan may still be
//! running, so it is returned as-is with no cleanup attempted.

use std::path::Path;

use tokio::time::sleep;

use aidefense_core::models::{GetScanStatusRequest, RepoConfig, ScanStatusInfo};
use aidefense_core::{ScanPollConfig, ScanStatus, SdkError};

use crate::ApiClient;

/// Statuses that end the poll loop on the success path. A FAILED scan is a
/// result, not an error: callers inspect the returned status themselves.
const END_SCAN_STATUSES: [ScanStatus; 3] = [
    ScanStatus::Completed,
    ScanStatus::Failed,
    ScanStatus::Canceled,
];

/// How many per-object results to page in with each status check.
const POLL_FILE_LIMIT: u64 = 50;

/// High-level client driving complete scan lifecycles.
#[derive(Clone, Debug)]
pub struct ModelScanClient {
    api: ApiClient,
    poll: ScanPollConfig,
}

impl ModelScanClient {
    pub fn new(api: ApiClient) -> Self {
        Self::with_poll_config(api, ScanPollConfig::default())
    }

    pub fn with_poll_config(api: ApiClient, poll: ScanPollConfig) -> Self {
        Self { api, poll }
    }

    /// The underlying transport, for direct endpoint access.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Run a complete scan of a local model file: register, upload,
    /// trigger, poll until terminal. On a failure after registration the
    /// scan is canceled and deleted before the error is returned; a poll
    /// timeout skips cleanup and surfaces directly.
    pub async fn scan_file(&self, file_path: impl AsRef<Path>) -> Result<ScanStatusInfo, SdkError> {
        let file_path = file_path.as_ref();
        let registered = self.api.register_scan().await?;
        let scan_id = registered.scan_id;
        tracing::info!(scan_id = %scan_id, path = %file_path.display(), "Starting file scan");

        match self.run_file_scan(&scan_id, file_path).await {
            Ok(info) => Ok(info),
            // Poll exhaustion means the scan may still be running; leave it
            // in place for the caller to inspect or tear down.
            Err(err @ SdkError::ScanTimeout { .. }) => Err(err),
            Err(err) => Err(self.cleanup_after_failure(&scan_id, err).await),
        }
    }

    async fn run_file_scan(
        &self,
        scan_id: &str,
        file_path: &Path,
    ) -> Result<ScanStatusInfo, SdkError> {
        self.api.upload_file(scan_id, file_path).await?;
        self.api.trigger_scan(scan_id).await?;
        self.wait_until_status(scan_id, &END_SCAN_STATUSES).await
    }

    /// Run a complete scan of a model repository: register, validate the
    /// URL and credentials, trigger, poll until terminal. Cleanup semantics
    /// match [`scan_file`](Self::scan_file).
    pub async fn scan_repo(&self, repo: &RepoConfig) -> Result<ScanStatusInfo, SdkError> {
        // Resolve the platform before touching the server; an unknown URL
        // needs no cleanup.
        repo.url_type()?;

        let registered = self.api.register_scan().await?;
        let scan_id = registered.scan_id;
        tracing::info!(scan_id = %scan_id, url = %repo.url, "Starting repository scan");

        match self.run_repo_scan(&scan_id, repo).await {
            Ok(info) => Ok(info),
            Err(err @ SdkError::ScanTimeout { .. }) => Err(err),
            Err(err) => Err(self.cleanup_after_failure(&scan_id, err).await),
        }
    }

    async fn run_repo_scan(
        &self,
        scan_id: &str,
        repo: &RepoConfig,
    ) -> Result<ScanStatusInfo, SdkError> {
        self.api.validate_scan_url(scan_id, repo).await?;
        self.api.trigger_scan(scan_id).await?;
        self.wait_until_status(scan_id, &END_SCAN_STATUSES).await
    }

    /// Poll `get_scan` until the status is one of `statuses`, sleeping the
    /// configured interval between checks. Performs exactly
    /// `poll.retry_count` checks before timing out.
    async fn wait_until_status(
        &self,
        scan_id: &str,
        statuses: &[ScanStatus],
    ) -> Result<ScanStatusInfo, SdkError> {
        let request = GetScanStatusRequest {
            limit: POLL_FILE_LIMIT,
            offset: 0,
            ..GetScanStatusRequest::default()
        };

        for attempt in 1..=self.poll.retry_count {
            let response = self.api.get_scan(scan_id, &request).await?;
            let info = response.scan_status_info;
            if statuses.contains(&info.status) {
                tracing::info!(
                    scan_id = %scan_id,
                    status = ?info.status,
                    attempt,
                    "Scan reached requested status"
                );
                return Ok(info);
            }

            tracing::debug!(
                scan_id = %scan_id,
                status = ?info.status,
                attempt,
                "Scan not finished, waiting"
            );
            if attempt < self.poll.retry_count {
                sleep(self.poll.wait_interval).await;
            }
        }

        Err(SdkError::ScanTimeout {
            scan_id: scan_id.to_string(),
            attempts: self.poll.retry_count,
        })
    }

    /// Tear down a scan's server-side resources: request cancellation,
    /// wait until the scan reports CANCELED, then delete the record.
    pub async fn cleanup_scan_data(&self, scan_id: &str) -> Result<(), SdkError> {
        self.api.cancel_scan(scan_id).await?;
        self.wait_until_status(scan_id, &[ScanStatus::Canceled])
            .await?;
        self.api.delete_scan(scan_id).await
    }

    /// Run the cleanup protocol and decide what the caller sees: the
    /// original error when cleanup succeeds, or a `Cleanup` error chaining
    /// the original when cleanup itself fails.
    async fn cleanup_after_failure(&self, scan_id: &str, original: SdkError) -> SdkError {
        tracing::warn!(
            scan_id = %scan_id,
            error = %original,
            "Scan failed, cleaning up server-side resources"
        );
        match self.cleanup_scan_data(scan_id).await {
            Ok(()) => original,
            Err(cleanup) => {
                tracing::warn!(
                    scan_id = %scan_id,
                    error = %cleanup,
                    "Cleanup after failed scan also failed"
                );
                SdkError::Cleanup {
                    scan_id: scan_id.to_string(),
                    cleanup: Box::new(cleanup),
                    original: Box::new(original),
                }
            }
        }
    }
}
