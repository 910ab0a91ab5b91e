//! Scan endpoint wire models
//!
//! Request and response payloads for the scan lifecycle endpoints. Field
//! names follow the service's JSON contract; enums are closed sets with
//! SCREAMING_SNAKE_CASE wire values.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current status of a scan. The `None` variant is the service's protobuf
/// zero value and should never be observed on an active scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanStatus {
    #[serde(rename = "NONE_SCAN_STATUS")]
    None,
    #[serde(rename = "PENDING")]
    Pending,
    #[serde(rename = "IN_PROGRESS")]
    InProgress,
    #[serde(rename = "COMPLETED")]
    Completed,
    #[serde(rename = "FAILED")]
    Failed,
    #[serde(rename = "CANCELED")]
    Canceled,
    /// Per-file only: the file was not scanned (e.g. unsupported type).
    #[serde(rename = "SKIPPED")]
    Skipped,
    /// Per-file only: content is still being fetched from the repository.
    #[serde(rename = "DOWNLOADING")]
    Downloading,
}

impl ScanStatus {
    /// True for statuses that admit no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ScanStatus::Completed | ScanStatus::Failed | ScanStatus::Canceled
        )
    }
}

/// Type of analysis performed on the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalysisType {
    NoneAnalysisType,
    FileAnalysis,
    RepositoryAnalysis,
}

/// Severity level of a detected threat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    NoneSeverity,
    Safe,
    Low,
    Medium,
    High,
    Critical,
}

/// Risk category classification for files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskCategory {
    NoneRiskCategory,
    Vulnerable,
    NoThreats,
    NotScanned,
}

/// Type of threat detected in a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThreatType {
    NoneThreatType,
    StackedPickle,
    UnsafeImport,
    SuspiciousString,
    MethodTampering,
    ReduceExploit,
    CodeExecution,
    EvalExec,
    OsCommand,
    MultipleProto,
    SuspiciousImport,
    SuspiciousTensorflowOp,
    DangerousTensorflowOp,
    Warning,
    SuspiciousKerasConfig,
    SuspiciousKerasLambdaLayer,
    DangerousKerasLambdaLayer,
    SuspiciousKerasCustomObjects,
    SuspiciousConfig,
    SuspiciousDatasetCode,
    MaliciousJinja2Template,
}

/// Pagination information attached to list slices.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Paging {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
}

/// Supported file subcategory (e.g. "Pickle" with its extensions).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSubcategory {
    pub name: String,
    #[serde(default)]
    pub file_extensions: Vec<String>,
}

/// Supported file category (e.g. "ML Models") with its subcategories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileCategory {
    pub name: String,
    #[serde(default)]
    pub subcategories: Vec<FileSubcategory>,
}

/// Supported file types, organized by category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportedFileTypes {
    #[serde(default)]
    pub categories: Vec<FileCategory>,
}

/// Response for registering a scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterScanResponse {
    /// Server-issued scan identifier; the key for all later operations.
    pub scan_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported_file_types: Option<SupportedFileTypes>,
}

/// Request to create a scan object and obtain a pre-signed upload URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateScanObjectRequest {
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// Response for creating a scan object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateScanObjectResponse {
    pub object_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_url: Option<String>,
}

/// Response for validating repository access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateScanUrlResponse {
    #[serde(default)]
    pub is_accessible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Information about a single detected threat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreatInfo {
    pub id: String,
    pub threat_id: String,
    pub threat_type: ThreatType,
    pub severity: Severity,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub description: String,
}

/// Sub-technique level grouping with threat evidence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubTechnique {
    pub sub_technique_id: String,
    pub sub_technique_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub indicators: Vec<String>,
    pub max_severity: Severity,
    #[serde(default)]
    pub items: Vec<ThreatInfo>,
}

/// Technique-level grouping of threats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Technique {
    pub technique_id: String,
    pub technique_name: String,
    #[serde(default)]
    pub items: Vec<SubTechnique>,
}

/// Threats grouped by taxonomy, with pagination.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThreatInfoList {
    #[serde(default)]
    pub items: Vec<Technique>,
    #[serde(default)]
    pub paging: Paging,
}

/// Metadata for an analyzed file and its detected issues.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileInfo {
    pub name: String,
    #[serde(default)]
    pub size: u64,
    pub status: ScanStatus,
    #[serde(default)]
    pub threats: ThreatInfoList,
    /// Why the file has its status (e.g. why it was skipped).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Paginated slice of analyzed files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub items: Vec<FileInfo>,
    #[serde(default)]
    pub paging: Paging,
}

/// Details about a scanned repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryInfo {
    pub url: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub files_scanned: u64,
}

/// Comprehensive status information for a scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanStatusInfo {
    pub scan_id: String,
    pub status: ScanStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub analysis_type: Option<AnalysisType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<RepositoryInfo>,
    #[serde(default)]
    pub analysis_results: AnalysisResult,
}

/// Query parameters for retrieving a scan, with optional result filters.
#[derive(Debug, Clone)]
pub struct GetScanStatusRequest {
    pub limit: u64,
    pub offset: u64,
    /// Search string for filtering vulnerabilities.
    pub query: Option<String>,
    pub severity: Option<Vec<Severity>>,
    pub risk_category: Option<RiskCategory>,
}

impl Default for GetScanStatusRequest {
    fn default() -> Self {
        Self {
            limit: 10,
            offset: 0,
            query: None,
            severity: None,
            risk_category: None,
        }
    }
}

fn enum_param<T: Serialize>(value: &T) -> String {
    // Wire enums serialize to plain JSON strings; strip the quotes.
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

impl GetScanStatusRequest {
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
        ];
        if let Some(query) = &self.query {
            params.push(("query", query.clone()));
        }
        if let Some(severities) = &self.severity {
            for severity in severities {
                params.push(("severity", enum_param(severity)));
            }
        }
        if let Some(risk_category) = &self.risk_category {
            params.push(("risk_category", enum_param(risk_category)));
        }
        params
    }
}

/// Response for retrieving a scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetScanStatusResponse {
    pub scan_status_info: ScanStatusInfo,
}

/// High-level summary entry in the scan listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSummary {
    pub scan_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub analysis_type: Option<AnalysisType>,
    #[serde(default)]
    pub files_scanned: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub issues_by_severity: HashMap<String, u64>,
    pub status: ScanStatus,
}

/// Paginated list of scan summaries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scans {
    #[serde(default)]
    pub items: Vec<ScanSummary>,
    #[serde(default)]
    pub paging: Paging,
}

/// Query parameters for listing scans.
#[derive(Debug, Clone)]
pub struct ListScansRequest {
    pub limit: u64,
    pub offset: u64,
    /// Filter by artifact name (file or repository).
    pub name: Option<String>,
    pub analysis_type: Option<AnalysisType>,
    pub severity: Option<Vec<Severity>>,
    pub status: Option<Vec<ScanStatus>>,
}

impl Default for ListScansRequest {
    fn default() -> Self {
        Self {
            limit: 100,
            offset: 0,
            name: None,
            analysis_type: None,
            severity: None,
            status: None,
        }
    }
}

impl ListScansRequest {
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
        ];
        if let Some(name) = &self.name {
            params.push(("name", name.clone()));
        }
        if let Some(analysis_type) = &self.analysis_type {
            params.push(("type", enum_param(analysis_type)));
        }
        if let Some(severities) = &self.severity {
            for severity in severities {
                params.push(("severity", enum_param(severity)));
            }
        }
        if let Some(statuses) = &self.status {
            for status in statuses {
                params.push(("status", enum_param(status)));
            }
        }
        params
    }
}

/// Response for listing scans.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListScansResponse {
    pub scans: Scans,
}
