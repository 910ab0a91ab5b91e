//! Error types module
//!
//! All SDK failures are unified under the `SdkError` enum: caller-input
//! validation, API error responses, polling timeouts, and transport
//! failures. Transport errors from `reqwest` are carried unchanged rather
//! than translated.

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Non-2xx response from the AI Defense API. `request_id` comes from
    /// the `x-request-id` response header when the service sets one.
    #[error("API request failed with status {status_code}: {message}")]
    Api {
        status_code: u16,
        request_id: Option<String>,
        message: String,
    },

    #[error("Scan {scan_id} did not reach a requested status after {attempts} checks")]
    ScanTimeout { scan_id: String, attempts: u32 },

    #[error("Unknown repository type for url: {0}")]
    UnknownRepository(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },

    /// A scan failed and the subsequent cancel/delete cleanup failed too.
    /// The original scan failure is preserved as the error source; the
    /// cleanup failure is reported in the message.
    #[error("Cleanup of scan {scan_id} failed: {cleanup}")]
    Cleanup {
        scan_id: String,
        cleanup: Box<SdkError>,
        #[source]
        original: Box<SdkError>,
    },
}

impl SdkError {
    pub fn internal(message: impl Into<String>) -> Self {
        let message = message.into();
        SdkError::Internal {
            source: anyhow::anyhow!(message.clone()),
            message,
        }
    }

    /// HTTP status code for API errors, `None` for every other variant.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            SdkError::Api { status_code, .. } => Some(*status_code),
            SdkError::Cleanup { original, .. } => original.status_code(),
            _ => None,
        }
    }
}

impl From<anyhow::Error> for SdkError {
    fn from(err: anyhow::Error) -> Self {
        SdkError::Internal {
            message: err.to_string(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_api_error_display() {
        let err = SdkError::Api {
            status_code: 401,
            request_id: Some("req-1".to_string()),
            message: "unauthorized".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "API request failed with status 401: unauthorized"
        );
        assert_eq!(err.status_code(), Some(401));
    }

    #[test]
    fn test_cleanup_preserves_original_as_source() {
        let original = SdkError::Api {
            status_code: 500,
            request_id: None,
            message: "boom".to_string(),
        };
        let err = SdkError::Cleanup {
            scan_id: "scan-1".to_string(),
            cleanup: Box::new(SdkError::ScanTimeout {
                scan_id: "scan-1".to_string(),
                attempts: 30,
            }),
            original: Box::new(original),
        };

        let source = err.source().expect("cleanup error must chain the original");
        assert!(source.to_string().contains("status 500"));
        assert_eq!(err.status_code(), Some(500));
    }

    #[test]
    fn test_validation_has_no_status_code() {
        let err = SdkError::Validation("empty path".to_string());
        assert_eq!(err.status_code(), None);
    }
}
