//! Repository scan targets
//!
//! A repository scan is described by a URL plus optional platform
//! credentials. The platform is derived from the URL itself; the credential
//! payload is keyed by the platform's config name so new platforms can be
//! added by extending `UrlType` and `RepoAuth` without touching the
//! lifecycle code.

use std::fmt::{Debug, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::SdkError;

/// Supported repository hosting platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UrlType {
    HuggingFace,
}

impl UrlType {
    /// Derive the platform from a repository URL by matching known hosting
    /// domains.
    pub fn from_url(url: &str) -> Result<Self, SdkError> {
        if url.contains("huggingface.co") {
            return Ok(UrlType::HuggingFace);
        }
        Err(SdkError::UnknownRepository(url.to_string()))
    }

    /// Key under which this platform's credentials appear in the auth
    /// payload.
    pub fn config_name(self) -> &'static str {
        match self {
            UrlType::HuggingFace => "huggingface",
        }
    }
}

/// Platform-specific repository credentials.
#[derive(Clone, PartialEq, Eq)]
pub enum RepoAuth {
    HuggingFace { access_token: String },
}

impl RepoAuth {
    fn credentials(&self) -> Value {
        match self {
            RepoAuth::HuggingFace { access_token } => json!({ "access_token": access_token }),
        }
    }
}

// Tokens must not leak into logs.
impl Debug for RepoAuth {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            RepoAuth::HuggingFace { .. } => f
                .debug_struct("HuggingFace")
                .field("access_token", &"<redacted>")
                .finish(),
        }
    }
}

/// A repository to scan: URL plus optional credentials. No credentials
/// means public-repo access.
#[derive(Debug, Clone)]
pub struct RepoConfig {
    pub url: String,
    pub auth: Option<RepoAuth>,
}

impl RepoConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            auth: None,
        }
    }

    pub fn with_auth(url: impl Into<String>, auth: RepoAuth) -> Self {
        Self {
            url: url.into(),
            auth: Some(auth),
        }
    }

    /// Platform derived from the URL.
    pub fn url_type(&self) -> Result<UrlType, SdkError> {
        UrlType::from_url(&self.url)
    }

    /// Credential payload in the shape the validate-url endpoint expects:
    /// empty when no auth is configured, otherwise one entry keyed by the
    /// platform config name.
    pub fn credential_payload(&self) -> Result<Map<String, Value>, SdkError> {
        let mut payload = Map::new();
        if let Some(auth) = &self.auth {
            payload.insert(
                self.url_type()?.config_name().to_string(),
                auth.credentials(),
            );
        }
        Ok(payload)
    }
}
