//! HTTP client for the AI Defense model-scanning API.
//!
//! Provides `ApiClient`, a thin transport layer with API-key auth and
//! generic per-verb helpers, plus the scan endpoint wrappers (`api`) and
//! the managed scan lifecycle (`scan`).

pub mod api;
pub mod scan;

use std::env;
use std::fmt::{Debug, Formatter, Result as FmtResult};

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

use aidefense_core::{Config, SdkError};

pub use scan::ModelScanClient;

/// Header carrying the tenant API key on every request.
pub const API_KEY_HEADER: &str = "X-Cisco-AI-Defense-Tenant-API-Key";

/// All scan endpoints are rooted here, under the configured base URL.
const API_PREFIX: &str = "/api/ai-defense/v1";

const API_KEY_LEN: usize = 64;

/// HTTP client for the AI Defense API with API-key auth.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl Debug for ApiClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl ApiClient {
    /// Create a client against `base_url` with the default configuration.
    /// The API key must be a 64-character token.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, SdkError> {
        let config = Config {
            base_url: base_url.into(),
            ..Config::default()
        };
        Self::with_config(&config, api_key)
    }

    pub fn with_config(config: &Config, api_key: impl Into<String>) -> Result<Self, SdkError> {
        let api_key = api_key.into();
        if api_key.len() != API_KEY_LEN {
            return Err(SdkError::Validation(format!(
                "API key must be exactly {API_KEY_LEN} characters"
            )));
        }

        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Create a client from the environment: `AIDEFENSE_API_KEY` plus the
    /// settings read by `Config::from_env`.
    pub fn from_env() -> Result<Self, SdkError> {
        let api_key = env::var("AIDEFENSE_API_KEY")
            .map_err(|_| SdkError::Validation("Missing API key. Set AIDEFENSE_API_KEY".into()))?;
        Self::with_config(&Config::from_env(), api_key)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.header(API_KEY_HEADER, self.api_key.as_str())
    }

    /// Turn a non-2xx response into `SdkError::Api`, pulling the request id
    /// from the `x-request-id` header when the service sets one.
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, SdkError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let request_id = response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        Err(SdkError::Api {
            status_code: status.as_u16(),
            request_id,
            message,
        })
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, SdkError> {
        let response = Self::check_status(response).await?;
        Ok(response.json().await?)
    }

    async fn read_empty(response: reqwest::Response) -> Result<(), SdkError> {
        Self::check_status(response).await?;
        Ok(())
    }

    /// GET request with query parameters. Deserializes the JSON response.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, SdkError> {
        let mut request = self.apply_auth(self.client.get(self.build_url(path)));
        if !query.is_empty() {
            request = request.query(query);
        }
        Self::read_json(request.send().await?).await
    }

    /// POST a JSON body and deserialize the response.
    pub async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, SdkError> {
        let request = self.apply_auth(self.client.post(self.build_url(path)).json(body));
        Self::read_json(request.send().await?).await
    }

    /// POST with no body and deserialize the response.
    pub async fn post<T: DeserializeOwned>(&self, path: &str) -> Result<T, SdkError> {
        let request = self.apply_auth(self.client.post(self.build_url(path)));
        Self::read_json(request.send().await?).await
    }

    /// POST a JSON body, ignoring the response payload.
    pub async fn post_json_no_content<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), SdkError> {
        let request = self.apply_auth(self.client.post(self.build_url(path)).json(body));
        Self::read_empty(request.send().await?).await
    }

    /// POST with no body, ignoring the response payload.
    pub async fn post_no_content(&self, path: &str) -> Result<(), SdkError> {
        let request = self.apply_auth(self.client.post(self.build_url(path)));
        Self::read_empty(request.send().await?).await
    }

    /// PUT with no body, ignoring the response payload.
    pub async fn put_no_content(&self, path: &str) -> Result<(), SdkError> {
        let request = self.apply_auth(self.client.put(self.build_url(path)));
        Self::read_empty(request.send().await?).await
    }

    /// PUT a JSON body, ignoring the response payload.
    pub async fn put_json_no_content<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), SdkError> {
        let request = self.apply_auth(self.client.put(self.build_url(path)).json(body));
        Self::read_empty(request.send().await?).await
    }

    /// DELETE request. Returns `Ok(())` on success.
    pub async fn delete(&self, path: &str) -> Result<(), SdkError> {
        let request = self.apply_auth(self.client.delete(self.build_url(path)));
        Self::read_empty(request.send().await?).await
    }

    /// Raw client for requests outside the API prefix (pre-signed upload
    /// URLs). No auth header is applied.
    pub fn http(&self) -> &Client {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key() -> String {
        "k".repeat(API_KEY_LEN)
    }

    #[test]
    fn test_rejects_short_api_key() {
        let err = ApiClient::new("https://example.invalid", "too-short").unwrap_err();
        assert!(matches!(err, SdkError::Validation(_)));
    }

    #[test]
    fn test_accepts_64_char_api_key() {
        let client = ApiClient::new("https://example.invalid", test_key()).unwrap();
        assert_eq!(client.base_url(), "https://example.invalid");
    }

    #[test]
    fn test_build_url_trims_trailing_slash() {
        let client = ApiClient::new("https://example.invalid/", test_key()).unwrap();
        assert_eq!(
            client.build_url("/scans/register"),
            "https://example.invalid/api/ai-defense/v1/scans/register"
        );
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let client = ApiClient::new("https://example.invalid", test_key()).unwrap();
        let rendered = format!("{client:?}");
        assert!(!rendered.contains(&test_key()));
    }
}
