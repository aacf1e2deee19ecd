use std::future::Future;
use std::time::Duration;

use reqwest::Client;

use super::error::VeniceError;
use super::types::{ChatRequest, ChatResponse, ImageRequest, ImageResponse};

const API_BASE_URL: &str = "https://api.venice.ai/api/v1";

/// Abstraction over the two Venice endpoints the pipeline calls.
///
/// Stage code takes `&impl GenerationClient` so tests can substitute a mock
/// without any HTTP. Futures are `Send` because the stages run inside the
/// server's request handlers.
pub trait GenerationClient: Send + Sync {
    /// Call `/chat/completions`.
    fn chat(
        &self,
        req: &ChatRequest,
    ) -> impl Future<Output = Result<ChatResponse, VeniceError>> + Send;

    /// Call `/image/generate`.
    fn generate_image(
        &self,
        req: &ImageRequest,
    ) -> impl Future<Output = Result<ImageResponse, VeniceError>> + Send;
}

/// HTTP client for the Venice.ai API.
pub struct VeniceClient {
    api_key: String,
    client: Client,
    base_url: String,
}

impl VeniceClient {
    pub fn new(api_key: String, timeout_secs: u64) -> Self {
        Self::with_base_url(api_key, API_BASE_URL.to_string(), timeout_secs)
    }

    /// Create a client pointing at a custom base URL (useful for testing).
    pub fn with_base_url(api_key: String, base_url: String, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("failed to build HTTP client");
        Self {
            api_key,
            client,
            base_url,
        }
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, VeniceError>
    where
        B: serde::Serialize,
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .client
            .post(format!("{}{path}", self.base_url))
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(|secs| secs * 1000)
                .unwrap_or(1000);
            return Err(VeniceError::RateLimited {
                retry_after_ms: retry_after,
            });
        }

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(VeniceError::from_status(status.as_u16(), message));
        }

        let body = response.json::<T>().await?;
        Ok(body)
    }
}

impl GenerationClient for VeniceClient {
    async fn chat(&self, req: &ChatRequest) -> Result<ChatResponse, VeniceError> {
        self.post_json("/chat/completions", req).await
    }

    async fn generate_image(&self, req: &ImageRequest) -> Result<ImageResponse, VeniceError> {
        self.post_json("/image/generate", req).await
    }
}
