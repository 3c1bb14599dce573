use std::future::Future;
use std::time::Instant;

use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use tracing::debug;

use super::error::{OpenAiError, parse_retry_after};
use super::types::{ChatRequest, ChatResponse, Completion};

pub const API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Anything that can deliver one chat-completion request and hand back the
/// first choice's text.
///
/// One call is one outbound request: implementations must not retry.
pub trait CompletionSender {
    fn send_completion(
        &self,
        api_key: &str,
        req: &ChatRequest,
    ) -> impl Future<Output = Result<Completion, OpenAiError>> + Send;
}

impl<T: CompletionSender + Sync> CompletionSender for &T {
    fn send_completion(
        &self,
        api_key: &str,
        req: &ChatRequest,
    ) -> impl Future<Output = Result<Completion, OpenAiError>> + Send {
        (**self).send_completion(api_key, req)
    }
}

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    endpoint: String,
}

impl Default for OpenAiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenAiClient {
    pub fn new() -> Self {
        Self::with_endpoint(API_URL)
    }

    /// Create a client pointing at a custom endpoint (proxies, tests).
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl CompletionSender for OpenAiClient {
    async fn send_completion(
        &self,
        api_key: &str,
        req: &ChatRequest,
    ) -> Result<Completion, OpenAiError> {
        let start = Instant::now();
        let response = self
            .client
            .post(&self.endpoint)
            .header(AUTHORIZATION, format!("Bearer {api_key}"))
            .header(CONTENT_TYPE, "application/json")
            .json(req)
            .send()
            .await?;

        let status = response.status();
        let headers = response.headers().clone();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(OpenAiError::RateLimited {
                retry_after: parse_retry_after(&headers),
                headers,
            });
        }

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(OpenAiError::ApiError {
                status: status.as_u16(),
                headers,
                message,
            });
        }

        let body = response.text().await?;
        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| OpenAiError::InvalidResponse(format!("body is not JSON: {e}")))?;
        let completion = parsed
            .into_completion()
            .map_err(OpenAiError::InvalidResponse)?;

        debug!(
            model = %req.model,
            status = status.as_u16(),
            duration_ms = start.elapsed().as_millis() as u64,
            "chat completion received"
        );

        Ok(completion)
    }
}
