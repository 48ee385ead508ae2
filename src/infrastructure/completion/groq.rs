//! Groq completion client.
//!
//! Talks to the OpenAI-compatible chat completions endpoint with a pooled
//! `reqwest` client, token-bucket rate limiting, and exponential-backoff
//! retries for transient errors. Model and temperature are fixed from
//! configuration; the loop asks only for text in, text out.

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::error::CompletionApiError;
use super::rate_limiter::TokenBucketRateLimiter;
use super::retry::RetryPolicy;
use crate::domain::errors::ResearchError;
use crate::domain::models::CompletionConfig;
use crate::domain::ports::CompletionClient;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

pub struct GroqCompletionClient {
    http_client: ReqwestClient,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    rate_limiter: TokenBucketRateLimiter,
    retry_policy: RetryPolicy,
}

impl GroqCompletionClient {
    /// Build a client from configuration.
    ///
    /// An empty API key is a configuration error, raised here rather than on
    /// first use.
    pub fn new(api_key: String, config: &CompletionConfig) -> Result<Self, ResearchError> {
        if api_key.trim().is_empty() {
            return Err(ResearchError::Configuration(
                "completion API key is not set (config completion.api_key or GROQ_API_KEY)"
                    .to_string(),
            ));
        }

        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| {
                ResearchError::Configuration(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            http_client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            rate_limiter: TokenBucketRateLimiter::new(config.requests_per_second),
            retry_policy: RetryPolicy::from(&config.retry),
        })
    }

    async fn send_request(&self, prompt: &str) -> Result<String, CompletionApiError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .http_client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CompletionApiError::Timeout
                } else {
                    CompletionApiError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error response".to_string());
            return Err(CompletionApiError::from_status(status, body));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| CompletionApiError::Network(format!("malformed response body: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| CompletionApiError::Network("response had no choices".to_string()))
    }
}

#[async_trait]
impl CompletionClient for GroqCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String, ResearchError> {
        self.rate_limiter.acquire().await;

        debug!(model = %self.model, prompt_chars = prompt.len(), "completion request");

        self.retry_policy
            .execute(|| self.send_request(prompt))
            .await
            .map_err(|e| ResearchError::GenerationFailure(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(base_url: &str) -> CompletionConfig {
        CompletionConfig {
            base_url: base_url.to_string(),
            retry: crate::domain::models::RetryConfig {
                max_retries: 1,
                initial_backoff_ms: 10,
                max_backoff_ms: 20,
            },
            ..CompletionConfig::default()
        }
    }

    #[test]
    fn empty_api_key_is_a_configuration_error() {
        let err = GroqCompletionClient::new(String::new(), &CompletionConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, ResearchError::Configuration(_)));
    }

    #[tokio::test]
    async fn completes_against_mock_server() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .with_status(200)
            .with_body(
                json!({
                    "choices": [{"message": {"role": "assistant", "content": "generated text"}}]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client =
            GroqCompletionClient::new("test-key".to_string(), &config(&server.url())).unwrap();

        let text = client.complete("hello").await.unwrap();
        assert_eq!(text, "generated text");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn server_error_is_retried_then_surfaced_as_generation_failure() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(500)
            .with_body("internal")
            .expect(2) // initial attempt + 1 retry
            .create_async()
            .await;

        let client =
            GroqCompletionClient::new("test-key".to_string(), &config(&server.url())).unwrap();

        let err = client.complete("hello").await.unwrap_err();
        assert!(matches!(err, ResearchError::GenerationFailure(_)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn auth_error_is_not_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(401)
            .with_body("unauthorized")
            .expect(1)
            .create_async()
            .await;

        let client =
            GroqCompletionClient::new("bad-key".to_string(), &config(&server.url())).unwrap();

        let err = client.complete("hello").await.unwrap_err();
        assert!(matches!(err, ResearchError::GenerationFailure(_)));
        mock.assert_async().await;
    }
}
