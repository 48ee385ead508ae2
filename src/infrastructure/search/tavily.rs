//! Tavily web search adapter.

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::domain::errors::ResearchError;
use crate::domain::models::{EvidenceItem, WebSearchConfig};
use crate::domain::ports::WebSearch;

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: usize,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(default)]
    content: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    title: String,
}

pub struct TavilyWebSearch {
    http_client: ReqwestClient,
    api_key: String,
    base_url: String,
}

impl TavilyWebSearch {
    /// Build the adapter from configuration.
    ///
    /// A missing credential fails here, at startup, never per-call.
    pub fn new(api_key: String, config: &WebSearchConfig) -> Result<Self, ResearchError> {
        if api_key.trim().is_empty() {
            return Err(ResearchError::Configuration(
                "web search API key is not set (config web_search.api_key or TAVILY_API_KEY)"
                    .to_string(),
            ));
        }

        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                ResearchError::Configuration(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            http_client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl WebSearch for TavilyWebSearch {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<EvidenceItem>, ResearchError> {
        let request = SearchRequest {
            api_key: &self.api_key,
            query,
            max_results,
        };

        let response = self
            .http_client
            .post(format!("{}/search", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| ResearchError::ProviderUnavailable {
                provider: "tavily".to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ResearchError::ProviderUnavailable {
                provider: "tavily".to_string(),
                reason: format!("HTTP {status}: {body}"),
            });
        }

        let parsed: SearchResponse =
            response
                .json()
                .await
                .map_err(|e| ResearchError::ProviderUnavailable {
                    provider: "tavily".to_string(),
                    reason: format!("malformed response body: {e}"),
                })?;

        debug!(hits = parsed.results.len(), "web search complete");

        // Normalize at the boundary; downstream never sees the wire shape.
        Ok(parsed
            .results
            .into_iter()
            .take(max_results)
            .map(|hit| EvidenceItem::Web {
                content: hit.content,
                url: hit.url,
                title: hit.title,
            })
            .collect())
    }
}
