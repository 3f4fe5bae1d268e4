// Copyright (c) 2026 RAGE Research Assistant
// SPDX-License-Identifier: AGPL-3.0

// OpenAI Vector Store Gateway
//
// `POST {endpoint}/vector_stores/{id}/search` on the OpenAI API or a
// compatible server.

use crate::domain::config::{resolve_secret, ConfigError, VectorStoreConfig};
use crate::domain::error::{Dto, ErrorInfo};
use crate::domain::gateway::VectorStoreGateway;
use crate::domain::vector_store::{VectorStoreExcerpt, VectorStoreId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const OPERATION: &str = "openai-vector-store-gateway#search";

pub struct OpenAIVectorStoreGateway {
    client: reqwest::Client,
    endpoint: Url,
    api_key: Option<String>,
    max_results: u32,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    max_num_results: u32,
}

#[derive(Deserialize)]
struct SearchPage {
    data: Vec<SearchResult>,
}

#[derive(Deserialize)]
struct SearchResult {
    filename: String,
    score: f64,
    #[serde(default)]
    content: Vec<SearchContent>,
}

#[derive(Deserialize)]
struct SearchContent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

impl From<SearchResult> for VectorStoreExcerpt {
    fn from(result: SearchResult) -> Self {
        let text = result
            .content
            .into_iter()
            .filter(|part| part.kind == "text")
            .map(|part| part.text)
            .collect::<Vec<_>>()
            .join("\n");

        VectorStoreExcerpt {
            file_name: result.filename,
            score: result.score,
            text,
        }
    }
}

impl OpenAIVectorStoreGateway {
    pub fn new(config: &VectorStoreConfig) -> Result<Self, ConfigError> {
        let api_key = config.api_key.as_deref().map(resolve_secret).transpose()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ConfigError::Invalid(format!("Failed to build vector-store HTTP client: {e}")))?;

        let endpoint = Url::parse(&config.endpoint)
            .map_err(|e| ConfigError::Invalid(format!("Invalid vector-store endpoint '{}': {e}", config.endpoint)))?;
        if endpoint.cannot_be_a_base() {
            return Err(ConfigError::Invalid(format!(
                "Vector-store endpoint '{}' cannot carry a path",
                config.endpoint
            )));
        }

        Ok(Self {
            client,
            endpoint,
            api_key,
            max_results: config.max_results,
        })
    }

    fn url(&self, store: &VectorStoreId) -> Result<Url, String> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| format!("Vector-store endpoint {} cannot carry a path", self.endpoint))?
            .pop_if_empty()
            .extend(["vector_stores", store.0.as_str(), "search"]);
        Ok(url)
    }

    async fn send(&self, store: &VectorStoreId, query: &str) -> Result<Vec<VectorStoreExcerpt>, String> {
        let url = self.url(store)?;
        let mut builder = self.client.post(url).json(&SearchRequest {
            query,
            max_num_results: self.max_results,
        });
        if let Some(api_key) = &self.api_key {
            builder = builder.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = builder.send().await.map_err(|e| format!("Network error: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("Vector store returned HTTP {}: {}", status, body));
        }

        let page: SearchPage = response
            .json()
            .await
            .map_err(|e| format!("Failed to parse search results: {e}"))?;

        Ok(page.data.into_iter().map(VectorStoreExcerpt::from).collect())
    }
}

#[async_trait]
impl VectorStoreGateway for OpenAIVectorStoreGateway {
    async fn search(&self, store: &VectorStoreId, query: &str) -> Dto<Vec<VectorStoreExcerpt>> {
        match self.send(store, query).await {
            Ok(excerpts) => {
                debug!("Vector store {} returned {} passages", store, excerpts.len());
                Ok(excerpts)
            }
            Err(message) => {
                warn!("Vector store {} search failed: {}", store, message);
                Err(ErrorInfo::new(OPERATION, message).with_context("vectorStoreID", store.0.clone()))
            }
        }
    }
}
