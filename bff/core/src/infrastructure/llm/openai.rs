// Copyright (c) 2026 RAGE Research Assistant
// SPDX-License-Identifier: AGPL-3.0

// OpenAI Agent Gateway
//
// Anti-Corruption Layer for the OpenAI chat completions API.
// Also works with OpenAI-compatible APIs (LM Studio, vLLM, etc.)

use crate::domain::config::{resolve_secret, AgentConfig, ConfigError};
use crate::domain::error::{Dto, ErrorInfo};
use crate::domain::gateway::{AgentGateway, AgentQuery, VectorStoreGateway};
use crate::domain::message::{Message, MessageId, MessageRole};
use crate::domain::vector_store::VectorStoreExcerpt;
use crate::infrastructure::llm::AgentError;
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

const OPERATION: &str = "openai-agent-gateway#query";

const DEFAULT_SYSTEM_PROMPT: &str = "You are a research assistant. Answer questions using the source data \
of the research context you are given. Say so when the sources do not contain the answer.";

pub struct OpenAIAgentGateway {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    system_prompt: String,
    vector_store: Option<Arc<dyn VectorStoreGateway>>,
}

#[derive(Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize, Deserialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
}

impl OpenAIAgentGateway {
    pub fn new(config: &AgentConfig) -> Result<Self, ConfigError> {
        let api_key = config.api_key.as_deref().map(resolve_secret).transpose()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ConfigError::Invalid(format!("Failed to build agent HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            system_prompt: config
                .system_prompt
                .clone()
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            vector_store: None,
        })
    }

    /// Ground answers in passages retrieved from the research context's vector store.
    pub fn with_vector_store(mut self, vector_store: Arc<dyn VectorStoreGateway>) -> Self {
        self.vector_store = Some(vector_store);
        self
    }

    fn system_message(&self, query: &AgentQuery, excerpts: &[VectorStoreExcerpt]) -> String {
        let mut content = format!(
            "{}\nResearch context: {}. Conversation: {}.",
            self.system_prompt, query.research_context_id, query.conversation_id
        );
        if let Some(store) = &query.vector_store {
            let _ = write!(content, " Vector store: {}.", store);
        }
        for excerpt in excerpts {
            let _ = write!(content, "\n[{} ({:.2})] {}", excerpt.file_name, excerpt.score, excerpt.text);
        }
        content
    }

    /// System prompt, then the history in order, then the question.
    fn messages(&self, query: &AgentQuery, excerpts: &[VectorStoreExcerpt]) -> Vec<OpenAIMessage> {
        let mut messages = Vec::with_capacity(query.history.len() + 2);
        messages.push(OpenAIMessage {
            role: "system".to_string(),
            content: self.system_message(query, excerpts),
        });
        messages.extend(query.history.iter().map(|message| OpenAIMessage {
            role: match message.role {
                MessageRole::User => "user",
                MessageRole::Llm => "assistant",
            }
            .to_string(),
            content: message.content.clone(),
        }));
        messages.push(OpenAIMessage {
            role: "user".to_string(),
            content: query.question.clone(),
        });
        messages
    }

    async fn excerpts(&self, query: &AgentQuery) -> Dto<Vec<VectorStoreExcerpt>> {
        match (&query.vector_store, &self.vector_store) {
            (Some(store), Some(gateway)) => gateway.search(store, &query.question).await,
            _ => Ok(Vec::new()),
        }
    }

    async fn complete(&self, query: &AgentQuery, excerpts: &[VectorStoreExcerpt]) -> Result<String, AgentError> {
        let request = OpenAIRequest {
            model: self.model.clone(),
            messages: self.messages(query, excerpts),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let url = format!("{}/chat/completions", self.endpoint);
        let mut builder = self.client.post(&url).json(&request);
        if let Some(api_key) = &self.api_key {
            builder = builder.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = builder.send().await.map_err(|e| AgentError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            return Err(if status == 401 || status == 403 {
                AgentError::Authentication(error_text)
            } else if status == 429 {
                AgentError::RateLimit
            } else if status == 404 {
                AgentError::ModelNotFound(self.model.clone())
            } else {
                AgentError::Provider(format!("HTTP {}: {}", status, error_text))
            });
        }

        let openai_response: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Provider(format!("Failed to parse response: {}", e)))?;

        openai_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AgentError::Provider("No response from model".into()))
    }
}

#[async_trait]
impl AgentGateway for OpenAIAgentGateway {
    async fn query(&self, query: &AgentQuery) -> Dto<Message> {
        let excerpts = self.excerpts(query).await.map_err(|error| {
            warn!("Agent retrieval failed: {}", error.message);
            error
                .retag(OPERATION)
                .with_context("researchContextID", query.research_context_id.0)
                .with_context("conversationID", query.conversation_id.0)
        })?;

        match self.complete(query, &excerpts).await {
            Ok(content) => {
                debug!("Model {} answered in conversation {}", self.model, query.conversation_id);
                // Replies are not persisted here, so they carry the id after the last history entry.
                let next_id = query
                    .history
                    .iter()
                    .map(|m| m.id.0)
                    .max()
                    .map_or(1, |id| id.saturating_add(1));
                Ok(Message {
                    id: MessageId(next_id),
                    role: MessageRole::Llm,
                    content,
                    timestamp: Utc::now(),
                })
            }
            Err(error) => {
                warn!("Agent query failed: {}", error);
                Err(ErrorInfo::new(OPERATION, error.to_string())
                    .with_context("researchContextID", query.research_context_id.0)
                    .with_context("conversationID", query.conversation_id.0))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::ConversationId;
    use crate::domain::research_context::ResearchContextId;
    use crate::domain::vector_store::VectorStoreId;
    use chrono::TimeZone;
    use mockito::Matcher;
    use serde_json::json;

    fn config(endpoint: String) -> AgentConfig {
        AgentConfig {
            endpoint,
            api_key: Some("sk-test".into()),
            model: "gpt-4o".into(),
            temperature: Some(0.2),
            max_tokens: None,
            system_prompt: Some("Be brief.".into()),
            timeout_seconds: 5,
        }
    }

    fn query() -> AgentQuery {
        AgentQuery {
            research_context_id: ResearchContextId(2),
            conversation_id: ConversationId(4),
            vector_store: None,
            history: vec![
                Message {
                    id: MessageId(1),
                    role: MessageRole::User,
                    content: "hello".into(),
                    timestamp: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
                },
                Message {
                    id: MessageId(2),
                    role: MessageRole::Llm,
                    content: "hi".into(),
                    timestamp: Utc.timestamp_opt(1_700_000_001, 0).unwrap(),
                },
            ],
            question: "What is NO2?".into(),
        }
    }

    #[tokio::test]
    async fn sends_history_between_system_prompt_and_question() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::PartialJson(json!({
                "model": "gpt-4o",
                "messages": [
                    {"role": "system"},
                    {"role": "user", "content": "hello"},
                    {"role": "assistant", "content": "hi"},
                    {"role": "user", "content": "What is NO2?"}
                ]
            })))
            .with_status(200)
            .with_body(json!({"choices": [{"message": {"role": "assistant", "content": "Nitrogen dioxide."}}]}).to_string())
            .create_async()
            .await;

        let gateway = OpenAIAgentGateway::new(&config(server.url())).unwrap();
        let reply = gateway.query(&query()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(reply.role, MessageRole::Llm);
        assert_eq!(reply.content, "Nitrogen dioxide.");
        assert_eq!(reply.id, MessageId(3));
    }

    #[tokio::test]
    async fn rate_limit_is_a_gateway_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .create_async()
            .await;

        let gateway = OpenAIAgentGateway::new(&config(server.url())).unwrap();
        let error = gateway.query(&query()).await.unwrap_err();

        assert_eq!(error.operation, OPERATION);
        assert_eq!(error.message, "Rate limit exceeded");
        assert_eq!(error.context.unwrap()["conversationID"], 4);
    }

    struct StubVectorStore(Dto<Vec<VectorStoreExcerpt>>);

    #[async_trait]
    impl VectorStoreGateway for StubVectorStore {
        async fn search(&self, _store: &VectorStoreId, _query: &str) -> Dto<Vec<VectorStoreExcerpt>> {
            self.0.clone()
        }
    }

    #[tokio::test]
    async fn request_carries_vector_store_and_passages() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex("Vector store: vs_42\\.".into()),
                Matcher::Regex(r"\[no2\.csv \(0\.91\)\] NO2 fell by 12%".into()),
            ]))
            .with_status(200)
            .with_body(json!({"choices": [{"message": {"role": "assistant", "content": "It fell."}}]}).to_string())
            .create_async()
            .await;

        let store = StubVectorStore(Ok(vec![VectorStoreExcerpt {
            file_name: "no2.csv".into(),
            score: 0.91,
            text: "NO2 fell by 12%".into(),
        }]));
        let gateway = OpenAIAgentGateway::new(&config(server.url()))
            .unwrap()
            .with_vector_store(Arc::new(store));
        let query = AgentQuery {
            vector_store: Some(VectorStoreId("vs_42".into())),
            ..query()
        };

        let reply = gateway.query(&query).await.unwrap();

        mock.assert_async().await;
        assert_eq!(reply.content, "It fell.");
    }

    #[tokio::test]
    async fn failed_retrieval_skips_the_model() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .expect(0)
            .create_async()
            .await;

        let store = StubVectorStore(Err(ErrorInfo::new("openai-vector-store-gateway#search", "HTTP 404")
            .with_context("vectorStoreID", "vs_missing")));
        let gateway = OpenAIAgentGateway::new(&config(server.url()))
            .unwrap()
            .with_vector_store(Arc::new(store));
        let query = AgentQuery {
            vector_store: Some(VectorStoreId("vs_missing".into())),
            ..query()
        };

        let error = gateway.query(&query).await.unwrap_err();

        mock.assert_async().await;
        assert_eq!(error.operation, OPERATION);
        let context = error.context.unwrap();
        assert_eq!(context["vectorStoreID"], "vs_missing");
        assert_eq!(context["conversationID"], 4);
    }

    #[tokio::test]
    async fn reply_id_saturates_after_the_largest_history_id() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(json!({"choices": [{"message": {"role": "assistant", "content": "ok"}}]}).to_string())
            .create_async()
            .await;

        let mut query = query();
        query.history[1].id = MessageId(i64::MAX);

        let gateway = OpenAIAgentGateway::new(&config(server.url())).unwrap();
        let reply = gateway.query(&query).await.unwrap();

        assert_eq!(reply.id, MessageId(i64::MAX));
    }
}
