// Copyright (c) 2026 RAGE Research Assistant
// SPDX-License-Identifier: AGPL-3.0

use crate::retry::RetryPolicy;
use rage_core::application::agent_query::{AgentQueryPayload, AgentQueryRequest};
use rage_core::application::case_study::{CaseStudyPayload, CaseStudyRequest};
use rage_core::application::create_conversation::CreateConversationPayload;
use rage_core::application::create_research_context::{CreateResearchContextPayload, CreateResearchContextRequest};
use rage_core::application::list_conversations::ListConversationsPayload;
use rage_core::application::list_messages::ListMessagesPayload;
use rage_core::application::list_research_contexts::ListResearchContextsPayload;
use rage_core::application::list_source_data::ListSourceDataPayload;
use rage_core::application::send_message::{SendMessagePayload, SendMessageRequest};
use rage_core::domain::conversation::ConversationId;
use rage_core::domain::error::{Dto, Envelope, ErrorInfo};
use rage_core::domain::message::NewMessage;
use rage_core::domain::research_context::ResearchContextId;
use rage_core::domain::view_model::ViewModel;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, warn};

const AUTH_HEADER: &str = "X-Auth-Token";

/// Client for the RAGE RPC surface.
///
/// Every call retries transport failures and `success: false` replies
/// according to its [`RetryPolicy`] before returning the last error.
pub struct RageClient {
    base_url: String,
    client: Client,
    auth_token: Option<String>,
    retry: RetryPolicy,
}

impl RageClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
            auth_token: None,
            retry: RetryPolicy::default(),
        }
    }

    /// Session token sent as `X-Auth-Token`.
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    pub async fn list_research_contexts(&self) -> Dto<ListResearchContextsPayload> {
        self.call("researchContexts.list", |client, url| client.get(url)).await
    }

    pub async fn create_research_context(
        &self,
        request: &CreateResearchContextRequest,
    ) -> Dto<CreateResearchContextPayload> {
        self.call("researchContexts.create", |client, url| client.post(url).json(request))
            .await
    }

    pub async fn list_conversations(&self, research_context_id: ResearchContextId) -> Dto<ListConversationsPayload> {
        self.call("conversations.list", |client, url| {
            client.get(url).query(&[("id", research_context_id.0)])
        })
        .await
    }

    pub async fn create_conversation(
        &self,
        research_context_id: ResearchContextId,
        title: &str,
    ) -> Dto<CreateConversationPayload> {
        let body = json!({ "id": research_context_id, "title": title });
        self.call("conversations.create", |client, url| client.post(url).json(&body))
            .await
    }

    pub async fn list_messages(&self, conversation_id: ConversationId) -> Dto<ListMessagesPayload> {
        self.call("messages.list", |client, url| {
            client.get(url).query(&[("id", conversation_id.0)])
        })
        .await
    }

    pub async fn send_message(&self, conversation_id: ConversationId, message: NewMessage) -> Dto<SendMessagePayload> {
        let request = SendMessageRequest {
            conversation_id: Some(conversation_id),
            message: Some(message),
        };
        self.call("messages.send", |client, url| client.post(url).json(&request))
            .await
    }

    pub async fn list_source_data(&self, research_context_id: Option<ResearchContextId>) -> Dto<ListSourceDataPayload> {
        self.call("sourceData.list", |client, url| match research_context_id {
            Some(id) => client.get(url).query(&[("researchContextID", id.0)]),
            None => client.get(url),
        })
        .await
    }

    /// Either a `progress` or a `success` view model while the call succeeds.
    pub async fn trigger_case_study(&self, request: &CaseStudyRequest) -> Dto<ViewModel<CaseStudyPayload>> {
        self.call("caseStudy.trigger", |client, url| client.post(url).json(request))
            .await
    }

    pub async fn query_agent(&self, request: &AgentQueryRequest) -> Dto<AgentQueryPayload> {
        self.call("agent.query", |client, url| client.post(url).json(request))
            .await
    }

    async fn call<T, F>(&self, procedure: &str, build: F) -> Dto<T>
    where
        T: DeserializeOwned,
        F: Fn(&Client, &str) -> RequestBuilder,
    {
        let url = format!("{}/rpc/{}", self.base_url, procedure);
        let attempts = self.retry.attempts();
        let mut attempt = 1;

        loop {
            match self.attempt(procedure, build(&self.client, &url)).await {
                Ok(data) => {
                    debug!(procedure, attempt, "RPC call succeeded");
                    return Ok(data);
                }
                Err(error) if attempt < attempts => {
                    warn!(
                        procedure,
                        attempt,
                        "RPC call failed, retrying in {:?}: {}",
                        self.retry.delay,
                        error.message
                    );
                    tokio::time::sleep(self.retry.delay).await;
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }

    async fn attempt<T: DeserializeOwned>(&self, procedure: &str, request: RequestBuilder) -> Dto<T> {
        let operation = format!("sdk#{procedure}");
        let request = match &self.auth_token {
            Some(token) => request.header(AUTH_HEADER, token),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| ErrorInfo::new(&operation, format!("Network error: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ErrorInfo::new(&operation, format!("Server returned HTTP {status}")));
        }

        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| ErrorInfo::new(&operation, format!("Failed to parse reply: {e}")))?;
        envelope.into_result()
    }
}
