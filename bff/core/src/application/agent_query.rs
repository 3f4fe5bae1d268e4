// Copyright (c) 2026 RAGE Research Assistant
// SPDX-License-Identifier: AGPL-3.0

//! Agent Query Use Case
//!
//! Forwards a question, together with the conversation history the caller
//! already holds, to the LLM agent scoped to a research context.

use crate::application::presenter::Presenter;
use crate::application::response::{guarded, request_context, UseCaseResponse};
use crate::domain::conversation::ConversationId;
use crate::domain::gateway::{AgentGateway, AgentQuery};
use crate::domain::message::{chronological, Message};
use crate::domain::research_context::ResearchContextId;
use crate::domain::vector_store::VectorStoreId;
use crate::domain::view_model::ViewModel;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::debug;

pub const OPERATION: &str = "usecase#agent-query";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentQueryRequest {
    #[serde(rename = "researchContextID", default)]
    pub research_context_id: Option<ResearchContextId>,
    #[serde(rename = "conversationID", default)]
    pub conversation_id: Option<ConversationId>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub history: Vec<Message>,
    #[serde(rename = "vectorStoreID", default, skip_serializing_if = "Option::is_none")]
    pub vector_store_id: Option<VectorStoreId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentQueryPayload {
    #[serde(rename = "conversationID")]
    pub conversation_id: ConversationId,
    pub reply: Message,
}

pub type AgentQueryResponse = UseCaseResponse<AgentQueryPayload>;
pub type AgentQueryViewModel = ViewModel<AgentQueryPayload>;

#[async_trait]
pub trait AgentQueryUseCase: Send + Sync {
    async fn execute(&self, request: AgentQueryRequest) -> AgentQueryResponse;
}

pub struct StandardAgentQueryUseCase {
    agent_gateway: Arc<dyn AgentGateway>,
    presenter: Presenter<AgentQueryPayload>,
}

impl StandardAgentQueryUseCase {
    pub fn new(agent_gateway: Arc<dyn AgentGateway>, presenter: Presenter<AgentQueryPayload>) -> Self {
        Self {
            agent_gateway,
            presenter,
        }
    }

    async fn run(&self, request: AgentQueryRequest, context: &Map<String, Value>) -> AgentQueryResponse {
        let (Some(research_context_id), Some(conversation_id)) =
            (request.research_context_id, request.conversation_id)
        else {
            return UseCaseResponse::error(
                OPERATION,
                "A research context ID and a conversation ID are required",
                context,
            );
        };

        let question = match request.question.as_deref().map(str::trim) {
            Some(question) if !question.is_empty() => question.to_string(),
            _ => return UseCaseResponse::error(OPERATION, "The question must not be empty", context),
        };

        let query = AgentQuery {
            research_context_id,
            conversation_id,
            vector_store: request.vector_store_id,
            history: chronological(request.history),
            question,
        };

        match self.agent_gateway.query(&query).await {
            Ok(reply) => {
                debug!(
                    "Agent answered in conversation {} ({} history messages)",
                    conversation_id,
                    query.history.len()
                );
                UseCaseResponse::Success(AgentQueryPayload { conversation_id, reply })
            }
            Err(error) => UseCaseResponse::error(OPERATION, error.message, context),
        }
    }
}

#[async_trait]
impl AgentQueryUseCase for StandardAgentQueryUseCase {
    async fn execute(&self, request: AgentQueryRequest) -> AgentQueryResponse {
        let context = request_context(json!({
            "researchContextID": request.research_context_id,
            "conversationID": request.conversation_id,
        }));
        let response = guarded(OPERATION, &context, self.run(request, &context)).await;
        self.presenter.present(&response);
        response
    }
}
