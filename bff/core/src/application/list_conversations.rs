// Copyright (c) 2026 RAGE Research Assistant
// SPDX-License-Identifier: AGPL-3.0

//! List Conversations Use Case

use crate::application::presenter::Presenter;
use crate::application::response::{guarded, request_context, UseCaseResponse};
use crate::domain::conversation::Conversation;
use crate::domain::gateway::ConversationGateway;
use crate::domain::research_context::ResearchContextId;
use crate::domain::view_model::ViewModel;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::debug;

pub const OPERATION: &str = "usecase#list-conversations";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListConversationsRequest {
    #[serde(rename = "researchContextID", default)]
    pub research_context_id: Option<ResearchContextId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListConversationsPayload {
    #[serde(rename = "researchContextID")]
    pub research_context_id: ResearchContextId,
    pub conversations: Vec<Conversation>,
}

pub type ListConversationsResponse = UseCaseResponse<ListConversationsPayload>;
pub type ListConversationsViewModel = ViewModel<ListConversationsPayload>;

#[async_trait]
pub trait ListConversationsUseCase: Send + Sync {
    async fn execute(&self, request: ListConversationsRequest) -> ListConversationsResponse;
}

pub struct StandardListConversationsUseCase {
    conversation_gateway: Arc<dyn ConversationGateway>,
    presenter: Presenter<ListConversationsPayload>,
}

impl StandardListConversationsUseCase {
    pub fn new(
        conversation_gateway: Arc<dyn ConversationGateway>,
        presenter: Presenter<ListConversationsPayload>,
    ) -> Self {
        Self {
            conversation_gateway,
            presenter,
        }
    }

    async fn run(&self, request: ListConversationsRequest, context: &Map<String, Value>) -> ListConversationsResponse {
        let Some(research_context_id) = request.research_context_id else {
            return UseCaseResponse::error(OPERATION, "A research context ID is required", context);
        };

        match self.conversation_gateway.list_conversations(research_context_id).await {
            Ok(conversations) => {
                debug!(
                    "Listed {} conversations for research context {}",
                    conversations.len(),
                    research_context_id
                );
                UseCaseResponse::Success(ListConversationsPayload {
                    research_context_id,
                    conversations,
                })
            }
            Err(error) => UseCaseResponse::error(OPERATION, error.message, context),
        }
    }
}

#[async_trait]
impl ListConversationsUseCase for StandardListConversationsUseCase {
    async fn execute(&self, request: ListConversationsRequest) -> ListConversationsResponse {
        let context = request_context(json!({ "researchContextID": request.research_context_id }));
        let response = guarded(OPERATION, &context, self.run(request, &context)).await;
        self.presenter.present(&response);
        response
    }
}
