// Copyright (c) 2026 RAGE Research Assistant
// SPDX-License-Identifier: AGPL-3.0

//! Create Conversation Use Case
//!
//! Opens a new conversation inside a research context. A blank title falls
//! back to `Untitled`; the research context id is required.

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
use tracing::info;

pub const OPERATION: &str = "usecase#create-conversation";
pub const DEFAULT_TITLE: &str = "Untitled";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateConversationRequest {
    #[serde(rename = "researchContextID", default)]
    pub research_context_id: Option<ResearchContextId>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateConversationPayload {
    #[serde(rename = "researchContextID")]
    pub research_context_id: ResearchContextId,
    pub conversation: Conversation,
}

pub type CreateConversationResponse = UseCaseResponse<CreateConversationPayload>;
pub type CreateConversationViewModel = ViewModel<CreateConversationPayload>;

#[async_trait]
pub trait CreateConversationUseCase: Send + Sync {
    async fn execute(&self, request: CreateConversationRequest) -> CreateConversationResponse;
}

pub struct StandardCreateConversationUseCase {
    conversation_gateway: Arc<dyn ConversationGateway>,
    presenter: Presenter<CreateConversationPayload>,
}

impl StandardCreateConversationUseCase {
    pub fn new(
        conversation_gateway: Arc<dyn ConversationGateway>,
        presenter: Presenter<CreateConversationPayload>,
    ) -> Self {
        Self {
            conversation_gateway,
            presenter,
        }
    }

    async fn run(&self, request: CreateConversationRequest, context: &Map<String, Value>) -> CreateConversationResponse {
        let Some(research_context_id) = request.research_context_id else {
            return UseCaseResponse::error(OPERATION, "A research context ID is required", context);
        };

        let title = request
            .title
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .unwrap_or(DEFAULT_TITLE);

        match self
            .conversation_gateway
            .create_conversation(research_context_id, title)
            .await
        {
            Ok(conversation) => {
                info!(
                    "Created conversation {} in research context {}",
                    conversation.id, research_context_id
                );
                UseCaseResponse::Success(CreateConversationPayload {
                    research_context_id,
                    conversation,
                })
            }
            Err(error) => UseCaseResponse::error(OPERATION, error.message, context),
        }
    }
}

#[async_trait]
impl CreateConversationUseCase for StandardCreateConversationUseCase {
    async fn execute(&self, request: CreateConversationRequest) -> CreateConversationResponse {
        let context = request_context(json!({
            "researchContextID": request.research_context_id,
            "title": request.title,
        }));
        let response = guarded(OPERATION, &context, self.run(request, &context)).await;
        self.presenter.present(&response);
        response
    }
}
