// Copyright (c) 2026 RAGE Research Assistant
// SPDX-License-Identifier: AGPL-3.0

//! List Messages For Conversation Use Case
//!
//! Messages are returned in chronological order regardless of the order the
//! store reports them in.

use crate::application::presenter::Presenter;
use crate::application::response::{guarded, request_context, UseCaseResponse};
use crate::domain::conversation::ConversationId;
use crate::domain::gateway::ConversationGateway;
use crate::domain::message::{chronological, Message};
use crate::domain::view_model::ViewModel;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::debug;

pub const OPERATION: &str = "usecase#list-messages-for-conversation";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListMessagesRequest {
    #[serde(rename = "conversationID", default)]
    pub conversation_id: Option<ConversationId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListMessagesPayload {
    #[serde(rename = "conversationID")]
    pub conversation_id: ConversationId,
    pub messages: Vec<Message>,
}

pub type ListMessagesResponse = UseCaseResponse<ListMessagesPayload>;
pub type ListMessagesViewModel = ViewModel<ListMessagesPayload>;

#[async_trait]
pub trait ListMessagesUseCase: Send + Sync {
    async fn execute(&self, request: ListMessagesRequest) -> ListMessagesResponse;
}

pub struct StandardListMessagesUseCase {
    conversation_gateway: Arc<dyn ConversationGateway>,
    presenter: Presenter<ListMessagesPayload>,
}

impl StandardListMessagesUseCase {
    pub fn new(conversation_gateway: Arc<dyn ConversationGateway>, presenter: Presenter<ListMessagesPayload>) -> Self {
        Self {
            conversation_gateway,
            presenter,
        }
    }

    async fn run(&self, request: ListMessagesRequest, context: &Map<String, Value>) -> ListMessagesResponse {
        let Some(conversation_id) = request.conversation_id else {
            return UseCaseResponse::error(OPERATION, "A conversation ID is required", context);
        };

        match self.conversation_gateway.list_messages(conversation_id).await {
            Ok(messages) => {
                debug!("Listed {} messages for conversation {}", messages.len(), conversation_id);
                UseCaseResponse::Success(ListMessagesPayload {
                    conversation_id,
                    messages: chronological(messages),
                })
            }
            Err(error) => UseCaseResponse::error(OPERATION, error.message, context),
        }
    }
}

#[async_trait]
impl ListMessagesUseCase for StandardListMessagesUseCase {
    async fn execute(&self, request: ListMessagesRequest) -> ListMessagesResponse {
        let context = request_context(json!({ "conversationID": request.conversation_id }));
        let response = guarded(OPERATION, &context, self.run(request, &context)).await;
        self.presenter.present(&response);
        response
    }
}
