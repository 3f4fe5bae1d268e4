// Copyright (c) 2026 RAGE Research Assistant
// SPDX-License-Identifier: AGPL-3.0

//! Send Message Use Case
//!
//! Appends a user message to a conversation. The stored message (with the
//! id and timestamp the store assigned) is the success payload.

use crate::application::presenter::Presenter;
use crate::application::response::{guarded, request_context, UseCaseResponse};
use crate::domain::conversation::ConversationId;
use crate::domain::gateway::ConversationGateway;
use crate::domain::message::{Message, MessageRole, NewMessage};
use crate::domain::view_model::ViewModel;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::debug;

pub const OPERATION: &str = "usecase#send-message";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessageRequest {
    #[serde(rename = "conversationID", default)]
    pub conversation_id: Option<ConversationId>,
    #[serde(default)]
    pub message: Option<NewMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessagePayload {
    #[serde(rename = "conversationID")]
    pub conversation_id: ConversationId,
    pub message: Message,
}

pub type SendMessageResponse = UseCaseResponse<SendMessagePayload>;
pub type SendMessageViewModel = ViewModel<SendMessagePayload>;

#[async_trait]
pub trait SendMessageUseCase: Send + Sync {
    async fn execute(&self, request: SendMessageRequest) -> SendMessageResponse;
}

pub struct StandardSendMessageUseCase {
    conversation_gateway: Arc<dyn ConversationGateway>,
    presenter: Presenter<SendMessagePayload>,
}

impl StandardSendMessageUseCase {
    pub fn new(conversation_gateway: Arc<dyn ConversationGateway>, presenter: Presenter<SendMessagePayload>) -> Self {
        Self {
            conversation_gateway,
            presenter,
        }
    }

    async fn run(&self, request: SendMessageRequest, context: &Map<String, Value>) -> SendMessageResponse {
        let Some(conversation_id) = request.conversation_id else {
            return UseCaseResponse::error(OPERATION, "A conversation ID is required", context);
        };

        let message = match request.message {
            Some(message) if !message.is_blank() => message,
            _ => return UseCaseResponse::error(OPERATION, "Message content must not be empty", context),
        };

        if message.role != MessageRole::User {
            return UseCaseResponse::error(OPERATION, "Only user messages can be sent", context);
        }

        match self.conversation_gateway.send_message(conversation_id, &message).await {
            Ok(stored) => {
                debug!("Stored message {} in conversation {}", stored.id, conversation_id);
                UseCaseResponse::Success(SendMessagePayload {
                    conversation_id,
                    message: stored,
                })
            }
            Err(error) => UseCaseResponse::error(OPERATION, error.message, context),
        }
    }
}

#[async_trait]
impl SendMessageUseCase for StandardSendMessageUseCase {
    async fn execute(&self, request: SendMessageRequest) -> SendMessageResponse {
        let context = request_context(json!({ "conversationID": request.conversation_id }));
        let response = guarded(OPERATION, &context, self.run(request, &context)).await;
        self.presenter.present(&response);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::MockGateways;

    fn usecase(gateway: Arc<MockGateways>) -> StandardSendMessageUseCase {
        StandardSendMessageUseCase::new(gateway, Presenter::detached("test"))
    }

    #[tokio::test]
    async fn blank_and_agent_messages_are_rejected_locally() {
        let gateway = Arc::new(MockGateways::default());
        let usecase = usecase(gateway.clone());

        for message in [
            None,
            Some(NewMessage::user("  ")),
            Some(NewMessage {
                role: MessageRole::Llm,
                content: "spoofed".into(),
            }),
        ] {
            let response = usecase
                .execute(SendMessageRequest {
                    conversation_id: Some(ConversationId(1)),
                    message,
                })
                .await;
            assert_eq!(response.status(), "error");
        }

        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn stored_message_is_returned() {
        let gateway = Arc::new(MockGateways::default());
        let response = usecase(gateway.clone())
            .execute(SendMessageRequest {
                conversation_id: Some(ConversationId(1)),
                message: Some(NewMessage::user("What changed in 2024?")),
            })
            .await;

        let payload = response.success().unwrap();
        assert_eq!(payload.message.content, "What changed in 2024?");
        assert_eq!(payload.message.role, MessageRole::User);
        assert_eq!(gateway.calls(), 1);
    }
}
