// Copyright (c) 2026 RAGE Research Assistant
// SPDX-License-Identifier: AGPL-3.0

use crate::domain::conversation::{Conversation, ConversationId};
use crate::domain::error::Dto;
use crate::domain::gateway::{ConversationGateway, Credentials};
use crate::domain::message::{Message, MessageId, NewMessage};
use crate::domain::research_context::ResearchContextId;
use crate::infrastructure::kernel::client::KernelClient;
use crate::infrastructure::kernel::gateway_error;
use crate::infrastructure::kernel::models::{
    parse_timestamp, ListConversationsReply, ListMessagesReply, NewConversationReply, SendMessageBody,
    SendMessageReply,
};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::debug;

const LIST_CONVERSATIONS: &str = "kernel-conversation-gateway#list-conversations";
const CREATE_CONVERSATION: &str = "kernel-conversation-gateway#create-conversation";
const LIST_MESSAGES: &str = "kernel-conversation-gateway#list-messages";
const SEND_MESSAGE: &str = "kernel-conversation-gateway#send-message";

/// Conversation store backed by the Kernel, acting for one caller.
pub struct KernelConversationGateway {
    client: Arc<KernelClient>,
    credentials: Credentials,
}

impl KernelConversationGateway {
    pub fn new(client: Arc<KernelClient>, credentials: Credentials) -> Self {
        Self { client, credentials }
    }

    fn token(&self) -> &str {
        &self.credentials.x_auth_token
    }
}

#[async_trait]
impl ConversationGateway for KernelConversationGateway {
    async fn list_conversations(&self, research_context_id: ResearchContextId) -> Dto<Vec<Conversation>> {
        let path = format!("/research_context/{}/conversation", research_context_id);
        let reply: ListConversationsReply = self
            .client
            .get(self.token(), &path, &[])
            .await
            .map_err(|e| gateway_error(LIST_CONVERSATIONS, e).with_context("researchContextID", research_context_id.0))?;

        debug!(
            "Kernel listed {} conversations for research context {}",
            reply.conversations.len(),
            research_context_id
        );
        Ok(reply.conversations.into_iter().map(Conversation::from).collect())
    }

    async fn create_conversation(
        &self,
        research_context_id: ResearchContextId,
        title: &str,
    ) -> Dto<Conversation> {
        let path = format!("/research_context/{}/conversation", research_context_id);
        let reply: NewConversationReply = self
            .client
            .post::<(), _>(
                self.token(),
                &path,
                &[("conversation_title", title.to_string())],
                None,
            )
            .await
            .map_err(|e| {
                gateway_error(CREATE_CONVERSATION, e).with_context("researchContextID", research_context_id.0)
            })?;

        Ok(Conversation {
            id: ConversationId(reply.conversation_id),
            title: title.to_string(),
        })
    }

    async fn list_messages(&self, conversation_id: ConversationId) -> Dto<Vec<Message>> {
        let path = format!("/conversation/{}/message", conversation_id);
        let reply: ListMessagesReply = self
            .client
            .get(self.token(), &path, &[])
            .await
            .map_err(|e| gateway_error(LIST_MESSAGES, e).with_context("conversationID", conversation_id.0))?;

        reply
            .message_list
            .into_iter()
            .map(Message::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| gateway_error(LIST_MESSAGES, e).with_context("conversationID", conversation_id.0))
    }

    async fn send_message(&self, conversation_id: ConversationId, message: &NewMessage) -> Dto<Message> {
        let path = format!("/conversation/{}/message", conversation_id);
        let body = SendMessageBody {
            message_content: &message.content,
            sender_type: message.role.as_str(),
        };
        let reply: SendMessageReply = self
            .client
            .post(self.token(), &path, &[], Some(&body))
            .await
            .map_err(|e| gateway_error(SEND_MESSAGE, e).with_context("conversationID", conversation_id.0))?;

        let timestamp = match reply.timestamp.as_deref() {
            Some(ts) => parse_timestamp(ts)
                .map_err(|e| gateway_error(SEND_MESSAGE, e).with_context("conversationID", conversation_id.0))?,
            None => Utc::now(),
        };

        Ok(Message {
            id: MessageId(reply.message_id),
            role: message.role,
            content: message.content.clone(),
            timestamp,
        })
    }
}
