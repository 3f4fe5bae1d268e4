// Copyright (c) 2026 RAGE Research Assistant
// SPDX-License-Identifier: AGPL-3.0

//! In-memory Kernel
//!
//! Thread-safe stand-in for the Kernel used by `backend: in-memory` and by
//! tests. Ids are sequential per entity kind and message lists are
//! append-only. Every handle cloned from one `InMemoryKernel` shares the
//! same store.

use crate::domain::conversation::{Conversation, ConversationId};
use crate::domain::error::{Dto, ErrorInfo};
use crate::domain::file::{LocalSourceData, RemoteSourceData, SourceDataFile};
use crate::domain::gateway::{ConversationGateway, ResearchContextGateway, SourceDataGateway};
use crate::domain::message::{Message, MessageId, NewMessage};
use crate::domain::research_context::{NewResearchContext, ResearchContext, ResearchContextId};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

struct StoredResearchContext {
    research_context: ResearchContext,
    source_ids: Vec<String>,
}

struct StoredConversation {
    research_context_id: ResearchContextId,
    conversation: Conversation,
    messages: Vec<Message>,
}

#[derive(Default)]
struct KernelState {
    research_contexts: BTreeMap<ResearchContextId, StoredResearchContext>,
    conversations: BTreeMap<ConversationId, StoredConversation>,
    source_data: Vec<SourceDataFile>,
    next_research_context_id: i64,
    next_conversation_id: i64,
    next_message_id: i64,
}

#[derive(Clone, Default)]
pub struct InMemoryKernel {
    state: Arc<RwLock<KernelState>>,
}

impl InMemoryKernel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source_data(source_data: Vec<SourceDataFile>) -> Self {
        let kernel = Self::new();
        kernel.state.write().source_data = source_data;
        kernel
    }

    /// A store with a couple of demo files, for local development.
    pub fn seeded() -> Self {
        let created_at = Utc::now().to_rfc3339();
        Self::with_source_data(vec![
            SourceDataFile::Local(LocalSourceData {
                id: "1".into(),
                name: "notes.txt".into(),
                relative_path: "uploads/notes.txt".into(),
                created_at: created_at.clone(),
            }),
            SourceDataFile::Remote(RemoteSourceData {
                id: "2".into(),
                name: "sentinel-5p-no2.csv".into(),
                relative_path: "sda/sentinel-5p/no2.csv".into(),
                provider: "s3".into(),
                created_at,
            }),
        ])
    }
}

fn not_found(operation: &str, what: &str, id: i64) -> ErrorInfo {
    ErrorInfo::new(operation, format!("{what} {id} not found"))
}

#[async_trait]
impl ResearchContextGateway for InMemoryKernel {
    async fn list(&self) -> Dto<Vec<ResearchContext>> {
        let state = self.state.read();
        Ok(state
            .research_contexts
            .values()
            .map(|stored| stored.research_context.clone())
            .collect())
    }

    async fn create(&self, research_context: &NewResearchContext) -> Dto<ResearchContext> {
        let mut state = self.state.write();

        let known: Vec<&str> = state.source_data.iter().map(SourceDataFile::id).collect();
        if let Some(unknown) = research_context
            .sources
            .iter()
            .find(|source| !known.contains(&source.id.as_str()))
        {
            return Err(ErrorInfo::new(
                "in-memory-kernel#create-research-context",
                format!("Source data {} not found", unknown.id),
            ));
        }

        state.next_research_context_id += 1;
        let created = ResearchContext {
            id: ResearchContextId(state.next_research_context_id),
            title: research_context.title.clone(),
            description: research_context.description.clone(),
        };
        state.research_contexts.insert(
            created.id,
            StoredResearchContext {
                research_context: created.clone(),
                source_ids: research_context.sources.iter().map(|s| s.id.clone()).collect(),
            },
        );
        Ok(created)
    }
}

#[async_trait]
impl ConversationGateway for InMemoryKernel {
    async fn list_conversations(&self, research_context_id: ResearchContextId) -> Dto<Vec<Conversation>> {
        let state = self.state.read();
        if !state.research_contexts.contains_key(&research_context_id) {
            return Err(not_found(
                "in-memory-kernel#list-conversations",
                "Research context",
                research_context_id.0,
            ));
        }
        Ok(state
            .conversations
            .values()
            .filter(|stored| stored.research_context_id == research_context_id)
            .map(|stored| stored.conversation.clone())
            .collect())
    }

    async fn create_conversation(
        &self,
        research_context_id: ResearchContextId,
        title: &str,
    ) -> Dto<Conversation> {
        let mut state = self.state.write();
        if !state.research_contexts.contains_key(&research_context_id) {
            return Err(not_found(
                "in-memory-kernel#create-conversation",
                "Research context",
                research_context_id.0,
            ));
        }

        state.next_conversation_id += 1;
        let conversation = Conversation {
            id: ConversationId(state.next_conversation_id),
            title: title.to_string(),
        };
        state.conversations.insert(
            conversation.id,
            StoredConversation {
                research_context_id,
                conversation: conversation.clone(),
                messages: Vec::new(),
            },
        );
        Ok(conversation)
    }

    async fn list_messages(&self, conversation_id: ConversationId) -> Dto<Vec<Message>> {
        let state = self.state.read();
        state
            .conversations
            .get(&conversation_id)
            .map(|stored| stored.messages.clone())
            .ok_or_else(|| not_found("in-memory-kernel#list-messages", "Conversation", conversation_id.0))
    }

    async fn send_message(&self, conversation_id: ConversationId, message: &NewMessage) -> Dto<Message> {
        let mut guard = self.state.write();
        let state = &mut *guard;

        let stored = state
            .conversations
            .get_mut(&conversation_id)
            .ok_or_else(|| not_found("in-memory-kernel#send-message", "Conversation", conversation_id.0))?;

        state.next_message_id += 1;
        let message = Message {
            id: MessageId(state.next_message_id),
            role: message.role,
            content: message.content.clone(),
            timestamp: Utc::now(),
        };
        stored.messages.push(message.clone());
        Ok(message)
    }
}

#[async_trait]
impl SourceDataGateway for InMemoryKernel {
    async fn list(&self) -> Dto<Vec<SourceDataFile>> {
        Ok(self.state.read().source_data.clone())
    }

    async fn list_for_research_context(&self, research_context_id: ResearchContextId) -> Dto<Vec<SourceDataFile>> {
        let state = self.state.read();
        let stored = state.research_contexts.get(&research_context_id).ok_or_else(|| {
            not_found(
                "in-memory-kernel#list-source-data-for-research-context",
                "Research context",
                research_context_id.0,
            )
        })?;

        Ok(state
            .source_data
            .iter()
            .filter(|file| stored.source_ids.iter().any(|id| id == file.id()))
            .cloned()
            .collect())
    }
}
