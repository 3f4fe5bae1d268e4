// Copyright (c) 2026 RAGE Research Assistant
// SPDX-License-Identifier: AGPL-3.0

//! Scripted gateways shared by the use-case unit tests.

use crate::domain::case_study::{CaseStudyOutcome, CaseStudyRun};
use crate::domain::conversation::{Conversation, ConversationId};
use crate::domain::error::{Dto, ErrorInfo};
use crate::domain::file::SourceDataFile;
use crate::domain::gateway::{
    AgentGateway, AgentQuery, CaseStudyRepository, ConversationGateway, ResearchContextGateway,
    SourceDataGateway,
};
use crate::domain::message::{Message, MessageId, MessageRole, NewMessage};
use crate::domain::research_context::{NewResearchContext, ResearchContext, ResearchContextId};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
pub struct MockGateways {
    pub(crate) calls: AtomicUsize,
    pub failure: Option<String>,
    pub panic_message: Option<&'static str>,
    pub research_contexts: Vec<ResearchContext>,
    pub conversations: Vec<Conversation>,
    pub messages: Vec<Message>,
    pub source_data: Vec<SourceDataFile>,
    pub case_study: Option<CaseStudyOutcome>,
}

impl MockGateways {
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn panicking(message: &'static str) -> Self {
        Self {
            panic_message: Some(message),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record<T>(&self, operation: &str, value: impl FnOnce() -> T) -> Dto<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.panic_message {
            panic!("{}", message);
        }
        match &self.failure {
            Some(message) => Err(ErrorInfo::new(operation, message.clone())),
            None => Ok(value()),
        }
    }
}

pub fn message(id: i64, role: MessageRole, content: &str) -> Message {
    Message {
        id: MessageId(id),
        role,
        content: content.to_string(),
        timestamp: Utc.timestamp_opt(1_700_000_000 + id, 0).unwrap(),
    }
}

#[async_trait]
impl ConversationGateway for MockGateways {
    async fn list_conversations(&self, _research_context_id: ResearchContextId) -> Dto<Vec<Conversation>> {
        self.record("mock#list_conversations", || self.conversations.clone())
    }

    async fn create_conversation(&self, _research_context_id: ResearchContextId, title: &str) -> Dto<Conversation> {
        self.record("mock#create_conversation", || Conversation {
            id: ConversationId(1),
            title: title.to_string(),
        })
    }

    async fn list_messages(&self, _conversation_id: ConversationId) -> Dto<Vec<Message>> {
        self.record("mock#list_messages", || self.messages.clone())
    }

    async fn send_message(&self, _conversation_id: ConversationId, new_message: &NewMessage) -> Dto<Message> {
        self.record("mock#send_message", || message(99, new_message.role, &new_message.content))
    }
}

#[async_trait]
impl SourceDataGateway for MockGateways {
    async fn list(&self) -> Dto<Vec<SourceDataFile>> {
        self.record("mock#list_source_data", || self.source_data.clone())
    }

    async fn list_for_research_context(&self, _research_context_id: ResearchContextId) -> Dto<Vec<SourceDataFile>> {
        self.record("mock#list_source_data_for_research_context", || self.source_data.clone())
    }
}

#[async_trait]
impl ResearchContextGateway for MockGateways {
    async fn list(&self) -> Dto<Vec<ResearchContext>> {
        self.record("mock#list_research_contexts", || self.research_contexts.clone())
    }

    async fn create(&self, research_context: &NewResearchContext) -> Dto<ResearchContext> {
        self.record("mock#create_research_context", || ResearchContext {
            id: ResearchContextId(1),
            title: research_context.title.clone(),
            description: research_context.description.clone(),
        })
    }
}

#[async_trait]
impl AgentGateway for MockGateways {
    async fn query(&self, query: &AgentQuery) -> Dto<Message> {
        self.record("mock#agent_query", || {
            let content = match &query.vector_store {
                Some(store) => format!("answer to: {} [{}]", query.question, store),
                None => format!("answer to: {}", query.question),
            };
            message(query.history.len() as i64 + 1, MessageRole::Llm, &content)
        })
    }
}

#[async_trait]
impl CaseStudyRepository for MockGateways {
    async fn fetch(&self, _run: &CaseStudyRun) -> Dto<CaseStudyOutcome> {
        self.record("mock#case_study", || {
            self.case_study.clone().unwrap_or(CaseStudyOutcome::Completed { keyframes: vec![] })
        })
    }
}
