// Copyright (c) 2026 RAGE Research Assistant
// SPDX-License-Identifier: AGPL-3.0
//! # Gateway Interfaces (Secondary Ports)
//!
//! One trait per external system. Every method performs exactly one remote
//! call and normalizes the outcome into [`Dto<T>`]; expected failures
//! (network, auth, not-found) come back as `Err(ErrorInfo)`, never as panics.
//!
//! | Trait | External system | Implementations |
//! |-------|-----------------|-----------------|
//! | `AuthGateway` | caller session | `SessionAuthGateway` |
//! | `ConversationGateway` | Kernel | `KernelConversationGateway`, `InMemoryKernel` |
//! | `SourceDataGateway` | Kernel | `KernelSourceDataGateway`, `InMemoryKernel` |
//! | `ResearchContextGateway` | Kernel | `KernelResearchContextGateway`, `InMemoryKernel` |
//! | `AgentGateway` | LLM provider | `OpenAIAgentGateway` |
//! | `CaseStudyRepository` | satellite-data service | `SdaCaseStudyRepository` |
//! | `VectorStoreGateway` | vector-store service | `OpenAIVectorStoreGateway` |
//!
//! Kernel gateways act on behalf of a caller, so they are built per request
//! from [`Credentials`] through a [`GatewayFactory`].

use crate::domain::case_study::{CaseStudyOutcome, CaseStudyRun};
use crate::domain::conversation::{Conversation, ConversationId};
use crate::domain::error::Dto;
use crate::domain::file::SourceDataFile;
use crate::domain::message::{Message, NewMessage};
use crate::domain::research_context::{NewResearchContext, ResearchContext, ResearchContextId};
use crate::domain::vector_store::{VectorStoreExcerpt, VectorStoreId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Inbound session data as presented by the caller.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub auth_token: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            auth_token: Some(token.into()),
        }
    }
}

/// Credentials accepted by the Kernel (`X-Auth-Token`).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(rename = "xAuthToken")]
    pub x_auth_token: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("x_auth_token", &"<redacted>")
            .finish()
    }
}

#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn extract_credentials(&self, session: &Session) -> Dto<Credentials>;
}

#[async_trait]
pub trait ConversationGateway: Send + Sync {
    async fn list_conversations(&self, research_context_id: ResearchContextId) -> Dto<Vec<Conversation>>;

    async fn create_conversation(
        &self,
        research_context_id: ResearchContextId,
        title: &str,
    ) -> Dto<Conversation>;

    /// Messages of a conversation in chronological order.
    async fn list_messages(&self, conversation_id: ConversationId) -> Dto<Vec<Message>>;

    /// Append a message; returns it as stored.
    async fn send_message(&self, conversation_id: ConversationId, message: &NewMessage) -> Dto<Message>;
}

#[async_trait]
pub trait SourceDataGateway: Send + Sync {
    /// All source data visible to the caller.
    async fn list(&self) -> Dto<Vec<SourceDataFile>>;

    async fn list_for_research_context(&self, research_context_id: ResearchContextId) -> Dto<Vec<SourceDataFile>>;
}

#[async_trait]
pub trait ResearchContextGateway: Send + Sync {
    async fn list(&self) -> Dto<Vec<ResearchContext>>;

    async fn create(&self, research_context: &NewResearchContext) -> Dto<ResearchContext>;
}

/// A question put to the research agent within a conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentQuery {
    pub research_context_id: ResearchContextId,
    pub conversation_id: ConversationId,
    /// Index of the research context's source data, when it has one.
    pub vector_store: Option<VectorStoreId>,
    pub history: Vec<Message>,
    pub question: String,
}

#[async_trait]
pub trait AgentGateway: Send + Sync {
    /// Ask the agent; returns its reply as an `llm` message.
    async fn query(&self, query: &AgentQuery) -> Dto<Message>;
}

#[async_trait]
pub trait VectorStoreGateway: Send + Sync {
    /// Passages of `store` most similar to `query`, best first.
    async fn search(&self, store: &VectorStoreId, query: &str) -> Dto<Vec<VectorStoreExcerpt>>;
}

#[async_trait]
pub trait CaseStudyRepository: Send + Sync {
    async fn fetch(&self, run: &CaseStudyRun) -> Dto<CaseStudyOutcome>;
}

/// Builds gateways bound to one caller's credentials.
pub trait GatewayFactory: Send + Sync {
    fn conversations(&self, credentials: &Credentials) -> Arc<dyn ConversationGateway>;

    fn source_data(&self, credentials: &Credentials) -> Arc<dyn SourceDataGateway>;

    fn research_contexts(&self, credentials: &Credentials) -> Arc<dyn ResearchContextGateway>;

    fn agent(&self) -> Arc<dyn AgentGateway>;

    fn case_studies(&self) -> Arc<dyn CaseStudyRepository>;
}
