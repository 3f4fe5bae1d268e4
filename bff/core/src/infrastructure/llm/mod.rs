// Copyright (c) 2026 RAGE Research Assistant
// SPDX-License-Identifier: AGPL-3.0

pub mod openai;
pub mod vector_store;

pub use openai::OpenAIAgentGateway;
pub use vector_store::OpenAIVectorStoreGateway;

use crate::domain::error::{Dto, ErrorInfo};
use crate::domain::gateway::{AgentGateway, AgentQuery};
use crate::domain::message::Message;
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rate limit exceeded")]
    RateLimit,

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Provider error: {0}")]
    Provider(String),
}

/// Stands in for the agent when no provider is configured.
pub struct UnconfiguredAgentGateway;

#[async_trait]
impl AgentGateway for UnconfiguredAgentGateway {
    async fn query(&self, _query: &AgentQuery) -> Dto<Message> {
        Err(ErrorInfo::new(
            "agent-gateway#query",
            "No agent provider is configured (spec.agent)",
        ))
    }
}
