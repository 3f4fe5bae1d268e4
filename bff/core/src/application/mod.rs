// Copyright (c) 2026 RAGE Research Assistant
// SPDX-License-Identifier: AGPL-3.0
//! Application
//!
//! One module per use case, plus the response type and the generic presenter
//! they share.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Validate, call one gateway, present the outcome

pub mod presenter;
pub mod response;

pub mod agent_query;
pub mod case_study;
pub mod create_conversation;
pub mod create_research_context;
pub mod list_conversations;
pub mod list_messages;
pub mod list_research_contexts;
pub mod list_source_data;
pub mod send_message;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export use cases for convenience
pub use agent_query::{AgentQueryRequest, AgentQueryUseCase, StandardAgentQueryUseCase};
pub use case_study::{CaseStudyRequest, CaseStudyUseCase, StandardCaseStudyUseCase};
pub use create_conversation::{
    CreateConversationRequest, CreateConversationUseCase, StandardCreateConversationUseCase,
};
pub use create_research_context::{
    CreateResearchContextRequest, CreateResearchContextUseCase, StandardCreateResearchContextUseCase,
};
pub use list_conversations::{ListConversationsRequest, ListConversationsUseCase, StandardListConversationsUseCase};
pub use list_messages::{ListMessagesRequest, ListMessagesUseCase, StandardListMessagesUseCase};
pub use list_research_contexts::{
    ListResearchContextsRequest, ListResearchContextsUseCase, StandardListResearchContextsUseCase,
};
pub use list_source_data::{ListSourceDataRequest, ListSourceDataUseCase, StandardListSourceDataUseCase};
pub use presenter::Presenter;
pub use response::UseCaseResponse;
pub use send_message::{SendMessageRequest, SendMessageUseCase, StandardSendMessageUseCase};
