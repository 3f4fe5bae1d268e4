// Copyright (c) 2026 RAGE Research Assistant
// SPDX-License-Identifier: AGPL-3.0

//! Controllers
//!
//! One function per RPC procedure. [`settle`] resolves the caller's
//! credentials, runs the use case around a fresh presenter and signal, and
//! replies from the returned response once the published view model agrees.

use crate::application::agent_query::{AgentQueryPayload, AgentQueryRequest, StandardAgentQueryUseCase};
use crate::application::case_study::{CaseStudyPayload, CaseStudyRequest, StandardCaseStudyUseCase};
use crate::application::create_conversation::{
    CreateConversationPayload, CreateConversationRequest, StandardCreateConversationUseCase,
};
use crate::application::create_research_context::{
    CreateResearchContextPayload, CreateResearchContextRequest, StandardCreateResearchContextUseCase,
};
use crate::application::list_conversations::{
    ListConversationsPayload, ListConversationsRequest, StandardListConversationsUseCase,
};
use crate::application::list_messages::{ListMessagesPayload, ListMessagesRequest, StandardListMessagesUseCase};
use crate::application::list_research_contexts::{
    ListResearchContextsPayload, ListResearchContextsRequest, StandardListResearchContextsUseCase,
};
use crate::application::list_source_data::{
    ListSourceDataPayload, ListSourceDataRequest, StandardListSourceDataUseCase,
};
use crate::application::send_message::{SendMessagePayload, SendMessageRequest, StandardSendMessageUseCase};
use crate::application::response::UseCaseResponse;
use crate::application::{
    AgentQueryUseCase, CaseStudyUseCase, CreateConversationUseCase, CreateResearchContextUseCase,
    ListConversationsUseCase, ListMessagesUseCase, ListResearchContextsUseCase, ListSourceDataUseCase, Presenter,
    SendMessageUseCase,
};
use crate::domain::error::{Envelope, ErrorInfo};
use crate::domain::gateway::{Credentials, Session};
use crate::domain::signal::Signal;
use crate::domain::view_model::ViewModel;
use crate::infrastructure::composition::Services;
use std::future::Future;
use tracing::error;

pub const AUTH_FAILURE_MESSAGE: &str = "Failed to get KP credentials";

async fn credentials(services: &Services, session: &Session, operation: &str) -> Result<Credentials, ErrorInfo> {
    services
        .auth
        .extract_credentials(session)
        .await
        .map_err(|info| {
            error!(operation, "{}: {}", AUTH_FAILURE_MESSAGE, info.message);
            ErrorInfo::new(operation, AUTH_FAILURE_MESSAGE)
        })
}

/// Resolve credentials, then run the use case `execute` builds around a
/// presenter named `module`.
///
/// The returned response is the reply. The view model the presenter
/// published must carry the same status, otherwise the call fails under
/// `operation`.
async fn settle<T, F, Fut>(
    services: &Services,
    session: &Session,
    operation: &str,
    module: &'static str,
    execute: F,
) -> Result<UseCaseResponse<T>, ErrorInfo>
where
    T: Clone + Send + 'static,
    F: FnOnce(Credentials, Presenter<T>) -> Fut,
    Fut: Future<Output = UseCaseResponse<T>>,
{
    let credentials = credentials(services, session, operation).await?;

    let (signal, captured) = Signal::capture();
    let response = execute(credentials, Presenter::new(module, signal)).await;

    match captured.take() {
        Some(published) if published.status() == response.status() => Ok(response),
        Some(published) => {
            error!(
                operation,
                module,
                "Presenter published {} for a {} response",
                published.status(),
                response.status()
            );
            Err(ErrorInfo::new(
                operation,
                format!("Presenter published {} for a {} response", published.status(), response.status()),
            ))
        }
        None => Err(ErrorInfo::new(operation, "Use case published no view model")),
    }
}

/// Terminal reply; a progress response has no place in these procedures.
fn reply<T>(settled: Result<UseCaseResponse<T>, ErrorInfo>, operation: &str) -> Envelope<T> {
    match settled {
        Ok(response) => response.into_envelope_with(|_| {
            Envelope::Failure(ErrorInfo::new(operation, "Use case settled in the progress state"))
        }),
        Err(info) => Envelope::Failure(info),
    }
}

pub async fn list_research_contexts(services: &Services, session: &Session) -> Envelope<ListResearchContextsPayload> {
    const OPERATION: &str = "researchContextRouter#list";
    let settled = settle(
        services,
        session,
        OPERATION,
        "list-research-contexts-presenter",
        |credentials, presenter| async move {
            StandardListResearchContextsUseCase::new(services.gateways.research_contexts(&credentials), presenter)
                .execute(ListResearchContextsRequest {})
                .await
        },
    )
    .await;
    reply(settled, OPERATION)
}

pub async fn create_research_context(
    services: &Services,
    session: &Session,
    request: CreateResearchContextRequest,
) -> Envelope<CreateResearchContextPayload> {
    const OPERATION: &str = "researchContextRouter#create";
    let settled = settle(
        services,
        session,
        OPERATION,
        "create-research-context-presenter",
        |credentials, presenter| async move {
            StandardCreateResearchContextUseCase::new(services.gateways.research_contexts(&credentials), presenter)
                .execute(request)
                .await
        },
    )
    .await;
    reply(settled, OPERATION)
}

pub async fn list_conversations(
    services: &Services,
    session: &Session,
    request: ListConversationsRequest,
) -> Envelope<ListConversationsPayload> {
    const OPERATION: &str = "conversationRouter#list";
    let settled = settle(
        services,
        session,
        OPERATION,
        "list-conversations-presenter",
        |credentials, presenter| async move {
            StandardListConversationsUseCase::new(services.gateways.conversations(&credentials), presenter)
                .execute(request)
                .await
        },
    )
    .await;
    reply(settled, OPERATION)
}

pub async fn create_conversation(
    services: &Services,
    session: &Session,
    request: CreateConversationRequest,
) -> Envelope<CreateConversationPayload> {
    const OPERATION: &str = "conversationRouter#create";
    let settled = settle(
        services,
        session,
        OPERATION,
        "create-conversation-presenter",
        |credentials, presenter| async move {
            StandardCreateConversationUseCase::new(services.gateways.conversations(&credentials), presenter)
                .execute(request)
                .await
        },
    )
    .await;
    reply(settled, OPERATION)
}

pub async fn list_messages(
    services: &Services,
    session: &Session,
    request: ListMessagesRequest,
) -> Envelope<ListMessagesPayload> {
    const OPERATION: &str = "messageRouter#list";
    let settled = settle(
        services,
        session,
        OPERATION,
        "list-messages-for-conversation-presenter",
        |credentials, presenter| async move {
            StandardListMessagesUseCase::new(services.gateways.conversations(&credentials), presenter)
                .execute(request)
                .await
        },
    )
    .await;
    reply(settled, OPERATION)
}

pub async fn send_message(
    services: &Services,
    session: &Session,
    request: SendMessageRequest,
) -> Envelope<SendMessagePayload> {
    const OPERATION: &str = "messageRouter#send";
    let settled = settle(
        services,
        session,
        OPERATION,
        "send-message-presenter",
        |credentials, presenter| async move {
            StandardSendMessageUseCase::new(services.gateways.conversations(&credentials), presenter)
                .execute(request)
                .await
        },
    )
    .await;
    reply(settled, OPERATION)
}

pub async fn list_source_data(
    services: &Services,
    session: &Session,
    request: ListSourceDataRequest,
) -> Envelope<ListSourceDataPayload> {
    const OPERATION: &str = "sourceDataRouter#list";
    let settled = settle(
        services,
        session,
        OPERATION,
        "list-source-data-presenter",
        |credentials, presenter| async move {
            StandardListSourceDataUseCase::new(services.gateways.source_data(&credentials), presenter)
                .execute(request)
                .await
        },
    )
    .await;
    reply(settled, OPERATION)
}

/// Progress is not a failure here: both `progress` and `success` view
/// models come back as success envelopes.
pub async fn trigger_case_study(
    services: &Services,
    session: &Session,
    request: CaseStudyRequest,
) -> Envelope<ViewModel<CaseStudyPayload>> {
    const OPERATION: &str = "caseStudyRouter#trigger";
    let settled = settle(
        services,
        session,
        OPERATION,
        "case-study-presenter",
        |_credentials, presenter| async move {
            StandardCaseStudyUseCase::new(services.gateways.case_studies(), presenter)
                .execute(request)
                .await
        },
    )
    .await;

    match settled {
        Ok(response) => match ViewModel::from(&response) {
            ViewModel::Error(info) => Envelope::Failure(info),
            view_model => Envelope::Success(view_model),
        },
        Err(info) => Envelope::Failure(info),
    }
}

pub async fn query_agent(
    services: &Services,
    session: &Session,
    request: AgentQueryRequest,
) -> Envelope<AgentQueryPayload> {
    const OPERATION: &str = "agentRouter#query";
    let settled = settle(
        services,
        session,
        OPERATION,
        "agent-query-presenter",
        |_credentials, presenter| async move {
            StandardAgentQueryUseCase::new(services.gateways.agent(), presenter)
                .execute(request)
                .await
        },
    )
    .await;
    reply(settled, OPERATION)
}
