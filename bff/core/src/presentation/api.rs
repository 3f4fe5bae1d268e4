// Copyright (c) 2026 RAGE Research Assistant
// SPDX-License-Identifier: AGPL-3.0

//! RPC Router
//!
//! Every procedure answers HTTP 200 with a `{success, data}` envelope. The
//! caller's session token travels in the `X-Auth-Token` header. Bodies or
//! query strings that fail to parse are answered with an error envelope
//! tagged `rpc#<procedure>`.

use crate::application::{
    AgentQueryRequest, CaseStudyRequest, CreateConversationRequest, CreateResearchContextRequest,
    ListConversationsRequest, ListMessagesRequest, ListSourceDataRequest, SendMessageRequest,
};
use crate::domain::conversation::ConversationId;
use crate::domain::error::{Envelope, ErrorInfo};
use crate::domain::gateway::Session;
use crate::domain::research_context::ResearchContextId;
use crate::infrastructure::composition::Services;
use crate::infrastructure::kernel::client::AUTH_HEADER;
use crate::presentation::controllers;
use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

pub struct ApiState {
    pub services: Services,
    pub start_time: Instant,
}

pub fn app(services: Services) -> Router {
    let state = Arc::new(ApiState {
        services,
        start_time: Instant::now(),
    });

    Router::new()
        .route("/health", get(health_handler))
        .route("/rpc/researchContexts.list", get(list_research_contexts_handler))
        .route("/rpc/researchContexts.create", post(create_research_context_handler))
        .route("/rpc/conversations.list", get(list_conversations_handler))
        .route("/rpc/conversations.create", post(create_conversation_handler))
        .route("/rpc/messages.list", get(list_messages_handler))
        .route("/rpc/messages.send", post(send_message_handler))
        .route("/rpc/sourceData.list", get(list_source_data_handler))
        .route("/rpc/caseStudy.trigger", post(trigger_case_study_handler))
        .route("/rpc/agent.query", post(query_agent_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn session(headers: &HeaderMap) -> Session {
    headers
        .get(AUTH_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(Session::with_token)
        .unwrap_or_else(Session::anonymous)
}

fn envelope<T: Serialize>(envelope: Envelope<T>) -> Response {
    Json(envelope).into_response()
}

fn malformed(procedure: &str, message: String) -> Response {
    warn!(procedure, "Rejected malformed input: {}", message);
    envelope(Envelope::<()>::Failure(ErrorInfo::new(format!("rpc#{procedure}"), message)))
}

#[derive(Debug, Deserialize)]
pub struct IdInput {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateConversationInput {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SourceDataInput {
    #[serde(rename = "researchContextID", default)]
    pub research_context_id: Option<i64>,
}

async fn health_handler(State(state): State<Arc<ApiState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "uptime_seconds": state.start_time.elapsed().as_secs(),
    }))
}

async fn list_research_contexts_handler(State(state): State<Arc<ApiState>>, headers: HeaderMap) -> Response {
    envelope(controllers::list_research_contexts(&state.services, &session(&headers)).await)
}

async fn create_research_context_handler(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    input: Result<Json<CreateResearchContextRequest>, JsonRejection>,
) -> Response {
    match input {
        Ok(Json(request)) => {
            envelope(controllers::create_research_context(&state.services, &session(&headers), request).await)
        }
        Err(rejection) => malformed("researchContexts.create", rejection.body_text()),
    }
}

async fn list_conversations_handler(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    input: Result<Query<IdInput>, QueryRejection>,
) -> Response {
    match input {
        Ok(Query(input)) => {
            let request = ListConversationsRequest {
                research_context_id: Some(ResearchContextId(input.id)),
            };
            envelope(controllers::list_conversations(&state.services, &session(&headers), request).await)
        }
        Err(rejection) => malformed("conversations.list", rejection.body_text()),
    }
}

async fn create_conversation_handler(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    input: Result<Json<CreateConversationInput>, JsonRejection>,
) -> Response {
    match input {
        Ok(Json(input)) => {
            let request = CreateConversationRequest {
                research_context_id: Some(ResearchContextId(input.id)),
                title: input.title,
            };
            envelope(controllers::create_conversation(&state.services, &session(&headers), request).await)
        }
        Err(rejection) => malformed("conversations.create", rejection.body_text()),
    }
}

async fn list_messages_handler(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    input: Result<Query<IdInput>, QueryRejection>,
) -> Response {
    match input {
        Ok(Query(input)) => {
            let request = ListMessagesRequest {
                conversation_id: Some(ConversationId(input.id)),
            };
            envelope(controllers::list_messages(&state.services, &session(&headers), request).await)
        }
        Err(rejection) => malformed("messages.list", rejection.body_text()),
    }
}

async fn send_message_handler(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    input: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Response {
    match input {
        Ok(Json(request)) => envelope(controllers::send_message(&state.services, &session(&headers), request).await),
        Err(rejection) => malformed("messages.send", rejection.body_text()),
    }
}

async fn list_source_data_handler(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    input: Result<Query<SourceDataInput>, QueryRejection>,
) -> Response {
    match input {
        Ok(Query(input)) => {
            let request = ListSourceDataRequest {
                research_context_id: input.research_context_id.map(ResearchContextId),
            };
            envelope(controllers::list_source_data(&state.services, &session(&headers), request).await)
        }
        Err(rejection) => malformed("sourceData.list", rejection.body_text()),
    }
}

async fn trigger_case_study_handler(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    input: Result<Json<CaseStudyRequest>, JsonRejection>,
) -> Response {
    match input {
        Ok(Json(request)) => {
            envelope(controllers::trigger_case_study(&state.services, &session(&headers), request).await)
        }
        Err(rejection) => malformed("caseStudy.trigger", rejection.body_text()),
    }
}

async fn query_agent_handler(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    input: Result<Json<AgentQueryRequest>, JsonRejection>,
) -> Response {
    match input {
        Ok(Json(request)) => envelope(controllers::query_agent(&state.services, &session(&headers), request).await),
        Err(rejection) => malformed("agent.query", rejection.body_text()),
    }
}
