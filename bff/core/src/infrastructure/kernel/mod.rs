// Copyright (c) 2026 RAGE Research Assistant
// SPDX-License-Identifier: AGPL-3.0
//! Kernel
//!
//! Gateways to the Kernel, the service that owns research contexts,
//! conversations, messages and source data. All three share one
//! [`KernelClient`] and are bound to the caller's credentials.

pub mod client;
pub mod conversation_gateway;
pub mod models;
pub mod research_context_gateway;
pub mod source_data_gateway;

pub use client::{KernelClient, KernelError};
pub use conversation_gateway::KernelConversationGateway;
pub use research_context_gateway::KernelResearchContextGateway;
pub use source_data_gateway::KernelSourceDataGateway;

use crate::domain::error::ErrorInfo;
use tracing::warn;

pub(crate) fn gateway_error(operation: &str, error: KernelError) -> ErrorInfo {
    warn!(operation, "Kernel call failed: {}", error);
    ErrorInfo::new(operation, error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::KernelConfig;
    use crate::domain::conversation::ConversationId;
    use crate::domain::gateway::{ConversationGateway, Credentials, ResearchContextGateway, SourceDataGateway};
    use crate::domain::message::{MessageRole, NewMessage};
    use crate::domain::research_context::ResearchContextId;
    use mockito::Matcher;
    use serde_json::json;
    use std::sync::Arc;

    fn client(server: &mockito::Server) -> Arc<KernelClient> {
        let config = KernelConfig {
            endpoint: server.url(),
            client_id: 7,
            ..KernelConfig::default()
        };
        Arc::new(KernelClient::new(&config).unwrap())
    }

    fn credentials() -> Credentials {
        Credentials {
            x_auth_token: "token-123".into(),
        }
    }

    #[tokio::test]
    async fn lists_conversations_with_auth_header() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/research_context/3/conversation")
            .match_header("x-auth-token", "token-123")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "status": true,
                    "code": 200,
                    "research_context_id": 3,
                    "conversations": [{"id": 11, "title": "Untitled"}]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let gateway = KernelConversationGateway::new(client(&server), credentials());
        let conversations = gateway.list_conversations(ResearchContextId(3)).await.unwrap();

        mock.assert_async().await;
        assert_eq!(conversations.len(), 1);
        assert_eq!(conversations[0].id, ConversationId(11));
    }

    #[tokio::test]
    async fn rejected_reply_surfaces_kernel_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/research_context/3/conversation")
            .match_query(Matcher::UrlEncoded("conversation_title".into(), "Untitled".into()))
            .with_status(200)
            .with_body(
                json!({
                    "status": false,
                    "code": 404,
                    "errorMessage": "Research context 3 not found"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let gateway = KernelConversationGateway::new(client(&server), credentials());
        let error = gateway
            .create_conversation(ResearchContextId(3), "Untitled")
            .await
            .unwrap_err();

        assert_eq!(error.operation, "kernel-conversation-gateway#create-conversation");
        assert_eq!(error.message, "Research context 3 not found");
        assert_eq!(error.context.unwrap()["researchContextID"], 3);
    }

    #[tokio::test]
    async fn http_failure_is_an_error_not_a_panic() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/conversation/5/message")
            .with_status(502)
            .with_body("bad gateway")
            .create_async()
            .await;

        let gateway = KernelConversationGateway::new(client(&server), credentials());
        let error = gateway.list_messages(ConversationId(5)).await.unwrap_err();

        assert_eq!(error.operation, "kernel-conversation-gateway#list-messages");
        assert!(error.message.contains("502"));
    }

    #[tokio::test]
    async fn sends_message_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/conversation/5/message")
            .match_body(Matcher::Json(json!({
                "message_content": "What changed?",
                "sender_type": "user"
            })))
            .with_status(200)
            .with_body(
                json!({
                    "status": true,
                    "code": 200,
                    "message_id": 42,
                    "timestamp": "2024-05-01T12:30:00"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let gateway = KernelConversationGateway::new(client(&server), credentials());
        let message = gateway
            .send_message(ConversationId(5), &NewMessage::user("What changed?"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(message.id.0, 42);
        assert_eq!(message.role, MessageRole::User);
    }

    #[tokio::test]
    async fn source_listing_uses_configured_client_id() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/client/7/source")
            .with_status(200)
            .with_body(
                json!({
                    "status": true,
                    "code": 200,
                    "source_data_list": [
                        {"id": 1, "name": "a.csv", "relative_path": "a.csv", "protocol": "local", "created_at": "2024-05-01"},
                        {"id": 2, "name": "b.csv", "relative_path": "b.csv", "protocol": "s3", "created_at": "2024-05-01"}
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let gateway = KernelSourceDataGateway::new(client(&server), credentials());
        let files = gateway.list().await.unwrap();

        assert_eq!(files.len(), 2);
        assert_eq!(files[1].id(), "2");
    }

    #[tokio::test]
    async fn creates_research_context_from_source_paths() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/client/7/research_context")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("research_context_title".into(), "NO2".into()),
                Matcher::UrlEncoded("research_context_description".into(), "Emissions".into()),
            ]))
            .match_body(Matcher::Json(json!(["data/b.csv"])))
            .with_status(200)
            .with_body(json!({"status": true, "code": 200, "research_context_id": 9}).to_string())
            .create_async()
            .await;

        let gateway = KernelResearchContextGateway::new(client(&server), credentials());
        let created = gateway
            .create(&crate::domain::research_context::NewResearchContext {
                title: "NO2".into(),
                description: "Emissions".into(),
                sources: vec![crate::domain::file::RemoteSourceData {
                    id: "2".into(),
                    name: "b.csv".into(),
                    relative_path: "data/b.csv".into(),
                    provider: "s3".into(),
                    created_at: "2024-05-01".into(),
                }],
            })
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(created.id, ResearchContextId(9));
        assert_eq!(created.title, "NO2");
    }
}
