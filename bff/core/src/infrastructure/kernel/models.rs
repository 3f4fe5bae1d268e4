// Copyright (c) 2026 RAGE Research Assistant
// SPDX-License-Identifier: AGPL-3.0

//! Kernel wire models and their translation into domain entities.

use crate::domain::conversation::{Conversation, ConversationId};
use crate::domain::file::{LocalSourceData, RemoteSourceData, SourceDataFile};
use crate::domain::message::{Message, MessageId, MessageRole};
use crate::domain::research_context::{ResearchContext, ResearchContextId};
use crate::infrastructure::kernel::client::KernelError;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kernel `protocol` value for files that never left the uploader's machine.
pub const LOCAL_PROTOCOL: &str = "local";

#[derive(Debug, Deserialize)]
pub struct KernelResearchContext {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl From<KernelResearchContext> for ResearchContext {
    fn from(rc: KernelResearchContext) -> Self {
        ResearchContext {
            id: ResearchContextId(rc.id),
            title: rc.title,
            description: rc.description,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListResearchContextsReply {
    #[serde(default)]
    pub research_context_list: Vec<KernelResearchContext>,
}

#[derive(Debug, Deserialize)]
pub struct NewResearchContextReply {
    pub research_context_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct KernelConversation {
    pub id: i64,
    pub title: String,
}

impl From<KernelConversation> for Conversation {
    fn from(c: KernelConversation) -> Self {
        Conversation {
            id: ConversationId(c.id),
            title: c.title,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListConversationsReply {
    #[serde(default)]
    pub conversations: Vec<KernelConversation>,
}

#[derive(Debug, Deserialize)]
pub struct NewConversationReply {
    pub conversation_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct KernelMessage {
    pub id: i64,
    pub content: String,
    pub timestamp: String,
    pub sender_type: String,
}

impl TryFrom<KernelMessage> for Message {
    type Error = KernelError;

    fn try_from(m: KernelMessage) -> Result<Self, Self::Error> {
        Ok(Message {
            id: MessageId(m.id),
            role: sender_role(&m.sender_type)?,
            content: m.content,
            timestamp: parse_timestamp(&m.timestamp)?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ListMessagesReply {
    #[serde(default)]
    pub message_list: Vec<KernelMessage>,
}

#[derive(Debug, Serialize)]
pub struct SendMessageBody<'a> {
    pub message_content: &'a str,
    pub sender_type: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageReply {
    pub message_id: i64,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct KernelSourceData {
    pub id: i64,
    pub name: String,
    pub relative_path: String,
    pub protocol: String,
    pub created_at: String,
}

impl From<KernelSourceData> for SourceDataFile {
    fn from(sd: KernelSourceData) -> Self {
        if sd.protocol == LOCAL_PROTOCOL {
            SourceDataFile::Local(LocalSourceData {
                id: sd.id.to_string(),
                name: sd.name,
                relative_path: sd.relative_path,
                created_at: sd.created_at,
            })
        } else {
            SourceDataFile::Remote(RemoteSourceData {
                id: sd.id.to_string(),
                name: sd.name,
                relative_path: sd.relative_path,
                provider: sd.protocol,
                created_at: sd.created_at,
            })
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListSourceDataReply {
    #[serde(default)]
    pub source_data_list: Vec<KernelSourceData>,
}

fn sender_role(sender_type: &str) -> Result<MessageRole, KernelError> {
    match sender_type {
        "user" => Ok(MessageRole::User),
        "llm" | "agent" => Ok(MessageRole::Llm),
        other => Err(KernelError::Decode(format!("Unknown sender type '{other}'"))),
    }
}

/// The Kernel emits both RFC 3339 timestamps and naive UTC ones.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, KernelError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| KernelError::Decode(format!("Invalid timestamp '{value}': {e}")))
}
