// Copyright (c) 2026 RAGE Research Assistant
// SPDX-License-Identifier: AGPL-3.0

//! Commands that call a running RPC server through the SDK.

use anyhow::{anyhow, Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use rage_core::domain::config::ServiceConfigManifest;
use rage_core::domain::conversation::ConversationId;
use rage_core::domain::error::{Dto, ErrorInfo};
use rage_core::domain::file::SourceDataFile;
use rage_core::domain::message::NewMessage;
use rage_core::domain::research_context::ResearchContextId;
use rage_sdk::{RageClient, RetryPolicy};

#[derive(Args)]
pub struct Connection {
    /// Server base URL (default: derived from configuration)
    #[arg(long, env = "RAGE_URL")]
    url: Option<String>,

    /// Session token sent as X-Auth-Token
    #[arg(long, env = "RAGE_AUTH_TOKEN")]
    token: Option<String>,
}

#[derive(Subcommand)]
pub enum RpcCommand {
    /// List research contexts
    ResearchContexts {
        #[command(flatten)]
        connection: Connection,
    },

    /// List remote source data
    SourceData {
        #[command(flatten)]
        connection: Connection,

        /// Only files attached to this research context
        #[arg(long, value_name = "ID")]
        research_context: Option<i64>,
    },

    /// List conversations of a research context
    Conversations {
        #[command(flatten)]
        connection: Connection,

        #[arg(value_name = "RESEARCH_CONTEXT_ID")]
        id: i64,
    },

    /// List messages of a conversation
    Messages {
        #[command(flatten)]
        connection: Connection,

        #[arg(value_name = "CONVERSATION_ID")]
        id: i64,
    },

    /// Send a user message to a conversation
    Send {
        #[command(flatten)]
        connection: Connection,

        #[arg(value_name = "CONVERSATION_ID")]
        id: i64,

        #[arg(value_name = "TEXT")]
        content: String,
    },
}

pub async fn handle_command(command: RpcCommand, config_path: Option<PathBuf>) -> Result<()> {
    let config = ServiceConfigManifest::load_or_default(config_path).context("Failed to load configuration")?;

    match command {
        RpcCommand::ResearchContexts { connection } => {
            let payload = settled(client(&config, connection).list_research_contexts().await)?;
            if payload.research_contexts.is_empty() {
                println!("{}", "No research contexts found".yellow());
                return Ok(());
            }
            println!("{:<8} {:<30} {}", "ID", "TITLE", "DESCRIPTION");
            for context in payload.research_contexts {
                println!("{:<8} {:<30} {}", context.id.0, context.title.bold(), context.description);
            }
        }
        RpcCommand::SourceData {
            connection,
            research_context,
        } => {
            let payload = settled(
                client(&config, connection)
                    .list_source_data(research_context.map(ResearchContextId))
                    .await,
            )?;
            if payload.source_data.is_empty() {
                println!("{}", "No source data found".yellow());
                return Ok(());
            }
            println!("{:<8} {:<30} {:<10} {}", "ID", "NAME", "PROVIDER", "PATH");
            for file in payload.source_data {
                if let SourceDataFile::Remote(remote) = file {
                    println!(
                        "{:<8} {:<30} {:<10} {}",
                        remote.id,
                        remote.name.bold(),
                        remote.provider,
                        remote.relative_path
                    );
                }
            }
        }
        RpcCommand::Conversations { connection, id } => {
            let payload = settled(
                client(&config, connection)
                    .list_conversations(ResearchContextId(id))
                    .await,
            )?;
            if payload.conversations.is_empty() {
                println!("{}", "No conversations found".yellow());
                return Ok(());
            }
            println!("{:<8} {}", "ID", "TITLE");
            for conversation in payload.conversations {
                println!("{:<8} {}", conversation.id.0, conversation.title.bold());
            }
        }
        RpcCommand::Messages { connection, id } => {
            let payload = settled(client(&config, connection).list_messages(ConversationId(id)).await)?;
            for message in payload.messages {
                println!(
                    "[{}] {}: {}",
                    message.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    message.role.as_str().bold(),
                    message.content
                );
            }
        }
        RpcCommand::Send {
            connection,
            id,
            content,
        } => {
            let payload = settled(
                client(&config, connection)
                    .send_message(ConversationId(id), NewMessage::user(content))
                    .await,
            )?;
            println!(
                "{}",
                format!(
                    "✓ Message {} stored in conversation {}",
                    payload.message.id, payload.conversation_id
                )
                .green()
            );
        }
    }

    Ok(())
}

fn client(config: &ServiceConfigManifest, connection: Connection) -> RageClient {
    let url = connection.url.unwrap_or_else(|| {
        format!(
            "http://{}:{}",
            config.spec.server.bind_address, config.spec.server.port
        )
    });

    let client = RageClient::new(url).with_retry_policy(RetryPolicy::from(&config.spec.client));
    match connection.token {
        Some(token) => client.with_auth_token(token),
        None => client,
    }
}

fn settled<T>(dto: Dto<T>) -> Result<T> {
    dto.map_err(|error: ErrorInfo| anyhow!("{} failed: {}", error.operation, error.message))
}
