// Copyright (c) 2026 RAGE Research Assistant
// SPDX-License-Identifier: AGPL-3.0

use crate::domain::error::Dto;
use crate::domain::gateway::{Credentials, ResearchContextGateway};
use crate::domain::research_context::{NewResearchContext, ResearchContext, ResearchContextId};
use crate::infrastructure::kernel::client::KernelClient;
use crate::infrastructure::kernel::gateway_error;
use crate::infrastructure::kernel::models::{ListResearchContextsReply, NewResearchContextReply};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

const LIST: &str = "kernel-research-context-gateway#list";
const CREATE: &str = "kernel-research-context-gateway#create";

pub struct KernelResearchContextGateway {
    client: Arc<KernelClient>,
    credentials: Credentials,
}

impl KernelResearchContextGateway {
    pub fn new(client: Arc<KernelClient>, credentials: Credentials) -> Self {
        Self { client, credentials }
    }

    fn path(&self) -> String {
        format!("/client/{}/research_context", self.client.client_id())
    }
}

#[async_trait]
impl ResearchContextGateway for KernelResearchContextGateway {
    async fn list(&self) -> Dto<Vec<ResearchContext>> {
        let reply: ListResearchContextsReply = self
            .client
            .get(&self.credentials.x_auth_token, &self.path(), &[])
            .await
            .map_err(|e| gateway_error(LIST, e).with_context("clientID", self.client.client_id()))?;

        Ok(reply
            .research_context_list
            .into_iter()
            .map(ResearchContext::from)
            .collect())
    }

    async fn create(&self, research_context: &NewResearchContext) -> Dto<ResearchContext> {
        let source_paths: Vec<&str> = research_context
            .sources
            .iter()
            .map(|source| source.relative_path.as_str())
            .collect();

        let reply: NewResearchContextReply = self
            .client
            .post(
                &self.credentials.x_auth_token,
                &self.path(),
                &[
                    ("research_context_title", research_context.title.clone()),
                    ("research_context_description", research_context.description.clone()),
                ],
                Some(&source_paths),
            )
            .await
            .map_err(|e| gateway_error(CREATE, e).with_context("title", research_context.title.clone()))?;

        info!(
            "Kernel created research context {} from {} sources",
            reply.research_context_id,
            source_paths.len()
        );
        Ok(ResearchContext {
            id: ResearchContextId(reply.research_context_id),
            title: research_context.title.clone(),
            description: research_context.description.clone(),
        })
    }
}
