// Copyright (c) 2026 RAGE Research Assistant
// SPDX-License-Identifier: AGPL-3.0

use crate::domain::error::Dto;
use crate::domain::file::SourceDataFile;
use crate::domain::gateway::{Credentials, SourceDataGateway};
use crate::domain::research_context::ResearchContextId;
use crate::infrastructure::kernel::client::KernelClient;
use crate::infrastructure::kernel::gateway_error;
use crate::infrastructure::kernel::models::ListSourceDataReply;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

const LIST: &str = "kernel-source-data-gateway#list";
const LIST_FOR_RESEARCH_CONTEXT: &str = "kernel-source-data-gateway#list-for-research-context";

pub struct KernelSourceDataGateway {
    client: Arc<KernelClient>,
    credentials: Credentials,
}

impl KernelSourceDataGateway {
    pub fn new(client: Arc<KernelClient>, credentials: Credentials) -> Self {
        Self { client, credentials }
    }
}

#[async_trait]
impl SourceDataGateway for KernelSourceDataGateway {
    async fn list(&self) -> Dto<Vec<SourceDataFile>> {
        let path = format!("/client/{}/source", self.client.client_id());
        let reply: ListSourceDataReply = self
            .client
            .get(&self.credentials.x_auth_token, &path, &[])
            .await
            .map_err(|e| gateway_error(LIST, e).with_context("clientID", self.client.client_id()))?;

        debug!("Kernel listed {} source data files", reply.source_data_list.len());
        Ok(reply.source_data_list.into_iter().map(SourceDataFile::from).collect())
    }

    async fn list_for_research_context(&self, research_context_id: ResearchContextId) -> Dto<Vec<SourceDataFile>> {
        let path = format!("/research_context/{}/source", research_context_id);
        let reply: ListSourceDataReply = self
            .client
            .get(&self.credentials.x_auth_token, &path, &[])
            .await
            .map_err(|e| {
                gateway_error(LIST_FOR_RESEARCH_CONTEXT, e).with_context("researchContextID", research_context_id.0)
            })?;

        Ok(reply.source_data_list.into_iter().map(SourceDataFile::from).collect())
    }
}
