// Copyright (c) 2026 RAGE Research Assistant
// SPDX-License-Identifier: AGPL-3.0

//! List Research Contexts Use Case

use crate::application::presenter::Presenter;
use crate::application::response::{guarded, UseCaseResponse};
use crate::domain::gateway::ResearchContextGateway;
use crate::domain::research_context::ResearchContext;
use crate::domain::view_model::ViewModel;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Map;
use std::sync::Arc;
use tracing::debug;

pub const OPERATION: &str = "usecase#list-research-contexts";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListResearchContextsRequest {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResearchContextsPayload {
    pub research_contexts: Vec<ResearchContext>,
}

pub type ListResearchContextsResponse = UseCaseResponse<ListResearchContextsPayload>;
pub type ListResearchContextsViewModel = ViewModel<ListResearchContextsPayload>;

#[async_trait]
pub trait ListResearchContextsUseCase: Send + Sync {
    async fn execute(&self, request: ListResearchContextsRequest) -> ListResearchContextsResponse;
}

pub struct StandardListResearchContextsUseCase {
    research_context_gateway: Arc<dyn ResearchContextGateway>,
    presenter: Presenter<ListResearchContextsPayload>,
}

impl StandardListResearchContextsUseCase {
    pub fn new(
        research_context_gateway: Arc<dyn ResearchContextGateway>,
        presenter: Presenter<ListResearchContextsPayload>,
    ) -> Self {
        Self {
            research_context_gateway,
            presenter,
        }
    }

    async fn run(&self) -> ListResearchContextsResponse {
        match self.research_context_gateway.list().await {
            Ok(research_contexts) => {
                debug!("Listed {} research contexts", research_contexts.len());
                UseCaseResponse::Success(ListResearchContextsPayload { research_contexts })
            }
            Err(error) => UseCaseResponse::error(OPERATION, error.message, &Map::new()),
        }
    }
}

#[async_trait]
impl ListResearchContextsUseCase for StandardListResearchContextsUseCase {
    async fn execute(&self, _request: ListResearchContextsRequest) -> ListResearchContextsResponse {
        let response = guarded(OPERATION, &Map::new(), self.run()).await;
        self.presenter.present(&response);
        response
    }
}
