// Copyright (c) 2026 RAGE Research Assistant
// SPDX-License-Identifier: AGPL-3.0

//! Create Research Context Use Case
//!
//! Creates a research context from a title, a description and a non-empty
//! selection of remote source files. Title and sources are required; the
//! description may be empty.

use crate::application::presenter::Presenter;
use crate::application::response::{guarded, request_context, UseCaseResponse};
use crate::domain::file::RemoteSourceData;
use crate::domain::gateway::ResearchContextGateway;
use crate::domain::research_context::{NewResearchContext, ResearchContext};
use crate::domain::view_model::ViewModel;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::info;

pub const OPERATION: &str = "usecase#create-research-context";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateResearchContextRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sources: Vec<RemoteSourceData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateResearchContextPayload {
    pub research_context: ResearchContext,
}

pub type CreateResearchContextResponse = UseCaseResponse<CreateResearchContextPayload>;
pub type CreateResearchContextViewModel = ViewModel<CreateResearchContextPayload>;

#[async_trait]
pub trait CreateResearchContextUseCase: Send + Sync {
    async fn execute(&self, request: CreateResearchContextRequest) -> CreateResearchContextResponse;
}

pub struct StandardCreateResearchContextUseCase {
    research_context_gateway: Arc<dyn ResearchContextGateway>,
    presenter: Presenter<CreateResearchContextPayload>,
}

impl StandardCreateResearchContextUseCase {
    pub fn new(
        research_context_gateway: Arc<dyn ResearchContextGateway>,
        presenter: Presenter<CreateResearchContextPayload>,
    ) -> Self {
        Self {
            research_context_gateway,
            presenter,
        }
    }

    async fn run(
        &self,
        request: CreateResearchContextRequest,
        context: &Map<String, Value>,
    ) -> CreateResearchContextResponse {
        let title = match request.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => return UseCaseResponse::error(OPERATION, "A research context title is required", context),
        };

        if request.sources.is_empty() {
            return UseCaseResponse::error(
                OPERATION,
                "At least one source data file must be selected",
                context,
            );
        }

        let new_context = NewResearchContext {
            title,
            description: request.description.unwrap_or_default(),
            sources: request.sources,
        };

        match self.research_context_gateway.create(&new_context).await {
            Ok(research_context) => {
                info!(
                    "Created research context {} ({}) with {} sources",
                    research_context.id,
                    research_context.title,
                    new_context.sources.len()
                );
                UseCaseResponse::Success(CreateResearchContextPayload { research_context })
            }
            Err(error) => UseCaseResponse::error(OPERATION, error.message, context),
        }
    }
}

#[async_trait]
impl CreateResearchContextUseCase for StandardCreateResearchContextUseCase {
    async fn execute(&self, request: CreateResearchContextRequest) -> CreateResearchContextResponse {
        let context = request_context(json!({
            "title": request.title,
            "sourceCount": request.sources.len(),
        }));
        let response = guarded(OPERATION, &context, self.run(request, &context)).await;
        self.presenter.present(&response);
        response
    }
}
