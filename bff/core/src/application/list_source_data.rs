// Copyright (c) 2026 RAGE Research Assistant
// SPDX-License-Identifier: AGPL-3.0

//! List Source Data Use Case
//!
//! Lists the source data a caller can attach to research contexts, either
//! across the whole client or scoped to one research context.
//!
//! # Flow
//!
//! 1. No required fields: an absent `researchContextID` selects the
//!    client-wide listing
//! 2. Call `SourceDataGateway::list` or `list_for_research_context`
//! 3. Keep only remote files (local files cannot be attached to a context)
//! 4. Present and return the response
//!
//! # Error Handling
//!
//! Gateway failures are re-tagged `usecase#list-source-data` with the
//! request's `researchContextID` as context.

use crate::application::presenter::Presenter;
use crate::application::response::{guarded, request_context, UseCaseResponse};
use crate::domain::file::{remote_only, SourceDataFile};
use crate::domain::gateway::SourceDataGateway;
use crate::domain::research_context::ResearchContextId;
use crate::domain::view_model::ViewModel;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::debug;

pub const OPERATION: &str = "usecase#list-source-data";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListSourceDataRequest {
    #[serde(rename = "researchContextID", default, skip_serializing_if = "Option::is_none")]
    pub research_context_id: Option<ResearchContextId>,
}

/// Only `type: "remote"` entries ever appear in `source_data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSourceDataPayload {
    pub source_data: Vec<SourceDataFile>,
}

pub type ListSourceDataResponse = UseCaseResponse<ListSourceDataPayload>;
pub type ListSourceDataViewModel = ViewModel<ListSourceDataPayload>;

#[async_trait]
pub trait ListSourceDataUseCase: Send + Sync {
    async fn execute(&self, request: ListSourceDataRequest) -> ListSourceDataResponse;
}

pub struct StandardListSourceDataUseCase {
    source_data_gateway: Arc<dyn SourceDataGateway>,
    presenter: Presenter<ListSourceDataPayload>,
}

impl StandardListSourceDataUseCase {
    pub fn new(
        source_data_gateway: Arc<dyn SourceDataGateway>,
        presenter: Presenter<ListSourceDataPayload>,
    ) -> Self {
        Self {
            source_data_gateway,
            presenter,
        }
    }

    async fn run(&self, request: &ListSourceDataRequest, context: &Map<String, Value>) -> ListSourceDataResponse {
        let dto = match request.research_context_id {
            None => self.source_data_gateway.list().await,
            Some(id) => self.source_data_gateway.list_for_research_context(id).await,
        };

        match dto {
            Ok(files) => {
                let total = files.len();
                let source_data: Vec<SourceDataFile> =
                    remote_only(files).into_iter().map(SourceDataFile::Remote).collect();
                debug!(
                    "Listed {} source data files ({} remote)",
                    total,
                    source_data.len()
                );
                UseCaseResponse::Success(ListSourceDataPayload { source_data })
            }
            Err(error) => UseCaseResponse::error(OPERATION, error.message, context),
        }
    }
}

#[async_trait]
impl ListSourceDataUseCase for StandardListSourceDataUseCase {
    async fn execute(&self, request: ListSourceDataRequest) -> ListSourceDataResponse {
        let context = request_context(json!({ "researchContextID": request.research_context_id }));
        let response = guarded(OPERATION, &context, self.run(&request, &context)).await;
        self.presenter.present(&response);
        response
    }
}
