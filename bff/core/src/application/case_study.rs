// Copyright (c) 2026 RAGE Research Assistant
// SPDX-License-Identifier: AGPL-3.0

//! Trigger Case Study Use Case
//!
//! Asks the case-study service for the state of one run. A run that is still
//! being processed yields a `Progress` response carrying the service's status
//! message; a finished run yields its keyframes.
//!
//! # Flow
//!
//! 1. Validate name, tracer id and job id (`CaseStudyRun::new`)
//! 2. `CaseStudyRepository::fetch`
//! 3. `Running` → `Progress`, `Completed` → `Success`

use crate::application::presenter::Presenter;
use crate::application::response::{guarded, request_context, UseCaseResponse};
use crate::domain::case_study::{
    CaseStudyName, CaseStudyOutcome, CaseStudyParameterError, CaseStudyRun, Keyframe,
};
use crate::domain::gateway::CaseStudyRepository;
use crate::domain::view_model::ViewModel;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::{debug, info};

pub const OPERATION: &str = "usecase#case-study";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseStudyRequest {
    #[serde(default)]
    pub case_study_name: Option<String>,
    #[serde(rename = "tracerID", default)]
    pub tracer_id: Option<String>,
    #[serde(rename = "jobID", default)]
    pub job_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseStudyPayload {
    pub case_study_name: CaseStudyName,
    #[serde(rename = "tracerID")]
    pub tracer_id: String,
    #[serde(rename = "jobID")]
    pub job_id: i64,
    pub keyframes: Vec<Keyframe>,
}

pub type CaseStudyResponse = UseCaseResponse<CaseStudyPayload>;
pub type CaseStudyViewModel = ViewModel<CaseStudyPayload>;

#[async_trait]
pub trait CaseStudyUseCase: Send + Sync {
    async fn execute(&self, request: CaseStudyRequest) -> CaseStudyResponse;
}

pub struct StandardCaseStudyUseCase {
    case_study_repository: Arc<dyn CaseStudyRepository>,
    presenter: Presenter<CaseStudyPayload>,
}

impl StandardCaseStudyUseCase {
    pub fn new(case_study_repository: Arc<dyn CaseStudyRepository>, presenter: Presenter<CaseStudyPayload>) -> Self {
        Self {
            case_study_repository,
            presenter,
        }
    }

    async fn run(&self, request: CaseStudyRequest, context: &Map<String, Value>) -> CaseStudyResponse {
        let Some(job_id) = request.job_id else {
            return UseCaseResponse::error(OPERATION, CaseStudyParameterError::MissingTracerId.to_string(), context);
        };

        let run = match CaseStudyRun::new(
            request.case_study_name.as_deref(),
            request.tracer_id.as_deref().unwrap_or_default(),
            job_id,
        ) {
            Ok(run) => run,
            Err(e) => return UseCaseResponse::error(OPERATION, e.to_string(), context),
        };

        match self.case_study_repository.fetch(&run).await {
            Ok(CaseStudyOutcome::Running { message }) => {
                debug!("Case study {} job {} still running: {}", run.case_study_name, run.job_id, message);
                UseCaseResponse::Progress { message }
            }
            Ok(CaseStudyOutcome::Completed { keyframes }) => {
                info!(
                    "Case study {} job {} completed with {} keyframes",
                    run.case_study_name,
                    run.job_id,
                    keyframes.len()
                );
                UseCaseResponse::Success(CaseStudyPayload {
                    case_study_name: run.case_study_name,
                    tracer_id: run.tracer_id,
                    job_id: run.job_id,
                    keyframes,
                })
            }
            Err(error) => UseCaseResponse::error(OPERATION, error.message, context),
        }
    }
}

#[async_trait]
impl CaseStudyUseCase for StandardCaseStudyUseCase {
    async fn execute(&self, request: CaseStudyRequest) -> CaseStudyResponse {
        let context = request_context(json!({
            "caseStudyName": request.case_study_name,
            "tracerID": request.tracer_id,
            "jobID": request.job_id,
        }));
        let response = guarded(OPERATION, &context, self.run(request, &context)).await;
        self.presenter.present(&response);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::MockGateways;
    use crate::domain::signal::Signal;

    fn request() -> CaseStudyRequest {
        CaseStudyRequest {
            case_study_name: Some("sentinel-5p".into()),
            tracer_id: Some("tracer-1".into()),
            job_id: Some(12),
        }
    }

    #[tokio::test]
    async fn running_job_presents_progress() {
        let gateway = Arc::new(MockGateways {
            case_study: Some(CaseStudyOutcome::Running {
                message: "Processing 3 of 8 frames".into(),
            }),
            ..MockGateways::default()
        });
        let (signal, captured) = Signal::capture();
        let usecase = StandardCaseStudyUseCase::new(gateway, Presenter::new("test", signal));

        let response = usecase.execute(request()).await;

        assert_eq!(
            response,
            UseCaseResponse::Progress {
                message: "Processing 3 of 8 frames".into()
            }
        );
        assert_eq!(captured.latest().unwrap().status(), "progress");
    }

    #[tokio::test]
    async fn completed_job_carries_keyframes() {
        let gateway = Arc::new(MockGateways {
            case_study: Some(CaseStudyOutcome::Completed {
                keyframes: vec![Keyframe {
                    timestamp: "2026-03-01T00:00:00Z".into(),
                    images: vec![],
                    data: vec![json!({"no2": 0.4})],
                }],
            }),
            ..MockGateways::default()
        });
        let usecase = StandardCaseStudyUseCase::new(gateway, Presenter::detached("test"));

        let response = usecase.execute(request()).await;

        let payload = response.success().unwrap();
        assert_eq!(payload.case_study_name, CaseStudyName::Sentinel5P);
        assert_eq!(payload.job_id, 12);
        assert_eq!(payload.keyframes.len(), 1);
    }

    #[tokio::test]
    async fn invalid_parameters_skip_the_repository() {
        let gateway = Arc::new(MockGateways::default());
        let usecase = StandardCaseStudyUseCase::new(gateway.clone(), Presenter::detached("test"));

        for bad in [
            CaseStudyRequest {
                case_study_name: Some("unknown".into()),
                ..request()
            },
            CaseStudyRequest {
                tracer_id: Some("".into()),
                ..request()
            },
            CaseStudyRequest {
                job_id: None,
                ..request()
            },
        ] {
            let response = usecase.execute(bad).await;
            assert_eq!(response.error_info().unwrap().operation, OPERATION);
        }

        assert_eq!(gateway.calls(), 0);
    }
}
