// Copyright (c) 2026 RAGE Research Assistant
// SPDX-License-Identifier: AGPL-3.0

//! Case-study repository backed by the satellite-data (SDA) service.
//!
//! `GET {endpoint}/case-studies/{name}/{tracer}/{job}` answers either
//! `{"status": "running", "message": ...}` or
//! `{"status": "completed", "keyframes": [...]}`.

use crate::domain::case_study::{CaseStudyOutcome, CaseStudyRun};
use crate::domain::config::{CaseStudyConfig, ConfigError};
use crate::domain::error::{Dto, ErrorInfo};
use crate::domain::gateway::CaseStudyRepository;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const OPERATION: &str = "sda-case-study-repository#fetch";

pub struct SdaCaseStudyRepository {
    client: reqwest::Client,
    endpoint: Url,
}

impl SdaCaseStudyRepository {
    pub fn new(config: &CaseStudyConfig) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ConfigError::Invalid(format!("Failed to build case-study HTTP client: {e}")))?;

        let endpoint = Url::parse(&config.endpoint)
            .map_err(|e| ConfigError::Invalid(format!("Invalid case-study endpoint '{}': {e}", config.endpoint)))?;
        if endpoint.cannot_be_a_base() {
            return Err(ConfigError::Invalid(format!(
                "Case-study endpoint '{}' cannot carry a path",
                config.endpoint
            )));
        }

        Ok(Self { client, endpoint })
    }

    /// Each run field is one escaped path segment.
    fn url(&self, run: &CaseStudyRun) -> Result<Url, String> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| format!("Case-study endpoint {} cannot carry a path", self.endpoint))?
            .pop_if_empty()
            .extend([
                "case-studies",
                run.case_study_name.slug(),
                run.tracer_id.as_str(),
                run.job_id.to_string().as_str(),
            ]);
        Ok(url)
    }

    fn error(&self, run: &CaseStudyRun, message: String) -> ErrorInfo {
        warn!("Case study {} job {} failed: {}", run.case_study_name, run.job_id, message);
        ErrorInfo::new(OPERATION, message)
            .with_context("caseStudyName", run.case_study_name.slug())
            .with_context("tracerID", run.tracer_id.clone())
            .with_context("jobID", run.job_id)
    }
}

#[async_trait]
impl CaseStudyRepository for SdaCaseStudyRepository {
    async fn fetch(&self, run: &CaseStudyRun) -> Dto<CaseStudyOutcome> {
        let url = self.url(run).map_err(|message| self.error(run, message))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.error(run, format!("Network error: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(self.error(run, format!("Case-study service returned HTTP {}: {}", status, body)));
        }

        let outcome: CaseStudyOutcome = response
            .json()
            .await
            .map_err(|e| self.error(run, format!("Failed to parse case-study response: {e}")))?;

        debug!("Case study {} job {} fetched", run.case_study_name, run.job_id);
        Ok(outcome)
    }
}

/// Stands in for the repository when no case-study service is configured.
pub struct UnconfiguredCaseStudyRepository;

#[async_trait]
impl CaseStudyRepository for UnconfiguredCaseStudyRepository {
    async fn fetch(&self, _run: &CaseStudyRun) -> Dto<CaseStudyOutcome> {
        Err(ErrorInfo::new(
            "case-study-repository#fetch",
            "No case-study service is configured (spec.case_study)",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn repository(server: &mockito::Server) -> SdaCaseStudyRepository {
        SdaCaseStudyRepository::new(&CaseStudyConfig {
            endpoint: server.url(),
            timeout_seconds: 5,
        })
        .unwrap()
    }

    fn run() -> CaseStudyRun {
        CaseStudyRun::new(Some("climate-monitoring"), "tracer-9", 3).unwrap()
    }

    #[tokio::test]
    async fn running_job_reports_status_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/case-studies/climate-monitoring/tracer-9/3")
            .with_status(200)
            .with_body(json!({"status": "running", "message": "Scraping imagery"}).to_string())
            .create_async()
            .await;

        let outcome = repository(&server).fetch(&run()).await.unwrap();

        assert_eq!(
            outcome,
            CaseStudyOutcome::Running {
                message: "Scraping imagery".into()
            }
        );
    }

    #[tokio::test]
    async fn completed_job_carries_keyframes() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/case-studies/climate-monitoring/tracer-9/3")
            .with_status(200)
            .with_body(
                json!({
                    "status": "completed",
                    "keyframes": [{
                        "timestamp": "2024-05-01T00:00:00Z",
                        "images": [{"kind": "true-color", "relativePath": "img/1.png", "description": "Day 1"}],
                        "data": [{"temperature": 21.5}]
                    }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        match repository(&server).fetch(&run()).await.unwrap() {
            CaseStudyOutcome::Completed { keyframes } => {
                assert_eq!(keyframes.len(), 1);
                assert_eq!(keyframes[0].images[0].relative_path, "img/1.png");
                assert!(keyframes[0].images[0].signed_url.is_none());
            }
            other => panic!("expected completed outcome, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn tracer_id_stays_one_path_segment() {
        let mut server = mockito::Server::new_async().await;
        let nested = server
            .mock("GET", "/case-studies/sentinel-5p/a/b/12")
            .expect(0)
            .create_async()
            .await;
        let escaped = server
            .mock("GET", "/case-studies/sentinel-5p/a%2Fb/12")
            .with_status(200)
            .with_body(json!({"status": "running", "message": "Rendering"}).to_string())
            .expect(1)
            .create_async()
            .await;

        let run = CaseStudyRun::new(Some("sentinel-5p"), "a/b", 12).unwrap();
        let outcome = repository(&server).fetch(&run).await.unwrap();

        assert_eq!(
            outcome,
            CaseStudyOutcome::Running {
                message: "Rendering".into()
            }
        );
        nested.assert_async().await;
        escaped.assert_async().await;
    }

    #[test]
    fn endpoint_path_prefix_is_kept() {
        let repository = SdaCaseStudyRepository::new(&CaseStudyConfig {
            endpoint: "http://sda.local/api/".into(),
            timeout_seconds: 5,
        })
        .unwrap();

        let url = repository.url(&run()).unwrap();

        assert_eq!(url.as_str(), "http://sda.local/api/case-studies/climate-monitoring/tracer-9/3");
    }

    #[tokio::test]
    async fn missing_job_is_an_error_with_context() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/case-studies/climate-monitoring/tracer-9/3")
            .with_status(404)
            .with_body("no such job")
            .create_async()
            .await;

        let error = repository(&server).fetch(&run()).await.unwrap_err();

        assert_eq!(error.operation, OPERATION);
        assert!(error.message.contains("404"));
        assert_eq!(error.context.unwrap()["jobID"], 3);
    }
}
