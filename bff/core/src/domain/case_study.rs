// Copyright (c) 2026 RAGE Research Assistant
// SPDX-License-Identifier: AGPL-3.0
//! Case Study
//!
//! Case studies are pre-packaged analyses (climate monitoring, Sentinel-5P)
//! run by the satellite-data service. A run is addressed by the case study
//! name, a tracer id and a job id; its result is a sequence of keyframes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CaseStudyName {
    ClimateMonitoring,
    #[serde(rename = "sentinel-5p")]
    Sentinel5P,
}

impl CaseStudyName {
    pub const ALL: [CaseStudyName; 2] = [CaseStudyName::ClimateMonitoring, CaseStudyName::Sentinel5P];

    pub fn slug(&self) -> &'static str {
        match self {
            CaseStudyName::ClimateMonitoring => "climate-monitoring",
            CaseStudyName::Sentinel5P => "sentinel-5p",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CaseStudyName::ClimateMonitoring => "Climate Monitoring",
            CaseStudyName::Sentinel5P => "Sentinel 5P",
        }
    }
}

impl fmt::Display for CaseStudyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown case study: {0}")]
pub struct UnknownCaseStudy(pub String);

impl FromStr for CaseStudyName {
    type Err = UnknownCaseStudy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CaseStudyName::ALL
            .into_iter()
            .find(|name| name.slug() == s)
            .ok_or_else(|| UnknownCaseStudy(s.to_string()))
    }
}

/// Parameter problems detected before any remote call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CaseStudyParameterError {
    #[error("No case study is specified. Please choose one of the available case studies.")]
    MissingCaseStudy,

    #[error("Please make sure the job ID and tracer ID fields are not empty.")]
    MissingTracerId,

    #[error("Job ID must not be negative, got {0}")]
    NegativeJobId(i64),
}

/// Validated address of one case study run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseStudyRun {
    pub case_study_name: CaseStudyName,
    #[serde(rename = "tracerID")]
    pub tracer_id: String,
    #[serde(rename = "jobID")]
    pub job_id: i64,
}

impl CaseStudyRun {
    pub fn new(
        case_study_name: Option<&str>,
        tracer_id: &str,
        job_id: i64,
    ) -> Result<Self, CaseStudyParameterError> {
        let case_study_name = case_study_name
            .and_then(|name| name.parse::<CaseStudyName>().ok())
            .ok_or(CaseStudyParameterError::MissingCaseStudy)?;

        if tracer_id.trim().is_empty() {
            return Err(CaseStudyParameterError::MissingTracerId);
        }

        if job_id < 0 {
            return Err(CaseStudyParameterError::NegativeJobId(job_id));
        }

        Ok(Self {
            case_study_name,
            tracer_id: tracer_id.to_string(),
            job_id,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyframeImage {
    pub kind: String,
    pub relative_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed_url: Option<String>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub timestamp: String,
    #[serde(default)]
    pub images: Vec<KeyframeImage>,
    #[serde(default)]
    pub data: Vec<serde_json::Value>,
}

/// What the case-study service reports for a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CaseStudyOutcome {
    Running { message: String },
    Completed { keyframes: Vec<Keyframe> },
}
