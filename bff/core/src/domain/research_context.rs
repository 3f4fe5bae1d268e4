// Copyright (c) 2026 RAGE Research Assistant
// SPDX-License-Identifier: AGPL-3.0
//! Research contexts: named groupings of source data and conversations.

use crate::domain::file::RemoteSourceData;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResearchContextId(pub i64);

impl fmt::Display for ResearchContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchContext {
    pub id: ResearchContextId,
    pub title: String,
    pub description: String,
}

/// Input for creating a research context from already-uploaded remote files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewResearchContext {
    pub title: String,
    pub description: String,
    pub sources: Vec<RemoteSourceData>,
}
