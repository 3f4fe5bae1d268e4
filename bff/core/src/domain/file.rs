// Copyright (c) 2026 RAGE Research Assistant
// SPDX-License-Identifier: AGPL-3.0
//! File references and source-data listings.
//!
//! A [`FileRef`] identifies a piece of source data without embedding its
//! bytes. [`SourceDataFile`] is the richer listing shape the source-data
//! store returns; only remote entries are ever surfaced to clients.

use serde::{Deserialize, Serialize};

/// Reference to a file, discriminated by `type`. `path` is opaque here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FileRef {
    Local { path: String },
    Remote { provider: String, path: String },
}

impl FileRef {
    pub fn path(&self) -> &str {
        match self {
            FileRef::Local { path } | FileRef::Remote { path, .. } => path,
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, FileRef::Remote { .. })
    }
}

/// A file that only exists on the machine that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalSourceData {
    pub id: String,
    pub name: String,
    pub relative_path: String,
    pub created_at: String,
}

/// A file held by a remote storage provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteSourceData {
    pub id: String,
    pub name: String,
    pub relative_path: String,
    pub provider: String,
    pub created_at: String,
}

impl RemoteSourceData {
    pub fn file_ref(&self) -> FileRef {
        FileRef::Remote {
            provider: self.provider.clone(),
            path: self.relative_path.clone(),
        }
    }
}

/// One entry of a source-data listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceDataFile {
    Local(LocalSourceData),
    Remote(RemoteSourceData),
}

impl SourceDataFile {
    pub fn id(&self) -> &str {
        match self {
            SourceDataFile::Local(file) => &file.id,
            SourceDataFile::Remote(file) => &file.id,
        }
    }

    pub fn into_remote(self) -> Option<RemoteSourceData> {
        match self {
            SourceDataFile::Remote(file) => Some(file),
            SourceDataFile::Local(_) => None,
        }
    }
}

/// Keep only the remote entries, preserving order.
pub fn remote_only(files: Vec<SourceDataFile>) -> Vec<RemoteSourceData> {
    files.into_iter().filter_map(SourceDataFile::into_remote).collect()
}
