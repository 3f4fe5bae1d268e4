// Copyright (c) 2026 RAGE Research Assistant
// SPDX-License-Identifier: AGPL-3.0

use anyhow::{Context, Result};
use std::path::PathBuf;

use rage_core::domain::config::ServiceConfigManifest;

use crate::server;

pub async fn run(config_path: Option<PathBuf>, host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = ServiceConfigManifest::load_or_default(config_path).context("Failed to load configuration")?;
    server::serve(config, host, port).await
}
