// Copyright (c) 2026 RAGE Research Assistant
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate, generate

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::{Path, PathBuf};

use rage_core::domain::config::{BackendKind, ServiceConfigManifest};

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show config file paths checked
        #[arg(long)]
        paths: bool,
    },

    /// Validate configuration file
    Validate {
        /// Path to config file (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Generate sample configuration
    Generate {
        /// Output path (default: ./rage-config.yaml)
        #[arg(short, long, default_value = "./rage-config.yaml")]
        output: PathBuf,

        /// Serve from the in-memory store instead of the Kernel
        #[arg(long)]
        in_memory: bool,
    },
}

pub async fn handle_command(command: ConfigCommand, config_override: Option<PathBuf>) -> Result<()> {
    match command {
        ConfigCommand::Show { paths } => show(config_override, paths).await,
        ConfigCommand::Validate { file } => validate(file.or(config_override)).await,
        ConfigCommand::Generate { output, in_memory } => generate(&output, in_memory).await,
    }
}

async fn show(config_override: Option<PathBuf>, show_paths: bool) -> Result<()> {
    if show_paths {
        println!("{}", "Configuration discovery paths:".bold());
        match &config_override {
            Some(path) => println!("  --config flag: {}", path.display()),
            None => println!("  --config flag: {}", "(not set)".dimmed()),
        }
        for path in ServiceConfigManifest::discovery_paths() {
            let marker = if path.exists() { "found".green() } else { "missing".dimmed() };
            println!("  {} ({})", path.display(), marker);
        }
        println!();
    }

    let config = ServiceConfigManifest::load_or_default(config_override).context("Failed to load configuration")?;

    println!("{}", "Current configuration:".bold());
    println!();

    println!("{}", "Server:".bold());
    println!("  Name: {}", config.metadata.name);
    println!(
        "  Listen: {}:{}",
        config.spec.server.bind_address, config.spec.server.port
    );
    println!("  Backend: {:?}", config.spec.backend);
    println!();

    println!("{}", "Kernel:".bold());
    println!("  Endpoint: {}", config.spec.kernel.endpoint);
    println!("  Client ID: {}", config.spec.kernel.client_id);
    println!(
        "  Service token: {}",
        if config.spec.kernel.service_token.is_some() { "(set)" } else { "(none)" }
    );
    println!();

    println!("{}", "Agent:".bold());
    match &config.spec.agent {
        Some(agent) => {
            println!("  Endpoint: {}", agent.endpoint);
            println!("  Model: {}", agent.model);
        }
        None => println!("  {}", "(not configured)".dimmed()),
    }
    println!();

    println!("{}", "Vector store:".bold());
    match &config.spec.vector_store {
        Some(vector_store) => {
            println!("  Endpoint: {}", vector_store.endpoint);
            println!("  Max results: {}", vector_store.max_results);
        }
        None => println!("  {}", "(not configured)".dimmed()),
    }
    println!();

    println!("{}", "Case studies:".bold());
    match &config.spec.case_study {
        Some(case_study) => println!("  Endpoint: {}", case_study.endpoint),
        None => println!("  {}", "(not configured)".dimmed()),
    }
    println!();

    println!("{}", "Client retries:".bold());
    println!(
        "  {} retries, {} ms apart",
        config.spec.client.max_retries, config.spec.client.retry_delay_ms
    );

    Ok(())
}

async fn validate(config_path: Option<PathBuf>) -> Result<()> {
    println!("Validating configuration...");

    let config = ServiceConfigManifest::load_or_default(config_path).context("Failed to load configuration")?;

    config.validate().context("Configuration validation failed")?;

    println!("{}", "✓ Configuration is valid".green());

    Ok(())
}

async fn generate(output: &Path, in_memory: bool) -> Result<()> {
    write_sample(output, in_memory)?;

    println!(
        "{}",
        format!("✓ Configuration generated: {}", output.display()).green()
    );

    Ok(())
}

fn write_sample(output: &Path, in_memory: bool) -> Result<()> {
    let mut config = ServiceConfigManifest::default();
    if in_memory {
        config.spec.backend = BackendKind::InMemory;
    }

    config
        .to_yaml_file(output)
        .with_context(|| format!("Failed to write config to {:?}", output))
}
