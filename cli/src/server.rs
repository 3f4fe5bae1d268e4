// Copyright (c) 2026 RAGE Research Assistant
// SPDX-License-Identifier: AGPL-3.0

//! RPC server host

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use rage_core::domain::config::ServiceConfigManifest;
use rage_core::infrastructure::Services;
use rage_core::presentation::app;

/// `host:port` to bind, preferring explicit overrides over the configuration.
pub fn bind_address(config: &ServiceConfigManifest, host: Option<&str>, port: Option<u16>) -> String {
    format!(
        "{}:{}",
        host.unwrap_or(&config.spec.server.bind_address),
        port.unwrap_or(config.spec.server.port)
    )
}

pub async fn serve(config: ServiceConfigManifest, host: Option<String>, port: Option<u16>) -> Result<()> {
    config.validate().context("Configuration validation failed")?;

    let services = Services::from_config(&config).context("Failed to initialize gateways")?;
    info!(
        "Configuration loaded: name={}, backend={:?}",
        config.metadata.name, config.spec.backend
    );

    let addr = bind_address(&config, host.as_deref(), port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("RPC server listening on {}", addr);

    axum::serve(listener, app(services))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("RPC server shutting down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
