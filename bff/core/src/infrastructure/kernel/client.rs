// Copyright (c) 2026 RAGE Research Assistant
// SPDX-License-Identifier: AGPL-3.0

// Kernel REST Client
//
// Anti-Corruption Layer for the Kernel API. Every Kernel reply carries a
// `{status, code, errorMessage?}` header next to its payload; the client
// checks that header and only then decodes the payload, so callers see
// either the payload or a `KernelError`.

use crate::domain::config::{resolve_secret, ConfigError, KernelConfig};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

pub const AUTH_HEADER: &str = "X-Auth-Token";

#[derive(Debug, thiserror::Error)]
pub enum KernelError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Kernel returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Failed to parse Kernel response: {0}")]
    Decode(String),

    /// `status: false` reply; carries the Kernel's own message
    #[error("{message}")]
    Rejected { code: Option<i64>, message: String },
}

#[derive(Debug, Deserialize)]
struct ReplyHeader {
    status: bool,
    #[serde(default)]
    code: Option<i64>,
    #[serde(rename = "errorMessage", default)]
    error_message: Option<String>,
}

pub struct KernelClient {
    http: reqwest::Client,
    endpoint: String,
    client_id: i64,
    service_token: Option<String>,
}

impl KernelClient {
    pub fn new(config: &KernelConfig) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ConfigError::Invalid(format!("Failed to build Kernel HTTP client: {e}")))?;

        let service_token = config.service_token.as_deref().map(resolve_secret).transpose()?;

        Ok(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            client_id: config.client_id,
            service_token,
        })
    }

    pub fn client_id(&self) -> i64 {
        self.client_id
    }

    pub fn service_token(&self) -> Option<&str> {
        self.service_token.as_deref()
    }

    pub async fn get<R: DeserializeOwned>(
        &self,
        token: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<R, KernelError> {
        let request = self.http.get(self.url(path)).query(query);
        self.send(token, request).await
    }

    pub async fn post<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        token: &str,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<R, KernelError> {
        let mut request = self.http.post(self.url(path)).query(query);
        if let Some(body) = body {
            request = request.json(body);
        }
        self.send(token, request).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    async fn send<R: DeserializeOwned>(&self, token: &str, request: reqwest::RequestBuilder) -> Result<R, KernelError> {
        let response = request
            .header(AUTH_HEADER, token)
            .send()
            .await
            .map_err(|e| KernelError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(KernelError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| KernelError::Decode(e.to_string()))?;

        let header: ReplyHeader =
            serde_json::from_value(body.clone()).map_err(|e| KernelError::Decode(e.to_string()))?;
        if !header.status {
            return Err(KernelError::Rejected {
                code: header.code,
                message: header
                    .error_message
                    .unwrap_or_else(|| "Kernel rejected the request".to_string()),
            });
        }

        debug!("Kernel replied with code {:?}", header.code);
        serde_json::from_value(body).map_err(|e| KernelError::Decode(e.to_string()))
    }
}
