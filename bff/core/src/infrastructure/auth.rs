// Copyright (c) 2026 RAGE Research Assistant
// SPDX-License-Identifier: AGPL-3.0

use crate::domain::error::{Dto, ErrorInfo};
use crate::domain::gateway::{AuthGateway, Credentials, Session};
use async_trait::async_trait;

const OPERATION: &str = "session-auth-gateway#extract-credentials";

/// Reads Kernel credentials from the caller's session. Falls back to the
/// configured service token when the caller presents none.
pub struct SessionAuthGateway {
    service_token: Option<String>,
}

impl SessionAuthGateway {
    pub fn new(service_token: Option<String>) -> Self {
        Self {
            service_token: service_token.filter(|token| !token.trim().is_empty()),
        }
    }
}

#[async_trait]
impl AuthGateway for SessionAuthGateway {
    async fn extract_credentials(&self, session: &Session) -> Dto<Credentials> {
        session
            .auth_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .or(self.service_token.as_deref())
            .map(|token| Credentials {
                x_auth_token: token.to_string(),
            })
            .ok_or_else(|| ErrorInfo::new(OPERATION, "No auth token in session and no service token configured"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn session_token_wins_over_service_token() {
        let gateway = SessionAuthGateway::new(Some("service".into()));
        let credentials = gateway
            .extract_credentials(&Session::with_token("caller"))
            .await
            .unwrap();
        assert_eq!(credentials.x_auth_token, "caller");
    }

    #[tokio::test]
    async fn falls_back_to_service_token() {
        let gateway = SessionAuthGateway::new(Some("service".into()));
        let credentials = gateway.extract_credentials(&Session::with_token("  ")).await.unwrap();
        assert_eq!(credentials.x_auth_token, "service");
    }

    #[tokio::test]
    async fn fails_without_any_token() {
        let gateway = SessionAuthGateway::new(None);
        let error = gateway.extract_credentials(&Session::anonymous()).await.unwrap_err();
        assert_eq!(error.operation, OPERATION);
    }
}
