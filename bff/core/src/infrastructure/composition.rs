// Copyright (c) 2026 RAGE Research Assistant
// SPDX-License-Identifier: AGPL-3.0

//! Composition Root
//!
//! Builds every gateway the controllers need from one
//! [`ServiceConfigManifest`]. Built once at startup and shared by `Arc`.

use crate::domain::config::{BackendKind, ConfigError, ServiceConfigManifest};
use crate::domain::gateway::{
    AgentGateway, AuthGateway, CaseStudyRepository, ConversationGateway, Credentials, GatewayFactory,
    ResearchContextGateway, SourceDataGateway, VectorStoreGateway,
};
use crate::infrastructure::auth::SessionAuthGateway;
use crate::infrastructure::case_study::{SdaCaseStudyRepository, UnconfiguredCaseStudyRepository};
use crate::infrastructure::in_memory::InMemoryKernel;
use crate::infrastructure::kernel::{
    KernelClient, KernelConversationGateway, KernelResearchContextGateway, KernelSourceDataGateway,
};
use crate::infrastructure::llm::{OpenAIAgentGateway, OpenAIVectorStoreGateway, UnconfiguredAgentGateway};
use std::sync::Arc;
use tracing::info;

/// Everything a controller resolves per request.
#[derive(Clone)]
pub struct Services {
    pub auth: Arc<dyn AuthGateway>,
    pub gateways: Arc<dyn GatewayFactory>,
}

impl Services {
    pub fn new(auth: Arc<dyn AuthGateway>, gateways: Arc<dyn GatewayFactory>) -> Self {
        Self { auth, gateways }
    }

    pub fn from_config(config: &ServiceConfigManifest) -> Result<Self, ConfigError> {
        let spec = &config.spec;

        let vector_store: Option<Arc<dyn VectorStoreGateway>> = match &spec.vector_store {
            Some(vector_store) => {
                info!("Vector store service: {}", vector_store.endpoint);
                Some(Arc::new(OpenAIVectorStoreGateway::new(vector_store)?))
            }
            None => None,
        };

        let agent: Arc<dyn AgentGateway> = match &spec.agent {
            Some(agent) => {
                info!("Agent provider: {} ({})", agent.model, agent.endpoint);
                let gateway = OpenAIAgentGateway::new(agent)?;
                Arc::new(match vector_store {
                    Some(vector_store) => gateway.with_vector_store(vector_store),
                    None => gateway,
                })
            }
            None => Arc::new(UnconfiguredAgentGateway),
        };

        let case_studies: Arc<dyn CaseStudyRepository> = match &spec.case_study {
            Some(case_study) => {
                info!("Case-study service: {}", case_study.endpoint);
                Arc::new(SdaCaseStudyRepository::new(case_study)?)
            }
            None => Arc::new(UnconfiguredCaseStudyRepository),
        };

        match spec.backend {
            BackendKind::Kernel => {
                let client = Arc::new(KernelClient::new(&spec.kernel)?);
                info!(
                    "Kernel backend: {} (client {})",
                    spec.kernel.endpoint, spec.kernel.client_id
                );
                let auth = Arc::new(SessionAuthGateway::new(client.service_token().map(str::to_string)));
                Ok(Self::new(
                    auth,
                    Arc::new(KernelGateways {
                        client,
                        agent,
                        case_studies,
                    }),
                ))
            }
            BackendKind::InMemory => {
                info!("In-memory backend (data is lost on restart)");
                Ok(Self::new(
                    Arc::new(SessionAuthGateway::new(Some("in-memory".to_string()))),
                    Arc::new(InMemoryGateways {
                        kernel: InMemoryKernel::seeded(),
                        agent,
                        case_studies,
                    }),
                ))
            }
        }
    }
}

/// Kernel gateways bound to each caller's token.
pub struct KernelGateways {
    client: Arc<KernelClient>,
    agent: Arc<dyn AgentGateway>,
    case_studies: Arc<dyn CaseStudyRepository>,
}

impl GatewayFactory for KernelGateways {
    fn conversations(&self, credentials: &Credentials) -> Arc<dyn ConversationGateway> {
        Arc::new(KernelConversationGateway::new(self.client.clone(), credentials.clone()))
    }

    fn source_data(&self, credentials: &Credentials) -> Arc<dyn SourceDataGateway> {
        Arc::new(KernelSourceDataGateway::new(self.client.clone(), credentials.clone()))
    }

    fn research_contexts(&self, credentials: &Credentials) -> Arc<dyn ResearchContextGateway> {
        Arc::new(KernelResearchContextGateway::new(self.client.clone(), credentials.clone()))
    }

    fn agent(&self) -> Arc<dyn AgentGateway> {
        self.agent.clone()
    }

    fn case_studies(&self) -> Arc<dyn CaseStudyRepository> {
        self.case_studies.clone()
    }
}

/// One shared in-memory store; credentials are accepted but not scoped.
pub struct InMemoryGateways {
    pub kernel: InMemoryKernel,
    pub agent: Arc<dyn AgentGateway>,
    pub case_studies: Arc<dyn CaseStudyRepository>,
}

impl InMemoryGateways {
    pub fn new(kernel: InMemoryKernel) -> Self {
        Self {
            kernel,
            agent: Arc::new(UnconfiguredAgentGateway),
            case_studies: Arc::new(UnconfiguredCaseStudyRepository),
        }
    }
}

impl GatewayFactory for InMemoryGateways {
    fn conversations(&self, _credentials: &Credentials) -> Arc<dyn ConversationGateway> {
        Arc::new(self.kernel.clone())
    }

    fn source_data(&self, _credentials: &Credentials) -> Arc<dyn SourceDataGateway> {
        Arc::new(self.kernel.clone())
    }

    fn research_contexts(&self, _credentials: &Credentials) -> Arc<dyn ResearchContextGateway> {
        Arc::new(self.kernel.clone())
    }

    fn agent(&self) -> Arc<dyn AgentGateway> {
        self.agent.clone()
    }

    fn case_studies(&self) -> Arc<dyn CaseStudyRepository> {
        self.case_studies.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::gateway::Session;

    #[tokio::test]
    async fn in_memory_backend_accepts_anonymous_callers() {
        let mut config = ServiceConfigManifest::default();
        config.spec.backend = BackendKind::InMemory;

        let services = Services::from_config(&config).unwrap();
        let credentials = services.auth.extract_credentials(&Session::anonymous()).await.unwrap();
        let files = services.gateways.source_data(&credentials).list().await.unwrap();

        assert_eq!(files.len(), 2);
    }

    #[tokio::test]
    async fn kernel_backend_requires_a_token() {
        let services = Services::from_config(&ServiceConfigManifest::default()).unwrap();
        assert!(services
            .auth
            .extract_credentials(&Session::anonymous())
            .await
            .is_err());
    }

    #[tokio::test]
    async fn missing_agent_config_yields_gateway_error() {
        let services = Services::from_config(&ServiceConfigManifest::default()).unwrap();
        let error = services
            .gateways
            .agent()
            .query(&crate::domain::gateway::AgentQuery {
                research_context_id: crate::domain::research_context::ResearchContextId(1),
                conversation_id: crate::domain::conversation::ConversationId(1),
                vector_store: None,
                history: vec![],
                question: "hi".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(error.operation, "agent-gateway#query");
    }
}
