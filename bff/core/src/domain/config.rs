// Copyright (c) 2026 RAGE Research Assistant
// SPDX-License-Identifier: AGPL-3.0

// Service Configuration Types
//
// Defines the configuration schema for the backend-for-frontend, including:
// - Kubernetes-style manifest format (apiVersion/kind/metadata/spec)
// - HTTP server binding
// - Kernel (conversation / file / research context store) connection
// - LLM agent provider and case-study service endpoints
// - Client retry policy advertised to front ends

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const API_VERSION: &str = "rage/v1";
pub const KIND: &str = "ServiceConfig";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Environment variable not set: {0}")]
    MissingEnv(String),
}

/// Top-level Kubernetes-style service configuration manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfigManifest {
    /// API version (must be "rage/v1")
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Resource kind (must be "ServiceConfig")
    pub kind: String,

    pub metadata: ManifestMetadata,

    pub spec: ServiceConfigSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestMetadata {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfigSpec {
    #[serde(default)]
    pub server: ServerConfig,

    /// Which implementation backs the Kernel gateways
    #[serde(default)]
    pub backend: BackendKind,

    #[serde(default)]
    pub kernel: KernelConfig,

    /// LLM agent provider (agent queries fail with a gateway error when absent)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<AgentConfig>,

    /// Satellite-data case-study service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_study: Option<CaseStudyConfig>,

    /// Vector store searched for passages before the agent answers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector_store: Option<VectorStoreConfig>,

    #[serde(default)]
    pub client: ClientRetryConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    #[default]
    Kernel,
    InMemory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Network bind address (e.g. "0.0.0.0" or "127.0.0.1")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_api_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KernelConfig {
    /// Base URL of the Kernel REST API
    #[serde(default = "default_kernel_endpoint")]
    pub endpoint: String,

    /// Client (tenant) id under which research contexts and sources live
    #[serde(default = "default_client_id")]
    pub client_id: i64,

    /// Fallback token used when the caller presents none
    /// (supports "env:VAR_NAME" for environment variables)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_token: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// OpenAI-compatible API endpoint
    pub endpoint: String,

    /// API key (supports "env:VAR_NAME")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    pub model: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Replaces the built-in research assistant instructions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,

    #[serde(default = "default_agent_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorStoreConfig {
    /// OpenAI-compatible API endpoint
    pub endpoint: String,

    /// API key (supports "env:VAR_NAME")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Passages passed to the agent per question
    #[serde(default = "default_max_results")]
    pub max_results: u32,

    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseStudyConfig {
    pub endpoint: String,

    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

/// Retry policy applied by clients before settling into the error state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRetryConfig {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_api_port() -> u16 {
    3000
}

fn default_kernel_endpoint() -> String {
    "http://localhost:8000".to_string()
}

fn default_client_id() -> i64 {
    1
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_agent_timeout_seconds() -> u64 {
    120
}

fn default_max_results() -> u32 {
    5
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay() -> u64 {
    1000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_api_port(),
        }
    }
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            endpoint: default_kernel_endpoint(),
            client_id: default_client_id(),
            service_token: None,
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for ClientRetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay(),
        }
    }
}

impl Default for ServiceConfigSpec {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            backend: BackendKind::default(),
            kernel: KernelConfig::default(),
            agent: None,
            case_study: None,
            vector_store: None,
            client: ClientRetryConfig::default(),
        }
    }
}

impl Default for ServiceConfigManifest {
    fn default() -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            metadata: ManifestMetadata {
                name: "rage-bff".to_string(),
                version: Some("1.0.0".to_string()),
                labels: None,
            },
            spec: ServiceConfigSpec::default(),
        }
    }
}

/// Resolve a secret value (supports "env:VAR_NAME" syntax)
pub fn resolve_secret(value: &str) -> Result<String, ConfigError> {
    match value.strip_prefix("env:") {
        Some(var_name) => {
            std::env::var(var_name).map_err(|_| ConfigError::MissingEnv(var_name.to_string()))
        }
        None => Ok(value.to_string()),
    }
}

impl ServiceConfigManifest {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn to_yaml_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Candidate paths in precedence order (after an explicit `--config`).
    pub fn discovery_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(path) = std::env::var("RAGE_CONFIG_PATH") {
            paths.push(PathBuf::from(path));
        }

        paths.push(PathBuf::from("./rage-config.yaml"));

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".rage").join("config.yaml"));
        }

        #[cfg(unix)]
        paths.push(PathBuf::from("/etc/rage/config.yaml"));
        #[cfg(windows)]
        paths.push(PathBuf::from("C:\\ProgramData\\Rage\\config.yaml"));

        paths
    }

    /// Discover configuration file using precedence order
    /// 1. RAGE_CONFIG_PATH environment variable
    /// 2. ./rage-config.yaml (working directory)
    /// 3. ~/.rage/config.yaml (user home)
    /// 4. /etc/rage/config.yaml (system)
    pub fn discover_config() -> Option<PathBuf> {
        Self::discovery_paths().into_iter().find(|path| path.exists())
    }

    /// Load configuration with discovery, fallback to default
    pub fn load_or_default(cli_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            Self::from_yaml_file(&path)?
        } else if let Some(path) = Self::discover_config() {
            tracing::info!("Loading configuration from discovered path: {:?}", path);
            Self::from_yaml_file(path)?
        } else {
            tracing::warn!("No configuration file found in standard locations. Using defaults.");
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(endpoint) = lookup("RAGE_KERNEL_ENDPOINT") {
            tracing::info!("Environment override: RAGE_KERNEL_ENDPOINT={}", endpoint);
            self.spec.kernel.endpoint = endpoint;
        }

        if let Some(val) = lookup("RAGE_KERNEL_CLIENT_ID") {
            match val.parse() {
                Ok(client_id) => self.spec.kernel.client_id = client_id,
                Err(_) => tracing::warn!(
                    "Invalid value for RAGE_KERNEL_CLIENT_ID: '{}'. Expected an integer. Ignoring.",
                    val
                ),
            }
        }

        if let Some(val) = lookup("RAGE_BACKEND") {
            match val.to_lowercase().as_str() {
                "kernel" => self.spec.backend = BackendKind::Kernel,
                "in-memory" | "memory" => self.spec.backend = BackendKind::InMemory,
                _ => tracing::warn!(
                    "Invalid value for RAGE_BACKEND: '{}'. Expected kernel/in-memory. Ignoring.",
                    val
                ),
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_version != API_VERSION {
            return Err(ConfigError::Invalid(format!(
                "Invalid apiVersion: '{}'. Must be '{}'",
                self.api_version, API_VERSION
            )));
        }

        if self.kind != KIND {
            return Err(ConfigError::Invalid(format!(
                "Invalid kind: '{}'. Must be '{}'",
                self.kind, KIND
            )));
        }

        if self.metadata.name.is_empty() {
            return Err(ConfigError::Invalid("metadata.name cannot be empty".into()));
        }

        if self.spec.backend == BackendKind::Kernel {
            validate_url("spec.kernel.endpoint", &self.spec.kernel.endpoint)?;
        }

        if let Some(agent) = &self.spec.agent {
            validate_url("spec.agent.endpoint", &agent.endpoint)?;
            if agent.model.is_empty() {
                return Err(ConfigError::Invalid("spec.agent.model cannot be empty".into()));
            }
        }

        if let Some(case_study) = &self.spec.case_study {
            validate_url("spec.case_study.endpoint", &case_study.endpoint)?;
        }

        if let Some(vector_store) = &self.spec.vector_store {
            validate_url("spec.vector_store.endpoint", &vector_store.endpoint)?;
            if vector_store.max_results == 0 {
                return Err(ConfigError::Invalid("spec.vector_store.max_results must be at least 1".into()));
            }
        }

        Ok(())
    }
}

fn validate_url(field: &str, value: &str) -> Result<(), ConfigError> {
    url::Url::parse(value)
        .map(|_| ())
        .map_err(|e| ConfigError::Invalid(format!("{field} is not a valid URL ('{value}'): {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_manifest() {
        let manifest = ServiceConfigManifest::default();
        assert_eq!(manifest.api_version, "rage/v1");
        assert_eq!(manifest.kind, "ServiceConfig");
        assert_eq!(manifest.spec.backend, BackendKind::Kernel);
        assert_eq!(manifest.spec.client.max_retries, 3);
        assert!(manifest.validate().is_ok());
    }

    #[test]
    fn test_yaml_with_sparse_spec() {
        let yaml = r#"
apiVersion: rage/v1
kind: ServiceConfig
metadata:
  name: dev
spec:
  backend: in-memory
  kernel:
    endpoint: http://kernel.internal:8000
    client_id: 42
  agent:
    endpoint: https://api.openai.com/v1
    api_key: env:OPENAI_API_KEY
    model: gpt-4o
"#;
        let manifest = ServiceConfigManifest::from_yaml_str(yaml).unwrap();

        assert_eq!(manifest.spec.backend, BackendKind::InMemory);
        assert_eq!(manifest.spec.kernel.client_id, 42);
        assert_eq!(manifest.spec.kernel.timeout_seconds, 30);
        assert_eq!(manifest.spec.server.port, 3000);
        assert_eq!(manifest.spec.agent.as_ref().unwrap().model, "gpt-4o");
        assert!(manifest.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let mut manifest = ServiceConfigManifest::default();

        manifest.api_version = "wrong/v1".to_string();
        assert!(manifest.validate().is_err());
        manifest.api_version = API_VERSION.to_string();

        manifest.kind = "WrongKind".to_string();
        assert!(manifest.validate().is_err());
        manifest.kind = KIND.to_string();

        manifest.spec.kernel.endpoint = "not a url".to_string();
        assert!(manifest.validate().is_err());

        manifest.spec.backend = BackendKind::InMemory;
        assert!(manifest.validate().is_ok());

        manifest.spec.agent = Some(AgentConfig {
            endpoint: "https://api.openai.com/v1".into(),
            api_key: None,
            model: String::new(),
            temperature: None,
            max_tokens: None,
            system_prompt: None,
            timeout_seconds: 120,
        });
        assert!(manifest.validate().is_err());
        manifest.spec.agent = None;

        manifest.spec.vector_store = Some(VectorStoreConfig {
            endpoint: "https://api.openai.com/v1".into(),
            api_key: None,
            max_results: 0,
            timeout_seconds: 30,
        });
        assert!(manifest.validate().is_err());
    }

    #[test]
    fn vector_store_section_defaults() {
        let yaml = r#"
apiVersion: rage/v1
kind: ServiceConfig
metadata:
  name: rage-bff
spec:
  agent:
    endpoint: https://api.openai.com/v1
    model: gpt-4o
  vector_store:
    endpoint: https://api.openai.com/v1
"#;
        let manifest = ServiceConfigManifest::from_yaml_str(yaml).unwrap();
        let vector_store = manifest.spec.vector_store.as_ref().unwrap();
        assert_eq!(vector_store.max_results, 5);
        assert_eq!(vector_store.timeout_seconds, 30);
        assert_eq!(manifest.spec.agent.as_ref().unwrap().timeout_seconds, 120);
        manifest.validate().unwrap();
    }

    #[test]
    fn test_overrides() {
        let mut manifest = ServiceConfigManifest::default();
        manifest.apply_overrides(|key| match key {
            "RAGE_KERNEL_ENDPOINT" => Some("http://override:9000".to_string()),
            "RAGE_KERNEL_CLIENT_ID" => Some("not-a-number".to_string()),
            "RAGE_BACKEND" => Some("in-memory".to_string()),
            _ => None,
        });

        assert_eq!(manifest.spec.kernel.endpoint, "http://override:9000");
        assert_eq!(manifest.spec.kernel.client_id, 1);
        assert_eq!(manifest.spec.backend, BackendKind::InMemory);
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rage-config.yaml");

        let mut manifest = ServiceConfigManifest::default();
        manifest.spec.server.port = 8080;
        manifest.to_yaml_file(&path).unwrap();

        let loaded = ServiceConfigManifest::load_or_default(Some(path)).unwrap();
        assert_eq!(loaded.spec.server.port, 8080);
    }

    #[test]
    fn test_resolve_plain_secret() {
        assert_eq!(resolve_secret("sk-test").unwrap(), "sk-test");
        assert!(matches!(
            resolve_secret("env:RAGE_TEST_SURELY_UNSET_VARIABLE"),
            Err(ConfigError::MissingEnv(_))
        ));
    }
}
