use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::agent::agent_interface::{Agent, AgentError};
use crate::agent::hosted_agent::HostedAgent;
use crate::agent::llm_client::LlmClient;
use crate::agent_service::AgentServiceClient;

/// Everything needed to stand up one agent
#[derive(Debug, Clone)]
pub struct AgentSpec {
    /// API key for the agent service
    pub api_key: String,
    /// `0x`-prefixed signing key
    pub private_key: String,
    pub llm: LlmClient,
}

/// Builds a stateful agent bound to credentials and a model configuration
#[async_trait]
pub trait AgentFactory: Send + Sync {
    async fn create(&self, spec: AgentSpec) -> Result<Box<dyn Agent>, AgentError>;
}

/// Factory for agents hosted by the agent runtime sidecar
pub struct HostedAgentFactory {
    service: Arc<AgentServiceClient>,
}

impl HostedAgentFactory {
    pub fn new(service: Arc<AgentServiceClient>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl AgentFactory for HostedAgentFactory {
    /// Create an agent for a single request.
    ///
    /// # Arguments
    /// * `spec` - Credentials and LLM configuration for the agent
    ///
    /// # Errors
    /// Fails when a credential the runtime needs is empty. Key format is
    /// not checked here; the runtime reports malformed keys on invoke.
    async fn create(&self, spec: AgentSpec) -> Result<Box<dyn Agent>, AgentError> {
        info!(
            "Initializing hosted agent: runtime={}, model={}",
            self.service.base_url(),
            spec.llm.model
        );

        if spec.api_key.is_empty() {
            return Err(AgentError::Failed("Agent API key is empty".to_string()));
        }
        if spec.llm.api_key.is_empty() {
            return Err(AgentError::Failed("LLM API key is empty".to_string()));
        }

        Ok(Box::new(HostedAgent::new(
            spec.api_key,
            spec.private_key,
            spec.llm,
            self.service.clone(),
        )))
    }
}
