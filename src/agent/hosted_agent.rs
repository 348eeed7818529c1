use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use super::agent_interface::{Agent, AgentError, AgentInput, AgentOutput};
use super::llm_client::LlmClient;
use crate::agent_service::{AgentCredentialsPayload, AgentInvokeRequest, AgentServiceClient};

/// Agent hosted by the agent runtime sidecar.
/// Bound to one set of credentials and one LLM configuration.
pub struct HostedAgent {
    api_key: String,
    private_key: String,
    llm: LlmClient,
    service: Arc<AgentServiceClient>,
}

impl HostedAgent {
    pub fn new(
        api_key: String,
        private_key: String,
        llm: LlmClient,
        service: Arc<AgentServiceClient>,
    ) -> Self {
        Self {
            api_key,
            private_key,
            llm,
            service,
        }
    }
}

#[async_trait]
impl Agent for HostedAgent {
    async fn invoke(&self, input: AgentInput) -> Result<AgentOutput, AgentError> {
        debug!(
            "HostedAgent invoke: history_len={}, model={}",
            input.history.len(),
            self.llm.model
        );

        let request = AgentInvokeRequest {
            input: input.input,
            history: input.history,
            credentials: AgentCredentialsPayload {
                api_key: self.api_key.clone(),
                private_key: self.private_key.clone(),
            },
            llm: self.llm.clone(),
        };

        // The LLM client's own deadline doubles as the transport timeout
        let response = self.service.invoke(&request, self.llm.timeout()).await?;
        Ok(AgentOutput {
            output: response.output,
        })
    }
}
