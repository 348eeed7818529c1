use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::agent::{Agent, AgentFactory, AgentInput, AgentOutput, AgentSpec, LlmClient};
use crate::chat::credentials::{normalize_private_key, CredentialSource};
use crate::chat::types::{ChatRequest, ChatResponse};
use crate::config::ChatConfig;
use crate::error::{ChatError, ChatResult, UNEXPECTED_ERROR_MESSAGE};

/// Per-request knobs for the proxy handler
#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub llm_timeout: Duration,
    /// Wall-clock budget for the agent invocation
    pub deadline: Duration,
    /// Abort the agent task when the deadline wins instead of letting it run on
    pub cancel_on_timeout: bool,
}

impl ChatSettings {
    fn llm_client(&self, api_key: String) -> LlmClient {
        LlmClient::new(api_key)
            .with_model(self.model.clone())
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens)
            .with_timeout(self.llm_timeout)
    }
}

impl Default for ChatSettings {
    fn default() -> Self {
        ChatConfig::default().into()
    }
}

impl From<ChatConfig> for ChatSettings {
    fn from(config: ChatConfig) -> Self {
        Self {
            model: config.model,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            llm_timeout: Duration::from_millis(config.llm_timeout_ms),
            deadline: Duration::from_millis(config.deadline_ms),
            cancel_on_timeout: config.cancel_on_timeout,
        }
    }
}

/// Receives a chat turn, hands it to a freshly built agent and races the
/// agent against a deadline.
///
/// When the deadline wins the agent task is left running by default, so a
/// transaction it was submitting may still land after the caller has been
/// answered with a timeout.
pub struct ChatProxyHandler {
    factory: Arc<dyn AgentFactory>,
    credentials: Arc<dyn CredentialSource>,
    settings: ChatSettings,
}

impl ChatProxyHandler {
    pub fn new(
        factory: Arc<dyn AgentFactory>,
        credentials: Arc<dyn CredentialSource>,
        settings: ChatSettings,
    ) -> Self {
        Self {
            factory,
            credentials,
            settings,
        }
    }

    pub fn settings(&self) -> &ChatSettings {
        &self.settings
    }

    /// Handle one raw request body
    #[instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
    pub async fn handle(&self, body: &[u8]) -> ChatResult<ChatResponse> {
        let result = self.process(body).await;
        match &result {
            Ok(_) => info!("Chat request completed"),
            Err(e @ ChatError::Validation(_)) => warn!("Rejected chat request: {}", e),
            Err(e) => error!("Chat request failed: {:?}", e),
        }
        result
    }

    async fn process(&self, body: &[u8]) -> ChatResult<ChatResponse> {
        let body: Value =
            serde_json::from_slice(body).map_err(|e| ChatError::Unexpected(e.to_string()))?;
        let request = ChatRequest::from_value(&body)?;

        let credentials = self.credentials.load()?;
        let spec = AgentSpec {
            api_key: credentials.agent_api_key,
            private_key: normalize_private_key(&credentials.private_key),
            llm: self.settings.llm_client(credentials.llm_api_key),
        };
        let agent = self.factory.create(spec).await?;

        let input = AgentInput {
            history: request.history(),
            input: request.input,
        };
        debug!("Invoking agent with {} history turns", input.history.len());

        let output = self.race(agent, input).await?;
        Ok(ChatResponse::new(output.output))
    }

    async fn race(&self, agent: Box<dyn Agent>, input: AgentInput) -> ChatResult<AgentOutput> {
        let mut task = tokio::spawn(async move { agent.invoke(input).await });

        match tokio::time::timeout(self.settings.deadline, &mut task).await {
            Ok(Ok(result)) => Ok(result?),
            Ok(Err(join_error)) => {
                error!("Agent task crashed: {}", join_error);
                Err(ChatError::Unexpected(UNEXPECTED_ERROR_MESSAGE.to_string()))
            }
            Err(_) => {
                if self.settings.cancel_on_timeout {
                    task.abort();
                    warn!(
                        "Agent missed the {:?} deadline; task aborted",
                        self.settings.deadline
                    );
                } else {
                    // Dropping the handle detaches the task
                    warn!(
                        "Agent missed the {:?} deadline; task left running",
                        self.settings.deadline
                    );
                }
                Err(ChatError::DeadlineExceeded)
            }
        }
    }
}
