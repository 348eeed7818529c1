use serde::{Deserialize, Serialize};
use reqwest::Client;
use std::time::Duration;

use crate::agent::{AgentError, LlmClient};
use crate::chat::ConversationTurn;

const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(3);

/// HTTP client for the agent runtime sidecar, which hosts the blockchain
/// agent SDK and its LLM client
#[derive(Debug, Clone)]
pub struct AgentServiceClient {
    client: Client,
    base_url: String,
}

#[derive(Serialize, Deserialize)]
pub struct AgentCredentialsPayload {
    pub api_key: String,
    pub private_key: String,
}

#[derive(Serialize, Deserialize)]
pub struct AgentInvokeRequest {
    pub input: String,
    pub history: Vec<ConversationTurn>,
    pub credentials: AgentCredentialsPayload,
    pub llm: LlmClient,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AgentInvokeResponse {
    #[serde(default)]
    pub output: String,
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

fn default_success() -> bool {
    true
}

impl AgentServiceClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn invoke(
        &self,
        request: &AgentInvokeRequest,
        timeout: Duration,
    ) -> Result<AgentInvokeResponse, AgentError> {
        let url = format!("{}/agent/invoke", self.base_url);
        let response = self
            .client
            .post(&url)
            .timeout(timeout)
            .json(request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AgentError::Rejected {
                status: status.as_u16(),
                message: extract_error_message(&message),
            });
        }

        let result: AgentInvokeResponse = response.json().await.map_err(map_transport_error)?;
        if !result.success {
            return Err(AgentError::Failed(
                result
                    .error
                    .unwrap_or_else(|| "Agent runtime reported a failure".to_string()),
            ));
        }
        Ok(result)
    }

    pub async fn health_check(&self) -> anyhow::Result<bool> {
        self.health_check_within(HEALTH_CHECK_TIMEOUT).await
    }

    pub async fn health_check_within(&self, timeout: Duration) -> anyhow::Result<bool> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).timeout(timeout).send().await?;
        Ok(response.status().is_success())
    }
}

fn map_transport_error(e: reqwest::Error) -> AgentError {
    if e.is_timeout() {
        AgentError::Timeout(e.to_string())
    } else {
        AgentError::Transport(e)
    }
}

/// Pull `error` out of a JSON error body, falling back to the raw text
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}
