use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 4096;
pub const DEFAULT_LLM_TIMEOUT_MS: u64 = 55_000;

/// Configuration for the model backend the agent consults internally.
/// Opaque to the proxy: it is passed through to the agent runtime as-is.
#[derive(Clone, Serialize, Deserialize)]
pub struct LlmClient {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_ms: u64,
    pub api_key: String,
}

impl LlmClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_ms: DEFAULT_LLM_TIMEOUT_MS,
            api_key: api_key.into(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl std::fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmClient")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_ms", &self.timeout_ms)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_hosted_agent_profile() {
        let llm = LlmClient::new("sk-test");
        assert_eq!(llm.model, "gpt-4o");
        assert_eq!(llm.temperature, 0.7);
        assert_eq!(llm.max_tokens, 4096);
        assert_eq!(llm.timeout(), Duration::from_millis(55_000));
    }

    #[test]
    fn debug_hides_api_key() {
        let rendered = format!("{:?}", LlmClient::new("sk-secret"));
        assert!(!rendered.contains("sk-secret"));
    }
}
