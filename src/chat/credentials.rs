use serde::{Deserialize, Serialize};

use crate::error::ChatError;

/// Secrets needed to stand up an agent. Read per request, never cached.
#[derive(Clone)]
pub struct Credentials {
    pub agent_api_key: String,
    pub llm_api_key: String,
    pub private_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("agent_api_key", &"<redacted>")
            .field("llm_api_key", &"<redacted>")
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Where the handler gets its secrets from
pub trait CredentialSource: Send + Sync {
    fn load(&self) -> Result<Credentials, ChatError>;
}

/// Names of the environment variables holding the secrets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialEnvNames {
    #[serde(default = "default_agent_api_key_var")]
    pub agent_api_key: String,
    #[serde(default = "default_llm_api_key_var")]
    pub llm_api_key: String,
    #[serde(default = "default_private_key_var")]
    pub private_key: String,
}

fn default_agent_api_key_var() -> String {
    "BRIAN_API_KEY".to_string()
}

fn default_llm_api_key_var() -> String {
    "API_KEY_OPENAI".to_string()
}

fn default_private_key_var() -> String {
    "AGENT_PRIVATE_KEY".to_string()
}

impl Default for CredentialEnvNames {
    fn default() -> Self {
        Self {
            agent_api_key: default_agent_api_key_var(),
            llm_api_key: default_llm_api_key_var(),
            private_key: default_private_key_var(),
        }
    }
}

/// Reads secrets from the process environment on every call
#[derive(Debug, Clone, Default)]
pub struct EnvCredentialSource {
    names: CredentialEnvNames,
}

impl EnvCredentialSource {
    pub fn new(names: CredentialEnvNames) -> Self {
        Self { names }
    }
}

impl CredentialSource for EnvCredentialSource {
    fn load(&self) -> Result<Credentials, ChatError> {
        let read = |name: &str| {
            std::env::var(name).map_err(|_| {
                ChatError::Configuration(format!("Environment variable {} is not set", name))
            })
        };

        // Same order the secrets are consumed in: signing key first
        let private_key = read(&self.names.private_key)?;
        let agent_api_key = read(&self.names.agent_api_key)?;
        let llm_api_key = read(&self.names.llm_api_key)?;

        Ok(Credentials {
            agent_api_key,
            llm_api_key,
            private_key,
        })
    }
}

/// Fixed secrets, injected at construction time
#[derive(Debug, Clone)]
pub struct StaticCredentialSource(pub Credentials);

impl CredentialSource for StaticCredentialSource {
    fn load(&self) -> Result<Credentials, ChatError> {
        Ok(self.0.clone())
    }
}

/// Prefix `0x` when missing. No length or charset validation.
pub fn normalize_private_key(key: &str) -> String {
    if key.starts_with("0x") {
        key.to_string()
    } else {
        format!("0x{}", key)
    }
}
