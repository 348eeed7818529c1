use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use anyhow::Result;
use regex::Regex;
use tracing::debug;

use crate::agent::{DEFAULT_LLM_TIMEOUT_MS, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use crate::chat::CredentialEnvNames;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server_config: ServerConfig,
    #[serde(default)]
    pub agent_service_config: AgentServiceConfig,
    #[serde(default)]
    pub chat_config: ChatConfig,
    /// Environment variable names for the secrets; the secrets themselves
    /// never live in the config file
    #[serde(default)]
    pub credential_env: CredentialEnvNames,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Hard ceiling on a single request, chat deadline included
    #[serde(default = "default_max_duration_secs")]
    pub max_duration_secs: u64,
    /// Built web front-end, served for every path the API does not claim
    #[serde(default)]
    pub static_dir: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_duration_secs() -> u64 {
    60
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_duration_secs: default_max_duration_secs(),
            static_dir: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentServiceConfig {
    #[serde(default = "default_agent_service_url")]
    pub base_url: String,
}

fn default_agent_service_url() -> String {
    "http://localhost:8000".to_string()
}

impl Default for AgentServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_agent_service_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_llm_timeout_ms")]
    pub llm_timeout_ms: u64,
    #[serde(default = "default_deadline_ms")]
    pub deadline_ms: u64,
    #[serde(default)]
    pub cancel_on_timeout: bool,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_llm_timeout_ms() -> u64 {
    DEFAULT_LLM_TIMEOUT_MS
}

fn default_deadline_ms() -> u64 {
    55_000
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            llm_timeout_ms: default_llm_timeout_ms(),
            deadline_ms: default_deadline_ms(),
            cancel_on_timeout: false,
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            anyhow::bail!("Configuration file not found: {}", path);
        }
        let content = fs::read_to_string(path)?;
        let content = substitute_env_vars(&content)?;

        let path_lower = path.to_lowercase();
        let config = if path_lower.ends_with(".json") {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };
        Ok(config)
    }

    /// Try `CONFIG_PATH` and then the usual file names; fall back to the
    /// built-in defaults when none exist. Returns where it loaded from.
    pub fn discover() -> Result<(Self, Option<String>)> {
        Self::discover_from(std::env::var("CONFIG_PATH").ok())
    }

    /// An explicitly named file must exist; the default names are optional.
    fn discover_from(explicit: Option<String>) -> Result<(Self, Option<String>)> {
        if let Some(path) = explicit {
            let config = Self::load(&path)?;
            return Ok((config, Some(path)));
        }

        for path in ["conf.yaml", "conf.json"] {
            if !Path::new(path).exists() {
                debug!("No config at {}", path);
                continue;
            }
            // A config that exists but does not parse is fatal
            let config = Self::load(path)?;
            return Ok((config, Some(path.to_string())));
        }

        Ok((Self::default(), None))
    }

    pub fn validate(&self) -> Result<()> {
        let chat = &self.chat_config;
        if chat.deadline_ms == 0 {
            anyhow::bail!("chat_config.deadline_ms must be positive");
        }
        if chat.deadline_ms / 1000 >= self.server_config.max_duration_secs {
            anyhow::bail!(
                "chat_config.deadline_ms ({}) must leave headroom under server_config.max_duration_secs ({})",
                chat.deadline_ms,
                self.server_config.max_duration_secs
            );
        }
        Ok(())
    }
}

/// Replace `${VAR_NAME}` with the variable's value; unknown variables are
/// left as written
fn substitute_env_vars(content: &str) -> Result<String> {
    let pattern = Regex::new(r"\$\{(\w+)\}")?;
    let replaced = pattern.replace_all(content, |caps: &regex::Captures| {
        std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
    });
    Ok(replaced.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, content: &str) -> String {
        let path = std::env::temp_dir().join(format!("{}-{}", uuid::Uuid::new_v4(), name));
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path.to_string_lossy().to_string()
    }

    #[test]
    fn defaults_match_hosting_limits() {
        let config = Config::default();
        assert_eq!(config.chat_config.deadline_ms, 55_000);
        assert_eq!(config.server_config.max_duration_secs, 60);
        assert!(!config.chat_config.cancel_on_timeout);
        assert_eq!(config.credential_env.private_key, "AGENT_PRIVATE_KEY");
        config.validate().unwrap();
    }

    #[test]
    fn loads_partial_yaml_with_defaults() {
        let path = write_temp(
            "conf.yaml",
            "server_config:\n  port: 8080\nchat_config:\n  cancel_on_timeout: true\n",
        );
        let config = Config::load(&path).unwrap();
        assert_eq!(config.server_config.port, 8080);
        assert!(config.chat_config.cancel_on_timeout);
        assert_eq!(config.chat_config.model, "gpt-4o");
        assert_eq!(config.agent_service_config.base_url, "http://localhost:8000");
    }

    #[test]
    fn loads_json_by_extension() {
        let path = write_temp("conf.json", r#"{"chat_config": {"deadline_ms": 1000}}"#);
        let config = Config::load(&path).unwrap();
        assert_eq!(config.chat_config.deadline_ms, 1000);
    }

    #[test]
    fn substitutes_known_env_vars_only() {
        std::env::set_var("SOUL_TEST_AGENT_URL_91c2", "http://agent:9000");
        let out = substitute_env_vars("a: ${SOUL_TEST_AGENT_URL_91c2}\nb: ${SOUL_TEST_MISSING_91c2}")
            .unwrap();
        assert_eq!(out, "a: http://agent:9000\nb: ${SOUL_TEST_MISSING_91c2}");
    }

    #[test]
    fn deadline_must_fit_under_ceiling() {
        let mut config = Config::default();
        config.chat_config.deadline_ms = 60_000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn explicit_path_to_missing_file_is_an_error() {
        let err = Config::discover_from(Some("/definitely/not/here/conf.yaml".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here/conf.yaml"));
    }

    #[test]
    fn explicit_path_is_loaded() {
        let path = write_temp("conf.yaml", "server_config:\n  port: 9090\n");
        let (config, loaded_from) = Config::discover_from(Some(path.clone())).unwrap();
        assert_eq!(config.server_config.port, 9090);
        assert_eq!(loaded_from, Some(path));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(Config::load("/definitely/not/here/conf.yaml").is_err());
    }
}
