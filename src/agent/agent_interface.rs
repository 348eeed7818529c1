use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chat::ConversationTurn;

/// Input handed to an agent for a single chat turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentInput {
    /// The user's current message
    pub input: String,
    /// Prior turns, oldest first
    pub history: Vec<ConversationTurn>,
}

/// What an agent hands back once it has finished reasoning/executing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentOutput {
    #[serde(default)]
    pub output: String,
}

/// Failures raised while constructing or invoking an agent
#[derive(Debug, Error)]
pub enum AgentError {
    /// The agent's own client-side timeout elapsed
    #[error("agent request timeout: {0}")]
    Timeout(String),

    /// The agent runtime answered with a non-success HTTP status
    #[error("agent runtime returned {status}: {message}")]
    Rejected { status: u16, message: String },

    /// The agent ran but reported a failure
    #[error("{0}")]
    Failed(String),

    #[error("agent runtime unreachable: {0}")]
    Transport(#[from] reqwest::Error),
}

impl AgentError {
    /// Timeout classification used when mapping to an HTTP response.
    ///
    /// A typed timeout always counts; any other failure counts when its
    /// message mentions "timeout" (case-sensitive), since upstream
    /// runtimes only report their own deadlines as text.
    pub fn is_timeout(&self) -> bool {
        match self {
            AgentError::Timeout(_) => true,
            AgentError::Transport(e) if e.is_timeout() => true,
            other => other.to_string().contains("timeout"),
        }
    }
}

/// A stateful agent bound to credentials and a model configuration
#[async_trait]
pub trait Agent: Send + Sync {
    /// Run one chat turn. May perform side effects (e.g. submit a
    /// transaction) that outlive the caller's interest in the result.
    async fn invoke(&self, input: AgentInput) -> Result<AgentOutput, AgentError>;
}
