use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::agent::AgentError;

pub const TIMEOUT_STATUS: &str = "TIMEOUT_BUT_TX_MAY_BE_PROCESSING";

/// Body for a timeout reported by the agent itself
pub const UPSTREAM_TIMEOUT_MESSAGE: &str = "The request timed out, but if you submitted a transaction, it may still be processing. Please check your wallet or block explorer for confirmation.";

pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

#[derive(Debug, Error)]
pub enum ChatError {
    /// Malformed or missing request fields
    #[error("{0}")]
    Validation(String),

    /// The handler's own deadline fired before the agent settled
    #[error("Request timed out")]
    DeadlineExceeded,

    /// Agent construction or invocation failed
    #[error(transparent)]
    Agent(#[from] AgentError),

    /// Required secrets or settings are missing
    #[error("{0}")]
    Configuration(String),

    #[error("{0}")]
    Unexpected(String),
}

pub type ChatResult<T> = Result<T, ChatError>;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl ChatError {
    /// Anything other than a validation failure whose description
    /// mentions "timeout" travels the same 504 path as a missed deadline.
    fn is_upstream_timeout(&self) -> bool {
        match self {
            ChatError::Validation(_) | ChatError::DeadlineExceeded => false,
            ChatError::Agent(e) => e.is_timeout(),
            other => other.to_string().contains("timeout"),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ChatError::Validation(_) => StatusCode::BAD_REQUEST,
            ChatError::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
            e if e.is_upstream_timeout() => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> ErrorBody {
        match self {
            ChatError::Validation(msg) => ErrorBody {
                error: msg.clone(),
                status: None,
            },
            ChatError::DeadlineExceeded => ErrorBody {
                error: self.to_string(),
                status: Some(TIMEOUT_STATUS.to_string()),
            },
            e if e.is_upstream_timeout() => ErrorBody {
                error: UPSTREAM_TIMEOUT_MESSAGE.to_string(),
                status: Some(TIMEOUT_STATUS.to_string()),
            },
            other => {
                let message = other.to_string();
                ErrorBody {
                    error: if message.is_empty() {
                        UNEXPECTED_ERROR_MESSAGE.to_string()
                    } else {
                        message
                    },
                    status: None,
                }
            }
        }
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.body())).into_response()
    }
}
