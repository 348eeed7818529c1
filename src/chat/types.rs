use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ChatError;

pub const INPUT_REQUIRED: &str = "Input is required";
pub const MESSAGES_NOT_ARRAY: &str = "Messages must be an array";

/// Returned alongside every successful answer
pub const TX_DISCLAIMER: &str = "If you submitted a transaction, it may still be processing even if this request times out. You can check your wallet or block explorer for confirmation.";

/// Speaker of a turn, as the agent expects it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Human,
    Assistant,
}

impl Role {
    /// `"user"` is the only client role that maps to the human side;
    /// everything else, including a missing role, is the assistant.
    pub fn from_client_role(role: Option<&str>) -> Self {
        match role {
            Some("user") => Role::Human,
            _ => Role::Assistant,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

/// A prior message as the browser sent it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientMessage {
    pub role: Option<String>,
    pub content: String,
}

impl ClientMessage {
    /// Primitive elements carry no fields and read as a role-less, empty
    /// message; a `null` element has nothing to read from at all.
    fn from_value(index: usize, value: &Value) -> Result<Self, ChatError> {
        if value.is_null() {
            return Err(ChatError::Unexpected(format!(
                "Cannot read message at index {}: element is null",
                index
            )));
        }
        let role = value.get("role").and_then(|v| v.as_str()).map(str::to_string);
        let content = match value.get("content") {
            Some(Value::String(s)) => s.clone(),
            None | Some(Value::Null) => String::new(),
            Some(other) => other.to_string(),
        };
        Ok(Self { role, content })
    }
}

/// A validated chat turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub input: String,
    pub messages: Option<Vec<ClientMessage>>,
}

impl ChatRequest {
    /// Validate a decoded request body. Fails fast on the first problem.
    ///
    /// Field presence follows JavaScript truthiness, which is what the
    /// browser client was written against: `null`, `false`, `0` and `""`
    /// all count as absent.
    pub fn from_value(body: &Value) -> Result<Self, ChatError> {
        let input = match body.get("input") {
            Some(v) if is_truthy(v) => v,
            _ => return Err(ChatError::Validation(INPUT_REQUIRED.to_string())),
        };
        let input = match input {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };

        let messages = match body.get("messages") {
            Some(Value::Array(items)) => Some(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, v)| ClientMessage::from_value(i, v))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Some(v) if is_truthy(v) => {
                return Err(ChatError::Validation(MESSAGES_NOT_ARRAY.to_string()))
            }
            _ => None,
        };

        Ok(Self { input, messages })
    }

    pub fn history(&self) -> Vec<ConversationTurn> {
        format_history(self.messages.as_deref())
    }
}

/// Map client messages onto agent conversation turns. Lossy: every
/// non-`"user"` role collapses into `assistant`.
pub fn format_history(messages: Option<&[ClientMessage]>) -> Vec<ConversationTurn> {
    messages
        .unwrap_or_default()
        .iter()
        .map(|msg| ConversationTurn {
            role: Role::from_client_role(msg.role.as_deref()),
            content: msg.content.clone(),
        })
        .collect()
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Successful answer body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub result: String,
    pub message: String,
}

impl ChatResponse {
    pub fn new(result: String) -> Self {
        Self {
            result,
            message: TX_DISCLAIMER.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validation_message(body: Value) -> String {
        match ChatRequest::from_value(&body) {
            Err(ChatError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn falsy_input_is_rejected() {
        for body in [
            json!({}),
            json!({"input": null}),
            json!({"input": ""}),
            json!({"input": false}),
            json!({"input": 0}),
            json!("not an object"),
        ] {
            assert_eq!(validation_message(body), INPUT_REQUIRED);
        }
    }

    #[test]
    fn non_array_messages_are_rejected() {
        for messages in [json!({"role": "user"}), json!("hi"), json!(3), json!(true)] {
            let body = json!({"input": "hello", "messages": messages});
            assert_eq!(validation_message(body), MESSAGES_NOT_ARRAY);
        }
    }

    #[test]
    fn input_is_checked_before_messages() {
        let body = json!({"messages": "oops"});
        assert_eq!(validation_message(body), INPUT_REQUIRED);
    }

    #[test]
    fn falsy_messages_count_as_absent() {
        for messages in [json!(null), json!(""), json!(false), json!(0)] {
            let body = json!({"input": "hello", "messages": messages});
            let request = ChatRequest::from_value(&body).unwrap();
            assert!(request.messages.is_none());
            assert!(request.history().is_empty());
        }
    }

    #[test]
    fn null_message_element_is_an_unexpected_error() {
        let body = json!({"input": "hello", "messages": [{"role": "user", "content": "hi"}, null]});
        match ChatRequest::from_value(&body) {
            Err(ChatError::Unexpected(msg)) => assert!(msg.contains("index 1")),
            other => panic!("expected unexpected error, got {other:?}"),
        }
    }

    #[test]
    fn primitive_message_elements_read_as_empty_assistant_turns() {
        let body = json!({"input": "hello", "messages": ["s", 7, {"role": "user"}]});
        let history = ChatRequest::from_value(&body).unwrap().history();
        assert_eq!(
            history,
            vec![
                ConversationTurn { role: Role::Assistant, content: String::new() },
                ConversationTurn { role: Role::Assistant, content: String::new() },
                ConversationTurn { role: Role::Human, content: String::new() },
            ]
        );
    }

    #[test]
    fn non_string_input_is_forwarded_as_json_text() {
        let request = ChatRequest::from_value(&json!({"input": 42})).unwrap();
        assert_eq!(request.input, "42");
    }

    #[test]
    fn roles_map_user_to_human_and_everything_else_to_assistant() {
        let body = json!({
            "input": "swap 1 ETH for USDC",
            "messages": [
                {"role": "user", "content": "hi"},
                {"role": "assistant", "content": "hello"},
                {"role": "system", "content": "be nice"},
                {"role": "User", "content": "caps"},
                {"content": "no role"}
            ]
        });
        let roles: Vec<Role> = ChatRequest::from_value(&body)
            .unwrap()
            .history()
            .into_iter()
            .map(|turn| turn.role)
            .collect();
        assert_eq!(
            roles,
            vec![
                Role::Human,
                Role::Assistant,
                Role::Assistant,
                Role::Assistant,
                Role::Assistant
            ]
        );
    }

    #[test]
    fn history_keeps_order_and_content() {
        let messages = vec![
            ClientMessage {
                role: Some("user".into()),
                content: "first".into(),
            },
            ClientMessage {
                role: Some("assistant".into()),
                content: "second".into(),
            },
        ];
        let history = format_history(Some(&messages));
        assert_eq!(history[0].content, "first");
        assert_eq!(history[1].content, "second");
        assert!(format_history(None).is_empty());
    }

    #[test]
    fn turn_roles_serialize_lowercase() {
        let turn = ConversationTurn {
            role: Role::Human,
            content: "hi".into(),
        };
        assert_eq!(
            serde_json::to_value(&turn).unwrap(),
            json!({"role": "human", "content": "hi"})
        );
    }
}
