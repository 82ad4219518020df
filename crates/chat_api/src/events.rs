use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One reply event from the chat endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatStreamEvent {
    /// A reply fragment. `text` is the payload's `text` field when present.
    Message { text: Option<String>, payload: Value },
    /// The payload carried an `error` field.
    Error { message: String, payload: Value },
}

impl ChatStreamEvent {
    /// Classifies a decoded payload.
    pub fn from_payload(payload: Value) -> Self {
        match payload.get("error") {
            Some(error) if !error.is_null() => {
                let message = match error {
                    Value::String(text) => text.clone(),
                    other => other
                        .get("message")
                        .and_then(Value::as_str)
                        .map(ToString::to_string)
                        .unwrap_or_else(|| other.to_string()),
                };
                Self::Error { message, payload }
            }
            _ => {
                let text = match &payload {
                    Value::String(text) => Some(text.clone()),
                    other => other
                        .get("text")
                        .and_then(Value::as_str)
                        .map(ToString::to_string),
                };
                Self::Message { text, payload }
            }
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Message { text, .. } => text.as_deref(),
            Self::Error { .. } => None,
        }
    }

    pub fn payload(&self) -> &Value {
        match self {
            Self::Message { payload, .. } | Self::Error { payload, .. } => payload,
        }
    }

    pub fn into_payload(self) -> Value {
        match self {
            Self::Message { payload, .. } | Self::Error { payload, .. } => payload,
        }
    }
}
