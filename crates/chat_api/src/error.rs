use std::fmt;

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Error as JsonError;

#[derive(Debug)]
pub enum ChatApiError {
    InvalidBaseUrl(String),
    MissingConnectUrl,
    InvalidHeader(String),
    Request(reqwest::Error),
    Status(StatusCode, String),
    InvalidConfigBody(String),
    Serde(JsonError),
    StreamFailed {
        message: String,
    },
    RetryExhausted {
        status: Option<StatusCode>,
        last_error: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    error: Option<ErrorPayloadValue>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorPayloadValue {
    Text(String),
    Fields { message: Option<String> },
}

impl ErrorPayload {
    fn message(&self) -> Option<&str> {
        let nested = match &self.error {
            Some(ErrorPayloadValue::Text(text)) => Some(text.as_str()),
            Some(ErrorPayloadValue::Fields { message }) => message.as_deref(),
            None => None,
        };
        nested
            .or(self.message.as_deref())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

impl fmt::Display for ChatApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBaseUrl(value) => write!(f, "invalid base URL: {value}"),
            Self::MissingConnectUrl => write!(f, "chat endpoint URL is required"),
            Self::InvalidHeader(message) => write!(f, "invalid header: {message}"),
            Self::Request(error) => write!(f, "request error: {error}"),
            Self::Status(status, message) => write!(f, "HTTP {status} {message}"),
            Self::InvalidConfigBody(message) => {
                write!(f, "config service returned an invalid body: {message}")
            }
            Self::Serde(error) => write!(f, "serialization error: {error}"),
            Self::StreamFailed { message } => write!(f, "stream failed: {message}"),
            Self::RetryExhausted { status, last_error } => {
                let status = status
                    .map(|status| status.as_u16().to_string())
                    .unwrap_or_else(|| "n/a".to_owned());
                write!(
                    f,
                    "retry exhausted after max attempts (status: {status}, last_error: {last_error:?})"
                )
            }
        }
    }
}

impl std::error::Error for ChatApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Request(error) => Some(error),
            Self::Serde(error) => Some(error),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ChatApiError {
    fn from(error: reqwest::Error) -> Self {
        Self::Request(error)
    }
}

impl From<JsonError> for ChatApiError {
    fn from(error: JsonError) -> Self {
        Self::Serde(error)
    }
}

/// Extracts a readable message from an error response body.
///
/// Understands `{"error": "..."}`, `{"error": {"message": "..."}}` and
/// `{"message": "..."}`; anything else is returned verbatim, and an empty body
/// falls back to the status reason.
pub fn parse_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ErrorPayload>(body) {
        if let Some(message) = payload.message() {
            return message.to_owned();
        }
    }

    if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        body.to_string()
    }
}
