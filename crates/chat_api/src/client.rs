use reqwest::Client;
use serde_json::{Map, Value};
use tracing::{debug, warn};
use url::Url;

use crate::config::ChatApiConfig;
use crate::error::{parse_error_message, ChatApiError};
use crate::headers::{build_config_headers, to_header_map};
use crate::url::chat_ui_config_url;

/// Fetches per-workspace UI configuration from the config service.
#[derive(Debug, Clone)]
pub struct ConfigServiceClient {
    http: Client,
    config: ChatApiConfig,
}

impl ConfigServiceClient {
    pub fn new(config: ChatApiConfig) -> Result<Self, ChatApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ChatApiError::from)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ChatApiConfig {
        &self.config
    }

    pub fn endpoint_for(&self, workspace_id: &str) -> Result<Url, ChatApiError> {
        chat_ui_config_url(&self.config.config_service_url, workspace_id)
    }

    /// `GET {base}/chat/workspaces/{workspace_id}/chat-ui-config`.
    ///
    /// The body must be a JSON object; anything else is
    /// [`ChatApiError::InvalidConfigBody`].
    pub async fn fetch_chat_ui_config(
        &self,
        workspace_id: &str,
    ) -> Result<Map<String, Value>, ChatApiError> {
        let url = self.endpoint_for(workspace_id)?;
        let headers = to_header_map(&build_config_headers(&self.config))?;
        debug!(url = %url, "fetching chat ui config");

        let response = self.http.get(url).headers(headers).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ChatApiError::Status(
                status,
                parse_error_message(status, &body),
            ));
        }

        match serde_json::from_str::<Value>(&body) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(ChatApiError::InvalidConfigBody(format!(
                "expected a JSON object, got {}",
                value_type_name(&other)
            ))),
            Err(error) => Err(ChatApiError::InvalidConfigBody(error.to_string())),
        }
    }

    /// Like [`Self::fetch_chat_ui_config`] but every failure is logged and
    /// reported as `None`.
    pub async fn fetch_remote_config(&self, workspace_id: &str) -> Option<Map<String, Value>> {
        match self.fetch_chat_ui_config(workspace_id).await {
            Ok(map) => {
                debug!(workspace_id = %workspace_id, keys = map.len(), "loaded remote chat config");
                Some(map)
            }
            Err(error) => {
                warn!(workspace_id = %workspace_id, error = %error, "failed to fetch remote chat config");
                None
            }
        }
    }
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
