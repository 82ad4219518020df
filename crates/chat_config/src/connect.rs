use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::WidgetConfig;

/// Default host for agent streaming endpoints.
pub const DEFAULT_CONNECT_BASE_URL: &str = "https://ds4i1tjnjs35d.cloudfront.net";

/// Placeholder the presentation layer replaces with the typed message.
pub const MESSAGES_PLACEHOLDER: &str = "{{text}}";

/// Body format understood by the chat backend.
pub const BODY_FORMAT: &str = "string";

pub const HEADER_AUTHORIZATION: &str = "Authorization";

/// Resolves the chat endpoint for a configuration.
///
/// Resolution order:
/// 1) explicit `connectUrl`
/// 2) `{baseUrl}/sse/workspaces/{workspaceId}/chat-agents/{agentId}/chat/stream`
///    when both ids are set
/// 3) none
pub fn connect_url(config: &WidgetConfig) -> Option<String> {
    if let Some(url) = config.connect_url() {
        return Some(url.to_owned());
    }

    let (agent_id, workspace_id) = (config.agent_id()?, config.workspace_id()?);
    let base_url = config
        .base_url()
        .unwrap_or(DEFAULT_CONNECT_BASE_URL)
        .trim_end_matches('/');
    Some(format!(
        "{base_url}/sse/workspaces/{workspace_id}/chat-agents/{agent_id}/chat/stream"
    ))
}

/// Request body template sent with every chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestBodyTemplate {
    pub messages: String,
    pub format: String,
    pub thread_id: String,
}

impl Default for RequestBodyTemplate {
    fn default() -> Self {
        Self {
            messages: MESSAGES_PLACEHOLDER.to_owned(),
            format: BODY_FORMAT.to_owned(),
            thread_id: String::new(),
        }
    }
}

/// How the presentation layer reaches the chat backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectDescriptor {
    pub url: Option<String>,
    pub method: String,
    pub websocket: bool,
    pub stream: bool,
    pub headers: BTreeMap<String, String>,
    pub body: RequestBodyTemplate,
}

impl ConnectDescriptor {
    #[must_use]
    pub fn from_config(config: &WidgetConfig) -> Self {
        let mut headers = BTreeMap::new();
        if let Some(token) = config.access_token() {
            headers.insert(HEADER_AUTHORIZATION.to_owned(), format!("Bearer {token}"));
        }

        Self {
            url: connect_url(config),
            method: "POST".to_owned(),
            websocket: config.websocket(),
            stream: config.streaming(),
            headers,
            body: RequestBodyTemplate::default(),
        }
    }
}
