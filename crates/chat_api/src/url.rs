use url::Url;

use crate::error::ChatApiError;

/// Default base URL of the config service.
pub const DEFAULT_CONFIG_SERVICE_URL: &str =
    "https://wvetisz2v3.execute-api.us-west-2.amazonaws.com/dev";

/// Build `{base}/chat/workspaces/{workspace_id}/chat-ui-config`.
///
/// An empty base falls back to [`DEFAULT_CONFIG_SERVICE_URL`]. The workspace
/// id is percent-encoded as a single path segment.
pub fn chat_ui_config_url(base: &str, workspace_id: &str) -> Result<Url, ChatApiError> {
    let base = if base.trim().is_empty() {
        DEFAULT_CONFIG_SERVICE_URL
    } else {
        base.trim()
    };

    let mut url = Url::parse(base).map_err(|error| ChatApiError::InvalidBaseUrl(format!("{base}: {error}")))?;
    url.path_segments_mut()
        .map_err(|_| ChatApiError::InvalidBaseUrl(format!("{base}: cannot be a base URL")))?
        .pop_if_empty()
        .extend(["chat", "workspaces", workspace_id, "chat-ui-config"]);
    Ok(url)
}
