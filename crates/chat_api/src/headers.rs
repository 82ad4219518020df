use std::collections::BTreeMap;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::config::{ChatApiConfig, ChatStreamConfig};
use crate::error::ChatApiError;

pub const HEADER_ACCEPT: &str = "accept";
pub const HEADER_CONTENT_TYPE: &str = "content-type";
pub const HEADER_USER_AGENT: &str = "user-agent";

pub const EVENT_STREAM: &str = "text/event-stream";
pub const APPLICATION_JSON: &str = "application/json";

/// `User-Agent` sent when no override is configured.
pub fn default_user_agent() -> String {
    format!("omada-chat/{}", env!("CARGO_PKG_VERSION"))
}

/// Headers for a config service `GET`.
pub fn build_config_headers(config: &ChatApiConfig) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    headers.insert(HEADER_ACCEPT.to_owned(), APPLICATION_JSON.to_owned());
    headers.insert(
        HEADER_USER_AGENT.to_owned(),
        resolve_user_agent(config.user_agent.as_deref()),
    );
    merge_extra(&mut headers, &config.extra_headers);
    headers
}

/// Headers for a chat `POST`. Descriptor headers are applied last so they can
/// override the defaults.
pub fn build_stream_headers(config: &ChatStreamConfig) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    let accept = if config.stream { EVENT_STREAM } else { APPLICATION_JSON };
    headers.insert(HEADER_ACCEPT.to_owned(), accept.to_owned());
    headers.insert(HEADER_CONTENT_TYPE.to_owned(), APPLICATION_JSON.to_owned());
    headers.insert(
        HEADER_USER_AGENT.to_owned(),
        resolve_user_agent(config.user_agent.as_deref()),
    );
    merge_extra(&mut headers, &config.headers);
    headers
}

/// Converts a deterministic header map into a `reqwest` [`HeaderMap`].
pub fn to_header_map(headers: &BTreeMap<String, String>) -> Result<HeaderMap, ChatApiError> {
    let mut out = HeaderMap::new();
    for (key, value) in headers {
        out.insert(
            HeaderName::from_bytes(key.as_bytes())
                .map_err(|_| ChatApiError::InvalidHeader(format!("invalid header key: {key}")))?,
            HeaderValue::from_str(value).map_err(|_| {
                ChatApiError::InvalidHeader(format!("invalid header value for {key}"))
            })?,
        );
    }
    Ok(out)
}

fn resolve_user_agent(explicit: Option<&str>) -> String {
    explicit
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
        .unwrap_or_else(default_user_agent)
}

fn merge_extra(headers: &mut BTreeMap<String, String>, extra: &BTreeMap<String, String>) {
    for (key, value) in extra {
        let key = key.trim().to_ascii_lowercase();
        if key.is_empty() {
            continue;
        }
        headers.insert(key, value.trim().to_owned());
    }
}
