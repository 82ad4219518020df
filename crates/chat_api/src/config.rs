use std::collections::BTreeMap;
use std::time::Duration;

use crate::retry::{BASE_DELAY_MS, MAX_RETRIES};
use crate::url::DEFAULT_CONFIG_SERVICE_URL;

/// Transport configuration for config service requests.
#[derive(Debug, Clone)]
pub struct ChatApiConfig {
    /// Base URL of the config service.
    pub config_service_url: String,
    /// Optional `User-Agent` override.
    pub user_agent: Option<String>,
    /// Additional headers merged into request headers.
    pub extra_headers: BTreeMap<String, String>,
    /// Optional request timeout.
    pub timeout: Option<Duration>,
}

impl Default for ChatApiConfig {
    fn default() -> Self {
        Self {
            config_service_url: DEFAULT_CONFIG_SERVICE_URL.to_string(),
            user_agent: None,
            extra_headers: BTreeMap::new(),
            timeout: None,
        }
    }
}

impl ChatApiConfig {
    pub fn new(config_service_url: impl Into<String>) -> Self {
        Self {
            config_service_url: config_service_url.into(),
            ..Self::default()
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn insert_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.insert(key.into(), value.into());
        self
    }
}

/// Transport configuration for one chat endpoint.
#[derive(Debug, Clone)]
pub struct ChatStreamConfig {
    /// Fully resolved chat endpoint.
    pub url: String,
    /// Ask for `text/event-stream` when true, a single JSON reply otherwise.
    pub stream: bool,
    /// Headers from the connect descriptor, e.g. `Authorization`.
    pub headers: BTreeMap<String, String>,
    pub user_agent: Option<String>,
    pub timeout: Option<Duration>,
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry; doubles per attempt.
    pub retry_base_delay: Duration,
}

impl ChatStreamConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            stream: true,
            headers: BTreeMap::new(),
            user_agent: None,
            timeout: None,
            max_retries: MAX_RETRIES,
            retry_base_delay: Duration::from_millis(BASE_DELAY_MS),
        }
    }

    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    pub fn with_headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_retry_policy(mut self, max_retries: u32, base_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_base_delay = base_delay;
        self
    }
}
