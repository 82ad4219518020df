//! Environment configuration.

use std::env;
use std::time::Duration;

use chat_api::ChatApiConfig;

pub const ENV_CONFIG_SERVICE_URL: &str = "OMADA_CONFIG_SERVICE_URL";
pub const ENV_CHAT_DEBUG: &str = "OMADA_CHAT_DEBUG";
pub const ENV_CHAT_LOG: &str = "OMADA_CHAT_LOG";
pub const ENV_HTTP_TIMEOUT_MS: &str = "OMADA_HTTP_TIMEOUT_MS";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvConfig {
    pub config_service_url: Option<String>,
    pub chat_debug: bool,
    pub chat_log: Option<String>,
    pub http_timeout: Option<Duration>,
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self {
            config_service_url: env_string_opt(ENV_CONFIG_SERVICE_URL),
            chat_debug: env_flag(ENV_CHAT_DEBUG),
            chat_log: env_string_opt(ENV_CHAT_LOG),
            http_timeout: env_string_opt(ENV_HTTP_TIMEOUT_MS)
                .and_then(|value| value.trim().parse::<u64>().ok())
                .filter(|millis| *millis > 0)
                .map(Duration::from_millis),
        }
    }

    /// Transport settings for the config service client.
    pub fn api_config(&self) -> ChatApiConfig {
        let mut config = match &self.config_service_url {
            Some(url) => ChatApiConfig::new(url.trim()),
            None => ChatApiConfig::default(),
        };
        if let Some(timeout) = self.http_timeout {
            config = config.with_timeout(timeout);
        }
        config
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|value| value == "1").unwrap_or(false)
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}
