//! `tracing` subscriber setup for embedders that do not install their own.

use tracing_subscriber::EnvFilter;

use crate::config::EnvConfig;

/// Filter directive derived from the environment.
///
/// `OMADA_CHAT_LOG` wins; otherwise `debug` when `OMADA_CHAT_DEBUG=1`, else
/// `info`.
pub fn filter_directive(config: &EnvConfig) -> String {
    match &config.chat_log {
        Some(directive) => directive.trim().to_owned(),
        None if config.chat_debug => "debug".to_owned(),
        None => "info".to_owned(),
    }
}

/// Installs a global fmt subscriber. Returns `false` when one is already set.
pub fn init_logging(config: &EnvConfig) -> bool {
    let directive = filter_directive(config);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
