//! Embeddable chat widget core.
//!
//! # Public API Overview
//! - Initialize a widget around any [`PresentationLayer`] with
//!   [`ChatWidget::builder`] and [`ChatWidgetBuilder::init`]. The effective
//!   configuration is resolved as `defaults < remote < overrides`.
//! - Drive it through the handle: `show`/`hide`/`toggle`, `update_config`,
//!   `reload_config`, `thread_id`, `reset_thread`.
//! - Use [`HeadlessChat`] to talk to the chat endpoint without a UI; every
//!   exchange runs through the same thread-continuity hooks.
//! - Read process settings with [`EnvConfig`] and install a `tracing`
//!   subscriber with [`init_logging`].

pub mod config;
pub mod error;
pub mod headless;
pub mod hooks;
pub mod logging;
pub mod widget;

pub use crate::config::EnvConfig;
pub use crate::error::WidgetError;
pub use crate::headless::HeadlessChat;
pub use crate::hooks::session_hooks;
pub use crate::logging::init_logging;
pub use crate::widget::{ChatWidget, ChatWidgetBuilder};

/// Configuration resolution and declarative settings.
pub use chat_config::{
    apply_remote_config, connect_url, default_config, resolve, ChatSettings, ConnectDescriptor,
    Position, WidgetConfig,
};

/// Presentation layer contract.
pub use presentation::{ChatHooks, PresentationInitError, PresentationLayer};

/// Thread continuity.
pub use thread_session::{HistoryEntry, Role, SubscriptionId, ThreadSession, ThreadState};

/// Transport clients.
pub use chat_api::{ChatApiConfig, ChatApiError, ConfigServiceClient};
