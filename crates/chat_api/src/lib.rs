//! Transport-only primitives for the chat widget backend.
//!
//! Two endpoints are covered: the config service serving per-workspace UI
//! configuration, and the agent chat endpoint streaming replies as
//! server-sent events. This crate knows nothing about widget option
//! precedence or thread continuity; callers pass in finished request bodies
//! and get parsed events back.

pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod headers;
pub mod retry;
pub mod sse;
pub mod stream;
pub mod url;

pub use client::ConfigServiceClient;
pub use config::{ChatApiConfig, ChatStreamConfig};
pub use error::ChatApiError;
pub use events::ChatStreamEvent;
pub use sse::SseStreamParser;
pub use stream::ChatStreamClient;
pub use crate::url::chat_ui_config_url;
