//! Widget configuration primitives.
//!
//! This crate owns the option map a widget runs with, the built-in defaults,
//! and the three-level resolution `defaults < remote < overrides`. It also
//! derives the declarative [`ChatSettings`] handed to the presentation layer.
//! It performs no I/O: fetching remote configuration lives in `chat_api`.
//!
//! Connection-critical options ([`keys::PROTECTED_KEYS`]) never change through
//! a remote merge once they are present in the accumulating configuration.

pub mod connect;
pub mod defaults;
pub mod keys;
pub mod resolve;
pub mod settings;

mod widget_config;

pub use connect::{connect_url, ConnectDescriptor, RequestBodyTemplate, DEFAULT_CONNECT_BASE_URL};
pub use defaults::default_config;
pub use resolve::{apply_remote_config, resolve};
pub use settings::{AvatarSettings, ChatSettings, HeaderSettings, Position, ToggleSettings};
pub use widget_config::WidgetConfig;
