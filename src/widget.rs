//! Widget lifecycle controller.
//!
//! Orchestration only: [`ChatWidget`] loads the presentation dependency,
//! resolves the effective configuration and re-applies it on every change.
//! Configuration rules live in `chat_config` and thread continuity in
//! `thread_session`.

use std::sync::Arc;

use chat_api::{ChatApiError, ConfigServiceClient};
use chat_config::{default_config, resolve, ChatSettings, WidgetConfig};
use presentation::{ChatHooks, PresentationLayer};
use thread_session::ThreadSession;
use tracing::{debug, error, info, warn};

use crate::config::EnvConfig;
use crate::error::WidgetError;
use crate::hooks::session_hooks;

/// Configures a [`ChatWidget`] before [`ChatWidgetBuilder::init`].
pub struct ChatWidgetBuilder<P> {
    presentation: P,
    config_client: Option<ConfigServiceClient>,
    defaults: WidgetConfig,
    session: Option<Arc<ThreadSession>>,
}

impl<P: PresentationLayer> ChatWidgetBuilder<P> {
    fn new(presentation: P) -> Self {
        Self {
            presentation,
            config_client: None,
            defaults: default_config().clone(),
            session: None,
        }
    }

    /// Config service client. Defaults to one built from [`EnvConfig`].
    pub fn config_client(mut self, client: ConfigServiceClient) -> Self {
        self.config_client = Some(client);
        self
    }

    /// Replaces the built-in defaults.
    pub fn defaults(mut self, defaults: WidgetConfig) -> Self {
        self.defaults = defaults;
        self
    }

    /// Shares an existing session instead of starting a fresh one.
    pub fn session(mut self, session: Arc<ThreadSession>) -> Self {
        self.session = Some(session);
        self
    }

    /// Loads the presentation dependency, resolves
    /// `defaults < remote < overrides` and configures the layer.
    ///
    /// The remote config is fetched only when `overrides` carries a
    /// workspace id; a failed fetch falls back to defaults plus overrides.
    /// A presentation load failure is the only error and happens before any
    /// network traffic.
    pub async fn init(self, overrides: WidgetConfig) -> Result<ChatWidget<P>, WidgetError> {
        let Self {
            mut presentation,
            config_client,
            defaults,
            session,
        } = self;

        if presentation.is_loaded() {
            debug!(layer = presentation.name(), "presentation already loaded");
        } else if let Err(source) = presentation.load() {
            error!(layer = presentation.name(), error = %source, "failed to load presentation layer");
            return Err(WidgetError::PresentationLoad {
                layer: presentation.name().to_owned(),
                source,
            });
        }

        let client = config_client.or_else(|| {
            client_or_warn(ConfigServiceClient::new(EnvConfig::from_env().api_config()))
        });

        let remote = match (overrides.workspace_id(), client.as_ref()) {
            (Some(workspace_id), Some(client)) => client
                .fetch_remote_config(workspace_id)
                .await
                .map(WidgetConfig::from),
            _ => None,
        };
        let config = resolve(&defaults, remote.as_ref(), &overrides);

        let session = session.unwrap_or_default();
        let hooks = session_hooks(&session);
        let settings = ChatSettings::from_config(&config);
        presentation.configure(&settings, hooks.clone());

        info!(
            layer = presentation.name(),
            workspace_id = config.workspace_id().unwrap_or_default(),
            remote = remote.is_some(),
            "chat widget initialized"
        );

        Ok(ChatWidget {
            presentation,
            client,
            config,
            settings,
            session,
            hooks,
        })
    }
}

/// Handle to an initialized widget.
pub struct ChatWidget<P> {
    presentation: P,
    client: Option<ConfigServiceClient>,
    config: WidgetConfig,
    settings: ChatSettings,
    session: Arc<ThreadSession>,
    hooks: ChatHooks,
}

impl<P: PresentationLayer> ChatWidget<P> {
    pub fn builder(presentation: P) -> ChatWidgetBuilder<P> {
        ChatWidgetBuilder::new(presentation)
    }

    pub fn show(&mut self) {
        self.presentation.show();
    }

    pub fn hide(&mut self) {
        self.presentation.hide();
    }

    pub fn toggle(&mut self) {
        self.presentation.toggle();
    }

    pub fn is_visible(&self) -> bool {
        self.presentation.is_visible()
    }

    /// Shallow-merges `patch` into the live configuration and re-applies it.
    pub fn update_config(&mut self, patch: &WidgetConfig) {
        self.config.merge_shallow(patch);
        debug!(keys = patch.len(), "chat config updated");
        self.apply();
    }

    /// Re-fetches the remote config for the current workspace and resolves it
    /// on top of the live configuration. Protected keys keep their values.
    pub async fn reload_config(&mut self) {
        let Some(workspace_id) = self.config.workspace_id().map(ToOwned::to_owned) else {
            debug!("no workspace id; skipping config reload");
            return;
        };

        let Some(client) = self.client.as_ref() else {
            warn!(workspace_id = %workspace_id, "no config service client; keeping current config");
            return;
        };

        match client.fetch_remote_config(&workspace_id).await {
            Some(remote) => {
                let remote = WidgetConfig::from(remote);
                self.config = resolve(&self.config, Some(&remote), &WidgetConfig::new());
                info!(workspace_id = %workspace_id, "chat config reloaded");
                self.apply();
            }
            None => {
                warn!(workspace_id = %workspace_id, "config reload failed; keeping current config");
            }
        }
    }

    pub fn thread_id(&self) -> Option<String> {
        self.session.thread_id()
    }

    pub fn reset_thread(&self) -> bool {
        self.session.reset()
    }

    pub fn session(&self) -> &Arc<ThreadSession> {
        &self.session
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn settings(&self) -> &ChatSettings {
        &self.settings
    }

    pub fn presentation(&self) -> &P {
        &self.presentation
    }

    fn apply(&mut self) {
        self.settings = ChatSettings::from_config(&self.config);
        self.presentation.configure(&self.settings, self.hooks.clone());
    }
}

/// A client that cannot be built means no remote config, not a failed init.
fn client_or_warn(
    result: Result<ConfigServiceClient, ChatApiError>,
) -> Option<ConfigServiceClient> {
    match result {
        Ok(client) => Some(client),
        Err(error) => {
            warn!(error = %error, "failed to build config service client; continuing without remote config");
            None
        }
    }
}

impl<P> std::fmt::Debug for ChatWidget<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatWidget")
            .field("config", &self.config)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
