//! Presentation layer without a UI.
//!
//! [`HeadlessChat`] keeps visibility as plain state and talks to the chat
//! endpoint through `chat_api`, running the installed hooks around every
//! exchange the way a rendered chat component does.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chat_api::{ChatStreamClient, ChatStreamConfig};
use chat_config::ChatSettings;
use presentation::{ChatHooks, PresentationInitError, PresentationLayer};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::error::WidgetError;

pub const HEADLESS_PRESENTATION_NAME: &str = "headless";

#[derive(Debug, Default)]
struct HeadlessState {
    loaded: bool,
    visible: bool,
    settings: Option<ChatSettings>,
    hooks: Option<ChatHooks>,
    client: Option<ChatStreamClient>,
}

#[derive(Debug, Clone, Copy)]
struct RetryPolicy {
    max_retries: u32,
    base_delay: Duration,
}

/// Cloneable handle; clones share state, so a clone kept by the embedder
/// can send messages after another handle moved into a widget.
#[derive(Debug, Clone, Default)]
pub struct HeadlessChat {
    state: Arc<Mutex<HeadlessState>>,
    timeout: Option<Duration>,
    retry: Option<RetryPolicy>,
}

impl HeadlessChat {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_retry_policy(mut self, max_retries: u32, base_delay: Duration) -> Self {
        self.retry = Some(RetryPolicy {
            max_retries,
            base_delay,
        });
        self
    }

    /// Settings from the most recent `configure`.
    pub fn settings(&self) -> Option<ChatSettings> {
        lock_unpoisoned(&self.state).settings.clone()
    }

    /// Sends one user message and returns the assistant's reply text.
    ///
    /// Pipeline: message-request hook, request interceptor, transport,
    /// response interceptor per event, message-response hook with the
    /// concatenated text.
    pub async fn send(&self, text: &str) -> Result<String, WidgetError> {
        let (hooks, client) = {
            let state = lock_unpoisoned(&self.state);
            let hooks = state.hooks.clone().ok_or(WidgetError::NotConfigured)?;
            if state
                .settings
                .as_ref()
                .is_some_and(|settings| settings.connect.websocket)
            {
                return Err(WidgetError::WebsocketUnsupported);
            }
            let client = state.client.clone().ok_or(WidgetError::MissingConnectUrl)?;
            (hooks, client)
        };

        hooks.message_request(text);
        let request = hooks.intercept_request(json!({
            "text": text,
            "body": { "messages": text },
        }));
        let body = match request.get("body") {
            Some(body @ Value::Object(_)) => body.clone(),
            Some(other) => {
                return Err(WidgetError::InvalidRequestBody(format!(
                    "expected an object body, got {other}"
                )))
            }
            None => {
                return Err(WidgetError::InvalidRequestBody(
                    "request has no body".to_owned(),
                ))
            }
        };

        let mut reply = String::new();
        let events = client
            .send(&body, |event| {
                let response = hooks.intercept_response(event.into_payload());
                match &response {
                    Value::String(text) => reply.push_str(text),
                    other => {
                        if let Some(text) = other.get("text").and_then(Value::as_str) {
                            reply.push_str(text);
                        }
                    }
                }
            })
            .await?;

        debug!(events, reply_len = reply.len(), "chat exchange finished");
        hooks.message_response(&reply);
        Ok(reply)
    }

    fn stream_client(&self, settings: &ChatSettings) -> Option<ChatStreamClient> {
        let connect = &settings.connect;
        let url = connect.url.as_deref()?;

        let mut config = ChatStreamConfig::new(url)
            .with_stream(connect.stream)
            .with_headers(connect.headers.clone());
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }
        if let Some(retry) = self.retry {
            config = config.with_retry_policy(retry.max_retries, retry.base_delay);
        }

        match ChatStreamClient::new(config) {
            Ok(client) => Some(client),
            Err(error) => {
                warn!(error = %error, "failed to build chat stream client");
                None
            }
        }
    }
}

impl PresentationLayer for HeadlessChat {
    fn name(&self) -> &str {
        HEADLESS_PRESENTATION_NAME
    }

    fn is_loaded(&self) -> bool {
        lock_unpoisoned(&self.state).loaded
    }

    fn load(&mut self) -> Result<(), PresentationInitError> {
        lock_unpoisoned(&self.state).loaded = true;
        Ok(())
    }

    fn configure(&mut self, settings: &ChatSettings, hooks: ChatHooks) {
        if settings.connect.websocket {
            warn!("websocket transport requested; headless chat only speaks HTTP");
        }
        let client = self.stream_client(settings);
        if client.is_none() {
            debug!("no chat endpoint configured");
        }

        let mut state = lock_unpoisoned(&self.state);
        state.settings = Some(settings.clone());
        state.hooks = Some(hooks);
        state.client = client;
    }

    fn show(&mut self) {
        lock_unpoisoned(&self.state).visible = true;
    }

    fn hide(&mut self) {
        lock_unpoisoned(&self.state).visible = false;
    }

    fn is_visible(&self) -> bool {
        lock_unpoisoned(&self.state).visible
    }
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
