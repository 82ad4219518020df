//! Deterministic recording implementation of the `presentation` contract.
//!
//! Nothing is rendered. Every call is recorded in a shared
//! [`PresentationTrace`] so tests can assert on what the widget core did, and
//! [`MockPresentation::exchange`] drives the installed hooks the way a real
//! chat component would for one message.

use std::sync::{Arc, Mutex, MutexGuard};

use chat_config::ChatSettings;
use presentation::{ChatHooks, PresentationInitError, PresentationLayer};
use serde_json::{json, Value};

/// Stable layer identifier.
pub const MOCK_PRESENTATION_NAME: &str = "mock";

/// Everything observed by a [`MockPresentation`].
#[derive(Debug, Clone, Default)]
pub struct PresentationTrace {
    pub load_calls: usize,
    pub loaded: bool,
    pub visible: bool,
    pub show_calls: usize,
    pub hide_calls: usize,
    /// Settings from every `configure` call, oldest first.
    pub configured: Vec<ChatSettings>,
    pub hooks: Option<ChatHooks>,
}

/// Outcome of one simulated exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct Exchange {
    /// Request payload after the request interceptor ran.
    pub request: Value,
    /// Response payloads after the response interceptor ran.
    pub responses: Vec<Value>,
    /// Concatenated `text` of all responses.
    pub reply: String,
}

/// Cloneable handle; clones share one trace.
#[derive(Debug, Clone, Default)]
pub struct MockPresentation {
    state: Arc<Mutex<PresentationTrace>>,
    load_error: Option<String>,
}

impl MockPresentation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A layer whose dependency never loads.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            state: Arc::default(),
            load_error: Some(message.into()),
        }
    }

    /// A layer that reports its dependency as already present.
    #[must_use]
    pub fn preloaded() -> Self {
        let layer = Self::default();
        lock_unpoisoned(&layer.state).loaded = true;
        layer
    }

    #[must_use]
    pub fn trace(&self) -> PresentationTrace {
        lock_unpoisoned(&self.state).clone()
    }

    #[must_use]
    pub fn latest_settings(&self) -> Option<ChatSettings> {
        lock_unpoisoned(&self.state).configured.last().cloned()
    }

    /// Runs the installed hooks for one user message answered by `responses`.
    ///
    /// Returns `None` before the layer has been configured.
    pub fn exchange(&self, text: &str, responses: &[Value]) -> Option<Exchange> {
        let hooks = lock_unpoisoned(&self.state).hooks.clone()?;

        hooks.message_request(text);
        let request = hooks.intercept_request(json!({
            "text": text,
            "body": { "messages": text },
        }));

        let responses: Vec<Value> = responses
            .iter()
            .cloned()
            .map(|response| hooks.intercept_response(response))
            .collect();
        let reply: String = responses
            .iter()
            .filter_map(|response| response.get("text").and_then(Value::as_str))
            .collect();
        hooks.message_response(&reply);

        Some(Exchange {
            request,
            responses,
            reply,
        })
    }
}

impl PresentationLayer for MockPresentation {
    fn name(&self) -> &str {
        MOCK_PRESENTATION_NAME
    }

    fn is_loaded(&self) -> bool {
        lock_unpoisoned(&self.state).loaded
    }

    fn load(&mut self) -> Result<(), PresentationInitError> {
        let mut state = lock_unpoisoned(&self.state);
        state.load_calls += 1;
        if let Some(message) = &self.load_error {
            return Err(PresentationInitError::new(message.clone()));
        }
        state.loaded = true;
        Ok(())
    }

    fn configure(&mut self, settings: &ChatSettings, hooks: ChatHooks) {
        let mut state = lock_unpoisoned(&self.state);
        state.configured.push(settings.clone());
        state.hooks = Some(hooks);
    }

    fn show(&mut self) {
        let mut state = lock_unpoisoned(&self.state);
        state.show_calls += 1;
        state.visible = true;
    }

    fn hide(&mut self) {
        let mut state = lock_unpoisoned(&self.state);
        state.hide_calls += 1;
        state.visible = false;
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
