//! Contract between the widget core and the component that renders the chat.
//!
//! The presentation layer owns rendering, input and network requests. The
//! core hands it a declarative [`ChatSettings`] plus typed [`ChatHooks`]; it
//! never reaches into the component's internals.

use std::fmt;
use std::sync::Arc;

use chat_config::ChatSettings;
use serde_json::Value;

/// Rewrites an outbound request payload before it is sent.
pub type RequestInterceptor = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// Inspects (and may rewrite) an inbound response payload.
pub type ResponseInterceptor = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// Observes the text of a sent or received message.
pub type MessageObserver = Arc<dyn Fn(&str) + Send + Sync>;

/// Error returned while loading the presentation dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentationInitError {
    message: String,
}

impl PresentationInitError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for PresentationInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for PresentationInitError {}

impl From<String> for PresentationInitError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for PresentationInitError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Callbacks the presentation layer invokes around every chat exchange.
///
/// Order for one exchange: `on_message_request`, `request_interceptor`,
/// then per response `response_interceptor`, then `on_message_response`.
#[derive(Clone)]
pub struct ChatHooks {
    pub request_interceptor: RequestInterceptor,
    pub response_interceptor: ResponseInterceptor,
    pub on_message_request: MessageObserver,
    pub on_message_response: MessageObserver,
}

impl ChatHooks {
    /// Hooks that leave payloads untouched and observe nothing.
    #[must_use]
    pub fn passthrough() -> Self {
        Self {
            request_interceptor: Arc::new(|payload| payload),
            response_interceptor: Arc::new(|response| response),
            on_message_request: Arc::new(|_| {}),
            on_message_response: Arc::new(|_| {}),
        }
    }

    pub fn intercept_request(&self, payload: Value) -> Value {
        (self.request_interceptor)(payload)
    }

    pub fn intercept_response(&self, response: Value) -> Value {
        (self.response_interceptor)(response)
    }

    pub fn message_request(&self, text: &str) {
        (self.on_message_request)(text)
    }

    pub fn message_response(&self, text: &str) {
        (self.on_message_response)(text)
    }
}

impl Default for ChatHooks {
    fn default() -> Self {
        Self::passthrough()
    }
}

impl fmt::Debug for ChatHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatHooks").finish_non_exhaustive()
    }
}

/// Rendering component driven by the widget core.
pub trait PresentationLayer: Send + 'static {
    /// Stable identifier used in logs.
    fn name(&self) -> &str;

    /// Whether the component's dependency is already available.
    fn is_loaded(&self) -> bool;

    /// Loads the component's dependency. Must be idempotent.
    fn load(&mut self) -> Result<(), PresentationInitError>;

    /// Applies settings and hooks. Called on init and after every
    /// configuration change; later calls replace earlier ones.
    fn configure(&mut self, settings: &ChatSettings, hooks: ChatHooks);

    fn show(&mut self);

    fn hide(&mut self);

    fn is_visible(&self) -> bool;

    fn toggle(&mut self) {
        if self.is_visible() {
            self.hide();
        } else {
            self.show();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use chat_config::{default_config, ChatSettings};
    use serde_json::json;

    use super::{ChatHooks, PresentationInitError, PresentationLayer};

    #[derive(Default)]
    struct MinimalLayer {
        loaded: bool,
        visible: bool,
        configured: usize,
    }

    impl PresentationLayer for MinimalLayer {
        fn name(&self) -> &str {
            "minimal"
        }

        fn is_loaded(&self) -> bool {
            self.loaded
        }

        fn load(&mut self) -> Result<(), PresentationInitError> {
            self.loaded = true;
            Ok(())
        }

        fn configure(&mut self, _settings: &ChatSettings, _hooks: ChatHooks) {
            self.configured += 1;
        }

        fn show(&mut self) {
            self.visible = true;
        }

        fn hide(&mut self) {
            self.visible = false;
        }

        fn is_visible(&self) -> bool {
            self.visible
        }
    }

    #[test]
    fn default_toggle_flips_visibility() {
        let mut layer = MinimalLayer::default();

        layer.toggle();
        assert!(layer.is_visible());
        layer.toggle();
        assert!(!layer.is_visible());
    }

    #[test]
    fn configure_accepts_settings_from_defaults() {
        let mut layer = MinimalLayer::default();
        layer.load().expect("minimal layer loads");
        layer.configure(&ChatSettings::from_config(default_config()), ChatHooks::default());

        assert!(layer.is_loaded());
        assert_eq!(layer.configured, 1);
    }

    #[test]
    fn passthrough_hooks_do_not_touch_payloads() {
        let hooks = ChatHooks::passthrough();
        let payload = json!({"body": {"messages": "hi"}});

        assert_eq!(hooks.intercept_request(payload.clone()), payload);
        assert_eq!(hooks.intercept_response(payload.clone()), payload);
        hooks.message_request("ignored");
        hooks.message_response("ignored");
    }

    #[test]
    fn hooks_forward_to_their_callbacks() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let requests = Arc::clone(&seen);
        let responses = Arc::clone(&seen);
        let hooks = ChatHooks {
            request_interceptor: Arc::new(|mut payload| {
                payload["tagged"] = json!(true);
                payload
            }),
            response_interceptor: Arc::new(|response| response),
            on_message_request: Arc::new(move |text| {
                requests.lock().unwrap().push(format!("out:{text}"))
            }),
            on_message_response: Arc::new(move |text| {
                responses.lock().unwrap().push(format!("in:{text}"))
            }),
        };

        assert_eq!(hooks.intercept_request(json!({}))["tagged"], json!(true));
        hooks.message_request("hi");
        hooks.message_response("hello");

        assert_eq!(
            *seen.lock().unwrap(),
            vec!["out:hi".to_string(), "in:hello".to_string()]
        );
    }

    #[test]
    fn init_error_preserves_message() {
        let error = PresentationInitError::new("script blocked");
        assert_eq!(error.message(), "script blocked");
        assert_eq!(error.to_string(), "script blocked");
    }
}
