//! Built-in widget defaults.

use once_cell::sync::Lazy;
use serde_json::json;

use crate::WidgetConfig;

static DEFAULT_CONFIG: Lazy<WidgetConfig> = Lazy::new(|| {
    WidgetConfig::from_value(json!({
        "toggleText": "💬",
        "introMessage": "Thank you for contacting us. This is Ana, your friendly AI assistant. How can I assist you today?",
        "websocket": false,
        "stream": true,
        "headerTitle": "OmadaAI Assistant!",
        "headerSubTitle": "Ana",
        "headerColor": "#2356EA",
        "toggleColor": "#2356EA",
        "position": "bottom-right",
        "chatContainerPosition": "bottom-right",
        "avatars": true,
        "customizeAvatarImageForAI": "https://omada-public-assets.s3.us-east-2.amazonaws.com/paula.png",
        "customizeAvatarImageForUser": null,
        "errorMessages": {
            "displayServiceErrorMessages": false,
            "overrides": {
                "default": "Something went wrong. Please try again.",
                "service": "Unable to connect to server.",
                "speechToText": "Voice input failed."
            }
        },
        "textInputPlaceholder": {
            "text": "Type a message...",
            "style": { "color": "#bcbcbc" }
        },
        "messageStyles": {
            "error": {
                "bubble": { "backgroundColor": "#ff0000", "color": "#ffffff", "fontSize": "15px" }
            },
            "default": {
                "shared": { "bubble": { "color": "white" } },
                "ai": { "bubble": { "backgroundColor": "#F3F5F7", "color": "#000000", "padding": "10px" } },
                "user": { "bubble": { "backgroundColor": "#0057F3" } }
            }
        }
    }))
    .unwrap_or_default()
});

/// Shared built-in defaults. Callers clone before mutating.
pub fn default_config() -> &'static WidgetConfig {
    &DEFAULT_CONFIG
}

impl WidgetConfig {
    /// Owned copy of the built-in defaults.
    #[must_use]
    pub fn builtin() -> Self {
        default_config().clone()
    }
}
