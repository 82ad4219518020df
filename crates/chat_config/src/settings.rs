//! Declarative settings derived from a resolved configuration.
//!
//! The presentation layer consumes [`ChatSettings`]; it never reads the raw
//! option map. Styling values the core does not interpret (error messages,
//! placeholder, message styles) are forwarded as JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::connect::ConnectDescriptor;
use crate::{keys, WidgetConfig};

/// Screen corner a widget element is anchored to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    #[default]
    BottomRight,
    BottomLeft,
    TopLeft,
    TopRight,
}

impl Position {
    pub fn parse(value: &str) -> Option<Self> {
        Some(match value {
            "bottom-right" => Self::BottomRight,
            "bottom-left" => Self::BottomLeft,
            "top-left" => Self::TopLeft,
            "top-right" => Self::TopRight,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BottomRight => "bottom-right",
            Self::BottomLeft => "bottom-left",
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
        }
    }

    fn from_option(config: &WidgetConfig, key: &str) -> Self {
        config
            .str_value(key)
            .and_then(Self::parse)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderSettings {
    pub title: String,
    pub subtitle: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleSettings {
    pub text: String,
    pub color: String,
    pub position: Position,
}

/// Avatar images; `None` images fall back to the component's defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarSettings {
    pub ai_image: Option<String>,
    pub user_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSettings {
    pub header: HeaderSettings,
    pub toggle: ToggleSettings,
    pub container_position: Position,
    /// `None` disables avatars.
    pub avatars: Option<AvatarSettings>,
    pub error_messages: Value,
    pub text_input_placeholder: Value,
    pub message_styles: Value,
    pub intro_message: String,
    pub connect: ConnectDescriptor,
}

impl ChatSettings {
    #[must_use]
    pub fn from_config(config: &WidgetConfig) -> Self {
        let text = |key: &str| config.str_value(key).unwrap_or_default().to_owned();
        let json = |key: &str| config.get(key).cloned().unwrap_or(Value::Null);

        let avatars = config.is_truthy(keys::AVATARS).then(|| AvatarSettings {
            ai_image: config.str_value(keys::AI_AVATAR_IMAGE).map(str::to_owned),
            user_image: config.str_value(keys::USER_AVATAR_IMAGE).map(str::to_owned),
        });

        Self {
            header: HeaderSettings {
                title: text(keys::HEADER_TITLE),
                subtitle: text(keys::HEADER_SUBTITLE),
                color: text(keys::HEADER_COLOR),
            },
            toggle: ToggleSettings {
                text: text(keys::TOGGLE_TEXT),
                color: text(keys::TOGGLE_COLOR),
                position: Position::from_option(config, keys::POSITION),
            },
            container_position: Position::from_option(config, keys::CHAT_CONTAINER_POSITION),
            avatars,
            error_messages: json(keys::ERROR_MESSAGES),
            text_input_placeholder: json(keys::TEXT_INPUT_PLACEHOLDER),
            message_styles: json(keys::MESSAGE_STYLES),
            intro_message: text(keys::INTRO_MESSAGE),
            connect: ConnectDescriptor::from_config(config),
        }
    }
}
