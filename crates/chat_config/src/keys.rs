//! Option names as they appear on the wire and in caller overrides.

pub const TOGGLE_TEXT: &str = "toggleText";
pub const INTRO_MESSAGE: &str = "introMessage";
pub const WEBSOCKET: &str = "websocket";
pub const STREAM: &str = "stream";
pub const HEADER_TITLE: &str = "headerTitle";
pub const HEADER_SUBTITLE: &str = "headerSubTitle";
pub const HEADER_COLOR: &str = "headerColor";
pub const TOGGLE_COLOR: &str = "toggleColor";
pub const POSITION: &str = "position";
pub const CHAT_CONTAINER_POSITION: &str = "chatContainerPosition";
pub const AVATARS: &str = "avatars";
pub const AI_AVATAR_IMAGE: &str = "customizeAvatarImageForAI";
pub const USER_AVATAR_IMAGE: &str = "customizeAvatarImageForUser";
pub const ERROR_MESSAGES: &str = "errorMessages";
pub const TEXT_INPUT_PLACEHOLDER: &str = "textInputPlaceholder";
pub const MESSAGE_STYLES: &str = "messageStyles";
pub const CONNECT_URL: &str = "connectUrl";
pub const BASE_URL: &str = "baseUrl";
pub const AGENT_ID: &str = "agentId";
pub const WORKSPACE_ID: &str = "workspaceId";
pub const ACCESS_TOKEN: &str = "accessToken";

/// Options governing backend connectivity. Remote config cannot overwrite them.
pub const PROTECTED_KEYS: [&str; 6] = [
    STREAM,
    WEBSOCKET,
    CONNECT_URL,
    AGENT_ID,
    WORKSPACE_ID,
    ACCESS_TOKEN,
];

/// Returns true when `key` is one of [`PROTECTED_KEYS`].
pub fn is_protected(key: &str) -> bool {
    PROTECTED_KEYS.contains(&key)
}
