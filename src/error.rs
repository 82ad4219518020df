use chat_api::ChatApiError;
use presentation::PresentationInitError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("failed to load presentation layer {layer}: {source}")]
    PresentationLoad {
        layer: String,
        #[source]
        source: PresentationInitError,
    },

    #[error("headless chat has not been configured")]
    NotConfigured,

    #[error("no chat endpoint: set connectUrl, or agentId and workspaceId")]
    MissingConnectUrl,

    #[error("websocket transport is not supported by the headless layer")]
    WebsocketUnsupported,

    #[error("request interceptor produced an invalid body: {0}")]
    InvalidRequestBody(String),

    #[error(transparent)]
    Transport(#[from] ChatApiError),
}
