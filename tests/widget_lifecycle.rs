
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use omada_chat::{
    default_config, resolve, ChatApiConfig, ChatWidget, ConfigServiceClient, Position,
    WidgetConfig, WidgetError,
};
use pretty_assertions::assert_eq;
use presentation_mock::MockPresentation;
use serde_json::json;
use server::{json_response, ScriptedServer};

const W1_CONFIG: &str = "/chat/workspaces/w1/chat-ui-config";

fn config_client(server: &ScriptedServer) -> ConfigServiceClient {
    ConfigServiceClient::new(ChatApiConfig::new(&server.base_url)).expect("config client")
}

fn w1_overrides() -> WidgetConfig {
    WidgetConfig::new()
        .with("workspaceId", "w1")
        .with("agentId", "a1")
}

#[tokio::test]
async fn failing_presentation_load_aborts_before_any_fetch() {
    let server = ScriptedServer::start().await;
    server.route(W1_CONFIG, vec![json_response(200, "{}")]);
    let layer = MockPresentation::failing("script blocked");

    let error = ChatWidget::builder(layer.clone())
        .config_client(config_client(&server))
        .init(w1_overrides())
        .await
        .expect_err("load failure is fatal");

    assert!(matches!(
        error,
        WidgetError::PresentationLoad { ref layer, ref source }
            if layer == "mock" && source.message() == "script blocked"
    ));
    assert!(server.requests().is_empty());
    assert!(layer.trace().configured.is_empty());
}

#[tokio::test]
async fn init_layers_defaults_remote_and_overrides() {
    let server = ScriptedServer::start().await;
    server.route(
        W1_CONFIG,
        vec![json_response(
            200,
            r##"{"headerTitle":"Remote","toggleColor":"#111111","stream":false,"workspaceId":"w2","messageStyles":{"botMessage":{"color":"red"}}}"##,
        )],
    );
    let layer = MockPresentation::new();

    let widget = ChatWidget::builder(layer.clone())
        .config_client(config_client(&server))
        .init(w1_overrides().with("toggleColor", "#222222"))
        .await
        .expect("init");

    let config = widget.config();
    assert_eq!(config.str_value("headerTitle"), Some("Remote"));
    assert_eq!(config.str_value("toggleColor"), Some("#222222"));
    assert_eq!(config.workspace_id(), Some("w1"));
    assert_eq!(config.get("stream"), Some(&json!(true)));
    assert_eq!(
        config.get("messageStyles").and_then(|styles| styles.get("botMessage")),
        Some(&json!({"color": "red"}))
    );

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path, W1_CONFIG);

    let trace = layer.trace();
    assert_eq!(trace.load_calls, 1);
    assert_eq!(trace.configured.len(), 1);
    assert_eq!(trace.configured[0].header.title, "Remote");
    assert_eq!(trace.configured[0], *widget.settings());
    assert_eq!(
        widget.settings().connect.url.as_deref(),
        Some("https://ds4i1tjnjs35d.cloudfront.net/sse/workspaces/w1/chat-agents/a1/chat/stream")
    );
}

#[tokio::test]
async fn init_without_workspace_never_fetches() {
    let server = ScriptedServer::start().await;
    let layer = MockPresentation::new();

    let widget = ChatWidget::builder(layer)
        .config_client(config_client(&server))
        .init(WidgetConfig::new().with("headerTitle", "Local"))
        .await
        .expect("init");

    assert!(server.requests().is_empty());
    assert_eq!(widget.config().str_value("headerTitle"), Some("Local"));
    assert_eq!(
        widget.config().str_value("toggleText"),
        default_config().str_value("toggleText")
    );
}

#[tokio::test]
async fn failed_fetch_falls_back_to_defaults_plus_overrides() {
    let server = ScriptedServer::start().await;
    server.route(W1_CONFIG, vec![json_response(500, r#"{"error":"boom"}"#)]);
    let overrides = w1_overrides().with("position", "top-left");

    let widget = ChatWidget::builder(MockPresentation::new())
        .config_client(config_client(&server))
        .init(overrides.clone())
        .await
        .expect("fetch failure is not fatal");

    assert_eq!(*widget.config(), resolve(default_config(), None, &overrides));
    assert_eq!(widget.settings().toggle.position, Position::TopLeft);
    assert_eq!(server.requests_to(W1_CONFIG).len(), 1);
}

#[tokio::test]
async fn preloaded_presentation_is_not_loaded_again() {
    let server = ScriptedServer::start().await;
    let layer = MockPresentation::preloaded();

    ChatWidget::builder(layer.clone())
        .config_client(config_client(&server))
        .init(WidgetConfig::new())
        .await
        .expect("init");

    assert_eq!(layer.trace().load_calls, 0);
    assert_eq!(layer.trace().configured.len(), 1);
}

#[tokio::test]
async fn custom_defaults_replace_builtin_set() {
    let server = ScriptedServer::start().await;
    let defaults = WidgetConfig::new().with("toggleText", "Help");

    let widget = ChatWidget::builder(MockPresentation::new())
        .config_client(config_client(&server))
        .defaults(defaults)
        .init(WidgetConfig::new())
        .await
        .expect("init");

    assert_eq!(widget.config().len(), 1);
    assert_eq!(widget.settings().toggle.text, "Help");
}

#[tokio::test]
async fn visibility_calls_delegate_to_presentation() {
    let server = ScriptedServer::start().await;
    let layer = MockPresentation::new();
    let mut widget = ChatWidget::builder(layer.clone())
        .config_client(config_client(&server))
        .init(WidgetConfig::new())
        .await
        .expect("init");

    widget.show();
    assert!(widget.is_visible());
    widget.toggle();
    assert!(!widget.is_visible());
    widget.toggle();
    widget.hide();

    let trace = layer.trace();
    assert_eq!(trace.show_calls, 2);
    assert_eq!(trace.hide_calls, 2);
    assert!(!trace.visible);
}

#[tokio::test]
async fn update_config_merges_and_reapplies() {
    let server = ScriptedServer::start().await;
    let layer = MockPresentation::new();
    let mut widget = ChatWidget::builder(layer.clone())
        .config_client(config_client(&server))
        .init(WidgetConfig::new().with("headerTitle", "Before"))
        .await
        .expect("init");

    widget.update_config(
        &WidgetConfig::new()
            .with("headerTitle", "After")
            .with("chatContainerPosition", "bottom-left"),
    );

    assert_eq!(widget.config().str_value("headerTitle"), Some("After"));
    let trace = layer.trace();
    assert_eq!(trace.configured.len(), 2);
    assert_eq!(trace.configured[1].header.title, "After");
    assert_eq!(trace.configured[1].container_position, Position::BottomLeft);
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn reload_keeps_protected_keys_and_applies_the_rest() {
    let server = ScriptedServer::start().await;
    server.route(
        W1_CONFIG,
        vec![
            json_response(200, "{}"),
            json_response(
                200,
                r#"{"headerTitle":"Reloaded","agentId":"a2","workspaceId":"w9","stream":false,"accessToken":"stolen"}"#,
            ),
        ],
    );
    let layer = MockPresentation::new();
    let mut widget = ChatWidget::builder(layer.clone())
        .config_client(config_client(&server))
        .init(w1_overrides())
        .await
        .expect("init");

    widget.reload_config().await;

    let config = widget.config();
    assert_eq!(config.str_value("headerTitle"), Some("Reloaded"));
    assert_eq!(config.agent_id(), Some("a1"));
    assert_eq!(config.workspace_id(), Some("w1"));
    assert_eq!(config.get("stream"), Some(&json!(true)));
    // Not present before the reload, so the remote value is accepted.
    assert_eq!(config.access_token(), Some("stolen"));
    assert_eq!(server.requests_to(W1_CONFIG).len(), 2);
    assert_eq!(layer.trace().configured.len(), 2);
}

#[tokio::test]
async fn failed_reload_keeps_current_config() {
    let server = ScriptedServer::start().await;
    server.route(
        W1_CONFIG,
        vec![
            json_response(200, r#"{"headerTitle":"First"}"#),
            json_response(503, ""),
        ],
    );
    let layer = MockPresentation::new();
    let mut widget = ChatWidget::builder(layer.clone())
        .config_client(config_client(&server))
        .init(w1_overrides())
        .await
        .expect("init");
    let before = widget.config().clone();

    widget.reload_config().await;

    assert_eq!(*widget.config(), before);
    assert_eq!(layer.trace().configured.len(), 1);
}

#[tokio::test]
async fn reload_without_workspace_is_a_no_op() {
    let server = ScriptedServer::start().await;
    let layer = MockPresentation::new();
    let mut widget = ChatWidget::builder(layer.clone())
        .config_client(config_client(&server))
        .init(WidgetConfig::new())
        .await
        .expect("init");

    widget.reload_config().await;

    assert!(server.requests().is_empty());
    assert_eq!(layer.trace().configured.len(), 1);
}

#[tokio::test]
async fn hooks_carry_the_thread_across_exchanges_until_reset() {
    let server = ScriptedServer::start().await;
    let layer = MockPresentation::new();
    let widget = ChatWidget::builder(layer.clone())
        .config_client(config_client(&server))
        .init(WidgetConfig::new())
        .await
        .expect("init");
    let resets = Arc::new(AtomicUsize::new(0));
    let observed = Arc::clone(&resets);
    widget.session().on_reset(move || {
        observed.fetch_add(1, Ordering::SeqCst);
    });

    let first = layer
        .exchange("hi", &[json!({"text": "hello", "thread_id": "t1"})])
        .expect("configured");
    assert_eq!(first.request["body"]["thread_id"], json!(""));
    assert_eq!(widget.thread_id().as_deref(), Some("t1"));

    let second = layer
        .exchange("again", &[json!({"text": "sure"})])
        .expect("configured");
    assert_eq!(
        second.request["body"],
        json!({"messages": "again", "format": "string", "thread_id": "t1"})
    );
    assert_eq!(widget.session().history().len(), 4);

    assert!(widget.reset_thread());
    assert_eq!(widget.thread_id(), None);
    assert!(widget.session().history().is_empty());
    assert_eq!(resets.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn shared_session_is_used_by_the_widget() {
    let server = ScriptedServer::start().await;
    let session = Arc::new(omada_chat::ThreadSession::new());
    session.capture_thread_id(json!({"thread_id": "existing"}));

    let widget = ChatWidget::builder(MockPresentation::new())
        .config_client(config_client(&server))
        .session(Arc::clone(&session))
        .init(WidgetConfig::new())
        .await
        .expect("init");

    assert_eq!(widget.thread_id().as_deref(), Some("existing"));
    assert!(Arc::ptr_eq(widget.session(), &session));
}
