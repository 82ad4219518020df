use chat_api::error::parse_error_message;
use chat_api::ChatApiError;
use reqwest::StatusCode;

#[test]
fn error_message_prefers_nested_message() {
    let body = r#"{"error":{"message":"workspace not found"}}"#;
    assert_eq!(
        parse_error_message(StatusCode::NOT_FOUND, body),
        "workspace not found"
    );
}

#[test]
fn error_message_accepts_string_and_top_level_forms() {
    assert_eq!(
        parse_error_message(StatusCode::BAD_REQUEST, r#"{"error":"bad agent"}"#),
        "bad agent"
    );
    assert_eq!(
        parse_error_message(StatusCode::BAD_REQUEST, r#"{"message":"nope"}"#),
        "nope"
    );
}

#[test]
fn error_message_falls_back_to_body_then_reason() {
    assert_eq!(
        parse_error_message(StatusCode::BAD_GATEWAY, "upstream broke"),
        "upstream broke"
    );
    assert_eq!(
        parse_error_message(StatusCode::SERVICE_UNAVAILABLE, ""),
        "Service Unavailable"
    );
}

#[test]
fn error_display_is_readable() {
    let error = ChatApiError::Status(StatusCode::FORBIDDEN, "denied".to_owned());
    assert_eq!(error.to_string(), "HTTP 403 Forbidden denied");
    assert_eq!(
        ChatApiError::MissingConnectUrl.to_string(),
        "chat endpoint URL is required"
    );
}
