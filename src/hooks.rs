use std::sync::Arc;

use presentation::ChatHooks;
use thread_session::ThreadSession;

/// Hooks that route every exchange through `session`.
///
/// Outbound payloads get the current thread id attached, inbound responses
/// are scanned for a new one, and both message texts land in the history.
pub fn session_hooks(session: &Arc<ThreadSession>) -> ChatHooks {
    let attach = Arc::clone(session);
    let capture = Arc::clone(session);
    let outbound = Arc::clone(session);
    let inbound = Arc::clone(session);

    ChatHooks {
        request_interceptor: Arc::new(move |payload| attach.attach_thread_id(payload)),
        response_interceptor: Arc::new(move |response| capture.capture_thread_id(response)),
        on_message_request: Arc::new(move |text| outbound.record_outbound(text)),
        on_message_response: Arc::new(move |text| inbound.record_inbound(text)),
    }
}
