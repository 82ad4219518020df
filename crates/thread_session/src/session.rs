//! Conversation thread continuity for one widget.
//!
//! Invariant: once a thread id is captured from a response, every later
//! [`ThreadSession::attach_thread_id`] embeds that id until [`ThreadSession::reset`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use crate::history::HistoryEntry;
use crate::observers::{ObserverList, SubscriptionId};

/// Request body field carrying the thread id.
pub const THREAD_ID_FIELD: &str = "thread_id";

const BODY_FIELD: &str = "body";
const MESSAGES_FIELD: &str = "messages";
const TEXT_FIELD: &str = "text";
const MESSAGES_PLACEHOLDER: &str = "{{text}}";
const BODY_FORMAT: &str = "string";

/// Locations checked for a thread id, highest priority first.
const THREAD_ID_PATHS: [&[&str]; 3] = [
    &[THREAD_ID_FIELD],
    &["details", THREAD_ID_FIELD],
    &["response", THREAD_ID_FIELD],
];

type ThreadUpdatedCallback = dyn Fn(&str) + Send + Sync;
type ResetCallback = dyn Fn() + Send + Sync;

/// Snapshot of a thread.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadState {
    pub thread_id: Option<String>,
    pub history: Vec<HistoryEntry>,
    /// Text of the most recent response that carried one.
    pub last_response: Option<String>,
}

#[derive(Default)]
struct Observers {
    thread_updated: ObserverList<ThreadUpdatedCallback>,
    reset: ObserverList<ResetCallback>,
}

/// Thread id and history shared between the request/response interceptors
/// and the widget handle.
#[derive(Default)]
pub struct ThreadSession {
    state: Mutex<ThreadState>,
    observers: Mutex<Observers>,
    next_subscription: AtomicU64,
}

impl std::fmt::Debug for ThreadSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadSession")
            .field("state", &*lock_unpoisoned(&self.state))
            .finish_non_exhaustive()
    }
}

impl ThreadSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current thread id, `None` until a response carried one.
    #[must_use]
    pub fn thread_id(&self) -> Option<String> {
        lock_unpoisoned(&self.state).thread_id.clone()
    }

    #[must_use]
    pub fn history(&self) -> Vec<HistoryEntry> {
        lock_unpoisoned(&self.state).history.clone()
    }

    #[must_use]
    pub fn last_response(&self) -> Option<String> {
        lock_unpoisoned(&self.state).last_response.clone()
    }

    #[must_use]
    pub fn snapshot(&self) -> ThreadState {
        lock_unpoisoned(&self.state).clone()
    }

    /// Request interceptor: rewrites `payload.body` to carry the thread id.
    ///
    /// The body becomes `{messages, format: "string", thread_id}` where
    /// `messages` is the existing `body.messages`, else `payload.text`, else the
    /// `{{text}}` placeholder. An unset thread id is sent as `""`.
    pub fn attach_thread_id(&self, payload: Value) -> Value {
        let thread_id = self.thread_id().unwrap_or_default();
        debug!(thread_id = %thread_id, "attaching thread id to outbound request");

        let mut payload = match payload {
            Value::Object(map) => map,
            Value::String(text) => {
                let mut map = Map::new();
                map.insert(TEXT_FIELD.to_owned(), Value::String(text));
                map
            }
            _ => Map::new(),
        };

        let messages = payload
            .get(BODY_FIELD)
            .and_then(|body| body.get(MESSAGES_FIELD))
            .filter(|value| is_truthy(value))
            .or_else(|| payload.get(TEXT_FIELD).filter(|value| is_truthy(value)))
            .cloned()
            .unwrap_or_else(|| Value::String(MESSAGES_PLACEHOLDER.to_owned()));

        payload.insert(
            BODY_FIELD.to_owned(),
            json!({
                "messages": messages,
                "format": BODY_FORMAT,
                "thread_id": thread_id,
            }),
        );
        Value::Object(payload)
    }

    /// Response interceptor: stores a thread id found in `response` and
    /// notifies thread-updated observers. Returns the response unchanged.
    ///
    /// Concurrent responses follow last-writer-wins.
    pub fn capture_thread_id(&self, response: Value) -> Value {
        let captured = {
            let mut state = lock_unpoisoned(&self.state);
            if let Some(text) = response.get(TEXT_FIELD).and_then(Value::as_str) {
                if !text.is_empty() {
                    state.last_response = Some(text.to_owned());
                }
            }
            extract_thread_id(&response).inspect(|thread_id| {
                state.thread_id = Some(thread_id.clone());
            })
        };

        if let Some(thread_id) = captured {
            info!(thread_id = %thread_id, "captured thread id");
            let callbacks = lock_unpoisoned(&self.observers).thread_updated.snapshot();
            for callback in callbacks {
                callback(&thread_id);
            }
        }

        response
    }

    /// Appends a user message.
    pub fn record_outbound(&self, text: &str) {
        lock_unpoisoned(&self.state)
            .history
            .push(HistoryEntry::user(text));
    }

    /// Appends an assistant message.
    pub fn record_inbound(&self, text: &str) {
        lock_unpoisoned(&self.state)
            .history
            .push(HistoryEntry::assistant(text));
    }

    /// Clears the thread and notifies reset observers. Always succeeds.
    pub fn reset(&self) -> bool {
        *lock_unpoisoned(&self.state) = ThreadState::default();
        info!("thread reset");

        let callbacks = lock_unpoisoned(&self.observers).reset.snapshot();
        for callback in callbacks {
            callback();
        }
        true
    }

    /// Registers a callback receiving every newly captured thread id.
    pub fn on_thread_updated<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        let id = self.next_subscription_id();
        lock_unpoisoned(&self.observers)
            .thread_updated
            .push(id, Arc::new(callback));
        id
    }

    /// Registers a callback invoked after every reset.
    pub fn on_reset<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.next_subscription_id();
        lock_unpoisoned(&self.observers)
            .reset
            .push(id, Arc::new(callback));
        id
    }

    /// Removes a subscription. Returns false for unknown ids.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = lock_unpoisoned(&self.observers);
        observers.thread_updated.remove(id) || observers.reset.remove(id)
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        let observers = lock_unpoisoned(&self.observers);
        observers.thread_updated.len() + observers.reset.len()
    }

    fn next_subscription_id(&self) -> SubscriptionId {
        SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed))
    }
}

/// Finds the thread id in a response, checking `thread_id`,
/// `details.thread_id` and `response.thread_id` in that order. Numeric ids
/// are kept in their decimal form; empty strings and other values are
/// skipped.
pub fn extract_thread_id(response: &Value) -> Option<String> {
    THREAD_ID_PATHS.iter().find_map(|path| {
        let value = path
            .iter()
            .try_fold(response, |value, segment| value.get(*segment))?;
        match value {
            Value::String(thread_id) if !thread_id.is_empty() => Some(thread_id.clone()),
            Value::Number(number) => Some(number.to_string()),
            _ => None,
        }
    })
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::String(text) => !text.is_empty(),
        _ => true,
    }
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
