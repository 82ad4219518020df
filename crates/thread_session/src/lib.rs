mod history;
mod observers;
mod session;

pub use history::{HistoryEntry, Role};
pub use observers::SubscriptionId;
pub use session::{extract_thread_id, ThreadSession, ThreadState, THREAD_ID_FIELD};
