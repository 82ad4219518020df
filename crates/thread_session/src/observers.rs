use std::sync::Arc;

/// Handle returned by a subscription; pass it back to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub(crate) u64);

/// Ordered callback list. Callbacks are cloned out before they run so the
/// owner's lock is never held across a callback.
pub(crate) struct ObserverList<F: ?Sized> {
    entries: Vec<(SubscriptionId, Arc<F>)>,
}

impl<F: ?Sized> Default for ObserverList<F> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<F: ?Sized> ObserverList<F> {
    pub(crate) fn push(&mut self, id: SubscriptionId, callback: Arc<F>) {
        self.entries.push((id, callback));
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub(crate) fn snapshot(&self) -> Vec<Arc<F>> {
        self.entries
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
