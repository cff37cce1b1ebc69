use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

/// Handle returned when registering a change listener, used to remove it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Listeners notified in registration order. Notification works on a
/// snapshot, so a listener may add or remove listeners while being called.
pub(crate) struct Listeners<F: ?Sized> {
    next: AtomicU64,
    listeners: RwLock<Vec<(ListenerId, Arc<F>)>>,
}

impl<F: ?Sized> Listeners<F> {
    pub(crate) fn add(&self, listener: Arc<F>) -> ListenerId {
        let id = ListenerId(self.next.fetch_add(1, Ordering::Relaxed));
        self.listeners.write().push((id, listener));
        id
    }

    pub(crate) fn remove(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    pub(crate) fn snapshot(&self) -> Vec<Arc<F>> {
        self.listeners.read().iter().map(|(_, l)| l.clone()).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.read().len()
    }
}

impl<F: ?Sized> Default for Listeners<F> {
    fn default() -> Self {
        Self {
            next: AtomicU64::new(0),
            listeners: RwLock::new(vec![]),
        }
    }
}

impl<F: ?Sized> Debug for Listeners<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.len())
            .finish()
    }
}
