use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

static SUBSCRIBER_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identity token owned by whoever subscribes. Two tokens are equal
/// only if one was copied from the other.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl SubscriberId {
    pub fn new() -> Self {
        SubscriberId(SUBSCRIBER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for SubscriberId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "subscriber#{}", self.0)
    }
}

/// Anything that can own subscriptions, typically a view-model holding a
/// [`SubscriberId`] for its whole lifetime.
pub trait Subscriber {
    fn subscriber_id(&self) -> SubscriberId;
}

impl Subscriber for SubscriberId {
    fn subscriber_id(&self) -> SubscriberId {
        *self
    }
}

impl<S> Subscriber for &S where S: Subscriber + ?Sized {
    fn subscriber_id(&self) -> SubscriberId {
        (**self).subscriber_id()
    }
}

impl<S> Subscriber for Arc<S> where S: Subscriber + ?Sized {
    fn subscriber_id(&self) -> SubscriberId {
        (**self).subscriber_id()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use crate::event::subscriber::{Subscriber, SubscriberId};

    struct Panel {
        id: SubscriberId,
    }

    impl Subscriber for Panel {
        fn subscriber_id(&self) -> SubscriberId {
            self.id
        }
    }

    #[test]
    fn test_unique_tokens() {
        let ids = (0..64).map(|_| SubscriberId::new()).collect::<HashSet<_>>();
        assert_eq!(ids.len(), 64);
    }

    #[test]
    fn test_identity_through_wrappers() {
        let panel = Arc::new(Panel { id: SubscriberId::new() });
        let copied = panel.id;
        assert_eq!(panel.subscriber_id(), copied);
        assert_eq!((&panel).subscriber_id(), copied);
        assert_eq!(copied.subscriber_id(), copied);
        assert_ne!(Panel { id: SubscriberId::new() }.subscriber_id(), copied);
    }
}
