use std::any::Any;
use std::collections::BTreeMap;
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

use ahash::HashMap;

use crate::dispatcher::ExecutionContext;
use crate::event::subscriber::SubscriberId;

pub(crate) type Payload = dyn Any + Send + Sync;

/// Typed callback erased at subscribe time. Yields `None` when handed a
/// payload of another type.
pub(crate) type Invoker = dyn Fn(&Payload) -> Option<anyhow::Result<()>> + Send + Sync;

pub(crate) struct Subscription {
    pub(crate) subscriber: SubscriberId,
    pub(crate) invoker: Box<Invoker>,
    pub(crate) context: Option<Arc<dyn ExecutionContext>>,
}

impl Debug for Subscription {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("subscriber", &self.subscriber)
            .field("context", &self.context.as_ref().map(|c| c.name()))
            .finish_non_exhaustive()
    }
}

impl Display for Subscription {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.context {
            None => write!(f, "{}", self.subscriber),
            Some(context) => write!(f, "{} on {}", self.subscriber, context.name()),
        }
    }
}

/// Subscriptions of one event kind, iterated in registration order and keyed
/// by subscriber for the duplicate check and removal.
#[derive(Debug, Default)]
pub(crate) struct Bucket {
    index: HashMap<SubscriberId, u64>,
    ordered: BTreeMap<u64, Arc<Subscription>>,
}

impl Bucket {
    pub(crate) fn contains(&self, subscriber: &SubscriberId) -> bool {
        self.index.contains_key(subscriber)
    }

    /// `sequence` must grow with every call so iteration follows registration.
    pub(crate) fn insert(&mut self, sequence: u64, subscription: Subscription) -> bool {
        if self.contains(&subscription.subscriber) {
            return false;
        }
        self.index.insert(subscription.subscriber, sequence);
        self.ordered.insert(sequence, Arc::new(subscription));
        true
    }

    pub(crate) fn remove(&mut self, subscriber: &SubscriberId) -> bool {
        match self.index.remove(subscriber) {
            Some(sequence) => self.ordered.remove(&sequence).is_some(),
            None => false,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.ordered.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub(crate) fn snapshot(&self) -> Vec<Arc<Subscription>> {
        self.ordered.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::event::subscriber::SubscriberId;
    use crate::event::subscription::{Bucket, Subscription};

    fn subscription(subscriber: SubscriberId) -> Subscription {
        Subscription {
            subscriber,
            invoker: Box::new(|_| Some(Ok(()))),
            context: None,
        }
    }

    #[test]
    fn test_bucket_keeps_registration_order() {
        let ids = (0..5).map(|_| SubscriberId::new()).collect::<Vec<_>>();
        let mut bucket = Bucket::default();
        for (sequence, id) in ids.iter().rev().enumerate() {
            assert!(bucket.insert(sequence as u64, subscription(*id)));
        }
        assert!(!bucket.insert(10, subscription(ids[2])));
        assert!(bucket.remove(&ids[2]));
        assert!(!bucket.remove(&ids[2]));
        let order = bucket.snapshot().iter().map(|s| s.subscriber).collect::<Vec<_>>();
        assert_eq!(order, vec![ids[4], ids[3], ids[1], ids[0]]);
        assert_eq!(bucket.len(), 4);
    }
}
