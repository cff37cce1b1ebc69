use std::any::{type_name, TypeId};
use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};

pub mod subscriber;
pub mod failure;
pub(crate) mod subscription;
pub mod event_aggregator;

/// A payload that can travel through the [`EventAggregator`](event_aggregator::EventAggregator).
///
/// The payload type is the channel: every publish of a `T` reaches the
/// subscribers registered for `T`. Implement it by hand or with
/// `#[derive(Event)]`, which also accepts `#[event(name = "...")]` to change
/// the name shown in logs.
pub trait Event: Send + Sync + 'static {
    fn name() -> &'static str {
        type_name::<Self>()
    }

    fn kind() -> EventKind where Self: Sized {
        EventKind::of::<Self>()
    }
}

/// Identity of an event channel. Compared by `TypeId`, the name is only used
/// for diagnostics.
#[derive(Copy, Clone)]
pub struct EventKind {
    id: TypeId,
    name: &'static str,
}

impl EventKind {
    pub fn of<E>() -> Self where E: Event {
        Self {
            id: TypeId::of::<E>(),
            name: E::name(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for EventKind {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EventKind {}

impl Hash for EventKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state)
    }
}

impl Debug for EventKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("EventKind")
            .field(&self.name)
            .finish()
    }
}

impl Display for EventKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use crate::event::{Event, EventKind};

    struct Saved;

    impl Event for Saved {}

    struct Renamed;

    impl Event for Renamed {
        fn name() -> &'static str {
            "document.renamed"
        }
    }

    #[test]
    fn test_kind_identity() {
        assert_eq!(Saved::kind(), EventKind::of::<Saved>());
        assert_ne!(Saved::kind(), Renamed::kind());
        assert!(Saved::kind().name().ends_with("Saved"));
        assert_eq!(Renamed::kind().to_string(), "document.renamed");
    }
}
