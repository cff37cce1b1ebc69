use std::fmt::{Display, Formatter};

use crate::event::subscriber::SubscriberId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The callback returned an error.
    Error(String),
    /// The callback panicked and the panic was caught.
    Panic(String),
    /// The subscription's execution context could not run the callback.
    Context(String),
}

/// One subscriber that could not handle a published event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackFailure {
    pub event: &'static str,
    pub subscriber: SubscriberId,
    pub reason: FailureReason,
}

impl Display for FailureReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::Error(error) => write!(f, "callback error: {}", error),
            FailureReason::Panic(message) => write!(f, "callback panicked: {}", message),
            FailureReason::Context(error) => write!(f, "execution context: {}", error),
        }
    }
}

impl Display for CallbackFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed to handle {}, {}", self.subscriber, self.event, self.reason)
    }
}
