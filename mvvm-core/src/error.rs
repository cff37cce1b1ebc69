use std::time::Duration;

use thiserror::Error;

use crate::event::failure::CallbackFailure;

pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{} of the subscribers of event {event} failed", .failures.len())]
    Delivery {
        event: &'static str,
        failures: Vec<CallbackFailure>,
    },
    #[error("execution context {0} is closed and rejects new work")]
    ContextClosed(String),
    #[error("work on execution context {0} was dropped before it completed")]
    WorkAborted(String),
    #[error("publish of event {event} did not complete within {timeout:?}")]
    PublishTimeout {
        event: &'static str,
        timeout: Duration,
    },
    #[error("publish worker failed: {0}")]
    PublishWorker(String),
}

impl Error {
    pub fn failures(&self) -> &[CallbackFailure] {
        match self {
            Error::Delivery { failures, .. } => failures,
            _ => &[],
        }
    }
}
