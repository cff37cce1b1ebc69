extern crate self as mvvm_core;

pub use mvvm_derive::{Event, PropertyNames};

pub mod error;
pub mod event;
pub mod dispatcher;
pub mod command;
pub mod view_model;
pub mod config;
pub mod ext;
pub mod listener;
pub mod util;

pub use error::{Error, Result};
pub use event::{Event, EventKind};
pub use event::event_aggregator::EventAggregator;
pub use event::subscriber::{Subscriber, SubscriberId};
pub use dispatcher::ExecutionContext;
pub use dispatcher::thread_dispatcher::ThreadDispatcher;

pub const MVVM_CONFIG: &'static str = include_str!("../mvvm.toml");
