use std::fmt::{Debug, Formatter};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::task::JoinHandle;
use tracing::{debug, error, trace, warn};

use crate::config::mvvm_config::AggregatorConfig;
use crate::dispatcher::{call, ExecutionContext};
use crate::error::{Error, Result};
use crate::event::{Event, EventKind};
use crate::event::failure::{CallbackFailure, FailureReason};
use crate::event::subscriber::{Subscriber, SubscriberId};
use crate::event::subscription::{Bucket, Payload, Subscription};
use crate::ext::panic_message;

/// In-process typed publish/subscribe hub.
///
/// Cloning yields another handle to the same registry, so one aggregator can
/// be created by the composition root and handed to every view-model.
#[derive(Clone, Default)]
pub struct EventAggregator {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    registry: DashMap<EventKind, Bucket>,
    sequence: AtomicU64,
    config: AggregatorConfig,
}

#[derive(Debug, Copy, Clone)]
struct InvokePolicy {
    catch_panics: bool,
    slow_callback_warn: Duration,
}

impl EventAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AggregatorConfig) -> Self {
        let inner = Inner {
            registry: DashMap::new(),
            sequence: AtomicU64::new(0),
            config,
        };
        Self { inner: Arc::new(inner) }
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.inner.config
    }

    /// Run `callback` on the publishing thread whenever an `E` is published.
    /// Returns `false` if `subscriber` already listens to `E`.
    pub fn subscribe<E, F>(&self, subscriber: &impl Subscriber, callback: F) -> bool
        where
            E: Event,
            F: Fn(&E) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.register(subscriber.subscriber_id(), None, callback)
    }

    /// Like [`subscribe`](Self::subscribe) but `callback` runs on `context`.
    /// Synchronous publishing waits until the callback completed there.
    pub fn subscribe_on<E, C, F>(&self, subscriber: &impl Subscriber, context: C, callback: F) -> bool
        where
            E: Event,
            C: ExecutionContext,
            F: Fn(&E) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.register(subscriber.subscriber_id(), Some(Arc::new(context)), callback)
    }

    fn register<E, F>(&self, subscriber: SubscriberId, context: Option<Arc<dyn ExecutionContext>>, callback: F) -> bool
        where
            E: Event,
            F: Fn(&E) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let kind = EventKind::of::<E>();
        let mut bucket = self.inner.registry.entry(kind).or_default();
        if bucket.contains(&subscriber) {
            trace!("{} already subscribed to {}", subscriber, kind);
            return false;
        }
        let invoker = move |payload: &Payload| {
            payload.downcast_ref::<E>().map(|event| callback(event))
        };
        let subscription = Subscription {
            subscriber,
            invoker: Box::new(invoker),
            context,
        };
        trace!("{} subscribe to {}", subscription, kind);
        let sequence = self.inner.sequence.fetch_add(1, Ordering::Relaxed);
        bucket.insert(sequence, subscription)
    }

    /// Returns `true` iff `subscriber` was listening to `E`.
    pub fn unsubscribe<E>(&self, subscriber: &impl Subscriber) -> bool where E: Event {
        let kind = EventKind::of::<E>();
        let subscriber = subscriber.subscriber_id();
        let removed = match self.inner.registry.entry(kind) {
            Entry::Occupied(mut o) => {
                let removed = o.get_mut().remove(&subscriber);
                if o.get().is_empty() {
                    o.remove();
                }
                removed
            }
            Entry::Vacant(_) => false,
        };
        if removed {
            trace!("{} unsubscribe from {}", subscriber, kind);
        }
        removed
    }

    /// Drop every subscription of `subscriber`, typically when the owning
    /// view-model goes away. Returns `true` iff anything was removed.
    pub fn unsubscribe_all(&self, subscriber: &impl Subscriber) -> bool {
        let subscriber = subscriber.subscriber_id();
        let mut unsubscribe_events = vec![];
        self.inner.registry.retain(|kind, bucket| {
            if bucket.remove(&subscriber) {
                unsubscribe_events.push(kind.name());
            }
            !bucket.is_empty()
        });
        if unsubscribe_events.is_empty() {
            return false;
        }
        trace!("{} unsubscribe from {}", subscriber, unsubscribe_events.join(", "));
        true
    }

    /// Deliver `event` to every subscriber of `E` in registration order.
    ///
    /// Returns `false` when nobody listens to `E`. Failing callbacks are
    /// logged and skipped, use [`try_publish`](Self::try_publish) to get them.
    ///
    /// Subscribers bound to an [`ExecutionContext`] are waited for by parking
    /// the calling thread. This is allowed inside a tokio task, but it holds
    /// the runtime worker until delivery finished, so async callers should
    /// prefer [`publish_async`](Self::publish_async).
    pub fn publish<E>(&self, event: E) -> bool where E: Event {
        match self.try_publish(event) {
            Ok(published) => published,
            Err(error) => {
                debug!("{}", error);
                true
            }
        }
    }

    /// Same delivery as [`publish`](Self::publish), but reports failed
    /// callbacks as [`Error::Delivery`] once every subscriber was visited.
    pub fn try_publish<E>(&self, event: E) -> Result<bool> where E: Event {
        let kind = EventKind::of::<E>();
        let subscriptions = match self.inner.registry.get(&kind) {
            Some(bucket) => bucket.snapshot(),
            None => {
                trace!("no subscriber for event {}", kind);
                return Ok(false);
            }
        };
        let payload: Arc<Payload> = Arc::new(event);
        let policy = self.policy();
        let mut failures = vec![];
        for subscription in subscriptions {
            if let Err(reason) = Self::deliver(policy, kind, &subscription, &payload) {
                let failure = CallbackFailure {
                    event: kind.name(),
                    subscriber: subscription.subscriber,
                    reason,
                };
                error!("{}", failure);
                failures.push(failure);
            }
        }
        if failures.is_empty() {
            Ok(true)
        } else {
            Err(Error::Delivery { event: kind.name(), failures })
        }
    }

    /// Publish from a blocking worker so the caller never waits on a
    /// dispatcher. Bounded by `publish-timeout` when configured.
    pub async fn publish_async<E>(&self, event: E) -> Result<bool> where E: Event {
        match self.inner.config.publish_timeout {
            Some(timeout) => self.publish_timeout(event, timeout.to_std_duration()).await,
            None => Self::join(self.spawn_publish(event)).await,
        }
    }

    /// Publish from a blocking worker and give up waiting after `timeout`.
    /// Delivery that already started keeps running.
    pub async fn publish_timeout<E>(&self, event: E, timeout: Duration) -> Result<bool> where E: Event {
        let kind = EventKind::of::<E>();
        match tokio::time::timeout(timeout, Self::join(self.spawn_publish(event))).await {
            Ok(result) => result,
            Err(_) => {
                warn!("publish of {} still running after {:?}", kind, timeout);
                Err(Error::PublishTimeout { event: kind.name(), timeout })
            }
        }
    }

    fn spawn_publish<E>(&self, event: E) -> JoinHandle<Result<bool>> where E: Event {
        let aggregator = self.clone();
        tokio::task::spawn_blocking(move || aggregator.try_publish(event))
    }

    async fn join(handle: JoinHandle<Result<bool>>) -> Result<bool> {
        handle.await.map_err(|error| Error::PublishWorker(error.to_string()))?
    }

    pub fn subscriber_count<E>(&self) -> usize where E: Event {
        self.inner.registry.get(&EventKind::of::<E>()).map(|b| b.len()).unwrap_or(0)
    }

    pub fn is_subscribed<E>(&self, subscriber: &impl Subscriber) -> bool where E: Event {
        self.inner.registry
            .get(&EventKind::of::<E>())
            .is_some_and(|b| b.contains(&subscriber.subscriber_id()))
    }

    pub fn event_kinds(&self) -> Vec<EventKind> {
        self.inner.registry.iter().map(|e| *e.key()).collect()
    }

    fn policy(&self) -> InvokePolicy {
        InvokePolicy {
            catch_panics: self.inner.config.catch_panics,
            slow_callback_warn: self.inner.config.slow_callback_warn.to_std_duration(),
        }
    }

    fn deliver(
        policy: InvokePolicy,
        kind: EventKind,
        subscription: &Arc<Subscription>,
        payload: &Arc<Payload>,
    ) -> std::result::Result<(), FailureReason> {
        let context = match &subscription.context {
            None => return Self::invoke(policy, kind, subscription, payload),
            Some(context) => context,
        };
        let work = {
            let subscription = subscription.clone();
            let payload = payload.clone();
            move || Self::invoke(policy, kind, &subscription, &payload)
        };
        trace!("send event {} to {}", kind, subscription);
        call(context.as_ref(), work).map_err(|error| FailureReason::Context(error.to_string()))?
    }

    fn invoke(
        policy: InvokePolicy,
        kind: EventKind,
        subscription: &Subscription,
        payload: &Arc<Payload>,
    ) -> std::result::Result<(), FailureReason> {
        let payload: &Payload = payload.as_ref();
        let start = Instant::now();
        let outcome = if policy.catch_panics {
            catch_unwind(AssertUnwindSafe(|| (subscription.invoker)(payload)))
                .map_err(|panic| FailureReason::Panic(panic_message(panic.as_ref())))?
        } else {
            (subscription.invoker)(payload)
        };
        let elapsed = start.elapsed();
        if !policy.slow_callback_warn.is_zero() && elapsed > policy.slow_callback_warn {
            warn!("{} took {:?} to handle event {}", subscription, elapsed, kind);
        }
        match outcome {
            Some(Ok(())) => {
                trace!("publish event {} to {}", kind, subscription);
                Ok(())
            }
            Some(Err(error)) => Err(FailureReason::Error(format!("{:#}", error))),
            None => {
                warn!("{} skipped event {}, payload type does not match its callback", subscription, kind);
                Ok(())
            }
        }
    }
}

impl Debug for EventAggregator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let events = self.inner.registry
            .iter()
            .map(|e| (e.key().name(), e.value().len()))
            .collect::<Vec<_>>();
        f.debug_struct("EventAggregator")
            .field("events", &events)
            .field("config", &self.inner.config)
            .finish()
    }
}
