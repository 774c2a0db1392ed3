//! Registry engine
//!
//! This module contains the in-process registry responsible for:
//! - mapping topics to ordered, identity-unique handler sets
//! - delivering published payloads to every handler of a topic
//! - isolating handler failures and reporting them to a `FaultSink`
//!
//! Concurrency and usage notes:
//! - All state sits behind one coarse lock shared by every operation.
//!   `Registry` is cheap to clone and clones share that state.
//! - The lock is never held while handlers run. `publish` snapshots the
//!   handler list first, so handlers may subscribe, unsubscribe or publish
//!   re-entrantly; such changes apply from the next `publish`.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt::{self, Debug};
use std::hash::Hash;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, trace};

use super::handler::{Handler, HandlerId, HandlerResult};
use super::sink::{DeliveryFault, DeliveryFaultKind, FaultSink, TracingSink};
use super::subscription::Subscription;
use super::topic::SubscriberSet;
use crate::config::RegistrySettings;

pub(crate) struct RegistryState<T, P> {
    pub(crate) subscribers: HashMap<T, SubscriberSet<P>>,
    /// Bumped by `clear` so subscriptions issued earlier become inert.
    pub(crate) epoch: u64,
}

impl<T, P> RegistryState<T, P>
where
    T: Eq + Hash,
{
    /// Removes `handler_id` from `topic` and drops the topic once it has no subscribers left.
    pub(crate) fn remove(&mut self, topic: &T, handler_id: HandlerId) -> bool {
        let Some(set) = self.subscribers.get_mut(topic) else {
            return false;
        };
        let removed = set.unsubscribe(handler_id);
        if set.is_empty() {
            self.subscribers.remove(topic);
        }
        removed
    }
}

pub(crate) fn lock_state<T, P>(
    state: &Mutex<RegistryState<T, P>>,
) -> MutexGuard<'_, RegistryState<T, P>> {
    // Every mutation completes before the guard is released, so a poisoned
    // lock still guards a consistent map.
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Topic-keyed publish/subscribe registry.
///
/// `T` is the topic key and `P` the payload type handed to handlers.
pub struct Registry<T = String, P = serde_json::Value> {
    state: Arc<Mutex<RegistryState<T, P>>>,
    sink: Arc<dyn FaultSink<T>>,
}

impl<T, P> Clone for Registry<T, P> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            sink: Arc::clone(&self.sink),
        }
    }
}

impl<T, P> Default for Registry<T, P>
where
    T: Eq + Hash + Clone + Debug + Send + Sync + 'static,
    P: 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P> Registry<T, P>
where
    T: Eq + Hash + Clone + Debug + Send + Sync + 'static,
    P: 'static,
{
    /// Creates an empty registry that logs delivery faults through `tracing`.
    pub fn new() -> Self {
        Self::with_settings(&RegistrySettings::default())
    }

    /// Creates an empty registry sized from `settings` that logs delivery faults through `tracing`.
    pub fn with_settings(settings: &RegistrySettings) -> Self {
        Self::with_settings_and_sink(settings, Arc::new(TracingSink))
    }

    /// Creates an empty registry that reports delivery faults to `sink`.
    pub fn with_sink(sink: Arc<dyn FaultSink<T>>) -> Self {
        Self::with_settings_and_sink(&RegistrySettings::default(), sink)
    }

    /// Creates an empty registry sized from `settings` that reports delivery faults to `sink`.
    pub fn with_settings_and_sink(
        settings: &RegistrySettings,
        sink: Arc<dyn FaultSink<T>>,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(RegistryState {
                subscribers: HashMap::with_capacity(settings.topic_capacity),
                epoch: 0,
            })),
            sink,
        }
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState<T, P>> {
        lock_state(&self.state)
    }

    /// Subscribes a new handler built from `callback` to `topic`.
    ///
    /// Every call creates an independent subscription, even for identical closures.
    pub fn subscribe<F>(&self, topic: impl Into<T>, callback: F) -> Subscription<T, P>
    where
        F: Fn(&P) -> HandlerResult + Send + Sync + 'static,
    {
        self.subscribe_handler(topic, &Handler::new(callback))
    }

    /// Subscribes an existing handler to `topic`.
    ///
    /// If the same handler (by identity) is already subscribed to `topic`,
    /// no duplicate entry is added and the returned subscription removes
    /// the single shared entry.
    pub fn subscribe_handler(
        &self,
        topic: impl Into<T>,
        handler: &Handler<P>,
    ) -> Subscription<T, P> {
        let topic = topic.into();
        let mut state = self.lock();
        let added = state
            .subscribers
            .entry(topic.clone())
            .or_default()
            .subscribe(handler.clone());
        debug!(topic = ?topic, handler_id = %handler.id(), added, "subscribed");

        Subscription::new(topic, handler.id(), state.epoch, Arc::downgrade(&self.state))
    }

    /// Delivers `payload` to every handler subscribed to `topic`, in registration order.
    ///
    /// A handler that returns an error or panics is reported to the fault
    /// sink and skipped; the remaining handlers still run. Publishing to a
    /// topic with no subscribers does nothing.
    pub fn publish<Q>(&self, topic: &Q, payload: &P)
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (key, handlers) = {
            let state = self.lock();
            match state.subscribers.get_key_value(topic) {
                Some((key, set)) => (key.clone(), set.snapshot()),
                None => {
                    trace!("publish to topic without subscribers");
                    return;
                }
            }
        };

        for handler in &handlers {
            self.deliver(&key, handler, payload);
        }
    }

    fn deliver(&self, topic: &T, handler: &Handler<P>, payload: &P) {
        let kind = match panic::catch_unwind(AssertUnwindSafe(|| handler.call(payload))) {
            Ok(Ok(())) => return,
            Ok(Err(err)) => DeliveryFaultKind::from_error(err),
            Err(panic) => DeliveryFaultKind::from_panic(panic),
        };
        let fault = DeliveryFault::new(topic.clone(), handler.id(), kind);
        if panic::catch_unwind(AssertUnwindSafe(|| self.sink.report(&fault))).is_err() {
            error!(
                topic = ?fault.topic,
                handler_id = %fault.handler_id,
                error = %fault.kind,
                "fault sink panicked while reporting a delivery fault"
            );
        }
    }

    /// Number of handlers currently subscribed to `topic`.
    pub fn subscriber_count<Q>(&self, topic: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.lock()
            .subscribers
            .get(topic)
            .map_or(0, SubscriberSet::len)
    }

    /// Whether `topic` has at least one subscriber.
    pub fn has_subscribers<Q>(&self, topic: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.subscriber_count(topic) > 0
    }

    /// Number of topics with at least one subscriber.
    pub fn topic_count(&self) -> usize {
        self.lock().subscribers.len()
    }

    /// Whether no topic has any subscriber.
    pub fn is_empty(&self) -> bool {
        self.lock().subscribers.is_empty()
    }

    /// Removes every topic and subscription.
    ///
    /// Subscriptions issued before the call become no-ops.
    pub fn clear(&self) {
        let mut state = self.lock();
        let topics = state.subscribers.len();
        state.subscribers.clear();
        state.epoch += 1;
        debug!(topics, "cleared registry");
    }
}

impl<T: Debug, P> Debug for Registry<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = lock_state(&self.state);
        f.debug_struct("Registry")
            .field("topics", &state.subscribers.keys().collect::<Vec<_>>())
            .field("epoch", &state.epoch)
            .finish()
    }
}
