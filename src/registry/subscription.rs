use std::fmt::{self, Debug};
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, Weak};

use tracing::debug;

use super::engine::{RegistryState, lock_state};
use super::handler::HandlerId;

/// Capability returned by [`Registry::subscribe`](super::Registry::subscribe).
///
/// Calling [`unsubscribe`](Self::unsubscribe) removes exactly the handler it
/// was issued for, from exactly the topic it was issued for. It may be called
/// any number of times; calls after the first, after `clear`, or after the
/// registry is dropped do nothing, even if the same handler has been
/// subscribed again in the meantime.
///
/// Dropping a `Subscription` does not unsubscribe.
pub struct Subscription<T, P> {
    topic: T,
    handler_id: HandlerId,
    epoch: u64,
    state: Weak<Mutex<RegistryState<T, P>>>,
    consumed: AtomicBool,
}

impl<T, P> Subscription<T, P>
where
    T: Eq + Hash + Debug,
{
    pub(crate) fn new(
        topic: T,
        handler_id: HandlerId,
        epoch: u64,
        state: Weak<Mutex<RegistryState<T, P>>>,
    ) -> Self {
        Self {
            topic,
            handler_id,
            epoch,
            state,
            consumed: AtomicBool::new(false),
        }
    }

    /// Topic this subscription was issued for.
    pub fn topic(&self) -> &T {
        &self.topic
    }

    /// Identity of the subscribed handler.
    pub fn handler_id(&self) -> HandlerId {
        self.handler_id
    }

    /// Removes the bound handler from the bound topic, if still present.
    pub fn unsubscribe(&self) {
        if self.consumed.swap(true, Ordering::AcqRel) {
            return;
        }
        let Some(state) = self.state.upgrade() else {
            return;
        };
        let mut state = lock_state(&state);
        if state.epoch != self.epoch {
            return;
        }
        if state.remove(&self.topic, self.handler_id) {
            debug!(topic = ?self.topic, handler_id = %self.handler_id, "unsubscribed");
        }
    }

    /// Whether the bound handler is still subscribed to the bound topic.
    pub fn is_active(&self) -> bool {
        if self.consumed.load(Ordering::Acquire) {
            return false;
        }
        let Some(state) = self.state.upgrade() else {
            return false;
        };
        let state = lock_state(&state);
        state.epoch == self.epoch
            && state
                .subscribers
                .get(&self.topic)
                .is_some_and(|set| set.contains(self.handler_id))
    }
}

impl<T: Debug, P> Debug for Subscription<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("topic", &self.topic)
            .field("handler_id", &self.handler_id)
            .field("epoch", &self.epoch)
            .field("consumed", &self.consumed.load(Ordering::Relaxed))
            .finish()
    }
}
