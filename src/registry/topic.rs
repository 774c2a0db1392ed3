use super::handler::{Handler, HandlerId};

/// Ordered set of handlers registered for one topic.
///
/// Handlers keep registration order and are unique by [`HandlerId`].
/// Adding a handler that is already present has no effect.
#[derive(Debug)]
pub struct SubscriberSet<P> {
    handlers: Vec<Handler<P>>,
}

impl<P> Default for SubscriberSet<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> SubscriberSet<P> {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Adds the handler. Returns `false` if it was already a member.
    pub fn subscribe(&mut self, handler: Handler<P>) -> bool {
        if self.contains(handler.id()) {
            return false;
        }
        self.handlers.push(handler);
        true
    }

    /// Removes the handler with the given id. Returns `false` if it was not a member.
    pub fn unsubscribe(&mut self, id: HandlerId) -> bool {
        match self.handlers.iter().position(|h| h.id() == id) {
            Some(index) => {
                self.handlers.remove(index);
                true
            }
            None => false,
        }
    }

    /// Whether a handler with the given id is a member.
    pub fn contains(&self, id: HandlerId) -> bool {
        self.handlers.iter().any(|h| h.id() == id)
    }

    /// Number of handlers in the set.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether the set has no handlers left.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Clones the current handler list, in registration order.
    pub fn snapshot(&self) -> Vec<Handler<P>> {
        self.handlers.clone()
    }
}
