use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

/// Error type a handler may return to signal a failed delivery.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Result type returned by every handler invocation.
pub type HandlerResult = Result<(), HandlerError>;

/// Unique identity of a [`Handler`].
///
/// Assigned once when the handler is constructed and shared by all of its clones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(Uuid);

impl HandlerId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handler-{}", self.0)
    }
}

type Callback<P> = dyn Fn(&P) -> HandlerResult + Send + Sync;

/// A subscriber callback with a stable identity.
///
/// Cloning a `Handler` is cheap and keeps its identity, so registering the
/// same `Handler` twice on one topic collapses to a single subscription.
/// Two handlers built from identical closures are still distinct.
pub struct Handler<P> {
    id: HandlerId,
    callback: Arc<Callback<P>>,
}

impl<P> Handler<P> {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&P) -> HandlerResult + Send + Sync + 'static,
    {
        Self {
            id: HandlerId::new(),
            callback: Arc::new(callback),
        }
    }

    pub fn id(&self) -> HandlerId {
        self.id
    }

    pub(crate) fn call(&self, payload: &P) -> HandlerResult {
        (self.callback)(payload)
    }
}

impl<P> Clone for Handler<P> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            callback: Arc::clone(&self.callback),
        }
    }
}

impl<P> fmt::Debug for Handler<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler").field("id", &self.id).finish()
    }
}
