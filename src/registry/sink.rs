//! Observability sink for delivery faults.
//!
//! A fault is produced whenever a handler returns an error or panics while a
//! payload is being published. The registry hands each fault to its sink and
//! carries on delivering to the remaining handlers.

use std::any::Any;
use std::fmt::Debug;

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::handler::{HandlerError, HandlerId};

/// Why a single delivery failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryFaultKind {
    #[error("handler returned an error: {0}")]
    Failed(String),

    #[error("handler panicked: {0}")]
    Panicked(String),
}

impl DeliveryFaultKind {
    pub(crate) fn from_error(err: HandlerError) -> Self {
        DeliveryFaultKind::Failed(err.to_string())
    }

    pub(crate) fn from_panic(panic: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = panic.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = panic.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        DeliveryFaultKind::Panicked(message)
    }
}

/// A failed delivery to one handler on one topic.
#[derive(Debug, Clone)]
pub struct DeliveryFault<T> {
    pub topic: T,
    pub handler_id: HandlerId,
    pub kind: DeliveryFaultKind,
    pub occurred_at: DateTime<Utc>,
}

impl<T> DeliveryFault<T> {
    pub fn new(topic: T, handler_id: HandlerId, kind: DeliveryFaultKind) -> Self {
        Self {
            topic,
            handler_id,
            kind,
            occurred_at: Utc::now(),
        }
    }
}

/// Receives delivery faults reported by a [`Registry`](super::Registry).
///
/// Implementations must not call back into the registry that reported the
/// fault while holding locks of their own that a handler might also take.
/// A panic inside `report` is caught and logged; delivery to the remaining
/// handlers continues.
pub trait FaultSink<T>: Send + Sync {
    fn report(&self, fault: &DeliveryFault<T>);
}

impl<T, F> FaultSink<T> for F
where
    F: Fn(&DeliveryFault<T>) + Send + Sync,
{
    fn report(&self, fault: &DeliveryFault<T>) {
        self(fault)
    }
}

/// Default sink: logs every fault through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl<T: Debug> FaultSink<T> for TracingSink {
    fn report(&self, fault: &DeliveryFault<T>) {
        tracing::error!(
            topic = ?fault.topic,
            handler_id = %fault.handler_id,
            occurred_at = %fault.occurred_at,
            error = %fault.kind,
            "Error in subscriber"
        );
    }
}
