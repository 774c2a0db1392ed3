//! The `registry` module holds the publish/subscribe core: topics, handler
//! sets, subscription capabilities and delivery fault reporting.

pub mod engine;
pub mod handler;
pub mod sink;
pub mod subscription;
pub mod topic;

pub use engine::Registry;
pub use handler::{Handler, HandlerError, HandlerId, HandlerResult};
pub use sink::{DeliveryFault, DeliveryFaultKind, FaultSink, TracingSink};
pub use subscription::Subscription;
