//! # pubreg
//!
//! `pubreg` is a minimalist, in-process publish/subscribe registry.
//! Callers register handlers for named topics and other callers publish
//! values to those topics without holding references to each other.
//!
//! ## Core Modules
//!
//! - `registry`: the `Registry` that maps topics to ordered handler sets and
//!   delivers published payloads synchronously.
//! - `config`: loads and merges settings from files and environment variables.
//! - `utils`: shared error types and logging initialisation.
//!
//! ```rust
//! use pubreg::Registry;
//!
//! let registry: Registry<String, String> = Registry::new();
//! let sub = registry.subscribe("user:login", |name: &String| {
//!     println!("{name} logged in");
//!     Ok(())
//! });
//! registry.publish("user:login", &"Alice".to_string());
//! sub.unsubscribe();
//! assert_eq!(registry.subscriber_count("user:login"), 0);
//! ```

pub mod config;
pub mod registry;
pub mod utils;

pub use registry::{
    DeliveryFault, DeliveryFaultKind, FaultSink, Handler, HandlerError, HandlerId, HandlerResult,
    Registry, Subscription, TracingSink,
};
