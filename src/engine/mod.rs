//! Binding Engine - Reactive store, subscribers and the binding registry.
//!
//! The engine owns everything that turns a data write into DOM updates:
//! - Store: one reactive cell per data key, nested objects addressed by path
//! - Subscriber: "this output location depends on this key"
//! - Registry: key → ordered directive and text subscribers
//!
//! # Architecture
//!
//! ```text
//! store.set("name", v) → registry["name"] → directives… → texts… → DOM
//! ```
//!
//! A write runs its whole cascade synchronously before returning. Nothing is
//! batched or deferred.

mod registry;
mod store;
mod subscriber;

pub use registry::*;
pub use store::*;
pub use subscriber::*;
