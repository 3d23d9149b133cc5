//! # spark-bind
//!
//! Reactive view-binding engine for Rust.
//!
//! Binds one data object to one DOM subtree. Writes to the data re-render the
//! dependent text and properties synchronously; `model` inputs write user
//! edits back into the data.
//!
//! ## Architecture
//!
//! ```text
//! Options → ReactiveStore (Signal per key) → compile(el) → Subscribers → DOM
//!                 ▲                                                     │
//!                 └──────────── input listeners (model) ────────────────┘
//! ```
//!
//! ## Template surface
//!
//! | Syntax                    | Meaning                                   |
//! |---------------------------|-------------------------------------------|
//! | `{{key}}` in element text | one-way text interpolation                |
//! | `bind:<prop>="key"`       | element `<prop>` mirrors `key`            |
//! | `model="key"`             | two-way binding on `input`/`textarea`     |
//! | `on:<event>="method"`     | `<event>` invokes `methods[method]`       |
//!
//! ## Modules
//!
//! - [`dom`] - Minimal host document (elements, events, selectors)
//! - [`engine`] - Reactive store, subscribers, binding registry
//! - [`compiler`] - Interpolation and directive compilation
//! - [`pipeline`] - Options and the mounted [`ViewModel`]

pub mod compiler;
pub mod dom;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use error::{BindError, Error, OptionsError, Result, StoreError};

pub use dom::{Document, Element, Event};

pub use engine::{BindingRegistry, ReactiveStore, RegistryEntry, Subscriber, SubscriberKind};

pub use compiler::{compile, CompileReport, Directive, Template};

pub use pipeline::{mount, MethodFn, Methods, Options, ViewModel, WeakViewModel};
