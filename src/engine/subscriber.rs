//! Subscriber - One output location bound to one data key.

use std::fmt;
use std::rc::Rc;

use serde_json::Value;
use tracing::trace;

use super::{ReactiveStore, WeakStore};

/// Render callback. Receives the key's current value and the store, so it can
/// read any other key it also depends on.
pub type RenderFn = Box<dyn Fn(&Value, &ReactiveStore)>;

/// Which registry list a subscriber belongs to.
///
/// Directive subscribers are always notified before text subscribers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubscriberKind {
    /// `bind:` and `model` directives writing element properties.
    Directive,
    /// `{{key}}` interpolation writing element text.
    Text,
}

/// A (key, render callback) pair.
///
/// Holds only a weak reference to the store: the store's registry owns the
/// subscriber, not the other way round.
pub struct Subscriber {
    store: WeakStore,
    key: String,
    kind: SubscriberKind,
    render: RenderFn,
}

impl Subscriber {
    /// Create a subscriber and paint once with the key's current value.
    pub fn new(
        store: &ReactiveStore,
        key: impl Into<String>,
        kind: SubscriberKind,
        render: impl Fn(&Value, &ReactiveStore) + 'static,
    ) -> Rc<Self> {
        let subscriber = Rc::new(Self {
            store: store.downgrade(),
            key: key.into(),
            kind,
            render: Box::new(render),
        });
        subscriber.notify();
        subscriber
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn kind(&self) -> SubscriberKind {
        self.kind
    }

    /// Re-run the render callback with the current value.
    ///
    /// No-op once the store is gone.
    pub fn notify(&self) {
        let Some(store) = self.store.upgrade() else {
            return;
        };
        let value = store.get(&self.key).unwrap_or(Value::Null);
        trace!(key = %self.key, kind = ?self.kind, "render");
        (self.render)(&value, &store);
    }
}

impl fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriber")
            .field("key", &self.key)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}
