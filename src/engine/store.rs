//! Reactive Store - Intercepted reads and writes over the data object.
//!
//! Every scalar in the data object lives in its own `Signal` cell. Nested
//! objects are traversed fully and their leaves are addressed by dotted path
//! (`user.name`); the object key itself stays addressable and reads back as
//! an object reassembled from its leaves.
//!
//! # Writes
//!
//! `set` compares the incoming value with the current one. Equal values are a
//! silent no-op; numbers compare by numeric value, so `1.0` over `1` is equal.
//! Otherwise the cell is updated and every subscriber of the key is notified
//! (directives, then texts). Once all written leaves have cascaded, each
//! enclosing object key is notified exactly once, deepest first.
//!
//! Keys may not contain `.`, which separates nested keys.
//!
//! # Re-entrancy
//!
//! A subscriber that writes a *different* value to the key it is being
//! notified for would recurse forever. While a key (or an object enclosing
//! it) is notifying, such a write still lands in the cell but starts no
//! nested cascade.
//!
//! The skipped cascade leaves the DOM partly stale: subscribers that already
//! ran in the outer cascade keep showing the value they rendered, while those
//! that run after the nested write read the new one. For example, a directive
//! that upper-cases `name` as the user types `xy` leaves the data and later
//! `{{name}}` text at `XY` while the input, rendered earlier, still shows
//! `xy`.
//!
//! # Example
//!
//! ```ignore
//! use spark_bind::engine::{ReactiveStore, SubscriberKind};
//! use serde_json::json;
//!
//! let store = ReactiveStore::install(json!({ "n": 1 }).as_object().cloned().unwrap())?;
//! store.subscribe("n", SubscriberKind::Text, |v, _| println!("n = {v}"))?;
//! store.set("n", json!(2))?; // prints "n = 2"
//! ```

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use serde_json::{Map, Value};
use spark_signals::{signal, Signal};
use tracing::{trace, warn};

use crate::error::StoreError;
use crate::types::values_equal;
use super::{BindingRegistry, Subscriber, SubscriberKind};

// =============================================================================
// Store State
// =============================================================================

/// Shared handle to the reactive store.
#[derive(Clone)]
pub struct ReactiveStore {
    inner: Rc<StoreInner>,
}

/// Non-owning handle held by subscribers and listeners.
#[derive(Clone)]
pub struct WeakStore {
    inner: Weak<StoreInner>,
}

struct StoreInner {
    /// Every addressable path. Fixed at install time.
    nodes: IndexMap<String, StoreNode>,
    /// Top-level keys in data order.
    top_level: Vec<String>,
    registry: RefCell<BindingRegistry>,
    /// Keys whose cascade is currently running.
    notifying: RefCell<HashSet<String>>,
}

#[derive(Clone)]
enum StoreNode {
    Leaf(Signal<Value>),
    /// Full paths of the direct children, in data order.
    Object(Vec<String>),
}

impl ReactiveStore {
    /// Make every key of `data` reactive.
    ///
    /// Keys added to the data later are never reactive; bind only keys that
    /// exist here. Fails on a key containing `.` at any depth.
    pub fn install(data: Map<String, Value>) -> Result<Self, StoreError> {
        let mut nodes = IndexMap::new();
        let mut registry = BindingRegistry::new();
        let top_level = install_object(&mut nodes, &mut registry, None, data)?;

        trace!(keys = top_level.len(), paths = nodes.len(), "store installed");

        Ok(Self {
            inner: Rc::new(StoreInner {
                nodes,
                top_level,
                registry: RefCell::new(registry),
                notifying: RefCell::new(HashSet::new()),
            }),
        })
    }

    pub fn downgrade(&self) -> WeakStore {
        WeakStore {
            inner: Rc::downgrade(&self.inner),
        }
    }

    // -------------------------------------------------------------------------
    // Lookups
    // -------------------------------------------------------------------------

    /// Top-level keys in data order.
    pub fn keys(&self) -> &[String] {
        &self.inner.top_level
    }

    /// Every reactive path (objects and leaves), pre-order.
    pub fn paths(&self) -> Vec<String> {
        self.inner.nodes.keys().cloned().collect()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.inner.nodes.contains_key(path)
    }

    /// Current value at `path`. Object paths reassemble their leaves.
    pub fn get(&self, path: &str) -> Option<Value> {
        match self.inner.nodes.get(path)? {
            StoreNode::Leaf(cell) => Some(cell.get()),
            StoreNode::Object(children) => Some(Value::Object(
                children
                    .iter()
                    .filter_map(|child| {
                        let field = child[path.len() + 1..].to_string();
                        Some((field, self.get(child)?))
                    })
                    .collect(),
            )),
        }
    }

    /// Whole data object as it is now.
    pub fn snapshot(&self) -> Value {
        Value::Object(
            self.inner
                .top_level
                .iter()
                .filter_map(|key| Some((key.clone(), self.get(key)?)))
                .collect(),
        )
    }

    /// True while `path`'s notification cascade is running.
    pub fn is_notifying(&self, path: &str) -> bool {
        self.inner.notifying.borrow().contains(path)
    }

    // -------------------------------------------------------------------------
    // Writes
    // -------------------------------------------------------------------------

    /// Write `value` at `path` and notify dependents if it changed.
    ///
    /// Returns whether anything changed. Assigning an object to an object
    /// path writes each field into the matching existing leaf; fields that
    /// were not present at install time are ignored.
    pub fn set(&self, path: &str, value: Value) -> Result<bool, StoreError> {
        let mut cascaded = Vec::new();
        let result = self.assign(path, value, &mut cascaded);
        // Leaves written before a failing field still get their enclosing
        // objects refreshed
        self.notify_enclosing(&cascaded);
        result
    }

    /// Write without touching enclosing objects, collecting cascaded leaves.
    fn assign(
        &self,
        path: &str,
        value: Value,
        cascaded: &mut Vec<String>,
    ) -> Result<bool, StoreError> {
        let node = self
            .inner
            .nodes
            .get(path)
            .cloned()
            .ok_or_else(|| StoreError::UnknownKey(path.to_string()))?;

        match node {
            StoreNode::Leaf(cell) => Ok(self.write_leaf(path, &cell, value, cascaded)),
            StoreNode::Object(children) => self.write_object(path, &children, value, cascaded),
        }
    }

    fn write_leaf(
        &self,
        path: &str,
        cell: &Signal<Value>,
        value: Value,
        cascaded: &mut Vec<String>,
    ) -> bool {
        if values_equal(&cell.get(), &value) {
            return false;
        }
        cell.set(value);

        if self.is_guarded(path) {
            warn!(key = path, "write during own notification, nested cascade skipped");
            return true;
        }
        self.notify_once(path);
        cascaded.push(path.to_string());
        true
    }

    fn write_object(
        &self,
        path: &str,
        children: &[String],
        value: Value,
        cascaded: &mut Vec<String>,
    ) -> Result<bool, StoreError> {
        let Value::Object(fields) = value else {
            return Err(StoreError::ExpectedObject(path.to_string()));
        };

        let mut changed = false;
        for (field, value) in fields {
            let child = format!("{path}.{field}");
            if children.contains(&child) {
                changed |= self.assign(&child, value, cascaded)?;
            } else {
                warn!(key = path, field = %field, "field is not reactive, ignored");
            }
        }
        Ok(changed)
    }

    /// True if `path` or an object enclosing it is mid-cascade.
    fn is_guarded(&self, path: &str) -> bool {
        let notifying = self.inner.notifying.borrow();
        std::iter::once(path)
            .chain(ancestors(path))
            .any(|key| notifying.contains(key))
    }

    /// Notify each object enclosing any of `leaves` once, deepest first.
    fn notify_enclosing(&self, leaves: &[String]) {
        let mut keys: Vec<&str> = Vec::new();
        for leaf in leaves {
            for key in ancestors(leaf) {
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
        }
        keys.sort_by_key(|key| std::cmp::Reverse(key.matches('.').count()));

        for key in keys {
            self.notify_once(key);
        }
    }

    /// Run `key`'s subscribers unless its cascade is already running.
    fn notify_once(&self, key: &str) {
        if !self.inner.notifying.borrow_mut().insert(key.to_string()) {
            return;
        }
        // Snapshot so no borrow is held while callbacks run
        let subscribers = self.inner.registry.borrow().subscribers(key);
        trace!(key, subscribers = subscribers.len(), "notify");
        for subscriber in subscribers {
            subscriber.notify();
        }
        self.inner.notifying.borrow_mut().remove(key);
    }

    // -------------------------------------------------------------------------
    // Subscriptions
    // -------------------------------------------------------------------------

    /// Create a subscriber for `key`, paint it once, and register it.
    pub fn subscribe(
        &self,
        key: &str,
        kind: SubscriberKind,
        render: impl Fn(&Value, &ReactiveStore) + 'static,
    ) -> Result<Rc<Subscriber>, StoreError> {
        if !self.inner.registry.borrow().contains(key) {
            return Err(StoreError::UnknownKey(key.to_string()));
        }
        let subscriber = Subscriber::new(self, key, kind, render);
        self.inner.registry.borrow_mut().push(subscriber.clone());
        trace!(key, ?kind, "subscribed");
        Ok(subscriber)
    }

    /// Read-only access to the registry.
    pub fn with_registry<R>(&self, f: impl FnOnce(&BindingRegistry) -> R) -> R {
        f(&self.inner.registry.borrow())
    }

    /// Number of subscribers registered under `key`.
    pub fn subscriber_count(&self, key: &str) -> usize {
        self.with_registry(|registry| {
            registry.entry(key).map_or(0, |entry| entry.len())
        })
    }
}

impl WeakStore {
    pub fn upgrade(&self) -> Option<ReactiveStore> {
        self.inner.upgrade().map(|inner| ReactiveStore { inner })
    }
}

// =============================================================================
// Install Helpers
// =============================================================================

/// Install every key of `data` below `prefix`, returning the child paths.
fn install_object(
    nodes: &mut IndexMap<String, StoreNode>,
    registry: &mut BindingRegistry,
    prefix: Option<&str>,
    data: Map<String, Value>,
) -> Result<Vec<String>, StoreError> {
    let mut children = Vec::with_capacity(data.len());

    for (key, value) in data {
        if key.contains('.') {
            return Err(StoreError::InvalidKey(key));
        }
        let path = match prefix {
            Some(prefix) => format!("{prefix}.{key}"),
            None => key,
        };
        registry.create_entry(&path);

        match value {
            Value::Object(inner) => {
                // Reserve the slot first so paths stay pre-ordered
                nodes.insert(path.clone(), StoreNode::Object(Vec::new()));
                let grandchildren = install_object(nodes, registry, Some(&path), inner)?;
                nodes.insert(path.clone(), StoreNode::Object(grandchildren));
            }
            scalar => {
                nodes.insert(path.clone(), StoreNode::Leaf(signal(scalar)));
            }
        }
        children.push(path);
    }

    Ok(children)
}

/// Enclosing object paths of `path`, deepest first.
fn ancestors(path: &str) -> impl Iterator<Item = &str> {
    path.rmatch_indices('.').map(move |(i, _)| &path[..i])
}
