//! Binding Registry - Data key → dependent subscribers.
//!
//! Each reactive key owns two ordered lists:
//! - `directives` - property and two-way bindings
//! - `texts` - interpolated text
//!
//! Order is registration order, which is also notification order. Entries are
//! created when the store is installed and never removed.

use std::rc::Rc;

use indexmap::IndexMap;

use super::{Subscriber, SubscriberKind};

// =============================================================================
// Registry Entry
// =============================================================================

/// Subscribers registered against one key.
#[derive(Debug, Default)]
pub struct RegistryEntry {
    directives: Vec<Rc<Subscriber>>,
    texts: Vec<Rc<Subscriber>>,
}

impl RegistryEntry {
    pub fn directives(&self) -> &[Rc<Subscriber>] {
        &self.directives
    }

    pub fn texts(&self) -> &[Rc<Subscriber>] {
        &self.texts
    }

    pub fn len(&self) -> usize {
        self.directives.len() + self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&mut self, subscriber: Rc<Subscriber>) {
        match subscriber.kind() {
            SubscriberKind::Directive => self.directives.push(subscriber),
            SubscriberKind::Text => self.texts.push(subscriber),
        }
    }

    /// Directives first, then texts.
    fn ordered(&self) -> Vec<Rc<Subscriber>> {
        self.directives.iter().chain(&self.texts).cloned().collect()
    }
}

// =============================================================================
// Binding Registry
// =============================================================================

/// Address book consulted by the store on every write.
#[derive(Debug, Default)]
pub struct BindingRegistry {
    entries: IndexMap<String, RegistryEntry>,
}

impl BindingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty entry for `key`. Returns false if it already existed.
    pub fn create_entry(&mut self, key: &str) -> bool {
        if self.entries.contains_key(key) {
            return false;
        }
        self.entries.insert(key.to_string(), RegistryEntry::default());
        true
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn entry(&self, key: &str) -> Option<&RegistryEntry> {
        self.entries.get(key)
    }

    /// Register a subscriber under its own key.
    ///
    /// Returns false, and drops the subscriber, if the key has no entry.
    pub fn push(&mut self, subscriber: Rc<Subscriber>) -> bool {
        match self.entries.get_mut(subscriber.key()) {
            Some(entry) => {
                entry.push(subscriber);
                true
            }
            None => false,
        }
    }

    /// Snapshot of the subscribers to notify for `key`, in notification order.
    ///
    /// The snapshot lets callers release the registry borrow before running
    /// any callback.
    pub fn subscribers(&self, key: &str) -> Vec<Rc<Subscriber>> {
        self.entries
            .get(key)
            .map(RegistryEntry::ordered)
            .unwrap_or_default()
    }

    /// Keys in creation order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total subscribers across every key.
    pub fn subscriber_count(&self) -> usize {
        self.entries.values().map(RegistryEntry::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ReactiveStore;
    use serde_json::json;

    fn store() -> ReactiveStore {
        let data = json!({ "a": 1, "b": 2 });
        ReactiveStore::install(data.as_object().cloned().unwrap_or_default()).unwrap()
    }

    #[test]
    fn test_create_entry() {
        let mut registry = BindingRegistry::new();
        assert!(registry.create_entry("a"));
        assert!(!registry.create_entry("a"));
        assert!(registry.create_entry("b"));

        assert_eq!(registry.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(registry.len(), 2);
        assert!(registry.entry("a").unwrap().is_empty());
    }

    #[test]
    fn test_push_requires_entry() {
        let store = store();
        let mut registry = BindingRegistry::new();
        registry.create_entry("a");

        let ok = Subscriber::new(&store, "a", SubscriberKind::Text, |_, _| {});
        let missing = Subscriber::new(&store, "zzz", SubscriberKind::Text, |_, _| {});

        assert!(registry.push(ok));
        assert!(!registry.push(missing));
        assert_eq!(registry.subscriber_count(), 1);
    }

    #[test]
    fn test_directives_before_texts() {
        let store = store();
        let mut registry = BindingRegistry::new();
        registry.create_entry("a");

        let text = Subscriber::new(&store, "a", SubscriberKind::Text, |_, _| {});
        let directive = Subscriber::new(&store, "a", SubscriberKind::Directive, |_, _| {});
        registry.push(text.clone());
        registry.push(directive.clone());

        let ordered = registry.subscribers("a");
        assert_eq!(ordered.len(), 2);
        assert!(Rc::ptr_eq(&ordered[0], &directive));
        assert!(Rc::ptr_eq(&ordered[1], &text));
        assert!(registry.subscribers("b").is_empty());
    }
}
