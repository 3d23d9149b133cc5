//! Element - Shared DOM node handle.
//!
//! An [`Element`] is a cheap `Rc` handle. Cloning it yields another handle to
//! the same node, which is how subscribers and listeners reach the node they
//! render into. Listeners that need their own element hold a [`WeakElement`]
//! so that a node never keeps itself alive.

use std::cell::{Cell, Ref, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use serde_json::Value;

use crate::types::{display_value, BindingFlags};
use super::Event;

/// Event listener callback.
pub type Listener = Rc<dyn Fn(&Event)>;

/// Property names that alias the element's text content.
const TEXT_PROPERTIES: [&str; 2] = ["innerText", "textContent"];

/// Property holding the current value of input-capable elements.
pub const VALUE_PROPERTY: &str = "value";

// =============================================================================
// Element
// =============================================================================

/// Shared handle to a DOM node.
#[derive(Clone)]
pub struct Element {
    inner: Rc<ElementInner>,
}

/// Non-owning handle to a DOM node.
#[derive(Clone)]
pub struct WeakElement {
    inner: Weak<ElementInner>,
}

struct ElementInner {
    tag: String,
    attributes: RefCell<Vec<(String, String)>>,
    text: RefCell<String>,
    properties: RefCell<IndexMap<String, Value>>,
    children: RefCell<Vec<Element>>,
    listeners: RefCell<HashMap<String, Vec<Listener>>>,
    /// Text as it was before the first compile, with `{{key}}` tokens intact.
    template: RefCell<Option<String>>,
    bound_keys: RefCell<Vec<String>>,
    flags: Cell<BindingFlags>,
    mutations: Cell<usize>,
}

impl Element {
    /// Create an element with the given tag name.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(ElementInner {
                tag: tag.into(),
                attributes: RefCell::new(Vec::new()),
                text: RefCell::new(String::new()),
                properties: RefCell::new(IndexMap::new()),
                children: RefCell::new(Vec::new()),
                listeners: RefCell::new(HashMap::new()),
                template: RefCell::new(None),
                bound_keys: RefCell::new(Vec::new()),
                flags: Cell::new(BindingFlags::NONE),
                mutations: Cell::new(0),
            }),
        }
    }

    // -------------------------------------------------------------------------
    // Builder
    // -------------------------------------------------------------------------

    /// Set an attribute (builder form).
    pub fn attr(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Set the text content (builder form).
    pub fn text(self, text: impl Into<String>) -> Self {
        *self.inner.text.borrow_mut() = text.into();
        self
    }

    /// Append a child (builder form).
    pub fn child(self, child: Element) -> Self {
        self.append_child(child);
        self
    }

    // -------------------------------------------------------------------------
    // Identity
    // -------------------------------------------------------------------------

    pub fn tag(&self) -> &str {
        &self.inner.tag
    }

    /// The `id` attribute, if any.
    pub fn id(&self) -> Option<String> {
        self.attribute("id")
    }

    /// True if the `class` attribute lists `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .is_some_and(|list| list.split_whitespace().any(|c| c == class))
    }

    /// True for `<input>` and `<textarea>`.
    pub fn is_input_capable(&self) -> bool {
        self.tag().eq_ignore_ascii_case("input") || self.tag().eq_ignore_ascii_case("textarea")
    }

    /// True if both handles point at the same node.
    pub fn ptr_eq(&self, other: &Element) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn downgrade(&self) -> WeakElement {
        WeakElement {
            inner: Rc::downgrade(&self.inner),
        }
    }

    // -------------------------------------------------------------------------
    // Attributes
    // -------------------------------------------------------------------------

    /// Set or replace an attribute, keeping first-insertion order.
    pub fn set_attribute(&self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        let mut attributes = self.inner.attributes.borrow_mut();
        match attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => attributes.push((name, value)),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.inner
            .attributes
            .borrow()
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }

    /// Attribute names in document order.
    pub fn attribute_names(&self) -> Vec<String> {
        self.inner
            .attributes
            .borrow()
            .iter()
            .map(|(n, _)| n.clone())
            .collect()
    }

    // -------------------------------------------------------------------------
    // Text & Properties
    // -------------------------------------------------------------------------

    pub fn inner_text(&self) -> String {
        self.inner.text.borrow().clone()
    }

    pub fn set_inner_text(&self, text: impl Into<String>) {
        *self.inner.text.borrow_mut() = text.into();
        self.touch();
    }

    /// Read a property. `innerText`/`textContent` read the text content.
    pub fn property(&self, name: &str) -> Option<Value> {
        if TEXT_PROPERTIES.contains(&name) {
            return Some(Value::String(self.inner_text()));
        }
        self.inner.properties.borrow().get(name).cloned()
    }

    /// Assign a property. `innerText`/`textContent` replace the text content.
    pub fn set_property(&self, name: &str, value: Value) {
        if TEXT_PROPERTIES.contains(&name) {
            self.set_inner_text(display_value(&value));
            return;
        }
        self.inner.properties.borrow_mut().insert(name.to_string(), value);
        self.touch();
    }

    /// Current `value` property as a string (empty if unset).
    pub fn value(&self) -> String {
        self.inner
            .properties
            .borrow()
            .get(VALUE_PROPERTY)
            .map(display_value)
            .unwrap_or_default()
    }

    pub fn set_value(&self, value: impl Into<String>) {
        self.set_property(VALUE_PROPERTY, Value::String(value.into()));
    }

    /// Number of text/property writes this node has received.
    pub fn mutation_count(&self) -> usize {
        self.inner.mutations.get()
    }

    fn touch(&self) {
        self.inner.mutations.set(self.inner.mutations.get() + 1);
    }

    // -------------------------------------------------------------------------
    // Children
    // -------------------------------------------------------------------------

    pub fn append_child(&self, child: Element) {
        self.inner.children.borrow_mut().push(child);
    }

    /// Direct child elements in document order.
    pub fn children(&self) -> Ref<'_, Vec<Element>> {
        self.inner.children.borrow()
    }

    // -------------------------------------------------------------------------
    // Events
    // -------------------------------------------------------------------------

    pub fn add_event_listener(
        &self,
        event: impl Into<String>,
        listener: impl Fn(&Event) + 'static,
    ) {
        self.inner
            .listeners
            .borrow_mut()
            .entry(event.into())
            .or_default()
            .push(Rc::new(listener));
    }

    /// Number of listeners registered for `event`.
    pub fn listener_count(&self, event: &str) -> usize {
        self.inner
            .listeners
            .borrow()
            .get(event)
            .map_or(0, Vec::len)
    }

    /// Run every listener registered for the event's name, in order.
    ///
    /// Listeners may add listeners or mutate this node; the listener list is
    /// snapshotted before the first one runs.
    pub fn dispatch_event(&self, event: &Event) {
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .borrow()
            .get(event.name())
            .cloned()
            .unwrap_or_default();
        for listener in listeners {
            listener(event);
        }
    }

    /// Simulate a user edit: replace the value, then fire `input`.
    pub fn input_text(&self, text: impl Into<String>) {
        self.set_value(text);
        self.dispatch_event(&Event::input(self.clone()));
    }

    /// Simulate a click.
    pub fn click(&self) {
        self.dispatch_event(&Event::click(self.clone()));
    }

    // -------------------------------------------------------------------------
    // Binding bookkeeping
    // -------------------------------------------------------------------------

    /// The text this node had before it was first compiled.
    ///
    /// The first call records the current text; later calls return the
    /// recorded copy so recompiling never parses rendered output.
    pub fn template_text(&self) -> String {
        self.inner
            .template
            .borrow_mut()
            .get_or_insert_with(|| self.inner_text())
            .clone()
    }

    /// Data keys this node's text depends on.
    pub fn bound_keys(&self) -> Vec<String> {
        self.inner.bound_keys.borrow().clone()
    }

    /// Record a text dependency (duplicates are ignored).
    pub fn add_bound_key(&self, key: &str) {
        let mut keys = self.inner.bound_keys.borrow_mut();
        if !keys.iter().any(|k| k == key) {
            keys.push(key.to_string());
        }
    }

    pub fn flags(&self) -> BindingFlags {
        self.inner.flags.get()
    }

    pub fn insert_flags(&self, flags: BindingFlags) {
        self.inner.flags.set(self.inner.flags.get() | flags);
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("tag", &self.inner.tag)
            .field("attributes", &self.inner.attributes.borrow())
            .field("text", &self.inner.text.borrow())
            .field("children", &self.inner.children.borrow().len())
            .finish()
    }
}

impl WeakElement {
    pub fn upgrade(&self) -> Option<Element> {
        self.inner.upgrade().map(|inner| Element { inner })
    }
}
