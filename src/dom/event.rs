//! Native events dispatched to element listeners.

use super::Element;

/// Event name fired by user edits of input-capable elements.
pub const INPUT: &str = "input";

/// Event name fired by clicks.
pub const CLICK: &str = "click";

/// A native event.
#[derive(Clone, Debug)]
pub struct Event {
    name: String,
    target: Element,
}

impl Event {
    /// Create an event of the given name aimed at `target`.
    pub fn new(name: impl Into<String>, target: Element) -> Self {
        Self {
            name: name.into(),
            target,
        }
    }

    /// Create an `input` event.
    pub fn input(target: Element) -> Self {
        Self::new(INPUT, target)
    }

    /// Create a `click` event.
    pub fn click(target: Element) -> Self {
        Self::new(CLICK, target)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The element the event was dispatched on.
    pub fn target(&self) -> &Element {
        &self.target
    }
}
