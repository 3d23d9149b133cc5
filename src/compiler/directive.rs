//! Directive - Tagged descriptor parsed from one element attribute.
//!
//! | Attribute                | Directive                      |
//! |--------------------------|--------------------------------|
//! | `bind:<prop>="key"`      | [`Directive::Bind`]            |
//! | `model="key"`            | [`Directive::Model`]           |
//! | `on:<event>="method"`    | [`Directive::On`]              |
//!
//! The `v-bind:`/`:`, `v-model` and `v-on:`/`@` spellings are accepted too.

use crate::dom::Element;

const BIND_PREFIXES: [&str; 3] = ["bind:", "v-bind:", ":"];
const MODEL_NAMES: [&str; 2] = ["model", "v-model"];
const ON_PREFIXES: [&str; 3] = ["on:", "v-on:", "@"];

/// A parsed binding directive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Directive {
    /// One-way: element `property` mirrors data `key`.
    Bind { property: String, key: String },
    /// Two-way: element value mirrors `key`, edits write back.
    Model { key: String },
    /// Element `event` invokes the method named `method`.
    On { event: String, method: String },
}

impl Directive {
    /// Parse one attribute. Returns `None` for anything that is not a
    /// directive, including directives with an empty target or value.
    pub fn parse(name: &str, value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }

        if MODEL_NAMES.contains(&name) {
            return Some(Self::Model { key: value.to_string() });
        }
        if let Some(property) = strip_any(name, &BIND_PREFIXES) {
            return Some(Self::Bind {
                property: property.to_string(),
                key: value.to_string(),
            });
        }
        if let Some(event) = strip_any(name, &ON_PREFIXES) {
            return Some(Self::On {
                event: event.to_string(),
                method: value.to_string(),
            });
        }
        None
    }

    /// The data key this directive reads, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Bind { key, .. } | Self::Model { key } => Some(key),
            Self::On { .. } => None,
        }
    }
}

/// Strip the first matching prefix, rejecting an empty remainder.
fn strip_any<'a>(name: &'a str, prefixes: &[&str]) -> Option<&'a str> {
    prefixes
        .iter()
        .find_map(|prefix| name.strip_prefix(prefix))
        .filter(|rest| !rest.is_empty())
}

/// Every directive on `element`, in attribute order.
pub fn parse_attributes(element: &Element) -> Vec<Directive> {
    element
        .attribute_names()
        .iter()
        .filter_map(|name| {
            let value = element.attribute(name)?;
            Directive::parse(name, &value)
        })
        .collect()
}
