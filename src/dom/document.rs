//! Document - root element and selector lookup.

use super::Element;

/// A host document: one root element and everything below it.
#[derive(Clone, Debug)]
pub struct Document {
    root: Element,
}

/// A parsed simple selector.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Selector<'a> {
    Id(&'a str),
    Class(&'a str),
    Tag(&'a str),
}

impl<'a> Selector<'a> {
    fn parse(selector: &'a str) -> Option<Self> {
        let selector = selector.trim();
        if let Some(id) = selector.strip_prefix('#') {
            (!id.is_empty()).then_some(Self::Id(id))
        } else if let Some(class) = selector.strip_prefix('.') {
            (!class.is_empty()).then_some(Self::Class(class))
        } else {
            (!selector.is_empty()).then_some(Self::Tag(selector))
        }
    }

    fn matches(&self, element: &Element) -> bool {
        match self {
            Self::Id(id) => element.id().as_deref() == Some(*id),
            Self::Class(class) => element.has_class(class),
            Self::Tag(tag) => element.tag().eq_ignore_ascii_case(tag),
        }
    }
}

impl Document {
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// First element matching `selector` in depth-first document order,
    /// root included.
    ///
    /// Supports `#id`, `.class` and bare tag names.
    pub fn query_selector(&self, selector: &str) -> Option<Element> {
        let selector = Selector::parse(selector)?;
        find_first(&self.root, &selector)
    }

    /// Shorthand for `query_selector("#id")`.
    pub fn get_element_by_id(&self, id: &str) -> Option<Element> {
        find_first(&self.root, &Selector::Id(id))
    }
}

fn find_first(element: &Element, selector: &Selector<'_>) -> Option<Element> {
    if selector.matches(element) {
        return Some(element.clone());
    }
    element
        .children()
        .iter()
        .find_map(|child| find_first(child, selector))
}
