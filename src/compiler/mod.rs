//! Template Compiler - One pass over the mount point's children.
//!
//! For each direct child element, in document order:
//!
//! 1. **Interpolation** - every distinct `{{key}}` in the element text gets a
//!    text subscriber. The original text is kept as the template, so each
//!    render re-resolves all bound keys from scratch.
//! 2. **Directives** - each attribute is parsed into a [`Directive`] and wired
//!    to a property subscriber, a two-way binding, or an event listener.
//!
//! Every subscriber paints once as it registers. A key that the data object
//! does not have is a [`BindError`], and the whole mount fails.

mod directive;
mod interpolation;

pub use directive::*;
pub use interpolation::*;

use std::rc::Rc;

use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::dom::{Document, Element, INPUT};
use crate::engine::{ReactiveStore, SubscriberKind};
use crate::error::{BindError, Error, StoreError};
use crate::pipeline::ViewModel;
use crate::types::{display_value, BindingFlags};

/// What a compile pass wired up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompileReport {
    /// Direct children visited.
    pub elements: usize,
    /// Text subscribers registered.
    pub text_bindings: usize,
    /// Property and two-way subscribers registered.
    pub directive_bindings: usize,
    /// Native event listeners installed.
    pub listeners: usize,
}

/// Compile the element matching `selector` against `vm`.
pub fn compile(
    document: &Document,
    selector: &str,
    vm: &ViewModel,
) -> Result<CompileReport, Error> {
    let mount = document
        .query_selector(selector)
        .ok_or_else(|| Error::MountNotFound(selector.to_string()))?;

    let mut report = CompileReport::default();
    // Clone the handles so no borrow of the child list outlives a render
    let children: Vec<Element> = mount.children().clone();
    for node in &children {
        compile_text(node, vm.store(), &mut report)?;
        compile_directives(node, vm, &mut report)?;
        report.elements += 1;
    }

    debug!(
        selector,
        elements = report.elements,
        texts = report.text_bindings,
        directives = report.directive_bindings,
        listeners = report.listeners,
        "compiled"
    );
    Ok(report)
}

// =============================================================================
// Interpolation Pass
// =============================================================================

fn compile_text(
    node: &Element,
    store: &ReactiveStore,
    report: &mut CompileReport,
) -> Result<(), BindError> {
    let template = Template::parse(node.template_text());
    if template.is_empty() {
        return Ok(());
    }

    // Record every dependency before the first paint, so the first render
    // already resolves all keys.
    for key in template.keys() {
        node.add_bound_key(key);
    }

    let template = Rc::new(template);
    for key in template.keys() {
        let target = node.clone();
        let template = template.clone();
        store
            .subscribe(key, SubscriberKind::Text, move |_, store| {
                // Resolve every key the node depends on, not just the one
                // that changed
                let bound = target.bound_keys();
                let text = template.render(|k| {
                    bound.iter().any(|b| b == k).then(|| store.get(k)).flatten()
                });
                target.set_inner_text(text);
            })
            .map_err(|err| unknown_key(err, node))?;
        report.text_bindings += 1;
    }
    node.insert_flags(BindingFlags::TEXT);
    Ok(())
}

// =============================================================================
// Directive Pass
// =============================================================================

fn compile_directives(
    node: &Element,
    vm: &ViewModel,
    report: &mut CompileReport,
) -> Result<(), BindError> {
    let store = vm.store();

    for directive in parse_attributes(node) {
        trace!(tag = node.tag(), ?directive, "directive");
        match directive {
            Directive::Bind { property, key } => {
                let target = node.clone();
                store
                    .subscribe(&key, SubscriberKind::Directive, move |value, _| {
                        target.set_property(&property, value.clone());
                    })
                    .map_err(|err| unknown_key(err, node))?;
                node.insert_flags(BindingFlags::PROPERTY);
                report.directive_bindings += 1;
            }

            Directive::Model { key } => {
                if !node.is_input_capable() {
                    debug!(tag = node.tag(), key = %key, "model on non-input element ignored");
                    continue;
                }

                let target = node.clone();
                store
                    .subscribe(&key, SubscriberKind::Directive, move |value, _| {
                        target.set_value(display_value(value));
                    })
                    .map_err(|err| unknown_key(err, node))?;

                // Write user edits back through the store
                let source = node.downgrade();
                let weak_store = store.downgrade();
                node.add_event_listener(INPUT, move |_| {
                    let Some(source) = source.upgrade() else {
                        return;
                    };
                    let Some(store) = weak_store.upgrade() else {
                        return;
                    };
                    if let Err(err) = store.set(&key, Value::String(source.value())) {
                        warn!(%err, "two-way write failed");
                    }
                });

                node.insert_flags(BindingFlags::MODEL | BindingFlags::LISTENER);
                report.directive_bindings += 1;
                report.listeners += 1;
            }

            Directive::On { event, method } => {
                let weak_vm = vm.downgrade();
                node.add_event_listener(event, move |event| {
                    if let Some(vm) = weak_vm.upgrade() {
                        vm.call(&method, event);
                    }
                });
                node.insert_flags(BindingFlags::LISTENER);
                report.listeners += 1;
            }
        }
    }
    Ok(())
}

fn unknown_key(err: StoreError, node: &Element) -> BindError {
    let key = match err {
        StoreError::UnknownKey(key)
        | StoreError::ExpectedObject(key)
        | StoreError::InvalidKey(key) => key,
    };
    BindError::UnknownKey {
        key,
        tag: node.tag().to_string(),
    }
}
