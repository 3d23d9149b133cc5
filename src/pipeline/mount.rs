//! Mount API - Build the view-model over a document.
//!
//! `mount` runs, in order:
//! 1. Install the reactive store over `options.data`
//! 2. Compile the mount point (subscribers attach to already-reactive keys)
//! 3. Install the accessor table for top-level keys
//!
//! # Example
//!
//! ```ignore
//! use spark_bind::dom::{Document, Element};
//! use spark_bind::pipeline::{mount, Options};
//! use serde_json::json;
//!
//! let doc = Document::new(
//!     Element::new("div").attr("id", "app").child(Element::new("p").text("Hi {{name}}")),
//! );
//! let vm = mount(&doc, Options::new("#app").data(json!({ "name": "A" }))?)?;
//!
//! vm.set("name", "B")?; // <p> now reads "Hi B"
//! ```

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use serde_json::Value;
use tracing::{debug, trace};

use crate::compiler::{self, CompileReport};
use crate::dom::{Document, Event};
use crate::engine::ReactiveStore;
use crate::error::{Result, StoreError};
use crate::types::values_equal;
use super::{Methods, Options};

// =============================================================================
// View-Model
// =============================================================================

/// The mounted facade. Cloning yields another handle to the same state.
#[derive(Clone)]
pub struct ViewModel {
    state: Rc<VmState>,
}

/// Non-owning handle held by `on:` listeners.
#[derive(Clone)]
pub struct WeakViewModel {
    state: Weak<VmState>,
}

struct VmState {
    store: ReactiveStore,
    methods: Methods,
    el: String,
    document: Document,
    /// Top-level keys reachable through `get`/`set`. Empty until compiled.
    accessors: RefCell<Vec<String>>,
    report: Cell<CompileReport>,
}

// =============================================================================
// Mount Function
// =============================================================================

/// Bind `options.data` to the element matching `options.el`.
///
/// Fails if the mount point is missing or the template binds a key that the
/// data does not have.
pub fn mount(document: &Document, options: Options) -> Result<ViewModel> {
    let Options { data, methods, el } = options;

    let vm = ViewModel {
        state: Rc::new(VmState {
            store: ReactiveStore::install(data)?,
            methods,
            el,
            document: document.clone(),
            accessors: RefCell::new(Vec::new()),
            report: Cell::new(CompileReport::default()),
        }),
    };

    let report = compiler::compile(document, &vm.state.el, &vm)?;
    vm.state.report.set(report);
    vm.install_accessors();

    debug!(
        el = %vm.state.el,
        keys = vm.state.store.keys().len(),
        subscribers = vm.state.store.with_registry(|r| r.subscriber_count()),
        "mounted"
    );
    Ok(vm)
}

impl ViewModel {
    fn install_accessors(&self) {
        *self.state.accessors.borrow_mut() = self.state.store.keys().to_vec();
    }

    fn has_accessor(&self, key: &str) -> bool {
        self.state.accessors.borrow().iter().any(|k| k == key)
    }

    pub fn downgrade(&self) -> WeakViewModel {
        WeakViewModel {
            state: Rc::downgrade(&self.state),
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Top-level keys with an accessor, in data order.
    pub fn keys(&self) -> Vec<String> {
        self.state.accessors.borrow().clone()
    }

    /// Read a top-level key.
    pub fn get(&self, key: &str) -> Option<Value> {
        if !self.has_accessor(key) {
            return None;
        }
        self.state.store.get(key)
    }

    /// Write a top-level key. Returns whether the value changed.
    ///
    /// A changed value runs the whole notification cascade before returning.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> Result<bool> {
        if !self.has_accessor(key) {
            return Err(StoreError::UnknownKey(key.to_string()).into());
        }
        let value = value.into();
        if self
            .state
            .store
            .get(key)
            .is_some_and(|current| values_equal(&current, &value))
        {
            return Ok(false);
        }
        Ok(self.state.store.set(key, value)?)
    }

    /// Read any reactive path, e.g. `user.name`.
    pub fn get_path(&self, path: &str) -> Option<Value> {
        self.state.store.get(path)
    }

    /// Write any reactive path, e.g. `user.name`.
    pub fn set_path(&self, path: &str, value: impl Into<Value>) -> Result<bool> {
        Ok(self.state.store.set(path, value.into())?)
    }

    /// The whole data object as it is now.
    pub fn data(&self) -> Value {
        self.state.store.snapshot()
    }

    // -------------------------------------------------------------------------
    // Methods
    // -------------------------------------------------------------------------

    /// Invoke a method with this view-model as context.
    ///
    /// Returns false, doing nothing, if no such method exists.
    pub fn call(&self, method: &str, event: &Event) -> bool {
        let Some(handler) = self.state.methods.get(method) else {
            trace!(method, "no such method");
            return false;
        };
        handler(self, event);
        true
    }

    pub fn has_method(&self, method: &str) -> bool {
        self.state.methods.contains(method)
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    pub fn store(&self) -> &ReactiveStore {
        &self.state.store
    }

    pub fn document(&self) -> &Document {
        &self.state.document
    }

    /// Mount point selector.
    pub fn el(&self) -> &str {
        &self.state.el
    }

    /// What the compile pass wired up.
    pub fn report(&self) -> CompileReport {
        self.state.report.get()
    }
}

impl WeakViewModel {
    pub fn upgrade(&self) -> Option<ViewModel> {
        self.state.upgrade().map(|state| ViewModel { state })
    }
}
