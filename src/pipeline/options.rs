//! Options - What to bind and where.
//!
//! # Example
//!
//! ```ignore
//! use spark_bind::pipeline::Options;
//! use serde_json::json;
//!
//! let options = Options::new("#app")
//!     .data(json!({ "name": "A", "count": 0 }))?
//!     .method("inc", |vm, _event| {
//!         let n = vm.get("count").and_then(|v| v.as_i64()).unwrap_or(0);
//!         let _ = vm.set("count", n + 1);
//!     });
//! ```

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::dom::Event;
use crate::error::{json_kind, OptionsError};
use super::ViewModel;

/// Event handler invoked by `on:<event>` directives.
///
/// Called with the view-model as context and the native event.
pub type MethodFn = Rc<dyn Fn(&ViewModel, &Event)>;

// =============================================================================
// Methods
// =============================================================================

/// Named event handlers.
#[derive(Clone, Default)]
pub struct Methods {
    table: IndexMap<String, MethodFn>,
}

impl Methods {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a handler.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        method: impl Fn(&ViewModel, &Event) + 'static,
    ) {
        self.table.insert(name.into(), Rc::new(method));
    }

    pub fn get(&self, name: &str) -> Option<MethodFn> {
        self.table.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl fmt::Debug for Methods {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

// =============================================================================
// Options
// =============================================================================

/// Construction options for [`mount`](super::mount).
#[derive(Clone, Debug, Default)]
pub struct Options {
    /// Initial state. Only keys present here are ever reactive.
    pub data: Map<String, Value>,
    /// Handlers reachable from `on:` directives.
    pub methods: Methods,
    /// Mount point selector (`#id`, `.class` or tag).
    pub el: String,
}

impl Options {
    /// Options with empty data mounted at `el`.
    pub fn new(el: impl Into<String>) -> Self {
        Self {
            el: el.into(),
            ..Self::default()
        }
    }

    /// Options whose data is parsed from JSON text.
    pub fn from_json(el: impl Into<String>, json: &str) -> Result<Self, OptionsError> {
        let value: Value = serde_json::from_str(json)?;
        Self::new(el).data(value)
    }

    /// Replace the data object. It must be a JSON object.
    pub fn data(mut self, data: Value) -> Result<Self, OptionsError> {
        match data {
            Value::Object(map) => {
                self.data = map;
                Ok(self)
            }
            other => Err(OptionsError::DataNotObject(json_kind(&other))),
        }
    }

    /// Add a handler (builder form).
    pub fn method(
        mut self,
        name: impl Into<String>,
        method: impl Fn(&ViewModel, &Event) + 'static,
    ) -> Self {
        self.methods.insert(name, method);
        self
    }
}
