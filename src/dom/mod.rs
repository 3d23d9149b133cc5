//! DOM Module - Minimal host document for the binding engine
//!
//! Elements are shared handles (`Rc`) so the compiler, subscribers and event
//! listeners can all point at the same node:
//!
//! - **Element** - tag, attributes, text, properties, children, listeners
//! - **Event** - native event passed to listeners and bound methods
//! - **Document** - root element plus selector lookup
//!
//! # Example
//!
//! ```ignore
//! use spark_bind::dom::{Document, Element};
//!
//! let doc = Document::new(
//!     Element::new("div").attr("id", "app")
//!         .child(Element::new("p").text("Hi {{name}}"))
//!         .child(Element::new("input").attr("model", "name")),
//! );
//! let app = doc.query_selector("#app").unwrap();
//! ```

mod document;
mod element;
mod event;

pub use document::*;
pub use element::*;
pub use event::*;
