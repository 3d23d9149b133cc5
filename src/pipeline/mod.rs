//! Pipeline - Construction options and the mounted view-model.
//!
//! ```text
//! Options → ReactiveStore::install → compile(el) → accessor table → ViewModel
//! ```
//!
//! Compilation runs after the store is installed, so subscribers attach to
//! keys that are already reactive. The accessor table comes last; the store
//! does not need it to react.

pub mod mount;
pub mod options;

// Re-exports
pub use mount::{mount, ViewModel, WeakViewModel};
pub use options::{MethodFn, Methods, Options};
