//! Core types shared across the binding engine.

use serde_json::Value;

// =============================================================================
// Binding Flags (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// What the compiler attached to an element.
    ///
    /// Combine with bitwise OR: `BindingFlags::TEXT | BindingFlags::PROPERTY`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct BindingFlags: u8 {
        const NONE = 0;
        /// Text content interpolates one or more `{{key}}` tokens.
        const TEXT = 1 << 0;
        /// A `bind:<prop>` directive mirrors a key into a property.
        const PROPERTY = 1 << 1;
        /// A `model` directive binds the element value both ways.
        const MODEL = 1 << 2;
        /// At least one native event listener was installed.
        const LISTENER = 1 << 3;
    }
}

impl BindingFlags {
    /// True if the compiler left the element untouched.
    pub fn is_unbound(self) -> bool {
        self.is_empty()
    }
}

// =============================================================================
// Value Equality
// =============================================================================

/// Equality used to short-circuit writes.
///
/// Numbers compare by numeric value (`1 == 1.0`); everything else compares
/// structurally and never across types.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
                x == y
            } else if let (Some(x), Some(y)) = (x.as_u64(), y.as_u64()) {
                x == y
            } else {
                x.as_f64() == y.as_f64()
            }
        }
        _ => a == b,
    }
}

// =============================================================================
// Value Rendering
// =============================================================================

/// Render a data value the way it appears inside element text.
///
/// Strings are inserted verbatim; everything else uses its JSON text
/// (`42`, `true`, `null`, `{"a":1}`).
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
