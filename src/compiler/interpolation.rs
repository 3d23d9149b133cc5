//! Interpolation - `{{key}}` tokens inside element text.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::Value;

use crate::types::display_value;

/// `{{` identifier `}}`, where the identifier is any run of non-brace chars.
static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^{}]+)\}\}").expect("interpolation pattern is valid"));

/// Immutable text template with its distinct keys.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Template {
    source: String,
    keys: Vec<String>,
}

impl Template {
    /// Scan `text` for interpolation tokens.
    ///
    /// Keys are trimmed, so `{{ name }}` binds `name`. Repeated keys appear
    /// once, in first-occurrence order.
    pub fn parse(text: impl Into<String>) -> Self {
        let source = text.into();
        let mut keys: Vec<String> = Vec::new();
        for caps in TOKEN.captures_iter(&source) {
            let key = caps[1].trim();
            if !key.is_empty() && !keys.iter().any(|k| k == key) {
                keys.push(key.to_string());
            }
        }
        Self { source, keys }
    }

    /// The original text, tokens intact.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Distinct bound keys.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// True if the text has no tokens.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Substitute every token with the current value of its key.
    ///
    /// Always starts from the original text, so a partial change never
    /// leaves another key's stale value or raw token behind. Tokens whose key
    /// `lookup` cannot resolve are kept verbatim.
    pub fn render(&self, lookup: impl Fn(&str) -> Option<Value>) -> String {
        TOKEN
            .replace_all(&self.source, |caps: &Captures<'_>| {
                let key = caps[1].trim();
                match lookup(key) {
                    Some(value) => display_value(&value),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }
}
