//! Error types for mounting and writing reactive data.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Top-level error returned by [`mount`](crate::pipeline::mount) and the
/// view-model accessors.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Options(#[from] OptionsError),

    #[error(transparent)]
    Bind(#[from] BindError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("mount point `{0}` not found")]
    MountNotFound(String),
}

/// Invalid construction options.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("invalid data json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("data must be a JSON object, got {0}")]
    DataNotObject(&'static str),
}

/// A template referenced something the data object does not have.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BindError {
    #[error("<{tag}> binds unknown key `{key}`")]
    UnknownKey { key: String, tag: String },
}

/// A read or write addressed the reactive store incorrectly.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("`{0}` is not a reactive key")]
    UnknownKey(String),

    #[error("`{0}` holds an object; only an object can be assigned to it")]
    ExpectedObject(String),

    #[error("data key `{0}` contains `.`, which separates nested keys")]
    InvalidKey(String),
}

pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
