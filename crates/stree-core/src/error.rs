//! Error types for path parsing, tree access, mutation and (de)serialization.

use crate::value::Kind;
use thiserror::Error;

/// Errors produced while parsing the textual form of a field path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The path text does not start with `.`.
    #[error("path lacks prefix '.': {path:?}")]
    MissingPrefix { path: String },

    /// A `[...]` subscript is not a non-negative decimal integer, is
    /// unterminated, or has a leading zero.
    #[error("bad subscript {subscript:?} in path {path:?}")]
    BadSubscript { path: String, subscript: String },

    /// A component has no key name (`..`, trailing `.`, or `.[0]`).
    #[error("empty key name at byte {offset} in path {path:?}")]
    EmptyComponent { path: String, offset: usize },

    /// A backslash is followed by something other than `.`, `\`, `[` or `]`.
    #[error("bad escape at byte {offset} in path {path:?}")]
    BadEscape { path: String, offset: usize },

    /// The path has more components than [`MAX_DEPTH`](crate::path::MAX_DEPTH).
    #[error("path {path:?} has more than {limit} components")]
    TooDeep { path: String, limit: usize },
}

/// Errors that can occur while reading, writing or converting a tree.
#[derive(Error, Debug)]
pub enum TreeError {
    /// The path text failed to parse.
    #[error("path syntax error: {0}")]
    Path(#[from] PathError),

    /// A map along the path has no entry for the key.
    #[error("key not found: {path}")]
    KeyNotFound { path: String },

    /// A subscript is outside the bounds of the list it addresses.
    #[error("index {index} out of range for list of length {len} at {path}")]
    IndexOutOfRange {
        path: String,
        index: usize,
        len: usize,
    },

    /// A subscript on a missing key asks for a list longer than
    /// [`MAX_SYNTHESIZED_INDEX`](crate::mutate::MAX_SYNTHESIZED_INDEX) allows.
    #[error("subscript {index} at {path} exceeds the limit {limit} for a new list")]
    SubscriptTooLarge {
        path: String,
        index: usize,
        limit: usize,
    },

    /// The value at `path` is not of the kind the caller or the path requires.
    #[error("type mismatch at {path}: expected {expected}, found {actual}")]
    TypeMismatch {
        path: String,
        expected: Kind,
        actual: Kind,
    },

    /// A mutation tried to descend through a value that cannot hold children.
    #[error("cannot traverse below path component {path} ({found})")]
    CannotTraverse { path: String, found: Kind },

    /// A decoded map key is not a scalar that has a string form.
    #[error("map key cannot be converted to a string: {key}")]
    KeyNotStringConvertible { key: String },

    /// The decoder met a value shape the tree model has no variant for.
    #[error("unsupported value at {path}: {detail}")]
    UnsupportedValue { path: String, detail: String },

    /// JSON has no representation for NaN or infinite floats.
    #[error("non-finite float {value} at {path} cannot be encoded as JSON")]
    NonFiniteFloat { path: String, value: f64 },

    /// The YAML line scanner met inconsistent structure.
    /// Includes the 1-based line number where the problem was detected.
    #[error("YAML scan error at line {line}: {message}")]
    YamlLine { line: usize, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Convenience alias used throughout stree-core.
pub type Result<T> = std::result::Result<T, TreeError>;
