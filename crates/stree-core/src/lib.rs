//! # stree-core
//!
//! A schema-less, path-addressable tree model for JSON and YAML documents.
//!
//! A document is decoded into a [`Value`] tree (maps, lists and scalars),
//! then read, rewritten, walked and compared through **field paths**: text
//! such as `.servers[1].host` naming one node in the tree.
//!
//! ## Quick start
//!
//! ```rust
//! use stree_core::{compare, decode_json, FieldComparison};
//!
//! let tree = decode_json(r#"{"name":"api","ports":[80,443]}"#).unwrap();
//! assert_eq!(tree.get_int(".ports[1]").unwrap(), 443);
//!
//! // Updates return a new tree; the original is untouched.
//! let updated = tree.set_val(".ports[0]", 8080).unwrap();
//! assert_eq!(tree.must_int(".ports[0]"), 80);
//!
//! let cmp = compare(&tree, &updated);
//! assert_eq!(cmp.get(".ports[0]"), Some(FieldComparison::ValuesDiffer));
//! assert_eq!(cmp.get(".name"), Some(FieldComparison::NoDifference));
//! ```
//!
//! ## Modules
//!
//! - [`value`]: the `Value` variant type and its rendering
//! - [`path`]: field path parsing and canonical rendering
//! - [`access`]: path resolution and typed getters
//! - [`mutate`]: copy-on-write `set_val` with structure synthesis
//! - [`visit`](mod@visit): depth-first visitor with optional key ordering
//! - [`diff`]: leaf enumeration and tree comparison
//! - [`codec`]: JSON/YAML decoding and encoding
//! - [`yaml_lines`]: line-oriented YAML scanning with field paths
//! - [`error`]: error types

pub mod access;
pub mod codec;
pub mod diff;
pub mod error;
pub mod mutate;
pub mod path;
pub mod value;
pub mod visit;
pub mod yaml_lines;

pub use codec::{
    decode, decode_json, decode_yaml, decode_yaml_value, encode, encode_json, encode_yaml, Format,
};
pub use diff::{compare, field_paths, Comparison, FieldComparison};
pub use error::{PathError, Result, TreeError};
pub use mutate::MAX_SYNTHESIZED_INDEX;
pub use path::{FieldPath, Segment, MAX_DEPTH};
pub use value::{Kind, Map, Value};
pub use visit::{visit, visit_ordered, FnVisitor, Visitor};
