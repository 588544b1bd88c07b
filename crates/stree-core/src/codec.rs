//! JSON and YAML conversion at the edge of the tree model.
//!
//! Decoding parses text into `serde_json::Value` / `serde_yaml::Value` and
//! converts that into a [`Value`] tree. YAML allows non-string map keys;
//! scalar keys (strings, numbers, booleans) are normalized to their string
//! form and anything else is rejected, so every map in a tree is keyed by
//! strings. Encoding serializes the tree directly through its `Serialize`
//! impl.

use crate::error::{Result, TreeError};
use crate::path::FieldPath;
use crate::value::{Kind, Map, Value};
use crate::visit::{visit, Visitor};
use std::path::Path;

/// Text format of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// Guess the format from a file extension (`.json`, `.yaml`, `.yml`).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Format::Json),
            "yaml" | "yml" => Some(Format::Yaml),
            _ => None,
        }
    }
}

/// Decode a document whose root must be a map.
pub fn decode(text: &str, format: Format) -> Result<Value> {
    match format {
        Format::Json => decode_json(text),
        Format::Yaml => decode_yaml(text),
    }
}

/// Decode a JSON object into a tree.
///
/// # Errors
///
/// `Json` for malformed input and `TypeMismatch` when the root is not an
/// object.
pub fn decode_json(text: &str) -> Result<Value> {
    tracing::debug!(bytes = text.len(), "decoding JSON");
    let raw: serde_json::Value = serde_json::from_str(text)?;
    into_root(from_json(raw, &mut FieldPath::root())?)
}

/// Decode a YAML mapping into a tree. An empty document yields an empty map.
///
/// # Errors
///
/// `Yaml` for malformed input, `KeyNotStringConvertible` for null or
/// composite keys, `UnsupportedValue` for tagged values, and `TypeMismatch`
/// when the root is not a mapping.
pub fn decode_yaml(text: &str) -> Result<Value> {
    tracing::debug!(bytes = text.len(), "decoding YAML");
    if text.trim().is_empty() {
        return Ok(Value::empty_map());
    }
    into_root(decode_yaml_value(text)?)
}

/// Decode any YAML value (scalar, flow sequence, mapping) without the
/// map-root requirement. JSON is valid YAML, so this also reads JSON literals.
pub fn decode_yaml_value(text: &str) -> Result<Value> {
    let raw: serde_yaml::Value = serde_yaml::from_str(text)?;
    from_yaml(raw, &mut FieldPath::root())
}

/// Encode a tree in the given format. `pretty` only affects JSON.
pub fn encode(tree: &Value, format: Format, pretty: bool) -> Result<String> {
    match format {
        Format::Json => encode_json(tree, pretty),
        Format::Yaml => encode_yaml(tree),
    }
}

/// Encode a tree as JSON.
///
/// # Errors
///
/// `NonFiniteFloat` when any float leaf is NaN or infinite.
pub fn encode_json(tree: &Value, pretty: bool) -> Result<String> {
    visit(tree, &mut FiniteFloats)?;
    let out = if pretty {
        serde_json::to_string_pretty(tree)?
    } else {
        serde_json::to_string(tree)?
    };
    Ok(out)
}

pub fn encode_yaml(tree: &Value) -> Result<String> {
    Ok(serde_yaml::to_string(tree)?)
}

fn into_root(value: Value) -> Result<Value> {
    match value {
        Value::Map(_) => Ok(value),
        Value::Null => Ok(Value::empty_map()),
        other => Err(TreeError::TypeMismatch {
            path: String::new(),
            expected: Kind::Map,
            actual: other.kind(),
        }),
    }
}

/// Prefer the integer form of a decoded number, falling back to the float.
fn number(
    int: Option<i64>,
    float: Option<f64>,
    text: &dyn std::fmt::Display,
    path: &FieldPath,
) -> Result<Value> {
    match (int, float) {
        (Some(i), _) => Ok(Value::Int(i)),
        (None, Some(x)) => Ok(Value::Float(x)),
        (None, None) => Err(TreeError::UnsupportedValue {
            path: path.to_string(),
            detail: format!("number {} has no i64 or f64 form", text),
        }),
    }
}

fn from_json(raw: serde_json::Value, path: &mut FieldPath) -> Result<Value> {
    let value = match raw {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => number(n.as_i64(), n.as_f64(), &n, path)?,
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => {
            let mut list = Vec::with_capacity(items.len());
            for (i, item) in items.into_iter().enumerate() {
                path.push_index(i);
                list.push(from_json(item, path)?);
                path.pop();
            }
            Value::List(list)
        }
        serde_json::Value::Object(entries) => {
            let mut map = Map::with_capacity(entries.len());
            for (key, item) in entries {
                path.push_key(key.as_str());
                let converted = from_json(item, path)?;
                path.pop();
                map.insert(key, converted);
            }
            Value::Map(map)
        }
    };
    Ok(value)
}

fn from_yaml(raw: serde_yaml::Value, path: &mut FieldPath) -> Result<Value> {
    let value = match raw {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => number(n.as_i64(), n.as_f64(), &n, path)?,
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => {
            let mut list = Vec::with_capacity(items.len());
            for (i, item) in items.into_iter().enumerate() {
                path.push_index(i);
                list.push(from_yaml(item, path)?);
                path.pop();
            }
            Value::List(list)
        }
        serde_yaml::Value::Mapping(entries) => {
            let mut map = Map::with_capacity(entries.len());
            for (key, item) in entries {
                let key = key_string(key)?;
                path.push_key(key.as_str());
                let converted = from_yaml(item, path)?;
                path.pop();
                if map.insert(key, converted).is_some() {
                    tracing::warn!(path = %path, "duplicate key after string normalization");
                }
            }
            Value::Map(map)
        }
        serde_yaml::Value::Tagged(tagged) => {
            return Err(TreeError::UnsupportedValue {
                path: path.to_string(),
                detail: format!("tagged value {}", tagged.tag),
            })
        }
    };
    Ok(value)
}

/// Normalize a YAML mapping key to a string.
fn key_string(key: serde_yaml::Value) -> Result<String> {
    match key {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        other => {
            tracing::debug!(?other, "rejecting map key");
            Err(TreeError::KeyNotStringConvertible {
                key: format!("{:?}", other),
            })
        }
    }
}

/// Rejects NaN and infinite floats, which JSON cannot represent.
struct FiniteFloats;

impl Visitor for FiniteFloats {
    type Error = TreeError;

    fn visit_leaf(&mut self, path: &FieldPath, value: &Value) -> Result<()> {
        match value {
            Value::Float(x) if !x.is_finite() => Err(TreeError::NonFiniteFloat {
                path: path.to_string(),
                value: *x,
            }),
            _ => Ok(()),
        }
    }
}
