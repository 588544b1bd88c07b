//! Reading values out of a tree by field path.
//!
//! [`Value::get_path`] is the single resolution routine; every typed getter
//! (`get_str`, `get_int`, ...) resolves through it and then checks the
//! variant of the result. Each typed getter has a `must_*` twin that panics
//! instead of returning an error, intended for tests and startup code.

use crate::error::{Result, TreeError};
use crate::path::{FieldPath, Segment};
use crate::value::{Kind, Map, Value};

/// Walk `path` from `root`, one segment at a time.
fn resolve<'v>(root: &'v Value, path: &FieldPath) -> Result<&'v Value> {
    let mut current = root;
    for (depth, seg) in path.segments().iter().enumerate() {
        current = match (seg, current) {
            (Segment::Key(key), Value::Map(map)) => {
                map.get(key).ok_or_else(|| TreeError::KeyNotFound {
                    path: path.prefix(depth + 1).to_string(),
                })?
            }
            (Segment::Key(_), other) => {
                return Err(TreeError::TypeMismatch {
                    path: path.prefix(depth).to_string(),
                    expected: Kind::Map,
                    actual: other.kind(),
                })
            }
            (Segment::Index(index), Value::List(items)) => {
                items.get(*index).ok_or_else(|| TreeError::IndexOutOfRange {
                    path: path.prefix(depth).to_string(),
                    index: *index,
                    len: items.len(),
                })?
            }
            (Segment::Index(_), other) => {
                return Err(TreeError::TypeMismatch {
                    path: path.prefix(depth).to_string(),
                    expected: Kind::List,
                    actual: other.kind(),
                })
            }
        };
    }
    Ok(current)
}

fn mismatch(path: &FieldPath, expected: Kind, found: &Value) -> TreeError {
    TreeError::TypeMismatch {
        path: path.to_string(),
        expected,
        actual: found.kind(),
    }
}

fn must<T>(result: Result<T>) -> T {
    match result {
        Ok(v) => v,
        Err(e) => panic!("{}", e),
    }
}

impl Value {
    /// Resolve path text against this tree.
    ///
    /// # Errors
    ///
    /// `Path` for malformed text, `KeyNotFound` for a missing map key,
    /// `IndexOutOfRange` for a subscript past the end of a list, and
    /// `TypeMismatch` when a key is applied to a non-map or a subscript to a
    /// non-list.
    ///
    /// ```
    /// use stree_core::{decode_json, Value};
    ///
    /// let tree = decode_json(r#"{"a":{"b":[10,20]}}"#).unwrap();
    /// assert_eq!(tree.get(".a.b[1]").unwrap(), &Value::Int(20));
    /// ```
    pub fn get(&self, path: &str) -> Result<&Value> {
        let path = FieldPath::parse(path)?;
        resolve(self, &path)
    }

    /// Resolve an already parsed path.
    pub fn get_path(&self, path: &FieldPath) -> Result<&Value> {
        resolve(self, path)
    }

    /// True when `path` resolves to some value.
    pub fn contains_path(&self, path: &FieldPath) -> bool {
        resolve(self, path).is_ok()
    }

    pub fn get_str(&self, path: &str) -> Result<&str> {
        let path = FieldPath::parse(path)?;
        match resolve(self, &path)? {
            Value::String(s) => Ok(s),
            other => Err(mismatch(&path, Kind::String, other)),
        }
    }

    /// Integer at `path`. A stored float is accepted and truncated toward
    /// zero, matching how generic numeric decoders hand back numbers.
    pub fn get_int(&self, path: &str) -> Result<i64> {
        let path = FieldPath::parse(path)?;
        match resolve(self, &path)? {
            Value::Int(i) => Ok(*i),
            Value::Float(x) => Ok(*x as i64),
            other => Err(mismatch(&path, Kind::Int, other)),
        }
    }

    pub fn get_float(&self, path: &str) -> Result<f64> {
        let path = FieldPath::parse(path)?;
        match resolve(self, &path)? {
            Value::Float(x) => Ok(*x),
            other => Err(mismatch(&path, Kind::Float, other)),
        }
    }

    pub fn get_bool(&self, path: &str) -> Result<bool> {
        let path = FieldPath::parse(path)?;
        match resolve(self, &path)? {
            Value::Bool(b) => Ok(*b),
            other => Err(mismatch(&path, Kind::Bool, other)),
        }
    }

    /// The map at `path`.
    pub fn get_subtree(&self, path: &str) -> Result<&Map> {
        let path = FieldPath::parse(path)?;
        match resolve(self, &path)? {
            Value::Map(map) => Ok(map),
            other => Err(mismatch(&path, Kind::Map, other)),
        }
    }

    pub fn get_list(&self, path: &str) -> Result<&[Value]> {
        let path = FieldPath::parse(path)?;
        match resolve(self, &path)? {
            Value::List(items) => Ok(items),
            other => Err(mismatch(&path, Kind::List, other)),
        }
    }

    pub fn must_get(&self, path: &str) -> &Value {
        must(self.get(path))
    }

    pub fn must_str(&self, path: &str) -> &str {
        must(self.get_str(path))
    }

    pub fn must_int(&self, path: &str) -> i64 {
        must(self.get_int(path))
    }

    pub fn must_float(&self, path: &str) -> f64 {
        must(self.get_float(path))
    }

    pub fn must_bool(&self, path: &str) -> bool {
        must(self.get_bool(path))
    }

    pub fn must_subtree(&self, path: &str) -> &Map {
        must(self.get_subtree(path))
    }

    pub fn must_list(&self, path: &str) -> &[Value] {
        must(self.get_list(path))
    }
}
