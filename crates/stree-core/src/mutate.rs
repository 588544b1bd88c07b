//! Copy-on-write updates by field path.
//!
//! [`Value::set_val`] never touches its receiver: it deep-clones the whole
//! tree, applies the update to the clone and returns it. [`Value::set_path`]
//! is the in-place form for callers that already own a private copy.
//!
//! Missing keys are not an error. The remainder of the path is synthesized:
//! a bare key becomes a map, a subscripted key becomes a list of exactly
//! `index + 1` slots (the others `Null`), and the value lands at the end.
//! Lists that already exist are never grown. A synthesized list may not
//! exceed [`MAX_SYNTHESIZED_INDEX`]` + 1` slots, and paths longer than
//! [`MAX_DEPTH`] are rejected.

use crate::error::{PathError, Result, TreeError};
use crate::path::{FieldPath, Segment, MAX_DEPTH};
use crate::value::{Map, Value};
use indexmap::map::Entry;

/// Largest subscript for which a missing list will be synthesized.
pub const MAX_SYNTHESIZED_INDEX: usize = 65_535;

impl Value {
    /// Return a copy of this tree with `value` stored at `path`.
    ///
    /// # Errors
    ///
    /// - `Path` when the text does not parse
    /// - `CannotTraverse` when the path descends through a scalar, applies a
    ///   key to a list, or a subscript to a non-list
    /// - `IndexOutOfRange` when a subscript is past the end of an existing list
    /// - `SubscriptTooLarge` when a list to synthesize would need more than
    ///   [`MAX_SYNTHESIZED_INDEX`]` + 1` slots
    ///
    /// ```
    /// use stree_core::Value;
    ///
    /// let tree = Value::empty_map();
    /// let updated = tree.set_val(".a.b[2]", 5).unwrap();
    /// assert_eq!(updated.must_int(".a.b[2]"), 5);
    /// assert_eq!(updated.must_get(".a.b[0]"), &Value::Null);
    /// assert!(tree.get(".a").is_err());
    /// ```
    pub fn set_val(&self, path: &str, value: impl Into<Value>) -> Result<Value> {
        let path = FieldPath::parse(path)?;
        let mut tree = self.clone();
        tree.set_path(&path, value.into())?;
        Ok(tree)
    }

    /// Store `value` at `path` in place. The empty path replaces the whole value.
    ///
    /// On error the tree is left unchanged: every check on existing structure
    /// happens before the single write at the end of the walk.
    pub fn set_path(&mut self, path: &FieldPath, value: Value) -> Result<()> {
        tracing::debug!(path = %path, "set_path");
        if path.len() > MAX_DEPTH {
            return Err(PathError::TooDeep {
                path: path.to_string(),
                limit: MAX_DEPTH,
            }
            .into());
        }
        if path.is_empty() {
            *self = value;
            return Ok(());
        }
        set_at(self, path, 0, value)
    }
}

fn set_at(node: &mut Value, path: &FieldPath, depth: usize, value: Value) -> Result<()> {
    let segments = path.segments();
    let last = depth + 1 == segments.len();

    match (&segments[depth], node) {
        (Segment::Key(key), Value::Map(map)) => match map.entry(key.clone()) {
            Entry::Vacant(slot) => {
                tracing::debug!(
                    at = %path.prefix(depth + 1),
                    remaining = segments.len() - depth - 1,
                    "synthesizing missing structure"
                );
                slot.insert(synthesize(path, depth + 1, value)?);
                Ok(())
            }
            Entry::Occupied(slot) => {
                let child = slot.into_mut();
                if last {
                    *child = value;
                    Ok(())
                } else {
                    tracing::trace!(at = %path.prefix(depth + 1), kind = %child.kind(), "descending");
                    set_at(child, path, depth + 1, value)
                }
            }
        },
        (Segment::Index(index), Value::List(items)) => {
            let len = items.len();
            match items.get_mut(*index) {
                None => Err(TreeError::IndexOutOfRange {
                    path: path.prefix(depth).to_string(),
                    index: *index,
                    len,
                }),
                Some(child) if last => {
                    *child = value;
                    Ok(())
                }
                Some(child) => set_at(child, path, depth + 1, value),
            }
        }
        (_, other) => Err(TreeError::CannotTraverse {
            path: path.prefix(depth).to_string(),
            found: other.kind(),
        }),
    }
}

/// Build the structure for the path segments from `from` on, none of which
/// exist yet.
fn synthesize(path: &FieldPath, from: usize, value: Value) -> Result<Value> {
    match path.segments().get(from) {
        None => Ok(value),
        Some(Segment::Key(key)) => {
            let mut map = Map::new();
            map.insert(key.clone(), synthesize(path, from + 1, value)?);
            Ok(Value::Map(map))
        }
        Some(Segment::Index(index)) => {
            let len = index
                .checked_add(1)
                .filter(|_| *index <= MAX_SYNTHESIZED_INDEX)
                .ok_or_else(|| TreeError::SubscriptTooLarge {
                    path: path.prefix(from).to_string(),
                    index: *index,
                    limit: MAX_SYNTHESIZED_INDEX,
                })?;
            let child = synthesize(path, from + 1, value)?;
            let mut items = vec![Value::Null; len];
            items[*index] = child;
            Ok(Value::List(items))
        }
    }
}
