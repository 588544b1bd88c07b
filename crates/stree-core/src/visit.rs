//! Depth-first traversal with begin/end callbacks for composites.
//!
//! A [`Visitor`] receives, for every node, either a leaf callback or a
//! begin/end pair bracketing the node's children. Each callback gets the
//! node's full [`FieldPath`] (the root path renders as `""`). All callbacks
//! default to doing nothing, so an implementation only overrides what it
//! needs. Returning `Err` from any callback stops the walk immediately and
//! the error is handed back to the caller of [`visit`].
//!
//! Map children are visited in stored order unless a key comparator is
//! supplied through [`visit_ordered`], in which case keys at every level are
//! sorted with it first. List children are always visited in index order.
//!
//! For ad-hoc walks, [`FnVisitor`] assembles a visitor from closures.

use crate::path::FieldPath;
use crate::value::{Map, Value};
use std::cmp::Ordering;

/// Callbacks invoked by [`visit`].
pub trait Visitor {
    type Error;

    fn visit_leaf(&mut self, _path: &FieldPath, _value: &Value) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_map_begin(&mut self, _path: &FieldPath, _map: &Map) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_map_end(&mut self, _path: &FieldPath, _map: &Map) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_list_begin(&mut self, _path: &FieldPath, _items: &[Value]) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_list_end(&mut self, _path: &FieldPath, _items: &[Value]) -> Result<(), Self::Error> {
        Ok(())
    }
}

type KeyOrder<'o> = Option<&'o dyn Fn(&str, &str) -> Ordering>;

/// Walk `root` depth-first, map keys in stored order.
pub fn visit<V: Visitor>(root: &Value, visitor: &mut V) -> Result<(), V::Error> {
    walk(&mut FieldPath::root(), root, visitor, None)
}

/// Walk `root` depth-first with map keys sorted by `order` at every level.
///
/// ```
/// use stree_core::{decode_json, visit_ordered, FnVisitor};
///
/// let tree = decode_json(r#"{"b":1,"a":{"d":2,"c":3}}"#).unwrap();
/// let mut seen = Vec::new();
/// let mut visitor = FnVisitor::<()>::new().on_leaf(|path, _| {
///     seen.push(path.to_string());
///     Ok(())
/// });
/// visit_ordered(&tree, &mut visitor, |a, b| a.cmp(b)).unwrap();
/// drop(visitor);
/// assert_eq!(seen, [".a.c", ".a.d", ".b"]);
/// ```
pub fn visit_ordered<V, F>(root: &Value, visitor: &mut V, order: F) -> Result<(), V::Error>
where
    V: Visitor,
    F: Fn(&str, &str) -> Ordering,
{
    walk(&mut FieldPath::root(), root, visitor, Some(&order))
}

fn walk<V: Visitor>(
    path: &mut FieldPath,
    value: &Value,
    visitor: &mut V,
    order: KeyOrder<'_>,
) -> Result<(), V::Error> {
    match value {
        Value::Map(map) => {
            visitor.visit_map_begin(path, map)?;
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            if let Some(cmp) = order {
                entries.sort_by(|a, b| cmp(a.0, b.0));
            }
            for (key, child) in entries {
                path.push_key(key.as_str());
                walk(path, child, visitor, order)?;
                path.pop();
            }
            visitor.visit_map_end(path, map)
        }
        Value::List(items) => {
            visitor.visit_list_begin(path, items)?;
            for (i, child) in items.iter().enumerate() {
                path.push_index(i);
                walk(path, child, visitor, order)?;
                path.pop();
            }
            visitor.visit_list_end(path, items)
        }
        leaf => visitor.visit_leaf(path, leaf),
    }
}

impl Value {
    /// See [`visit`].
    pub fn visit<V: Visitor>(&self, visitor: &mut V) -> Result<(), V::Error> {
        visit(self, visitor)
    }

    /// See [`visit_ordered`].
    pub fn visit_ordered<V, F>(&self, visitor: &mut V, order: F) -> Result<(), V::Error>
    where
        V: Visitor,
        F: Fn(&str, &str) -> Ordering,
    {
        visit_ordered(self, visitor, order)
    }
}

type LeafFn<'a, E> = Box<dyn FnMut(&FieldPath, &Value) -> Result<(), E> + 'a>;
type MapFn<'a, E> = Box<dyn FnMut(&FieldPath, &Map) -> Result<(), E> + 'a>;
type ListFn<'a, E> = Box<dyn FnMut(&FieldPath, &[Value]) -> Result<(), E> + 'a>;

/// A [`Visitor`] built from optional closures; unset callbacks do nothing.
pub struct FnVisitor<'a, E> {
    leaf: Option<LeafFn<'a, E>>,
    map_begin: Option<MapFn<'a, E>>,
    map_end: Option<MapFn<'a, E>>,
    list_begin: Option<ListFn<'a, E>>,
    list_end: Option<ListFn<'a, E>>,
}

impl<E> Default for FnVisitor<'_, E> {
    fn default() -> Self {
        Self {
            leaf: None,
            map_begin: None,
            map_end: None,
            list_begin: None,
            list_end: None,
        }
    }
}

impl<'a, E> FnVisitor<'a, E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_leaf(mut self, f: impl FnMut(&FieldPath, &Value) -> Result<(), E> + 'a) -> Self {
        self.leaf = Some(Box::new(f));
        self
    }

    pub fn on_map_begin(mut self, f: impl FnMut(&FieldPath, &Map) -> Result<(), E> + 'a) -> Self {
        self.map_begin = Some(Box::new(f));
        self
    }

    pub fn on_map_end(mut self, f: impl FnMut(&FieldPath, &Map) -> Result<(), E> + 'a) -> Self {
        self.map_end = Some(Box::new(f));
        self
    }

    pub fn on_list_begin(
        mut self,
        f: impl FnMut(&FieldPath, &[Value]) -> Result<(), E> + 'a,
    ) -> Self {
        self.list_begin = Some(Box::new(f));
        self
    }

    pub fn on_list_end(mut self, f: impl FnMut(&FieldPath, &[Value]) -> Result<(), E> + 'a) -> Self {
        self.list_end = Some(Box::new(f));
        self
    }
}

impl<E> Visitor for FnVisitor<'_, E> {
    type Error = E;

    fn visit_leaf(&mut self, path: &FieldPath, value: &Value) -> Result<(), E> {
        match self.leaf.as_mut() {
            Some(f) => f(path, value),
            None => Ok(()),
        }
    }

    fn visit_map_begin(&mut self, path: &FieldPath, map: &Map) -> Result<(), E> {
        match self.map_begin.as_mut() {
            Some(f) => f(path, map),
            None => Ok(()),
        }
    }

    fn visit_map_end(&mut self, path: &FieldPath, map: &Map) -> Result<(), E> {
        match self.map_end.as_mut() {
            Some(f) => f(path, map),
            None => Ok(()),
        }
    }

    fn visit_list_begin(&mut self, path: &FieldPath, items: &[Value]) -> Result<(), E> {
        match self.list_begin.as_mut() {
            Some(f) => f(path, items),
            None => Ok(()),
        }
    }

    fn visit_list_end(&mut self, path: &FieldPath, items: &[Value]) -> Result<(), E> {
        match self.list_end.as_mut() {
            Some(f) => f(path, items),
            None => Ok(()),
        }
    }
}
