//! Leaf enumeration and field-by-field comparison of two trees.

use crate::path::FieldPath;
use crate::value::Value;
use crate::visit::{visit, Visitor};
use serde::Serialize;
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;

/// How one leaf path compares between a subject and an object tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldComparison {
    /// Present in both with equal values.
    NoDifference,
    /// Only the object has the path.
    SubjectLacks,
    /// Only the subject has the path.
    ObjectLacks,
    /// Present in both with different kinds.
    TypesDiffer,
    /// Present in both, same kind, different values.
    ValuesDiffer,
}

impl FieldComparison {
    /// The classification with subject and object swapped.
    pub fn mirrored(self) -> Self {
        match self {
            FieldComparison::SubjectLacks => FieldComparison::ObjectLacks,
            FieldComparison::ObjectLacks => FieldComparison::SubjectLacks,
            other => other,
        }
    }
}

impl fmt::Display for FieldComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldComparison::NoDifference => "COMP_NO_DIFFERENCE",
            FieldComparison::SubjectLacks => "COMP_SUBJECT_LACKS",
            FieldComparison::ObjectLacks => "COMP_OBJECT_LACKS",
            FieldComparison::TypesDiffer => "COMP_TYPES_DIFFER",
            FieldComparison::ValuesDiffer => "COMP_VALUES_DIFFER",
        };
        f.write_str(name)
    }
}

/// Result of [`compare`]: canonical path text → classification, sorted by path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Comparison(BTreeMap<String, FieldComparison>);

impl Comparison {
    pub fn get(&self, path: &str) -> Option<FieldComparison> {
        self.0.get(path).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, FieldComparison)> {
        self.0.iter().map(|(path, cmp)| (path.as_str(), *cmp))
    }

    /// Entries whose classification is anything but `NoDifference`.
    pub fn differences(&self) -> impl Iterator<Item = (&str, FieldComparison)> {
        self.iter()
            .filter(|(_, cmp)| *cmp != FieldComparison::NoDifference)
    }

    /// True when every leaf path of both trees matched.
    pub fn is_identical(&self) -> bool {
        self.differences().next().is_none()
    }
}

struct LeafCollector {
    paths: Vec<FieldPath>,
}

impl Visitor for LeafCollector {
    type Error = Infallible;

    fn visit_leaf(&mut self, path: &FieldPath, _value: &Value) -> Result<(), Infallible> {
        self.paths.push(path.clone());
        Ok(())
    }
}

/// Every leaf path of `tree`, depth-first.
///
/// Each element of a list is enumerated on its own (`.k[0]`, `.k[1]`, ...),
/// recursing into composite elements. Empty maps and lists contribute no
/// paths. Callers should treat the result as a set.
pub fn field_paths(tree: &Value) -> Vec<FieldPath> {
    let mut collector = LeafCollector { paths: Vec::new() };
    match visit(tree, &mut collector) {
        Ok(()) => collector.paths,
        Err(never) => match never {},
    }
}

impl Value {
    /// See [`field_paths`].
    pub fn field_paths(&self) -> Vec<FieldPath> {
        field_paths(self)
    }

    /// See [`compare`].
    pub fn compare_to(&self, object: &Value) -> Comparison {
        compare(self, object)
    }
}

/// Classify every leaf path of `subject` and `object`.
///
/// For a subject leaf: `ObjectLacks` when the path does not resolve in the
/// object, `TypesDiffer` when it resolves to a different kind (including a
/// composite), else `NoDifference` / `ValuesDiffer` by exact equality. Object
/// leaves not already classified are `SubjectLacks`, or `TypesDiffer` when
/// the subject holds a composite there.
///
/// ```
/// use stree_core::{compare, decode_json, FieldComparison};
///
/// let subject = decode_json(r#"{"k":{"a":1},"x":1}"#).unwrap();
/// let object = decode_json(r#"{"k":{"a":2}}"#).unwrap();
/// let cmp = compare(&subject, &object);
/// assert_eq!(cmp.get(".k.a"), Some(FieldComparison::ValuesDiffer));
/// assert_eq!(cmp.get(".x"), Some(FieldComparison::ObjectLacks));
/// ```
pub fn compare(subject: &Value, object: &Value) -> Comparison {
    let mut result = BTreeMap::new();

    for path in field_paths(subject) {
        let Ok(subject_val) = subject.get_path(&path) else {
            continue;
        };
        let classification = match object.get_path(&path) {
            Err(_) => FieldComparison::ObjectLacks,
            Ok(object_val) if object_val.kind() != subject_val.kind() => {
                FieldComparison::TypesDiffer
            }
            Ok(object_val) if object_val == subject_val => FieldComparison::NoDifference,
            Ok(_) => FieldComparison::ValuesDiffer,
        };
        result.insert(path.to_string(), classification);
    }

    for path in field_paths(object) {
        let text = path.to_string();
        if result.contains_key(&text) {
            continue;
        }
        let classification = match subject.get_path(&path) {
            Ok(_) => FieldComparison::TypesDiffer,
            Err(_) => FieldComparison::SubjectLacks,
        };
        result.insert(text, classification);
    }

    tracing::debug!(paths = result.len(), "compared trees");
    Comparison(result)
}
