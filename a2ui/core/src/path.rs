//! Path Resolver
//!
//! Slash-delimited paths into a surface's data model, e.g. `/flight/departure`
//! or `/results/0/price`.
//!
//! # Design Philosophy
//!
//! Bindings are written by a remote producer that may be versioned
//! independently of this client, so resolution never fails:
//!
//! - Reading a missing path yields `None`, not an error
//! - Writing creates intermediate objects on demand, overwriting scalars in
//!   the way
//! - Writing into an array pads it with `null` up to the index; a segment
//!   that cannot index an array leaves the model unchanged
//! - Writing or removing the root path is a no-op; the model root is never
//!   replaced
//!
//! `set` and `remove` are the only mutators of data-model content in the
//! crate. Server operations, local actions and presentation edits all go
//! through them.

use std::fmt;

use serde_json::{Map, Value};

/// A parsed data-model path
///
/// Empty segments are dropped during parsing, so `""`, `"/"` and `"//"` all
/// denote the root, and `"/a//b/"` equals `"/a/b"`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct DataPath(Vec<String>);

impl DataPath {
    /// Parse a slash-delimited path
    #[must_use]
    pub fn parse(path: &str) -> Self {
        Self(
            path.split('/')
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// The root path (no segments)
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Whether this path addresses the model root itself
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Path segments in walk order
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Split into parent segments and the leaf key
    fn split_leaf(&self) -> Option<(&[String], &str)> {
        self.0
            .split_last()
            .map(|(leaf, parents)| (parents, leaf.as_str()))
    }
}

impl fmt::Display for DataPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.0 {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

impl From<&str> for DataPath {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

/// Step one segment into an indexable value
///
/// Objects are keyed by name, arrays by decimal index.
fn step<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

/// Resolve `path` against `root`
///
/// Returns `None` as soon as a segment is missing or the current value is
/// not indexable.
#[must_use]
pub fn get<'a>(root: &'a Value, path: &DataPath) -> Option<&'a Value> {
    path.segments()
        .iter()
        .try_fold(root, |current, segment| step(current, segment))
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

/// Largest array index a write may pad up to
pub const MAX_ARRAY_INDEX: usize = 1024;

/// Entry for `key` in `slot`, turning `slot` into an object first if needed
fn object_entry<'a>(slot: &'a mut Value, key: &str) -> &'a mut Value {
    if !slot.is_object() {
        *slot = empty_object();
    }
    match slot {
        Value::Object(map) => map.entry(key.to_string()).or_insert_with(empty_object),
        _ => unreachable!("non-object slots are replaced above"),
    }
}

/// Element `segment` of `items`, padding with `null` up to it
///
/// `None` when the segment is not a decimal index or exceeds
/// [`MAX_ARRAY_INDEX`]; arrays are never re-keyed as objects.
fn array_slot<'a>(items: &'a mut Vec<Value>, segment: &str) -> Option<&'a mut Value> {
    let index = segment
        .parse::<usize>()
        .ok()
        .filter(|i| *i <= MAX_ARRAY_INDEX)?;
    if index >= items.len() {
        items.resize(index + 1, Value::Null);
    }
    items.get_mut(index)
}

/// Descend one segment for writing
///
/// Arrays are followed by index. Anything else becomes an object keyed by
/// the segment.
fn child_slot<'a>(slot: &'a mut Value, segment: &str) -> Option<&'a mut Value> {
    match slot {
        Value::Array(items) => array_slot(items, segment),
        slot => Some(object_entry(slot, segment)),
    }
}

/// Write `value` at `path`
///
/// The root path is a no-op. Intermediate segments that are missing or not
/// indexable become empty objects. Writing into an array by index replaces
/// the element, padding with `null` when the index is past the end. A
/// segment that cannot index an array leaves the model unchanged.
///
/// Returns false if nothing was written.
pub fn set(root: &mut Map<String, Value>, path: &DataPath, value: Value) -> bool {
    let Some((leaf, parents)) = path.segments().split_last() else {
        return false;
    };
    let Some((first, rest)) = parents.split_first() else {
        root.insert(leaf.clone(), value);
        return true;
    };

    let mut current = root.entry(first.clone()).or_insert_with(empty_object);
    for segment in rest.iter().chain(std::iter::once(leaf)) {
        let Some(next) = child_slot(current, segment) else {
            tracing::warn!(
                path = %path,
                segment = %segment,
                "Segment cannot index array; write skipped"
            );
            return false;
        };
        current = next;
    }
    *current = value;
    true
}

fn step_mut<'a>(value: &'a mut Value, segment: &str) -> Option<&'a mut Value> {
    match value {
        Value::Object(map) => map.get_mut(segment),
        Value::Array(items) => match segment.parse::<usize>() {
            Ok(index) => items.get_mut(index),
            Err(_) => None,
        },
        _ => None,
    }
}

/// Remove the value at `path`
///
/// Only removes when the whole parent chain exists; otherwise nothing
/// changes. Returns the removed value.
pub fn remove(root: &mut Map<String, Value>, path: &DataPath) -> Option<Value> {
    let (parents, leaf) = path.split_leaf()?;
    let Some((first, rest)) = parents.split_first() else {
        return root.remove(leaf);
    };

    let mut parent = root.get_mut(first)?;
    for segment in rest {
        parent = step_mut(parent, segment)?;
    }

    match parent {
        Value::Object(map) => map.remove(leaf),
        Value::Array(items) => {
            let index = leaf.parse::<usize>().ok().filter(|i| *i < items.len())?;
            Some(items.remove(index))
        }
        _ => None,
    }
}
