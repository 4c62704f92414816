//! Data Model Store
//!
//! The per-surface document that components bind to. The root is always a
//! JSON object; it starts empty when a surface is created and is mutated by
//! `updateDataModel` operations, local actions, and value edits coming back
//! from the presentation layer.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::path::{self, DataPath};

/// A single patch operation from an `updateDataModel` message
///
/// Wire form: `{ "op": "add" | "replace" | "remove", "path": "...", "value": ... }`.
/// Any other `op` decodes to [`Operation::Unknown`] and is ignored when
/// applied, so newer producers can add operation kinds without breaking
/// older clients.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Operation {
    /// Set a value (creating intermediate objects)
    Add {
        /// Target path
        path: String,
        /// Value to write (missing on the wire means `null`)
        #[serde(default)]
        value: Value,
    },
    /// Set a value; identical to `Add` for this client
    Replace {
        /// Target path
        path: String,
        /// Value to write (missing on the wire means `null`)
        #[serde(default)]
        value: Value,
    },
    /// Delete the value at a path
    Remove {
        /// Target path
        path: String,
    },
    /// An operation kind this client does not know
    #[serde(other)]
    Unknown,
}

impl Operation {
    /// The operation's target path, if it has one
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Add { path, .. } | Self::Replace { path, .. } | Self::Remove { path } => {
                Some(path)
            }
            Self::Unknown => None,
        }
    }
}

/// A surface's mutable data document
///
/// The root is held as a [`Value`] so the empty path can read the whole
/// document, but it is always an object.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DataModel {
    root: Value,
}

impl Default for DataModel {
    fn default() -> Self {
        Self {
            root: Value::Object(Map::new()),
        }
    }
}

impl<'de> Deserialize<'de> for DataModel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Map::deserialize(deserializer).map(|root| Self {
            root: Value::Object(root),
        })
    }
}

impl DataModel {
    /// Create an empty data model
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a data model from an existing JSON value
    ///
    /// Non-object values are rejected and yield an empty model, since the
    /// root must always be an object.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            root @ Value::Object(_) => Self { root },
            _ => Self::default(),
        }
    }

    /// Apply one patch operation
    ///
    /// Returns `false` for unknown operation kinds (which are skipped).
    pub fn apply(&mut self, operation: &Operation) -> bool {
        match operation {
            Operation::Add { path, value } | Operation::Replace { path, value } => {
                self.set(path, value.clone());
                true
            }
            Operation::Remove { path } => {
                self.remove(path);
                true
            }
            Operation::Unknown => {
                tracing::debug!("Skipping unknown data model operation");
                false
            }
        }
    }

    /// Read the value bound at `path`
    ///
    /// The empty path reads the whole document.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Value> {
        self.get_path(&DataPath::parse(path))
    }

    /// Read the value at an already-parsed path
    #[must_use]
    pub fn get_path(&self, path: &DataPath) -> Option<&Value> {
        path::get(&self.root, path)
    }

    /// Write `value` at `path` (root path is a no-op)
    ///
    /// Returns false if nothing was written.
    pub fn set(&mut self, path: &str, value: Value) -> bool {
        self.set_path(&DataPath::parse(path), value)
    }

    /// Write `value` at an already-parsed path
    pub fn set_path(&mut self, path: &DataPath, value: Value) -> bool {
        match &mut self.root {
            Value::Object(root) => path::set(root, path, value),
            _ => false,
        }
    }

    /// Delete the value at `path`, returning it if it existed
    pub fn remove(&mut self, path: &str) -> Option<Value> {
        self.remove_path(&DataPath::parse(path))
    }

    /// Delete the value at an already-parsed path
    pub fn remove_path(&mut self, path: &DataPath) -> Option<Value> {
        match &mut self.root {
            Value::Object(root) => path::remove(root, path),
            _ => None,
        }
    }

    /// Whether the model holds no keys
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match &self.root {
            Value::Object(root) => root.is_empty(),
            _ => true,
        }
    }

    /// Borrow the whole document
    #[must_use]
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Snapshot the whole model as a JSON value
    #[must_use]
    pub fn to_value(&self) -> Value {
        self.root.clone()
    }
}
