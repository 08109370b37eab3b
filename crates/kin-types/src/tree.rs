//! Serialized tree and forest payloads.
//!
//! These are the JSON shapes that storage backends read and write:
//!
//! - `TreeData = { "persons": [Person, ...] }`
//! - `ForestData = { "selectedTreeName": "...", "trees": { name: TreeData } }`

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TypeError;
use crate::person::Person;

/// The persons of a single tree, in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeData {
    #[serde(default)]
    pub persons: Vec<Person>,
}

impl TreeData {
    /// Create a payload from a list of persons.
    pub fn new(persons: Vec<Person>) -> Self {
        Self { persons }
    }

    /// An empty tree.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of persons in the payload.
    pub fn len(&self) -> usize {
        self.persons.len()
    }

    /// Returns `true` if the payload has no persons.
    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }

    /// Decode an untyped JSON value, checking the shape strictly.
    ///
    /// The value must be an object with a `persons` array, and every entry
    /// must be an object carrying a string `name`.
    pub fn from_value(value: &Value) -> Result<Self, TypeError> {
        let persons = value
            .as_object()
            .and_then(|obj| obj.get("persons"))
            .and_then(Value::as_array)
            .ok_or(TypeError::NotATree)?;

        for (index, entry) in persons.iter().enumerate() {
            if !entry.get("name").is_some_and(Value::is_string) {
                return Err(TypeError::MissingName { index });
            }
        }

        serde_json::from_value(value.clone()).map_err(|e| TypeError::Serialization(e.to_string()))
    }
}

impl From<Vec<Person>> for TreeData {
    fn from(persons: Vec<Person>) -> Self {
        Self { persons }
    }
}

/// Every stored tree plus the name of the currently selected one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForestData {
    pub selected_tree_name: String,
    #[serde(default)]
    pub trees: BTreeMap<String, TreeData>,
}

impl ForestData {
    /// A forest holding a single tree, which is also selected.
    pub fn with_tree(name: impl Into<String>, data: TreeData) -> Self {
        let name = name.into();
        let mut trees = BTreeMap::new();
        trees.insert(name.clone(), data);
        Self {
            selected_tree_name: name,
            trees,
        }
    }

    /// Total number of persons across all trees.
    pub fn total_persons(&self) -> usize {
        self.trees.values().map(TreeData::len).sum()
    }
}
