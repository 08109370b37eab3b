//! The [`Person`] record and its mergeable field snapshot.
//!
//! `mother` and `father` are names, not owning references. They are resolved
//! by lookup in whatever registry holds the person.

use serde::{Deserialize, Serialize};

/// A named genealogy record.
///
/// Every optional field is always present in memory; a field missing from a
/// JSON payload decodes to `None`, and `None` encodes as `null`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Person {
    /// Unique key within a registry.
    pub name: String,
    /// Name of the mother, if known.
    #[serde(default)]
    pub mother: Option<String>,
    /// Name of the father, if known.
    #[serde(default)]
    pub father: Option<String>,
    /// Free-text annotation (dates, places, notes).
    #[serde(default)]
    pub info: Option<String>,
}

impl Person {
    /// A person with no known parents and no info.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// A person with the given parent references.
    pub fn with_parents(
        name: impl Into<String>,
        mother: Option<&str>,
        father: Option<&str>,
    ) -> Self {
        Self {
            name: name.into(),
            mother: mother.map(str::to_string),
            father: father.map(str::to_string),
            info: None,
        }
    }

    /// Set the info field.
    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = Some(info.into());
        self
    }

    /// The mother's name, treating an empty string as unknown.
    pub fn mother_name(&self) -> Option<&str> {
        present(&self.mother)
    }

    /// The father's name, treating an empty string as unknown.
    pub fn father_name(&self) -> Option<&str> {
        present(&self.father)
    }

    /// The info text, treating an empty string as absent.
    pub fn info_text(&self) -> Option<&str> {
        present(&self.info)
    }

    /// Iterate over the known parent names (mother first).
    pub fn parent_names(&self) -> impl Iterator<Item = &str> {
        self.mother_name().into_iter().chain(self.father_name())
    }

    /// Snapshot of the mergeable fields.
    pub fn fields(&self) -> PersonFields {
        PersonFields {
            mother: self.mother.clone(),
            father: self.father.clone(),
            info: self.info.clone(),
        }
    }

    /// Rebuild a person from a name and a field snapshot.
    pub fn from_fields(name: impl Into<String>, fields: PersonFields) -> Self {
        Self {
            name: name.into(),
            mother: fields.mother,
            father: fields.father,
            info: fields.info,
        }
    }

    /// Number of non-empty fields among mother, father and info.
    pub fn completeness(&self) -> usize {
        [&self.mother, &self.father, &self.info]
            .into_iter()
            .filter(|f| present(f).is_some())
            .count()
    }

    /// Returns `true` if this person carries nothing beyond a name, i.e. it
    /// looks like an entry created only to satisfy closure.
    pub fn is_placeholder(&self) -> bool {
        self.completeness() == 0
    }
}

/// The mother/father/info triple of a person, without the name.
///
/// Used for conflict snapshots and merge results.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersonFields {
    pub mother: Option<String>,
    pub father: Option<String>,
    pub info: Option<String>,
}

/// `Some` only for a non-empty string.
pub(crate) fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}
