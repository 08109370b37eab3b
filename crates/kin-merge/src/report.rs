//! Merge statistics and conflict records.

use std::fmt;

use serde::{Deserialize, Serialize};

use kin_types::PersonFields;

/// Which field two records disagreed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictField {
    Mother,
    Father,
    Info,
}

impl fmt::Display for ConflictField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConflictField::Mother => "mother",
            ConflictField::Father => "father",
            ConflictField::Info => "info",
        })
    }
}

/// One reported problem from a tree merge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConflictRecord {
    /// Both sides held different non-empty values for at least one field.
    Field {
        name: String,
        existing: PersonFields,
        incoming: PersonFields,
        resolved: PersonFields,
        fields: Vec<ConflictField>,
    },
    /// The person-level merge failed; the receiver's entry was left as is.
    Failed { name: String, error: String },
}

impl ConflictRecord {
    /// Name of the person the record is about.
    pub fn name(&self) -> &str {
        match self {
            ConflictRecord::Field { name, .. } | ConflictRecord::Failed { name, .. } => name,
        }
    }

    /// Returns `true` for a failed merge rather than a field disagreement.
    pub fn is_failure(&self) -> bool {
        matches!(self, ConflictRecord::Failed { .. })
    }
}

/// Outcome of folding one tree into another.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeStats {
    /// Incoming persons merged into an existing entry.
    pub merged: usize,
    /// Incoming persons appended as new entries.
    pub added: usize,
    /// Disagreements and failures, in processing order.
    pub conflicts: Vec<ConflictRecord>,
}

impl MergeStats {
    /// Returns `true` if nothing was reported.
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Field-level disagreements only.
    pub fn field_conflicts(&self) -> impl Iterator<Item = &ConflictRecord> {
        self.conflicts.iter().filter(|c| !c.is_failure())
    }

    /// Failed person-level merges only.
    pub fn failures(&self) -> impl Iterator<Item = &ConflictRecord> {
        self.conflicts.iter().filter(|c| c.is_failure())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_conflict_serializes_flat() {
        let record = ConflictRecord::Field {
            name: "John".into(),
            existing: PersonFields {
                mother: Some("Jane".into()),
                ..Default::default()
            },
            incoming: PersonFields {
                mother: Some("Other".into()),
                ..Default::default()
            },
            resolved: PersonFields {
                mother: Some("Jane".into()),
                ..Default::default()
            },
            fields: vec![ConflictField::Mother],
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["name"], "John");
        assert_eq!(value["existing"]["mother"], "Jane");
        assert_eq!(value["incoming"]["mother"], "Other");
        assert_eq!(value["fields"], json!(["mother"]));
        assert!(value.get("error").is_none());
    }

    #[test]
    fn failure_serializes_with_error() {
        let record = ConflictRecord::Failed {
            name: "X".into(),
            error: "unknown merge strategy: nope".into(),
        };
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"name": "X", "error": "unknown merge strategy: nope"})
        );
        let back: ConflictRecord =
            serde_json::from_value(json!({"name": "X", "error": "e"})).unwrap();
        assert!(back.is_failure());
    }

    #[test]
    fn stats_partition_conflicts() {
        let stats = MergeStats {
            merged: 1,
            added: 0,
            conflicts: vec![
                ConflictRecord::Failed {
                    name: "a".into(),
                    error: "e".into(),
                },
                ConflictRecord::Field {
                    name: "b".into(),
                    existing: PersonFields::default(),
                    incoming: PersonFields::default(),
                    resolved: PersonFields::default(),
                    fields: vec![],
                },
            ],
        };
        assert!(!stats.is_clean());
        assert_eq!(stats.failures().count(), 1);
        assert_eq!(stats.field_conflicts().next().unwrap().name(), "b");
    }
}
