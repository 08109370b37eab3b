//! Tree-level merge: fold another tree's persons into a registry.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use kin_registry::PersonRegistry;
use kin_types::{Person, TreeData};

use crate::error::MergeResult;
use crate::person::{conflicting_fields, merge_person};
use crate::report::{ConflictRecord, MergeStats};
use crate::strategy::MergeStrategy;

/// Options for a tree merge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeOptions {
    /// Strategy name. Kept as a string so that an unknown name is reported
    /// per person instead of aborting the merge.
    pub strategy: String,
    /// Run closure on the receiver afterwards.
    ///
    /// Setting this to `false` is a deliberate opt-out for bulk imports: the
    /// receiver may be left with parent names that have no entry until the
    /// caller runs [`PersonRegistry::close`].
    pub update_references: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            strategy: MergeStrategy::default().as_str().to_string(),
            update_references: true,
        }
    }
}

impl MergeOptions {
    /// Default options with the given strategy.
    pub fn with_strategy(strategy: impl Into<String>) -> Self {
        Self {
            strategy: strategy.into(),
            ..Self::default()
        }
    }

    /// Skip closure after the merge.
    pub fn without_closure(mut self) -> Self {
        self.update_references = false;
        self
    }
}

/// Merge every person of `other` into `receiver`, in `other`'s order.
///
/// For a name already in the receiver the two records are merged with the
/// receiver as the first side; otherwise a copy of the incoming person is
/// appended. Placeholders created by the closure pass that follows are
/// counted in [`MergeStats::added`] as well.
pub fn merge_tree(
    receiver: &mut PersonRegistry,
    other: &PersonRegistry,
    options: &MergeOptions,
) -> MergeStats {
    merge_persons(receiver, other.persons(), options)
}

/// Merge an untyped `{ "persons": [...] }` payload into `receiver`.
///
/// The payload is checked before anything is touched; a malformed payload
/// fails with [`MergeError::InvalidArgument`] and leaves the receiver
/// unchanged. The payload's persons are merged as given, without running
/// closure on them first.
///
/// [`MergeError::InvalidArgument`]: crate::MergeError::InvalidArgument
pub fn merge_tree_value(
    receiver: &mut PersonRegistry,
    payload: &Value,
    options: &MergeOptions,
) -> MergeResult<MergeStats> {
    let tree = TreeData::from_value(payload)?;
    Ok(merge_persons(receiver, &tree.persons, options))
}

fn merge_persons(
    receiver: &mut PersonRegistry,
    incoming: &[Person],
    options: &MergeOptions,
) -> MergeStats {
    let mut stats = MergeStats::default();
    // Built once: persons appended during this merge are never merge targets.
    let index = receiver.index_by_name();

    for other in incoming {
        let Some(at) = index.get(&other.name).copied() else {
            receiver.push_unclosed(other.clone());
            stats.added += 1;
            continue;
        };

        let existing = &receiver.persons()[at];
        match merge_person(Some(existing), Some(other), &options.strategy) {
            Ok(merged) => {
                let fields = conflicting_fields(existing, other);
                if !fields.is_empty() {
                    debug!(name = %other.name, ?fields, "conflicting fields");
                    stats.conflicts.push(ConflictRecord::Field {
                        name: other.name.clone(),
                        existing: existing.fields(),
                        incoming: other.fields(),
                        resolved: merged.fields(),
                        fields,
                    });
                }
                receiver.replace_at(at, merged);
                stats.merged += 1;
            }
            Err(e) => {
                warn!(name = %other.name, error = %e, "person merge failed, keeping existing entry");
                stats.conflicts.push(ConflictRecord::Failed {
                    name: other.name.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    let placeholders = if options.update_references {
        receiver.close()
    } else {
        0
    };
    stats.added += placeholders;

    info!(
        strategy = %options.strategy,
        merged = stats.merged,
        added = stats.added,
        conflicts = stats.conflicts.len(),
        placeholders,
        "tree merge complete"
    );
    stats
}
