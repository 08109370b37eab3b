//! Person-level merge and conflict detection.

use kin_types::Person;

use crate::error::{MergeError, MergeResult};
use crate::report::ConflictField;
use crate::strategy::MergeStrategy;

/// Merge two records describing the same person under a named strategy.
///
/// Checks, in order: both operands present, equal names, known strategy.
/// The inputs are never modified; the result is a new record carrying the
/// shared name.
pub fn merge_person(
    first: Option<&Person>,
    second: Option<&Person>,
    strategy: &str,
) -> MergeResult<Person> {
    let (Some(first), Some(second)) = (first, second) else {
        return Err(MergeError::MissingOperand);
    };
    check_names(first, second)?;
    let strategy: MergeStrategy = strategy.parse()?;
    Ok(Person::from_fields(
        first.name.clone(),
        strategy.resolve(first, second),
    ))
}

/// Merge two records with an already parsed strategy.
pub fn merge_with(first: &Person, second: &Person, strategy: MergeStrategy) -> MergeResult<Person> {
    check_names(first, second)?;
    Ok(Person::from_fields(
        first.name.clone(),
        strategy.resolve(first, second),
    ))
}

fn check_names(first: &Person, second: &Person) -> MergeResult<()> {
    if first.name != second.name {
        return Err(MergeError::NameMismatch {
            first: first.name.clone(),
            second: second.name.clone(),
        });
    }
    Ok(())
}

/// Fields on which both records hold a non-empty value and the values differ.
///
/// Independent of any strategy: a disagreement is reported even when the
/// chosen strategy settles it silently.
pub fn conflicting_fields(existing: &Person, incoming: &Person) -> Vec<ConflictField> {
    let pairs = [
        (ConflictField::Mother, existing.mother_name(), incoming.mother_name()),
        (ConflictField::Father, existing.father_name(), incoming.father_name()),
        (ConflictField::Info, existing.info_text(), incoming.info_text()),
    ];

    pairs
        .into_iter()
        .filter_map(|(field, a, b)| match (a, b) {
            (Some(a), Some(b)) if a != b => Some(field),
            _ => None,
        })
        .collect()
}
