//! Field resolution policies for person-level merges.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use kin_types::{Person, PersonFields};

use crate::error::MergeError;

/// How to resolve mother/father/info when two records share a name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergeStrategy {
    /// Always take the first record's fields.
    KeepFirst,
    /// Always take the second record's fields.
    KeepSecond,
    /// Per field, the first non-empty value, first record winning ties.
    #[default]
    CombineNonNull,
    /// All three fields from whichever record has more of them filled in;
    /// the first record wins ties.
    PreferComplete,
}

impl MergeStrategy {
    /// Every strategy, in documentation order.
    pub const ALL: [MergeStrategy; 4] = [
        MergeStrategy::KeepFirst,
        MergeStrategy::KeepSecond,
        MergeStrategy::CombineNonNull,
        MergeStrategy::PreferComplete,
    ];

    /// The kebab-case name used in options and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            MergeStrategy::KeepFirst => "keep-first",
            MergeStrategy::KeepSecond => "keep-second",
            MergeStrategy::CombineNonNull => "combine-non-null",
            MergeStrategy::PreferComplete => "prefer-complete",
        }
    }

    /// Resolve the fields of two records. Names are not checked here.
    pub fn resolve(&self, first: &Person, second: &Person) -> PersonFields {
        match self {
            MergeStrategy::KeepFirst => first.fields(),
            MergeStrategy::KeepSecond => second.fields(),
            MergeStrategy::CombineNonNull => PersonFields {
                mother: first_present(first.mother_name(), second.mother_name()),
                father: first_present(first.father_name(), second.father_name()),
                info: first_present(first.info_text(), second.info_text()),
            },
            MergeStrategy::PreferComplete => {
                if first.completeness() >= second.completeness() {
                    first.fields()
                } else {
                    second.fields()
                }
            }
        }
    }
}

fn first_present(a: Option<&str>, b: Option<&str>) -> Option<String> {
    a.or(b).map(str::to_string)
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MergeStrategy {
    type Err = MergeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MergeStrategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == s)
            .ok_or_else(|| MergeError::UnknownStrategy(s.to_string()))
    }
}
