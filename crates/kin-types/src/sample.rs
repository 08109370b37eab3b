//! The bundled example family, used to seed the reserved default tree.

use crate::person::Person;
use crate::tree::TreeData;

/// Name of the reserved default tree.
pub const SAMPLE_TREE_NAME: &str = "Family Example";

/// Three generations of a small family.
pub fn sample_family() -> TreeData {
    let entries: [(&str, Option<&str>, Option<&str>, &str); 9] = [
        ("Chloé Rochat Favre", None, None, "Née 1947"),
        ("Jonas Schmid", None, None, "1939-2007"),
        ("Lina Keller Schmid", None, None, "Née 1945"),
        ("Lian Favre", None, None, "Né 1942"),
        (
            "Mia Schmid Favre",
            Some("Lina Keller Schmid"),
            Some("Jonas Schmid"),
            "Née 1983",
        ),
        (
            "Noah Favre",
            Some("Chloé Rochat Favre"),
            Some("Lian Favre"),
            "Né 1987",
        ),
        ("Elena Favre", Some("Mia Schmid Favre"), Some("Noah Favre"), "Née 2020"),
        ("Sofia Favre", Some("Mia Schmid Favre"), Some("Noah Favre"), "Née 2017"),
        ("Matteo Rochat", Some("Chloé Rochat Favre"), None, "Né 1969"),
    ];

    entries
        .into_iter()
        .map(|(name, mother, father, info)| Person::with_parents(name, mother, father).with_info(info))
        .collect::<Vec<_>>()
        .into()
}
