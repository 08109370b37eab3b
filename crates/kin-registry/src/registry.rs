//! The [`PersonRegistry`] and its closure pass.
//!
//! # Invariants
//!
//! - After construction, `add_person`, `update_person` and `close`, every
//!   non-empty parent name has an entry in the registry.
//! - `remove_person` never creates names, so it leaves a closed registry
//!   closed without running closure.
//! - Iteration order is insertion order. Placeholders are appended in the
//!   order their names are first discovered.

use std::collections::{HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};
use tracing::debug;

use kin_types::{Person, TreeData};

/// The persons of one tree, kept referentially closed.
///
/// Serializes as a [`TreeData`] payload. Deserializing runs closure.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TreeData", into = "TreeData")]
pub struct PersonRegistry {
    persons: Vec<Person>,
}

impl PersonRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a stored payload and close it.
    ///
    /// Precondition: every person has a name. Payloads from untrusted
    /// sources should go through [`TreeData::from_value`] first.
    pub fn from_tree_data(data: TreeData) -> Self {
        let mut registry = Self {
            persons: data.persons,
        };
        registry.close();
        registry
    }

    /// Snapshot the registry as a storable payload.
    pub fn to_tree_data(&self) -> TreeData {
        TreeData::new(self.persons.clone())
    }

    /// All persons in insertion order.
    pub fn persons(&self) -> &[Person] {
        &self.persons
    }

    /// Consume the registry, returning its persons.
    pub fn into_persons(self) -> Vec<Person> {
        self.persons
    }

    /// Number of entries (placeholders included).
    pub fn len(&self) -> usize {
        self.persons.len()
    }

    /// Returns `true` if the registry has no entries.
    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }

    /// First entry with the given name.
    pub fn get(&self, name: &str) -> Option<&Person> {
        self.persons.iter().find(|p| p.name == name)
    }

    /// Returns `true` if an entry with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Index of the first entry with the given name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.persons.iter().position(|p| p.name == name)
    }

    /// Map from name to the index of its last entry.
    ///
    /// Later duplicates shadow earlier ones, so a merge lands on the most
    /// recently added copy of a name.
    pub fn index_by_name(&self) -> HashMap<String, usize> {
        let mut index = HashMap::with_capacity(self.persons.len());
        for (i, p) in self.persons.iter().enumerate() {
            index.insert(p.name.clone(), i);
        }
        index
    }

    // ---------------------------------------------------------------
    // Mutation
    // ---------------------------------------------------------------

    /// Append a person and close the registry.
    ///
    /// No duplicate check is made. Closure never overwrites an existing
    /// entry, it only appends missing names.
    pub fn add_person(&mut self, person: Person) {
        debug!(name = %person.name, "adding person");
        self.persons.push(person);
        self.close();
    }

    /// Replace the entry named `original_name` with `updated`.
    ///
    /// If the name changes, every other entry whose mother or father was
    /// `original_name` is pointed at the new name. If no entry is named
    /// `original_name`, this behaves like [`add_person`](Self::add_person).
    pub fn update_person(&mut self, original_name: &str, updated: Person) {
        let Some(index) = self.position(original_name) else {
            self.add_person(updated);
            return;
        };

        let new_name = updated.name.clone();
        self.persons[index] = updated;
        if new_name != original_name {
            let rewritten = self.rename_references(original_name, &new_name, index);
            debug!(from = %original_name, to = %new_name, rewritten, "renamed person");
        }
        self.close();
    }

    /// Delete the entries named `name` and null out every reference to it.
    ///
    /// Children of the removed person are kept; only their link is cleared.
    /// Returns `true` if an entry was removed.
    pub fn remove_person(&mut self, name: &str) -> bool {
        let before = self.persons.len();
        self.persons.retain(|p| p.name != name);
        let removed = self.persons.len() != before;

        for p in &mut self.persons {
            if p.mother.as_deref() == Some(name) {
                p.mother = None;
            }
            if p.father.as_deref() == Some(name) {
                p.father = None;
            }
        }

        debug!(name, removed, "removed person");
        removed
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.persons.clear();
    }

    /// Overwrite the entry at `index` without running closure.
    ///
    /// Callers that batch several raw writes must call [`close`](Self::close)
    /// afterwards if they need the closure invariant back.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn replace_at(&mut self, index: usize, person: Person) {
        self.persons[index] = person;
    }

    /// Append an entry without running closure. See [`replace_at`](Self::replace_at).
    pub fn push_unclosed(&mut self, person: Person) {
        self.persons.push(person);
    }

    fn rename_references(&mut self, old: &str, new: &str, skip: usize) -> usize {
        let mut rewritten = 0;
        for (i, p) in self.persons.iter_mut().enumerate() {
            if i == skip {
                continue;
            }
            if p.mother.as_deref() == Some(old) {
                p.mother = Some(new.to_string());
                rewritten += 1;
            }
            if p.father.as_deref() == Some(old) {
                p.father = Some(new.to_string());
                rewritten += 1;
            }
        }
        rewritten
    }

    // ---------------------------------------------------------------
    // Closure
    // ---------------------------------------------------------------

    /// Every name that appears as an entry or as a non-empty parent
    /// reference, without duplicates, in order of first appearance.
    pub fn unique_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut names = Vec::new();
        for p in &self.persons {
            let candidates = std::iter::once(p.name.as_str()).chain(p.parent_names());
            for name in candidates {
                if seen.insert(name) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Append a placeholder for every referenced name without an entry.
    ///
    /// Returns the number of placeholders added.
    pub fn close(&mut self) -> usize {
        let existing: HashSet<&str> = self.persons.iter().map(|p| p.name.as_str()).collect();
        let missing: Vec<String> = self
            .unique_names()
            .into_iter()
            .filter(|name| !existing.contains(name))
            .map(str::to_string)
            .collect();

        for name in &missing {
            debug!(name = %name, "adding placeholder");
            self.persons.push(Person::new(name.clone()));
        }
        missing.len()
    }

    /// Returns `true` if every parent reference resolves to an entry.
    pub fn is_closed(&self) -> bool {
        self.dangling_references().is_empty()
    }

    /// `(child, parent)` pairs whose parent has no entry.
    ///
    /// Only non-empty after a merge that opted out of closure.
    pub fn dangling_references(&self) -> Vec<(&str, &str)> {
        let existing: HashSet<&str> = self.persons.iter().map(|p| p.name.as_str()).collect();
        self.persons
            .iter()
            .flat_map(|p| p.parent_names().map(move |parent| (p.name.as_str(), parent)))
            .filter(|(_, parent)| !existing.contains(parent))
            .collect()
    }

    // ---------------------------------------------------------------
    // Lineage queries
    // ---------------------------------------------------------------

    /// Entries that name `name` as mother or father.
    pub fn children_of(&self, name: &str) -> Vec<&Person> {
        self.persons
            .iter()
            .filter(|p| p.parent_names().any(|parent| parent == name))
            .collect()
    }

    /// Entries with no known parent.
    pub fn roots(&self) -> Vec<&Person> {
        self.persons
            .iter()
            .filter(|p| p.parent_names().next().is_none())
            .collect()
    }

    /// Ancestors of `name` up to `max_depth` generations (BFS upward).
    ///
    /// The person itself is not included. Cycles are walked once.
    pub fn ancestors(&self, name: &str, max_depth: usize) -> Vec<&Person> {
        self.walk(name, max_depth, |p| p.parent_names().collect())
    }

    /// Descendants of `name` up to `max_depth` generations (BFS downward).
    pub fn descendants(&self, name: &str, max_depth: usize) -> Vec<&Person> {
        self.walk(name, max_depth, |p| {
            self.children_of(&p.name)
                .into_iter()
                .map(|c| c.name.as_str())
                .collect()
        })
    }

    fn walk<'a, F>(&'a self, name: &str, max_depth: usize, next: F) -> Vec<&'a Person>
    where
        F: Fn(&'a Person) -> Vec<&'a str>,
    {
        let Some(start) = self.get(name) else {
            return Vec::new();
        };

        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(start.name.as_str());
        let mut result = Vec::new();
        let mut queue: VecDeque<(&str, usize)> = VecDeque::new();

        for n in next(start) {
            if visited.insert(n) {
                queue.push_back((n, 1));
            }
        }

        while let Some((current, depth)) = queue.pop_front() {
            let Some(person) = self.get(current) else {
                continue;
            };
            result.push(person);
            if depth < max_depth {
                for n in next(person) {
                    if visited.insert(n) {
                        queue.push_back((n, depth + 1));
                    }
                }
            }
        }

        result
    }
}

impl From<TreeData> for PersonRegistry {
    fn from(data: TreeData) -> Self {
        Self::from_tree_data(data)
    }
}

impl From<PersonRegistry> for TreeData {
    fn from(registry: PersonRegistry) -> Self {
        TreeData::new(registry.persons)
    }
}

impl FromIterator<Person> for PersonRegistry {
    fn from_iter<I: IntoIterator<Item = Person>>(iter: I) -> Self {
        Self::from_tree_data(TreeData::new(iter.into_iter().collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn person(name: &str, mother: Option<&str>, father: Option<&str>) -> Person {
        Person::with_parents(name, mother, father)
    }

    /// John Doe with both parents, Jane Doe present, Jack Doe added by closure.
    fn doe_family() -> PersonRegistry {
        PersonRegistry::from_tree_data(TreeData::new(vec![
            person("John Doe", Some("Jane Doe"), Some("Jack Doe")),
            person("Jane Doe", None, None),
        ]))
    }

    fn names(registry: &PersonRegistry) -> Vec<&str> {
        registry.persons().iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn construction_adds_missing_parents() {
        let reg = doe_family();
        assert_eq!(names(&reg), vec!["John Doe", "Jane Doe", "Jack Doe"]);
        let jack = reg.get("Jack Doe").unwrap();
        assert!(jack.is_placeholder());
        assert!(reg.is_closed());
    }

    #[test]
    fn add_person_with_known_parents() {
        let mut reg = doe_family();
        reg.add_person(person("Mary Jane", Some("Jane Doe"), Some("John Doe")));
        assert_eq!(reg.len(), 4);
        assert!(reg.contains("Mary Jane"));
    }

    #[test]
    fn add_person_creates_unknown_parents() {
        let mut reg = doe_family();
        reg.add_person(person("New Kid", Some("New Mom"), Some("New Dad")));
        assert_eq!(reg.len(), 6);
        assert!(reg.contains("New Mom"));
        assert!(reg.contains("New Dad"));
    }

    #[test]
    fn closure_does_not_overwrite_existing_entry() {
        let mut reg = doe_family();
        reg.add_person(person("Jane Doe", Some("Grandma"), None).with_info("dup"));
        let janes: Vec<_> = reg.persons().iter().filter(|p| p.name == "Jane Doe").collect();
        assert_eq!(janes.len(), 2);
        assert!(reg.contains("Grandma"));
    }

    #[test]
    fn index_points_at_last_duplicate() {
        let mut reg = doe_family();
        reg.add_person(person("Jane Doe", None, None).with_info("second"));
        let index = reg.index_by_name();
        assert_eq!(index.len(), 3);
        assert_eq!(index["Jane Doe"], 3);
        assert_eq!(index["John Doe"], 0);
        // Plain lookups still see the first entry.
        assert_eq!(reg.position("Jane Doe"), Some(1));
    }

    #[test]
    fn update_renames_and_closes() {
        let mut reg = doe_family();
        reg.update_person(
            "Jane Doe",
            person("Jane Doe Smith", Some("Grandma"), Some("Grandpa")),
        );

        let jane = reg.get("Jane Doe Smith").unwrap();
        assert_eq!(jane.mother.as_deref(), Some("Grandma"));
        assert_eq!(
            reg.get("John Doe").unwrap().mother.as_deref(),
            Some("Jane Doe Smith")
        );
        assert_eq!(reg.len(), 5);
        assert!(!reg.contains("Jane Doe"));
    }

    #[test]
    fn rename_reaches_every_child() {
        let mut reg = doe_family();
        reg.add_person(person("Second Child", Some("Jane Doe"), Some("Jack Doe")));
        reg.add_person(person("Third Child", None, Some("Jane Doe")));
        reg.update_person("Jane Doe", person("Jane Doe Smith", None, None));

        assert_eq!(
            reg.get("John Doe").unwrap().mother.as_deref(),
            Some("Jane Doe Smith")
        );
        assert_eq!(
            reg.get("Second Child").unwrap().mother.as_deref(),
            Some("Jane Doe Smith")
        );
        assert_eq!(
            reg.get("Third Child").unwrap().father.as_deref(),
            Some("Jane Doe Smith")
        );
        assert!(!reg.contains("Jane Doe"));
    }

    #[test]
    fn update_unknown_name_adds() {
        let mut reg = doe_family();
        reg.update_person("Nobody", person("Newcomer", Some("Jane Doe"), None));
        assert_eq!(reg.len(), 4);
        assert!(reg.contains("Newcomer"));
    }

    #[test]
    fn update_keeps_position() {
        let mut reg = doe_family();
        reg.update_person("Jane Doe", person("Jane Doe", None, None).with_info("b. 1950"));
        assert_eq!(reg.position("Jane Doe"), Some(1));
        assert_eq!(reg.get("Jane Doe").unwrap().info.as_deref(), Some("b. 1950"));
    }

    #[test]
    fn remove_nulls_references_without_cascading() {
        let mut reg = doe_family();
        reg.add_person(person("Grandchild", Some("Someone"), Some("John Doe")));

        assert!(reg.remove_person("Jane Doe"));
        assert_eq!(reg.len(), 4);
        assert!(!reg.contains("Jane Doe"));
        assert_eq!(reg.get("John Doe").unwrap().mother, None);
        assert_eq!(
            reg.get("John Doe").unwrap().father.as_deref(),
            Some("Jack Doe")
        );
        assert!(reg.contains("Grandchild"));
        assert!(reg.is_closed());
    }

    #[test]
    fn remove_missing_person_is_noop() {
        let mut reg = doe_family();
        assert!(!reg.remove_person("Ghost"));
        assert_eq!(reg.len(), 3);
    }

    #[test]
    fn clear_empties() {
        let mut reg = doe_family();
        reg.clear();
        assert!(reg.is_empty());
        assert!(reg.is_closed());
    }

    #[test]
    fn unique_names_in_discovery_order() {
        let reg = PersonRegistry {
            persons: vec![
                person("C", Some("M"), Some("F")),
                person("D", Some("M"), Some("")),
            ],
        };
        assert_eq!(reg.unique_names(), vec!["C", "M", "F", "D"]);
    }

    #[test]
    fn empty_parent_strings_need_no_placeholder() {
        let reg = PersonRegistry::from_tree_data(TreeData::new(vec![Person {
            name: "A".into(),
            mother: Some(String::new()),
            father: None,
            info: None,
        }]));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn raw_writes_can_leave_dangling_references() {
        let mut reg = doe_family();
        reg.push_unclosed(person("Kid", Some("Unknown"), None));
        assert_eq!(reg.dangling_references(), vec![("Kid", "Unknown")]);
        assert_eq!(reg.close(), 1);
        assert!(reg.is_closed());
    }

    #[test]
    fn tolerates_mutual_parentage() {
        let mut reg = PersonRegistry::new();
        reg.add_person(person("A", Some("B"), None));
        reg.update_person("B", person("B", Some("A"), None));
        assert_eq!(reg.len(), 2);
        assert_eq!(names_of(&reg.ancestors("A", 10)), vec!["B"]);
        assert_eq!(names_of(&reg.descendants("A", 10)), vec!["B"]);
    }

    fn names_of<'a>(persons: &[&'a Person]) -> Vec<&'a str> {
        persons.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn lineage_queries() {
        let mut reg = doe_family();
        reg.add_person(person("Grandchild", None, Some("John Doe")));

        assert_eq!(names_of(&reg.children_of("Jane Doe")), vec!["John Doe"]);
        assert_eq!(
            names_of(&reg.ancestors("Grandchild", 2)),
            vec!["John Doe", "Jane Doe", "Jack Doe"]
        );
        assert_eq!(names_of(&reg.ancestors("Grandchild", 1)), vec!["John Doe"]);
        assert_eq!(
            names_of(&reg.descendants("Jack Doe", 5)),
            vec!["John Doe", "Grandchild"]
        );
        assert_eq!(names_of(&reg.roots()), vec!["Jane Doe", "Jack Doe"]);
    }

    #[test]
    fn serializes_as_tree_data() {
        let reg = doe_family();
        let json = serde_json::to_value(&reg).unwrap();
        assert_eq!(json["persons"].as_array().unwrap().len(), 3);

        let back: PersonRegistry =
            serde_json::from_str(r#"{"persons":[{"name":"K","mother":"M"}]}"#).unwrap();
        assert_eq!(back.len(), 2);
    }

    #[derive(Clone, Debug)]
    enum Op {
        Add(Person),
        Update(String, Person),
        Remove(String),
    }

    fn name_strategy() -> impl Strategy<Value = String> {
        prop::sample::select(vec!["a", "b", "c", "d", "e", "f"]).prop_map(str::to_string)
    }

    fn person_strategy() -> impl Strategy<Value = Person> {
        (
            name_strategy(),
            prop::option::of(name_strategy()),
            prop::option::of(name_strategy()),
        )
            .prop_map(|(name, mother, father)| Person {
                name,
                mother,
                father,
                info: None,
            })
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            person_strategy().prop_map(Op::Add),
            (name_strategy(), person_strategy()).prop_map(|(n, p)| Op::Update(n, p)),
            name_strategy().prop_map(Op::Remove),
        ]
    }

    proptest! {
        #[test]
        fn closure_holds_after_every_operation(ops in prop::collection::vec(op_strategy(), 0..40)) {
            let mut reg = PersonRegistry::new();
            for op in ops {
                match op {
                    Op::Add(p) => reg.add_person(p),
                    Op::Update(n, p) => reg.update_person(&n, p),
                    Op::Remove(n) => { reg.remove_person(&n); }
                }
                prop_assert!(reg.is_closed(), "dangling: {:?}", reg.dangling_references());
            }
        }
    }
}
