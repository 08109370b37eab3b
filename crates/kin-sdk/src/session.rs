use std::collections::HashSet;

use serde_json::Value;
use tracing::{debug, info};

use kin_graph::{to_dot, to_dot_with, GraphOptions};
use kin_merge::{merge_tree, merge_tree_value, MergeOptions, MergeStats};
use kin_registry::PersonRegistry;
use kin_store::{ForestStats, ForestStore, InMemoryForestStore};
use kin_types::{Person, TreeData};

use crate::error::{SdkError, SdkResult};
use crate::observer::{Observers, SessionSnapshot, SubscriptionId};

/// Initial contents for [`Kinfold::create_tree`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum TreeSeed {
    #[default]
    Empty,
    /// A copy of the session's current tree.
    CopyCurrent,
    Persons(Vec<Person>),
}

/// A working session over one forest.
///
/// Holds the selected tree as a [`PersonRegistry`]. Every mutation is saved
/// through the store with the tree selected, and subscribers are notified
/// afterwards. A mutation whose save fails leaves the session unchanged.
#[derive(Debug)]
pub struct Kinfold<S: ForestStore = InMemoryForestStore> {
    store: S,
    tree_name: String,
    registry: PersonRegistry,
    observers: Observers,
}

impl Kinfold<InMemoryForestStore> {
    /// A session over a fresh in-memory forest.
    pub fn in_memory() -> SdkResult<Self> {
        Self::open(InMemoryForestStore::new())
    }
}

impl<S: ForestStore> Kinfold<S> {
    /// Open a session on the store's selected tree.
    pub fn open(store: S) -> SdkResult<Self> {
        let tree_name = store.selected_tree_name()?;
        let registry = PersonRegistry::from_tree_data(store.active_tree_data()?);
        info!(tree = %tree_name, persons = registry.len(), "opened session");
        Ok(Self {
            store,
            tree_name,
            registry,
            observers: Observers::default(),
        })
    }

    // ---- Accessors ----

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Name of the tree being edited.
    pub fn tree_name(&self) -> &str {
        &self.tree_name
    }

    pub fn registry(&self) -> &PersonRegistry {
        &self.registry
    }

    pub fn persons(&self) -> &[Person] {
        self.registry.persons()
    }

    pub fn tree_names(&self) -> SdkResult<Vec<String>> {
        Ok(self.store.tree_names()?)
    }

    pub fn stats(&self) -> SdkResult<ForestStats> {
        Ok(self.store.stats()?)
    }

    /// Contents of any stored tree.
    pub fn load_tree(&self, name: &str) -> SdkResult<TreeData> {
        self.store
            .load(name)?
            .ok_or_else(|| SdkError::TreeNotFound(name.to_string()))
    }

    pub fn snapshot(&self) -> SdkResult<SessionSnapshot> {
        Ok(SessionSnapshot {
            tree_name: self.tree_name.clone(),
            person_count: self.registry.len(),
            tree_names: self.store.tree_names()?,
        })
    }

    // ---- Person operations ----

    pub fn add_person(&mut self, person: Person) -> SdkResult<()> {
        let mut next = self.registry.clone();
        next.add_person(person);
        self.commit(next)
    }

    /// Replace or add a person; renames propagate to every reference.
    pub fn update_person(&mut self, original_name: &str, person: Person) -> SdkResult<()> {
        let mut next = self.registry.clone();
        next.update_person(original_name, person);
        self.commit(next)
    }

    /// Remove a person. Returns `false`, saving nothing, if no one by that
    /// name exists.
    pub fn remove_person(&mut self, name: &str) -> SdkResult<bool> {
        let mut next = self.registry.clone();
        if !next.remove_person(name) {
            return Ok(false);
        }
        self.commit(next)?;
        Ok(true)
    }

    pub fn clear_persons(&mut self) -> SdkResult<()> {
        self.commit(PersonRegistry::new())
    }

    // ---- Tree data operations ----

    /// Replace the current tree wholesale.
    pub fn replace_current_tree(&mut self, data: TreeData) -> SdkResult<()> {
        self.commit(PersonRegistry::from_tree_data(data))
    }

    /// Overwrite a stored tree, creating it if needed, and select it.
    ///
    /// The session follows the selection, so replacing another tree moves
    /// the session there.
    pub fn replace_tree(&mut self, name: &str, data: TreeData) -> SdkResult<()> {
        let closed = PersonRegistry::from_tree_data(data).to_tree_data();
        self.store.save(name, &closed, true)?;
        self.reload()?;
        info!(tree = %self.tree_name, persons = self.registry.len(), "replaced tree");
        self.notify()
    }

    /// Append the persons whose names are not yet present, ignoring the rest.
    ///
    /// Returns how many persons were appended, not counting placeholders.
    pub fn merge_new_persons(&mut self, persons: Vec<Person>) -> SdkResult<usize> {
        let mut next = self.registry.clone();
        let mut known: HashSet<String> = next.persons().iter().map(|p| p.name.clone()).collect();
        let mut appended = 0;
        for person in persons {
            if known.insert(person.name.clone()) {
                next.push_unclosed(person);
                appended += 1;
            }
        }
        next.close();
        debug!(tree = %self.tree_name, appended, "merged new persons");
        self.commit(next)?;
        Ok(appended)
    }

    /// Merge another stored tree into the current one.
    pub fn merge_from_tree(&mut self, source: &str, options: &MergeOptions) -> SdkResult<MergeStats> {
        let other = PersonRegistry::from_tree_data(self.load_tree(source)?);
        let mut next = self.registry.clone();
        let stats = merge_tree(&mut next, &other, options);
        self.commit(next)?;
        Ok(stats)
    }

    /// Merge an untyped `{ "persons": [...] }` payload into the current tree.
    ///
    /// A malformed payload is rejected before anything changes.
    pub fn merge_payload(&mut self, payload: &Value, options: &MergeOptions) -> SdkResult<MergeStats> {
        let mut next = self.registry.clone();
        let stats = merge_tree_value(&mut next, payload, options)?;
        self.commit(next)?;
        Ok(stats)
    }

    /// Store a copy of the current tree merged with `source` as a new tree.
    ///
    /// The current tree and the selection are left alone. Returns the name
    /// the new tree was stored under.
    pub fn merge_into_new_tree(
        &mut self,
        new_name: &str,
        source: &str,
        options: &MergeOptions,
    ) -> SdkResult<(String, MergeStats)> {
        let other = PersonRegistry::from_tree_data(self.load_tree(source)?);
        let mut merged = self.registry.clone();
        let stats = merge_tree(&mut merged, &other, options);
        let name = self.store.create_tree(new_name, Some(&merged.to_tree_data()))?;
        info!(tree = %name, from = %self.tree_name, source, "merged into new tree");
        self.notify()?;
        Ok((name, stats))
    }

    // ---- Tree management ----

    /// Switch to another stored tree. Returns `false` if it does not exist.
    pub fn switch_to_tree(&mut self, name: &str) -> SdkResult<bool> {
        if !self.store.switch_to_tree(name)? {
            return Ok(false);
        }
        self.reload()?;
        self.notify()?;
        Ok(true)
    }

    /// Create a tree without switching to it. Returns the trimmed name.
    pub fn create_tree(&mut self, name: &str, seed: TreeSeed) -> SdkResult<String> {
        let source = match seed {
            TreeSeed::Empty => TreeData::empty(),
            TreeSeed::CopyCurrent => self.registry.to_tree_data(),
            TreeSeed::Persons(persons) => PersonRegistry::from_tree_data(TreeData::new(persons)).into(),
        };
        let name = self.store.create_tree(name, Some(&source))?;
        self.notify()?;
        Ok(name)
    }

    /// Delete a tree. Deleting the current tree moves the session to the
    /// default tree.
    pub fn delete_tree(&mut self, name: &str) -> SdkResult<()> {
        self.store.delete_tree(name)?;
        self.reload()?;
        self.notify()
    }

    pub fn rename_tree(&mut self, old: &str, new: &str) -> SdkResult<String> {
        let name = self.store.rename_tree(old, new)?;
        self.reload()?;
        self.notify()?;
        Ok(name)
    }

    /// Drop every tree and return to the default tree.
    pub fn reset_forest(&mut self) -> SdkResult<()> {
        self.store.reset_to_default()?;
        self.reload()?;
        self.notify()
    }

    // ---- Rendering ----

    /// DOT text of the current tree.
    pub fn dot(&self) -> String {
        to_dot(&self.registry)
    }

    pub fn dot_with(&self, options: &GraphOptions) -> String {
        to_dot_with(&self.registry, options)
    }

    /// DOT text of any stored tree.
    pub fn dot_for_tree(&self, name: &str) -> SdkResult<String> {
        let registry = PersonRegistry::from_tree_data(self.load_tree(name)?);
        Ok(to_dot(&registry))
    }

    // ---- Subscriptions ----

    /// Register a callback. It is called once right away with the current
    /// snapshot, then after every change.
    pub fn subscribe<F>(&mut self, callback: F) -> SdkResult<SubscriptionId>
    where
        F: FnMut(&SessionSnapshot) + Send + 'static,
    {
        let current = self.snapshot()?;
        Ok(self.observers.subscribe(Box::new(callback), &current))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Call every subscriber with the current snapshot.
    pub fn notify(&mut self) -> SdkResult<()> {
        if self.observers.is_empty() {
            return Ok(());
        }
        let snapshot = self.snapshot()?;
        self.observers.notify(&snapshot);
        Ok(())
    }

    // ---- Internal ----

    fn commit(&mut self, next: PersonRegistry) -> SdkResult<()> {
        self.store.save(&self.tree_name, &next.to_tree_data(), true)?;
        debug!(tree = %self.tree_name, persons = next.len(), "saved session tree");
        self.registry = next;
        self.notify()
    }

    fn reload(&mut self) -> SdkResult<()> {
        self.tree_name = self.store.selected_tree_name()?;
        self.registry = PersonRegistry::from_tree_data(self.store.active_tree_data()?);
        Ok(())
    }
}
