//! In-memory object collection
//!
//! Holds the objects of one SPDX graph in insertion order, indexed by
//! identifier. References between objects stay identifier strings;
//! [`ObjectSet::link`] resolves them against the index and reports the
//! ones that point nowhere.

use serde_json::Value;
use std::collections::{BTreeSet, HashMap};

use crate::collect::{extract_id, has_type, referenced_ids};
use crate::vocab::BLANK_NODE_PREFIX;

#[derive(Debug, Default, Clone)]
pub struct ObjectSet {
    objects: Vec<Value>,
    index: HashMap<String, usize>,
}

impl ObjectSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object to the set
    ///
    /// The first object with a given identifier wins; a later object with
    /// the same identifier is dropped and `false` is returned. Objects
    /// without an identifier are always added.
    pub fn add(&mut self, object: Value) -> bool {
        if let Some(id) = extract_id(&object) {
            if self.index.contains_key(id) {
                tracing::warn!(id, "dropping duplicate definition");
                return false;
            }
            self.index.insert(id.to_string(), self.objects.len());
        }
        self.objects.push(object);
        true
    }

    /// Check if an object with this identifier is in the set
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Value> {
        self.index.get(id).map(|&i| &self.objects[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.objects.iter()
    }

    /// Iterate over objects having the given type
    pub fn foreach_type<'a>(&'a self, type_name: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.objects.iter().filter(move |o| has_type(o, type_name))
    }

    /// All identifiers defined in the set
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn into_objects(self) -> Vec<Value> {
        self.objects
    }

    /// First blank node identifier `_:<stem><n>` not already defined
    pub fn unused_blank_id(&self, stem: &str) -> String {
        (0..)
            .map(|n| format!("{}{}{}", BLANK_NODE_PREFIX, stem, n))
            .find(|id| !self.contains(id))
            .unwrap_or_else(|| format!("{}{}", BLANK_NODE_PREFIX, stem))
    }

    /// Resolve every reference in the set against its own objects
    ///
    /// Returns the identifiers that are referenced but not defined.
    pub fn link(&self) -> BTreeSet<String> {
        let unresolved: BTreeSet<String> = self
            .objects
            .iter()
            .flat_map(referenced_ids)
            .filter(|id| !self.contains(id))
            .collect();

        tracing::debug!(
            objects = self.objects.len(),
            unresolved = unresolved.len(),
            "linked collection"
        );
        unresolved
    }
}
