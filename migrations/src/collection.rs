//! Name-keyed collection for schema snapshot entries
//!
//! Tables, columns and indices are each stored in a `Collection<E>` that keeps
//! declaration order and indexes entries by name.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

// =============================================================================
// Named entries
// =============================================================================

/// A snapshot entry identified by its name.
pub trait Named {
    fn name(&self) -> &str;
}

// =============================================================================
// Collection
// =============================================================================

/// Ordered entries with O(1) lookup by name.
///
/// Equality ignores order: two collections are equal when they hold equal
/// entries under the same names.
#[derive(Debug, Clone)]
pub struct Collection<E: Named> {
    entities: Vec<E>,
    /// Index from entry name to position
    index: HashMap<String, usize>,
}

impl<E: Named> Default for Collection<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Named> Collection<E> {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Push an entry, returns true if inserted, false if the name is taken
    pub fn push(&mut self, entity: E) -> bool {
        if self.index.contains_key(entity.name()) {
            return false;
        }
        self.index.insert(entity.name().to_string(), self.entities.len());
        self.entities.push(entity);
        true
    }

    pub fn get(&self, name: &str) -> Option<&E> {
        self.index.get(name).map(|&idx| &self.entities[idx])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut E> {
        self.index.get(name).map(|&idx| &mut self.entities[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Replace the entry with the same name in place, returning the old one
    pub fn replace(&mut self, entity: E) -> Option<E> {
        let idx = *self.index.get(entity.name())?;
        Some(std::mem::replace(&mut self.entities[idx], entity))
    }

    /// Remove an entry by name, keeping the order of the rest
    pub fn delete(&mut self, name: &str) -> Option<E> {
        let idx = self.index.remove(name)?;
        let removed = self.entities.remove(idx);
        for position in self.index.values_mut() {
            if *position > idx {
                *position -= 1;
            }
        }
        Some(removed)
    }

    pub fn list(&self) -> &[E] {
        &self.entities
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.entities.iter()
    }

    pub fn into_vec(self) -> Vec<E> {
        self.entities
    }
}

impl<E: Named + PartialEq> PartialEq for Collection<E> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|entity| other.get(entity.name()) == Some(entity))
    }
}

impl<E: Named> FromIterator<E> for Collection<E> {
    /// Later entries with an already-seen name are dropped.
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        let mut collection = Self::new();
        for entity in iter {
            collection.push(entity);
        }
        collection
    }
}

impl<'a, E: Named> IntoIterator for &'a Collection<E> {
    type Item = &'a E;
    type IntoIter = std::slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.iter()
    }
}

impl<E: Named + Serialize> Serialize for Collection<E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.entities)
    }
}

impl<'de, E: Named + Deserialize<'de>> Deserialize<'de> for Collection<E> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut collection = Self::new();
        for entity in Vec::<E>::deserialize(deserializer)? {
            let name = entity.name().to_string();
            if !collection.push(entity) {
                return Err(D::Error::custom(format!("duplicate entry `{name}`")));
            }
        }
        Ok(collection)
    }
}

// =============================================================================
// Diff
// =============================================================================

/// Entries of two collections matched by name.
#[derive(Debug)]
pub struct Diff<'a, E> {
    /// Only in the old collection, in old order
    pub dropped: Vec<&'a E>,
    /// Only in the new collection, in new order
    pub created: Vec<&'a E>,
    /// In both, as `(old, new)`, in old order
    pub matched: Vec<(&'a E, &'a E)>,
}

pub fn diff<'a, E: Named>(old: &'a Collection<E>, new: &'a Collection<E>) -> Diff<'a, E> {
    let mut result = Diff {
        dropped: Vec::new(),
        created: Vec::new(),
        matched: Vec::new(),
    };

    for entity in old {
        match new.get(entity.name()) {
            Some(updated) => result.matched.push((entity, updated)),
            None => result.dropped.push(entity),
        }
    }
    for entity in new {
        if !old.contains(entity.name()) {
            result.created.push(entity);
        }
    }

    result
}
