//! Exact-match store from composite key to value

use crate::error::{CollectionError, CollectionResult, consistency_violation};
use crate::secondary_index::IndexKind;
use ahash::RandomState;
use std::collections::HashMap;
use std::collections::hash_map::{self, Entry};
use std::hash::{BuildHasher, Hash};
use turbo_types::CompositeKey;

/// Hash map from [`CompositeKey`] to value.
///
/// The multi-key collection owns one of these and keeps its secondary
/// indexes in step with it; the store itself knows nothing about them.
#[derive(Debug, Clone)]
pub struct PrimaryStore<I, N, V, S = RandomState> {
    entries: HashMap<CompositeKey<I, N>, V, S>,
}

impl<I, N, V, S> PrimaryStore<I, N, V, S>
where
    I: Hash + Eq,
    N: Hash + Eq,
    S: BuildHasher,
{
    /// Create an empty store using the given hasher
    pub fn with_hasher(hasher: S) -> Self {
        Self { entries: HashMap::with_hasher(hasher) }
    }

    /// Create an empty store with room for `capacity` entries
    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self { entries: HashMap::with_capacity_and_hasher(capacity, hasher) }
    }

    /// Insert a new entry, failing with `DuplicateKey` if the key is present
    pub fn insert(&mut self, key: CompositeKey<I, N>, value: V) -> CollectionResult<()> {
        match self.entries.entry(key) {
            Entry::Occupied(_) => Err(CollectionError::duplicate_key("insert")),
            Entry::Vacant(slot) => {
                slot.insert(value);
                Ok(())
            }
        }
    }

    /// Set the value for `key`, returning the value it replaced
    pub fn overwrite_or_insert(&mut self, key: CompositeKey<I, N>, value: V) -> Option<V> {
        self.entries.insert(key, value)
    }

    /// Remove an entry, returning its value if it was present
    pub fn remove(&mut self, key: &CompositeKey<I, N>) -> Option<V> {
        self.entries.remove(key)
    }

    /// Get the value for `key`, failing with `KeyNotFound` if absent
    pub fn get(&self, key: &CompositeKey<I, N>) -> CollectionResult<&V> {
        self.entries.get(key).ok_or_else(|| CollectionError::key_not_found("get"))
    }

    /// Get the value for `key` if present
    pub fn try_get(&self, key: &CompositeKey<I, N>) -> Option<&V> {
        self.entries.get(key)
    }

    /// Get a mutable reference to the value for `key` if present
    pub fn get_mut(&mut self, key: &CompositeKey<I, N>) -> Option<&mut V> {
        self.entries.get_mut(key)
    }

    /// Check if the store holds `key`
    pub fn contains_key(&self, key: &CompositeKey<I, N>) -> bool {
        self.entries.contains_key(key)
    }

    /// Dereference a key taken from a secondary index.
    ///
    /// Index keys always have an entry here, so a miss aborts.
    pub(crate) fn resolve(&self, key: &CompositeKey<I, N>, index: IndexKind) -> &V {
        match self.entries.get(key) {
            Some(value) => value,
            None => consistency_violation(index, "resolve", "indexed key missing from store"),
        }
    }

    /// Remove all entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<I, N, V, S> PrimaryStore<I, N, V, S> {
    /// Get the total number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all entries in unspecified order
    pub fn iter(&self) -> hash_map::Iter<'_, CompositeKey<I, N>, V> {
        self.entries.iter()
    }

    /// Iterate over all keys in unspecified order
    pub fn keys(&self) -> hash_map::Keys<'_, CompositeKey<I, N>, V> {
        self.entries.keys()
    }

    /// Iterate over all values in unspecified order
    pub fn values(&self) -> hash_map::Values<'_, CompositeKey<I, N>, V> {
        self.entries.values()
    }

    /// Consume the store, yielding its entries
    pub fn into_entries(self) -> hash_map::IntoIter<CompositeKey<I, N>, V> {
        self.entries.into_iter()
    }
}

impl<I, N, V, S: Default> Default for PrimaryStore<I, N, V, S> {
    fn default() -> Self {
        Self { entries: HashMap::with_hasher(S::default()) }
    }
}
