//! Multi-key collection keyed by (id, name)
//!
//! [`MultiKeyCollection`] stores each value under a [`CompositeKey`] and keeps
//! two secondary indexes, one per key part, so every value sharing an id or a
//! name can be found without scanning the whole store.
//!
//! # Consistency
//! Each mutation touches the primary store first and then both indexes, and
//! every fallible check happens before the first write. Callers therefore
//! never see a state where an entry is stored but not indexed, or indexed
//! but not stored.
//!
//! # Usage Example
//! ```rust
//! use turbo_core::{CollectionError, CompositeKey, MultiKeyCollection};
//!
//! let mut staff: MultiKeyCollection<u32, &str, &str> = MultiKeyCollection::new();
//! staff.add((1, "a"), "x").unwrap();
//! staff.add((1, "b"), "y").unwrap();
//! staff.add((2, "a"), "z").unwrap();
//!
//! let mut by_id: Vec<_> = staff.get_values_by_id(&1).unwrap().copied().collect();
//! by_id.sort();
//! assert_eq!(by_id, ["x", "y"]);
//!
//! assert!(staff.remove(&CompositeKey::new(2, "a")));
//! assert!(matches!(
//!     staff.get_values_by_id(&2),
//!     Err(CollectionError::KeyNotFound { .. })
//! ));
//! ```

use crate::config::CollectionConfig;
use crate::error::{CollectionError, CollectionResult};
use crate::primary_store::PrimaryStore;
use crate::secondary_index::{IndexKind, SecondaryIndex};
use crate::stats::CollectionStats;
use ahash::RandomState;
use std::borrow::Borrow;
use std::collections::{hash_map, hash_set};
use std::hash::{BuildHasher, Hash};
use std::iter::FusedIterator;
use std::ops::Index;
use tracing::{debug, trace, warn};
use turbo_types::CompositeKey;

/// Most entries reserved up front from an iterator's size hint
const MAX_BULK_RESERVATION: usize = 1 << 12;

/// Lookup-by-part interface shared by multi-key containers
pub trait MultiKeyMap<I, N, V> {
    /// Iterator over the values sharing one key part
    type PartValues<'a>: Iterator<Item = &'a V>
    where
        Self: 'a,
        V: 'a;

    /// Get the value stored under the full composite key
    fn get(&self, key: &CompositeKey<I, N>) -> CollectionResult<&V>;

    /// Get every value whose key has the given id part
    fn get_values_by_id(&self, id: &I) -> CollectionResult<Self::PartValues<'_>>;

    /// Get every value whose key has the given name part
    fn get_values_by_name(&self, name: &N) -> CollectionResult<Self::PartValues<'_>>;

    /// Check if the full composite key is present
    fn contains_key(&self, key: &CompositeKey<I, N>) -> bool;

    /// Number of entries
    fn count(&self) -> usize;
}

/// Collection of unique `(id, name)` composite keys and their values, with
/// O(1) average lookup by the full key or by either part alone.
#[derive(Debug, Clone)]
pub struct MultiKeyCollection<I, N, V, S = RandomState> {
    store: PrimaryStore<I, N, V, S>,
    by_id: SecondaryIndex<I, I, N, S>,
    by_name: SecondaryIndex<N, I, N, S>,
}

impl<I, N, V> MultiKeyCollection<I, N, V, RandomState>
where
    I: Hash + Eq + Clone,
    N: Hash + Eq + Clone,
{
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }
}

impl<I, N, V, S> MultiKeyCollection<I, N, V, S>
where
    I: Hash + Eq + Clone,
    N: Hash + Eq + Clone,
    S: BuildHasher + Default,
{
    /// Create an empty collection with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(&CollectionConfig { initial_capacity: capacity, ..Default::default() })
    }

    /// Create an empty collection sized by `config`.
    ///
    /// Capacities above the configured maximums are capped.
    pub fn with_config(config: &CollectionConfig) -> Self {
        let config = config.clamped();
        Self {
            store: PrimaryStore::with_capacity_and_hasher(config.initial_capacity, S::default()),
            by_id: SecondaryIndex::with_capacity(
                IndexKind::Id,
                config.initial_capacity,
                config.bucket_capacity,
            ),
            by_name: SecondaryIndex::with_capacity(
                IndexKind::Name,
                config.initial_capacity,
                config.bucket_capacity,
            ),
        }
    }

    /// Build a collection from `(key, value)` pairs, as if by repeated
    /// [`add`](Self::add) calls in order.
    ///
    /// Fails with `DuplicateKey` if the sequence repeats a composite key.
    pub fn try_from_iter<K, T>(pairs: T) -> CollectionResult<Self>
    where
        K: Into<CompositeKey<I, N>>,
        T: IntoIterator<Item = (K, V)>,
    {
        let pairs = pairs.into_iter();
        let mut collection = Self::with_capacity(pairs.size_hint().0.min(MAX_BULK_RESERVATION));

        for (position, (key, value)) in pairs.enumerate() {
            if let Err(err) = collection.add(key, value) {
                warn!(position, "Rejected repeated composite key during bulk construction");
                return Err(err);
            }
        }

        debug!(entries = collection.count(), "Built multi-key collection");
        Ok(collection)
    }

    /// Add a new entry.
    ///
    /// Fails with `DuplicateKey`, leaving the collection untouched, if the
    /// composite key is already present.
    pub fn add(&mut self, key: impl Into<CompositeKey<I, N>>, value: V) -> CollectionResult<()> {
        let key = key.into();
        if self.store.contains_key(&key) {
            return Err(CollectionError::duplicate_key("add"));
        }

        self.store.overwrite_or_insert(key.clone(), value);
        self.index_key(key);
        trace!(entries = self.store.len(), "Added entry");
        Ok(())
    }

    /// Set the value for a key, adding the entry if it is new.
    ///
    /// Overwriting an existing key only replaces its value; the indexes
    /// already hold the key. Returns the replaced value.
    pub fn set_by_key(&mut self, key: impl Into<CompositeKey<I, N>>, value: V) -> Option<V> {
        let key = key.into();
        if let Some(slot) = self.store.get_mut(&key) {
            trace!("Overwrote entry value");
            return Some(std::mem::replace(slot, value));
        }

        self.store.overwrite_or_insert(key.clone(), value);
        self.index_key(key);
        trace!(entries = self.store.len(), "Inserted entry");
        None
    }

    /// Alias for [`set_by_key`](Self::set_by_key), matching `HashMap::insert`
    pub fn insert(&mut self, key: impl Into<CompositeKey<I, N>>, value: V) -> Option<V> {
        self.set_by_key(key, value)
    }

    /// Remove an entry, reporting whether it was present
    pub fn remove(&mut self, key: &CompositeKey<I, N>) -> bool {
        self.take(key).is_some()
    }

    /// Remove an entry and return its value
    pub fn take(&mut self, key: &CompositeKey<I, N>) -> Option<V> {
        let value = self.store.remove(key)?;
        self.by_id.remove_entry(key.id(), key);
        self.by_name.remove_entry(key.name(), key);
        trace!(entries = self.store.len(), "Removed entry");
        Some(value)
    }

    /// Get the value for `key`, failing with `KeyNotFound` if absent
    pub fn get(&self, key: &CompositeKey<I, N>) -> CollectionResult<&V> {
        self.store.get(key)
    }

    /// Get the value for `key` if present
    pub fn try_get(&self, key: &CompositeKey<I, N>) -> Option<&V> {
        self.store.try_get(key)
    }

    /// Get a mutable reference to the value for `key`.
    ///
    /// Only the value can change, so the indexes are unaffected.
    pub fn get_mut(&mut self, key: &CompositeKey<I, N>) -> Option<&mut V> {
        self.store.get_mut(key)
    }

    /// Check if the composite key is present
    pub fn contains_key(&self, key: &CompositeKey<I, N>) -> bool {
        self.store.contains_key(key)
    }

    /// Get every value whose key has id part `id`.
    ///
    /// Fails with `KeyNotFound` when no entry has that id; a successful
    /// lookup always yields at least one value.
    pub fn get_values_by_id<Q>(&self, id: &Q) -> CollectionResult<PartValues<'_, I, N, V, S>>
    where
        I: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let bucket = self.by_id.lookup(id)?;
        Ok(PartValues { keys: bucket.iter(), store: &self.store, index: IndexKind::Id })
    }

    /// Get every value whose key has name part `name`.
    ///
    /// Fails with `KeyNotFound` when no entry has that name.
    pub fn get_values_by_name<Q>(&self, name: &Q) -> CollectionResult<PartValues<'_, I, N, V, S>>
    where
        N: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let bucket = self.by_name.lookup(name)?;
        Ok(PartValues { keys: bucket.iter(), store: &self.store, index: IndexKind::Name })
    }

    /// Check whether any entry has id part `id`
    pub fn contains_id<Q>(&self, id: &Q) -> bool
    where
        I: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.by_id.contains_part(id)
    }

    /// Check whether any entry has name part `name`
    pub fn contains_name<Q>(&self, name: &Q) -> bool
    where
        N: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.by_name.contains_part(name)
    }

    /// Remove all entries from the store and both indexes
    pub fn clear(&mut self) {
        let cleared = self.store.len();
        self.store.clear();
        self.by_id.clear();
        self.by_name.clear();
        debug!(cleared, "Cleared multi-key collection");
    }

    /// Get bucket statistics for both indexes
    pub fn stats(&self) -> CollectionStats {
        CollectionStats {
            entries: self.store.len(),
            by_id: self.by_id.stats(),
            by_name: self.by_name.stats(),
        }
    }

    fn index_key(&mut self, key: CompositeKey<I, N>) {
        let name = key.name().clone();
        self.by_id.add_entry(key.id(), key.clone());
        self.by_name.add_entry(&name, key);
    }
}

impl<I, N, V, S> MultiKeyCollection<I, N, V, S>
where
    I: Hash + Eq + Clone,
    N: Hash + Eq + Clone,
    V: PartialEq,
    S: BuildHasher + Default,
{
    /// Check if `key` is present with exactly `value`
    pub fn contains_entry(&self, key: &CompositeKey<I, N>, value: &V) -> bool {
        self.store.try_get(key) == Some(value)
    }

    /// Remove `key` only if it currently maps to `value`
    pub fn remove_entry(&mut self, key: &CompositeKey<I, N>, value: &V) -> bool {
        self.contains_entry(key, value) && self.remove(key)
    }
}

impl<I, N, V, S> MultiKeyCollection<I, N, V, S> {
    /// Number of entries
    pub fn count(&self) -> usize {
        self.store.len()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Iterate over `(key, value)` pairs in unspecified order
    pub fn iter(&self) -> hash_map::Iter<'_, CompositeKey<I, N>, V> {
        self.store.iter()
    }

    /// Iterate over the composite keys in unspecified order
    pub fn keys(&self) -> hash_map::Keys<'_, CompositeKey<I, N>, V> {
        self.store.keys()
    }

    /// Iterate over the values in unspecified order
    pub fn values(&self) -> hash_map::Values<'_, CompositeKey<I, N>, V> {
        self.store.values()
    }
}

impl<I, N, V, S: Default> Default for MultiKeyCollection<I, N, V, S> {
    fn default() -> Self {
        Self {
            store: PrimaryStore::default(),
            by_id: SecondaryIndex::new(IndexKind::Id),
            by_name: SecondaryIndex::new(IndexKind::Name),
        }
    }
}

/// Values sharing one key part, dereferenced through the primary store
#[derive(Debug, Clone)]
pub struct PartValues<'a, I, N, V, S = RandomState> {
    keys: hash_set::Iter<'a, CompositeKey<I, N>>,
    store: &'a PrimaryStore<I, N, V, S>,
    index: IndexKind,
}

impl<'a, I, N, V, S> Iterator for PartValues<'a, I, N, V, S>
where
    I: Hash + Eq,
    N: Hash + Eq,
    S: BuildHasher,
{
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.keys.next()?;
        Some(self.store.resolve(key, self.index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

impl<I, N, V, S> ExactSizeIterator for PartValues<'_, I, N, V, S>
where
    I: Hash + Eq,
    N: Hash + Eq,
    S: BuildHasher,
{
}

impl<I, N, V, S> FusedIterator for PartValues<'_, I, N, V, S>
where
    I: Hash + Eq,
    N: Hash + Eq,
    S: BuildHasher,
{
}

impl<I, N, V, S> MultiKeyMap<I, N, V> for MultiKeyCollection<I, N, V, S>
where
    I: Hash + Eq + Clone,
    N: Hash + Eq + Clone,
    S: BuildHasher + Default,
{
    type PartValues<'a>
        = PartValues<'a, I, N, V, S>
    where
        Self: 'a,
        V: 'a;

    fn get(&self, key: &CompositeKey<I, N>) -> CollectionResult<&V> {
        MultiKeyCollection::get(self, key)
    }

    fn get_values_by_id(&self, id: &I) -> CollectionResult<Self::PartValues<'_>> {
        MultiKeyCollection::get_values_by_id(self, id)
    }

    fn get_values_by_name(&self, name: &N) -> CollectionResult<Self::PartValues<'_>> {
        MultiKeyCollection::get_values_by_name(self, name)
    }

    fn contains_key(&self, key: &CompositeKey<I, N>) -> bool {
        MultiKeyCollection::contains_key(self, key)
    }

    fn count(&self) -> usize {
        MultiKeyCollection::count(self)
    }
}

impl<I, N, V, S> Index<&CompositeKey<I, N>> for MultiKeyCollection<I, N, V, S>
where
    I: Hash + Eq + Clone,
    N: Hash + Eq + Clone,
    S: BuildHasher + Default,
{
    type Output = V;

    /// Panics if the key is not present, like `HashMap` indexing
    fn index(&self, key: &CompositeKey<I, N>) -> &V {
        self.store.try_get(key).expect("composite key not found in collection")
    }
}

impl<'a, I, N, V, S> IntoIterator for &'a MultiKeyCollection<I, N, V, S> {
    type Item = (&'a CompositeKey<I, N>, &'a V);
    type IntoIter = hash_map::Iter<'a, CompositeKey<I, N>, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<I, N, V, S> IntoIterator for MultiKeyCollection<I, N, V, S> {
    type Item = (CompositeKey<I, N>, V);
    type IntoIter = hash_map::IntoIter<CompositeKey<I, N>, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.store.into_entries()
    }
}

impl<I, N, V, S> TryFrom<Vec<(CompositeKey<I, N>, V)>> for MultiKeyCollection<I, N, V, S>
where
    I: Hash + Eq + Clone,
    N: Hash + Eq + Clone,
    S: BuildHasher + Default,
{
    type Error = CollectionError;

    fn try_from(pairs: Vec<(CompositeKey<I, N>, V)>) -> CollectionResult<Self> {
        Self::try_from_iter(pairs)
    }
}

impl<I, N, V, S, const M: usize> TryFrom<[(CompositeKey<I, N>, V); M]>
    for MultiKeyCollection<I, N, V, S>
where
    I: Hash + Eq + Clone,
    N: Hash + Eq + Clone,
    S: BuildHasher + Default,
{
    type Error = CollectionError;

    fn try_from(pairs: [(CompositeKey<I, N>, V); M]) -> CollectionResult<Self> {
        Self::try_from_iter(pairs)
    }
}
