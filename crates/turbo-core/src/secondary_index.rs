//! Secondary indexes over a single key part
//!
//! A [`SecondaryIndex`] maps one part of a composite key (the id or the name)
//! to the bucket of composite keys sharing that part. The collection keeps
//! two of them in step with its primary store.

use crate::error::{CollectionError, CollectionResult, consistency_violation};
use crate::stats::IndexStats;
use ahash::RandomState;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::{BuildHasher, Hash};
use turbo_types::CompositeKey;

/// Which part of the composite key an index is keyed by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexKind {
    /// Keyed by the id part
    Id,
    /// Keyed by the name part
    Name,
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexKind::Id => write!(f, "id"),
            IndexKind::Name => write!(f, "name"),
        }
    }
}

/// Set of composite keys sharing one part value
pub type Bucket<I, N, S = RandomState> = HashSet<CompositeKey<I, N>, S>;

/// Index from one key part `P` to the bucket of composite keys containing it.
///
/// Buckets are created on the first key with a given part value and dropped
/// when their last key is removed, so a bucket exists exactly while some
/// entry carries its part value.
#[derive(Debug, Clone)]
pub struct SecondaryIndex<P, I, N, S = RandomState> {
    buckets: HashMap<P, Bucket<I, N, S>, S>,
    bucket_capacity: usize,
    kind: IndexKind,
}

impl<P, I, N, S: Default> SecondaryIndex<P, I, N, S> {
    /// Create an empty index
    pub fn new(kind: IndexKind) -> Self {
        Self { buckets: HashMap::with_hasher(S::default()), bucket_capacity: 0, kind }
    }

    /// Which key part this index is keyed by
    pub fn kind(&self) -> IndexKind {
        self.kind
    }

    /// Number of distinct part values
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

impl<P, I, N, S> SecondaryIndex<P, I, N, S>
where
    P: Hash + Eq + Clone,
    I: Hash + Eq,
    N: Hash + Eq,
    S: BuildHasher + Default,
{
    /// Create an index pre-sized for `capacity` part values, with new
    /// buckets pre-sized for `bucket_capacity` keys
    pub fn with_capacity(kind: IndexKind, capacity: usize, bucket_capacity: usize) -> Self {
        Self {
            buckets: HashMap::with_capacity_and_hasher(capacity, S::default()),
            bucket_capacity,
            kind,
        }
    }

    /// Add `key` to the bucket for `part`, creating the bucket if needed
    pub fn add_entry(&mut self, part: &P, key: CompositeKey<I, N>) {
        let inserted = match self.buckets.get_mut(part) {
            Some(bucket) => bucket.insert(key),
            None => {
                let mut bucket =
                    HashSet::with_capacity_and_hasher(self.bucket_capacity, S::default());
                bucket.insert(key);
                self.buckets.insert(part.clone(), bucket);
                true
            }
        };

        if !inserted {
            consistency_violation(self.kind, "add_entry", "key already present in bucket");
        }
    }

    /// Remove `key` from the bucket for `part`, dropping the bucket once empty
    pub fn remove_entry(&mut self, part: &P, key: &CompositeKey<I, N>) {
        let Some(bucket) = self.buckets.get_mut(part) else {
            consistency_violation(self.kind, "remove_entry", "no bucket for part");
        };

        if !bucket.remove(key) {
            consistency_violation(self.kind, "remove_entry", "key missing from bucket");
        }

        if bucket.is_empty() {
            self.buckets.remove(part);
        }
    }

    /// Get the bucket for `part`.
    ///
    /// Fails with `KeyNotFound` when no entry currently has that part value.
    /// An emptied bucket is indistinguishable from one never created.
    pub fn lookup<Q>(&self, part: &Q) -> CollectionResult<&Bucket<I, N, S>>
    where
        P: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.buckets
            .get(part)
            .ok_or_else(|| CollectionError::part_not_found(self.kind, "lookup"))
    }

    /// Check whether any entry has the given part value
    pub fn contains_part<Q>(&self, part: &Q) -> bool
    where
        P: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.buckets.contains_key(part)
    }

    /// Iterate over the distinct part values currently indexed
    pub fn parts(&self) -> impl Iterator<Item = &P> {
        self.buckets.keys()
    }

    /// Clear all buckets
    pub fn clear(&mut self) {
        self.buckets.clear();
    }

    /// Get statistics about the buckets
    pub fn stats(&self) -> IndexStats {
        let total_key_refs = self.buckets.values().map(HashSet::len).sum();
        let largest_bucket = self.buckets.values().map(HashSet::len).max().unwrap_or(0);

        IndexStats {
            index: self.kind,
            distinct_parts: self.buckets.len(),
            total_key_refs,
            largest_bucket,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type NameIndex = SecondaryIndex<String, u32, String>;

    fn key(id: u32, name: &str) -> CompositeKey<u32, String> {
        CompositeKey::new(id, name.to_string())
    }

    #[test]
    fn test_buckets_are_created_lazily() {
        let mut index = NameIndex::new(IndexKind::Name);
        assert!(index.is_empty());

        index.add_entry(&"a".to_string(), key(1, "a"));
        index.add_entry(&"a".to_string(), key(2, "a"));
        index.add_entry(&"b".to_string(), key(1, "b"));

        assert_eq!(index.len(), 2);
        let bucket = index.lookup("a").unwrap();
        assert_eq!(bucket.len(), 2);
        assert!(bucket.contains(&key(1, "a")));
        assert!(bucket.contains(&key(2, "a")));
    }

    #[test]
    fn test_lookup_of_unknown_part_fails() {
        let index = NameIndex::new(IndexKind::Name);

        let err = index.lookup("missing").unwrap_err();
        assert!(matches!(err, CollectionError::KeyNotFound { index: Some(IndexKind::Name), .. }));
    }

    #[test]
    fn test_emptied_bucket_is_dropped() {
        let mut index = NameIndex::new(IndexKind::Name);
        let part = "a".to_string();

        index.add_entry(&part, key(1, "a"));
        index.add_entry(&part, key(2, "a"));

        index.remove_entry(&part, &key(1, "a"));
        assert_eq!(index.lookup("a").unwrap().len(), 1);
        assert!(index.contains_part("a"));

        index.remove_entry(&part, &key(2, "a"));
        assert!(!index.contains_part("a"));
        assert!(index.lookup("a").is_err());
        assert!(index.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut index: SecondaryIndex<u32, u32, String> = SecondaryIndex::new(IndexKind::Id);
        index.add_entry(&1, key(1, "a"));
        index.add_entry(&2, key(2, "a"));

        index.clear();
        assert!(index.is_empty());
        assert!(index.lookup(&1).is_err());
    }

    #[test]
    fn test_stats() {
        let mut index: SecondaryIndex<u32, u32, String> =
            SecondaryIndex::with_capacity(IndexKind::Id, 8, 4);

        for id in 0..3 {
            for name in ["x", "y", "z"].iter().take(id as usize + 1) {
                index.add_entry(&id, key(id, name));
            }
        }

        let stats = index.stats();
        assert_eq!(stats.index, IndexKind::Id);
        assert_eq!(stats.distinct_parts, 3);
        assert_eq!(stats.total_key_refs, 6);
        assert_eq!(stats.largest_bucket, 3);
        assert!((stats.avg_keys_per_part() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    #[should_panic(expected = "key already present in bucket")]
    fn test_double_add_is_a_consistency_violation() {
        let mut index: SecondaryIndex<u32, u32, String> = SecondaryIndex::new(IndexKind::Id);
        index.add_entry(&1, key(1, "a"));
        index.add_entry(&1, key(1, "a"));
    }

    #[test]
    #[should_panic(expected = "no bucket for part")]
    fn test_removing_unindexed_key_is_a_consistency_violation() {
        let mut index: SecondaryIndex<u32, u32, String> = SecondaryIndex::new(IndexKind::Id);
        index.remove_entry(&1, &key(1, "a"));
    }
}
