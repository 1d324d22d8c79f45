//! Index statistics
//!
//! Snapshots of bucket occupancy for the two secondary indexes, plus a
//! collection-wide view that can check the indexes against the primary
//! store.

use crate::secondary_index::IndexKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Statistics about a single secondary index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    pub index: IndexKind,
    pub distinct_parts: usize,
    pub total_key_refs: usize,
    pub largest_bucket: usize,
}

impl IndexStats {
    /// Get average keys per part value (lower means better selectivity)
    pub fn avg_keys_per_part(&self) -> f64 {
        if self.distinct_parts == 0 {
            0.0
        } else {
            self.total_key_refs as f64 / self.distinct_parts as f64
        }
    }
}

/// Statistics for a whole multi-key collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionStats {
    pub entries: usize,
    pub by_id: IndexStats,
    pub by_name: IndexStats,
}

impl CollectionStats {
    /// Every entry is referenced exactly once by each index
    pub fn is_coherent(&self) -> bool {
        self.by_id.total_key_refs == self.entries && self.by_name.total_key_refs == self.entries
    }
}

impl fmt::Display for CollectionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Collection: {} entries", self.entries)?;
        for stats in [&self.by_id, &self.by_name] {
            writeln!(
                f,
                "  {} index: {} parts, {:.2} keys/part, largest bucket {}",
                stats.index,
                stats.distinct_parts,
                stats.avg_keys_per_part(),
                stats.largest_bucket
            )?;
        }
        Ok(())
    }
}
