//! Core functionality for the Turbo multi-key collection.
//!
//! This crate provides an in-memory associative container keyed by a two-part
//! [`CompositeKey`], with secondary indexes that answer "every value with this
//! id" and "every value with this name" in O(1) average time.

/// Collection sizing configuration
pub mod config;
/// Error types and result aliases
pub mod error;
/// Multi-key collection composing the primary store and both indexes
pub mod collection;
/// Exact-match store from composite key to value
pub mod primary_store;
/// Part-value to bucket indexes
pub mod secondary_index;
/// Bucket occupancy statistics
pub mod stats;

pub use collection::{MultiKeyCollection, MultiKeyMap, PartValues};
pub use config::CollectionConfig;
pub use error::{CollectionError, CollectionResult, ErrorSeverity};
pub use secondary_index::IndexKind;
pub use stats::{CollectionStats, IndexStats};
pub use turbo_types::CompositeKey;
