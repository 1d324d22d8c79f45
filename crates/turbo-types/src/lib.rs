//! Turbo Types
//!
//! This crate defines the key types shared across the Turbo collection
//! workspace. Keeping them separate lets callers build and serialize keys
//! without pulling in the indexing machinery from `turbo-core`.

#![deny(clippy::all)]
#![deny(missing_docs)]

mod types;
pub use types::CompositeKey;
