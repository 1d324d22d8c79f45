//! Collection sizing configuration
//!
//! A [`CollectionConfig`] pre-sizes the primary store and both secondary
//! indexes. It can be read from TOML and overridden from the environment:
//!
//! ```toml
//! initial_capacity = 4096
//! bucket_capacity = 8
//! ```
//!
//! `TURBO_INITIAL_CAPACITY` and `TURBO_BUCKET_CAPACITY` take precedence over
//! the file.

use crate::error::{CollectionError, CollectionResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Environment override for [`CollectionConfig::initial_capacity`]
pub const INITIAL_CAPACITY_ENV: &str = "TURBO_INITIAL_CAPACITY";
/// Environment override for [`CollectionConfig::bucket_capacity`]
pub const BUCKET_CAPACITY_ENV: &str = "TURBO_BUCKET_CAPACITY";

/// Largest number of entries that may be reserved up front
pub const MAX_INITIAL_CAPACITY: usize = 1 << 26;
/// Largest number of keys that may be reserved per bucket
pub const MAX_BUCKET_CAPACITY: usize = 1 << 16;

/// Up-front sizing for a [`MultiKeyCollection`](crate::MultiKeyCollection)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// Entries to reserve in the primary store and part values in each index
    #[serde(default = "default_initial_capacity")]
    pub initial_capacity: usize,
    /// Keys to reserve in each newly created bucket
    #[serde(default = "default_bucket_capacity")]
    pub bucket_capacity: usize,
}

fn default_initial_capacity() -> usize {
    0
}

fn default_bucket_capacity() -> usize {
    1
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            initial_capacity: default_initial_capacity(),
            bucket_capacity: default_bucket_capacity(),
        }
    }
}

impl CollectionConfig {
    /// Parse a configuration from TOML, filling unset fields with defaults
    pub fn from_toml_str(source: &str) -> CollectionResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        debug!(
            initial_capacity = config.initial_capacity,
            bucket_capacity = config.bucket_capacity,
            "Loaded collection configuration"
        );
        Ok(config)
    }

    /// Apply `TURBO_*` environment variable overrides
    pub fn apply_env_overrides(self) -> CollectionResult<Self> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// Unparseable values are rejected, not ignored.
    pub fn apply_overrides<F>(mut self, lookup: F) -> CollectionResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(INITIAL_CAPACITY_ENV) {
            self.initial_capacity = parse_capacity(INITIAL_CAPACITY_ENV, &raw)?;
            debug!(initial_capacity = self.initial_capacity, "Applied environment override");
        }
        if let Some(raw) = lookup(BUCKET_CAPACITY_ENV) {
            self.bucket_capacity = parse_capacity(BUCKET_CAPACITY_ENV, &raw)?;
            debug!(bucket_capacity = self.bucket_capacity, "Applied environment override");
        }

        self.validate()?;
        Ok(self)
    }

    /// Copy of this configuration with both capacities capped at their
    /// supported maximums
    pub fn clamped(&self) -> Self {
        Self {
            initial_capacity: self.initial_capacity.min(MAX_INITIAL_CAPACITY),
            bucket_capacity: self.bucket_capacity.min(MAX_BUCKET_CAPACITY),
        }
    }

    /// Check the capacities are within the supported range
    pub fn validate(&self) -> CollectionResult<()> {
        if self.initial_capacity > MAX_INITIAL_CAPACITY {
            return Err(CollectionError::invalid_argument(
                "initial_capacity",
                &self.initial_capacity.to_string(),
                format!("must not exceed {MAX_INITIAL_CAPACITY}"),
            ));
        }
        if self.bucket_capacity > MAX_BUCKET_CAPACITY {
            return Err(CollectionError::invalid_argument(
                "bucket_capacity",
                &self.bucket_capacity.to_string(),
                format!("must not exceed {MAX_BUCKET_CAPACITY}"),
            ));
        }
        Ok(())
    }
}

fn parse_capacity(name: &str, raw: &str) -> CollectionResult<usize> {
    raw.trim().parse::<usize>().map_err(|err| {
        CollectionError::invalid_argument(name, raw, format!("expected a capacity: {err}"))
    })
}
