//! Client-side cache configuration
//!
//! Pages keep each fetched collection in a cache. After a successful
//! mutation the cache is either patched locally or re-fetched, and an
//! optimistic reorder that fails on the server can be rolled back.

use serde::Deserialize;

/// What happens to a cached collection after a successful mutation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Invalidation {
    /// Apply the mutation to the local copy (no extra request)
    #[default]
    Patch,
    /// Re-fetch the affected collection from the server
    Refetch,
}

impl Invalidation {
    /// Name as written in the config file
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Patch => "patch",
            Self::Refetch => "refetch",
        }
    }
}

/// Cache behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    pub invalidation: Invalidation,
    /// Restore the previous feature order when persisting a reorder fails
    pub rollback_on_failure: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            invalidation: Invalidation::Patch,
            rollback_on_failure: true,
        }
    }
}

/// Cache settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileCacheConfig {
    pub invalidation: Option<Invalidation>,
    pub rollback_on_failure: Option<bool>,
}

impl CacheConfig {
    /// Create from file config with defaults
    pub fn from_file(file: Option<FileCacheConfig>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            invalidation: file.invalidation.unwrap_or(defaults.invalidation),
            rollback_on_failure: file
                .rollback_on_failure
                .unwrap_or(defaults.rollback_on_failure),
        }
    }
}
