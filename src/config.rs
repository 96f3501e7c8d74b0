//! Engine configuration and store capability resolution.

use anyhow::Context;
use figment::{Figment, providers::Env};
use serde::Deserialize;

fn default_result_limit() -> usize {
    100
}

fn default_max_result_limit() -> usize {
    500
}

/// Tunables for the ranked-search path.
///
/// Loaded once at startup and passed by reference into every search; the
/// engine holds no global configuration state.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Result count when the caller supplies no limit.
    #[serde(default = "default_result_limit")]
    pub default_limit: usize,
    /// Largest limit a caller may request; anything above is rejected as
    /// invalid criteria.
    #[serde(default = "default_max_result_limit")]
    pub max_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_limit: default_result_limit(),
            max_limit: default_max_result_limit(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from `STUDYMATCH_`-prefixed environment variables,
    /// falling back to the defaults for anything unset.
    pub fn from_env() -> anyhow::Result<Self> {
        Figment::new()
            .merge(Env::prefixed("STUDYMATCH_"))
            .extract()
            .context("Failed to load engine config")
    }
}

/// Newest store schema version this engine knows about.
pub const LATEST_SCHEMA_VERSION: u32 = 5;

/// What the backing store can serve, resolved once from its migration
/// version and injected into the collaborators that assemble snapshots.
///
/// Older deployments simply lack some columns; encoding that as an explicit
/// versioned object keeps the engine free of any runtime probing of storage
/// shape. The engine itself never reads this: a store that cannot serve
/// course topics hands over profiles without them, and the corresponding
/// signal contributes nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreCapabilities {
    pub schema_version: u32,
    /// Course topics landed in schema v3.
    pub has_course_topics: bool,
    /// Per-user study hour tracking landed in schema v5.
    pub has_study_hours: bool,
}

impl StoreCapabilities {
    /// Resolve capabilities for a store at the given migration version.
    pub fn for_schema_version(version: u32) -> Self {
        Self {
            schema_version: version,
            has_course_topics: version >= 3,
            has_study_hours: version >= 5,
        }
    }
}

impl Default for StoreCapabilities {
    fn default() -> Self {
        Self::for_schema_version(LATEST_SCHEMA_VERSION)
    }
}
