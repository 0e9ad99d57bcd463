//! Query-side lookup parameters.
//!
//! Distinct from [`crate::model::ProviderQos`] (what a provider registers
//! with): [`DiscoveryQos`] is what a caller passes to a lookup.

use serde::{Deserialize, Serialize};

/// Sentinel `cache_max_age_ms` meaning "no age filter" -- used by the
/// re-advertise path, which must see every globally-scoped local entry
/// regardless of freshness.
pub const NO_MAX_AGE: i64 = -1;

/// Scope of a lookup: which of the local store / global cache / remote
/// directory are consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscoveryScope {
    LocalOnly,
    LocalThenGlobal,
    LocalAndGlobal,
    GlobalOnly,
}

/// Lookup-side QoS: scope, cache freshness bound, and timeout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryQos {
    pub discovery_scope: DiscoveryScope,
    pub cache_max_age_ms: i64,
    pub discovery_timeout_ms: u64,
    pub provider_must_support_on_change: bool,
}

impl DiscoveryQos {
    #[must_use]
    pub fn with_scope(scope: DiscoveryScope) -> Self {
        Self {
            discovery_scope: scope,
            cache_max_age_ms: NO_MAX_AGE,
            discovery_timeout_ms: 30_000,
            provider_must_support_on_change: false,
        }
    }

    #[must_use]
    pub fn accepts_any_age(&self) -> bool {
        self.cache_max_age_ms == NO_MAX_AGE
    }
}

impl Default for DiscoveryQos {
    fn default() -> Self {
        Self::with_scope(DiscoveryScope::LocalThenGlobal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_any_age_sentinel() {
        let qos = DiscoveryQos::with_scope(DiscoveryScope::GlobalOnly);
        assert!(qos.accepts_any_age());
    }

    #[test]
    fn custom_max_age_is_not_sentinel() {
        let mut qos = DiscoveryQos::with_scope(DiscoveryScope::GlobalOnly);
        qos.cache_max_age_ms = 5_000;
        assert!(!qos.accepts_any_age());
    }
}
