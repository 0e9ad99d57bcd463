//! Discovery entry value types.
//!
//! Mirrors the joynr capabilities model: a [`DiscoveryEntry`] is what a
//! provider registers; a [`GlobalDiscoveryEntry`] additionally carries the
//! routing address advertised to the remote directory; a
//! [`DiscoveryEntryWithMetaInfo`] is what a lookup returns, tagging whether
//! the match came from the local store or the global cache.

use serde::{Deserialize, Serialize};

use crate::address::RoutingAddress;

/// Name of the reserved `ProviderQos` custom parameter that marks an entry
/// as the cluster controller's own internal provider (never expires).
pub const INTERNAL_PROVIDER_PARAMETER: &str = "___CC.InternalProvider___";

/// Provider version: `(major, minor)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProviderVersion {
    pub major: u32,
    pub minor: u32,
}

/// Whether a provider is advertised only within this cluster controller, or
/// also pushed to the global capabilities directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProviderScope {
    Local,
    Global,
}

/// A single custom QoS parameter, `(name, value)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomParameter {
    pub name: String,
    pub value: String,
}

impl CustomParameter {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Provider-side quality of service: scope, priority, and custom parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderQos {
    pub scope: ProviderScope,
    pub priority: i64,
    pub custom_parameters: Vec<CustomParameter>,
    pub supports_on_change_subscriptions: bool,
}

impl ProviderQos {
    /// Returns `true` if this QoS carries exactly the single reserved
    /// internal-provider marker (§4.5 point 3 of the LCD spec).
    #[must_use]
    pub fn is_internal_provider(&self) -> bool {
        self.custom_parameters.len() == 1
            && self.custom_parameters[0].name == INTERNAL_PROVIDER_PARAMETER
    }
}

impl Default for ProviderQos {
    fn default() -> Self {
        Self {
            scope: ProviderScope::Local,
            priority: 0,
            custom_parameters: Vec::new(),
            supports_on_change_subscriptions: false,
        }
    }
}

/// A registered capability: identity, version, addressing coordinates, QoS,
/// and lifecycle timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryEntry {
    pub participant_id: String,
    pub provider_version: ProviderVersion,
    pub domain: String,
    pub interface_name: String,
    pub qos: ProviderQos,
    pub last_seen_date_ms: i64,
    pub expiry_date_ms: i64,
    pub public_key_id: String,
}

impl DiscoveryEntry {
    /// Identity fields compared by the add-idempotence check (§4.5 point 6):
    /// everything except the two lifecycle timestamps.
    #[must_use]
    pub fn identity_matches(&self, other: &DiscoveryEntry) -> bool {
        self.participant_id == other.participant_id
            && self.provider_version == other.provider_version
            && self.domain == other.domain
            && self.interface_name == other.interface_name
            && self.qos == other.qos
            && self.public_key_id == other.public_key_id
    }
}

/// A [`DiscoveryEntry`] additionally carrying the routing address advertised
/// to the global capabilities directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalDiscoveryEntry {
    #[serde(flatten)]
    pub entry: DiscoveryEntry,
    pub address: RoutingAddress,
}

impl GlobalDiscoveryEntry {
    #[must_use]
    pub fn new(entry: DiscoveryEntry, address: RoutingAddress) -> Self {
        Self { entry, address }
    }

    #[must_use]
    pub fn participant_id(&self) -> &str {
        &self.entry.participant_id
    }
}

/// What a lookup returns: a [`DiscoveryEntry`] tagged with whether the match
/// came from the local store (`is_local = true`) or the global cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryEntryWithMetaInfo {
    #[serde(flatten)]
    pub entry: DiscoveryEntry,
    pub is_local: bool,
}

impl DiscoveryEntryWithMetaInfo {
    #[must_use]
    pub fn local(entry: DiscoveryEntry) -> Self {
        Self {
            entry,
            is_local: true,
        }
    }

    #[must_use]
    pub fn global(entry: DiscoveryEntry) -> Self {
        Self {
            entry,
            is_local: false,
        }
    }

    #[must_use]
    pub fn participant_id(&self) -> &str {
        &self.entry.participant_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DiscoveryEntry {
        DiscoveryEntry {
            participant_id: "p1".to_string(),
            provider_version: ProviderVersion { major: 1, minor: 0 },
            domain: "d".to_string(),
            interface_name: "I".to_string(),
            qos: ProviderQos::default(),
            last_seen_date_ms: 1000,
            expiry_date_ms: 2000,
            public_key_id: String::new(),
        }
    }

    #[test]
    fn identity_matches_ignores_timestamps() {
        let a = sample();
        let mut b = sample();
        b.last_seen_date_ms = 9999;
        b.expiry_date_ms = 8888;
        assert!(a.identity_matches(&b));
    }

    #[test]
    fn identity_matches_rejects_domain_change() {
        let a = sample();
        let mut b = sample();
        b.domain = "other".to_string();
        assert!(!a.identity_matches(&b));
    }

    #[test]
    fn is_internal_provider_requires_exact_single_marker() {
        let mut qos = ProviderQos::default();
        assert!(!qos.is_internal_provider());

        qos.custom_parameters
            .push(CustomParameter::new(INTERNAL_PROVIDER_PARAMETER, "true"));
        assert!(qos.is_internal_provider());

        qos.custom_parameters.push(CustomParameter::new("extra", "x"));
        assert!(!qos.is_internal_provider());
    }

    #[test]
    fn serde_round_trip_discovery_entry_with_meta_info() {
        let meta = DiscoveryEntryWithMetaInfo::local(sample());
        let json = serde_json::to_string(&meta).unwrap();
        let decoded: DiscoveryEntryWithMetaInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(meta, decoded);
    }
}
