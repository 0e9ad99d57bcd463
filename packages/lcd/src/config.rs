//! Directory configuration (§6 "Configuration options").

use lcd_core::RoutingAddress;

/// Plain configuration struct, teacher's `ServerConfig`/`NetworkConfig`
/// convention: one flat struct with a `Default` impl rather than scattered
/// env-var lookups.
#[derive(Debug, Clone)]
pub struct LcdConfig {
    /// Gate provider adds behind `AccessController::has_provider_permission`.
    pub enable_access_controller: bool,
    /// Enable JSON persistence load/save.
    pub persistency_enabled: bool,
    /// Path to the persisted local-entries JSON array.
    pub persistence_filename: String,
    /// Freshness ("touch") loop period.
    pub capabilities_freshness_update_interval_ms: u64,
    /// Expiry-sweep loop period.
    pub purge_expired_discovery_entries_interval_ms: u64,
    /// Re-advertise loop period.
    pub re_add_interval_ms: u64,
    /// Entry TTL applied when the caller does not set a longer `expiry_date_ms`.
    pub default_expiry_interval_ms: i64,
    /// Ordered list of all known GBIDs; also the "all backends" default for
    /// an empty `gbids` argument to `add`/`addToAll`.
    pub known_gbids: Vec<String>,
    /// Opaque identifier for this cluster controller, used in touch/removeStale.
    pub cluster_controller_id: String,
    /// Serialized routing address used when advertising own globally-scoped entries.
    pub local_address: RoutingAddress,
}

impl Default for LcdConfig {
    fn default() -> Self {
        Self {
            enable_access_controller: false,
            persistency_enabled: true,
            persistence_filename: "discoveryentries.json".to_string(),
            capabilities_freshness_update_interval_ms: 3_600_000,
            purge_expired_discovery_entries_interval_ms: 60_000,
            re_add_interval_ms: 7 * 24 * 60 * 60 * 1000,
            default_expiry_interval_ms: 6 * 30 * 24 * 60 * 60 * 1000,
            known_gbids: vec!["joynrdefaultgbid".to_string()],
            cluster_controller_id: "clustercontroller".to_string(),
            local_address: RoutingAddress::Mqtt {
                broker_uri: "tcp://localhost:1883".to_string(),
                topic: "localTopic".to_string(),
            },
        }
    }
}
