//! Command-line surface for the `lcd` binary, matching the pack's
//! `hdds-discovery-server` use of `clap` over ad hoc env parsing: every
//! §6 "Configuration option" is a typed flag/env var with a sane default.

use clap::Parser;
use lcd_core::RoutingAddress;

use crate::config::LcdConfig;

#[derive(Debug, Parser)]
#[command(name = "lcd", about = "Local Capabilities Directory")]
pub struct Cli {
    /// Host/port to bind the RPC/health surface to.
    #[arg(long, env = "LCD_BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind_addr: String,

    /// Gate provider adds behind the access controller.
    #[arg(long, env = "LCD_ENABLE_ACCESS_CONTROLLER", default_value_t = false)]
    pub enable_access_controller: bool,

    /// Enable JSON persistence load/save.
    #[arg(long, env = "LCD_PERSISTENCY_ENABLED", default_value_t = true)]
    pub persistency_enabled: bool,

    /// Path to the persisted local-entries JSON array.
    #[arg(long, env = "LCD_PERSISTENCE_FILENAME", default_value = "discoveryentries.json")]
    pub persistence_filename: String,

    /// Freshness ("touch") loop period, milliseconds.
    #[arg(long, env = "LCD_FRESHNESS_UPDATE_INTERVAL_MS", default_value_t = 3_600_000)]
    pub capabilities_freshness_update_interval_ms: u64,

    /// Expiry-sweep loop period, milliseconds.
    #[arg(long, env = "LCD_PURGE_EXPIRED_INTERVAL_MS", default_value_t = 60_000)]
    pub purge_expired_discovery_entries_interval_ms: u64,

    /// Re-advertise loop period, milliseconds.
    #[arg(long, env = "LCD_RE_ADD_INTERVAL_MS", default_value_t = 7 * 24 * 60 * 60 * 1000)]
    pub re_add_interval_ms: u64,

    /// Entry TTL applied when the caller does not set a longer `expiry_date_ms`.
    #[arg(long, env = "LCD_DEFAULT_EXPIRY_INTERVAL_MS", default_value_t = 6 * 30 * 24 * 60 * 60 * 1000)]
    pub default_expiry_interval_ms: i64,

    /// Comma-separated ordered list of all known GBIDs.
    #[arg(long, env = "LCD_KNOWN_GBIDS", default_value = "joynrdefaultgbid", value_delimiter = ',')]
    pub known_gbids: Vec<String>,

    /// Opaque identifier for this cluster controller.
    #[arg(long, env = "LCD_CLUSTER_CONTROLLER_ID", default_value = "clustercontroller")]
    pub cluster_controller_id: String,

    /// MQTT broker URI used to build this node's own routing address.
    #[arg(long, env = "LCD_LOCAL_BROKER_URI", default_value = "tcp://localhost:1883")]
    pub local_broker_uri: String,

    /// MQTT topic used to build this node's own routing address.
    #[arg(long, env = "LCD_LOCAL_TOPIC", default_value = "localTopic")]
    pub local_topic: String,
}

impl Cli {
    #[must_use]
    pub fn to_config(&self) -> LcdConfig {
        LcdConfig {
            enable_access_controller: self.enable_access_controller,
            persistency_enabled: self.persistency_enabled,
            persistence_filename: self.persistence_filename.clone(),
            capabilities_freshness_update_interval_ms: self.capabilities_freshness_update_interval_ms,
            purge_expired_discovery_entries_interval_ms: self.purge_expired_discovery_entries_interval_ms,
            re_add_interval_ms: self.re_add_interval_ms,
            default_expiry_interval_ms: self.default_expiry_interval_ms,
            known_gbids: self.known_gbids.clone(),
            cluster_controller_id: self.cluster_controller_id.clone(),
            local_address: RoutingAddress::Mqtt {
                broker_uri: self.local_broker_uri.clone(),
                topic: self.local_topic.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_parse_into_a_sane_config() {
        let cli = Cli::parse_from(["lcd"]);
        let config = cli.to_config();
        assert_eq!(config.known_gbids, vec!["joynrdefaultgbid".to_string()]);
        assert!(config.persistency_enabled);
    }

    #[test]
    fn comma_separated_gbids_split_correctly() {
        let cli = Cli::parse_from(["lcd", "--known-gbids", "G1,G2,G3"]);
        assert_eq!(cli.known_gbids, vec!["G1".to_string(), "G2".to_string(), "G3".to_string()]);
    }
}
