//! Routing address variant.
//!
//! Resolves REDESIGN FLAG "Address polymorphism" (§9 of the LCD spec): the
//! original source switches on a JSON-deserialized address by string
//! probing. Here it is a single tagged enum with one deserialize-dispatch
//! and no substring hacks. The LCD treats the address as opaque beyond
//! parsing -- it is handed to `MessageRouter::add_next_hop` unchanged.

use serde::{Deserialize, Serialize};

/// A serialized routing address, tagged by transport.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RoutingAddress {
    #[serde(rename = "mqtt")]
    Mqtt { broker_uri: String, topic: String },
    #[serde(rename = "channel")]
    Channel {
        channel_id: String,
        message_endpoint_url: String,
    },
    #[serde(rename = "websocket")]
    WebSocket {
        protocol: String,
        host: String,
        port: u16,
        path: String,
    },
}

impl RoutingAddress {
    /// Parses a routing address from its JSON wire representation.
    ///
    /// # Errors
    ///
    /// Returns an error if `raw` is not valid JSON or does not match one of
    /// the known tagged variants -- callers treat this as a per-entry parse
    /// failure (§4.5 `capabilitiesReceived`: log and skip that entry only).
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("RoutingAddress serializes infallibly")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mqtt_round_trips() {
        let addr = RoutingAddress::Mqtt {
            broker_uri: "tcp://broker:1883".to_string(),
            topic: "localTopic".to_string(),
        };
        let json = addr.to_json();
        assert_eq!(RoutingAddress::parse(&json).unwrap(), addr);
    }

    #[test]
    fn websocket_round_trips() {
        let addr = RoutingAddress::WebSocket {
            protocol: "wss".to_string(),
            host: "cc.example.com".to_string(),
            port: 4242,
            path: "/ws".to_string(),
        };
        let json = addr.to_json();
        assert_eq!(RoutingAddress::parse(&json).unwrap(), addr);
    }

    #[test]
    fn unknown_type_tag_fails_to_parse() {
        let raw = r#"{"type":"carrier-pigeon"}"#;
        assert!(RoutingAddress::parse(raw).is_err());
    }

    #[test]
    fn malformed_json_fails_to_parse() {
        assert!(RoutingAddress::parse("not json").is_err());
    }
}
