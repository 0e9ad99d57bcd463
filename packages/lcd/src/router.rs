//! Message router collaborator (§6): `addNextHop`/`removeNextHop` called as
//! opaque operations, out of scope per §1. Trait-only contract, same
//! pattern as [`crate::access::AccessController`].

use async_trait::async_trait;
use lcd_core::RoutingAddress;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddNextHopError;

#[async_trait]
pub trait MessageRouter: Send + Sync {
    /// Installs a route for `participant_id`. Failure here only drops the
    /// single offending entry at the call site (§4.5 "Failure semantics"),
    /// never the whole batch.
    async fn add_next_hop(
        &self,
        participant_id: &str,
        address: &RoutingAddress,
        is_globally_visible: bool,
        sticky: bool,
        max_expiry_ms: i64,
    ) -> Result<(), AddNextHopError>;

    async fn remove_next_hop(&self, participant_id: &str);
}

/// Test/dev router that records every add/remove call so tests can assert
/// add/remove pairing (e.g. that `remove` always follows a prior `add`).
#[derive(Debug, Default)]
pub struct RecordingMessageRouter {
    calls: parking_lot::Mutex<Vec<RouterCall>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterCall {
    Added { participant_id: String, is_globally_visible: bool },
    Removed { participant_id: String },
}

impl RecordingMessageRouter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn calls(&self) -> Vec<RouterCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl MessageRouter for RecordingMessageRouter {
    async fn add_next_hop(
        &self,
        participant_id: &str,
        _address: &RoutingAddress,
        is_globally_visible: bool,
        _sticky: bool,
        _max_expiry_ms: i64,
    ) -> Result<(), AddNextHopError> {
        self.calls.lock().push(RouterCall::Added {
            participant_id: participant_id.to_string(),
            is_globally_visible,
        });
        Ok(())
    }

    async fn remove_next_hop(&self, participant_id: &str) {
        self.calls.lock().push(RouterCall::Removed {
            participant_id: participant_id.to_string(),
        });
    }
}
