//! In-memory `GcdClient` fake, grounded on `NullDataStore`'s
//! (`storage/datastores/null.rs`) role as a non-test-gated, always-available
//! backend stand-in. Unlike `NullDataStore`, this one does remember what was
//! asked of it: every call is logged so integration tests can assert the
//! exact GBID lists/order invariants (I5), and specific participantIds can
//! be scripted to fail a chosen call with a chosen error.

use std::collections::HashMap;

use async_trait::async_trait;
use lcd_core::GlobalDiscoveryEntry;
use parking_lot::Mutex;

use super::client::{GcdClient, GcdRemoveOutcome};
use crate::error::GcdCallError;

/// One recorded call, in the order it was received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    Add { participant_id: String, gbids: Vec<String> },
    Remove { participant_id: String, gbids: Vec<String> },
    LookupByDomainInterface { domains: Vec<String>, interface_name: String, gbids: Vec<String> },
    LookupByParticipantId { participant_id: String, gbids: Vec<String> },
    Touch { cluster_controller_id: String, participant_ids: Vec<String>, gbid: String },
    RemoveStale { cluster_controller_id: String, max_last_seen_ms: i64, gbid: String },
}

#[derive(Default)]
struct State {
    /// `gbid -> participant_id -> entry`.
    entries_by_gbid: HashMap<String, HashMap<String, GlobalDiscoveryEntry>>,
    calls: Vec<RecordedCall>,
    scripted_add_failures: HashMap<String, GcdCallError>,
    scripted_remove_failures: HashMap<String, (GcdCallError, Vec<String>)>,
    scripted_lookup_failures: HashMap<String, GcdCallError>,
    scripted_remove_stale_failures: HashMap<String, Vec<GcdCallError>>,
}

/// Non-production `GcdClient` that behaves like a real remote directory
/// spread across backends, entirely in memory.
#[derive(Default)]
pub struct InMemoryGcdClient {
    state: Mutex<State>,
}

impl InMemoryGcdClient {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the next `add` for `participant_id` to fail with `err`.
    pub fn fail_add(&self, participant_id: impl Into<String>, err: GcdCallError) {
        self.state.lock().scripted_add_failures.insert(participant_id.into(), err);
    }

    /// Scripts the next `remove` for `participant_id` to fail with `err`,
    /// reporting `resolved_gbids` as the (possibly partial) subset removed.
    pub fn fail_remove(&self, participant_id: impl Into<String>, err: GcdCallError, resolved_gbids: Vec<String>) {
        self.state
            .lock()
            .scripted_remove_failures
            .insert(participant_id.into(), (err, resolved_gbids));
    }

    /// Scripts the next participantId lookup for `participant_id` to fail with `err`.
    pub fn fail_lookup(&self, participant_id: impl Into<String>, err: GcdCallError) {
        self.state.lock().scripted_lookup_failures.insert(participant_id.into(), err);
    }

    /// Scripts the next `remove_stale` call for `gbid` to fail with `err`.
    /// Calling this more than once for the same `gbid` queues additional
    /// scripted failures, each consumed in order (oldest first).
    pub fn fail_remove_stale(&self, gbid: impl Into<String>, err: GcdCallError) {
        self.state
            .lock()
            .scripted_remove_stale_failures
            .entry(gbid.into())
            .or_default()
            .push(err);
    }

    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().calls.clone()
    }

    #[must_use]
    pub fn entries_in_gbid(&self, gbid: &str) -> Vec<GlobalDiscoveryEntry> {
        self.state
            .lock()
            .entries_by_gbid
            .get(gbid)
            .map(|m| m.values().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl GcdClient for InMemoryGcdClient {
    async fn add(&self, entry: GlobalDiscoveryEntry, gbids: &[String]) -> Result<(), GcdCallError> {
        let mut state = self.state.lock();
        let participant_id = entry.participant_id().to_string();
        state.calls.push(RecordedCall::Add {
            participant_id: participant_id.clone(),
            gbids: gbids.to_vec(),
        });

        if let Some(err) = state.scripted_add_failures.remove(&participant_id) {
            return Err(err);
        }

        for gbid in gbids {
            state
                .entries_by_gbid
                .entry(gbid.clone())
                .or_default()
                .insert(participant_id.clone(), entry.clone());
        }
        Ok(())
    }

    async fn remove(
        &self,
        participant_id: &str,
        gbids: &[String],
    ) -> Result<GcdRemoveOutcome, (GcdCallError, Vec<String>)> {
        let mut state = self.state.lock();
        state.calls.push(RecordedCall::Remove {
            participant_id: participant_id.to_string(),
            gbids: gbids.to_vec(),
        });

        if let Some((err, resolved)) = state.scripted_remove_failures.remove(participant_id) {
            return Err((err, resolved));
        }

        let mut resolved_gbids = Vec::new();
        for gbid in gbids {
            if let Some(map) = state.entries_by_gbid.get_mut(gbid) {
                if map.remove(participant_id).is_some() {
                    resolved_gbids.push(gbid.clone());
                }
            }
        }
        Ok(GcdRemoveOutcome { resolved_gbids })
    }

    async fn lookup_by_domain_interface(
        &self,
        domains: &[String],
        interface_name: &str,
        gbids: &[String],
        _ttl_ms: u64,
    ) -> Result<Vec<GlobalDiscoveryEntry>, GcdCallError> {
        let mut state = self.state.lock();
        state.calls.push(RecordedCall::LookupByDomainInterface {
            domains: domains.to_vec(),
            interface_name: interface_name.to_string(),
            gbids: gbids.to_vec(),
        });

        let mut results = Vec::new();
        let mut seen = std::collections::HashSet::new();
        for gbid in gbids {
            if let Some(map) = state.entries_by_gbid.get(gbid) {
                for entry in map.values() {
                    if domains.iter().any(|d| d == &entry.entry.domain)
                        && entry.entry.interface_name == interface_name
                        && seen.insert(entry.participant_id().to_string())
                    {
                        results.push(entry.clone());
                    }
                }
            }
        }
        Ok(results)
    }

    async fn lookup_by_participant_id(
        &self,
        participant_id: &str,
        gbids: &[String],
        _ttl_ms: u64,
    ) -> Result<Option<GlobalDiscoveryEntry>, GcdCallError> {
        let mut state = self.state.lock();
        state.calls.push(RecordedCall::LookupByParticipantId {
            participant_id: participant_id.to_string(),
            gbids: gbids.to_vec(),
        });

        if let Some(err) = state.scripted_lookup_failures.remove(participant_id) {
            return Err(err);
        }

        for gbid in gbids {
            if let Some(entry) = state.entries_by_gbid.get(gbid).and_then(|m| m.get(participant_id)) {
                return Ok(Some(entry.clone()));
            }
        }
        Ok(None)
    }

    async fn touch(
        &self,
        cluster_controller_id: &str,
        participant_ids: &[String],
        gbid: &str,
    ) -> Result<(), GcdCallError> {
        self.state.lock().calls.push(RecordedCall::Touch {
            cluster_controller_id: cluster_controller_id.to_string(),
            participant_ids: participant_ids.to_vec(),
            gbid: gbid.to_string(),
        });
        Ok(())
    }

    async fn remove_stale(
        &self,
        cluster_controller_id: &str,
        max_last_seen_ms: i64,
        gbid: &str,
    ) -> Result<(), GcdCallError> {
        let mut state = self.state.lock();
        state.calls.push(RecordedCall::RemoveStale {
            cluster_controller_id: cluster_controller_id.to_string(),
            max_last_seen_ms,
            gbid: gbid.to_string(),
        });

        if let Some(queue) = state.scripted_remove_stale_failures.get_mut(gbid) {
            if !queue.is_empty() {
                return Err(queue.remove(0));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lcd_core::{DiscoveryError, ProviderQos, ProviderVersion, RoutingAddress};

    fn global_entry(pid: &str, domain: &str) -> GlobalDiscoveryEntry {
        GlobalDiscoveryEntry::new(
            lcd_core::DiscoveryEntry {
                participant_id: pid.to_string(),
                provider_version: ProviderVersion { major: 1, minor: 0 },
                domain: domain.to_string(),
                interface_name: "I".to_string(),
                qos: ProviderQos::default(),
                last_seen_date_ms: 0,
                expiry_date_ms: 10_000,
                public_key_id: String::new(),
            },
            RoutingAddress::Mqtt {
                broker_uri: "tcp://broker:1883".to_string(),
                topic: "t".to_string(),
            },
        )
    }

    #[tokio::test]
    async fn add_then_lookup_round_trips() {
        let client = InMemoryGcdClient::new();
        client.add(global_entry("p1", "d"), &["G1".to_string()]).await.unwrap();

        let found = client.lookup_by_participant_id("p1", &["G1".to_string()], 0).await.unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn remove_returns_exact_resolved_gbids() {
        let client = InMemoryGcdClient::new();
        client
            .add(global_entry("p1", "d"), &["G1".to_string(), "G2".to_string()])
            .await
            .unwrap();

        let outcome = client.remove("p1", &["G1".to_string(), "G2".to_string()]).await.unwrap();
        assert_eq!(outcome.resolved_gbids, vec!["G1".to_string(), "G2".to_string()]);
    }

    #[tokio::test]
    async fn scripted_add_failure_fires_once() {
        let client = InMemoryGcdClient::new();
        client.fail_add("p1", GcdCallError::App(DiscoveryError::InvalidGbid));

        let err = client.add(global_entry("p1", "d"), &["G1".to_string()]).await.unwrap_err();
        assert!(matches!(err, GcdCallError::App(DiscoveryError::InvalidGbid)));

        // Second call is not scripted -- succeeds.
        assert!(client.add(global_entry("p1", "d"), &["G1".to_string()]).await.is_ok());
    }

    #[tokio::test]
    async fn calls_are_recorded_in_order() {
        let client = InMemoryGcdClient::new();
        client.add(global_entry("p1", "d"), &["G1".to_string()]).await.unwrap();
        client.remove("p1", &["G1".to_string()]).await.unwrap();

        let calls = client.calls();
        assert_eq!(calls.len(), 2);
        assert!(matches!(calls[0], RecordedCall::Add { .. }));
        assert!(matches!(calls[1], RecordedCall::Remove { .. }));
    }
}
