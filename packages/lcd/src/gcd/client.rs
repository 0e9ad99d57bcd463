//! GCD client adapter (§4.4): an async facade over the remote Global
//! Capabilities Directory proxy. Grounded on the teacher's `ServerStorage`
//! trait (`traits.rs`): an `#[async_trait]` with no bundled production
//! implementation -- the real GCD proxy is an external collaborator, the
//! same way `ServerStorage`'s real Postgres/SQLite backends live outside
//! this pack. [`crate::gcd::testing::InMemoryGcdClient`] is the only
//! concrete implementation shipped here.

use std::collections::HashSet;

use async_trait::async_trait;
use lcd_core::{DiscoveryError, GlobalDiscoveryEntry};

use crate::error::GcdCallError;

/// Outcome of a successful `remove` call: the GBID subset in which the
/// remove actually occurred, used by the caller to shrink its bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GcdRemoveOutcome {
    pub resolved_gbids: Vec<String>,
}

#[async_trait]
pub trait GcdClient: Send + Sync {
    /// Registers `entry` in the listed backends.
    async fn add(&self, entry: GlobalDiscoveryEntry, gbids: &[String]) -> Result<(), GcdCallError>;

    /// Removes `participant_id` from the listed backends. On app-error the
    /// resolved GBID subset is still returned alongside the error (§4.5
    /// point 4: some errors still warrant a local removal).
    async fn remove(
        &self,
        participant_id: &str,
        gbids: &[String],
    ) -> Result<GcdRemoveOutcome, (GcdCallError, Vec<String>)>;

    async fn lookup_by_domain_interface(
        &self,
        domains: &[String],
        interface_name: &str,
        gbids: &[String],
        ttl_ms: u64,
    ) -> Result<Vec<GlobalDiscoveryEntry>, GcdCallError>;

    async fn lookup_by_participant_id(
        &self,
        participant_id: &str,
        gbids: &[String],
        ttl_ms: u64,
    ) -> Result<Option<GlobalDiscoveryEntry>, GcdCallError>;

    /// One call per distinct GBID appearing in the current registration set
    /// (§4.6 freshness timer).
    async fn touch(
        &self,
        cluster_controller_id: &str,
        participant_ids: &[String],
        gbid: &str,
    ) -> Result<(), GcdCallError>;

    async fn remove_stale(
        &self,
        cluster_controller_id: &str,
        max_last_seen_ms: i64,
        gbid: &str,
    ) -> Result<(), GcdCallError>;
}

/// GBID validation (§4.4, performed by the LCD before calling `GcdClient`):
/// empty list means "all known GBIDs"; empty strings and duplicates are
/// `INVALID_GBID`; GBIDs outside `known_gbids` are `UNKNOWN_GBID`.
pub fn validate_gbids(gbids: &[String], known_gbids: &[String]) -> Result<Vec<String>, DiscoveryError> {
    if gbids.is_empty() {
        return Ok(known_gbids.to_vec());
    }

    let mut seen = HashSet::with_capacity(gbids.len());
    for gbid in gbids {
        if gbid.is_empty() {
            return Err(DiscoveryError::InvalidGbid);
        }
        if !seen.insert(gbid.as_str()) {
            return Err(DiscoveryError::InvalidGbid);
        }
        if !known_gbids.iter().any(|known| known == gbid) {
            return Err(DiscoveryError::UnknownGbid);
        }
    }
    Ok(gbids.to_vec())
}
