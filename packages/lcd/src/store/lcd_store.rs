//! LcdStore (§4.2): the two typed caches plus per-participant bookkeeping,
//! guarded by a single mutex (`cache_lock`). Every composite operation takes
//! the lock for the minimum scope and returns owned data -- never a guard --
//! so callers never hold `cache_lock` across an `.await` point (§5) or while
//! invoking GCD or observer callbacks. `directory.rs` is responsible for
//! acting on the returned data (logging, waking pending lookups,
//! `addNextHop`/`removeNextHop`, persistence) after the lock is released.

use std::collections::HashMap;

use lcd_core::{DiscoveryEntry, GlobalDiscoveryEntry, ProviderScope, RoutingAddress};
use parking_lot::Mutex;

use super::cache::{CachingStore, Store};

struct Inner {
    local: Store,
    global: CachingStore,
    /// `participant_id -> gbids` recorded at registration, in the order they
    /// first appeared across possibly-repeated `add` calls (invariant 4).
    gbids: HashMap<String, Vec<String>>,
    await_global_registration: HashMap<String, bool>,
}

impl Default for Inner {
    fn default() -> Self {
        Self {
            local: Store::new(),
            global: CachingStore::new(),
            gbids: HashMap::new(),
            await_global_registration: HashMap::new(),
        }
    }
}

/// Result of a `remove`: the entries removed from each cache plus the GBID
/// list drained from bookkeeping, exactly as recorded at add time (invariant 5).
#[derive(Debug, Default)]
pub struct RemovedEntry {
    pub local: Option<DiscoveryEntry>,
    pub global: Option<GlobalDiscoveryEntry>,
    pub gbids: Vec<String>,
}

/// Result of an expiry sweep across both caches.
#[derive(Debug, Default)]
pub struct SweepResult {
    pub local: Vec<DiscoveryEntry>,
    pub global: Vec<GlobalDiscoveryEntry>,
}

#[derive(Default)]
pub struct LcdStore {
    inner: Mutex<Inner>,
}

impl LcdStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Places `entry` in the local store; if `scope == GLOBAL`, also
    /// self-echoes it into the global cache with `address = local_address`
    /// (invariant 2). Merges `gbids` into the union already recorded for
    /// this participantId (invariant 4 / §4.5 point 6's re-add case) and
    /// records `await_global_registration`. Returns the prior local entry,
    /// if any, for the caller's idempotence check.
    pub fn insert_local(
        &self,
        entry: DiscoveryEntry,
        gbids: &[String],
        await_global_registration: bool,
        local_address: &RoutingAddress,
    ) -> Option<DiscoveryEntry> {
        let mut inner = self.inner.lock();
        let participant_id = entry.participant_id.clone();
        let is_global = entry.qos.scope == ProviderScope::Global;

        let union = inner.gbids.entry(participant_id.clone()).or_default();
        for gbid in gbids {
            if !union.contains(gbid) {
                union.push(gbid.clone());
            }
        }
        inner
            .await_global_registration
            .insert(participant_id, await_global_registration);

        let previous = inner.local.insert(entry.clone());
        if is_global {
            inner.global.insert(GlobalDiscoveryEntry::new(entry, local_address.clone()));
        }
        previous
    }

    /// Places `entry` in the global cache only (remote-discovered entries).
    pub fn insert_global(&self, entry: GlobalDiscoveryEntry) -> Option<GlobalDiscoveryEntry> {
        self.inner.lock().global.insert(entry)
    }

    /// Drops `participant_id` from both caches and both bookkeeping maps.
    pub fn remove(&self, participant_id: &str) -> RemovedEntry {
        let mut inner = self.inner.lock();
        let local = inner.local.remove_by_participant_id(participant_id);
        let global = inner.global.remove_by_participant_id(participant_id);
        let gbids = inner.gbids.remove(participant_id).unwrap_or_default();
        inner.await_global_registration.remove(participant_id);
        RemovedEntry { local, global, gbids }
    }

    #[must_use]
    pub fn get_gbids_for(&self, participant_id: &str) -> Vec<String> {
        self.inner.lock().gbids.get(participant_id).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn get_await_for(&self, participant_id: &str) -> bool {
        self.inner
            .lock()
            .await_global_registration
            .get(participant_id)
            .copied()
            .unwrap_or(false)
    }

    #[must_use]
    pub fn lookup_local_by_participant_id(&self, participant_id: &str) -> Option<DiscoveryEntry> {
        self.inner.lock().local.lookup_by_participant_id(participant_id)
    }

    #[must_use]
    pub fn lookup_local_by_domain_and_interface(&self, domain: &str, interface_name: &str) -> Vec<DiscoveryEntry> {
        self.inner.lock().local.lookup_by_domain_and_interface(domain, interface_name)
    }

    #[must_use]
    pub fn lookup_global_by_participant_id(
        &self,
        participant_id: &str,
        now: i64,
        max_age_ms: i64,
    ) -> Option<GlobalDiscoveryEntry> {
        self.inner.lock().global.lookup_by_participant_id(participant_id, now, max_age_ms)
    }

    #[must_use]
    pub fn lookup_global_by_domain_and_interface(
        &self,
        domain: &str,
        interface_name: &str,
        now: i64,
        max_age_ms: i64,
    ) -> Vec<GlobalDiscoveryEntry> {
        self.inner
            .lock()
            .global
            .lookup_by_domain_and_interface(domain, interface_name, now, max_age_ms)
    }

    /// Removes expired entries from both caches and prunes bookkeeping for
    /// any participantId no longer present locally (§4.6 expiry sweep).
    pub fn sweep_expired(&self, now: i64) -> SweepResult {
        let mut inner = self.inner.lock();
        let local = inner.local.remove_expired(now);
        let global = inner.global.remove_expired(now);
        for entry in &local {
            inner.gbids.remove(&entry.participant_id);
            inner.await_global_registration.remove(&entry.participant_id);
        }
        SweepResult { local, global }
    }

    #[must_use]
    pub fn all_local_entries(&self) -> Vec<DiscoveryEntry> {
        self.inner.lock().local.iter().cloned().collect()
    }

    /// Every globally-scoped local entry paired with its recorded GBID set,
    /// used by the re-add timer (§4.6) to re-issue `gcd.add` per entry.
    #[must_use]
    pub fn global_scoped_local_entries_with_gbids(&self) -> Vec<(DiscoveryEntry, Vec<String>)> {
        let inner = self.inner.lock();
        inner
            .local
            .iter()
            .filter(|entry| entry.qos.scope == ProviderScope::Global)
            .map(|entry| {
                let gbids = inner.gbids.get(&entry.participant_id).cloned().unwrap_or_default();
                (entry.clone(), gbids)
            })
            .collect()
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.local.clear();
        inner.global.clear();
        inner.gbids.clear();
        inner.await_global_registration.clear();
    }

    #[must_use]
    pub fn local_len(&self) -> usize {
        self.inner.lock().local.len()
    }

    #[must_use]
    pub fn global_len(&self) -> usize {
        self.inner.lock().global.len()
    }
}
