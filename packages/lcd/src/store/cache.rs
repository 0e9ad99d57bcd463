//! Typed caches (§4.1): [`Store`] for the local set of registered entries,
//! [`CachingStore`] for the global cache of remotely-discovered (and
//! self-echoed) entries.
//!
//! Both are built on a shared, insertion-order-preserving generic
//! [`EntryCache`], grounded on the teacher's `StorageEngine`/`RecordStore`
//! split (`storage/engine.rs`, `storage/record_store.rs`): a primary `Vec`
//! holding insertion order plus secondary indexes for O(1) participantId
//! lookup and O(k) domain+interface lookup. Neither type locks internally --
//! both are plain data containers, always accessed through
//! `LcdStore::cache_lock` (§4.2), never on their own.

use std::collections::HashMap;

use lcd_core::{DiscoveryEntry, GlobalDiscoveryEntry, NO_MAX_AGE};

/// Accessors `EntryCache` needs from its element type; implemented for the
/// local `DiscoveryEntry` and the global `GlobalDiscoveryEntry` so both
/// caches share one indexing implementation.
pub trait CacheEntry {
    fn participant_id(&self) -> &str;
    fn domain(&self) -> &str;
    fn interface_name(&self) -> &str;
    fn expiry_date_ms(&self) -> i64;
    fn last_seen_date_ms(&self) -> i64;
}

impl CacheEntry for DiscoveryEntry {
    fn participant_id(&self) -> &str {
        &self.participant_id
    }
    fn domain(&self) -> &str {
        &self.domain
    }
    fn interface_name(&self) -> &str {
        &self.interface_name
    }
    fn expiry_date_ms(&self) -> i64 {
        self.expiry_date_ms
    }
    fn last_seen_date_ms(&self) -> i64 {
        self.last_seen_date_ms
    }
}

impl CacheEntry for GlobalDiscoveryEntry {
    fn participant_id(&self) -> &str {
        &self.entry.participant_id
    }
    fn domain(&self) -> &str {
        &self.entry.domain
    }
    fn interface_name(&self) -> &str {
        &self.entry.interface_name
    }
    fn expiry_date_ms(&self) -> i64 {
        self.entry.expiry_date_ms
    }
    fn last_seen_date_ms(&self) -> i64 {
        self.entry.last_seen_date_ms
    }
}

/// Insertion-ordered entry container with secondary indexes.
#[derive(Debug)]
struct EntryCache<T> {
    entries: Vec<T>,
    by_participant: HashMap<String, usize>,
    by_domain_interface: HashMap<(String, String), Vec<usize>>,
}

impl<T> Default for EntryCache<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            by_participant: HashMap::new(),
            by_domain_interface: HashMap::new(),
        }
    }
}

impl<T: CacheEntry + Clone> EntryCache<T> {
    fn new() -> Self {
        Self::default()
    }

    /// Inserts `entry`, replacing any prior entry with the same
    /// `participant_id` in place (last-writer-wins, §4.1) so the insertion
    /// *position* survives a duplicate re-add.
    fn insert(&mut self, entry: T) -> Option<T> {
        if let Some(&idx) = self.by_participant.get(entry.participant_id()) {
            let old = std::mem::replace(&mut self.entries[idx], entry);
            self.rebuild_indices();
            Some(old)
        } else {
            self.entries.push(entry);
            self.rebuild_indices();
            None
        }
    }

    fn remove_by_participant_id(&mut self, participant_id: &str) -> Option<T> {
        let idx = *self.by_participant.get(participant_id)?;
        let removed = self.entries.remove(idx);
        self.rebuild_indices();
        Some(removed)
    }

    fn lookup_by_participant_id(&self, participant_id: &str) -> Option<T> {
        self.by_participant
            .get(participant_id)
            .map(|&idx| self.entries[idx].clone())
    }

    fn lookup_by_domain_and_interface(&self, domain: &str, interface_name: &str) -> Vec<T> {
        self.by_domain_interface
            .get(&(domain.to_string(), interface_name.to_string()))
            .map(|idxs| idxs.iter().map(|&i| self.entries[i].clone()).collect())
            .unwrap_or_default()
    }

    /// Removes every entry with `expiry_date_ms < now`, returning the removed
    /// entries. Readers never filter by expiry themselves (§4.1) -- only the
    /// sweep does.
    fn remove_expired(&mut self, now: i64) -> Vec<T> {
        let mut kept = Vec::with_capacity(self.entries.len());
        let mut removed = Vec::new();
        for entry in self.entries.drain(..) {
            if entry.expiry_date_ms() < now {
                removed.push(entry);
            } else {
                kept.push(entry);
            }
        }
        self.entries = kept;
        self.rebuild_indices();
        removed
    }

    fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.by_participant.clear();
        self.by_domain_interface.clear();
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn rebuild_indices(&mut self) {
        self.by_participant.clear();
        self.by_domain_interface.clear();
        for (idx, entry) in self.entries.iter().enumerate() {
            self.by_participant.insert(entry.participant_id().to_string(), idx);
            self.by_domain_interface
                .entry((entry.domain().to_string(), entry.interface_name().to_string()))
                .or_default()
                .push(idx);
        }
    }
}

/// Local store of providers registered directly with this cluster controller.
#[derive(Debug, Default)]
pub struct Store {
    cache: EntryCache<DiscoveryEntry>,
}

impl Store {
    #[must_use]
    pub fn new() -> Self {
        Self { cache: EntryCache::new() }
    }

    pub fn insert(&mut self, entry: DiscoveryEntry) -> Option<DiscoveryEntry> {
        self.cache.insert(entry)
    }

    pub fn remove_by_participant_id(&mut self, participant_id: &str) -> Option<DiscoveryEntry> {
        self.cache.remove_by_participant_id(participant_id)
    }

    #[must_use]
    pub fn lookup_by_participant_id(&self, participant_id: &str) -> Option<DiscoveryEntry> {
        self.cache.lookup_by_participant_id(participant_id)
    }

    #[must_use]
    pub fn lookup_by_domain_and_interface(&self, domain: &str, interface_name: &str) -> Vec<DiscoveryEntry> {
        self.cache.lookup_by_domain_and_interface(domain, interface_name)
    }

    pub fn remove_expired(&mut self, now: i64) -> Vec<DiscoveryEntry> {
        self.cache.remove_expired(now)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiscoveryEntry> {
        self.cache.iter()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

/// Global cache of entries discovered from (or self-echoed to) the GCD.
///
/// Adds a `max_age` parameter to lookups: an entry is only returned if
/// `now - entry.last_seen_date_ms <= max_age`. `max_age == lcd_core::NO_MAX_AGE`
/// (`-1`) disables the filter entirely, used by the re-advertise path which
/// must see every entry regardless of freshness.
#[derive(Debug, Default)]
pub struct CachingStore {
    cache: EntryCache<GlobalDiscoveryEntry>,
}

impl CachingStore {
    #[must_use]
    pub fn new() -> Self {
        Self { cache: EntryCache::new() }
    }

    pub fn insert(&mut self, entry: GlobalDiscoveryEntry) -> Option<GlobalDiscoveryEntry> {
        self.cache.insert(entry)
    }

    pub fn remove_by_participant_id(&mut self, participant_id: &str) -> Option<GlobalDiscoveryEntry> {
        self.cache.remove_by_participant_id(participant_id)
    }

    #[must_use]
    pub fn lookup_by_participant_id(
        &self,
        participant_id: &str,
        now: i64,
        max_age_ms: i64,
    ) -> Option<GlobalDiscoveryEntry> {
        self.cache
            .lookup_by_participant_id(participant_id)
            .filter(|entry| Self::within_max_age(entry, now, max_age_ms))
    }

    #[must_use]
    pub fn lookup_by_domain_and_interface(
        &self,
        domain: &str,
        interface_name: &str,
        now: i64,
        max_age_ms: i64,
    ) -> Vec<GlobalDiscoveryEntry> {
        self.cache
            .lookup_by_domain_and_interface(domain, interface_name)
            .into_iter()
            .filter(|entry| Self::within_max_age(entry, now, max_age_ms))
            .collect()
    }

    fn within_max_age(entry: &GlobalDiscoveryEntry, now: i64, max_age_ms: i64) -> bool {
        max_age_ms == NO_MAX_AGE || now - entry.entry.last_seen_date_ms <= max_age_ms
    }

    pub fn remove_expired(&mut self, now: i64) -> Vec<GlobalDiscoveryEntry> {
        self.cache.remove_expired(now)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GlobalDiscoveryEntry> {
        self.cache.iter()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lcd_core::{ProviderQos, ProviderVersion, RoutingAddress};

    fn entry(pid: &str, domain: &str, last_seen: i64, expiry: i64) -> DiscoveryEntry {
        DiscoveryEntry {
            participant_id: pid.to_string(),
            provider_version: ProviderVersion { major: 1, minor: 0 },
            domain: domain.to_string(),
            interface_name: "I".to_string(),
            qos: ProviderQos::default(),
            last_seen_date_ms: last_seen,
            expiry_date_ms: expiry,
            public_key_id: String::new(),
        }
    }

    fn global_entry(pid: &str, domain: &str, last_seen: i64, expiry: i64) -> GlobalDiscoveryEntry {
        GlobalDiscoveryEntry::new(
            entry(pid, domain, last_seen, expiry),
            RoutingAddress::Mqtt {
                broker_uri: "tcp://broker:1883".to_string(),
                topic: "t".to_string(),
            },
        )
    }

    #[test]
    fn store_insert_and_lookup_by_participant() {
        let mut store = Store::new();
        store.insert(entry("p1", "d", 0, 1000));
        assert!(store.lookup_by_participant_id("p1").is_some());
        assert!(store.lookup_by_participant_id("p2").is_none());
    }

    #[test]
    fn store_duplicate_insert_replaces_and_preserves_order() {
        let mut store = Store::new();
        store.insert(entry("p1", "d", 0, 1000));
        store.insert(entry("p2", "d", 0, 1000));
        store.insert(entry("p1", "d2", 5, 2000));

        let ids: Vec<_> = store.iter().map(|e| e.participant_id.clone()).collect();
        assert_eq!(ids, vec!["p1", "p2"]);
        assert_eq!(store.lookup_by_participant_id("p1").unwrap().domain, "d2");
    }

    #[test]
    fn store_lookup_by_domain_and_interface_returns_all_matches_in_order() {
        let mut store = Store::new();
        store.insert(entry("p1", "d", 0, 1000));
        store.insert(entry("p2", "other", 0, 1000));
        store.insert(entry("p3", "d", 0, 1000));

        let matches = store.lookup_by_domain_and_interface("d", "I");
        let ids: Vec<_> = matches.iter().map(|e| e.participant_id.clone()).collect();
        assert_eq!(ids, vec!["p1", "p3"]);
    }

    #[test]
    fn store_remove_expired_filters_strictly_by_expiry() {
        let mut store = Store::new();
        store.insert(entry("p1", "d", 0, 100));
        store.insert(entry("p2", "d", 0, 200));

        let removed = store.remove_expired(150);
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].participant_id, "p1");
        assert!(store.lookup_by_participant_id("p1").is_none());
        assert!(store.lookup_by_participant_id("p2").is_some());
    }

    #[test]
    fn store_remove_by_participant_id() {
        let mut store = Store::new();
        store.insert(entry("p1", "d", 0, 1000));
        let removed = store.remove_by_participant_id("p1");
        assert!(removed.is_some());
        assert!(store.is_empty());
        assert!(store.remove_by_participant_id("p1").is_none());
    }

    #[test]
    fn caching_store_no_max_age_sentinel_disables_filter() {
        let mut cache = CachingStore::new();
        cache.insert(global_entry("p1", "d", 0, 10_000));
        let found = cache.lookup_by_participant_id("p1", 9_000, NO_MAX_AGE);
        assert!(found.is_some());
    }

    #[test]
    fn caching_store_max_age_filters_stale_entries() {
        let mut cache = CachingStore::new();
        cache.insert(global_entry("p1", "d", 1_000, 10_000));
        assert!(cache.lookup_by_participant_id("p1", 1_500, 1_000).is_some());
        assert!(cache.lookup_by_participant_id("p1", 3_000, 1_000).is_none());
    }

    #[test]
    fn caching_store_domain_lookup_applies_max_age_per_entry() {
        let mut cache = CachingStore::new();
        cache.insert(global_entry("p1", "d", 0, 10_000));
        cache.insert(global_entry("p2", "d", 5_000, 10_000));

        let results = cache.lookup_by_domain_and_interface("d", "I", 5_000, 1_000);
        let ids: Vec<_> = results.iter().map(|e| e.entry.participant_id.clone()).collect();
        assert_eq!(ids, vec!["p2"]);
    }
}
