//! Pending-lookups table (§4.3): per-`(domain, interface)` queue of
//! callbacks parked while a `LOCAL_THEN_GLOBAL` lookup has no local match yet
//! and a GCD lookup is in flight.
//!
//! Each registration gets a [`Waiter`]: a shared, atomically-guarded
//! "already fired" flag plus the `oneshot::Sender` half of the caller's
//! result channel. Both race participants -- a later `add` that completes a
//! matching local entry, and the eventual GCD reply -- hold (or can reach)
//! the same `Waiter` and race to fire it via [`Waiter::fire`], which is
//! exactly-once regardless of which side wins (§4.5 "state machine").
//! Acquired strictly before `cache_lock` (§5): `pending_lookups_lock` ->
//! `cache_lock`, never the reverse.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use lcd_core::DiscoveryEntryWithMetaInfo;
use parking_lot::Mutex as SyncMutex;
use tokio::sync::oneshot;

/// Shared exactly-once delivery handle for one parked lookup.
pub struct Waiter {
    sender: SyncMutex<Option<oneshot::Sender<Vec<DiscoveryEntryWithMetaInfo>>>>,
    called: AtomicBool,
}

impl Waiter {
    /// Attempts to deliver `results`. Returns `true` if this call won the
    /// race and actually sent; a losing call is a silent no-op, matching the
    /// `isCallbackCalled`/`callbackCalled` pair from §4.5.
    pub fn fire(&self, results: Vec<DiscoveryEntryWithMetaInfo>) -> bool {
        if self.called.swap(true, Ordering::SeqCst) {
            return false;
        }
        if let Some(tx) = self.sender.lock().take() {
            let _ = tx.send(results);
        }
        true
    }

    #[must_use]
    pub fn already_fired(&self) -> bool {
        self.called.load(Ordering::SeqCst)
    }
}

type Key = (String, String);

/// `HashMap<(domain, interface), Vec<Waiter>>` behind its own lock.
#[derive(Default)]
pub struct PendingLookupsTable {
    table: SyncMutex<HashMap<Key, Vec<Arc<Waiter>>>>,
}

impl PendingLookupsTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parks a new waiter for `(domain, interface)`, returning the caller's
    /// receiver half and a shared handle the GCD-lookup continuation also
    /// uses to race for delivery.
    pub fn register(
        &self,
        domain: impl Into<String>,
        interface: impl Into<String>,
    ) -> (oneshot::Receiver<Vec<DiscoveryEntryWithMetaInfo>>, Arc<Waiter>) {
        let (tx, rx) = oneshot::channel();
        let waiter = Arc::new(Waiter {
            sender: SyncMutex::new(Some(tx)),
            called: AtomicBool::new(false),
        });
        self.table
            .lock()
            .entry((domain.into(), interface.into()))
            .or_default()
            .push(Arc::clone(&waiter));
        (rx, waiter)
    }

    /// Drains every waiter parked for `(domain, interface)` and fires each
    /// with `results`, in the order they were registered. Waiters already
    /// fired by a racing GCD reply are silently skipped by `Waiter::fire`.
    pub fn call_pending_lookups(
        &self,
        domain: &str,
        interface: &str,
        results: &[DiscoveryEntryWithMetaInfo],
    ) {
        let waiters = {
            self.table
                .lock()
                .remove(&(domain.to_string(), interface.to_string()))
                .unwrap_or_default()
        };
        for waiter in waiters {
            waiter.fire(results.to_vec());
        }
    }

    /// Removes a single waiter from the table, e.g. after the GCD-lookup
    /// continuation has fired it and no longer needs it parked. No-op if it
    /// was already drained by a concurrent `call_pending_lookups`.
    pub fn remove_waiter(&self, domain: &str, interface: &str, waiter: &Arc<Waiter>) {
        let key = (domain.to_string(), interface.to_string());
        let mut table = self.table.lock();
        if let Some(list) = table.get_mut(&key) {
            list.retain(|w| !Arc::ptr_eq(w, waiter));
            if list.is_empty() {
                table.remove(&key);
            }
        }
    }

    #[must_use]
    pub fn pending_count(&self, domain: &str, interface: &str) -> usize {
        self.table
            .lock()
            .get(&(domain.to_string(), interface.to_string()))
            .map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(pid: &str) -> DiscoveryEntryWithMetaInfo {
        DiscoveryEntryWithMetaInfo::local(lcd_core::DiscoveryEntry {
            participant_id: pid.to_string(),
            provider_version: lcd_core::ProviderVersion { major: 1, minor: 0 },
            domain: "d".to_string(),
            interface_name: "I".to_string(),
            qos: lcd_core::ProviderQos::default(),
            last_seen_date_ms: 0,
            expiry_date_ms: 1000,
            public_key_id: String::new(),
        })
    }

    #[tokio::test]
    async fn local_add_fires_waiter_exactly_once() {
        let table = PendingLookupsTable::new();
        let (rx, waiter) = table.register("d", "I");
        assert_eq!(table.pending_count("d", "I"), 1);

        table.call_pending_lookups("d", "I", &[meta("p1")]);
        let delivered = rx.await.unwrap();
        assert_eq!(delivered[0].entry.participant_id, "p1");
        assert!(waiter.already_fired());
        assert_eq!(table.pending_count("d", "I"), 0);
    }

    #[tokio::test]
    async fn racing_gcd_reply_loses_to_local_add() {
        let table = PendingLookupsTable::new();
        let (rx, waiter) = table.register("d", "I");

        table.call_pending_lookups("d", "I", &[meta("local-winner")]);
        // The GCD-reply continuation races after the local add already won.
        let gcd_fired = waiter.fire(vec![meta("gcd-loser")]);
        assert!(!gcd_fired);

        let delivered = rx.await.unwrap();
        assert_eq!(delivered[0].entry.participant_id, "local-winner");
    }

    #[tokio::test]
    async fn gcd_reply_wins_when_it_arrives_first() {
        let table = PendingLookupsTable::new();
        let (rx, waiter) = table.register("d", "I");

        let gcd_fired = waiter.fire(vec![meta("gcd-winner")]);
        assert!(gcd_fired);
        table.remove_waiter("d", "I", &waiter);

        // The later local add for the same (domain, interface) is then a no-op
        // for this waiter -- there may be other waiters still parked.
        table.call_pending_lookups("d", "I", &[meta("local-loser")]);

        let delivered = rx.await.unwrap();
        assert_eq!(delivered[0].entry.participant_id, "gcd-winner");
    }

    #[tokio::test]
    async fn multiple_waiters_fire_in_registration_order() {
        let table = PendingLookupsTable::new();
        let (rx1, _w1) = table.register("d", "I");
        let (rx2, _w2) = table.register("d", "I");
        assert_eq!(table.pending_count("d", "I"), 2);

        table.call_pending_lookups("d", "I", &[meta("p1")]);
        assert_eq!(rx1.await.unwrap()[0].entry.participant_id, "p1");
        assert_eq!(rx2.await.unwrap()[0].entry.participant_id, "p1");
    }

    #[tokio::test]
    async fn dropping_unfired_waiter_drops_sender_silently() {
        let table = PendingLookupsTable::new();
        let (rx, waiter) = table.register("d", "I");
        table.remove_waiter("d", "I", &waiter);
        drop(waiter);
        assert!(rx.await.is_err());
    }
}
