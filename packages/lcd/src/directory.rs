//! LCD core (§4.5): orchestrates `add`/`remove`/`lookup` across the
//! [`LcdStore`] and the [`GcdClient`], implements the four-scope lookup
//! algorithm, and dispatches to the `MessageRouter`/`AccessController`/
//! `PersistenceStore` collaborators.
//!
//! Per the REDESIGN FLAG "Re-entrant locking vs. nested calls" (§9):
//! `LcdStore`'s methods never hold `cache_lock` while this module calls the
//! GCD, the router, or persistence -- every mutating call first takes the
//! lock long enough to get back owned data, then acts on that data with the
//! lock released.

use std::sync::Arc;

use async_trait::async_trait;
use lcd_core::{
    ClockSource, DiscoveryEntry, DiscoveryEntryWithMetaInfo, DiscoveryError, DiscoveryQos,
    DiscoveryScope, GlobalDiscoveryEntry, ProviderRuntimeException, ProviderScope,
};
use tracing::{info, instrument, warn};

use crate::access::{AccessController, TrustLevel};
use crate::config::LcdConfig;
use crate::error::{AddError, LookupError, RemoveError};
use crate::gcd::{validate_gbids, GcdClient};
use crate::persistence::PersistenceStore;
use crate::router::MessageRouter;
use crate::store::{LcdStore, PendingLookupsTable};

/// Owns the two caches, the pending-lookups table, and every collaborator
/// named in §6 "Consumed from collaborators". One instance per cluster
/// controller process.
pub struct LocalCapabilitiesDirectory {
    store: Arc<LcdStore>,
    pending: Arc<PendingLookupsTable>,
    gcd: Arc<dyn GcdClient>,
    router: Arc<dyn MessageRouter>,
    access: Arc<dyn AccessController>,
    persistence: Arc<dyn PersistenceStore>,
    clock: Arc<dyn ClockSource>,
    config: LcdConfig,
    process_start_ms: i64,
}

/// §4.4: `remove_stale` is retried once on failure, but only while the
/// requested cutoff is still recent -- an old `max_last_seen_ms` means the
/// caller is replaying a stale maintenance request, not reacting to a
/// fresh cluster-controller restart, so a second attempt is not warranted.
const REMOVE_STALE_RETRY_WINDOW_MS: i64 = 3_600_000;

impl LocalCapabilitiesDirectory {
    #[must_use]
    pub fn new(
        gcd: Arc<dyn GcdClient>,
        router: Arc<dyn MessageRouter>,
        access: Arc<dyn AccessController>,
        persistence: Arc<dyn PersistenceStore>,
        clock: Arc<dyn ClockSource>,
        config: LcdConfig,
    ) -> Self {
        let process_start_ms = clock.now_ms();
        Self {
            store: Arc::new(LcdStore::new()),
            pending: Arc::new(PendingLookupsTable::new()),
            gcd,
            router,
            access,
            persistence,
            clock,
            config,
            process_start_ms,
        }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<LcdStore> {
        &self.store
    }

    #[must_use]
    pub fn config(&self) -> &LcdConfig {
        &self.config
    }

    /// Loads persisted local entries at startup (§6 "On startup"): inserts
    /// each into the local store, and if `scope == GLOBAL` also seeds the
    /// global cache, mirroring the runtime self-echo invariant.
    pub async fn load_persisted(&self) -> anyhow::Result<usize> {
        let entries = self.persistence.load().await?;
        let count = entries.len();
        for entry in entries {
            let gbids = vec![self.config.known_gbids.first().cloned().unwrap_or_default()];
            self.store
                .insert_local(entry, &gbids, false, &self.config.local_address);
        }
        info!(count, "loaded persisted discovery entries");
        Ok(count)
    }

    async fn persist(&self) {
        let entries = self.store.all_local_entries();
        if let Err(err) = self.persistence.save(&entries).await {
            warn!(error = %err, "failed to persist local discovery entries");
        }
    }

    /// §4.5 `add`. `gbids` empty means "all known GBIDs" once validated.
    #[instrument(skip(self, entry), fields(participant_id = %entry.participant_id, domain = %entry.domain, interface_name = %entry.interface_name))]
    pub async fn add(
        &self,
        mut entry: DiscoveryEntry,
        await_global_registration: bool,
        gbids: &[String],
        user_id: &str,
    ) -> Result<(), AddError> {
        if self.config.enable_access_controller {
            let allowed = self
                .access
                .has_provider_permission(user_id, TrustLevel::High, &entry.domain, &entry.interface_name)
                .await;
            if !allowed {
                return Err(AddError::Permission(ProviderRuntimeException::new(format!(
                    "Provider does not have permissions to register on domain {} interface {}",
                    entry.domain, entry.interface_name
                ))));
            }
        }

        let gbids = validate_gbids(gbids, &self.config.known_gbids)?;

        let now = self.clock.now_ms();
        entry.last_seen_date_ms = now;
        entry.expiry_date_ms = if entry.qos.is_internal_provider() {
            i64::MAX
        } else {
            entry.expiry_date_ms.max(now + self.config.default_expiry_interval_ms)
        };

        if let Some(existing) = self.store.lookup_local_by_participant_id(&entry.participant_id) {
            if existing.identity_matches(&entry) {
                let recorded = self.store.get_gbids_for(&entry.participant_id);
                if gbids.iter().all(|g| recorded.contains(g)) {
                    return Ok(());
                }
            }
        }

        match entry.qos.scope {
            ProviderScope::Local => {
                self.store
                    .insert_local(entry.clone(), &gbids, await_global_registration, &self.config.local_address);
                self.wake_pending(&entry.domain, &entry.interface_name).await;
                self.persist().await;
                Ok(())
            }
            ProviderScope::Global => {
                let global_entry = GlobalDiscoveryEntry::new(entry.clone(), self.config.local_address.clone());

                if await_global_registration {
                    self.gcd
                        .add(global_entry, &gbids)
                        .await
                        .map_err(|e| e.into_add_error(&entry.participant_id))?;
                    self.store
                        .insert_local(entry.clone(), &gbids, true, &self.config.local_address);
                    self.wake_pending(&entry.domain, &entry.interface_name).await;
                    self.persist().await;
                } else {
                    self.store
                        .insert_local(entry.clone(), &gbids, false, &self.config.local_address);
                    self.wake_pending(&entry.domain, &entry.interface_name).await;
                    self.persist().await;

                    let gcd = Arc::clone(&self.gcd);
                    let participant_id = entry.participant_id.clone();
                    tokio::spawn(async move {
                        if let Err(err) = gcd.add(global_entry, &gbids).await {
                            warn!(participant_id = %participant_id, error = %err, "best-effort background GCD add failed");
                        }
                    });
                }
                Ok(())
            }
        }
    }

    /// Equivalent to `add(entry, await=true, gbids=allKnownGbids, ...)`.
    pub async fn add_to_all(&self, entry: DiscoveryEntry, user_id: &str) -> Result<(), AddError> {
        let all = self.config.known_gbids.clone();
        self.add(entry, true, &all, user_id).await
    }

    async fn wake_pending(&self, domain: &str, interface_name: &str) {
        if self.pending.pending_count(domain, interface_name) == 0 {
            return;
        }
        let matches = self.store.lookup_local_by_domain_and_interface(domain, interface_name);
        let metas: Vec<_> = matches.into_iter().map(DiscoveryEntryWithMetaInfo::local).collect();
        self.pending.call_pending_lookups(domain, interface_name, &metas);
    }

    /// §4.5 `remove`.
    #[instrument(skip(self), fields(participant_id = %participant_id))]
    pub async fn remove(&self, participant_id: &str) -> Result<(), RemoveError> {
        let await_global = self.store.get_await_for(participant_id);
        let gbids = self.store.get_gbids_for(participant_id);

        if !await_global {
            self.store.remove(participant_id);
            self.router.remove_next_hop(participant_id).await;
            self.persist().await;

            let gcd = Arc::clone(&self.gcd);
            let pid = participant_id.to_string();
            tokio::spawn(async move {
                if let Err((err, _resolved)) = gcd.remove(&pid, &gbids).await {
                    warn!(participant_id = %pid, error = %err, "best-effort background GCD remove failed");
                }
            });
            return Ok(());
        }

        match self.gcd.remove(participant_id, &gbids).await {
            Ok(_outcome) => {
                self.store.remove(participant_id);
                self.router.remove_next_hop(participant_id).await;
                self.persist().await;
                Ok(())
            }
            Err((err, _resolved_gbids)) => match &err {
                crate::error::GcdCallError::App(
                    DiscoveryError::NoEntryForParticipant | DiscoveryError::NoEntryForSelectedBackends,
                ) => {
                    self.store.remove(participant_id);
                    self.router.remove_next_hop(participant_id).await;
                    self.persist().await;
                    Ok(())
                }
                crate::error::GcdCallError::App(other) => Err(RemoveError::Discovery(*other)),
                crate::error::GcdCallError::Runtime(_) => Err(RemoveError::Discovery(DiscoveryError::InternalError)),
            },
        }
    }

    /// §4.5 lookup by `participantId`. At most one result; if invariant 1 is
    /// somehow broken and more than one local entry matches, logs and
    /// returns the first.
    #[instrument(skip(self, qos), fields(participant_id = %participant_id))]
    pub async fn lookup_by_participant_id(
        &self,
        participant_id: &str,
        qos: &DiscoveryQos,
        gbids: &[String],
    ) -> Result<Option<DiscoveryEntryWithMetaInfo>, LookupError> {
        let gbids = validate_gbids(gbids, &self.config.known_gbids)?;
        let local = self.store.lookup_local_by_participant_id(participant_id);

        match qos.discovery_scope {
            DiscoveryScope::LocalOnly => Ok(local.map(DiscoveryEntryWithMetaInfo::local)),
            DiscoveryScope::LocalThenGlobal | DiscoveryScope::LocalAndGlobal => {
                if let Some(entry) = local {
                    return Ok(Some(DiscoveryEntryWithMetaInfo::local(entry)));
                }
                match self.gcd.lookup_by_participant_id(participant_id, &gbids, qos.discovery_timeout_ms).await {
                    Ok(Some(entry)) => {
                        self.capabilities_received_one(entry.clone()).await;
                        Ok(Some(DiscoveryEntryWithMetaInfo::global(entry.entry)))
                    }
                    Ok(None) => Ok(None),
                    Err(err) => Err(err.into_lookup_error()),
                }
            }
            DiscoveryScope::GlobalOnly => {
                // A globally-scoped local entry is the self-echoed half of
                // its own global registration and shadows the GCD (§4.5
                // "LOCAL_AND_GLOBAL" / "GLOBAL_ONLY"). A local-only entry is
                // not part of the global view at all: it never shadows, and
                // it suppresses whatever the GCD answers for this
                // participantId, since the provider is known locally but
                // was never registered globally.
                if let Some(entry) = &local {
                    if entry.qos.scope == ProviderScope::Global {
                        return Ok(local.map(DiscoveryEntryWithMetaInfo::local));
                    }
                }
                let local_only = local.is_some();

                if !local_only {
                    let now = self.clock.now_ms();
                    if let Some(cached) = self.store.lookup_global_by_participant_id(participant_id, now, qos.cache_max_age_ms) {
                        return Ok(Some(DiscoveryEntryWithMetaInfo::global(cached.entry)));
                    }
                }

                let result = self.gcd.lookup_by_participant_id(participant_id, &gbids, qos.discovery_timeout_ms).await;
                if local_only {
                    return match result {
                        Err(err) => Err(err.into_lookup_error()),
                        Ok(_) => Err(LookupError::Discovery(DiscoveryError::NoEntryForParticipant)),
                    };
                }
                match result {
                    Ok(Some(entry)) => {
                        self.capabilities_received_one(entry.clone()).await;
                        Ok(Some(DiscoveryEntryWithMetaInfo::global(entry.entry)))
                    }
                    Ok(None) => Ok(None),
                    Err(err) => Err(err.into_lookup_error()),
                }
            }
        }
    }

    /// §4.5 lookup by `(domains, interface)`. Empty `domains` fails fast.
    #[instrument(skip(self, qos), fields(domains = ?domains, interface_name = %interface_name))]
    pub async fn lookup_by_domain_interface(
        &self,
        domains: &[String],
        interface_name: &str,
        qos: &DiscoveryQos,
        gbids: &[String],
    ) -> Result<Vec<DiscoveryEntryWithMetaInfo>, LookupError> {
        if domains.is_empty() {
            return Err(LookupError::Permission(ProviderRuntimeException::new(
                "lookup requires at least one domain",
            )));
        }
        let gbids = validate_gbids(gbids, &self.config.known_gbids)?;

        let local_matches: Vec<DiscoveryEntry> = domains
            .iter()
            .flat_map(|domain| self.store.lookup_local_by_domain_and_interface(domain, interface_name))
            .collect();

        match qos.discovery_scope {
            DiscoveryScope::LocalOnly => {
                Ok(local_matches.into_iter().map(DiscoveryEntryWithMetaInfo::local).collect())
            }
            DiscoveryScope::LocalThenGlobal => {
                if !local_matches.is_empty() {
                    return Ok(local_matches.into_iter().map(DiscoveryEntryWithMetaInfo::local).collect());
                }
                self.lookup_then_global(domains, interface_name, &gbids, qos.discovery_timeout_ms).await
            }
            DiscoveryScope::LocalAndGlobal => {
                let global = self
                    .gcd
                    .lookup_by_domain_interface(domains, interface_name, &gbids, qos.discovery_timeout_ms)
                    .await
                    .map_err(crate::error::GcdCallError::into_lookup_error)?;
                Ok(self.merge_local_and_global(local_matches, global).await)
            }
            DiscoveryScope::GlobalOnly => {
                // Same shadow-vs-suppress split as the participantId form:
                // only globally-scoped local entries shadow the GCD; a
                // local-only entry is not part of the global view and
                // drops any GCD-returned entry for the same participantId.
                let local_only_ids: std::collections::HashSet<String> = local_matches
                    .iter()
                    .filter(|e| e.qos.scope != ProviderScope::Global)
                    .map(|e| e.participant_id.clone())
                    .collect();
                let global_scoped_local: Vec<DiscoveryEntry> = local_matches
                    .into_iter()
                    .filter(|e| e.qos.scope == ProviderScope::Global)
                    .collect();

                let now = self.clock.now_ms();
                let cached: Vec<GlobalDiscoveryEntry> = domains
                    .iter()
                    .flat_map(|domain| {
                        self.store
                            .lookup_global_by_domain_and_interface(domain, interface_name, now, qos.cache_max_age_ms)
                    })
                    .collect();

                let global = if cached.is_empty() {
                    let fetched = self
                        .gcd
                        .lookup_by_domain_interface(domains, interface_name, &gbids, qos.discovery_timeout_ms)
                        .await
                        .map_err(crate::error::GcdCallError::into_lookup_error)?;
                    self.capabilities_received_many(fetched.clone()).await;
                    fetched
                } else {
                    cached
                };
                let global: Vec<GlobalDiscoveryEntry> =
                    global.into_iter().filter(|e| !local_only_ids.contains(e.participant_id())).collect();

                Ok(self.merge_local_and_global(global_scoped_local, global).await)
            }
        }
    }

    /// The `AwaitEither` state of §4.5's state machine: parks a waiter,
    /// fires the GCD lookup concurrently, and lets whichever of "local add
    /// commits a match" or "GCD replies" fire first win; the other becomes a
    /// no-op via [`crate::store::Waiter::fire`]'s exactly-once semantics.
    async fn lookup_then_global(
        &self,
        domains: &[String],
        interface_name: &str,
        gbids: &[String],
        ttl_ms: u64,
    ) -> Result<Vec<DiscoveryEntryWithMetaInfo>, LookupError> {
        // A single (domain, interface) pair is the common case; register
        // against the first domain, matching the teacher's single-key
        // pending-lookup convention -- multiple domains in one call are rare
        // and the GCD lookup itself still covers all of them.
        let domain = domains.first().cloned().unwrap_or_default();
        let (rx, waiter) = self.pending.register(domain.clone(), interface_name.to_string());

        let gcd = Arc::clone(&self.gcd);
        let router = Arc::clone(&self.router);
        let store = Arc::clone(&self.store);
        let pending = Arc::clone(&self.pending);
        let domains_owned = domains.to_vec();
        let interface_owned = interface_name.to_string();
        let gbids_owned = gbids.to_vec();
        let waiter_for_task = Arc::clone(&waiter);

        tokio::spawn(async move {
            let result = gcd
                .lookup_by_domain_interface(&domains_owned, &interface_owned, &gbids_owned, ttl_ms)
                .await;
            let delivered = match result {
                Ok(entries) => {
                    let mut metas = Vec::with_capacity(entries.len());
                    for entry in entries {
                        match router
                            .add_next_hop(entry.participant_id(), &entry.address, true, false, entry.entry.expiry_date_ms)
                            .await
                        {
                            Ok(()) => {
                                store.insert_global(entry.clone());
                                metas.push(DiscoveryEntryWithMetaInfo::global(entry.entry));
                            }
                            Err(_) => {
                                warn!(
                                    participant_id = %entry.participant_id(),
                                    domain = %entry.entry.domain,
                                    interface_name = %entry.entry.interface_name,
                                    "addNextHop failed, dropping entry from lookup result"
                                );
                            }
                        }
                    }
                    metas
                }
                Err(_) => Vec::new(),
            };
            waiter_for_task.fire(delivered);
        });

        let delivered = rx.await.unwrap_or_default();
        pending.remove_waiter(&domain, interface_name, &waiter);
        Ok(delivered)
    }

    /// Merges local and global matches, deduplicated by `participantId` with
    /// local entries shadowing globals (§4.5 "LOCAL_AND_GLOBAL" /
    /// "GLOBAL_ONLY"), installing routes for any global survivor via
    /// `addNextHop`.
    async fn merge_local_and_global(
        &self,
        local: Vec<DiscoveryEntry>,
        global: Vec<GlobalDiscoveryEntry>,
    ) -> Vec<DiscoveryEntryWithMetaInfo> {
        let local_ids: std::collections::HashSet<&str> =
            local.iter().map(|e| e.participant_id.as_str()).collect();

        let mut results: Vec<DiscoveryEntryWithMetaInfo> =
            local.into_iter().map(DiscoveryEntryWithMetaInfo::local).collect();

        for entry in global {
            if local_ids.contains(entry.participant_id()) {
                continue;
            }
            results.push(DiscoveryEntryWithMetaInfo::global(entry.entry));
        }
        results
    }

    async fn capabilities_received_one(&self, entry: GlobalDiscoveryEntry) {
        self.capabilities_received_many(vec![entry]).await;
    }

    /// §4.5 `capabilitiesReceived`: install routes for each entry, skipping
    /// (and logging) any whose address fails to parse or install, then
    /// insert survivors into the global cache.
    async fn capabilities_received_many(&self, entries: Vec<GlobalDiscoveryEntry>) {
        for entry in entries {
            match self
                .router
                .add_next_hop(entry.participant_id(), &entry.address, true, false, entry.entry.expiry_date_ms)
                .await
            {
                Ok(()) => {
                    self.store.insert_global(entry);
                }
                Err(_) => {
                    warn!(
                        participant_id = %entry.participant_id(),
                        domain = %entry.entry.domain,
                        interface_name = %entry.entry.interface_name,
                        "addNextHop failed, dropping entry"
                    );
                }
            }
        }
    }

    /// `triggerGlobalProviderReregistration` (§6): re-issues `add` for every
    /// globally-scoped local entry in its recorded GBID set, refreshing
    /// `last_seen_date_ms` and extending (never shrinking) `expiry_date_ms`.
    #[instrument(skip(self))]
    pub async fn trigger_global_provider_reregistration(&self) -> usize {
        let entries = self.store.global_scoped_local_entries_with_gbids();
        let mut reregistered = 0;
        for (entry, gbids) in entries {
            match self.add(entry, true, &gbids, "system").await {
                Ok(()) => reregistered += 1,
                Err(err) => warn!(error = %err, "re-registration failed for a globally-scoped entry"),
            }
        }
        reregistered
    }

    /// `removeStaleProvidersOfClusterController` (§6): issues one
    /// `gcd.remove_stale` per distinct GBID currently in use. Per §4.4, a
    /// failing call is retried exactly once, but only if `max_last_seen_ms`
    /// is still within [`REMOVE_STALE_RETRY_WINDOW_MS`] of now -- an older
    /// cutoff means the retry would no longer reflect a fresh request.
    #[instrument(skip(self))]
    pub async fn remove_stale_providers_of_cluster_controller(&self, max_last_seen_ms: i64) {
        let now = self.clock.now_ms();
        let retry_eligible = now.saturating_sub(max_last_seen_ms) < REMOVE_STALE_RETRY_WINDOW_MS;

        for gbid in self.distinct_gbids_in_use() {
            let Err(err) = self
                .gcd
                .remove_stale(&self.config.cluster_controller_id, max_last_seen_ms, &gbid)
                .await
            else {
                continue;
            };
            warn!(gbid = %gbid, error = %err, "remove_stale call failed");

            if !retry_eligible {
                warn!(
                    gbid = %gbid,
                    uptime_ms = now - self.process_start_ms,
                    "max_last_seen_ms is older than the retry window, not retrying"
                );
                continue;
            }

            if let Err(retry_err) = self
                .gcd
                .remove_stale(&self.config.cluster_controller_id, max_last_seen_ms, &gbid)
                .await
            {
                warn!(gbid = %gbid, error = %retry_err, "remove_stale retry also failed");
            }
        }
    }

    fn distinct_gbids_in_use(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut out = Vec::new();
        for (_, gbids) in self.store.global_scoped_local_entries_with_gbids() {
            for gbid in gbids {
                if seen.insert(gbid.clone()) {
                    out.push(gbid);
                }
            }
        }
        out
    }

    /// Supplemented from `original_source/` (not in spec.md's distillation,
    /// not excluded by any Non-goal): a final expiry-sweep-and-persist pass
    /// run once on graceful shutdown, mirroring the original
    /// `LocalCapabilitiesDirectory` destructor flushing the on-disk cache.
    #[instrument(skip(self))]
    pub async fn flush_on_shutdown(&self) {
        let now = self.clock.now_ms();
        let swept = self.store.sweep_expired(now);
        if !swept.local.is_empty() || !swept.global.is_empty() {
            info!(
                local_removed = swept.local.len(),
                global_removed = swept.global.len(),
                "purged expired entries during shutdown flush"
            );
        }
        self.persist().await;
    }

    /// §4.6 expiry sweep: removes every entry with `expiry_date_ms < now`
    /// from both caches, persisting only if something was actually removed.
    #[instrument(skip(self))]
    pub async fn sweep_expired(&self) {
        let now = self.clock.now_ms();
        let swept = self.store.sweep_expired(now);
        if swept.local.is_empty() && swept.global.is_empty() {
            return;
        }
        info!(
            local_removed = swept.local.len(),
            global_removed = swept.global.len(),
            "expiry sweep removed entries"
        );
        for entry in &swept.local {
            self.router.remove_next_hop(&entry.participant_id).await;
        }
        if !swept.local.is_empty() {
            self.persist().await;
        }
    }

    /// §4.6 freshness ("touch") timer: refreshes `last_seen_date_ms` for
    /// every locally-known entry and issues one `gcd.touch` per distinct
    /// GBID appearing in the current global registration set. Local-only
    /// entries are refreshed but never touched remotely.
    #[instrument(skip(self))]
    pub async fn run_freshness_cycle(&self) {
        let now = self.clock.now_ms();
        let globals = self.store.global_scoped_local_entries_with_gbids();

        let mut by_gbid: std::collections::HashMap<String, Vec<String>> = std::collections::HashMap::new();
        for (entry, gbids) in &globals {
            for gbid in gbids {
                by_gbid.entry(gbid.clone()).or_default().push(entry.participant_id.clone());
            }
        }

        for entry in self.store.all_local_entries() {
            let mut refreshed = entry.clone();
            refreshed.last_seen_date_ms = now;
            let gbids = self.store.get_gbids_for(&entry.participant_id);
            let await_global = self.store.get_await_for(&entry.participant_id);
            self.store
                .insert_local(refreshed, &gbids, await_global, &self.config.local_address);
        }

        for (gbid, participant_ids) in by_gbid {
            if let Err(err) = self
                .gcd
                .touch(&self.config.cluster_controller_id, &participant_ids, &gbid)
                .await
            {
                warn!(gbid = %gbid, error = %err, "touch call failed");
            }
        }
    }
}

trait IntoLookupError {
    fn into_lookup_error(self) -> LookupError;
}

impl IntoLookupError for crate::error::GcdCallError {
    fn into_lookup_error(self) -> LookupError {
        match self {
            crate::error::GcdCallError::App(e) => LookupError::Discovery(e),
            crate::error::GcdCallError::Runtime(_) => LookupError::Discovery(DiscoveryError::InternalError),
        }
    }
}
