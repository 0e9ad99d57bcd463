//! Background timers (§4.6): freshness ("touch"), expiry-sweep, and re-add,
//! each an independent `tokio::task` rescheduled by its own completion.
//!
//! Per REDESIGN FLAG "Weak self-references in timers" (§9): each loop holds
//! a [`Weak<LocalCapabilitiesDirectory>`] rather than a strong `Arc`, so a
//! directory can be dropped without the timers keeping it alive; on wake,
//! a dead weak reference ends the loop quietly instead of rescheduling.
//! Cancellation is cooperative via [`crate::shutdown::ShutdownController`]:
//! every loop `select!`s its interval tick against the shutdown watch.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tracing::info;

use crate::directory::LocalCapabilitiesDirectory;
use crate::shutdown::ShutdownController;

/// Spawns all three timers, returning their join handles so callers can
/// await them during shutdown if desired (they also exit on their own once
/// the shutdown signal fires).
pub fn spawn_all(
    directory: &Arc<LocalCapabilitiesDirectory>,
    shutdown: &Arc<ShutdownController>,
) -> Vec<tokio::task::JoinHandle<()>> {
    let config = directory.config().clone();
    vec![
        spawn_freshness_timer(
            Arc::downgrade(directory),
            Arc::clone(shutdown),
            Duration::from_millis(config.capabilities_freshness_update_interval_ms),
        ),
        spawn_sweep_timer(
            Arc::downgrade(directory),
            Arc::clone(shutdown),
            Duration::from_millis(config.purge_expired_discovery_entries_interval_ms),
        ),
        spawn_re_add_timer(
            Arc::downgrade(directory),
            Arc::clone(shutdown),
            Duration::from_millis(config.re_add_interval_ms),
        ),
    ]
}

fn spawn_freshness_timer(
    directory: Weak<LocalCapabilitiesDirectory>,
    shutdown: Arc<ShutdownController>,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await; // first tick fires immediately; skip it
        let mut shutdown_rx = shutdown.shutdown_receiver();
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let Some(directory) = directory.upgrade() else {
                        info!("freshness timer exiting: directory dropped");
                        return;
                    };
                    directory.run_freshness_cycle().await;
                }
                _ = shutdown_rx.changed() => {
                    info!("freshness timer exiting: shutdown signalled");
                    return;
                }
            }
        }
    })
}

fn spawn_sweep_timer(
    directory: Weak<LocalCapabilitiesDirectory>,
    shutdown: Arc<ShutdownController>,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await;
        let mut shutdown_rx = shutdown.shutdown_receiver();
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let Some(directory) = directory.upgrade() else {
                        info!("expiry sweep timer exiting: directory dropped");
                        return;
                    };
                    directory.sweep_expired().await;
                }
                _ = shutdown_rx.changed() => {
                    info!("expiry sweep timer exiting: shutdown signalled");
                    return;
                }
            }
        }
    })
}

fn spawn_re_add_timer(
    directory: Weak<LocalCapabilitiesDirectory>,
    shutdown: Arc<ShutdownController>,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await;
        let mut shutdown_rx = shutdown.shutdown_receiver();
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let Some(directory) = directory.upgrade() else {
                        info!("re-add timer exiting: directory dropped");
                        return;
                    };
                    let count = directory.trigger_global_provider_reregistration().await;
                    info!(count, "re-add cycle complete");
                }
                _ = shutdown_rx.changed() => {
                    info!("re-add timer exiting: shutdown signalled");
                    return;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use lcd_core::{ProviderQos, ProviderScope, ProviderVersion, SystemClock};

    use crate::access::AllowAllAccessController;
    use crate::config::LcdConfig;
    use crate::gcd::{GcdClient, InMemoryGcdClient};
    use crate::persistence::NullPersistence;
    use crate::router::{MessageRouter, RecordingMessageRouter};

    fn directory_with_interval(interval_ms: u64) -> Arc<LocalCapabilitiesDirectory> {
        let config = LcdConfig {
            capabilities_freshness_update_interval_ms: interval_ms,
            purge_expired_discovery_entries_interval_ms: interval_ms,
            re_add_interval_ms: interval_ms,
            known_gbids: vec!["G1".to_string()],
            // Negative enough that `add`'s `max(expiry, now + default)` never
            // overrides the deliberately-already-expired entry below.
            default_expiry_interval_ms: -1_000_000_000,
            ..LcdConfig::default()
        };
        Arc::new(LocalCapabilitiesDirectory::new(
            Arc::new(InMemoryGcdClient::new()) as Arc<dyn GcdClient>,
            Arc::new(RecordingMessageRouter::new()) as Arc<dyn MessageRouter>,
            Arc::new(AllowAllAccessController),
            Arc::new(NullPersistence),
            Arc::new(SystemClock) as Arc<dyn lcd_core::ClockSource>,
            config,
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn sweep_timer_removes_expired_entries_on_tick() {
        let directory = directory_with_interval(100);
        let entry = lcd_core::DiscoveryEntry {
            participant_id: "p1".to_string(),
            provider_version: ProviderVersion { major: 1, minor: 0 },
            domain: "d".to_string(),
            interface_name: "I".to_string(),
            qos: ProviderQos { scope: ProviderScope::Local, ..ProviderQos::default() },
            last_seen_date_ms: 0,
            expiry_date_ms: chrono_now_ms_minus_one(),
            public_key_id: String::new(),
        };
        directory.add(entry, true, &[], "alice").await.unwrap();
        assert_eq!(directory.store().local_len(), 1);

        let shutdown = Arc::new(ShutdownController::new());
        let handles = spawn_all(&directory, &shutdown);

        tokio::time::advance(Duration::from_millis(150)).await;
        tokio::task::yield_now().await;
        tokio::time::advance(Duration::from_millis(150)).await;
        tokio::task::yield_now().await;

        shutdown.trigger_shutdown();
        for handle in handles {
            let _ = handle.await;
        }

        assert_eq!(directory.store().local_len(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn timers_exit_on_shutdown_without_rescheduling() {
        let directory = directory_with_interval(1_000_000);
        let shutdown = Arc::new(ShutdownController::new());
        let handles = spawn_all(&directory, &shutdown);

        shutdown.trigger_shutdown();
        for handle in handles {
            tokio::time::timeout(Duration::from_secs(1), handle)
                .await
                .expect("timer task should exit promptly on shutdown")
                .unwrap();
        }
    }

    #[tokio::test(start_paused = true)]
    async fn timer_exits_quietly_once_directory_is_dropped() {
        let directory = directory_with_interval(50);
        let shutdown = Arc::new(ShutdownController::new());
        let handles = spawn_all(&directory, &shutdown);
        drop(directory);

        tokio::time::advance(Duration::from_millis(200)).await;

        for handle in handles {
            tokio::time::timeout(Duration::from_secs(1), handle)
                .await
                .expect("timer should exit once its directory is gone")
                .unwrap();
        }
    }

    /// Small helper so the expiry test doesn't depend on wall-clock time:
    /// `SystemClock` backs this directory, so we pin an expiry just before
    /// "now" using the same epoch-millis representation the clock returns.
    fn chrono_now_ms_minus_one() -> i64 {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_millis() as i64 - 1
    }
}
