//! Persistence (§6 "Persisted state"): a `PersistenceStore` trait grounded
//! on `MapDataStore`'s load/store split (`storage/map_data_store.rs`), with
//! one production implementation ([`JsonFilePersistence`]) and one no-op
//! ([`NullPersistence`], grounded on `NullDataStore`) used when
//! `persistency_enabled = false`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use lcd_core::DiscoveryEntry;

#[async_trait]
pub trait PersistenceStore: Send + Sync {
    /// Loads the persisted local entries, e.g. at startup.
    async fn load(&self) -> anyhow::Result<Vec<DiscoveryEntry>>;

    /// Rewrites the full persisted set. Called on every mutation of the
    /// local store (add/remove/sweep) per §6.
    async fn save(&self, entries: &[DiscoveryEntry]) -> anyhow::Result<()>;
}

/// JSON-array-on-disk persistence with atomic rewrite: writes to
/// `<path>.tmp` then renames over `path`, so a crash mid-write never leaves
/// a partially-written file in place.
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    path: PathBuf,
}

impl JsonFilePersistence {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }
}

#[async_trait]
impl PersistenceStore for JsonFilePersistence {
    async fn load(&self) -> anyhow::Result<Vec<DiscoveryEntry>> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || load_sync(&path)).await?
    }

    async fn save(&self, entries: &[DiscoveryEntry]) -> anyhow::Result<()> {
        let path = self.path.clone();
        let tmp_path = self.tmp_path();
        let entries = entries.to_vec();
        tokio::task::spawn_blocking(move || save_sync(&path, &tmp_path, &entries)).await?
    }
}

fn load_sync(path: &Path) -> anyhow::Result<Vec<DiscoveryEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn save_sync(path: &Path, tmp_path: &Path, entries: &[DiscoveryEntry]) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(entries)?;
    std::fs::write(tmp_path, json)?;
    std::fs::rename(tmp_path, path)?;
    Ok(())
}

/// No-op persistence used when `persistency_enabled = false`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPersistence;

#[async_trait]
impl PersistenceStore for NullPersistence {
    async fn load(&self) -> anyhow::Result<Vec<DiscoveryEntry>> {
        Ok(Vec::new())
    }

    async fn save(&self, _entries: &[DiscoveryEntry]) -> anyhow::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lcd_core::{ProviderQos, ProviderVersion};

    fn entry(pid: &str) -> DiscoveryEntry {
        DiscoveryEntry {
            participant_id: pid.to_string(),
            provider_version: ProviderVersion { major: 1, minor: 0 },
            domain: "d".to_string(),
            interface_name: "I".to_string(),
            qos: ProviderQos::default(),
            last_seen_date_ms: 0,
            expiry_date_ms: 10_000,
            public_key_id: String::new(),
        }
    }

    #[tokio::test]
    async fn load_missing_file_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFilePersistence::new(dir.path().join("nonexistent.json"));
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFilePersistence::new(dir.path().join("entries.json"));
        let entries = vec![entry("p1"), entry("p2")];

        store.save(&entries).await.unwrap();
        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, entries);
    }

    #[tokio::test]
    async fn save_does_not_leave_tmp_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entries.json");
        let store = JsonFilePersistence::new(&path);
        store.save(&[entry("p1")]).await.unwrap();

        let mut tmp = path.into_os_string();
        tmp.push(".tmp");
        assert!(!PathBuf::from(tmp).exists());
    }

    #[tokio::test]
    async fn null_persistence_load_is_always_empty_and_save_is_noop() {
        let store = NullPersistence;
        assert!(store.load().await.unwrap().is_empty());
        store.save(&[entry("p1")]).await.unwrap();
        assert!(store.load().await.unwrap().is_empty());
    }
}
