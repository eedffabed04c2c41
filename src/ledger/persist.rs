//! Persistence media for the like ledger.
//!
//! The full ledger is serialized as opaque key→value JSON under a fixed
//! storage key on every mutation and loaded once at store creation. There
//! is no versioning or migration: a payload that fails to decode yields an
//! empty ledger.

use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::warn;

use crate::infra::error::InfraError;

use super::lock::mutex_lock;
use super::state::LikeLedger;

const SOURCE: &str = "ledger::persist";

/// Serialized form of the ledger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersistedLedger {
    #[serde(default)]
    pub status: HashMap<String, bool>,
    #[serde(default)]
    pub counts: HashMap<String, i64>,
    #[serde(default)]
    pub originals: HashMap<String, i64>,
    #[serde(default)]
    pub updated_at_unix: i64,
}

impl PersistedLedger {
    pub fn capture(ledger: &LikeLedger) -> Self {
        let (status, counts, originals) = ledger.parts();
        Self {
            status: status.clone(),
            counts: counts.clone(),
            originals: originals.clone(),
            updated_at_unix: OffsetDateTime::now_utc().unix_timestamp(),
        }
    }

    pub fn into_ledger(self) -> LikeLedger {
        LikeLedger::from_parts(self.status, self.counts, self.originals)
    }
}

/// Storage backend for persisted ledgers.
///
/// `load` is infallible by design: corruption or absence both read as "no
/// persisted state", the caller starts empty.
pub trait LedgerMedium: Send + Sync {
    fn load(&self, key: &str) -> Option<PersistedLedger>;
    fn store(&self, key: &str, ledger: &PersistedLedger) -> Result<(), InfraError>;
}

/// Filesystem-backed medium: one JSON file per storage key.
#[derive(Debug)]
pub struct FileMedium {
    root: PathBuf,
}

impl FileMedium {
    /// Initialise a medium rooted at the provided directory, creating it if
    /// necessary.
    pub fn new(root: PathBuf) -> Result<Self, InfraError> {
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl LedgerMedium for FileMedium {
    fn load(&self, key: &str) -> Option<PersistedLedger> {
        let path = self.path_for(key);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                warn!(
                    target_module = SOURCE,
                    storage_key = key,
                    error = %err,
                    "Persisted ledger unreadable, starting empty"
                );
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(ledger) => Some(ledger),
            Err(err) => {
                warn!(
                    target_module = SOURCE,
                    storage_key = key,
                    error = %err,
                    "Persisted ledger malformed, starting empty"
                );
                None
            }
        }
    }

    fn store(&self, key: &str, ledger: &PersistedLedger) -> Result<(), InfraError> {
        let payload = serde_json::to_vec(ledger)
            .map_err(|err| InfraError::persistence(format!("ledger serialization failed: {err}")))?;

        // Temp file + rename so a crash mid-write never truncates the
        // previous snapshot.
        let mut tmp = tempfile::NamedTempFile::new_in(&self.root)?;
        tmp.write_all(&payload)?;
        tmp.persist(self.path_for(key))
            .map_err(|err| InfraError::persistence(format!("ledger rename failed: {err}")))?;
        Ok(())
    }
}

/// In-memory medium for tests and ephemeral stores.
#[derive(Debug, Default)]
pub struct MemoryMedium {
    entries: Mutex<HashMap<String, PersistedLedger>>,
    store_count: Mutex<u64>,
}

impl MemoryMedium {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `store` calls observed. Lets tests assert the
    /// persist-on-every-mutation contract.
    pub fn store_count(&self) -> u64 {
        *mutex_lock(&self.store_count, SOURCE, "store_count")
    }
}

impl LedgerMedium for MemoryMedium {
    fn load(&self, key: &str) -> Option<PersistedLedger> {
        mutex_lock(&self.entries, SOURCE, "memory_load")
            .get(key)
            .cloned()
    }

    fn store(&self, key: &str, ledger: &PersistedLedger) -> Result<(), InfraError> {
        mutex_lock(&self.entries, SOURCE, "memory_store").insert(key.to_string(), ledger.clone());
        *mutex_lock(&self.store_count, SOURCE, "memory_store.count") += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::likes::LikeRecord;

    fn seeded_ledger() -> LikeLedger {
        let mut ledger = LikeLedger::new();
        ledger.merge_seed(&[LikeRecord {
            post_id: "post_1".to_string(),
            liked: true,
            likes_count: 4,
        }]);
        ledger
    }

    #[test]
    fn file_medium_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let medium = FileMedium::new(dir.path().to_path_buf()).expect("medium");

        assert!(medium.load("likes").is_none());

        let persisted = PersistedLedger::capture(&seeded_ledger());
        medium.store("likes", &persisted).expect("store");

        let loaded = medium.load("likes").expect("load").into_ledger();
        let state = loaded.like_state("post_1");
        assert!(state.liked);
        assert_eq!(state.count, 4);
    }

    #[test]
    fn file_medium_tolerates_malformed_payload() {
        let dir = tempfile::tempdir().expect("tempdir");
        let medium = FileMedium::new(dir.path().to_path_buf()).expect("medium");

        std::fs::write(dir.path().join("likes.json"), b"{not json").expect("write garbage");
        assert!(medium.load("likes").is_none());
    }

    #[test]
    fn file_medium_overwrite_keeps_latest() {
        let dir = tempfile::tempdir().expect("tempdir");
        let medium = FileMedium::new(dir.path().to_path_buf()).expect("medium");

        medium
            .store("likes", &PersistedLedger::capture(&LikeLedger::new()))
            .expect("store empty");
        medium
            .store("likes", &PersistedLedger::capture(&seeded_ledger()))
            .expect("store seeded");

        let loaded = medium.load("likes").expect("load").into_ledger();
        assert_eq!(loaded.len(), 1);
    }

    #[test]
    fn memory_medium_counts_stores() {
        let medium = MemoryMedium::new();
        let persisted = PersistedLedger::capture(&seeded_ledger());

        medium.store("likes", &persisted).expect("store");
        medium.store("likes", &persisted).expect("store again");

        assert_eq!(medium.store_count(), 2);
        assert!(medium.load("likes").is_some());
        assert!(medium.load("other").is_none());
    }

    #[test]
    fn persisted_ledger_decodes_with_missing_fields() {
        let loaded: PersistedLedger = serde_json::from_str(r#"{"status":{"a":true}}"#)
            .expect("partial payload decodes");
        assert_eq!(loaded.counts.len(), 0);
        assert_eq!(loaded.status.len(), 1);
    }
}
