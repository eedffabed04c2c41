//! Shared like store: the locked ledger plus its persistence medium.

use std::sync::{Arc, RwLock};

use metrics::counter;
use tracing::{debug, info, warn};

use crate::config::StoreSettings;
use crate::domain::likes::{LikeRecord, LikeState};
use crate::infra::error::InfraError;

use super::lock::{rw_read, rw_write};
use super::persist::{FileMedium, LedgerMedium, MemoryMedium, PersistedLedger};
use super::state::LikeLedger;

pub(crate) const SOURCE: &str = "ledger::store";

/// Shared, persistent like ledger for the current viewer.
///
/// All mutation goes through the fixed set of setters (`toggle_like`,
/// `set_initial_likes`); every other accessor is read-only. Any task may
/// hold a clone of the surrounding `Arc` and read concurrently.
pub struct LikeStore {
    pub(super) ledger: RwLock<LikeLedger>,
    medium: Arc<dyn LedgerMedium>,
    storage_key: String,
}

impl LikeStore {
    /// Open a store per the configured settings, loading any persisted
    /// state for the storage key.
    pub fn open(settings: &StoreSettings) -> Result<Self, InfraError> {
        let medium: Arc<dyn LedgerMedium> = if settings.persistence {
            Arc::new(FileMedium::new(settings.storage_dir.clone())?)
        } else {
            Arc::new(MemoryMedium::new())
        };
        Ok(Self::with_medium(medium, settings.storage_key.clone()))
    }

    /// Open a store over an explicit medium.
    pub fn with_medium(medium: Arc<dyn LedgerMedium>, storage_key: impl Into<String>) -> Self {
        let storage_key = storage_key.into();
        let ledger = match medium.load(&storage_key) {
            Some(persisted) => {
                let ledger = persisted.into_ledger();
                info!(
                    storage_key = %storage_key,
                    entries = ledger.len(),
                    "Like ledger restored from persistence medium"
                );
                ledger
            }
            None => LikeLedger::new(),
        };
        Self {
            ledger: RwLock::new(ledger),
            medium,
            storage_key,
        }
    }

    // ========================================================================
    // Selectors
    // ========================================================================

    pub fn like_state(&self, post_id: &str) -> LikeState {
        rw_read(&self.ledger, SOURCE, "like_state").like_state(post_id)
    }

    pub fn is_liked(&self, post_id: &str) -> bool {
        self.like_state(post_id).liked
    }

    pub fn like_count(&self, post_id: &str) -> i64 {
        self.like_state(post_id).count
    }

    pub fn original_count(&self, post_id: &str) -> Option<i64> {
        rw_read(&self.ledger, SOURCE, "original_count").original_count(post_id)
    }

    pub fn contains(&self, post_id: &str) -> bool {
        rw_read(&self.ledger, SOURCE, "contains").contains(post_id)
    }

    pub fn len(&self) -> usize {
        rw_read(&self.ledger, SOURCE, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ========================================================================
    // Bulk seeding
    // ========================================================================

    /// Merge a batch of server-reported like records into the ledger.
    ///
    /// Idempotent: posts already observed (seeded or toggled) keep their
    /// current state, so in-flight optimistic values are never clobbered by
    /// stale bulk data. Records with an empty post id are skipped silently.
    /// Returns the number of entries inserted.
    pub fn set_initial_likes(&self, records: &[LikeRecord]) -> usize {
        let mut ledger = rw_write(&self.ledger, SOURCE, "set_initial_likes");
        let inserted = ledger.merge_seed(records);
        if inserted > 0 {
            self.persist(&ledger);
            counter!("plauso_like_seed_total").increment(inserted as u64);
            debug!(
                inserted,
                total = ledger.len(),
                "Like ledger seeded from bulk records"
            );
        }
        inserted
    }

    /// Serialize the ledger through the medium under the fixed storage key.
    ///
    /// Best-effort: the in-memory ledger is the source of truth for the
    /// session, so a failed write is logged and counted, not propagated.
    pub(super) fn persist(&self, ledger: &LikeLedger) {
        let payload = PersistedLedger::capture(ledger);
        if let Err(err) = self.medium.store(&self.storage_key, &payload) {
            counter!("plauso_ledger_persist_fail_total").increment(1);
            warn!(
                storage_key = %self.storage_key,
                error = %err,
                "Like ledger persist failed"
            );
        }
    }
}
