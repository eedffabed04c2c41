//! Pure ledger state: the three per-post maps and their transitions.
//!
//! No I/O and no locking here; `LikeStore` wraps this in a lock and drives
//! persistence. Keeping the transitions pure keeps the optimistic/rollback
//! semantics unit-testable in isolation.

use std::collections::HashMap;

use crate::domain::likes::{LikeRecord, LikeState, ToggleOutcome};

/// Pre-mutation snapshot of one post's entry.
///
/// Presence matters: a post unobserved before a toggle must be unobserved
/// again after a rollback, not left behind as `liked: false, count: 0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySnapshot {
    pub liked: Option<bool>,
    pub count: Option<i64>,
}

/// The three per-post maps. Append-only: entries are never evicted.
#[derive(Debug, Clone, Default)]
pub struct LikeLedger {
    status: HashMap<String, bool>,
    counts: HashMap<String, i64>,
    originals: HashMap<String, i64>,
}

impl LikeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a ledger from persisted parts, clamping counts to `>= 0`.
    pub(crate) fn from_parts(
        status: HashMap<String, bool>,
        counts: HashMap<String, i64>,
        originals: HashMap<String, i64>,
    ) -> Self {
        Self {
            status,
            counts: counts.into_iter().map(|(k, v)| (k, v.max(0))).collect(),
            originals: originals.into_iter().map(|(k, v)| (k, v.max(0))).collect(),
        }
    }

    pub(crate) fn parts(&self) -> (&HashMap<String, bool>, &HashMap<String, i64>, &HashMap<String, i64>) {
        (&self.status, &self.counts, &self.originals)
    }

    pub fn like_state(&self, post_id: &str) -> LikeState {
        LikeState {
            liked: self.status.get(post_id).copied().unwrap_or(false),
            count: self.counts.get(post_id).copied().unwrap_or(0),
        }
    }

    pub fn original_count(&self, post_id: &str) -> Option<i64> {
        self.originals.get(post_id).copied()
    }

    pub fn contains(&self, post_id: &str) -> bool {
        self.status.contains_key(post_id)
    }

    pub fn len(&self) -> usize {
        self.status.len()
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_empty()
    }

    pub fn snapshot(&self, post_id: &str) -> EntrySnapshot {
        EntrySnapshot {
            liked: self.status.get(post_id).copied(),
            count: self.counts.get(post_id).copied(),
        }
    }

    /// Flip a post's like state locally, before the server confirms.
    ///
    /// false→true increments the current count; true→false restores the
    /// last known server baseline instead of decrementing, so rapid repeat
    /// toggles do not compound arithmetic drift. The result is clamped to
    /// `>= 0`. Returns the pre-mutation snapshot for rollback together with
    /// the newly visible state.
    pub fn apply_optimistic(&mut self, post_id: &str) -> (EntrySnapshot, LikeState) {
        let snapshot = self.snapshot(post_id);

        let liked = snapshot.liked.unwrap_or(false);
        let new_liked = !liked;
        let new_count = if new_liked {
            snapshot.count.unwrap_or(0) + 1
        } else {
            self.originals.get(post_id).copied().unwrap_or(0)
        }
        .max(0);

        self.status.insert(post_id.to_string(), new_liked);
        self.counts.insert(post_id.to_string(), new_count);

        (
            snapshot,
            LikeState {
                liked: new_liked,
                count: new_count,
            },
        )
    }

    /// Overwrite one post's entry with the authoritative server outcome.
    ///
    /// The server wins over the optimistic guess, including against toggles
    /// from another session. Also refreshes the rollback baseline.
    pub fn reconcile(&mut self, post_id: &str, outcome: &ToggleOutcome) {
        let count = outcome.like_count.max(0);
        self.status.insert(post_id.to_string(), outcome.liked);
        self.counts.insert(post_id.to_string(), count);
        self.originals.insert(post_id.to_string(), count);
    }

    /// Full rollback of one post's entry to its pre-optimistic snapshot.
    ///
    /// A key absent before the toggle is absent again afterwards. The
    /// baseline map is untouched here; the optimistic apply never wrote it.
    pub fn restore(&mut self, post_id: &str, snapshot: EntrySnapshot) {
        match snapshot.liked {
            Some(liked) => {
                self.status.insert(post_id.to_string(), liked);
            }
            None => {
                self.status.remove(post_id);
            }
        }
        match snapshot.count {
            Some(count) => {
                self.counts.insert(post_id.to_string(), count);
            }
            None => {
                self.counts.remove(post_id);
            }
        }
    }

    /// Merge a batch of server-reported like records into the ledger.
    ///
    /// Posts already present are left untouched: a toggle that happened
    /// before the bulk load wins over the bulk load's value. Records with
    /// an empty post id are skipped silently. Returns the number of
    /// entries inserted; seeding twice with the same records equals
    /// seeding once.
    pub fn merge_seed(&mut self, records: &[LikeRecord]) -> usize {
        let mut inserted = 0;
        for record in records {
            if record.post_id.is_empty() || self.status.contains_key(&record.post_id) {
                continue;
            }
            let count = record.likes_count.max(0);
            self.status.insert(record.post_id.clone(), record.liked);
            self.counts.insert(record.post_id.clone(), count);
            self.originals.insert(record.post_id.clone(), count);
            inserted += 1;
        }
        inserted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(post_id: &str, liked: bool, likes_count: i64) -> LikeRecord {
        LikeRecord {
            post_id: post_id.to_string(),
            liked,
            likes_count,
        }
    }

    #[test]
    fn unobserved_post_reads_as_default() {
        let ledger = LikeLedger::new();
        assert_eq!(ledger.like_state("post_1"), LikeState::UNOBSERVED);
        assert!(!ledger.contains("post_1"));
    }

    #[test]
    fn optimistic_like_increments_count() {
        let mut ledger = LikeLedger::new();
        ledger.merge_seed(&[record("post_1", false, 5)]);

        let (snapshot, state) = ledger.apply_optimistic("post_1");

        assert_eq!(snapshot.liked, Some(false));
        assert_eq!(snapshot.count, Some(5));
        assert!(state.liked);
        assert_eq!(state.count, 6);
    }

    #[test]
    fn optimistic_unlike_restores_baseline_not_blind_decrement() {
        let mut ledger = LikeLedger::new();
        ledger.merge_seed(&[record("post_1", true, 6)]);
        assert_eq!(ledger.original_count("post_1"), Some(6));

        let (_, state) = ledger.apply_optimistic("post_1");

        // Baseline restore: the count stays at the last server value.
        assert!(!state.liked);
        assert_eq!(state.count, 6);
    }

    #[test]
    fn rapid_repeat_toggles_do_not_drift() {
        let mut ledger = LikeLedger::new();
        ledger.merge_seed(&[record("post_1", false, 5)]);

        for _ in 0..4 {
            ledger.apply_optimistic("post_1");
            ledger.apply_optimistic("post_1");
        }

        // like/unlike pairs land back on the baseline, not 5 - 4.
        assert_eq!(ledger.like_state("post_1").count, 5);
        assert!(!ledger.like_state("post_1").liked);
    }

    #[test]
    fn count_never_negative_without_baseline() {
        let mut ledger = LikeLedger::new();

        // First toggle on an unseeded post, then reverse it: no baseline
        // exists, so the unlike falls back to 0, never below.
        ledger.apply_optimistic("post_1");
        let (_, state) = ledger.apply_optimistic("post_1");

        assert_eq!(state.count, 0);
        assert!(state.count >= 0);
    }

    #[test]
    fn reconcile_is_authoritative_and_refreshes_baseline() {
        let mut ledger = LikeLedger::new();
        ledger.merge_seed(&[record("post_1", false, 5)]);
        ledger.apply_optimistic("post_1");

        ledger.reconcile(
            "post_1",
            &ToggleOutcome {
                liked: true,
                like_count: 6,
            },
        );

        let state = ledger.like_state("post_1");
        assert!(state.liked);
        assert_eq!(state.count, 6);
        assert_eq!(ledger.original_count("post_1"), Some(6));
    }

    #[test]
    fn reconcile_clamps_negative_server_count() {
        let mut ledger = LikeLedger::new();
        ledger.reconcile(
            "post_1",
            &ToggleOutcome {
                liked: false,
                like_count: -3,
            },
        );
        assert_eq!(ledger.like_state("post_1").count, 0);
        assert_eq!(ledger.original_count("post_1"), Some(0));
    }

    #[test]
    fn restore_reverts_exactly() {
        let mut ledger = LikeLedger::new();
        ledger.merge_seed(&[record("post_1", false, 5)]);

        let (snapshot, _) = ledger.apply_optimistic("post_1");
        ledger.restore("post_1", snapshot);

        let state = ledger.like_state("post_1");
        assert!(!state.liked);
        assert_eq!(state.count, 5);
    }

    #[test]
    fn restore_removes_entry_absent_before_toggle() {
        let mut ledger = LikeLedger::new();

        let (snapshot, _) = ledger.apply_optimistic("post_1");
        assert!(ledger.contains("post_1"));

        ledger.restore("post_1", snapshot);
        assert!(!ledger.contains("post_1"));
        assert!(ledger.is_empty());
    }

    #[test]
    fn seed_is_idempotent() {
        let mut ledger = LikeLedger::new();
        let records = [record("post_1", true, 3), record("post_2", false, 0)];

        assert_eq!(ledger.merge_seed(&records), 2);
        assert_eq!(ledger.merge_seed(&records), 0);

        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.like_state("post_1").count, 3);
    }

    #[test]
    fn seed_never_overwrites_present_entries() {
        let mut ledger = LikeLedger::new();

        // A toggle lands before the bulk load arrives.
        ledger.apply_optimistic("post_1");
        let before = ledger.like_state("post_1");

        let inserted = ledger.merge_seed(&[record("post_1", false, 40)]);
        assert_eq!(inserted, 0);
        assert_eq!(ledger.like_state("post_1"), before);
    }

    #[test]
    fn seed_skips_empty_ids_and_clamps_counts() {
        let mut ledger = LikeLedger::new();
        let inserted = ledger.merge_seed(&[record("", true, 9), record("post_2", true, -7)]);

        assert_eq!(inserted, 1);
        assert!(!ledger.contains(""));
        assert_eq!(ledger.like_state("post_2").count, 0);
    }

    #[test]
    fn from_parts_clamps_persisted_counts() {
        let mut counts = HashMap::new();
        counts.insert("post_1".to_string(), -2);
        let ledger = LikeLedger::from_parts(HashMap::new(), counts, HashMap::new());
        assert_eq!(ledger.like_state("post_1").count, 0);
    }
}
