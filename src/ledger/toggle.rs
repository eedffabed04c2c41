//! Optimistic toggle executor.
//!
//! Flips a post's like state with immediate local feedback, then reconciles
//! with the server: the visible state never diverges from server truth for
//! longer than one round-trip, and counts never go negative.

use metrics::counter;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::error::DomainError;
use crate::domain::likes::{ToggleOutcome, validate_post_id};
use crate::remote::{RemoteError, RemoteToggle};

use super::invalidate::{QueryInvalidator, QueryKey};
use super::lock::rw_write;
use super::store::{LikeStore, SOURCE};

#[derive(Debug, Error)]
pub enum ToggleError {
    #[error(transparent)]
    InvalidPostId(#[from] DomainError),
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

impl LikeStore {
    /// Toggle the viewer's like on `post_id`.
    ///
    /// The local flip happens synchronously under the write lock before the
    /// remote call is issued, so readers observe the new state within the
    /// same turn and never a half-updated ledger. On success the
    /// authoritative outcome overwrites the optimistic guess and the
    /// post-likes query key is invalidated exactly once. On failure the
    /// entry is restored to its pre-call snapshot (full rollback, including
    /// absence) and the remote error propagates to the caller for UI
    /// reporting.
    ///
    /// There is no retry and no executor-level timeout. Two in-flight
    /// toggles for the same post race; the last server response wins. No
    /// sequencing token is used.
    pub async fn toggle_like<R, I>(
        &self,
        post_id: &str,
        remote: &R,
        invalidator: &I,
    ) -> Result<ToggleOutcome, ToggleError>
    where
        R: RemoteToggle + ?Sized,
        I: QueryInvalidator + ?Sized,
    {
        validate_post_id(post_id)?;

        let (snapshot, optimistic) = {
            let mut ledger = rw_write(&self.ledger, SOURCE, "toggle_like.optimistic");
            let applied = ledger.apply_optimistic(post_id);
            self.persist(&ledger);
            applied
        };
        debug!(
            post_id,
            liked = optimistic.liked,
            count = optimistic.count,
            "Optimistic like applied"
        );

        match remote.toggle(post_id).await {
            Ok(outcome) => {
                {
                    let mut ledger = rw_write(&self.ledger, SOURCE, "toggle_like.reconcile");
                    ledger.reconcile(post_id, &outcome);
                    self.persist(&ledger);
                }
                counter!("plauso_like_toggle_total").increment(1);
                invalidator.invalidate(QueryKey::post_likes(post_id)).await;
                Ok(outcome)
            }
            Err(err) => {
                {
                    let mut ledger = rw_write(&self.ledger, SOURCE, "toggle_like.rollback");
                    ledger.restore(post_id, snapshot);
                    self.persist(&ledger);
                }
                counter!("plauso_like_rollback_total").increment(1);
                warn!(
                    post_id,
                    error = %err,
                    "Like toggle failed, optimistic state rolled back"
                );
                Err(ToggleError::Remote(err))
            }
        }
    }
}
