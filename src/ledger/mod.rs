//! Plauso Like Ledger
//!
//! Holds the per-post engagement state for the current viewer:
//!
//! - **status**: liked-by-viewer flags
//! - **counts**: total like counts (never negative)
//! - **originals**: last server-authoritative baselines, used to restore
//!   rather than blindly decrement when an optimistic like is reversed
//!
//! The ledger is populated incrementally (bulk seed or first toggle) and is
//! append-only: entries are never evicted for the lifetime of the store.
//! Every mutation is serialized through the configured persistence medium
//! under a fixed storage key, so state survives process restarts the way a
//! browser store survives page reloads.

mod invalidate;
mod lock;
mod persist;
mod state;
mod store;
mod toggle;

pub use invalidate::{
    Epoch, InvalidationEvent, InvalidationQueue, NullInvalidator, QueryInvalidator, QueryKey,
};
pub use persist::{FileMedium, LedgerMedium, MemoryMedium, PersistedLedger};
pub use state::{EntrySnapshot, LikeLedger};
pub use store::LikeStore;
pub use toggle::ToggleError;
