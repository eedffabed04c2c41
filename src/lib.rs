//! # Plauso
//!
//! Engagement-state layer for a blogging platform: a persistent per-post
//! like ledger with optimistic toggle semantics.
//!
//! A toggle flips local state in the same event-loop turn, calls the remote
//! toggle endpoint, reconciles with the authoritative response on success,
//! and rolls the ledger back to its pre-toggle snapshot on failure. After a
//! successful toggle, dependent read-queries are marked stale through a
//! fire-and-forget invalidation signal so count displays refetch.
//!
//! ## Configuration
//!
//! Behavior is controlled via `plauso.toml` (and `PLAUSO__*` environment
//! variables):
//!
//! ```toml
//! [store]
//! storage_dir = "./plauso-data"
//! storage_key = "likes"
//! persistence = true
//!
//! [remote]
//! base_url = "https://blog.example.org"
//! # ... see config.rs for all options
//! ```

pub mod config;
pub mod domain;
pub mod infra;
pub mod ledger;
pub mod remote;
