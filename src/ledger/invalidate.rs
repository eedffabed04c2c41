//! Query invalidation signal.
//!
//! After a successful toggle the dependent read-queries (like-count
//! displays, the viewer's liked-posts list) must be marked stale so they
//! refetch. Invalidation is fire-and-forget: a key is published, consumers
//! drain and refetch on their own schedule. No data is pushed.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use time::OffsetDateTime;
use tracing::debug;
use uuid::Uuid;

use super::lock::mutex_lock;

const SOURCE: &str = "ledger::invalidate";

/// Monotonic epoch for ordering invalidation events within this process.
pub type Epoch = u64;

/// Composite key of resource kind and post id identifying a read-query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// The like count/status display for one post.
    PostLikes(String),
    /// The viewer's own liked-posts list.
    ViewerLikes,
}

impl QueryKey {
    pub fn post_likes(post_id: &str) -> Self {
        Self::PostLikes(post_id.to_string())
    }
}

/// One published invalidation, with idempotency id and ordering epoch.
#[derive(Debug, Clone)]
pub struct InvalidationEvent {
    pub id: Uuid,
    pub epoch: Epoch,
    pub key: QueryKey,
    pub timestamp: OffsetDateTime,
}

impl InvalidationEvent {
    pub fn new(key: QueryKey, epoch: Epoch) -> Self {
        Self {
            id: Uuid::new_v4(),
            epoch,
            key,
            timestamp: OffsetDateTime::now_utc(),
        }
    }
}

/// Capability for marking read-queries stale.
#[async_trait]
pub trait QueryInvalidator: Send + Sync {
    async fn invalidate(&self, key: QueryKey);
}

/// In-memory FIFO of invalidation events.
///
/// Published by the toggle executor, drained in batches by whatever layer
/// owns the read caches. A mutex suffices; contention is low.
pub struct InvalidationQueue {
    queue: Mutex<VecDeque<InvalidationEvent>>,
    epoch_counter: AtomicU64,
}

impl InvalidationQueue {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            epoch_counter: AtomicU64::new(0),
        }
    }

    pub fn next_epoch(&self) -> Epoch {
        self.epoch_counter.fetch_add(1, Ordering::SeqCst)
    }

    pub fn publish(&self, key: QueryKey) {
        let event = InvalidationEvent::new(key, self.next_epoch());
        debug!(
            event_id = %event.id,
            event_epoch = event.epoch,
            query_key = ?event.key,
            "Query invalidation enqueued"
        );
        mutex_lock(&self.queue, SOURCE, "publish").push_back(event);
    }

    /// Drain up to `limit` events in FIFO order.
    pub fn drain(&self, limit: usize) -> Vec<InvalidationEvent> {
        let mut queue = mutex_lock(&self.queue, SOURCE, "drain");
        let count = limit.min(queue.len());
        queue.drain(..count).collect()
    }

    pub fn len(&self) -> usize {
        mutex_lock(&self.queue, SOURCE, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        mutex_lock(&self.queue, SOURCE, "clear").clear();
    }
}

impl Default for InvalidationQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QueryInvalidator for InvalidationQueue {
    async fn invalidate(&self, key: QueryKey) {
        self.publish(key);
    }
}

/// Invalidator for callers without read caches.
pub struct NullInvalidator;

#[async_trait]
impl QueryInvalidator for NullInvalidator {
    async fn invalidate(&self, _key: QueryKey) {}
}
