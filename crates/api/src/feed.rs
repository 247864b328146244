//! Time-cached public feed.
//!
//! A snapshot of the newest public roadmaps is served until it is older than
//! the TTL or something invalidates it. Refills swap in a whole new snapshot;
//! a refill that started before an [`FeedCache::invalidate`] is dropped so
//! it can never re-install data the invalidation meant to discard.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;
use waypoint_db::models::roadmap::{sort_newest_first, Roadmap, RoadmapFilter};
use waypoint_db::RoadmapStore;

struct Snapshot {
    items: Arc<[Roadmap]>,
    fetched_at: Instant,
}

impl Snapshot {
    fn is_fresh(&self, ttl: Duration) -> bool {
        !self.items.is_empty() && self.fetched_at.elapsed() < ttl
    }
}

pub struct FeedCache {
    store: Arc<dyn RoadmapStore>,
    ttl: Duration,
    limit: i64,
    snapshot: RwLock<Option<Arc<Snapshot>>>,
    /// Bumped by every invalidation.
    epoch: AtomicU64,
}

impl FeedCache {
    pub fn new(store: Arc<dyn RoadmapStore>, ttl: Duration, limit: i64) -> Self {
        Self {
            store,
            ttl,
            limit,
            snapshot: RwLock::new(None),
            epoch: AtomicU64::new(0),
        }
    }

    /// Public roadmaps, newest first, at most `limit` of them.
    ///
    /// Cache hits share the snapshot's slice. An empty snapshot is never
    /// served from cache. If the store fails the feed degrades to an empty
    /// list and the cache is left untouched.
    pub async fn get_public_feed(&self) -> Arc<[Roadmap]> {
        if let Some(snapshot) = self.snapshot.read().await.as_ref() {
            if snapshot.is_fresh(self.ttl) {
                tracing::debug!(count = snapshot.items.len(), "Serving cached public feed");
                return Arc::clone(&snapshot.items);
            }
        }

        let epoch = self.epoch.load(Ordering::SeqCst);
        let mut items = match self
            .store
            .query(&RoadmapFilter::IsPublic(true), Some(self.limit))
            .await
        {
            Ok(items) => items,
            Err(e) => {
                tracing::error!(operation = "query", error = %e, "Failed to load public feed");
                return Arc::from(Vec::new());
            }
        };
        sort_newest_first(&mut items);
        let items: Arc<[Roadmap]> = items.into();

        let mut slot = self.snapshot.write().await;
        if self.epoch.load(Ordering::SeqCst) == epoch {
            *slot = Some(Arc::new(Snapshot {
                items: Arc::clone(&items),
                fetched_at: Instant::now(),
            }));
            tracing::debug!(count = items.len(), "Public feed refreshed");
        } else {
            tracing::debug!("Feed invalidated during refill, not caching");
        }
        items
    }

    /// Drop the cached snapshot. The next read always goes to the store.
    pub async fn invalidate(&self) {
        let mut slot = self.snapshot.write().await;
        self.epoch.fetch_add(1, Ordering::SeqCst);
        *slot = None;
        tracing::debug!("Public feed invalidated");
    }
}
