//! Content-addressed snapshot cache using moka
//!
//! Report generators rewrite near-identical files over and over; caching
//! parsed snapshots by the hash of the raw file text means each distinct
//! file is parsed once.

use moka::future::Cache;
use pathway_model::{ContentHash, ReportSnapshot};
use std::future::Future;
use std::sync::Arc;

/// Statistics for cache monitoring
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    /// Number of entries in cache
    pub entry_count: u64,
}

/// Parsed snapshots keyed by the hash of their source text
#[derive(Debug, Clone)]
pub struct SnapshotCache {
    inner: Cache<ContentHash, Arc<ReportSnapshot>>,
}

impl SnapshotCache {
    /// Create new cache with max capacity
    #[inline]
    #[must_use]
    pub fn new(max_capacity: u64) -> Self {
        Self {
            inner: Cache::new(max_capacity),
        }
    }

    /// Insert snapshot
    #[inline]
    pub async fn insert(&self, hash: ContentHash, snapshot: Arc<ReportSnapshot>) {
        self.inner.insert(hash, snapshot).await;
    }

    /// Get snapshot
    #[inline]
    pub async fn get(&self, hash: &ContentHash) -> Option<Arc<ReportSnapshot>> {
        self.inner.get(hash).await
    }

    /// Get or parse snapshot
    ///
    /// # Errors
    /// Returns the error produced by `f`; nothing is cached in that case
    pub async fn try_get_or_insert_with<E, F, Fut>(
        &self,
        hash: ContentHash,
        f: F,
    ) -> Result<(Arc<ReportSnapshot>, bool), E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<ReportSnapshot, E>>,
    {
        if let Some(cached) = self.get(&hash).await {
            return Ok((cached, true));
        }

        let snapshot = Arc::new(f().await?);
        self.insert(hash, Arc::clone(&snapshot)).await;

        Ok((snapshot, false))
    }

    /// Invalidate cache entry
    #[inline]
    pub async fn invalidate(&self, hash: &ContentHash) {
        self.inner.invalidate(hash).await;
    }

    /// Check if cache contains hash
    #[inline]
    #[must_use]
    pub fn contains(&self, hash: &ContentHash) -> bool {
        self.inner.contains_key(hash)
    }

    /// Apply pending maintenance so counts are current
    pub async fn sync(&self) {
        self.inner.run_pending_tasks().await;
    }

    /// Get cache statistics
    #[inline]
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entry_count: self.inner.entry_count(),
        }
    }
}

impl Default for SnapshotCache {
    /// Create cache with default capacity (1,000 entries)
    fn default() -> Self {
        Self::new(1_000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathway_model::{GeneratedAt, PathwayNode};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn snapshot(name: &str) -> ReportSnapshot {
        let at: GeneratedAt = "2025-01-12T10:23:45".parse().unwrap();
        ReportSnapshot::new(at, vec![PathwayNode::leaf(name)])
    }

    #[tokio::test]
    async fn insert_and_get() {
        let cache = SnapshotCache::new(100);
        let hash = ContentHash::compute(b"report");
        cache.insert(hash, Arc::new(snapshot("Metabolism"))).await;

        let hit = cache.get(&hash).await.unwrap();
        assert_eq!(hit.roots[0].name, "Metabolism");
        assert!(cache.get(&ContentHash::compute(b"other")).await.is_none());
    }

    #[tokio::test]
    async fn computes_once() {
        let cache = SnapshotCache::new(100);
        let hash = ContentHash::compute(b"compute me");
        let calls = AtomicUsize::new(0);

        let (first, hit) = cache
            .try_get_or_insert_with(hash, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, ()>(snapshot("Cell Cycle"))
            })
            .await
            .unwrap();
        assert!(!hit);

        let (second, hit) = cache
            .try_get_or_insert_with(hash, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, ()>(snapshot("never"))
            })
            .await
            .unwrap();
        assert!(hit);
        assert_eq!(second.roots[0].name, "Cell Cycle");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let cache = SnapshotCache::new(100);
        let hash = ContentHash::compute(b"broken");
        let result = cache
            .try_get_or_insert_with(hash, || async { Err::<ReportSnapshot, _>("bad") })
            .await;
        assert_eq!(result.unwrap_err(), "bad");
        assert!(!cache.contains(&hash));
    }

    #[tokio::test]
    async fn invalidation_and_stats() {
        let cache = SnapshotCache::default();
        for i in 0..5 {
            let hash = ContentHash::compute(format!("report {i}").as_bytes());
            cache.insert(hash, Arc::new(snapshot("A"))).await;
        }
        cache.sync().await;
        assert_eq!(cache.stats().entry_count, 5);

        let hash = ContentHash::compute(b"report 0");
        cache.invalidate(&hash).await;
        assert!(!cache.contains(&hash));
    }
}
