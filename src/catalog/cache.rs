use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

use super::client::CatalogService;
use super::types::Movie;

pub const DEFAULT_CAPACITY: usize = 1000;
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

struct Entry {
    movie: Movie,
    inserted: Instant,
    seq: u64,
}

#[derive(Default)]
struct Entries {
    map: HashMap<i64, Entry>,
    next_seq: u64,
}

/// Complete movie records keyed by id, so a detail view can be served
/// without another round-trip.
///
/// Entries expire after `ttl`. Inserting purges expired entries and, at
/// capacity, evicts the oldest one.
#[derive(Clone)]
pub struct DetailCache {
    entries: Arc<RwLock<Entries>>,
    capacity: usize,
    ttl: Duration,
}

impl Default for DetailCache {
    fn default() -> Self {
        Self::with_limits(DEFAULT_CAPACITY, DEFAULT_TTL)
    }
}

impl DetailCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(Entries::default())),
            capacity: capacity.max(1),
            ttl,
        }
    }

    pub async fn get(&self, id: i64) -> Option<Movie> {
        let entries = self.entries.read().await;
        entries
            .map
            .get(&id)
            .filter(|e| e.inserted.elapsed() < self.ttl)
            .map(|e| e.movie.clone())
    }

    pub async fn contains(&self, id: i64) -> bool {
        let entries = self.entries.read().await;
        entries
            .map
            .get(&id)
            .is_some_and(|e| e.inserted.elapsed() < self.ttl)
    }

    pub async fn insert(&self, movie: Movie) {
        let mut entries = self.entries.write().await;
        let ttl = self.ttl;
        entries.map.retain(|_, e| e.inserted.elapsed() < ttl);

        if entries.map.len() >= self.capacity && !entries.map.contains_key(&movie.id) {
            let oldest = entries.map.iter().min_by_key(|(_, e)| e.seq).map(|(id, _)| *id);
            if let Some(id) = oldest {
                debug!("Evicting movie {} from the detail cache", id);
                entries.map.remove(&id);
            }
        }

        let seq = entries.next_seq;
        entries.next_seq += 1;
        entries.map.insert(
            movie.id,
            Entry {
                movie,
                inserted: Instant::now(),
                seq,
            },
        );
    }

    /// Number of stored entries, expired ones included until the next insert.
    pub async fn len(&self) -> usize {
        self.entries.read().await.map.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Fire-and-forget detail prefetch. Every uncached id gets its own task;
/// failures are logged and dropped.
pub fn prefetch_details(catalog: Arc<dyn CatalogService>, cache: DetailCache, ids: Vec<i64>) {
    for id in ids {
        let catalog = Arc::clone(&catalog);
        let cache = cache.clone();
        tokio::spawn(async move {
            if cache.contains(id).await {
                return;
            }
            match catalog.movie_details(id).await {
                Ok(movie) => {
                    debug!("Prefetched details for movie {}", id);
                    cache.insert(movie).await;
                }
                Err(e) => debug!("Prefetch of movie {} failed: {}", id, e),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::testing::FakeCatalog;

    async fn wait_for_len(cache: &DetailCache, len: usize) {
        for _ in 0..100 {
            if cache.len().await >= len {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let cache = DetailCache::new();
        assert!(cache.is_empty().await);
        cache.insert(Movie::new(7, "Seven")).await;
        assert_eq!(cache.get(7).await.map(|m| m.title), Some("Seven".to_string()));
        assert!(cache.get(8).await.is_none());
    }

    #[tokio::test]
    async fn test_capacity_evicts_oldest() {
        let cache = DetailCache::with_limits(3, Duration::from_secs(60));
        for id in 1..=5 {
            cache.insert(Movie::new(id, "m")).await;
        }
        assert_eq!(cache.len().await, 3);
        assert!(!cache.contains(1).await);
        assert!(!cache.contains(2).await);
        assert!(cache.contains(5).await);

        // Refreshing a present id does not evict anything.
        cache.insert(Movie::new(3, "again")).await;
        assert_eq!(cache.len().await, 3);
        assert_eq!(cache.get(3).await.unwrap().title, "again");
    }

    #[tokio::test]
    async fn test_entries_expire() {
        let cache = DetailCache::with_limits(10, Duration::from_millis(20));
        cache.insert(Movie::new(1, "m")).await;
        assert!(cache.contains(1).await);

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(cache.get(1).await.is_none());
        assert!(!cache.contains(1).await);

        cache.insert(Movie::new(2, "m")).await;
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_prefetch_stays_bounded() {
        let catalog = Arc::new(FakeCatalog::new(1, 1));
        let cache = DetailCache::with_limits(50, Duration::from_secs(60));
        prefetch_details(catalog.clone(), cache.clone(), (0..500).collect());

        for _ in 0..200 {
            if catalog.detail_calls() == 500 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(catalog.detail_calls(), 500);
        assert!(cache.len().await <= 50);
    }

    #[tokio::test]
    async fn test_prefetch_refreshes_expired_entry() {
        let catalog = Arc::new(FakeCatalog::new(1, 1));
        let cache = DetailCache::with_limits(10, Duration::from_millis(20));
        cache.insert(Movie::new(101, "stale")).await;
        tokio::time::sleep(Duration::from_millis(40)).await;

        prefetch_details(catalog.clone(), cache.clone(), vec![101]);
        for _ in 0..100 {
            if cache.contains(101).await {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        assert_eq!(catalog.detail_calls(), 1);
        assert!(cache.get(101).await.unwrap().is_complete());
    }

    #[tokio::test]
    async fn test_prefetch_fills_cache() {
        let catalog = Arc::new(FakeCatalog::new(1, 2));
        let cache = DetailCache::new();
        prefetch_details(catalog.clone(), cache.clone(), vec![101, 102]);
        wait_for_len(&cache, 2).await;

        let movie = cache.get(101).await.unwrap();
        assert!(movie.is_complete());
        assert_eq!(catalog.detail_calls(), 2);
    }

    #[tokio::test]
    async fn test_prefetch_skips_cached_ids() {
        let catalog = Arc::new(FakeCatalog::new(1, 2));
        let cache = DetailCache::new();
        cache.insert(Movie::new(101, "cached")).await;
        prefetch_details(catalog.clone(), cache.clone(), vec![101]);
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(catalog.detail_calls(), 0);
        assert_eq!(cache.get(101).await.unwrap().title, "cached");
    }

    #[tokio::test]
    async fn test_prefetch_failure_is_silent() {
        let catalog = Arc::new(FakeCatalog::new(1, 2));
        catalog.fail_details(true);
        let cache = DetailCache::new();
        prefetch_details(catalog.clone(), cache.clone(), vec![101, 102]);
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(cache.is_empty().await);
        assert_eq!(catalog.detail_calls(), 2);
    }
}
