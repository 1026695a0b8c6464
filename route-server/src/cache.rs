//! Read-through caching for route queries.
//!
//! Route composition is pure but touches every segment operating on the
//! travel day, so repeated queries are served from a cache keyed by the full
//! query tuple. Keys are exact-match; any segment mutation invalidates the
//! whole cache rather than hunting down affected keys (a targeted scheme
//! would need a reverse index from segments to queries).
//!
//! Errors are never cached: a failed composition leaves the key empty so the
//! next query gets a fresh attempt.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::domain::{Itinerary, LocationCode};
use crate::routing::{LocationDirectory, RouteComposer, RouteError, SegmentCatalog};

/// Cache key: one route query as received from the caller.
///
/// The key is the full travel date, not its weekday — segment availability
/// is evaluated per date at query time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteQuery {
    /// Origin location code.
    pub origin: LocationCode,

    /// Destination location code.
    pub destination: LocationCode,

    /// Travel date.
    pub travel_date: NaiveDate,
}

/// A cached itinerary list, shared between the cache and callers.
pub type RouteEntry = Arc<Vec<Itinerary>>;

/// Configuration for the route cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries. Bulk invalidation is the consistency
    /// mechanism; the TTL only bounds memory held for queries nobody
    /// repeats.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60 * 60),
            max_capacity: 10_000,
        }
    }
}

/// Cache of computed route lists, keyed by [`RouteQuery`].
pub struct RouteCache {
    entries: MokaCache<RouteQuery, RouteEntry>,
}

impl RouteCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let entries = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { entries }
    }

    /// Get a cached entry.
    pub async fn get(&self, query: &RouteQuery) -> Option<RouteEntry> {
        self.entries.get(query).await
    }

    /// Insert an entry.
    pub async fn insert(&self, query: RouteQuery, entry: RouteEntry) {
        self.entries.insert(query, entry).await;
    }

    /// Number of cached entries (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.entries.entry_count()
    }

    /// Drop every cached entry.
    ///
    /// Called by the segment write path before a mutation is acknowledged,
    /// so no later query can observe itineraries referencing stale segment
    /// data.
    pub fn invalidate_all(&self) {
        self.entries.invalidate_all();
        debug!("route cache invalidated");
    }
}

/// Route finder with read-through caching.
///
/// Wraps the collaborators behind a [`RouteComposer`] and consults the cache
/// first. Concurrent misses for the same key may compute concurrently; the
/// computation is idempotent, so the only cost is the duplicated work.
pub struct CachedRouteFinder<S> {
    store: Arc<S>,
    cache: Arc<RouteCache>,
}

impl<S: LocationDirectory + SegmentCatalog> CachedRouteFinder<S> {
    /// Create a new finder over the given store and cache.
    pub fn new(store: Arc<S>, cache: Arc<RouteCache>) -> Self {
        Self { store, cache }
    }

    /// Find routes for a query, serving from cache when possible.
    ///
    /// On a miss the result is stored before being returned — including an
    /// empty result, which is a normal outcome, not an error. Composer
    /// errors propagate uncached.
    pub async fn find_routes(&self, query: &RouteQuery) -> Result<RouteEntry, RouteError> {
        if let Some(cached) = self.cache.get(query).await {
            debug!(origin = %query.origin, destination = %query.destination, "route cache hit");
            return Ok(cached);
        }

        let composer = RouteComposer::new(&*self.store, &*self.store);
        let routes =
            composer.find_routes(&query.origin, &query.destination, query.travel_date)?;

        let entry = Arc::new(routes);
        self.cache.insert(query.clone(), entry.clone()).await;

        Ok(entry)
    }

    /// The cache handle, for sharing with the mutation path.
    pub fn cache(&self) -> &Arc<RouteCache> {
        &self.cache
    }

    /// Number of cached entries.
    pub fn cache_entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Location, LocationId, OperatingDays, SegmentId, TransportMode, TransportSegment, Weekday,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn code(s: &str) -> LocationCode {
        LocationCode::parse(s).unwrap()
    }

    fn query(origin: &str, destination: &str) -> RouteQuery {
        RouteQuery {
            origin: code(origin),
            destination: code(destination),
            // 2025-04-07 is a Monday
            travel_date: NaiveDate::from_ymd_opt(2025, 4, 7).unwrap(),
        }
    }

    /// Store that counts collaborator round trips and can be switched into a
    /// failing mode.
    struct CountingStore {
        locations: Vec<Location>,
        segments: Vec<Arc<TransportSegment>>,
        lookups: AtomicUsize,
        fail: std::sync::atomic::AtomicBool,
    }

    impl CountingStore {
        fn new(segments: Vec<Arc<TransportSegment>>) -> Self {
            let locations = vec![
                Location {
                    id: LocationId(1),
                    name: "Istanbul Airport".into(),
                    country: "Turkey".into(),
                    city: "Istanbul".into(),
                    code: code("IST"),
                },
                Location {
                    id: LocationId(2),
                    name: "Heathrow Airport".into(),
                    country: "UK".into(),
                    city: "London".into(),
                    code: code("LHR"),
                },
            ];
            Self {
                locations,
                segments,
                lookups: AtomicUsize::new(0),
                fail: std::sync::atomic::AtomicBool::new(false),
            }
        }

        fn lookup_count(&self) -> usize {
            self.lookups.load(Ordering::SeqCst)
        }
    }

    impl LocationDirectory for CountingStore {
        fn resolve_by_code(&self, code: &LocationCode) -> Result<Location, RouteError> {
            self.locations
                .iter()
                .find(|l| &l.code == code)
                .cloned()
                .ok_or_else(|| RouteError::LocationNotFound(code.clone()))
        }
    }

    impl SegmentCatalog for CountingStore {
        fn segments_operating_on(
            &self,
            day: Weekday,
        ) -> Result<Vec<Arc<TransportSegment>>, RouteError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(RouteError::DataAccess("injected failure".into()));
            }
            Ok(self
                .segments
                .iter()
                .filter(|s| s.operating_days.contains(day))
                .cloned()
                .collect())
        }

        fn segments_operating_on_from(
            &self,
            day: Weekday,
            origin: LocationId,
        ) -> Result<Vec<Arc<TransportSegment>>, RouteError> {
            Ok(self
                .segments_operating_on(day)?
                .into_iter()
                .filter(|s| s.origin == origin)
                .collect())
        }
    }

    fn flight() -> Arc<TransportSegment> {
        Arc::new(TransportSegment {
            id: SegmentId(1),
            origin: LocationId(1),
            destination: LocationId(2),
            mode: TransportMode::Flight,
            operating_days: OperatingDays::every_day(),
        })
    }

    fn finder(store: Arc<CountingStore>) -> CachedRouteFinder<CountingStore> {
        let cache = Arc::new(RouteCache::new(&CacheConfig::default()));
        CachedRouteFinder::new(store, cache)
    }

    #[tokio::test]
    async fn second_call_served_from_cache() {
        let store = Arc::new(CountingStore::new(vec![flight()]));
        let finder = finder(store.clone());
        let q = query("IST", "LHR");

        let first = finder.find_routes(&q).await.unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(store.lookup_count(), 1);

        let second = finder.find_routes(&q).await.unwrap();
        assert_eq!(store.lookup_count(), 1, "hit must not touch the store");
        assert!(Arc::ptr_eq(&first, &second), "hit returns the stored entry");
    }

    #[tokio::test]
    async fn distinct_dates_are_distinct_keys() {
        let store = Arc::new(CountingStore::new(vec![flight()]));
        let finder = finder(store.clone());

        let monday = query("IST", "LHR");
        let mut next_monday = monday.clone();
        next_monday.travel_date = NaiveDate::from_ymd_opt(2025, 4, 14).unwrap();

        finder.find_routes(&monday).await.unwrap();
        finder.find_routes(&next_monday).await.unwrap();

        // Same weekday, same codes, but the key is the full date.
        assert_eq!(store.lookup_count(), 2);
    }

    #[tokio::test]
    async fn empty_results_are_cached() {
        // No segments at all: the query legitimately has no routes.
        let store = Arc::new(CountingStore::new(vec![]));
        let finder = finder(store.clone());
        let q = query("IST", "LHR");

        let first = finder.find_routes(&q).await.unwrap();
        assert!(first.is_empty());
        assert_eq!(store.lookup_count(), 1);

        let second = finder.find_routes(&q).await.unwrap();
        assert!(second.is_empty());
        assert_eq!(store.lookup_count(), 1, "empty result must be cached");
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let store = Arc::new(CountingStore::new(vec![flight()]));
        store.fail.store(true, Ordering::SeqCst);
        let finder = finder(store.clone());
        let q = query("IST", "LHR");

        let err = finder.find_routes(&q).await.unwrap_err();
        assert!(matches!(err, RouteError::DataAccess(_)));
        assert_eq!(store.lookup_count(), 1);

        // Store recovers; the next query must retry, not replay the failure.
        store.fail.store(false, Ordering::SeqCst);
        let routes = finder.find_routes(&q).await.unwrap();
        assert_eq!(routes.len(), 1);
        assert_eq!(store.lookup_count(), 2);
    }

    #[tokio::test]
    async fn not_found_is_not_cached_either() {
        let store = Arc::new(CountingStore::new(vec![flight()]));
        let finder = finder(store.clone());
        let q = query("IST", "ZZZ_UNKNOWN");

        let err = finder.find_routes(&q).await.unwrap_err();
        match err {
            RouteError::LocationNotFound(c) => assert_eq!(c.as_str(), "ZZZ_UNKNOWN"),
            other => panic!("expected LocationNotFound, got {other:?}"),
        }
        assert_eq!(finder.cache_entry_count(), 0);
    }

    #[tokio::test]
    async fn invalidate_all_forces_recomputation() {
        let store = Arc::new(CountingStore::new(vec![flight()]));
        let finder = finder(store.clone());
        let q = query("IST", "LHR");

        finder.find_routes(&q).await.unwrap();
        finder.find_routes(&q).await.unwrap();
        assert_eq!(store.lookup_count(), 1);

        finder.cache().invalidate_all();

        finder.find_routes(&q).await.unwrap();
        assert_eq!(store.lookup_count(), 2, "invalidation must force a recompute");
    }

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(3600));
        assert_eq!(config.max_capacity, 10_000);
    }
}
