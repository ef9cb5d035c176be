//! Caching layer for itinerary providers.
//!
//! Keys are quantized to the same milli-degree cells the graph uses, so two
//! requests that would land on the same graph nodes share one upstream call.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::trace;

use crate::domain::{Itinerary, Location, TransportMode};

use super::ItineraryProvider;
use super::error::ProviderError;

/// Cache key: (origin source key, destination source key, mode).
type ItineraryKey = (u64, u64, TransportMode);

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
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

/// Provider with caching.
///
/// Wraps another provider and caches successful itineraries. Failures are
/// not cached.
pub struct CachedProvider<P> {
    inner: P,
    cache: MokaCache<ItineraryKey, Arc<Itinerary>>,
}

impl<P> CachedProvider<P> {
    /// Create a new cached provider.
    pub fn new(inner: P, config: &CacheConfig) -> Self {
        let cache = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { inner, cache }
    }

    /// Access the underlying provider for operations that bypass cache.
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Get cache statistics.
    pub fn cache_entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_cache(&self) {
        self.cache.invalidate_all();
    }
}

impl<P: ItineraryProvider> ItineraryProvider for CachedProvider<P> {
    async fn fetch_itinerary(
        &self,
        origin: Location,
        destination: Location,
        mode: TransportMode,
    ) -> Result<Itinerary, ProviderError> {
        let key = (origin.source_key(), destination.source_key(), mode);

        // Try cache first
        if let Some(cached) = self.cache.get(&key).await {
            trace!(%origin, %destination, %mode, "Itinerary cache hit");
            return Ok((*cached).clone());
        }

        let itinerary = self
            .inner
            .fetch_itinerary(origin, destination, mode)
            .await?;

        self.cache.insert(key, Arc::new(itinerary.clone())).await;

        Ok(itinerary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::StraightLineProvider;

    fn loc(lat: f64, lon: f64) -> Location {
        Location::new(lat, lon).unwrap()
    }

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(3600));
        assert_eq!(config.max_capacity, 10_000);
    }

    #[tokio::test]
    async fn second_request_is_served_from_cache() {
        let cached = CachedProvider::new(StraightLineProvider::new(), &CacheConfig::default());
        let (a, b) = (loc(50.0, 14.0), loc(50.1, 14.1));

        let first = cached.fetch_itinerary(a, b, TransportMode::Walk).await.unwrap();
        let second = cached.fetch_itinerary(a, b, TransportMode::Walk).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(cached.inner().call_count(), 1);
    }

    #[tokio::test]
    async fn nearby_coordinates_share_entry() {
        let cached = CachedProvider::new(StraightLineProvider::new(), &CacheConfig::default());

        cached
            .fetch_itinerary(loc(50.0001, 14.0001), loc(50.1, 14.1), TransportMode::Car)
            .await
            .unwrap();
        cached
            .fetch_itinerary(loc(50.0002, 14.0002), loc(50.1, 14.1), TransportMode::Car)
            .await
            .unwrap();

        assert_eq!(cached.inner().call_count(), 1);
    }

    #[tokio::test]
    async fn mode_and_direction_are_part_of_key() {
        let cached = CachedProvider::new(StraightLineProvider::new(), &CacheConfig::default());
        let (a, b) = (loc(50.0, 14.0), loc(50.1, 14.1));

        cached.fetch_itinerary(a, b, TransportMode::Walk).await.unwrap();
        cached.fetch_itinerary(a, b, TransportMode::Car).await.unwrap();
        cached.fetch_itinerary(b, a, TransportMode::Walk).await.unwrap();

        assert_eq!(cached.inner().call_count(), 3);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let provider = StraightLineProvider::new().failing_for(TransportMode::Transit);
        let cached = CachedProvider::new(provider, &CacheConfig::default());
        let (a, b) = (loc(50.0, 14.0), loc(50.1, 14.1));

        assert!(cached.fetch_itinerary(a, b, TransportMode::Transit).await.is_err());
        assert!(cached.fetch_itinerary(a, b, TransportMode::Transit).await.is_err());

        assert_eq!(cached.inner().call_count(), 2);
    }

    #[tokio::test]
    async fn invalidate_forces_refetch() {
        let cached = CachedProvider::new(StraightLineProvider::new(), &CacheConfig::default());
        let (a, b) = (loc(50.0, 14.0), loc(50.1, 14.1));

        cached.fetch_itinerary(a, b, TransportMode::Walk).await.unwrap();
        cached.invalidate_cache();
        cached.fetch_itinerary(a, b, TransportMode::Walk).await.unwrap();

        assert_eq!(cached.inner().call_count(), 2);
    }
}
