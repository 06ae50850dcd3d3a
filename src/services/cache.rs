//! Memoized series fetches keyed on the exact (symbol, period, interval).
//!
//! Explicit cache component so expiry and eviction stay testable. Concurrent
//! fetches for the same key coalesce onto one upstream request via a per-key
//! lock; distinct keys never share entries.

use crate::models::{Interval, Period, PriceSeries};
use crate::services::market_data::MarketDataProvider;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    symbol: String,
    period: Period,
    interval: Interval,
}

struct CacheEntry {
    series: PriceSeries,
    fetched_at: Instant,
}

pub struct SeriesCache {
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
    // Per-key fetch locks; taking one before the upstream call is what
    // coalesces identical concurrent requests.
    fetch_locks: Mutex<HashMap<CacheKey, Arc<Mutex<()>>>>,
    ttl: Duration,
    capacity: usize,
}

impl SeriesCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            fetch_locks: Mutex::new(HashMap::new()),
            ttl,
            capacity: capacity.max(1),
        }
    }

    /// Return the cached series for the triple if still fresh, otherwise
    /// fetch through `provider` and memoize the result.
    pub async fn get_or_fetch(
        &self,
        symbol: &str,
        period: Period,
        interval: Interval,
        provider: &(dyn MarketDataProvider + Send + Sync),
    ) -> Result<PriceSeries, Box<dyn std::error::Error + Send + Sync>> {
        let key = CacheKey {
            symbol: symbol.to_string(),
            period,
            interval,
        };

        if let Some(series) = self.lookup(&key).await {
            debug!(symbol, period = %period, interval = %interval, "series cache hit");
            return Ok(series);
        }

        let lock = self.lock_for(&key).await;
        let result = {
            let _guard = lock.lock().await;

            // A coalesced fetch may have filled the entry while we waited.
            if let Some(series) = self.lookup(&key).await {
                debug!(symbol, period = %period, interval = %interval, "series cache hit after coalesce");
                Ok(series)
            } else {
                debug!(symbol, period = %period, interval = %interval, "series cache miss, fetching");
                match provider.fetch_series(symbol, period, interval).await {
                    Ok(series) => {
                        self.insert(key.clone(), series.clone()).await;
                        Ok(series)
                    }
                    Err(e) => Err(e),
                }
            }
        };
        self.release_lock(&key, lock).await;
        result
    }

    /// Number of live (fresh or stale) entries. Test/observability hook.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Number of per-key fetch locks currently held. Test/observability
    /// hook: drains back to zero once no fetch is in flight.
    pub async fn pending_fetch_keys(&self) -> usize {
        self.fetch_locks.lock().await.len()
    }

    async fn lookup(&self, key: &CacheKey) -> Option<PriceSeries> {
        let entries = self.entries.read().await;
        let entry = entries.get(key)?;
        if entry.fetched_at.elapsed() >= self.ttl {
            return None;
        }
        Some(entry.series.clone())
    }

    async fn insert(&self, key: CacheKey, series: PriceSeries) {
        let mut entries = self.entries.write().await;
        entries.insert(
            key,
            CacheEntry {
                series,
                fetched_at: Instant::now(),
            },
        );

        // Bounded: evict the stalest entry once over capacity.
        while entries.len() > self.capacity {
            let stalest = entries
                .iter()
                .min_by_key(|(_, e)| e.fetched_at)
                .map(|(k, _)| k.clone());
            match stalest {
                Some(k) => {
                    entries.remove(&k);
                }
                None => break,
            }
        }
    }

    async fn lock_for(&self, key: &CacheKey) -> Arc<Mutex<()>> {
        let mut locks = self.fetch_locks.lock().await;
        locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drop the per-key lock entry once the last interested fetch is done,
    /// so novel symbols cannot grow the lock map without bound.
    async fn release_lock(&self, key: &CacheKey, lock: Arc<Mutex<()>>) {
        let mut locks = self.fetch_locks.lock().await;
        // Two strong references mean the map and us; anything higher is a
        // coalesced waiter that will release in its turn. Cloning only
        // happens in lock_for under the same map mutex, so the count
        // cannot rise between this check and the removal.
        if Arc::strong_count(&lock) <= 2 {
            locks.remove(key);
        }
    }
}
