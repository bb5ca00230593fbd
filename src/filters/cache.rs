use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use serde::Serialize;
use time::OffsetDateTime;
use tokio::sync::Mutex;

use crate::filters::aggregator::FilterAggregator;
use crate::models::FilterOptions;

const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Payload served for a filter-options request.
#[derive(Debug, Clone, Serialize)]
pub struct FilterOptionsResponse {
    pub success: bool,
    pub data: Arc<FilterOptions>,
    /// Unix milliseconds at which `data` was computed.
    pub timestamp: i64,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    data: Arc<FilterOptions>,
    timestamp: i64,
    computed_at: Instant,
}

impl From<CacheEntry> for FilterOptionsResponse {
    fn from(entry: CacheEntry) -> Self {
        Self {
            success: true,
            data: entry.data,
            timestamp: entry.timestamp,
        }
    }
}

/// Whole-result cache in front of a [`FilterAggregator`].
///
/// The entry is replaced in one swap after a full recomputation, so readers
/// see either the old or the new option set. Concurrent misses wait on a
/// single recomputation instead of running their own.
pub struct FilterOptionsCache {
    aggregator: FilterAggregator,
    ttl: Duration,
    entry: RwLock<Option<CacheEntry>>,
    refresh_lock: Mutex<()>,
    last_timestamp: AtomicI64,
}

impl FilterOptionsCache {
    /// Creates an empty cache with a five minute TTL.
    pub fn new(aggregator: FilterAggregator) -> Self {
        Self {
            aggregator,
            ttl: DEFAULT_TTL,
            entry: RwLock::new(None),
            refresh_lock: Mutex::new(()),
            last_timestamp: AtomicI64::new(0),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn aggregator(&self) -> &FilterAggregator {
        &self.aggregator
    }

    /// Returns the cached filter options, recomputing them when the entry is
    /// missing, older than the TTL, or `refresh` is set.
    pub async fn get(&self, refresh: bool) -> FilterOptionsResponse {
        if !refresh {
            if let Some(entry) = self.fresh_entry() {
                return entry.into();
            }
        }

        let _guard = self.refresh_lock.lock().await;

        // Another caller may have recomputed while we waited.
        if !refresh {
            if let Some(entry) = self.fresh_entry() {
                return entry.into();
            }
        }

        let started = Instant::now();
        let data = Arc::new(self.aggregator.compute().await);
        let entry = CacheEntry {
            data,
            timestamp: self.next_timestamp(),
            computed_at: Instant::now(),
        };
        tracing::info!(
            dimensions = entry.data.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            refresh,
            "filter options recomputed"
        );

        *self.entry.write().unwrap_or_else(PoisonError::into_inner) = Some(entry.clone());
        entry.into()
    }

    /// Drops the cached entry so the next request recomputes.
    pub fn invalidate(&self) {
        *self.entry.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Returns the timestamp of the cached entry, if any.
    pub fn cached_timestamp(&self) -> Option<i64> {
        self.entry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|entry| entry.timestamp)
    }

    fn fresh_entry(&self) -> Option<CacheEntry> {
        self.entry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .filter(|entry| entry.computed_at.elapsed() < self.ttl)
            .cloned()
    }

    /// Current unix milliseconds, forced past the previously issued timestamp.
    fn next_timestamp(&self) -> i64 {
        let now = (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64;
        let previous = self.last_timestamp.load(Ordering::Acquire);
        let timestamp = now.max(previous + 1);
        self.last_timestamp.store(timestamp, Ordering::Release);
        timestamp
    }
}
