use super::rate::RateSnapshot;
use chrono::{DateTime, TimeDelta, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

/// Source of the current time for cache expiry.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

struct CachedSnapshot {
    snapshot: Arc<RateSnapshot>,
    // `None` when the configured duration is too large to represent.
    expires_at: Option<DateTime<Utc>>,
}

/// Single-slot snapshot cache with a fixed time-to-live.
///
/// A zero duration disables caching: `get` always misses and `put` is a no-op.
/// Each `put` replaces the slot wholesale.
pub struct SnapshotCache {
    ttl: Option<TimeDelta>,
    clock: Arc<dyn Clock>,
    slot: Mutex<Option<CachedSnapshot>>,
}

impl SnapshotCache {
    pub fn new(duration: Duration) -> Self {
        Self::with_clock(duration, Arc::new(SystemClock))
    }

    pub fn with_clock(duration: Duration, clock: Arc<dyn Clock>) -> Self {
        let ttl = if duration.is_zero() {
            None
        } else {
            Some(TimeDelta::from_std(duration).unwrap_or(TimeDelta::MAX))
        };
        Self {
            ttl,
            clock,
            slot: Mutex::new(None),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.ttl.is_some()
    }

    pub async fn get(&self) -> Option<Arc<RateSnapshot>> {
        if !self.is_enabled() {
            return None;
        }
        let slot = self.slot.lock().await;
        match slot.as_ref() {
            Some(entry) => {
                if let Some(expiry) = entry.expires_at {
                    if expiry <= self.clock.now() {
                        debug!("Snapshot cache entry expired at {}", expiry);
                        return None;
                    }
                }
                debug!("Snapshot cache HIT");
                Some(Arc::clone(&entry.snapshot))
            }
            None => {
                debug!("Snapshot cache MISS");
                None
            }
        }
    }

    pub async fn put(&self, snapshot: Arc<RateSnapshot>) {
        let Some(ttl) = self.ttl else {
            return;
        };
        let expires_at = self.clock.now().checked_add_signed(ttl);
        let mut slot = self.slot.lock().await;
        debug!(?expires_at, "Snapshot cache PUT");
        *slot = Some(CachedSnapshot {
            snapshot,
            expires_at,
        });
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::sync::Mutex as StdMutex;

    /// A clock that only moves when told to.
    pub struct ManualClock {
        now: StdMutex<DateTime<Utc>>,
    }

    impl ManualClock {
        pub fn new() -> Self {
            Self {
                now: StdMutex::new(Utc::now()),
            }
        }

        pub fn advance(&self, by: Duration) {
            let mut now = self.now.lock().unwrap();
            *now += TimeDelta::from_std(by).unwrap();
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap()
        }
    }

    fn snapshot(sale: rust_decimal::Decimal) -> Arc<RateSnapshot> {
        Arc::new(RateSnapshot {
            dollar_sale: Some(sale),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_cache_get_put() {
        let cache = SnapshotCache::new(Duration::from_secs(60));

        assert!(cache.get().await.is_none());

        cache.put(snapshot(dec!(515.5))).await;
        let cached = cache.get().await.unwrap();
        assert_eq!(cached.dollar_sale, Some(dec!(515.5)));

        // Overwritten wholesale
        cache.put(snapshot(dec!(520))).await;
        let cached = cache.get().await.unwrap();
        assert_eq!(cached.dollar_sale, Some(dec!(520)));
    }

    #[tokio::test]
    async fn test_cache_disabled_with_zero_duration() {
        let cache = SnapshotCache::new(Duration::ZERO);
        assert!(!cache.is_enabled());

        cache.put(snapshot(dec!(515.5))).await;
        assert!(cache.get().await.is_none());
    }

    #[tokio::test]
    async fn test_cache_expiry_follows_clock() {
        let clock = Arc::new(ManualClock::new());
        let cache = SnapshotCache::with_clock(Duration::from_secs(300), clock.clone());

        cache.put(snapshot(dec!(515.5))).await;

        clock.advance(Duration::from_secs(299));
        assert!(cache.get().await.is_some());

        clock.advance(Duration::from_secs(1));
        assert!(cache.get().await.is_none());
    }

    #[tokio::test]
    async fn test_cache_huge_duration_never_expires() {
        let clock = Arc::new(ManualClock::new());
        let cache = SnapshotCache::with_clock(Duration::MAX, clock.clone());

        cache.put(snapshot(dec!(515.5))).await;
        clock.advance(Duration::from_secs(60 * 60 * 24 * 365));
        assert!(cache.get().await.is_some());
    }
}
