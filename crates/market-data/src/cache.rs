//! Single-entry in-memory cache for slowly-changing reference data.
//!
//! Each [`ReferenceCache`] holds at most one complete value (the whole symbol
//! directory, the whole lot-size table). The value is only ever replaced
//! wholesale, and only by a fetch that succeeded. The cache lives as long as
//! the client that owns it.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use tokio::sync::Mutex;

use crate::errors::NseError;

/// Which reference product a cache holds. Used in logs.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ReferenceKind {
    SymbolDirectory,
    LotSizes,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SymbolDirectory => write!(f, "symbol directory"),
            Self::LotSizes => write!(f, "lot sizes"),
        }
    }
}

#[derive(Debug)]
struct CacheEntry<T> {
    value: Arc<T>,
    fetched_at: DateTime<Utc>,
}

/// Cache for one reference product.
///
/// The check-then-replace sequence runs under one async lock, so readers see
/// either the previous value or the complete new one, and concurrent misses
/// share a single fetch.
pub struct ReferenceCache<T> {
    kind: ReferenceKind,
    entry: Mutex<Option<CacheEntry<T>>>,
}

impl<T> ReferenceCache<T> {
    /// An empty cache.
    pub fn new(kind: ReferenceKind) -> Self {
        Self {
            kind,
            entry: Mutex::new(None),
        }
    }

    pub fn kind(&self) -> ReferenceKind {
        self.kind
    }

    /// Return the cached value, or run `fetch` and store its result.
    ///
    /// `fetch` runs when `force_refresh` is set or nothing is cached yet. If
    /// it fails, the stored value is left as it was and the error is returned.
    pub async fn get_or_fetch<F, Fut>(&self, force_refresh: bool, fetch: F) -> Result<Arc<T>, NseError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, NseError>>,
    {
        let mut entry = self.entry.lock().await;

        if !force_refresh {
            if let Some(cached) = entry.as_ref() {
                debug!("Serving cached {} from {}", self.kind, cached.fetched_at);
                return Ok(Arc::clone(&cached.value));
            }
        }

        let value = match fetch().await {
            Ok(value) => Arc::new(value),
            Err(e) => {
                warn!(
                    "Refreshing {} failed, keeping previous entry (cached: {}): {}",
                    self.kind,
                    entry.is_some(),
                    e
                );
                return Err(e);
            }
        };

        let fetched_at = Utc::now();
        *entry = Some(CacheEntry {
            value: Arc::clone(&value),
            fetched_at,
        });
        info!("Cached {} at {}", self.kind, fetched_at);

        Ok(value)
    }

    /// The cached value, without fetching.
    pub async fn get(&self) -> Option<Arc<T>> {
        self.entry
            .lock()
            .await
            .as_ref()
            .map(|cached| Arc::clone(&cached.value))
    }

    pub async fn is_populated(&self) -> bool {
        self.entry.lock().await.is_some()
    }

    /// When the cached value was stored.
    pub async fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.entry.lock().await.as_ref().map(|cached| cached.fetched_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn directory(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_fetches_once_when_cached() {
        let cache = ReferenceCache::new(ReferenceKind::SymbolDirectory);
        let calls = AtomicUsize::new(0);
        let counter = &calls;

        for _ in 0..3 {
            let value = cache
                .get_or_fetch(false, || async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(directory(&[("TCS", "Tata Consultancy Services Limited")]))
                })
                .await
                .unwrap();
            assert_eq!(value.len(), 1);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(cache.is_populated().await);
        assert!(cache.fetched_at().await.is_some());
    }

    #[tokio::test]
    async fn test_force_refresh_replaces_entry() {
        let cache = ReferenceCache::new(ReferenceKind::SymbolDirectory);
        cache
            .get_or_fetch(false, || async { Ok(directory(&[("A", "Old")])) })
            .await
            .unwrap();

        let value = cache
            .get_or_fetch(true, || async { Ok(directory(&[("B", "New")])) })
            .await
            .unwrap();

        assert!(value.contains_key("B"));
        assert!(!value.contains_key("A"));
        assert_eq!(cache.get().await.unwrap().as_ref(), value.as_ref());
    }

    #[tokio::test]
    async fn test_failed_refresh_preserves_entry() {
        let cache = ReferenceCache::new(ReferenceKind::LotSizes);
        cache
            .get_or_fetch(false, || async { Ok(BTreeMap::from([("NIFTY".to_string(), 75_i64)])) })
            .await
            .unwrap();
        let stamped = cache.fetched_at().await;

        let result = cache
            .get_or_fetch(true, || async {
                Err(NseError::EmptyResponse {
                    url: "https://nsearchives.nseindia.com/content/fo/fo_mktlots.csv".to_string(),
                })
            })
            .await;
        assert!(matches!(result, Err(NseError::EmptyResponse { .. })));

        let kept = cache.get().await.unwrap();
        assert_eq!(kept.get("NIFTY"), Some(&75));
        assert_eq!(cache.fetched_at().await, stamped);
    }

    #[tokio::test]
    async fn test_failure_on_empty_cache_stays_empty() {
        let cache: ReferenceCache<BTreeMap<String, String>> =
            ReferenceCache::new(ReferenceKind::SymbolDirectory);
        let result = cache
            .get_or_fetch(false, || async {
                Err(NseError::Timeout {
                    url: "https://nsearchives.nseindia.com/content/equities/EQUITY_L.csv".to_string(),
                })
            })
            .await;
        assert!(result.is_err());
        assert!(!cache.is_populated().await);
        assert!(cache.get().await.is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_misses_share_one_fetch() {
        let cache = Arc::new(ReferenceCache::new(ReferenceKind::SymbolDirectory));
        let calls = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let calls = Arc::clone(&calls);
                tokio::spawn(async move {
                    cache
                        .get_or_fetch(false, || async move {
                            calls.fetch_add(1, Ordering::SeqCst);
                            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
                            Ok(directory(&[("INFY", "Infosys Limited"), ("TCS", "Tata Consultancy Services Limited")]))
                        })
                        .await
                        .unwrap()
                })
            })
            .collect();

        for handle in handles {
            let value = handle.await.unwrap();
            assert_eq!(value.len(), 2);
            assert_eq!(value["INFY"], "Infosys Limited");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_readers_never_see_partial_refresh() {
        let old = directory(&[("A", "Old A"), ("B", "Old B")]);
        let new = directory(&[("C", "New C"), ("D", "New D"), ("E", "New E")]);

        let cache = Arc::new(ReferenceCache::new(ReferenceKind::SymbolDirectory));
        let seeded = old.clone();
        cache
            .get_or_fetch(false, || async move { Ok(seeded) })
            .await
            .unwrap();

        let refresher = {
            let cache = Arc::clone(&cache);
            let replacement = new.clone();
            tokio::spawn(async move {
                cache
                    .get_or_fetch(true, || async move {
                        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
                        Ok(replacement)
                    })
                    .await
                    .unwrap()
            })
        };

        let readers: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                tokio::spawn(async move {
                    let mut seen = Vec::new();
                    for _ in 0..10 {
                        if let Some(value) = cache.get().await {
                            seen.push(value);
                        }
                        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
                    }
                    seen
                })
            })
            .collect();

        let refreshed = refresher.await.unwrap();
        assert_eq!(refreshed.as_ref(), &new);

        for reader in readers {
            for value in reader.await.unwrap() {
                assert!(value.as_ref() == &old || value.as_ref() == &new);
            }
        }
        assert_eq!(cache.get().await.unwrap().as_ref(), &new);
    }

    #[test]
    fn test_kind_display() {
        let cache: ReferenceCache<BTreeMap<String, i64>> = ReferenceCache::new(ReferenceKind::LotSizes);
        assert_eq!(cache.kind(), ReferenceKind::LotSizes);

        assert_eq!(ReferenceKind::SymbolDirectory.to_string(), "symbol directory");
        assert_eq!(ReferenceKind::LotSizes.to_string(), "lot sizes");
    }
}
