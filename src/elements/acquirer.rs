use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::constellation::Constellation;
use crate::elements::cache::ElementCache;
use crate::elements::error::{AcquisitionError, FetchError};
use crate::elements::parsing::parse_element_set;
use crate::elements::source::ElementSource;
use crate::elements::types::SatelliteRecord;

/// Where the records of an [`Acquisition`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Freshness {
    /// Cache entry younger than the refresh interval.
    Cached,
    /// Fetched upstream during this call.
    Fetched,
    /// Upstream failed; served from an expired cache entry.
    Stale,
}

#[derive(Debug, Clone)]
pub struct Acquisition {
    pub records: Vec<SatelliteRecord>,
    pub freshness: Freshness,
}

impl Acquisition {
    pub fn is_degraded(&self) -> bool {
        self.freshness == Freshness::Stale
    }
}

pub struct ElementAcquirer {
    cache: Arc<ElementCache>,
    source: Arc<dyn ElementSource>,
    refresh_interval: Duration,
    fetch_timeout: Duration,
}

impl ElementAcquirer {
    pub fn new(
        cache: Arc<ElementCache>,
        source: Arc<dyn ElementSource>,
        refresh_interval: Duration,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            cache,
            source,
            refresh_interval,
            fetch_timeout,
        }
    }

    pub async fn acquire(
        &self,
        constellation: Constellation,
        max_records: usize,
    ) -> Result<Acquisition, AcquisitionError> {
        if !self.cache.is_stale(constellation, self.refresh_interval) {
            if let Some(set) = self.cache.get(constellation) {
                log::debug!("Serving {} from cache ({})", constellation, set.fetched_at);
                return Ok(Acquisition {
                    records: parse_element_set(&set.raw_text, max_records),
                    freshness: Freshness::Cached,
                });
            }
        }

        let cause = match self.fetch(constellation).await {
            Ok(raw_text) => {
                let records = parse_element_set(&raw_text, max_records);
                let cache = Arc::clone(&self.cache);
                let stored =
                    tokio::task::spawn_blocking(move || cache.put(constellation, raw_text)).await;
                if let Err(e) = stored {
                    log::error!("Cache update for {} failed: {}", constellation, e);
                }
                log::info!("Fetched {} element sets for {}", records.len(), constellation);
                return Ok(Acquisition {
                    records,
                    freshness: Freshness::Fetched,
                });
            }
            Err(e) => e,
        };

        match self.cache.get(constellation) {
            Some(set) => {
                log::warn!(
                    "Fetch for {} failed ({}), serving cached elements from {}",
                    constellation,
                    cause,
                    set.fetched_at
                );
                Ok(Acquisition {
                    records: parse_element_set(&set.raw_text, max_records),
                    freshness: Freshness::Stale,
                })
            }
            None => Err(AcquisitionError {
                constellation,
                cause,
            }),
        }
    }

    /// One bounded upstream attempt. Bodies with no usable element set count
    /// as failures so they never replace a good cache entry.
    async fn fetch(&self, constellation: Constellation) -> Result<String, FetchError> {
        let raw_text = tokio::time::timeout(
            self.fetch_timeout,
            self.source.fetch(constellation.group()),
        )
        .await
        .map_err(|_| FetchError::Timeout(self.fetch_timeout))??;

        if parse_element_set(&raw_text, 1).is_empty() {
            return Err(FetchError::Empty);
        }
        Ok(raw_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    const ELEMENTS: &str = "IRIDIUM 106
1 41917U 17003A   24001.50000000  .00000100  00000-0  30000-4 0  9993
2 41917  86.3940 120.0000 0002000  90.0000 270.0000 14.34218000370000
IRIDIUM 103
1 41918U 17003B   24001.50000000  .00000100  00000-0  30000-4 0  9994
2 41918  86.3940 120.0000 0002000  90.0000 300.0000 14.34218000370005
";

    enum Reply {
        Body(&'static str),
        Fail,
        Hang,
    }

    struct StubSource {
        reply: Reply,
        calls: AtomicUsize,
    }

    impl StubSource {
        fn new(reply: Reply) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ElementSource for StubSource {
        async fn fetch(&self, _group: &str) -> Result<String, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.reply {
                Reply::Body(body) => Ok(body.to_string()),
                Reply::Fail => Err(FetchError::Status(503)),
                Reply::Hang => {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok(ELEMENTS.to_string())
                }
            }
        }
    }

    fn acquirer(dir: &TempDir, source: Arc<StubSource>) -> (ElementAcquirer, Arc<ElementCache>) {
        let cache = Arc::new(ElementCache::open(dir.path().to_path_buf()).unwrap());
        let acquirer = ElementAcquirer::new(
            cache.clone(),
            source,
            Duration::from_secs(6 * 3600),
            Duration::from_millis(200),
        );
        (acquirer, cache)
    }

    #[tokio::test]
    async fn second_call_within_interval_uses_cache() {
        let dir = TempDir::new().unwrap();
        let source = StubSource::new(Reply::Body(ELEMENTS));
        let (acquirer, _) = acquirer(&dir, source.clone());

        let first = acquirer.acquire(Constellation::Iridium, 10).await.unwrap();
        let second = acquirer.acquire(Constellation::Iridium, 10).await.unwrap();

        assert_eq!(first.freshness, Freshness::Fetched);
        assert_eq!(second.freshness, Freshness::Cached);
        assert_eq!(first.records, second.records);
        assert_eq!(first.records.len(), 2);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn respects_max_records() {
        let dir = TempDir::new().unwrap();
        let (acquirer, _) = acquirer(&dir, StubSource::new(Reply::Body(ELEMENTS)));
        let acquisition = acquirer.acquire(Constellation::Iridium, 1).await.unwrap();
        assert_eq!(acquisition.records.len(), 1);
    }

    #[tokio::test]
    async fn failed_fetch_falls_back_to_stale_cache() {
        let dir = TempDir::new().unwrap();
        let source = StubSource::new(Reply::Fail);
        let (acquirer, cache) = acquirer(&dir, source.clone());
        cache.put_at(
            Constellation::Iridium,
            ELEMENTS.to_string(),
            chrono::Utc::now() - chrono::Duration::days(2),
        );

        let acquisition = acquirer.acquire(Constellation::Iridium, 10).await.unwrap();
        assert!(acquisition.is_degraded());
        assert_eq!(acquisition.records.len(), 2);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn failed_fetch_without_cache_is_an_error() {
        let dir = TempDir::new().unwrap();
        let (acquirer, _) = acquirer(&dir, StubSource::new(Reply::Fail));

        let err = acquirer.acquire(Constellation::Starlink, 10).await.unwrap_err();
        assert_eq!(err.constellation, Constellation::Starlink);
        assert!(matches!(err.cause, FetchError::Status(503)));
    }

    #[tokio::test]
    async fn timeout_counts_as_failure() {
        let dir = TempDir::new().unwrap();
        let (acquirer, _) = acquirer(&dir, StubSource::new(Reply::Hang));

        let err = acquirer.acquire(Constellation::Kuiper, 10).await.unwrap_err();
        assert!(matches!(err.cause, FetchError::Timeout(_)));
    }

    #[tokio::test]
    async fn unparseable_body_does_not_overwrite_cache() {
        let dir = TempDir::new().unwrap();
        let (acquirer, cache) = acquirer(&dir, StubSource::new(Reply::Body("<html>429</html>")));
        let old = chrono::Utc::now() - chrono::Duration::days(1);
        cache.put_at(Constellation::Iridium, ELEMENTS.to_string(), old);

        let acquisition = acquirer.acquire(Constellation::Iridium, 10).await.unwrap();
        assert_eq!(acquisition.freshness, Freshness::Stale);
        assert_eq!(cache.get(Constellation::Iridium).unwrap().fetched_at, old);
    }
}
