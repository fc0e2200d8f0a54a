use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use curve_analytics_core::config::InstrumentCodes;
use curve_analytics_core::feed::{FeedEntry, FxFeed, PriceFeed, StaticFeed};

use crate::input;

/// Optional snapshot file per feed column.
#[derive(Debug, Default)]
pub struct SnapshotPaths<'a> {
    pub brent: Option<&'a str>,
    pub px_futures: Option<&'a str>,
    pub pta_futures: Option<&'a str>,
    pub fx: Option<&'a str>,
}

/// Build an in-memory feed from captured snapshot files. Absent files mean
/// absent series, which the engine treats the same as a failed feed.
pub fn snapshot_feed(
    codes: &InstrumentCodes,
    paths: &SnapshotPaths<'_>,
) -> Result<StaticFeed, Box<dyn std::error::Error>> {
    let mut feed = StaticFeed::new();
    let idx = codes.current_session_index;

    if let Some(path) = paths.brent {
        feed.insert_series(&codes.brent, idx, read_entries(path)?);
    }
    if let Some(path) = paths.px_futures {
        feed.insert_series(&codes.px_futures, idx, read_entries(path)?);
    }
    if let Some(path) = paths.pta_futures {
        feed.insert_series(&codes.pta_futures, idx, read_entries(path)?);
    }
    if let Some(path) = paths.fx {
        feed.set_fx(read_entries(path)?);
    }

    Ok(feed)
}

fn read_entries(path: &str) -> Result<Vec<FeedEntry>, Box<dyn std::error::Error>> {
    input::file::read_json(path)
}

/// Timeout boundary around feed calls.
///
/// The engine itself treats feeds as plain blocking calls, so the boundary
/// lives here: the wrapped feed runs on a worker thread and an expired wait
/// yields an empty series, which the engine already handles as a failed
/// feed. The worker is detached; a fetch that eventually returns after the
/// deadline is discarded.
pub struct TimeoutFeed<F> {
    inner: Arc<F>,
    timeout: Duration,
}

impl<F> TimeoutFeed<F> {
    pub fn new(inner: F, timeout: Duration) -> Self {
        TimeoutFeed {
            inner: Arc::new(inner),
            timeout,
        }
    }
}

impl<F> PriceFeed for TimeoutFeed<F>
where
    F: PriceFeed + Send + Sync + 'static,
{
    fn fetch_monthly_series(&self, instrument: &str, field_index: usize) -> Vec<FeedEntry> {
        let (tx, rx) = mpsc::channel();
        let inner = Arc::clone(&self.inner);
        let instrument = instrument.to_string();
        thread::spawn(move || {
            let _ = tx.send(inner.fetch_monthly_series(&instrument, field_index));
        });
        rx.recv_timeout(self.timeout).unwrap_or_default()
    }
}

impl<F> FxFeed for TimeoutFeed<F>
where
    F: FxFeed + Send + Sync + 'static,
{
    fn fetch_fx_series(&self) -> Vec<FeedEntry> {
        let (tx, rx) = mpsc::channel();
        let inner = Arc::clone(&self.inner);
        thread::spawn(move || {
            let _ = tx.send(inner.fetch_fx_series());
        });
        rx.recv_timeout(self.timeout).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    struct SlowFxFeed;

    impl FxFeed for SlowFxFeed {
        fn fetch_fx_series(&self) -> Vec<FeedEntry> {
            thread::sleep(Duration::from_millis(200));
            vec![FeedEntry::new("26/01", Some(dec!(7.12)))]
        }
    }

    #[test]
    fn test_timeout_substitutes_empty_series() {
        let feed = TimeoutFeed::new(SlowFxFeed, Duration::from_millis(20));
        assert!(feed.fetch_fx_series().is_empty());
    }

    #[test]
    fn test_fast_feed_passes_through() {
        let mut inner = StaticFeed::new();
        inner.set_fx(vec![FeedEntry::new("26/01", Some(dec!(7.12)))]);
        inner.insert_series("nf_TA", 8, vec![FeedEntry::new("26/01", Some(dec!(4846)))]);

        let feed = TimeoutFeed::new(inner, Duration::from_secs(5));
        assert_eq!(feed.fetch_fx_series().len(), 1);
        assert_eq!(feed.fetch_monthly_series("nf_TA", 8).len(), 1);
    }
}
