use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::cache::StatsCache;
use crate::demo::demo_stats;
use crate::handle::Handle;
use crate::sources::{FetchError, ProfileSource, SourceSelector};
use crate::{FetchedStats, ProfileStats};

/// Races every selected source and keeps the first valid result in list order.
///
/// All attempts are awaited before choosing; slower mirrors are not
/// cancelled once an earlier one succeeds. Bounded by the client timeout.
pub struct StatsFetcher {
    selector: Arc<dyn SourceSelector>,
    cache: Arc<StatsCache>,
}

impl StatsFetcher {
    pub fn new(selector: Arc<dyn SourceSelector>, cache: Arc<StatsCache>) -> Self {
        Self { selector, cache }
    }

    pub async fn fetch(&self, handle: &Handle) -> FetchedStats {
        let key = handle.cache_key();
        if let Some(cached) = self.cache.get(&key).await {
            debug!(handle = %key, age_ms = cached.fetched_at.elapsed().as_millis() as u64, "stats cache hit");
            return cached.fetched;
        }

        let sources = self.selector.select(handle);
        let fetched = match fetch_first_valid(&sources, handle).await {
            Some((source, stats)) => {
                info!(handle = %key, %source, "found live profile stats");
                FetchedStats::real(stats, source)
            }
            None => {
                info!(handle = %key, "using demo stats");
                FetchedStats::demo(demo_stats(&key))
            }
        };

        self.cache.put(key, fetched.clone()).await;
        fetched
    }
}

/// Runs all sources concurrently and returns the first success in list order.
pub async fn fetch_first_valid(
    sources: &[Arc<dyn ProfileSource>],
    handle: &Handle,
) -> Option<(String, ProfileStats)> {
    let attempts = sources.iter().map(|source| async move {
        let result = source.fetch(handle).await;
        (source.name().to_string(), result)
    });
    let settled: Vec<(String, Result<ProfileStats, FetchError>)> = join_all(attempts).await;

    let mut winner = None;
    for (source, result) in settled {
        match result {
            Ok(stats) => {
                if winner.is_none() {
                    winner = Some((source, stats));
                }
            }
            Err(err) => warn!(%source, handle = %handle, error = %err, "profile source failed"),
        }
    }
    winner
}
