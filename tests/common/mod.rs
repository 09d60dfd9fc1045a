#![allow(dead_code)]

use creator_rank::cache::StatsCache;
use creator_rank::fetcher::StatsFetcher;
use creator_rank::scoring::{CreatorScorer, RankMapper};
use creator_rank::sources::{FetchError, ProfileSource, StaticSources};
use creator_rank::{Handle, ProfileStats, RankService};
use futures::future::BoxFuture;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Source returning canned stats after an optional delay.
pub struct StubSource {
    name: String,
    stats: Option<ProfileStats>,
    delay: Duration,
    calls: AtomicUsize,
}

impl StubSource {
    pub fn ok(name: &str, stats: ProfileStats) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            stats: Some(stats),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            stats: None,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn slow(name: &str, stats: ProfileStats, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            stats: Some(stats),
            delay,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ProfileSource for StubSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch<'a>(&'a self, _handle: &'a Handle) -> BoxFuture<'a, Result<ProfileStats, FetchError>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.stats.ok_or(FetchError::MissingField("followers"))
        })
    }
}

pub fn stats(followers: u64, following: u64, posts: u64, impressions: u64) -> ProfileStats {
    ProfileStats {
        followers,
        following,
        posts,
        impressions,
    }
}

pub fn fetcher(sources: Vec<Arc<dyn ProfileSource>>, cache: Arc<StatsCache>) -> StatsFetcher {
    StatsFetcher::new(Arc::new(StaticSources(sources)), cache)
}

pub fn service(sources: Vec<Arc<dyn ProfileSource>>, ttl: Duration) -> RankService {
    let cache = Arc::new(StatsCache::new(ttl, None));
    RankService::new(
        fetcher(sources, cache),
        CreatorScorer::default(),
        RankMapper::default(),
    )
}
