use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::cache::StatsCache;
use crate::config::AppConfig;
use crate::fetcher::StatsFetcher;
use crate::handle::{Handle, HandleError};
use crate::scoring::{CreatorScorer, RankMapper};
use crate::sources::{ConfiguredSources, SourceSelector};
use crate::{DataSource, ProfileStats};

#[derive(Debug, Error)]
pub enum RankError {
    #[error(transparent)]
    InvalidHandle(#[from] HandleError),
    #[error("{0}")]
    Internal(String),
}

#[derive(Debug, Clone)]
pub struct RankOutcome {
    pub handle: String,
    pub stats: ProfileStats,
    pub score: f64,
    pub global_rank: u64,
    pub total_users: u64,
    pub data_source: DataSource,
    pub source: Option<String>,
}

/// Normalize, fetch, score and rank in one call.
pub struct RankService {
    fetcher: StatsFetcher,
    scorer: CreatorScorer,
    rank_mapper: RankMapper,
}

impl RankService {
    pub fn new(fetcher: StatsFetcher, scorer: CreatorScorer, rank_mapper: RankMapper) -> Self {
        Self {
            fetcher,
            scorer,
            rank_mapper,
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, String> {
        let selector: Arc<dyn SourceSelector> = Arc::new(ConfiguredSources::from_config(&config.sources)?);
        let cache = Arc::new(StatsCache::from_config(&config.cache));
        Ok(Self::new(
            StatsFetcher::new(selector, cache),
            CreatorScorer::new(config.scoring.clone()),
            RankMapper::new(config.rank.clone()),
        ))
    }

    pub async fn rank(&self, raw_handle: &str) -> Result<RankOutcome, RankError> {
        let handle = Handle::parse(raw_handle)?;
        let fetched = self.fetcher.fetch(&handle).await;

        let score = self.scorer.score(&fetched.stats);
        if !score.is_finite() {
            return Err(RankError::Internal(format!("score is not finite for {}", handle)));
        }
        let global_rank = self.rank_mapper.rank(score);

        info!(
            handle = %handle,
            score,
            global_rank,
            data_source = fetched.data_source.label(),
            "ranked creator"
        );

        Ok(RankOutcome {
            handle: handle.to_string(),
            stats: fetched.stats,
            score,
            global_rank,
            total_users: self.rank_mapper.total_users(),
            data_source: fetched.data_source,
            source: fetched.source,
        })
    }
}
