use futures::future::BoxFuture;
use serde::Deserialize;
use tracing::debug;

use crate::handle::Handle;
use crate::sources::{floor_impressions, FetchError, ProfileSource};
use crate::ProfileStats;

const STATUS_SAMPLE: usize = 8;
const ENGAGEMENT_MULTIPLIER: u64 = 8;
const FOLLOWER_REACH_MULTIPLIER: u64 = 2;

/// Reads account counters from a Mastodon instance's public API.
#[derive(Clone)]
pub struct MastodonSource {
    client: reqwest::Client,
    base_url: String,
}

impl MastodonSource {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn fetch_account(&self, handle: &Handle) -> Result<ProfileStats, FetchError> {
        let account = self.lookup(&handle.username).await?;
        let id = account.id.clone().ok_or(FetchError::MissingField("id"))?;

        let impressions = match self.recent_engagement(&id).await {
            Ok(engagement) => floor_impressions(engagement.saturating_mul(ENGAGEMENT_MULTIPLIER)),
            Err(err) => {
                debug!(instance = %self.base_url, error = %err, "timeline unavailable, estimating reach from followers");
                floor_impressions(
                    account
                        .followers_count
                        .unwrap_or(0)
                        .saturating_mul(FOLLOWER_REACH_MULTIPLIER),
                )
            }
        };

        account.into_stats(impressions)
    }

    async fn lookup(&self, username: &str) -> Result<MastodonAccount, FetchError> {
        let url = format!("{}/api/v1/accounts/lookup", self.base_url);
        debug!(%url, username, "looking up mastodon account");
        let response = self
            .client
            .get(url)
            .query(&[("acct", username)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.text().await?;
        parse_account_json(&body)
    }

    async fn recent_engagement(&self, account_id: &str) -> Result<u64, FetchError> {
        let url = format!(
            "{}/api/v1/accounts/{}/statuses",
            self.base_url,
            urlencoding::encode(account_id)
        );
        let limit = STATUS_SAMPLE.to_string();
        let response = self
            .client
            .get(url)
            .query(&[("limit", limit.as_str()), ("exclude_replies", "true")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.text().await?;
        let statuses: Vec<MastodonStatus> = serde_json::from_str(&body)
            .map_err(|err| FetchError::Unexpected(format!("statuses parse failed: {}", err)))?;
        Ok(sum_engagement(&statuses))
    }
}

impl ProfileSource for MastodonSource {
    fn name(&self) -> &str {
        &self.base_url
    }

    fn fetch<'a>(&'a self, handle: &'a Handle) -> BoxFuture<'a, Result<ProfileStats, FetchError>> {
        Box::pin(self.fetch_account(handle))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MastodonAccount {
    pub id: Option<String>,
    pub username: Option<String>,
    pub followers_count: Option<u64>,
    pub following_count: Option<u64>,
    pub statuses_count: Option<u64>,
}

impl MastodonAccount {
    pub fn into_stats(self, impressions: u64) -> Result<ProfileStats, FetchError> {
        Ok(ProfileStats {
            followers: self
                .followers_count
                .ok_or(FetchError::MissingField("followers_count"))?,
            following: self
                .following_count
                .ok_or(FetchError::MissingField("following_count"))?,
            posts: self
                .statuses_count
                .ok_or(FetchError::MissingField("statuses_count"))?,
            impressions,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MastodonStatus {
    #[serde(default)]
    pub replies_count: u64,
    #[serde(default)]
    pub reblogs_count: u64,
    #[serde(default)]
    pub favourites_count: u64,
}

pub fn parse_account_json(body: &str) -> Result<MastodonAccount, FetchError> {
    serde_json::from_str(body)
        .map_err(|err| FetchError::Unexpected(format!("account parse failed: {}", err)))
}

pub fn sum_engagement(statuses: &[MastodonStatus]) -> u64 {
    statuses
        .iter()
        .take(STATUS_SAMPLE)
        .map(|status| {
            status
                .replies_count
                .saturating_add(status.reblogs_count)
                .saturating_add(status.favourites_count)
        })
        .fold(0u64, |acc, value| acc.saturating_add(value))
}
