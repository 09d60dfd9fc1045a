pub mod mastodon;
pub mod nitter;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

use crate::config::SourcesConfig;
use crate::handle::Handle;
use crate::numbers::ParseCountError;
use crate::ProfileStats;

pub use mastodon::MastodonSource;
pub use nitter::NitterSource;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Floor applied to every impressions estimate.
pub const MIN_IMPRESSIONS: u64 = 1_000;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("upstream returned {0}")]
    Status(reqwest::StatusCode),
    #[error("missing field: {0}")]
    MissingField(&'static str),
    #[error("malformed {field}: {source}")]
    Malformed {
        field: &'static str,
        #[source]
        source: ParseCountError,
    },
    #[error("profile has no {0}")]
    Empty(&'static str),
    #[error("unexpected response: {0}")]
    Unexpected(String),
}

/// One upstream able to produce stats for a handle.
pub trait ProfileSource: Send + Sync {
    /// Base URL or other label identifying the upstream.
    fn name(&self) -> &str;

    fn fetch<'a>(&'a self, handle: &'a Handle) -> BoxFuture<'a, Result<ProfileStats, FetchError>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Nitter,
    Mastodon,
}

impl SourceKind {
    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "nitter" | "xcancel" | "twitter" => Some(SourceKind::Nitter),
            "mastodon" | "fediverse" => Some(SourceKind::Mastodon),
            _ => None,
        }
    }
}

pub fn build_client(config: &SourcesConfig) -> Result<reqwest::Client, String> {
    reqwest::Client::builder()
        .timeout(config.timeout())
        .user_agent(config.user_agent.clone())
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(|err| format!("failed to build http client: {}", err))
}

/// Picks the ordered list of upstreams to query for a handle.
///
/// Federated handles always go to their own Mastodon instance.
pub trait SourceSelector: Send + Sync {
    fn select(&self, handle: &Handle) -> Vec<Arc<dyn ProfileSource>>;
}

/// Selector backed by the configured mirror and instance lists.
pub struct ConfiguredSources {
    client: reqwest::Client,
    kind: SourceKind,
    defaults: Vec<Arc<dyn ProfileSource>>,
}

impl ConfiguredSources {
    pub fn from_config(config: &SourcesConfig) -> Result<Self, String> {
        let client = build_client(config)?;
        let defaults: Vec<Arc<dyn ProfileSource>> = match config.kind {
            SourceKind::Nitter => config
                .nitter_mirrors
                .iter()
                .map(|base| Arc::new(NitterSource::new(client.clone(), base)) as Arc<dyn ProfileSource>)
                .collect(),
            SourceKind::Mastodon => config
                .mastodon_instances
                .iter()
                .map(|base| Arc::new(MastodonSource::new(client.clone(), base)) as Arc<dyn ProfileSource>)
                .collect(),
        };
        Ok(Self {
            client,
            kind: config.kind,
            defaults,
        })
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }
}

impl SourceSelector for ConfiguredSources {
    fn select(&self, handle: &Handle) -> Vec<Arc<dyn ProfileSource>> {
        match handle.instance.as_deref() {
            Some(instance) => match instance_base_url(instance) {
                Some(base) => vec![Arc::new(MastodonSource::new(self.client.clone(), &base))],
                None => {
                    warn!(%instance, "refusing to query instance that is not a plain domain");
                    Vec::new()
                }
            },
            None => self.defaults.clone(),
        }
    }
}

/// Fixed list of sources regardless of handle.
pub struct StaticSources(pub Vec<Arc<dyn ProfileSource>>);

impl SourceSelector for StaticSources {
    fn select(&self, _handle: &Handle) -> Vec<Arc<dyn ProfileSource>> {
        self.0.clone()
    }
}

/// HTTPS base URL for a federated instance, or `None` unless the instance is
/// a bare DNS name (no scheme, port, path, userinfo or IP literal).
pub fn instance_base_url(instance: &str) -> Option<String> {
    let host = instance.trim();
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 2 {
        return None;
    }
    let valid_labels = labels.iter().all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });
    // Numeric top-level label means an IPv4 literal.
    let numeric_tld = labels
        .last()
        .map_or(true, |label| label.chars().all(|c| c.is_ascii_digit()));
    if !valid_labels || numeric_tld {
        return None;
    }
    Some(format!("https://{}", host.to_ascii_lowercase()))
}

pub(crate) fn floor_impressions(estimate: u64) -> u64 {
    estimate.max(MIN_IMPRESSIONS)
}
