use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::scoring::{RankConfig, RankPolicy, ScoringConfig};
use crate::sources::{SourceKind, DEFAULT_USER_AGENT};

pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub kind: SourceKind,
    pub nitter_mirrors: Vec<String>,
    pub mastodon_instances: Vec<String>,
    pub timeout_ms: u64,
    pub user_agent: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::Nitter,
            nitter_mirrors: vec![
                "https://xcancel.com".to_string(),
                "https://nitter.poast.org".to_string(),
                "https://nitter.privacydev.net".to_string(),
                "https://nitter.net".to_string(),
            ],
            mastodon_instances: vec![
                "https://mastodon.social".to_string(),
                "https://mastodon.online".to_string(),
                "https://fosstodon.org".to_string(),
            ],
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl SourcesConfig {
    /// Per-request upstream timeout; zero would fail every call, so it falls
    /// back to the default.
    pub fn timeout(&self) -> Duration {
        let millis = if self.timeout_ms == 0 {
            DEFAULT_TIMEOUT_MS
        } else {
            self.timeout_ms
        };
        Duration::from_millis(millis)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub rank: RankConfig,
}

impl AppConfig {
    pub fn load(path: Option<PathBuf>) -> Result<(Self, Option<PathBuf>), String> {
        let config_path = path.or_else(default_config_path);
        let mut config = if let Some(path) = config_path.as_ref() {
            if path.exists() {
                let contents = std::fs::read_to_string(path)
                    .map_err(|err| format!("failed to read config: {}", err))?;
                Self::from_toml(&contents)?
            } else {
                AppConfig::default()
            }
        } else {
            AppConfig::default()
        };

        config.apply_env_overrides();
        Ok((config, config_path))
    }

    pub fn from_toml(contents: &str) -> Result<Self, String> {
        toml::from_str(contents).map_err(|err| format!("failed to parse config: {}", err))
    }

    pub fn write(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|err| format!("failed to create config dir: {}", err))?;
            }
        }
        let payload = toml::to_string_pretty(self)
            .map_err(|err| format!("failed to serialize config: {}", err))?;
        std::fs::write(path, payload)
            .map_err(|err| format!("failed to write config: {}", err))?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(kind) = env::var("SOURCE_KIND") {
            if let Some(kind) = SourceKind::from_str(&kind) {
                self.sources.kind = kind;
            }
        }
        if let Ok(mirrors) = env::var("NITTER_MIRRORS") {
            let mirrors = split_list(&mirrors);
            if !mirrors.is_empty() {
                self.sources.nitter_mirrors = mirrors;
            }
        }
        if let Ok(instances) = env::var("MASTODON_INSTANCES") {
            let instances = split_list(&instances);
            if !instances.is_empty() {
                self.sources.mastodon_instances = instances;
            }
        }
        if let Ok(timeout) = env::var("FETCH_TIMEOUT_MS") {
            if let Ok(value) = timeout.parse::<u64>() {
                self.sources.timeout_ms = value;
            }
        }
        if let Ok(ttl) = env::var("CACHE_TTL_SECS") {
            if let Ok(value) = ttl.parse::<u64>() {
                self.cache.ttl_secs = value;
            }
        }
        if let Ok(capacity) = env::var("CACHE_CAPACITY") {
            if let Ok(value) = capacity.parse::<usize>() {
                self.cache.capacity = if value == 0 { None } else { Some(value) };
            }
        }
        if let Ok(policy) = env::var("RANK_POLICY") {
            if let Some(policy) = RankPolicy::from_str(&policy) {
                self.rank.policy = policy;
            }
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(|item| item.to_string())
        .collect()
}

fn default_config_path() -> Option<PathBuf> {
    env::var("CREATOR_RANK_CONFIG")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| Some(PathBuf::from("config/creator_rank.toml")))
}
