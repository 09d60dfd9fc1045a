pub mod api;
pub mod cache;
pub mod config;
pub mod demo;
pub mod fetcher;
pub mod handle;
pub mod numbers;
pub mod scoring;
pub mod server;
pub mod service;
pub mod sources;

use serde::{Deserialize, Serialize};

pub use demo::demo_stats;
pub use handle::{normalize, Handle, HandleError};
pub use numbers::{parse_count, parse_number};
pub use service::{RankError, RankOutcome, RankService};

/// Fictitious population the global rank is expressed against.
pub const TOTAL_USERS: u64 = 15_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileStats {
    pub followers: u64,
    pub following: u64,
    pub posts: u64,
    pub impressions: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Real,
    Demo,
}

impl DataSource {
    pub fn label(self) -> &'static str {
        match self {
            DataSource::Real => "real",
            DataSource::Demo => "demo",
        }
    }
}

/// Stats chosen for a handle together with where they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedStats {
    pub stats: ProfileStats,
    pub data_source: DataSource,
    pub source: Option<String>,
}

impl FetchedStats {
    pub fn real(stats: ProfileStats, source: impl Into<String>) -> Self {
        Self {
            stats,
            data_source: DataSource::Real,
            source: Some(source.into()),
        }
    }

    pub fn demo(stats: ProfileStats) -> Self {
        Self {
            stats,
            data_source: DataSource::Demo,
            source: None,
        }
    }
}

pub fn format_number(value: u64) -> String {
    let mut chars: Vec<char> = value.to_string().chars().collect();
    let mut result = String::new();
    let mut count = 0usize;

    while let Some(ch) = chars.pop() {
        if count == 3 {
            result.push(',');
            count = 0;
        }
        result.push(ch);
        count += 1;
    }

    result.chars().rev().collect()
}

pub fn format_float(value: f64, digits: usize) -> String {
    format!("{:.1$}", value, digits)
}
