use serde::{Deserialize, Serialize};

use crate::TOTAL_USERS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankPolicy {
    Piecewise,
    Exponential,
}

impl RankPolicy {
    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "piecewise" | "bands" | "linear" => Some(RankPolicy::Piecewise),
            "exponential" | "exp" => Some(RankPolicy::Exponential),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankConfig {
    pub policy: RankPolicy,
    pub total_users: u64,
    pub exponential_scale: f64,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            policy: RankPolicy::Piecewise,
            total_users: TOTAL_USERS,
            exponential_scale: 25.0,
        }
    }
}

/// Score band mapped linearly onto a slice of the population.
struct Band {
    min_score: f64,
    max_score: f64,
    top_fraction: f64,
    bottom_fraction: f64,
}

// Top 1% score 100+, top 10% score 50+, top half score 10+.
static BANDS: [Band; 4] = [
    Band {
        min_score: 100.0,
        max_score: 200.0,
        top_fraction: 0.0,
        bottom_fraction: 0.01,
    },
    Band {
        min_score: 50.0,
        max_score: 100.0,
        top_fraction: 0.01,
        bottom_fraction: 0.10,
    },
    Band {
        min_score: 10.0,
        max_score: 50.0,
        top_fraction: 0.10,
        bottom_fraction: 0.50,
    },
    Band {
        min_score: 0.0,
        max_score: 10.0,
        top_fraction: 0.50,
        bottom_fraction: 1.0,
    },
];

#[derive(Debug, Clone)]
pub struct RankMapper {
    policy: RankPolicy,
    total_users: u64,
    exponential_scale: f64,
}

impl Default for RankMapper {
    fn default() -> Self {
        Self::new(RankConfig::default())
    }
}

impl RankMapper {
    pub fn new(config: RankConfig) -> Self {
        let scale = config.exponential_scale;
        let exponential_scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            RankConfig::default().exponential_scale
        };
        Self {
            policy: config.policy,
            total_users: config.total_users.max(1),
            exponential_scale,
        }
    }

    pub fn total_users(&self) -> u64 {
        self.total_users
    }

    /// Maps a score to a rank in `[1, total_users]`; higher scores never
    /// produce a worse rank.
    pub fn rank(&self, score: f64) -> u64 {
        if score.is_nan() {
            return self.total_users;
        }
        let raw = match self.policy {
            RankPolicy::Piecewise => self.piecewise(score),
            RankPolicy::Exponential => self.exponential(score),
        };
        self.clamp(raw)
    }

    fn piecewise(&self, score: f64) -> f64 {
        let total = self.total_users as f64;
        let band = BANDS
            .iter()
            .find(|band| score >= band.min_score)
            .unwrap_or(&BANDS[BANDS.len() - 1]);

        let top = (band.top_fraction * total).max(1.0);
        let bottom = (band.bottom_fraction * total).max(top);
        let depth = (band.max_score - score) / (band.max_score - band.min_score);
        top + (bottom - top) * depth
    }

    fn exponential(&self, score: f64) -> f64 {
        let total = self.total_users as f64;
        total * (-score.max(0.0) / self.exponential_scale).exp()
    }

    fn clamp(&self, raw: f64) -> u64 {
        if raw.is_nan() {
            return self.total_users;
        }
        let floored = raw.floor();
        if floored < 1.0 {
            1
        } else if floored >= self.total_users as f64 {
            self.total_users
        } else {
            floored as u64
        }
    }
}
