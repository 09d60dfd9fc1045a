use serde::{Deserialize, Serialize};

use crate::ProfileStats;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub followers: f64,
    pub reach: f64,
    pub ratio: f64,
    pub activity: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            followers: 0.4,
            reach: 0.3,
            ratio: 0.2,
            activity: 0.1,
        }
    }
}

impl ScoreWeights {
    /// Rescales the weights so they sum to 1. Non-positive totals fall back
    /// to the defaults.
    pub fn normalized(&self) -> Self {
        let parts = [self.followers, self.reach, self.ratio, self.activity];
        if parts.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Self::default();
        }
        let total: f64 = parts.iter().sum();
        if total <= 0.0 {
            return Self::default();
        }
        if (total - 1.0).abs() < 1e-9 {
            return self.clone();
        }
        Self {
            followers: self.followers / total,
            reach: self.reach / total,
            ratio: self.ratio / total,
            activity: self.activity / total,
        }
    }
}

/// Ceilings applied to each sub-score before weighting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreCaps {
    pub followers: f64,
    pub reach: f64,
    pub ratio: f64,
    pub activity: f64,
}

impl Default for ScoreCaps {
    fn default() -> Self {
        Self {
            followers: 250.0,
            reach: 200.0,
            ratio: 10.0,
            activity: 10.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default)]
    pub weights: ScoreWeights,
    #[serde(default)]
    pub caps: ScoreCaps,
}

#[derive(Debug, Clone)]
pub struct CreatorScorer {
    weights: ScoreWeights,
    caps: ScoreCaps,
}

impl Default for CreatorScorer {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

impl CreatorScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            weights: config.weights.normalized(),
            caps: config.caps,
        }
    }

    pub fn score(&self, stats: &ProfileStats) -> f64 {
        let follower_score = capped(stats.followers as f64 / 1_000.0, self.caps.followers);
        let reach_score = capped(stats.impressions as f64 / 10_000.0, self.caps.reach);
        // following == 0 would blow the ratio up; treat it as 1
        let ratio = stats.followers as f64 / stats.following.max(1) as f64;
        let ratio_score = capped(ratio, self.caps.ratio);
        let activity_score = capped(stats.posts as f64 / 1_000.0, self.caps.activity);

        let score = follower_score * self.weights.followers
            + reach_score * self.weights.reach
            + ratio_score * self.weights.ratio
            + activity_score * self.weights.activity;

        round2(score)
    }
}

fn capped(value: f64, cap: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.max(0.0).min(cap.max(0.0))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
