pub mod rank;
pub mod weighted;

pub use rank::{RankConfig, RankMapper, RankPolicy};
pub use weighted::{CreatorScorer, ScoreCaps, ScoreWeights, ScoringConfig};
