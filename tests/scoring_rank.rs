use creator_rank::scoring::{
    CreatorScorer, RankConfig, RankMapper, RankPolicy, ScoreCaps, ScoreWeights, ScoringConfig,
};
use creator_rank::{demo_stats, ProfileStats, TOTAL_USERS};

fn stats(followers: u64, following: u64, posts: u64, impressions: u64) -> ProfileStats {
    ProfileStats {
        followers,
        following,
        posts,
        impressions,
    }
}

#[test]
fn scorer_matches_weighted_formula() {
    let scorer = CreatorScorer::default();
    let score = scorer.score(&stats(10_000, 1_000, 2_000, 50_000));

    // 10 * 0.4 + 5 * 0.3 + 10 * 0.2 + 2 * 0.1
    assert!((score - 7.7).abs() < 1e-9);
}

#[test]
fn scorer_scores_demo_alice() {
    let scorer = CreatorScorer::default();
    let score = scorer.score(&demo_stats("alice"));
    assert!((score - 42.25).abs() < 1e-9);
}

#[test]
fn scorer_rounds_to_two_decimals() {
    let scorer = CreatorScorer::default();
    let score = scorer.score(&stats(1_234, 777, 3_333, 12_345));
    assert!(((score * 100.0).round() - score * 100.0).abs() < 1e-6);
}

#[test]
fn scorer_guards_zero_following() {
    let scorer = CreatorScorer::default();
    let score = scorer.score(&stats(5_000, 0, 10, 0));
    assert!(score.is_finite());

    // ratio is capped at 10: 5 * 0.4 + 10 * 0.2 + 0.01 * 0.1
    assert!((score - 4.0).abs() < 1e-9);
}

#[test]
fn scorer_caps_every_factor() {
    let scorer = CreatorScorer::default();
    let score = scorer.score(&stats(u64::MAX, 1, u64::MAX, u64::MAX));
    assert!((score - 163.0).abs() < 1e-9);
}

#[test]
fn scorer_is_monotonic_in_followers_impressions_and_posts() {
    let scorer = CreatorScorer::default();
    let base = stats(1_000, 2_000, 500, 5_000);

    let mut previous = scorer.score(&base);
    for followers in (1_000..400_000).step_by(7_919) {
        let score = scorer.score(&ProfileStats { followers, ..base });
        assert!(score >= previous, "followers {} lowered score", followers);
        previous = score;
    }

    let mut previous = scorer.score(&base);
    for impressions in (5_000..3_000_000).step_by(48_611) {
        let score = scorer.score(&ProfileStats { impressions, ..base });
        assert!(score >= previous, "impressions {} lowered score", impressions);
        previous = score;
    }

    let mut previous = scorer.score(&base);
    for posts in (500..20_000).step_by(313) {
        let score = scorer.score(&ProfileStats { posts, ..base });
        assert!(score >= previous, "posts {} lowered score", posts);
        previous = score;
    }
}

#[test]
fn scorer_is_non_increasing_in_following() {
    let scorer = CreatorScorer::default();
    let base = stats(2_000, 2_001, 100, 1_000);

    let mut previous = scorer.score(&base);
    for following in (2_001..200_000).step_by(997) {
        let score = scorer.score(&ProfileStats { following, ..base });
        assert!(score <= previous, "following {} raised score", following);
        previous = score;
    }
}

#[test]
fn scorer_normalizes_custom_weights() {
    let config = ScoringConfig {
        weights: ScoreWeights {
            followers: 9.0,
            reach: 5.0,
            ratio: 4.0,
            activity: 2.0,
        },
        caps: ScoreCaps::default(),
    };
    let scorer = CreatorScorer::new(config);
    let score = scorer.score(&stats(10_000, 1_000, 2_000, 50_000));

    // 10 * 0.45 + 5 * 0.25 + 10 * 0.2 + 2 * 0.1
    assert!((score - 7.95).abs() < 1e-9);
}

#[test]
fn piecewise_rank_hits_band_edges() {
    let mapper = RankMapper::default();
    assert_eq!(mapper.total_users(), TOTAL_USERS);
    assert_eq!(mapper.rank(200.0), 1);
    assert_eq!(mapper.rank(100.0), 150_000);
    assert_eq!(mapper.rank(50.0), 1_500_000);
    assert_eq!(mapper.rank(10.0), 7_500_000);
    assert_eq!(mapper.rank(0.0), TOTAL_USERS);
}

#[test]
fn rank_is_clamped_for_out_of_range_scores() {
    for policy in [RankPolicy::Piecewise, RankPolicy::Exponential] {
        let mapper = RankMapper::new(RankConfig {
            policy,
            ..RankConfig::default()
        });
        assert_eq!(mapper.rank(10_000.0), 1);
        assert_eq!(mapper.rank(f64::INFINITY), 1);
        assert_eq!(mapper.rank(-50.0), TOTAL_USERS);
        assert_eq!(mapper.rank(f64::NAN), TOTAL_USERS);
    }
}

#[test]
fn rank_is_monotonic_and_bounded() {
    for policy in [RankPolicy::Piecewise, RankPolicy::Exponential] {
        let mapper = RankMapper::new(RankConfig {
            policy,
            ..RankConfig::default()
        });
        let mut previous = u64::MAX;
        for step in 0..=25_000 {
            let score = step as f64 / 100.0;
            let rank = mapper.rank(score);
            assert!(rank >= 1 && rank <= TOTAL_USERS);
            assert!(rank <= previous, "{:?} rank rose at score {}", policy, score);
            previous = rank;
        }
    }
}

#[test]
fn rank_respects_custom_population() {
    let mapper = RankMapper::new(RankConfig {
        total_users: 1_000,
        ..RankConfig::default()
    });
    assert_eq!(mapper.total_users(), 1_000);
    assert_eq!(mapper.rank(0.0), 1_000);
    assert_eq!(mapper.rank(150.0), 5);
}

#[test]
fn rank_policy_parses_aliases() {
    assert_eq!(RankPolicy::from_str("Exponential"), Some(RankPolicy::Exponential));
    assert_eq!(RankPolicy::from_str(" piecewise "), Some(RankPolicy::Piecewise));
    assert_eq!(RankPolicy::from_str("random"), None);
}
