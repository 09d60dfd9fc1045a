use crate::ProfileStats;

/// Deterministic stand-in stats used when every source fails.
///
/// Derived from the sum of the lowercased handle's character codes, so the
/// same handle always maps to the same numbers.
pub fn demo_stats(handle: &str) -> ProfileStats {
    let hash = handle
        .to_lowercase()
        .chars()
        .fold(0u64, |acc, ch| acc.wrapping_add(ch as u64));

    let followers = hash.wrapping_mul(137) % 500_000 + 1_500;
    let following = hash.wrapping_mul(73) % 5_000 + 500;
    let posts = hash.wrapping_mul(97) % 50_000 + 1_000;
    let impressions = followers * (hash % 10 + 5);

    ProfileStats {
        followers,
        following,
        posts,
        impressions,
    }
}
