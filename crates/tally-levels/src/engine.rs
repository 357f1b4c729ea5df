use serde::Serialize;
use tally_types::LevelTier;
use tracing::debug;

use crate::roman::roman;

/// Position of a points total within a resolved tier.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LevelStatus {
    pub total_points: u64,
    /// 0-based index into the usable tiers.
    pub tier_index: usize,
    pub tier_name: String,
    /// 1-based, within `1..=sub_total`.
    pub sub_index: u64,
    pub sub_total: u64,
    pub tier_span: u64,
    /// Points into the current tier. May exceed `tier_span` in the last tier.
    pub tier_progress: u64,
    /// `tier_span / sub_total`; fractional when the span does not divide.
    pub sub_span: f64,
    pub sub_progress: f64,
    pub label: String,
}

/// Result of the level engine.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Standing {
    /// No usable tier is configured.
    Unconfigured { total_points: u64 },
    Ranked(LevelStatus),
}

impl Standing {
    pub const UNCONFIGURED_LABEL: &'static str = "No levels configured";

    pub fn label(&self) -> &str {
        match self {
            Self::Unconfigured { .. } => Self::UNCONFIGURED_LABEL,
            Self::Ranked(status) => &status.label,
        }
    }

    pub fn total_points(&self) -> u64 {
        match self {
            Self::Unconfigured { total_points } => *total_points,
            Self::Ranked(status) => status.total_points,
        }
    }

    pub fn status(&self) -> Option<&LevelStatus> {
        match self {
            Self::Unconfigured { .. } => None,
            Self::Ranked(status) => Some(status),
        }
    }
}

/// Resolve `lifetime_earned` against `tiers`.
///
/// Tiers with a non-positive span or fewer than one segment are skipped.
/// Each remaining tier consumes its span in list order; the last one never
/// advances and absorbs any overflow. Negative input counts as zero.
pub fn compute_standing(lifetime_earned: i64, tiers: &[LevelTier]) -> Standing {
    let total = u64::try_from(lifetime_earned).unwrap_or(0);
    let usable: Vec<&LevelTier> = tiers.iter().filter(|t| t.is_usable()).collect();
    if usable.len() != tiers.len() {
        debug!(skipped = tiers.len() - usable.len(), "ignoring unusable level tiers");
    }
    let Some(last) = usable.len().checked_sub(1) else {
        return Standing::Unconfigured { total_points: total };
    };

    let mut remaining = total;
    let mut index = 0;
    while index < last && remaining >= span_of(usable[index]) {
        remaining -= span_of(usable[index]);
        index += 1;
    }

    let tier = usable[index];
    let span = span_of(tier);
    let segments = tier.segments as u64;

    // floor(remaining / (span / segments)), kept in integers so uneven
    // spans cannot round a boundary the wrong way.
    let raw_index = (remaining as u128 * segments as u128 / span as u128) + 1;
    let sub_index = raw_index.clamp(1, segments as u128) as u64;
    let sub_span = span as f64 / segments as f64;
    let sub_start = ((sub_index - 1) as u128 * span as u128) as f64 / segments as f64;
    let sub_progress = remaining as f64 - sub_start;

    let label = if segments > 1 {
        format!("{} {}", tier.name, roman(sub_index))
    } else {
        tier.name.clone()
    };

    Standing::Ranked(LevelStatus {
        total_points: total,
        tier_index: index,
        tier_name: tier.name.clone(),
        sub_index,
        sub_total: segments,
        tier_span: span,
        tier_progress: remaining,
        sub_span,
        sub_progress,
        label,
    })
}

fn span_of(tier: &LevelTier) -> u64 {
    tier.span as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tier(name: &str, span: i64, segments: i64) -> LevelTier {
        LevelTier::with_id(&format!("lv_{name}"), name, span, segments)
    }

    fn ranked(standing: Standing) -> LevelStatus {
        match standing {
            Standing::Ranked(s) => s,
            Standing::Unconfigured { .. } => panic!("expected a ranked standing"),
        }
    }

    fn two_tiers() -> Vec<LevelTier> {
        vec![tier("Bronze", 500, 5), tier("Silver", 1000, 5)]
    }

    #[test]
    fn six_hundred_points_is_second_tier_first_segment() {
        let s = ranked(compute_standing(600, &two_tiers()));
        assert_eq!(s.tier_index, 1);
        assert_eq!(s.tier_progress, 100);
        assert_eq!(s.sub_index, 1);
        assert_eq!(s.label, "Silver I");
    }

    #[test]
    fn zero_points_is_start_of_first_tier() {
        let s = ranked(compute_standing(0, &two_tiers()));
        assert_eq!(s.tier_index, 0);
        assert_eq!(s.sub_index, 1);
        assert_eq!(s.tier_progress, 0);
        assert_eq!(s.sub_progress, 0.0);
        assert_eq!(s.label, "Bronze I");
    }

    #[test]
    fn negative_points_clamp_to_zero() {
        let s = ranked(compute_standing(-250, &two_tiers()));
        assert_eq!(s.total_points, 0);
        assert_eq!(s.tier_index, 0);
    }

    #[test]
    fn exact_boundary_advances() {
        let s = ranked(compute_standing(500, &two_tiers()));
        assert_eq!(s.tier_index, 1);
        assert_eq!(s.tier_progress, 0);

        let s = ranked(compute_standing(499, &two_tiers()));
        assert_eq!(s.tier_index, 0);
        assert_eq!(s.sub_index, 5);
        assert_eq!(s.label, "Bronze V");
        assert_eq!(s.sub_progress, 99.0);
    }

    #[test]
    fn last_tier_absorbs_overflow() {
        let s = ranked(compute_standing(10_000, &two_tiers()));
        assert_eq!(s.tier_index, 1);
        assert_eq!(s.tier_progress, 9_500);
        assert_eq!(s.sub_index, 5);
        assert_eq!(s.sub_progress, 9_500.0 - 800.0);
    }

    #[test]
    fn single_segment_label_is_plain_name() {
        let s = ranked(compute_standing(10, &[tier("Novice", 100, 1)]));
        assert_eq!(s.label, "Novice");
        assert_eq!(s.sub_total, 1);
    }

    #[test]
    fn invalid_tiers_are_skipped() {
        let tiers = vec![
            tier("Broken", 0, 5),
            tier("Bronze", 500, 5),
            tier("AlsoBroken", 300, 0),
            tier("Silver", 1000, 5),
        ];
        let s = ranked(compute_standing(600, &tiers));
        assert_eq!(s.tier_name, "Silver");
        assert_eq!(s.tier_index, 1);
    }

    #[test]
    fn no_usable_tier_is_unconfigured() {
        assert_eq!(
            compute_standing(42, &[]),
            Standing::Unconfigured { total_points: 42 }
        );
        let standing = compute_standing(42, &[tier("Broken", -1, 3)]);
        assert_eq!(standing.label(), Standing::UNCONFIGURED_LABEL);
        assert!(standing.status().is_none());
    }

    #[test]
    fn uneven_span_gives_fractional_sub_span() {
        let s = ranked(compute_standing(400, &[tier("Odd", 1000, 3)]));
        assert!((s.sub_span - 1000.0 / 3.0).abs() < 1e-9);
        assert_eq!(s.sub_index, 2);
        assert!((s.sub_progress - (400.0 - 1000.0 / 3.0)).abs() < 1e-9);
    }

    #[test]
    fn uneven_boundary_is_exact() {
        // 1000 / 3 * 2 = 666.67, so 666 is still segment 2 and 667 is segment 3.
        let tiers = [tier("Odd", 1000, 3)];
        assert_eq!(ranked(compute_standing(666, &tiers)).sub_index, 2);
        assert_eq!(ranked(compute_standing(667, &tiers)).sub_index, 3);
    }

    #[test]
    fn reordering_tiers_changes_level() {
        let mut tiers = two_tiers();
        let before = ranked(compute_standing(700, &tiers));
        tiers.reverse();
        let after = ranked(compute_standing(700, &tiers));
        assert_eq!(before.tier_name, "Silver");
        assert_eq!(after.tier_name, "Silver");
        assert_eq!(before.tier_progress, 200);
        assert_eq!(after.tier_progress, 700);
    }

    fn arb_tiers() -> impl Strategy<Value = Vec<LevelTier>> {
        prop::collection::vec((1i64..5_000, 1i64..12), 1..6).prop_map(|specs| {
            specs
                .into_iter()
                .enumerate()
                .map(|(i, (span, segments))| tier(&format!("T{i}"), span, segments))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn standing_is_always_in_range(points in -1_000i64..100_000, tiers in arb_tiers()) {
            let s = ranked(compute_standing(points, &tiers));
            prop_assert!(s.tier_index < tiers.len());
            prop_assert!(s.sub_index >= 1 && s.sub_index <= s.sub_total);
            prop_assert!(s.sub_progress >= 0.0);
            if s.tier_index + 1 < tiers.len() {
                prop_assert!(s.tier_progress < s.tier_span);
            }
        }

        #[test]
        fn consumed_spans_plus_progress_is_total(points in 0i64..100_000, tiers in arb_tiers()) {
            let s = ranked(compute_standing(points, &tiers));
            let consumed: i64 = tiers[..s.tier_index].iter().map(|t| t.span).sum();
            prop_assert_eq!(consumed as u64 + s.tier_progress, points as u64);
        }
    }
}
