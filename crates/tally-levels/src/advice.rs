use tally_types::LevelTier;
use thiserror::Error;

/// Problem with a tier as shown in the tier editor.
///
/// Only [`TierAdvice::UnevenSegments`] still leaves the tier usable; the
/// engine silently skips tiers with the other problems.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TierAdvice {
    #[error("level name must not be empty")]
    EmptyName,

    #[error("span must be positive")]
    NonPositiveSpan,

    #[error("segments must be at least 1")]
    InvalidSegments,

    #[error("span {span} is not divisible by {segments} segments; sub-level boundaries will be fractional")]
    UnevenSegments { span: i64, segments: i64 },
}

impl TierAdvice {
    /// Advisory only; the tier still takes part in level computation.
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::UnevenSegments { .. })
    }
}

/// First problem found with `tier`, if any.
pub fn validate_tier(tier: &LevelTier) -> Option<TierAdvice> {
    if tier.name.trim().is_empty() {
        return Some(TierAdvice::EmptyName);
    }
    if tier.span <= 0 {
        return Some(TierAdvice::NonPositiveSpan);
    }
    if tier.segments < 1 {
        return Some(TierAdvice::InvalidSegments);
    }
    if tier.span % tier.segments != 0 {
        return Some(TierAdvice::UnevenSegments {
            span: tier.span,
            segments: tier.segments,
        });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier(name: &str, span: i64, segments: i64) -> LevelTier {
        LevelTier::with_id("lv", name, span, segments)
    }

    #[test]
    fn clean_tier_has_no_advice() {
        assert_eq!(validate_tier(&tier("Gold", 2000, 5)), None);
    }

    #[test]
    fn checks_run_in_order() {
        assert_eq!(validate_tier(&tier(" ", 0, 0)), Some(TierAdvice::EmptyName));
        assert_eq!(validate_tier(&tier("G", 0, 0)), Some(TierAdvice::NonPositiveSpan));
        assert_eq!(validate_tier(&tier("G", 10, 0)), Some(TierAdvice::InvalidSegments));
    }

    #[test]
    fn uneven_division_is_only_a_warning() {
        let advice = validate_tier(&tier("G", 1000, 3)).unwrap();
        assert!(advice.is_warning());
        assert!(!TierAdvice::NonPositiveSpan.is_warning());
    }
}
