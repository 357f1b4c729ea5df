use serde::{Deserialize, Serialize};

use crate::id::{EntityId, IdKind};

/// One major band of the leveling scheme.
///
/// `span` and `segments` are signed on purpose: a hand-edited or imported
/// configuration may hold zero or negative values, and the level engine must
/// be able to see and skip such tiers instead of failing to load the list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelTier {
    pub id: EntityId,
    pub name: String,
    pub span: i64,
    pub segments: i64,
}

impl LevelTier {
    pub fn new(name: &str, span: i64, segments: i64) -> Self {
        Self {
            id: EntityId::generate(IdKind::Level),
            name: name.to_string(),
            span,
            segments,
        }
    }

    /// Build a tier with a fixed id, e.g. for built-in starter content.
    pub fn with_id(id: &str, name: &str, span: i64, segments: i64) -> Self {
        Self {
            id: EntityId::from(id),
            name: name.to_string(),
            span,
            segments,
        }
    }

    /// Usable by the level engine: positive span and at least one segment.
    pub fn is_usable(&self) -> bool {
        self.span > 0 && self.segments >= 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usability() {
        assert!(LevelTier::with_id("a", "Bronze", 500, 5).is_usable());
        assert!(!LevelTier::with_id("b", "Broken", 0, 5).is_usable());
        assert!(!LevelTier::with_id("c", "Broken", 500, 0).is_usable());
        assert!(!LevelTier::with_id("d", "Broken", -10, 2).is_usable());
    }

    #[test]
    fn new_tier_gets_level_prefix() {
        assert!(LevelTier::new("Gold", 2000, 5).id.as_str().starts_with("lv_"));
    }
}
