//! Edits on the ordered tier list. Tiers carry no history, so every edit is
//! a plain in-place change.

use tally_types::{EntityId, LevelTier};

/// Defaults for a freshly added tier.
pub const NEW_TIER_NAME: &str = "New level";
pub const NEW_TIER_SPAN: i64 = 1000;
pub const NEW_TIER_SEGMENTS: i64 = 5;

/// Partial update of a tier. `None` leaves the field unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TierPatch {
    pub name: Option<String>,
    pub span: Option<i64>,
    pub segments: Option<i64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Append a default tier and return its id.
pub fn add_default(tiers: &mut Vec<LevelTier>) -> EntityId {
    let tier = LevelTier::new(NEW_TIER_NAME, NEW_TIER_SPAN, NEW_TIER_SEGMENTS);
    let id = tier.id.clone();
    tiers.push(tier);
    id
}

/// Apply `patch` to the tier with `id`. Returns `false` if no such tier.
pub fn update(tiers: &mut [LevelTier], id: &EntityId, patch: TierPatch) -> bool {
    let Some(tier) = tiers.iter_mut().find(|t| &t.id == id) else {
        return false;
    };
    if let Some(name) = patch.name {
        tier.name = name;
    }
    if let Some(span) = patch.span {
        tier.span = span;
    }
    if let Some(segments) = patch.segments {
        tier.segments = segments;
    }
    true
}

/// Swap the tier with its neighbour. Returns `false` if the tier is missing
/// or already at that end of the list.
pub fn move_tier(tiers: &mut [LevelTier], id: &EntityId, direction: Direction) -> bool {
    let Some(index) = tiers.iter().position(|t| &t.id == id) else {
        return false;
    };
    let target = match direction {
        Direction::Up if index > 0 => index - 1,
        Direction::Down if index + 1 < tiers.len() => index + 1,
        _ => return false,
    };
    tiers.swap(index, target);
    true
}

/// Remove the tier with `id`. Returns `false` if no such tier.
pub fn remove(tiers: &mut Vec<LevelTier>, id: &EntityId) -> bool {
    let before = tiers.len();
    tiers.retain(|t| &t.id != id);
    tiers.len() != before
}
