use std::fmt;

/// The seven logical keys under which all persisted state lives.
///
/// The persisted key strings keep the versioned `tm_*_v1` names so data and
/// backups written by earlier releases load unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StateKey {
    Tasks,
    Rewards,
    Completions,
    Redemptions,
    Bounties,
    BountyCompletions,
    Levels,
}

impl StateKey {
    /// All keys, in backup order.
    pub const ALL: [StateKey; 7] = [
        Self::Tasks,
        Self::Rewards,
        Self::Completions,
        Self::Redemptions,
        Self::Bounties,
        Self::BountyCompletions,
        Self::Levels,
    ];

    /// Key string used in the store and in backup payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tasks => "tm_tasks_v1",
            Self::Rewards => "tm_rewards_v1",
            Self::Completions => "tm_completions_v1",
            Self::Redemptions => "tm_redemptions_v1",
            Self::Bounties => "tm_bounties_v1",
            Self::BountyCompletions => "tm_bounty_completions_v1",
            Self::Levels => "tm_levels_v1",
        }
    }

    /// Short logical name, for display.
    pub fn name(self) -> &'static str {
        match self {
            Self::Tasks => "tasks",
            Self::Rewards => "rewards",
            Self::Completions => "completions",
            Self::Redemptions => "redemptions",
            Self::Bounties => "bounties",
            Self::BountyCompletions => "bounty_completions",
            Self::Levels => "levels",
        }
    }

    /// Look a key up by its store string.
    pub fn from_store_key(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_keys_are_unique() {
        let mut keys: Vec<_> = StateKey::ALL.iter().map(|k| k.as_str()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 7);
    }

    #[test]
    fn lookup_by_store_key() {
        for key in StateKey::ALL {
            assert_eq!(StateKey::from_store_key(key.as_str()), Some(key));
        }
        assert_eq!(StateKey::from_store_key("tasks"), None);
    }
}
