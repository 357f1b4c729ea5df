use serde::{Deserialize, Serialize};

/// Lifecycle of an editable entity (task, reward, bounty).
///
/// Persisted as the pair `active: bool` / `deleted?: bool`. Only three of the
/// four combinations mean anything; `deleted` wins over `active`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "LifecycleFlags", into = "LifecycleFlags")]
pub enum Lifecycle {
    /// Listed and usable.
    #[default]
    Active,
    /// Down-shelved: listed separately, can be re-enabled or deleted.
    Disabled,
    /// Soft-deleted: hidden everywhere, history referencing it is kept.
    Deleted,
}

impl Lifecycle {
    pub fn is_active(self) -> bool {
        self == Self::Active
    }

    pub fn is_deleted(self) -> bool {
        self == Self::Deleted
    }

    /// Flip between `Active` and `Disabled`. Deleted entities stay deleted.
    pub fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Disabled,
            Self::Disabled => Self::Active,
            Self::Deleted => Self::Deleted,
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize)]
struct LifecycleFlags {
    active: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    deleted: bool,
}

impl From<LifecycleFlags> for Lifecycle {
    fn from(flags: LifecycleFlags) -> Self {
        match (flags.active, flags.deleted) {
            (_, true) => Self::Deleted,
            (true, false) => Self::Active,
            (false, false) => Self::Disabled,
        }
    }
}

impl From<Lifecycle> for LifecycleFlags {
    fn from(state: Lifecycle) -> Self {
        match state {
            Lifecycle::Active => Self { active: true, deleted: false },
            Lifecycle::Disabled => Self { active: false, deleted: false },
            Lifecycle::Deleted => Self { active: false, deleted: true },
        }
    }
}
