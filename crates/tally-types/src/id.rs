use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Kind of entity an [`EntityId`] is minted for. Determines the id prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IdKind {
    Task,
    Reward,
    Bounty,
    BountyCompletion,
    Redemption,
    Level,
}

impl IdKind {
    /// Prefix used for freshly generated ids, e.g. `t` for tasks.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Task => "t",
            Self::Reward => "r",
            Self::Bounty => "b",
            Self::BountyCompletion => "bc",
            Self::Redemption => "x",
            Self::Level => "lv",
        }
    }
}

/// Opaque, immutable identity of a stored entity.
///
/// Ids coming from persisted data are accepted as-is (built-in defaults use
/// readable ids such as `t_read`). Ids minted locally are
/// `<prefix>_<uuid v7>`, which keeps them unique and roughly time-ordered.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Mint a new unique id for the given entity kind.
    pub fn generate(kind: IdKind) -> Self {
        Self(format!("{}_{}", kind.prefix(), uuid::Uuid::now_v7().simple()))
    }

    /// Wrap an existing id string. Rejects empty or whitespace-only ids.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        if s.trim().is_empty() {
            return Err(TypeError::InvalidId(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_carry_prefix() {
        let id = EntityId::generate(IdKind::BountyCompletion);
        assert!(id.as_str().starts_with("bc_"));
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = EntityId::generate(IdKind::Task);
        let b = EntityId::generate(IdKind::Task);
        assert_ne!(a, b);
    }

    #[test]
    fn parse_rejects_blank() {
        assert!(EntityId::parse("  ").is_err());
        assert_eq!(EntityId::parse("t_read").unwrap().as_str(), "t_read");
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = EntityId::from("r_coffee");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"r_coffee\"");
    }
}
