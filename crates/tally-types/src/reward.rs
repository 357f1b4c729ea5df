use serde::{Deserialize, Serialize};

use crate::date::Timestamp;
use crate::error::ValidationError;
use crate::id::{EntityId, IdKind};
use crate::lifecycle::Lifecycle;
use crate::validation::{check_points, parse_title};

/// Something the user can buy with points.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub id: EntityId,
    pub name: String,
    pub cost: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub lifecycle: Lifecycle,
}

impl Reward {
    /// Create a new active reward. A blank description is dropped.
    pub fn new(name: &str, cost: i64, description: Option<&str>) -> Result<Self, ValidationError> {
        let name = parse_title(name)?;
        let cost = check_points(cost)?;
        let description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);
        Ok(Self {
            id: EntityId::generate(IdKind::Reward),
            name,
            cost,
            description,
            lifecycle: Lifecycle::Active,
        })
    }

    /// Build a reward with a fixed id, e.g. for built-in starter content.
    pub fn with_id(id: &str, name: &str, cost: u64, description: &str) -> Self {
        Self {
            id: EntityId::from(id),
            name: name.to_string(),
            cost,
            description: Some(description.to_string()),
            lifecycle: Lifecycle::Active,
        }
    }
}

/// Immutable record of a reward purchase. Copies name and cost so later edits
/// or deletion of the reward do not rewrite history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Redemption {
    pub id: EntityId,
    pub date_time: Timestamp,
    pub reward_id: EntityId,
    pub reward_name: String,
    pub cost: u64,
}

impl Redemption {
    /// Snapshot `reward` as redeemed at `now`.
    pub fn of(reward: &Reward, now: Timestamp) -> Self {
        Self {
            id: EntityId::generate(IdKind::Redemption),
            date_time: now,
            reward_id: reward.id.clone(),
            reward_name: reward.name.clone(),
            cost: reward.cost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn blank_description_is_dropped() {
        let reward = Reward::new("Coffee", 80, Some("   ")).unwrap();
        assert_eq!(reward.description, None);
        assert_eq!(
            serde_json::to_value(&reward).unwrap()["description"],
            serde_json::Value::Null
        );
    }

    #[test]
    fn rejects_non_positive_cost() {
        assert_eq!(
            Reward::new("Coffee", 0, None),
            Err(ValidationError::NonPositivePoints(0))
        );
    }

    #[test]
    fn redemption_snapshots_reward() {
        let mut reward = Reward::with_id("r_coffee", "Coffee", 80, "treat");
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let record = Redemption::of(&reward, now);

        reward.name = "Tea".into();
        reward.cost = 10;

        assert_eq!(record.reward_name, "Coffee");
        assert_eq!(record.cost, 80);
        assert_eq!(record.reward_id.as_str(), "r_coffee");
    }

    #[test]
    fn redemption_uses_camel_case_fields() {
        let parsed: Redemption = serde_json::from_value(json!({
            "id": "x_1",
            "dateTime": "2024-03-01T12:00:00.000Z",
            "rewardId": "r_coffee",
            "rewardName": "Coffee",
            "cost": 80
        }))
        .unwrap();
        assert_eq!(parsed.cost, 80);
        let back = serde_json::to_value(&parsed).unwrap();
        assert!(back.get("rewardName").is_some());
        assert!(back.get("dateTime").is_some());
    }
}
