use serde::{Deserialize, Serialize};

use crate::date::{LocalDate, Timestamp};
use crate::error::ValidationError;
use crate::id::{EntityId, IdKind};
use crate::lifecycle::Lifecycle;
use crate::validation::{check_points, parse_title};

/// One-shot task with a deadline. Its points are not subject to the daily cap.
///
/// Completing a bounty retires it permanently: it becomes `Disabled` with
/// `completed_at` set, and can no longer be put back on the shelf.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BountyTask {
    pub id: EntityId,
    pub title: String,
    pub points: u64,
    pub deadline: LocalDate,
    #[serde(flatten)]
    pub lifecycle: Lifecycle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Timestamp>,
}

impl BountyTask {
    /// Create a new active bounty. The deadline is mandatory.
    pub fn new(title: &str, points: i64, deadline: Option<LocalDate>) -> Result<Self, ValidationError> {
        let title = parse_title(title)?;
        let points = check_points(points)?;
        let deadline = deadline.ok_or(ValidationError::MissingDeadline)?;
        Ok(Self {
            id: EntityId::generate(IdKind::Bounty),
            title,
            points,
            deadline,
            lifecycle: Lifecycle::Active,
            completed_at: None,
        })
    }

    /// A bounty expires the day after its deadline.
    pub fn is_expired(&self, today: LocalDate) -> bool {
        today > self.deadline
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

/// Frozen record of a bounty award. This, not [`BountyTask`], is what bounty
/// earnings are summed from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BountyCompletion {
    pub id: EntityId,
    pub bounty_id: EntityId,
    pub title: String,
    pub points: u64,
    pub deadline: LocalDate,
    pub completed_at: Timestamp,
}

impl BountyCompletion {
    /// Snapshot `bounty` as completed at `completed_at`.
    pub fn of(bounty: &BountyTask, completed_at: Timestamp) -> Self {
        Self {
            id: EntityId::generate(IdKind::BountyCompletion),
            bounty_id: bounty.id.clone(),
            title: bounty.title.clone(),
            points: bounty.points,
            deadline: bounty.deadline,
            completed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::parse_date;
    use serde_json::json;

    #[test]
    fn deadline_is_required() {
        assert_eq!(
            BountyTask::new("Ship it", 500, None),
            Err(ValidationError::MissingDeadline)
        );
    }

    #[test]
    fn expiry_is_strictly_after_deadline() {
        let bounty = BountyTask::new("Ship it", 500, Some(parse_date("2024-06-30").unwrap())).unwrap();
        assert!(!bounty.is_expired(parse_date("2024-06-29").unwrap()));
        assert!(!bounty.is_expired(parse_date("2024-06-30").unwrap()));
        assert!(bounty.is_expired(parse_date("2024-07-01").unwrap()));
    }

    #[test]
    fn decodes_persisted_shape() {
        let bounty: BountyTask = serde_json::from_value(json!({
            "id": "b_1",
            "title": "Marathon",
            "points": 1000,
            "deadline": "2024-10-01",
            "active": false,
            "completedAt": "2024-09-20T07:00:00.000Z"
        }))
        .unwrap();
        assert!(bounty.is_completed());
        assert_eq!(bounty.lifecycle, Lifecycle::Disabled);

        let back = serde_json::to_value(&bounty).unwrap();
        assert_eq!(back["deadline"], "2024-10-01");
        assert!(back.get("completedAt").is_some());
    }

    #[test]
    fn open_bounty_omits_completed_at() {
        let bounty = BountyTask::new("Ship it", 500, Some(parse_date("2024-06-30").unwrap())).unwrap();
        let value = serde_json::to_value(&bounty).unwrap();
        assert!(value.get("completedAt").is_none());
        assert_eq!(value["active"], true);
    }
}
