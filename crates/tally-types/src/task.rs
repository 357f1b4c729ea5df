use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::{EntityId, IdKind};
use crate::lifecycle::Lifecycle;
use crate::validation::{check_points, parse_title};

/// Recurring daily task. Completing it on a date contributes `points` to that
/// date's capped total.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: EntityId,
    pub title: String,
    pub points: u64,
    #[serde(flatten)]
    pub lifecycle: Lifecycle,
}

impl Task {
    /// Create a new active task with a fresh id.
    pub fn new(title: &str, points: i64) -> Result<Self, ValidationError> {
        Ok(Self {
            id: EntityId::generate(IdKind::Task),
            title: parse_title(title)?,
            points: check_points(points)?,
            lifecycle: Lifecycle::Active,
        })
    }

    /// Build a task with a fixed id, e.g. for built-in starter content.
    pub fn with_id(id: &str, title: &str, points: u64) -> Self {
        Self {
            id: EntityId::from(id),
            title: title.to_string(),
            points,
            lifecycle: Lifecycle::Active,
        }
    }

    /// Whether the task shows up in any list (active or down-shelved).
    pub fn is_visible(&self) -> bool {
        !self.lifecycle.is_deleted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_task_is_active() {
        let task = Task::new(" Read 30 minutes ", 20).unwrap();
        assert_eq!(task.title, "Read 30 minutes");
        assert_eq!(task.points, 20);
        assert!(task.lifecycle.is_active());
        assert!(task.id.as_str().starts_with("t_"));
    }

    #[test]
    fn new_task_rejects_bad_input() {
        assert_eq!(Task::new("", 10), Err(ValidationError::EmptyTitle));
        assert_eq!(Task::new("x", 0), Err(ValidationError::NonPositivePoints(0)));
        assert_eq!(Task::new("x", -5), Err(ValidationError::NonPositivePoints(-5)));
    }

    #[test]
    fn wire_shape_matches_persisted_data() {
        let task = Task::with_id("t_read", "Read", 20);
        assert_eq!(
            serde_json::to_value(&task).unwrap(),
            json!({"id": "t_read", "title": "Read", "points": 20, "active": true})
        );

        let parsed: Task = serde_json::from_value(json!({
            "id": "t_old", "title": "Old", "points": 5, "active": false, "deleted": true
        }))
        .unwrap();
        assert!(parsed.lifecycle.is_deleted());
        assert!(!parsed.is_visible());
    }

    #[test]
    fn negative_points_do_not_decode() {
        let parsed: Result<Task, _> = serde_json::from_value(json!({
            "id": "t", "title": "T", "points": -1, "active": true
        }));
        assert!(parsed.is_err());
    }
}
