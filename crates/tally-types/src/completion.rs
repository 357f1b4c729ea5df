use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::date::LocalDate;
use crate::id::EntityId;

/// Which daily tasks were completed on which local date.
///
/// A task id appears at most once per date. Dates with no completions are
/// not kept, so toggling an id on and back off leaves the log unchanged.
/// Persisted as `{"YYYY-MM-DD": ["task id", ...]}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletionLog {
    days: BTreeMap<LocalDate, BTreeSet<EntityId>>,
}

impl CompletionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Task ids completed on `date`.
    pub fn completed_on(&self, date: LocalDate) -> impl Iterator<Item = &EntityId> + '_ {
        self.days.get(&date).into_iter().flatten()
    }

    pub fn is_completed(&self, date: LocalDate, task_id: &EntityId) -> bool {
        self.days.get(&date).is_some_and(|ids| ids.contains(task_id))
    }

    /// Number of task ids recorded on `date`.
    pub fn count_on(&self, date: LocalDate) -> usize {
        self.days.get(&date).map_or(0, BTreeSet::len)
    }

    /// Flip the completion state of `task_id` on `date` and return the new
    /// state. No other date is touched.
    pub fn toggle(&mut self, date: LocalDate, task_id: &EntityId) -> bool {
        let ids = self.days.entry(date).or_default();
        let now_completed = if ids.remove(task_id) {
            false
        } else {
            ids.insert(task_id.clone());
            true
        };
        if ids.is_empty() {
            self.days.remove(&date);
        }
        now_completed
    }

    /// Every date that has at least one entry, oldest first.
    pub fn dates(&self) -> impl DoubleEndedIterator<Item = LocalDate> + '_ {
        self.days.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl FromIterator<(LocalDate, EntityId)> for CompletionLog {
    fn from_iter<I: IntoIterator<Item = (LocalDate, EntityId)>>(iter: I) -> Self {
        let mut days: BTreeMap<LocalDate, BTreeSet<EntityId>> = BTreeMap::new();
        for (date, id) in iter {
            days.entry(date).or_default().insert(id);
        }
        Self { days }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::parse_date;
    use serde_json::json;

    fn d(s: &str) -> LocalDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut log = CompletionLog::new();
        let id = EntityId::from("t_read");

        assert!(log.toggle(d("2024-01-01"), &id));
        assert!(log.is_completed(d("2024-01-01"), &id));
        assert!(!log.toggle(d("2024-01-01"), &id));
        assert!(!log.is_completed(d("2024-01-01"), &id));
        assert!(log.is_empty());
    }

    #[test]
    fn toggle_leaves_other_dates_alone() {
        let id = EntityId::from("t_read");
        let mut log: CompletionLog = [(d("2024-01-01"), id.clone())].into_iter().collect();
        let before = log.clone();

        log.toggle(d("2024-01-02"), &id);
        assert!(log.is_completed(d("2024-01-01"), &id));
        log.toggle(d("2024-01-02"), &id);
        assert_eq!(log, before);
    }

    #[test]
    fn decodes_date_keyed_map() {
        let log: CompletionLog = serde_json::from_value(json!({
            "2024-01-01": ["t_read", "t_plan"],
            "2024-01-02": ["t_read", "t_read"]
        }))
        .unwrap();
        assert_eq!(log.count_on(d("2024-01-01")), 2);
        assert_eq!(log.count_on(d("2024-01-02")), 1);
        assert_eq!(log.dates().count(), 2);
    }

    #[test]
    fn rejects_non_date_keys() {
        let parsed: Result<CompletionLog, _> = serde_json::from_value(json!({"monday": ["t_read"]}));
        assert!(parsed.is_err());
    }
}
