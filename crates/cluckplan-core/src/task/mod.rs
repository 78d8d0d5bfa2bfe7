//! To-do list entries.
//!
//! A task is either pending or completed. Completion carries a timestamp so
//! the statistics view can show when it happened; the two fields move
//! together through [`Task::complete`] and [`Task::reopen`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Category of a task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    Work,
    Personal,
    Health,
    Learning,
    Other,
}

impl TaskCategory {
    pub const ALL: [TaskCategory; 5] = [
        TaskCategory::Work,
        TaskCategory::Personal,
        TaskCategory::Health,
        TaskCategory::Learning,
        TaskCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskCategory::Work => "work",
            TaskCategory::Personal => "personal",
            TaskCategory::Health => "health",
            TaskCategory::Learning => "learning",
            TaskCategory::Other => "other",
        }
    }
}

impl Default for TaskCategory {
    fn default() -> Self {
        TaskCategory::Other
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown task category: {s}"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub category: TaskCategory,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub scheduled_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    /// Set iff `is_completed`.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(
        title: impl Into<String>,
        category: TaskCategory,
        scheduled_time: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            category,
            is_completed: false,
            scheduled_time,
            created_at,
            completed_at: None,
        }
    }

    pub fn complete(&mut self, at: DateTime<Utc>) {
        self.is_completed = true;
        self.completed_at = Some(at);
    }

    pub fn reopen(&mut self) {
        self.is_completed = false;
        self.completed_at = None;
    }

    /// Flip completion, returning the new state.
    pub fn toggle(&mut self, at: DateTime<Utc>) -> bool {
        if self.is_completed {
            self.reopen();
        } else {
            self.complete(at);
        }
        self.is_completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_keeps_completed_at_in_sync() {
        let now = Utc::now();
        let mut task = Task::new("Feed chickens", TaskCategory::Health, None, now);
        assert!(task.toggle(now));
        assert_eq!(task.completed_at, Some(now));
        assert!(!task.toggle(now));
        assert!(task.completed_at.is_none());
    }

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!("Work".parse::<TaskCategory>().unwrap(), TaskCategory::Work);
        assert_eq!(" learning ".parse::<TaskCategory>().unwrap(), TaskCategory::Learning);
        assert!("chores".parse::<TaskCategory>().is_err());
    }

    #[test]
    fn ids_are_unique() {
        let now = Utc::now();
        let a = Task::new("a", TaskCategory::Work, None, now);
        let b = Task::new("a", TaskCategory::Work, None, now);
        assert_ne!(a.id, b.id);
    }
}
