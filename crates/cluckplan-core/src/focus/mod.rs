//! Focus sessions: planned, timed concentration intervals.

mod countdown;

pub use countdown::{CountdownEvent, CountdownState, FocusCountdown};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of a session as seen by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Planned,
    Active,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FocusSession {
    pub id: String,
    pub title: String,
    /// Planned length in seconds.
    pub duration_secs: u64,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub actual_duration_secs: u64,
}

impl FocusSession {
    pub fn new(title: impl Into<String>, duration_secs: u64, start_time: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            duration_secs,
            start_time,
            is_active: false,
            is_completed: false,
            actual_duration_secs: 0,
        }
    }

    pub fn status(&self) -> SessionStatus {
        if self.is_completed {
            SessionStatus::Completed
        } else if self.is_active {
            SessionStatus::Active
        } else {
            SessionStatus::Planned
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_planned() {
        let s = FocusSession::new("Deep work", 1500, Utc::now());
        assert_eq!(s.status(), SessionStatus::Planned);
        assert_eq!(s.actual_duration_secs, 0);
    }
}
