use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::game::Theme;
use crate::stats::Rollover;

/// Every state change in the store produces an Event.
/// Front ends subscribe to re-render; nothing here depends on a UI toolkit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TaskAdded {
        task_id: String,
        at: DateTime<Utc>,
    },
    TaskToggled {
        task_id: String,
        completed: bool,
        /// Signed feather change requested by the reward rules.
        feathers: i64,
        at: DateTime<Utc>,
    },
    TaskDeleted {
        task_id: String,
        was_completed: bool,
        at: DateTime<Utc>,
    },
    FocusSessionAdded {
        session_id: String,
        at: DateTime<Utc>,
    },
    FocusSessionStarted {
        session_id: String,
        at: DateTime<Utc>,
    },
    FocusSessionCompleted {
        session_id: String,
        actual_secs: u64,
        feathers: u32,
        at: DateTime<Utc>,
    },
    FocusSessionDeleted {
        session_id: String,
        at: DateTime<Utc>,
    },
    GameScoreRecorded {
        score: u32,
        feathers: u32,
        new_best: bool,
        at: DateTime<Utc>,
    },
    ThemePurchased {
        theme: Theme,
        cost: u32,
        at: DateTime<Utc>,
    },
    ProgressReset {
        at: DateTime<Utc>,
    },
    DayRolledOver {
        rollover: Rollover,
        at: DateTime<Utc>,
    },
    /// A save failed. State in memory is intact; the next mutation retries.
    PersistenceFailed {
        message: String,
        at: DateTime<Utc>,
    },
}
