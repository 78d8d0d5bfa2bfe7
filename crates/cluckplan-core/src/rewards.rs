//! Feather reward rules.
//!
//! Pure functions only. The store decides when an event happened and applies
//! the resulting [`FeatherDelta`] to [`Statistics`](crate::stats::Statistics).

use serde::{Deserialize, Serialize};

use crate::game::Theme;

/// Feathers credited for completing a task.
pub const TASK_COMPLETION_FEATHERS: u32 = 5;

/// Focus seconds per feather (one feather per full minute).
pub const SECONDS_PER_FEATHER: u64 = 60;

/// Game points per feather.
pub const POINTS_PER_FEATHER: u32 = 10;

/// Something that moves the feather balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RewardEvent {
    TaskCompleted,
    /// Task un-completed, or deleted while completed.
    TaskReverted,
    FocusCompleted { actual_secs: u64 },
    GameEnded { score: u32 },
    ThemePurchased { theme: Theme },
}

/// Signed change to the feather balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatherDelta {
    pub amount: i64,
    /// Whether daily/weekly rolling counters move too.
    pub rolling: bool,
}

pub fn focus_feathers(actual_secs: u64) -> u32 {
    u32::try_from(actual_secs / SECONDS_PER_FEATHER).unwrap_or(u32::MAX)
}

pub fn game_feathers(score: u32) -> u32 {
    score / POINTS_PER_FEATHER
}

pub fn feather_delta(event: RewardEvent) -> FeatherDelta {
    match event {
        RewardEvent::TaskCompleted => FeatherDelta {
            amount: i64::from(TASK_COMPLETION_FEATHERS),
            rolling: true,
        },
        RewardEvent::TaskReverted => FeatherDelta {
            amount: -i64::from(TASK_COMPLETION_FEATHERS),
            rolling: true,
        },
        RewardEvent::FocusCompleted { actual_secs } => FeatherDelta {
            amount: i64::from(focus_feathers(actual_secs)),
            rolling: true,
        },
        RewardEvent::GameEnded { score } => FeatherDelta {
            amount: i64::from(game_feathers(score)),
            rolling: true,
        },
        // Spending does not undo what was earned today.
        RewardEvent::ThemePurchased { theme } => FeatherDelta {
            amount: -i64::from(theme.cost()),
            rolling: false,
        },
    }
}

/// Apply a signed delta to an unsigned counter, flooring at zero.
pub(crate) fn apply_delta(counter: &mut u32, amount: i64) {
    let next = (i64::from(*counter) + amount).clamp(0, i64::from(u32::MAX));
    *counter = next as u32;
}
