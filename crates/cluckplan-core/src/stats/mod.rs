//! Cumulative and rolling statistics.
//!
//! Cumulative counters only move through the store's mutations. Daily and
//! weekly counters additionally reset when [`Statistics::roll_over`] sees a
//! new calendar day or ISO week.

mod achievements;
mod format;

pub use achievements::{Achievement, AchievementStatus};
pub use format::{format_clock, format_duration};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::rewards::{apply_delta, FeatherDelta};

/// Counters that reset on a day or week boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollingCounters {
    pub tasks_completed: u32,
    pub focus_secs: u64,
    pub feathers_earned: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Statistics {
    pub tasks_completed: u32,
    pub total_focus_secs: u64,
    /// Spendable feather balance.
    pub feathers_earned: u32,
    pub games_played: u32,
    pub best_game_score: u32,
    pub streak_days: u32,
    pub last_active_date: Option<NaiveDate>,
    pub daily: RollingCounters,
    pub weekly: RollingCounters,
}

/// What a rollover changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rollover {
    pub previous_date: Option<NaiveDate>,
    pub today: NaiveDate,
    pub streak_days: u32,
    pub weekly_reset: bool,
}

impl Statistics {
    pub fn record_task_completed(&mut self) {
        self.tasks_completed = self.tasks_completed.saturating_add(1);
        self.daily.tasks_completed = self.daily.tasks_completed.saturating_add(1);
        self.weekly.tasks_completed = self.weekly.tasks_completed.saturating_add(1);
    }

    pub fn record_task_reverted(&mut self) {
        self.tasks_completed = self.tasks_completed.saturating_sub(1);
        self.daily.tasks_completed = self.daily.tasks_completed.saturating_sub(1);
        self.weekly.tasks_completed = self.weekly.tasks_completed.saturating_sub(1);
    }

    pub fn record_focus(&mut self, secs: u64) {
        self.total_focus_secs = self.total_focus_secs.saturating_add(secs);
        self.daily.focus_secs = self.daily.focus_secs.saturating_add(secs);
        self.weekly.focus_secs = self.weekly.focus_secs.saturating_add(secs);
    }

    /// Returns `true` when `score` set a new best.
    pub fn record_game(&mut self, score: u32) -> bool {
        self.games_played = self.games_played.saturating_add(1);
        if score > self.best_game_score {
            self.best_game_score = score;
            return true;
        }
        false
    }

    pub fn apply_feathers(&mut self, delta: FeatherDelta) {
        apply_delta(&mut self.feathers_earned, delta.amount);
        if delta.rolling {
            apply_delta(&mut self.daily.feathers_earned, delta.amount);
            apply_delta(&mut self.weekly.feathers_earned, delta.amount);
        }
    }

    /// Reset rolling counters when `today` is a new calendar day.
    ///
    /// The streak is judged against the last-active date as it was before
    /// this call: continuing from yesterday extends it, any longer gap (or no
    /// history at all) starts over at one.
    pub fn roll_over(&mut self, today: NaiveDate) -> Option<Rollover> {
        let previous = self.last_active_date;
        if previous == Some(today) {
            return None;
        }

        self.daily = RollingCounters::default();

        let continues = previous.is_some() && previous == today.pred_opt();
        self.streak_days = if continues {
            self.streak_days.saturating_add(1)
        } else {
            1
        };

        let weekly_reset = previous.map_or(true, |p| p.iso_week() != today.iso_week());
        if weekly_reset {
            self.weekly = RollingCounters::default();
        }

        self.last_active_date = Some(today);
        Some(Rollover {
            previous_date: previous,
            today,
            streak_days: self.streak_days,
            weekly_reset,
        })
    }

    pub fn achievements(&self) -> Vec<AchievementStatus> {
        Achievement::ALL
            .into_iter()
            .map(|achievement| AchievementStatus {
                achievement,
                unlocked: achievement.is_unlocked(self),
            })
            .collect()
    }
}
