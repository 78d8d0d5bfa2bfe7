use serde::{Deserialize, Serialize};

use super::Statistics;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Achievement {
    /// Complete 10 tasks.
    TaskMaster,
    /// Focus for one hour in total.
    FocusChampion,
    /// Hold 100 feathers.
    FeatherCollector,
    /// Seven-day streak.
    StreakMaster,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementStatus {
    pub achievement: Achievement,
    pub unlocked: bool,
}

impl Achievement {
    pub const ALL: [Achievement; 4] = [
        Achievement::TaskMaster,
        Achievement::FocusChampion,
        Achievement::FeatherCollector,
        Achievement::StreakMaster,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Achievement::TaskMaster => "Task Master",
            Achievement::FocusChampion => "Focus Champion",
            Achievement::FeatherCollector => "Feather Collector",
            Achievement::StreakMaster => "Streak Master",
        }
    }

    pub fn is_unlocked(&self, stats: &Statistics) -> bool {
        match self {
            Achievement::TaskMaster => stats.tasks_completed >= 10,
            Achievement::FocusChampion => stats.total_focus_secs >= 3600,
            Achievement::FeatherCollector => stats.feathers_earned >= 100,
            Achievement::StreakMaster => stats.streak_days >= 7,
        }
    }
}
