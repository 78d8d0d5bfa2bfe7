//! Application state store.
//!
//! [`AppStore`] is the only owner of the four aggregates. Every mutation goes
//! through it and follows the same sequence:
//!
//! 1. change the in-memory aggregates (rewards via [`crate::rewards`])
//! 2. save through the [`PersistenceGateway`], best effort
//! 3. notify listeners with one [`Event`]
//!
//! A failed save never fails the mutation. It is logged, kept as
//! [`AppStore::persistence_warning`], and retried by the next mutation since
//! every save writes all aggregates.

mod listeners;

pub use listeners::ListenerId;

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::focus::FocusSession;
use crate::game::{GameState, Theme};
use crate::rewards::{feather_delta, focus_feathers, game_feathers, RewardEvent};
use crate::stats::{AchievementStatus, Rollover, Statistics};
use crate::storage::{Aggregates, KvGateway, MemoryKv, PersistenceGateway};
use crate::task::{Task, TaskCategory};
use crate::timer::{Clock, SystemClock};
use listeners::Listeners;

pub struct AppStore {
    state: Aggregates,
    gateway: Box<dyn PersistenceGateway>,
    clock: Box<dyn Clock>,
    listeners: Listeners,
    persistence_warning: Option<String>,
    load_warnings: Vec<String>,
}

impl std::fmt::Debug for AppStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppStore")
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .field("persistence_warning", &self.persistence_warning)
            .field("load_warnings", &self.load_warnings)
            .finish()
    }
}

impl AppStore {
    /// Load persisted state and run the day rollover.
    ///
    /// Unreadable entries fall back to defaults and are listed in
    /// [`AppStore::load_warnings`]; the next save overwrites them.
    ///
    /// # Errors
    /// Returns an error only if the backend itself cannot be read, so that
    /// existing data is never overwritten with defaults.
    pub fn open(
        gateway: impl PersistenceGateway + 'static,
        clock: impl Clock + 'static,
    ) -> Result<Self> {
        let report = gateway.load()?;
        let mut store = Self {
            state: report.state,
            gateway: Box::new(gateway),
            clock: Box::new(clock),
            listeners: Listeners::default(),
            persistence_warning: None,
            load_warnings: report.skipped.iter().map(ToString::to_string).collect(),
        };
        store.roll_over();
        Ok(store)
    }

    /// Fresh store over an in-memory backend with the system clock.
    pub fn in_memory() -> Self {
        Self::with_state(Aggregates::default(), SystemClock)
    }

    /// Store seeded with `state` over an in-memory backend.
    pub fn with_state(state: Aggregates, clock: impl Clock + 'static) -> Self {
        let mut store = Self {
            state,
            gateway: Box::new(KvGateway::new(MemoryKv::new())),
            clock: Box::new(clock),
            listeners: Listeners::default(),
            persistence_warning: None,
            load_warnings: Vec::new(),
        };
        store.roll_over();
        store
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn tasks(&self) -> &[Task] {
        &self.state.tasks
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.state.tasks.iter().find(|t| t.id == id)
    }

    pub fn pending_tasks(&self) -> Vec<&Task> {
        self.state.tasks.iter().filter(|t| !t.is_completed).collect()
    }

    pub fn completed_tasks(&self) -> Vec<&Task> {
        self.state.tasks.iter().filter(|t| t.is_completed).collect()
    }

    /// Share of tasks completed, in `0.0..=1.0`. Zero when there are none.
    pub fn completion_progress(&self) -> f64 {
        let total = self.state.tasks.len();
        if total == 0 {
            return 0.0;
        }
        let done = self.state.tasks.iter().filter(|t| t.is_completed).count();
        done as f64 / total as f64
    }

    pub fn focus_sessions(&self) -> &[FocusSession] {
        &self.state.focus_sessions
    }

    pub fn focus_session(&self, id: &str) -> Option<&FocusSession> {
        self.state.focus_sessions.iter().find(|s| s.id == id)
    }

    pub fn active_session(&self) -> Option<&FocusSession> {
        self.state.focus_sessions.iter().find(|s| s.is_active)
    }

    /// Sessions starting on `day` in the clock's time zone, earliest first.
    pub fn sessions_on(&self, day: NaiveDate) -> Vec<&FocusSession> {
        let mut sessions: Vec<_> = self
            .state
            .focus_sessions
            .iter()
            .filter(|s| self.clock.date_of(s.start_time) == day)
            .collect();
        sessions.sort_by_key(|s| s.start_time);
        sessions
    }

    pub fn todays_sessions(&self) -> Vec<&FocusSession> {
        self.sessions_on(self.clock.today())
    }

    pub fn statistics(&self) -> &Statistics {
        &self.state.statistics
    }

    pub fn game_state(&self) -> &GameState {
        &self.state.game_state
    }

    pub fn achievements(&self) -> Vec<AchievementStatus> {
        self.state.statistics.achievements()
    }

    /// Message of the last failed save, cleared by the next successful one.
    pub fn persistence_warning(&self) -> Option<&str> {
        self.persistence_warning.as_deref()
    }

    /// Entries that could not be read at open and were replaced by defaults.
    pub fn load_warnings(&self) -> &[String] {
        &self.load_warnings
    }

    // ── Listeners ────────────────────────────────────────────────────

    pub fn subscribe(&mut self, listener: impl FnMut(&Event) + 'static) -> ListenerId {
        self.listeners.add(Box::new(listener))
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    // ── Tasks ────────────────────────────────────────────────────────

    pub fn add_task(
        &mut self,
        title: impl Into<String>,
        category: TaskCategory,
        scheduled_time: Option<DateTime<Utc>>,
    ) -> Task {
        let now = self.clock.now();
        let task = Task::new(title, category, scheduled_time, now);
        self.state.tasks.push(task.clone());
        tracing::debug!(task_id = %task.id, "task added");
        self.commit(Event::TaskAdded {
            task_id: task.id.clone(),
            at: now,
        });
        task
    }

    /// Flip completion and move the reward with it. Returns the new state.
    pub fn toggle_task(&mut self, id: &str) -> Result<bool> {
        let now = self.clock.now();
        let task = self
            .state
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| CoreError::not_found("task", id))?;

        let completed = task.toggle(now);
        let reward = if completed {
            self.state.statistics.record_task_completed();
            RewardEvent::TaskCompleted
        } else {
            self.state.statistics.record_task_reverted();
            RewardEvent::TaskReverted
        };
        let delta = feather_delta(reward);
        self.state.statistics.apply_feathers(delta);

        tracing::debug!(task_id = id, completed, "task toggled");
        self.commit(Event::TaskToggled {
            task_id: id.to_string(),
            completed,
            feathers: delta.amount,
            at: now,
        });
        Ok(completed)
    }

    /// Remove a task, first undoing its completion reward if it had one.
    pub fn delete_task(&mut self, id: &str) -> Result<Task> {
        let index = self
            .state
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| CoreError::not_found("task", id))?;

        let task = self.state.tasks.remove(index);
        if task.is_completed {
            self.state.statistics.record_task_reverted();
            self.state
                .statistics
                .apply_feathers(feather_delta(RewardEvent::TaskReverted));
        }

        tracing::debug!(task_id = id, "task deleted");
        self.commit(Event::TaskDeleted {
            task_id: task.id.clone(),
            was_completed: task.is_completed,
            at: self.clock.now(),
        });
        Ok(task)
    }

    // ── Focus sessions ───────────────────────────────────────────────

    pub fn add_focus_session(
        &mut self,
        title: impl Into<String>,
        duration_secs: u64,
        start_time: DateTime<Utc>,
    ) -> FocusSession {
        let session = FocusSession::new(title, duration_secs, start_time);
        self.state.focus_sessions.push(session.clone());
        tracing::debug!(session_id = %session.id, duration_secs, "focus session added");
        self.commit(Event::FocusSessionAdded {
            session_id: session.id.clone(),
            at: self.clock.now(),
        });
        session
    }

    /// Mark a session active. Only one session may be active at a time;
    /// starting the one already running is a no-op.
    pub fn start_focus_session(&mut self, id: &str) -> Result<()> {
        if let Some(active) = self.active_session() {
            if active.id == id {
                return Ok(());
            }
            return Err(CoreError::SessionAlreadyActive {
                active_id: active.id.clone(),
            });
        }

        let session = self.session_mut(id)?;
        if session.is_completed {
            return Err(CoreError::InvalidTransition {
                id: id.to_string(),
                reason: "session already completed".to_string(),
            });
        }
        session.is_active = true;

        tracing::debug!(session_id = id, "focus session started");
        self.commit(Event::FocusSessionStarted {
            session_id: id.to_string(),
            at: self.clock.now(),
        });
        Ok(())
    }

    /// Close a session with the time actually spent, returning the feathers
    /// awarded.
    pub fn complete_focus_session(&mut self, id: &str, actual_secs: u64) -> Result<u32> {
        let session = self.session_mut(id)?;
        if session.is_completed {
            return Err(CoreError::InvalidTransition {
                id: id.to_string(),
                reason: "session already completed".to_string(),
            });
        }
        session.is_active = false;
        session.is_completed = true;
        session.actual_duration_secs = actual_secs;

        self.state.statistics.record_focus(actual_secs);
        self.state
            .statistics
            .apply_feathers(feather_delta(RewardEvent::FocusCompleted { actual_secs }));
        let feathers = focus_feathers(actual_secs);

        tracing::debug!(session_id = id, actual_secs, feathers, "focus session completed");
        self.commit(Event::FocusSessionCompleted {
            session_id: id.to_string(),
            actual_secs,
            feathers,
            at: self.clock.now(),
        });
        Ok(feathers)
    }

    /// Remove a session. Statistics already credited stay.
    pub fn delete_focus_session(&mut self, id: &str) -> Result<FocusSession> {
        let index = self
            .state
            .focus_sessions
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| CoreError::not_found("focus session", id))?;
        let session = self.state.focus_sessions.remove(index);
        self.commit(Event::FocusSessionDeleted {
            session_id: session.id.clone(),
            at: self.clock.now(),
        });
        Ok(session)
    }

    // ── Game ─────────────────────────────────────────────────────────

    /// Record a finished round, returning the feathers awarded.
    pub fn update_game_score(&mut self, score: u32) -> u32 {
        self.state.game_state.score = score;
        let new_best = self.state.statistics.record_game(score);
        self.state
            .statistics
            .apply_feathers(feather_delta(RewardEvent::GameEnded { score }));
        let feathers = game_feathers(score);

        tracing::debug!(score, feathers, new_best, "game score recorded");
        self.commit(Event::GameScoreRecorded {
            score,
            feathers,
            new_best,
            at: self.clock.now(),
        });
        feathers
    }

    /// Spend feathers on a theme. Nothing changes when the balance is short.
    pub fn purchase_theme(&mut self, theme: Theme) -> bool {
        let cost = theme.cost();
        if self.state.statistics.feathers_earned < cost {
            tracing::debug!(%theme, cost, "theme purchase declined");
            return false;
        }
        self.state
            .statistics
            .apply_feathers(feather_delta(RewardEvent::ThemePurchased { theme }));
        self.state.game_state.theme = theme;

        self.commit(Event::ThemePurchased {
            theme,
            cost,
            at: self.clock.now(),
        });
        true
    }

    /// Copy live round data into the game aggregate without saving.
    pub(crate) fn sync_game_state(&mut self, update: impl FnOnce(&mut GameState)) {
        update(&mut self.state.game_state);
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    pub fn reset_progress(&mut self) {
        self.state = Aggregates::default();
        tracing::info!("progress reset");
        if let Some(rollover) = self.state.statistics.roll_over(self.clock.today()) {
            tracing::debug!(?rollover, "rollover after reset");
        }
        self.commit(Event::ProgressReset {
            at: self.clock.now(),
        });
    }

    /// Apply the day/week boundary rules against the clock's current date.
    pub fn roll_over(&mut self) -> Option<Rollover> {
        let today = self.clock.today();
        let rollover = self.state.statistics.roll_over(today)?;
        tracing::info!(
            previous = ?rollover.previous_date,
            %today,
            streak = rollover.streak_days,
            weekly_reset = rollover.weekly_reset,
            "new day"
        );
        self.commit(Event::DayRolledOver {
            rollover,
            at: self.clock.now(),
        });
        Some(rollover)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn session_mut(&mut self, id: &str) -> Result<&mut FocusSession> {
        self.state
            .focus_sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| CoreError::not_found("focus session", id))
    }

    fn commit(&mut self, event: Event) {
        self.persist();
        self.listeners.notify(&event);
    }

    fn persist(&mut self) {
        match self.gateway.save(&self.state) {
            Ok(()) => self.persistence_warning = None,
            Err(e) => {
                tracing::warn!(error = %e, "failed to persist state; will retry on next change");
                let message = e.to_string();
                self.persistence_warning = Some(message.clone());
                self.listeners.notify(&Event::PersistenceFailed {
                    message,
                    at: self.clock.now(),
                });
            }
        }
    }
}
