//! Fixed-step round simulation.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Active -> GameOver -> Idle   (countdown ran out, then reset)
//! Idle -> Active -> Idle               (stopped, round discarded)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut round = GameRound::new(RoundSettings::default(), seed);
//! round.start();
//! // In the render loop:
//! round.move_player(pointer);
//! for event in round.advance(frame_dt) { /* ... */ }
//! // Once the phase is GameOver:
//! round.report_to(&mut store);
//! ```

use std::time::Duration;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{collect_radius, within_reach};
use super::state::{Collectible, GameState};
use crate::rewards::game_feathers;
use crate::store::AppStore;
use crate::timer::Ticker;

/// Tunables for a round. Defaults match the shipped game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundSettings {
    pub field_width: f32,
    pub field_height: f32,
    pub player_size: f32,
    pub collectible_size: f32,
    /// Extra slack added to the touching distance.
    pub collect_tolerance: f32,
    pub round_secs: u32,
    pub tick_hz: u32,
    pub spawn_interval_ms: u64,
    pub spawn_delay_ms: u64,
    /// How long a caught feather stays on screen shrunk.
    pub collect_fade_ms: u64,
    pub points_per_collectible: u32,
    pub min_fall_speed: f32,
    pub max_fall_speed: f32,
    pub max_rotation_speed: f32,
}

impl Default for RoundSettings {
    fn default() -> Self {
        Self {
            field_width: 360.0,
            field_height: 350.0,
            player_size: 40.0,
            collectible_size: 25.0,
            collect_tolerance: 5.0,
            round_secs: 30,
            tick_hz: 60,
            spawn_interval_ms: 600,
            spawn_delay_ms: 1000,
            collect_fade_ms: 100,
            points_per_collectible: 10,
            min_fall_speed: 2.0,
            max_fall_speed: 4.0,
            max_rotation_speed: 3.0,
        }
    }
}

impl RoundSettings {
    pub fn tick_period(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / u64::from(self.tick_hz.max(1)))
    }

    pub fn player_radius(&self) -> f32 {
        self.player_size / 2.0
    }

    pub fn collectible_radius(&self) -> f32 {
        self.collectible_size / 2.0
    }

    pub fn field_center(&self) -> Vec2 {
        Vec2::new(self.field_width / 2.0, self.field_height / 2.0)
    }

    fn fade_ticks(&self) -> u32 {
        let ticks = self.collect_fade_ms * u64::from(self.tick_hz) / 1000;
        u32::try_from(ticks).unwrap_or(u32::MAX).max(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundPhase {
    Idle,
    Active,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub final_score: u32,
    pub feathers_earned: u32,
    pub collected: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    Spawned { id: u64, x: f32 },
    Collected { id: u64, points: u32 },
    CountdownTick { remaining_secs: u32 },
    RoundOver(RoundSummary),
}

/// The three periodic timers of a running round. They are armed together
/// and cancelled together.
#[derive(Debug, Clone)]
struct RoundTimers {
    sim: Ticker,
    spawn: Ticker,
    countdown: Ticker,
}

impl RoundTimers {
    fn arm(settings: &RoundSettings) -> Self {
        Self {
            sim: Ticker::new(settings.tick_period()),
            spawn: Ticker::delayed(
                Duration::from_millis(settings.spawn_interval_ms),
                Duration::from_millis(settings.spawn_delay_ms),
            ),
            countdown: Ticker::new(Duration::from_secs(1)),
        }
    }

    fn cancel_all(&mut self) {
        self.sim.cancel();
        self.spawn.cancel();
        self.countdown.cancel();
    }
}

#[derive(Debug, Clone)]
pub struct GameRound {
    settings: RoundSettings,
    rng: Pcg32,
    phase: RoundPhase,
    score: u32,
    collected: u32,
    remaining_secs: u32,
    player: Vec2,
    collectibles: Vec<Collectible>,
    timers: Option<RoundTimers>,
    ticks: u64,
    next_id: u64,
    summary: Option<RoundSummary>,
    reported: bool,
}

impl GameRound {
    pub fn new(settings: RoundSettings, seed: u64) -> Self {
        let player = settings.field_center();
        let remaining_secs = settings.round_secs;
        Self {
            settings,
            rng: Pcg32::seed_from_u64(seed),
            phase: RoundPhase::Idle,
            score: 0,
            collected: 0,
            remaining_secs,
            player,
            collectibles: Vec::new(),
            timers: None,
            ticks: 0,
            next_id: 0,
            summary: None,
            reported: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn player(&self) -> Vec2 {
        self.player
    }

    pub fn collectibles(&self) -> &[Collectible] {
        &self.collectibles
    }

    /// Simulation steps run since the round started.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn summary(&self) -> Option<RoundSummary> {
        self.summary
    }

    /// Whether any round timer is still live.
    pub fn timers_running(&self) -> bool {
        self.timers.as_ref().is_some_and(|t| {
            !(t.sim.is_cancelled() && t.spawn.is_cancelled() && t.countdown.is_cancelled())
        })
    }

    /// Copy the live round into the persisted aggregate, keeping its theme.
    pub fn snapshot_into(&self, state: &mut GameState) {
        state.score = self.score;
        state.feathers_collected = self.collected;
        state.is_active = self.phase == RoundPhase::Active;
        state.player_position = Vec2::new(
            self.player.x / self.settings.field_width.max(f32::EPSILON),
            self.player.y / self.settings.field_height.max(f32::EPSILON),
        );
        state.collectibles = self.collectibles.clone();
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a fresh round. Restarting from any phase clears the previous one.
    pub fn start(&mut self) {
        self.clear();
        self.timers = Some(RoundTimers::arm(&self.settings));
        self.phase = RoundPhase::Active;
        tracing::debug!(round_secs = self.settings.round_secs, "game round started");
    }

    /// Abandon an active round without scoring. Returns `false` if nothing
    /// was running.
    pub fn stop(&mut self) -> bool {
        if self.phase != RoundPhase::Active {
            return false;
        }
        self.clear();
        tracing::debug!("game round stopped");
        true
    }

    /// Back to a clean `Idle` round, e.g. after the game-over screen.
    pub fn reset(&mut self) {
        self.clear();
    }

    /// Place the player under the pointer, kept fully inside the field.
    pub fn move_player(&mut self, target: Vec2) {
        if self.phase != RoundPhase::Active {
            return;
        }
        let r = self.settings.player_radius();
        let max = Vec2::new(self.settings.field_width - r, self.settings.field_height - r);
        self.player = target.clamp(Vec2::splat(r), max.max(Vec2::splat(r)));
    }

    /// Feed elapsed wall time to the round timers.
    ///
    /// Time is consumed in slices of at most one tick so spawns, steps and
    /// the countdown interleave in order even for long frames.
    pub fn advance(&mut self, dt: Duration) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let slice_max = self.settings.tick_period();
        let mut left = dt;

        while !left.is_zero() && self.phase == RoundPhase::Active {
            let slice = left.min(slice_max);
            left -= slice;

            let Some(timers) = self.timers.as_mut() else {
                break;
            };
            let spawns = timers.spawn.advance(slice);
            let steps = timers.sim.advance(slice);
            let seconds = timers.countdown.advance(slice);

            for _ in 0..spawns {
                let (id, x) = self.spawn();
                events.push(GameEvent::Spawned { id, x });
            }
            for _ in 0..steps {
                events.extend(self.step());
            }
            for _ in 0..seconds {
                self.remaining_secs = self.remaining_secs.saturating_sub(1);
                events.push(GameEvent::CountdownTick {
                    remaining_secs: self.remaining_secs,
                });
                if self.remaining_secs == 0 {
                    events.push(GameEvent::RoundOver(self.finish()));
                    break;
                }
            }
        }
        events
    }

    /// One fixed simulation step: integrate, cull, collect.
    pub fn step(&mut self) -> Vec<GameEvent> {
        self.ticks += 1;

        for c in &mut self.collectibles {
            c.position.y += c.fall_speed;
            c.rotation = (c.rotation + c.rotation_speed).rem_euclid(360.0);
            if c.collected {
                c.despawn_in_ticks = c.despawn_in_ticks.saturating_sub(1);
            }
        }

        let floor = self.settings.field_height + self.settings.collectible_radius();
        self.collectibles
            .retain(|c| c.position.y <= floor && !(c.collected && c.despawn_in_ticks == 0));

        let reach = collect_radius(
            self.settings.player_radius(),
            self.settings.collectible_radius(),
            self.settings.collect_tolerance,
        );
        let points = self.settings.points_per_collectible;
        let fade = self.settings.fade_ticks();
        let mut events = Vec::new();
        for c in self.collectibles.iter_mut().filter(|c| !c.collected) {
            if within_reach(self.player, c.position, reach) {
                c.collected = true;
                c.scale = 0.1;
                c.despawn_in_ticks = fade;
                self.score = self.score.saturating_add(points);
                self.collected += 1;
                events.push(GameEvent::Collected { id: c.id, points });
            }
        }
        events
    }

    /// Drop a feather at a random spot on the top edge.
    pub fn spawn(&mut self) -> (u64, f32) {
        let s = &self.settings;
        let lo = s.collectible_size;
        let hi = (s.field_width - s.collectible_size).max(lo);
        let x = self.rng.gen_range(lo..=hi);
        let rotation = self.rng.gen_range(0.0..360.0);
        let fall_speed = self.rng.gen_range(s.min_fall_speed..=s.max_fall_speed.max(s.min_fall_speed));
        let spin = s.max_rotation_speed.abs();
        let rotation_speed = self.rng.gen_range(-spin..=spin);
        let id = self.push_collectible(Vec2::new(x, 0.0), rotation, fall_speed, rotation_speed);
        (id, x)
    }

    /// Place a feather explicitly. Used by replays and tests.
    pub fn spawn_at(&mut self, position: Vec2, fall_speed: f32, rotation_speed: f32) -> u64 {
        self.push_collectible(position, 0.0, fall_speed, rotation_speed)
    }

    /// Report the final score to the store. Only the first call after a
    /// round ends has any effect.
    pub fn report_to(&mut self, store: &mut AppStore) -> Option<RoundSummary> {
        let summary = self.summary?;
        if self.reported || self.phase != RoundPhase::GameOver {
            return None;
        }
        self.reported = true;
        store.sync_game_state(|state| self.snapshot_into(state));
        store.update_game_score(summary.final_score);
        Some(summary)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn push_collectible(
        &mut self,
        position: Vec2,
        rotation: f32,
        fall_speed: f32,
        rotation_speed: f32,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.collectibles.push(Collectible {
            id,
            position,
            rotation,
            fall_speed,
            rotation_speed,
            scale: 1.0,
            collected: false,
            despawn_in_ticks: 0,
        });
        id
    }

    fn finish(&mut self) -> RoundSummary {
        self.cancel_timers();
        self.phase = RoundPhase::GameOver;
        let summary = RoundSummary {
            final_score: self.score,
            feathers_earned: game_feathers(self.score),
            collected: self.collected,
        };
        self.summary = Some(summary);
        tracing::debug!(score = summary.final_score, "game round over");
        summary
    }

    fn cancel_timers(&mut self) {
        if let Some(timers) = self.timers.as_mut() {
            timers.cancel_all();
        }
    }

    fn clear(&mut self) {
        self.cancel_timers();
        self.timers = None;
        self.phase = RoundPhase::Idle;
        self.score = 0;
        self.collected = 0;
        self.remaining_secs = self.settings.round_secs;
        self.player = self.settings.field_center();
        self.collectibles.clear();
        self.ticks = 0;
        self.summary = None;
        self.reported = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active_round() -> GameRound {
        let mut round = GameRound::new(RoundSettings::default(), 7);
        round.start();
        round
    }

    #[test]
    fn starts_idle_at_center() {
        let round = GameRound::new(RoundSettings::default(), 1);
        assert_eq!(round.phase(), RoundPhase::Idle);
        assert_eq!(round.player(), Vec2::new(180.0, 175.0));
        assert_eq!(round.remaining_secs(), 30);
    }

    #[test]
    fn linear_fall_and_cull() {
        let mut round = active_round();
        let id = round.spawn_at(Vec2::new(100.0, 0.0), 3.0, 0.0);
        for _ in 0..50 {
            round.step();
        }
        let c = round.collectibles().iter().find(|c| c.id == id).unwrap();
        assert_eq!(c.position.y, 150.0);

        // 350 + 12.5 = 362.5 is the floor; 120 ticks -> 360, 121 -> 363.
        for _ in 50..120 {
            round.step();
        }
        assert!(round.collectibles().iter().any(|c| c.id == id));
        round.step();
        assert!(round.collectibles().iter().all(|c| c.id != id));
        assert_eq!(round.score(), 0);
    }

    #[test]
    fn collecting_scores_once_and_fades() {
        let mut round = active_round();
        round.move_player(Vec2::new(200.0, 300.0));
        round.spawn_at(Vec2::new(205.0, 302.0), 0.0, 0.0);
        let events = round.step();
        assert_eq!(events, vec![GameEvent::Collected { id: 0, points: 10 }]);
        assert_eq!(round.score(), 10);
        assert_eq!(round.collectibles()[0].scale, 0.1);

        // Still overlapping, but never scored twice.
        for _ in 0..3 {
            assert!(round.step().is_empty());
        }
        assert_eq!(round.score(), 10);
        for _ in 0..10 {
            round.step();
        }
        assert!(round.collectibles().is_empty());
    }

    #[test]
    fn simultaneous_collections_each_score() {
        let mut round = active_round();
        round.move_player(Vec2::new(100.0, 100.0));
        round.spawn_at(Vec2::new(95.0, 100.0), 0.0, 0.0);
        round.spawn_at(Vec2::new(105.0, 100.0), 0.0, 0.0);
        assert_eq!(round.step().len(), 2);
        assert_eq!(round.score(), 20);
    }

    #[test]
    fn player_is_clamped_to_field() {
        let mut round = active_round();
        round.move_player(Vec2::new(-50.0, 1000.0));
        assert_eq!(round.player(), Vec2::new(20.0, 330.0));
    }

    #[test]
    fn idle_round_ignores_input() {
        let mut round = GameRound::new(RoundSettings::default(), 1);
        round.move_player(Vec2::new(10.0, 10.0));
        assert_eq!(round.player(), Vec2::new(180.0, 175.0));
        assert!(round.advance(Duration::from_secs(5)).is_empty());
    }

    #[test]
    fn spawn_cadence_follows_delay_and_interval() {
        let mut round = active_round();
        let spawned = |events: &[GameEvent]| {
            events
                .iter()
                .filter(|e| matches!(e, GameEvent::Spawned { .. }))
                .count()
        };
        assert_eq!(spawned(&round.advance(Duration::from_millis(1500))), 0);
        assert_eq!(spawned(&round.advance(Duration::from_millis(100))), 1);
        assert_eq!(spawned(&round.advance(Duration::from_millis(1200))), 2);
    }

    #[test]
    fn spawned_feathers_stay_in_bounds() {
        let mut round = active_round();
        for _ in 0..200 {
            round.spawn();
        }
        for c in round.collectibles() {
            assert!((25.0..=335.0).contains(&c.position.x));
            assert!((2.0..=4.0).contains(&c.fall_speed));
            assert!((-3.0..=3.0).contains(&c.rotation_speed));
            assert_eq!(c.position.y, 0.0);
        }
    }

    #[test]
    fn countdown_ends_round_and_cancels_timers() {
        let mut round = active_round();
        let events = round.advance(Duration::from_secs(31));
        assert_eq!(round.phase(), RoundPhase::GameOver);
        assert!(!round.timers_running());
        let over = events
            .iter()
            .filter(|e| matches!(e, GameEvent::RoundOver(_)))
            .count();
        assert_eq!(over, 1);
        assert_eq!(round.remaining_secs(), 0);
        // Further time does nothing.
        assert!(round.advance(Duration::from_secs(5)).is_empty());
    }

    #[test]
    fn stop_discards_round() {
        let mut round = active_round();
        round.move_player(Vec2::new(50.0, 50.0));
        round.spawn_at(Vec2::new(50.0, 50.0), 0.0, 0.0);
        round.step();
        assert!(round.stop());
        assert!(!round.stop());
        assert_eq!(round.phase(), RoundPhase::Idle);
        assert_eq!(round.score(), 0);
        assert!(round.summary().is_none());
        assert!(!round.timers_running());
    }

    #[test]
    fn same_seed_same_round() {
        let mut a = GameRound::new(RoundSettings::default(), 42);
        let mut b = GameRound::new(RoundSettings::default(), 42);
        a.start();
        b.start();
        let dt = Duration::from_millis(16);
        for _ in 0..300 {
            assert_eq!(a.advance(dt), b.advance(dt));
        }
        assert_eq!(a.collectibles(), b.collectibles());
    }

    #[test]
    fn snapshot_normalizes_player() {
        let mut round = active_round();
        round.move_player(Vec2::new(90.0, 175.0));
        let mut state = GameState::default();
        round.snapshot_into(&mut state);
        assert_eq!(state.player_position, Vec2::new(0.25, 0.5));
        assert!(state.is_active);
    }
}
