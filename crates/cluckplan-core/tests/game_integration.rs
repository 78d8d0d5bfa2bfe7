//! Integration tests for a complete Feather Collector round reported to the
//! store.

use std::time::Duration;

use chrono::NaiveDate;
use cluckplan_core::{
    Aggregates, AppStore, FixedClock, GameEvent, GameRound, RoundPhase, RoundSettings,
};
use glam::Vec2;

fn store() -> AppStore {
    let today = NaiveDate::from_ymd_opt(2025, 10, 15).unwrap();
    AppStore::with_state(Aggregates::default(), FixedClock::on(today))
}

/// Move under the lowest feather still above the player, like a pointer
/// chasing it.
fn chase(round: &mut GameRound) {
    let player_y = round.player().y;
    let target = round
        .collectibles()
        .iter()
        .filter(|c| !c.collected && c.position.y < player_y)
        .max_by(|a, b| a.position.y.total_cmp(&b.position.y))
        .map(|c| c.position);
    if let Some(target) = target {
        round.move_player(Vec2::new(target.x, round.player().y));
    }
}

fn play_out(round: &mut GameRound) -> Vec<GameEvent> {
    let frame = Duration::from_millis(16);
    let mut events = Vec::new();
    for _ in 0..10_000 {
        if round.phase() != RoundPhase::Active {
            break;
        }
        chase(round);
        events.extend(round.advance(frame));
    }
    events
}

#[test]
fn test_full_round_reports_once() {
    let mut store = store();
    let mut round = GameRound::new(RoundSettings::default(), 2024);
    round.start();

    let events = play_out(&mut round);
    assert_eq!(round.phase(), RoundPhase::GameOver);
    assert!(!round.timers_running());

    let over: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            GameEvent::RoundOver(summary) => Some(*summary),
            _ => None,
        })
        .collect();
    assert_eq!(over.len(), 1);
    let summary = over[0];

    let collected = events
        .iter()
        .filter(|e| matches!(e, GameEvent::Collected { .. }))
        .count() as u32;
    assert_eq!(summary.collected, collected);
    assert_eq!(summary.final_score, collected * 10);
    assert!(collected > 0, "a chasing player should catch something");

    assert_eq!(round.report_to(&mut store), Some(summary));
    assert_eq!(round.report_to(&mut store), None);

    let stats = store.statistics();
    assert_eq!(stats.games_played, 1);
    assert_eq!(stats.best_game_score, summary.final_score);
    assert_eq!(stats.feathers_earned, summary.final_score / 10);
    assert_eq!(store.game_state().score, summary.final_score);
    assert!(!store.game_state().is_active);
}

#[test]
fn test_stopped_round_reports_nothing() {
    let mut store = store();
    let mut round = GameRound::new(RoundSettings::default(), 5);
    round.start();
    round.advance(Duration::from_secs(3));
    assert!(round.stop());
    assert!(!round.timers_running());
    assert_eq!(round.report_to(&mut store), None);
    assert_eq!(store.statistics().games_played, 0);
}

#[test]
fn test_same_seed_same_outcome() {
    let mut a = GameRound::new(RoundSettings::default(), 99);
    let mut b = GameRound::new(RoundSettings::default(), 99);
    a.start();
    b.start();
    let ea = play_out(&mut a);
    let eb = play_out(&mut b);
    assert_eq!(ea, eb);
    assert_eq!(a.summary(), b.summary());
}

#[test]
fn test_short_round_from_settings() {
    let settings = RoundSettings {
        round_secs: 3,
        ..RoundSettings::default()
    };
    let mut round = GameRound::new(settings, 1);
    round.start();
    let events = round.advance(Duration::from_secs(5));
    let ticks: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            GameEvent::CountdownTick { remaining_secs } => Some(*remaining_secs),
            _ => None,
        })
        .collect();
    assert_eq!(ticks, vec![2, 1, 0]);
    assert_eq!(round.phase(), RoundPhase::GameOver);
}
