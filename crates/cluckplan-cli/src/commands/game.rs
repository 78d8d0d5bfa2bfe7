//! Feather Collector commands for CLI.
//!
//! There is no renderer here. `play` runs a full round headlessly with a
//! simple pointer that chases the lowest falling feather, then reports the
//! score like the interactive game does.

use clap::Subcommand;
use cluckplan_core::game::GameRound;
use cluckplan_core::{Config, RoundPhase, Theme};
use glam::Vec2;

use super::{open_store, print_json, CmdResult};

#[derive(Subcommand)]
pub enum GameAction {
    /// Play one round with the auto-pilot and record the score
    Play {
        /// RNG seed; the same seed replays the same round
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Buy and apply a theme (morning, sunset, night)
    Theme {
        /// Theme name
        theme: Theme,
    },
    /// Show the saved game state
    Status,
}

pub fn run(action: GameAction) -> CmdResult {
    let config = Config::load_or_default();
    let mut store = open_store(&config)?;

    match action {
        GameAction::Play { seed } => {
            let seed = seed.unwrap_or_else(|| u64::from(chrono::Utc::now().timestamp_subsec_nanos()));
            let mut round = GameRound::new(config.game.clone(), seed);
            round.start();
            let frame = config.game.tick_period();
            while round.phase() == RoundPhase::Active {
                steer(&mut round);
                round.advance(frame);
            }

            let summary = round
                .report_to(&mut store)
                .ok_or("round ended without a score")?;
            tracing::info!(seed, score = summary.final_score, "round finished");
            print_json(
                &store,
                &serde_json::json!({
                    "seed": seed,
                    "ticks": round.ticks(),
                    "summary": summary,
                    "best_game_score": store.statistics().best_game_score,
                    "feathers_balance": store.statistics().feathers_earned,
                }),
            )?;
        }
        GameAction::Theme { theme } => {
            if !store.purchase_theme(theme) {
                return Err(format!(
                    "not enough feathers for {theme}: need {}, have {}",
                    theme.cost(),
                    store.statistics().feathers_earned
                )
                .into());
            }
            print_json(&store, store.game_state())?;
        }
        GameAction::Status => {
            print_json(&store, store.game_state())?;
        }
    }
    Ok(())
}

fn steer(round: &mut GameRound) {
    let player = round.player();
    let target = round
        .collectibles()
        .iter()
        .filter(|c| !c.collected && c.position.y < player.y)
        .max_by(|a, b| a.position.y.total_cmp(&b.position.y))
        .map(|c| c.position.x);
    if let Some(x) = target {
        round.move_player(Vec2::new(x, player.y));
    }
}
