//! Feather Collector mini-game.
//!
//! The simulation is a fixed-step state machine with no rendering or
//! platform dependencies:
//! - the caller drives time through [`GameRound::advance`]
//! - randomness comes from a seeded PCG32, so a seed replays a round exactly
//! - the only contact with the rest of the app is the final score, reported
//!   once through [`GameRound::report_to`]

mod collision;
mod round;
mod state;

pub use collision::{collect_radius, within_reach};
pub use round::{GameEvent, GameRound, RoundPhase, RoundSettings, RoundSummary};
pub use state::{Collectible, GameState, Theme};
