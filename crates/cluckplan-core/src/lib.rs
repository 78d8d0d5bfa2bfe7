//! # Cluckplan Core Library
//!
//! Core logic for Cluckplan, a chicken-themed daily planner. Tasks, focus
//! sessions and a small catch-the-feather game all feed one reward currency
//! (feathers) plus rolling daily and weekly statistics.
//!
//! The CLI binary is a thin layer over this crate; nothing here depends on
//! a UI toolkit.
//!
//! ## Architecture
//!
//! - **Store**: [`AppStore`] owns all state, applies reward rules, persists
//!   after every change and notifies subscribers with [`Event`]s
//! - **Storage**: versioned JSON entries in a SQLite key-value table and a
//!   TOML [`Config`]
//! - **Timers**: caller-driven [`Ticker`]s with idempotent cancellation,
//!   used by the [`FocusCountdown`] and the [`GameRound`] simulation
//!
//! ## Key Components
//!
//! - [`AppStore`]: mutations, queries and day rollover
//! - [`rewards`]: the feather rules every mutation goes through
//! - [`GameRound`]: deterministic, seeded Feather Collector round

pub mod error;
pub mod events;
pub mod focus;
pub mod game;
pub mod rewards;
pub mod stats;
pub mod storage;
pub mod store;
pub mod task;
pub mod timer;

pub use error::{ConfigError, CoreError, StorageError};
pub use events::Event;
pub use focus::{CountdownEvent, CountdownState, FocusCountdown, FocusSession, SessionStatus};
pub use game::{GameEvent, GameRound, GameState, RoundPhase, RoundSettings, RoundSummary, Theme};
pub use stats::{Achievement, AchievementStatus, Rollover, RollingCounters, Statistics};
pub use storage::{Aggregates, Config, Database, KvGateway, MemoryKv, PersistenceGateway};
pub use store::{AppStore, ListenerId};
pub use task::{Task, TaskCategory};
pub use timer::{Clock, FixedClock, SystemClock, Ticker};
