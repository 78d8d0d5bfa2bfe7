//! Time sources and explicitly driven timers.
//!
//! Nothing in here spawns threads or registers callbacks. Wall-clock time
//! comes from a [`Clock`], and periodic work is expressed as [`Ticker`]s that
//! the caller advances by elapsed durations.

mod clock;
mod ticker;

pub use clock::{Clock, FixedClock, SystemClock};
pub use ticker::Ticker;
