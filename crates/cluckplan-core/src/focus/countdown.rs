//! One-second countdown for the running focus session.
//!
//! The countdown owns a single [`Ticker`]. Pausing or cancelling drops the
//! ticker, so a paused countdown cannot fire even if the caller keeps
//! advancing it. The fraction of a second already counted survives a
//! pause.
//!
//! ```text
//! Idle -> Running -> (Paused -> Running)* -> Finished
//!            \-> Idle (cancel)
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::FocusSession;
use crate::timer::Ticker;

const COUNTDOWN_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountdownState {
    Idle,
    Running,
    Paused,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CountdownEvent {
    Completed { session_id: String, actual_secs: u64 },
}

#[derive(Debug, Clone)]
pub struct FocusCountdown {
    session_id: Option<String>,
    remaining_secs: u64,
    elapsed_secs: u64,
    ticker: Option<Ticker>,
    /// Part of a second left on the ticker when it was paused.
    resume_in: Option<Duration>,
    state: CountdownState,
}

impl Default for FocusCountdown {
    fn default() -> Self {
        Self::new()
    }
}

impl FocusCountdown {
    pub fn new() -> Self {
        Self {
            session_id: None,
            remaining_secs: 0,
            elapsed_secs: 0,
            ticker: None,
            resume_in: None,
            state: CountdownState::Idle,
        }
    }

    pub fn state(&self) -> CountdownState {
        self.state
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    /// Begin counting down from the session's planned duration.
    ///
    /// Replaces whatever the countdown was tracking before.
    pub fn start(&mut self, session: &FocusSession) {
        self.stop_ticker();
        self.session_id = Some(session.id.clone());
        self.remaining_secs = session.duration_secs;
        self.elapsed_secs = 0;
        self.resume_in = None;
        self.ticker = Some(Ticker::new(COUNTDOWN_PERIOD));
        self.state = CountdownState::Running;
    }

    pub fn pause(&mut self) -> bool {
        if self.state != CountdownState::Running {
            return false;
        }
        self.resume_in = self.ticker.as_ref().map(Ticker::until_next);
        self.stop_ticker();
        self.state = CountdownState::Paused;
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.state != CountdownState::Paused {
            return false;
        }
        let until_next = self.resume_in.take().unwrap_or(COUNTDOWN_PERIOD);
        self.ticker = Some(Ticker::resuming(COUNTDOWN_PERIOD, until_next));
        self.state = CountdownState::Running;
        true
    }

    /// Abandon the countdown. Safe to call in any state.
    pub fn cancel(&mut self) {
        self.stop_ticker();
        self.session_id = None;
        self.remaining_secs = 0;
        self.elapsed_secs = 0;
        self.resume_in = None;
        self.state = CountdownState::Idle;
    }

    /// Consume elapsed time. Returns the completion once remaining time
    /// reaches zero.
    pub fn advance(&mut self, dt: Duration) -> Option<CountdownEvent> {
        let fires = match self.ticker.as_mut() {
            Some(ticker) if self.state == CountdownState::Running => ticker.advance(dt),
            _ => return None,
        };
        let step = u64::from(fires).min(self.remaining_secs);
        self.remaining_secs -= step;
        self.elapsed_secs += step;
        if self.remaining_secs > 0 {
            return None;
        }
        self.finish()
    }

    /// End the session early, e.g. when the user taps "complete".
    pub fn finish(&mut self) -> Option<CountdownEvent> {
        if !matches!(self.state, CountdownState::Running | CountdownState::Paused) {
            return None;
        }
        self.stop_ticker();
        self.state = CountdownState::Finished;
        let session_id = self.session_id.clone()?;
        Some(CountdownEvent::Completed {
            session_id,
            actual_secs: self.elapsed_secs,
        })
    }

    fn stop_ticker(&mut self) {
        if let Some(mut ticker) = self.ticker.take() {
            ticker.cancel();
        }
    }
}
