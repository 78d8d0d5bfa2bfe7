//! Periodic timer driven by elapsed time.
//!
//! A [`Ticker`] never fires on its own: the owner calls [`Ticker::advance`]
//! with the time that passed and gets back how many periods elapsed.
//! Cancellation is sticky and idempotent, and a cancelled ticker never fires
//! again.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Ticker {
    period: Duration,
    /// Time left until the next fire.
    until_next: Duration,
    cancelled: bool,
}

impl Ticker {
    /// Fires every `period`, first after one full period.
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            until_next: period,
            cancelled: false,
        }
    }

    /// Arms after `delay`, then fires every `period`.
    ///
    /// The first fire happens at `delay + period`.
    pub fn delayed(period: Duration, delay: Duration) -> Self {
        Self {
            period,
            until_next: delay + period,
            cancelled: false,
        }
    }

    /// Continue a ticker whose next fire was `until_next` away when it was
    /// stopped, then fire every `period`.
    pub fn resuming(period: Duration, until_next: Duration) -> Self {
        Self {
            period,
            until_next: if until_next.is_zero() { period } else { until_next },
            cancelled: false,
        }
    }

    pub fn until_next(&self) -> Duration {
        self.until_next
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Consume `dt` of elapsed time, returning the number of fires.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        if self.cancelled || self.period.is_zero() {
            return 0;
        }
        let mut remaining = dt;
        let mut fires = 0;
        while remaining >= self.until_next {
            remaining -= self.until_next;
            self.until_next = self.period;
            fires += 1;
        }
        self.until_next -= remaining;
        fires
    }

    /// Stop the ticker. Returns `true` only for the call that cancelled it.
    pub fn cancel(&mut self) -> bool {
        !std::mem::replace(&mut self.cancelled, true)
    }
}
