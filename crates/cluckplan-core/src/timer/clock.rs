//! Injectable wall clock.
//!
//! Calendar-day logic (rollover, "today's sessions") asks the clock for the
//! current local date instead of reading the system time directly, so tests
//! can pin or move time.

use std::cell::Cell;
use std::rc::Rc;

use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate, Offset, Utc};

pub trait Clock {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Calendar day of `at` in the clock's time zone.
    fn date_of(&self, at: DateTime<Utc>) -> NaiveDate;

    /// Current calendar day in the clock's time zone.
    fn today(&self) -> NaiveDate {
        self.date_of(self.now())
    }
}

/// Clock backed by the system time and the local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn date_of(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&Local).date_naive()
    }
}

/// Manually controlled clock. Clones share the same instant.
///
/// Calendar days are taken in UTC unless an offset is set.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Rc<Cell<DateTime<Utc>>>,
    offset: FixedOffset,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Rc::new(Cell::new(now)),
            offset: Utc.fix(),
        }
    }

    /// Judge calendar days at `offset` from UTC, like a local time zone.
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    /// Noon UTC on the given day.
    pub fn on(day: NaiveDate) -> Self {
        let noon = day
            .and_hms_opt(12, 0, 0)
            .map(|dt| dt.and_utc())
            .unwrap_or_else(Utc::now);
        Self::new(noon)
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }

    fn date_of(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.offset).date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_clones_share_time() {
        let day = NaiveDate::from_ymd_opt(2025, 10, 13).unwrap();
        let clock = FixedClock::on(day);
        let handle = clock.clone();
        handle.advance(Duration::days(1));
        assert_eq!(clock.today(), day.succ_opt().unwrap());
    }

    #[test]
    fn offset_moves_the_calendar_day() {
        let late_evening_utc = NaiveDate::from_ymd_opt(2025, 10, 15)
            .unwrap()
            .and_hms_opt(20, 0, 0)
            .unwrap()
            .and_utc();
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let clock = FixedClock::new(late_evening_utc).with_offset(tokyo);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 10, 16).unwrap());
        assert_eq!(
            FixedClock::new(late_evening_utc).today(),
            NaiveDate::from_ymd_opt(2025, 10, 15).unwrap()
        );
    }
}
