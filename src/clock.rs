//! Wall-clock abstraction
//!
//! Every date-sensitive rule (streaks, daily caps, cooldowns) reads the time
//! through a [`Clock`] so the progress pipeline can be replayed and tested
//! against fixed dates.

use std::cell::Cell;

use chrono::{DateTime, Duration, Local};

/// Source of the current local time
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

/// Reads the operating system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Manually driven clock for tests and replays
#[derive(Debug, Clone)]
pub struct ManualClock {
    current: Cell<DateTime<Local>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Local>) -> Self {
        Self {
            current: Cell::new(start),
        }
    }

    pub fn set(&self, time: DateTime<Local>) {
        self.current.set(time);
    }

    /// Move the clock forward by `delta`
    pub fn advance(&self, delta: Duration) {
        self.current.set(self.current.get() + delta);
    }

    pub fn advance_days(&self, days: i64) {
        self.advance(Duration::days(days));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        self.current.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Local> {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_manual_clock_advances() {
        let start = Local.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        clock.advance_days(2);
        assert_eq!(clock.now(), start + Duration::days(2));

        clock.advance(Duration::seconds(30));
        assert_eq!(clock.now(), start + Duration::days(2) + Duration::seconds(30));
    }
}
