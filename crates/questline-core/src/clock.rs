//! Clock abstraction for calendar-dependent rules.
//!
//! Streak claims, period windows and watering are all defined in terms of
//! UTC calendar days, so the engine takes a [`Clock`] instead of calling
//! `Utc::now()` inline. Tests pin a [`FixedClock`] to exercise day
//! boundaries deterministically.

use chrono::{DateTime, NaiveDate, Utc};

/// Source of "now" for the engine. All calendar math is UTC.
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;

    fn today_utc(&self) -> NaiveDate {
        self.now_utc().date_naive()
    }
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at a given instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn fixed_clock_reports_its_instant() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 23, 59, 0).unwrap();
        let clock = FixedClock(at);
        assert_eq!(clock.now_utc(), at);
        assert_eq!(clock.today_utc(), at.date_naive());
    }
}
