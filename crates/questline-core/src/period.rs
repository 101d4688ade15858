//! Period-bounded progress windows.
//!
//! DAILY/WEEKLY/MONTHLY rules reset automatically: a progress row whose
//! `last_updated` falls outside the current window is treated as zero
//! instead of being deleted. All windows are computed on UTC calendar
//! fields (ISO week for WEEKLY).

use chrono::{DateTime, Datelike, Utc};

use crate::model::ChallengePeriod;

/// Is a progress row updated at `last_updated` still inside the rule's
/// current period window, given `now`?
pub fn is_valid_for_period(
    period: ChallengePeriod,
    last_updated: DateTime<Utc>,
    now: DateTime<Utc>,
) -> bool {
    match period {
        ChallengePeriod::Once | ChallengePeriod::Event => true,
        ChallengePeriod::Daily => last_updated.date_naive() == now.date_naive(),
        ChallengePeriod::Weekly => {
            let a = last_updated.iso_week();
            let b = now.iso_week();
            a.year() == b.year() && a.week() == b.week()
        }
        ChallengePeriod::Monthly => {
            last_updated.year() == now.year() && last_updated.month() == now.month()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn once_and_event_never_expire() {
        let old = at(2020, 1, 1, 0);
        let now = at(2024, 6, 1, 12);
        assert!(is_valid_for_period(ChallengePeriod::Once, old, now));
        assert!(is_valid_for_period(ChallengePeriod::Event, old, now));
    }

    #[test]
    fn daily_window_is_the_utc_calendar_date() {
        let now = at(2024, 6, 1, 0);
        assert!(is_valid_for_period(ChallengePeriod::Daily, at(2024, 6, 1, 23), now));
        assert!(!is_valid_for_period(ChallengePeriod::Daily, at(2024, 5, 31, 23), now));
    }

    #[test]
    fn weekly_window_uses_iso_weeks() {
        // 2024-01-01 is a Monday, ISO week 1.
        let monday = at(2024, 1, 1, 9);
        let sunday = at(2024, 1, 7, 22);
        let next_monday = at(2024, 1, 8, 0);
        assert!(is_valid_for_period(ChallengePeriod::Weekly, monday, sunday));
        assert!(!is_valid_for_period(ChallengePeriod::Weekly, monday, next_monday));
    }

    #[test]
    fn weekly_window_handles_year_boundary() {
        // 2024-12-30 and 2025-01-03 are both ISO week 1 of 2025.
        let a = at(2024, 12, 30, 12);
        let b = at(2025, 1, 3, 12);
        assert!(is_valid_for_period(ChallengePeriod::Weekly, a, b));
    }

    #[test]
    fn monthly_window_compares_year_and_month() {
        let now = at(2024, 2, 29, 12);
        assert!(is_valid_for_period(ChallengePeriod::Monthly, at(2024, 2, 1, 0), now));
        assert!(!is_valid_for_period(ChallengePeriod::Monthly, at(2024, 1, 31, 23), now));
        assert!(!is_valid_for_period(ChallengePeriod::Monthly, at(2023, 2, 15, 0), now));
    }
}
